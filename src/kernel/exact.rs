//! Bit-exact window comparison.

use crate::kernel::{needle_row, window_row, Predicate};
use crate::util::SearchResult;
use crate::RasterView;

/// Matches when every byte of every needle pixel, alpha included, equals the
/// haystack byte underneath it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ExactMatch;

impl Predicate for ExactMatch {
    fn matches_at(
        &self,
        haystack: RasterView<'_>,
        needle: RasterView<'_>,
        x: usize,
        y: usize,
    ) -> SearchResult<bool> {
        for dy in 0..needle.height() {
            let hay = window_row(haystack, needle, x, y, dy)?;
            let tpl = needle_row(needle, dy)?;
            // Slice equality stops at the first differing byte.
            if hay != tpl {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
