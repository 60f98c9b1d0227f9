//! Window matching predicates.
//!
//! A predicate decides whether the needle matches the haystack with its
//! top-left corner at `(x, y)`. Callers guarantee that both views share a
//! pixel layout and that the window fits; reads that would leave a buffer are
//! still reported as `SearchError::OutOfBounds` rather than panicking.

use crate::util::{SearchError, SearchResult};
use crate::RasterView;

pub mod distance;
pub mod exact;

#[cfg(feature = "simd")]
pub mod simd;

pub use distance::{Aggregation, DistanceConfig, DistanceMatch};
pub use exact::ExactMatch;

/// Matching predicate evaluated at a single window offset.
pub trait Predicate: Sync {
    /// Returns whether the needle matches the haystack at `(x, y)`.
    fn matches_at(
        &self,
        haystack: RasterView<'_>,
        needle: RasterView<'_>,
        x: usize,
        y: usize,
    ) -> SearchResult<bool>;
}

/// Returns the haystack bytes under needle row `dy` for the window at `(x, y)`.
#[inline]
pub(crate) fn window_row<'a>(
    haystack: RasterView<'a>,
    needle: RasterView<'_>,
    x: usize,
    y: usize,
    dy: usize,
) -> SearchResult<&'a [u8]> {
    let bpp = haystack.bytes_per_pixel();
    let len = needle.row_bytes();
    let row_y = y.checked_add(dy).filter(|&ry| ry < haystack.height());
    let fits = x
        .checked_add(needle.width())
        .is_some_and(|end| end <= haystack.width());
    let start = row_y
        .and_then(|ry| ry.checked_mul(haystack.stride()))
        .and_then(|base| x.checked_mul(bpp).and_then(|dx| base.checked_add(dx)));
    let row = match start {
        Some(start) if fits => start
            .checked_add(len)
            .and_then(|end| haystack.as_slice().get(start..end)),
        _ => None,
    };
    row.ok_or_else(|| SearchError::OutOfBounds {
        offset: y
            .saturating_add(dy)
            .saturating_mul(haystack.stride())
            .saturating_add(x.saturating_mul(bpp))
            .saturating_add(len),
        len: haystack.as_slice().len(),
    })
}

/// Returns the pixel bytes of needle row `dy`.
#[inline]
pub(crate) fn needle_row<'a>(needle: RasterView<'a>, dy: usize) -> SearchResult<&'a [u8]> {
    needle.row(dy).ok_or(SearchError::OutOfBounds {
        offset: dy
            .saturating_mul(needle.stride())
            .saturating_add(needle.row_bytes()),
        len: needle.as_slice().len(),
    })
}
