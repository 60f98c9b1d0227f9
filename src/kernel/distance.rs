//! Color-distance window comparison.
//!
//! Each needle pixel contributes the Euclidean distance between its color
//! channels and those of the haystack pixel underneath (trailing channels such
//! as alpha are ignored). Per-pixel distances are folded into one aggregate
//! that must not exceed the configured tolerance:
//!
//! - `Sum`: total distance over the window,
//! - `Mean`: total distance divided by the needle pixel count,
//! - `Max`: the largest single-pixel distance.
//!
//! All three aggregates only grow while pixels are visited, so evaluation stops
//! as soon as the tolerance is exceeded.

use std::ops::ControlFlow;

use crate::image::PixelLayout;
use crate::kernel::{needle_row, window_row, Predicate};
use crate::util::{SearchError, SearchResult};
use crate::RasterView;

/// How per-pixel distances combine into a window score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Aggregation {
    /// Sum of per-pixel distances.
    Sum,
    /// Mean per-pixel distance.
    #[default]
    Mean,
    /// Largest per-pixel distance.
    Max,
}

/// Tolerance settings for the distance predicate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceConfig {
    /// Aggregation applied to per-pixel distances.
    pub aggregation: Aggregation,
    /// Largest accepted aggregate distance (inclusive).
    pub tolerance: f64,
}

impl Default for DistanceConfig {
    fn default() -> Self {
        Self {
            aggregation: Aggregation::Mean,
            tolerance: 0.0,
        }
    }
}

impl DistanceConfig {
    /// Checks that the tolerance is finite and non-negative.
    pub fn validate(&self) -> SearchResult<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SearchError::InvalidInput(
                "distance tolerance must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

/// Distance-based predicate.
#[derive(Clone, Copy, Debug, Default)]
pub struct DistanceMatch {
    config: DistanceConfig,
}

impl DistanceMatch {
    /// Creates a predicate after validating `config`.
    pub fn new(config: DistanceConfig) -> SearchResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> DistanceConfig {
        self.config
    }

    /// Computes the aggregate distance at `(x, y)` without early exit.
    pub fn aggregate_at(
        &self,
        haystack: RasterView<'_>,
        needle: RasterView<'_>,
        x: usize,
        y: usize,
    ) -> SearchResult<f64> {
        let mut acc = Accumulator::new(self.config, needle, f64::INFINITY);
        for dy in 0..needle.height() {
            let hay = window_row(haystack, needle, x, y, dy)?;
            let tpl = needle_row(needle, dy)?;
            // An infinite budget never breaks.
            let flow = for_each_squared(hay, tpl, needle.layout(), |sq| acc.add(sq));
            debug_assert!(flow.is_continue());
        }
        Ok(acc.value())
    }
}

impl Predicate for DistanceMatch {
    fn matches_at(
        &self,
        haystack: RasterView<'_>,
        needle: RasterView<'_>,
        x: usize,
        y: usize,
    ) -> SearchResult<bool> {
        let mut acc = Accumulator::new(self.config, needle, self.config.tolerance);
        for dy in 0..needle.height() {
            let hay = window_row(haystack, needle, x, y, dy)?;
            let tpl = needle_row(needle, dy)?;
            if for_each_squared(hay, tpl, needle.layout(), |sq| acc.add(sq)).is_break() {
                return Ok(false);
            }
        }
        Ok(acc.value() <= self.config.tolerance)
    }
}

fn pixel_count(needle: RasterView<'_>) -> f64 {
    (needle.width() * needle.height()) as f64
}

/// Running aggregate; `add` breaks once the running value exceeds `budget`.
///
/// The running value of `Mean` is `total / pixels`, the same expression
/// `value` returns, so a partial sum never rejects a window the full
/// aggregate would accept.
struct Accumulator {
    aggregation: Aggregation,
    pixels: f64,
    budget: f64,
    total: f64,
    worst: f64,
}

impl Accumulator {
    fn new(config: DistanceConfig, needle: RasterView<'_>, budget: f64) -> Self {
        Self {
            aggregation: config.aggregation,
            pixels: pixel_count(needle),
            budget,
            total: 0.0,
            worst: 0.0,
        }
    }

    #[inline]
    fn add(&mut self, squared: u32) -> ControlFlow<()> {
        let distance = f64::from(squared).sqrt();
        let running = match self.aggregation {
            Aggregation::Sum => {
                self.total += distance;
                self.total
            }
            Aggregation::Mean => {
                self.total += distance;
                self.total / self.pixels
            }
            Aggregation::Max => {
                self.worst = self.worst.max(distance);
                self.worst
            }
        };
        if running > self.budget {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }

    fn value(&self) -> f64 {
        match self.aggregation {
            Aggregation::Sum => self.total,
            Aggregation::Mean => self.total / self.pixels,
            Aggregation::Max => self.worst,
        }
    }
}

/// Calls `f` with the squared color distance of each pixel pair in a row.
#[inline]
fn for_each_squared<F>(hay: &[u8], tpl: &[u8], layout: PixelLayout, f: F) -> ControlFlow<()>
where
    F: FnMut(u32) -> ControlFlow<()>,
{
    #[cfg(feature = "simd")]
    if layout.bytes_per_pixel() == crate::kernel::simd::PIXEL_BYTES {
        return crate::kernel::simd::for_each_squared_rgba(hay, tpl, layout.color_channels(), f);
    }
    for_each_squared_scalar(hay, tpl, layout, f)
}

pub(crate) fn for_each_squared_scalar<F>(
    hay: &[u8],
    tpl: &[u8],
    layout: PixelLayout,
    mut f: F,
) -> ControlFlow<()>
where
    F: FnMut(u32) -> ControlFlow<()>,
{
    let bpp = layout.bytes_per_pixel();
    let channels = layout.color_channels();
    for (a, b) in hay.chunks_exact(bpp).zip(tpl.chunks_exact(bpp)) {
        if f(squared_distance(&a[..channels], &b[..channels])).is_break() {
            return ControlFlow::Break(());
        }
    }
    ControlFlow::Continue(())
}

#[inline]
pub(crate) fn squared_distance(a: &[u8], b: &[u8]) -> u32 {
    a.iter()
        .zip(b)
        .map(|(&p, &q)| {
            let diff = i32::from(p) - i32::from(q);
            (diff * diff) as u32
        })
        .sum()
}
