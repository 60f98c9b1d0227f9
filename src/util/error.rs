//! Error types for imgsearch.

use std::fmt;
use thiserror::Error;

use crate::image::PixelLayout;
use crate::search::partition::WorkPartition;
use crate::search::MatchPoint;

/// Result alias for imgsearch operations.
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Errors that can occur while preparing or running a search.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Width or height is zero, or the size overflows.
    #[error("invalid dimensions {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Stride is smaller than one row of pixels.
    #[error("invalid stride {stride} for a row of {width} bytes")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer is shorter than the geometry requires.
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Pixel layout is not usable.
    #[error("invalid pixel layout: {bytes_per_pixel} bytes per pixel, {color_channels} color channels")]
    InvalidLayout {
        bytes_per_pixel: usize,
        color_channels: usize,
    },
    /// Haystack and needle use different pixel layouts.
    #[error("pixel layout mismatch: haystack {haystack:?}, needle {needle:?}")]
    LayoutMismatch {
        haystack: PixelLayout,
        needle: PixelLayout,
    },
    /// The algorithm selector is not recognized.
    #[error("unknown algorithm '{0}', expected 'exact' or 'euclidean'")]
    UnknownAlgorithm(String),
    /// An image file does not exist.
    #[error("image file '{path}' does not exist")]
    ImageNotFound { path: String },
    /// An image file could not be read or decoded.
    #[error("failed to load image '{path}': {reason}")]
    ImageIo { path: String, reason: String },
    /// A predicate attempted to read outside a pixel buffer.
    #[error("read at byte {offset} is outside a buffer of {len} bytes")]
    OutOfBounds { offset: usize, len: usize },
    /// At least one worker failed; the partial result set was discarded.
    #[error("{failure} ({failed_workers} worker(s) failed)")]
    WorkerFailed {
        failure: WorkerFailure,
        failed_workers: usize,
    },
}

/// Diagnostic record for a worker that aborted its partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerFailure {
    /// Partition the worker was assigned.
    pub partition: WorkPartition,
    /// Window being evaluated when the failure happened, if known.
    pub position: Option<MatchPoint>,
    /// Human-readable cause.
    pub reason: String,
}

impl fmt::Display for WorkerFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "worker {} failed on positions [{}, {})",
            self.partition.index, self.partition.start, self.partition.end
        )?;
        if let Some(pos) = self.position {
            write!(f, " at window {pos}")?;
        }
        write!(f, ": {}", self.reason)
    }
}
