//! imgsearch finds every occurrence of a small image inside a larger one.
//!
//! The search is exhaustive: each candidate window is compared with either a
//! bit-exact or a color-distance predicate, and the window positions are split
//! statically across a fixed number of worker threads spawned per search.
//! Decoding files into RGBA8 rasters is available with the `image-io` feature.

pub mod image;
pub mod kernel;
pub mod search;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{PixelLayout, RasterBuffer, RasterView};
pub use kernel::{Aggregation, DistanceConfig, DistanceMatch, ExactMatch, Predicate};
pub use search::aggregate::MatchSink;
pub use search::partition::{partition, SearchGeometry, WorkPartition};
pub use search::{find_all, Algorithm, MatchPoint, SearchConfig, Searcher};
pub use util::{SearchError, SearchResult, WorkerFailure};
