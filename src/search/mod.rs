//! Exhaustive parallel search for every occurrence of a needle.
//!
//! `Searcher` validates the configuration, derives the window geometry, splits
//! it into one partition per worker and hands the partitions to the
//! coordinator. Every window is evaluated; all matches are reported.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::kernel::{DistanceConfig, DistanceMatch, ExactMatch, Predicate};
use crate::trace::{enter_span, record_event};
use crate::util::{SearchError, SearchResult};
use crate::RasterView;

pub mod aggregate;
pub(crate) mod coordinator;
pub mod partition;

use partition::{partition, SearchGeometry};

/// Top-left window offset at which the needle matched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MatchPoint {
    /// X coordinate (column) in the haystack.
    pub x: usize,
    /// Y coordinate (row) in the haystack.
    pub y: usize,
}

impl Ord for MatchPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then_with(|| self.x.cmp(&other.x))
    }
}

impl PartialOrd for MatchPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for MatchPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// Pixel comparison used at each window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Algorithm {
    /// Byte-for-byte equality of every pixel, alpha included.
    #[default]
    Exact,
    /// Color distance within the configured tolerance, alpha ignored.
    Euclidean,
}

impl Algorithm {
    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Exact => "exact",
            Algorithm::Euclidean => "euclidean",
        }
    }
}

impl FromStr for Algorithm {
    type Err = SearchError;

    /// Parses `exact` or `euclidean` case-insensitively; `euclidian` is
    /// accepted as an alternative spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "exact" => Ok(Algorithm::Exact),
            "euclidean" | "euclidian" => Ok(Algorithm::Euclidean),
            _ => Err(SearchError::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Number of worker threads; one partition per worker.
    pub workers: usize,
    /// Pixel comparison.
    pub algorithm: Algorithm,
    /// Tolerance for `Algorithm::Euclidean`; ignored by `Exact`.
    pub distance: DistanceConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            workers,
            algorithm: Algorithm::Exact,
            distance: DistanceConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Checks the worker count and distance settings.
    pub fn validate(&self) -> SearchResult<()> {
        if self.workers == 0 {
            return Err(SearchError::InvalidInput("worker count must be at least 1"));
        }
        self.distance.validate()
    }
}

/// High-level search entry point.
#[derive(Clone, Debug, Default)]
pub struct Searcher {
    cfg: SearchConfig,
}

impl Searcher {
    /// Creates a searcher with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: SearchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.cfg
    }

    /// Finds every window where `needle` matches `haystack`.
    ///
    /// Matches are returned in row-major order. A needle larger than the
    /// haystack yields an empty list.
    pub fn find_all(
        &self,
        haystack: RasterView<'_>,
        needle: RasterView<'_>,
    ) -> SearchResult<Vec<MatchPoint>> {
        self.cfg.validate()?;
        match self.cfg.algorithm {
            Algorithm::Exact => self.find_all_with(haystack, needle, &ExactMatch),
            Algorithm::Euclidean => {
                let predicate = DistanceMatch::new(self.cfg.distance)?;
                self.find_all_with(haystack, needle, &predicate)
            }
        }
    }

    /// Like `find_all`, with a caller-supplied predicate instead of the
    /// configured algorithm.
    pub fn find_all_with<P>(
        &self,
        haystack: RasterView<'_>,
        needle: RasterView<'_>,
        predicate: &P,
    ) -> SearchResult<Vec<MatchPoint>>
    where
        P: Predicate + ?Sized,
    {
        let workers = self.cfg.workers;
        if workers == 0 {
            return Err(SearchError::InvalidInput("worker count must be at least 1"));
        }
        if haystack.layout() != needle.layout() {
            return Err(SearchError::LayoutMismatch {
                haystack: haystack.layout(),
                needle: needle.layout(),
            });
        }

        let Some(geometry) = SearchGeometry::from_views(haystack, needle) else {
            record_event!(DEBUG, "needle_exceeds_haystack");
            return Ok(Vec::new());
        };
        let total = geometry.total_positions();
        let partitions = partition(total, workers)?;

        let _span = enter_span!(
            "search",
            algorithm = self.cfg.algorithm.as_str(),
            workers = workers,
            positions = total
        );

        let matches =
            coordinator::run_partitions(haystack, needle, geometry, &partitions, predicate)?;
        record_event!(INFO, "search_done", matches = matches.len());
        Ok(matches)
    }
}

/// Convenience wrapper for `Searcher::new().with_config(config).find_all(..)`.
pub fn find_all(
    haystack: RasterView<'_>,
    needle: RasterView<'_>,
    config: &SearchConfig,
) -> SearchResult<Vec<MatchPoint>> {
    Searcher::new()
        .with_config(config.clone())
        .find_all(haystack, needle)
}
