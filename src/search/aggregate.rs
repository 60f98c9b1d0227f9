//! Thread-safe collectors shared by search workers.

use std::sync::{Mutex, PoisonError};

use crate::search::MatchPoint;
use crate::util::{SearchError, WorkerFailure};

/// Append-only match collection filled concurrently by workers and drained
/// once after they have all been joined.
#[derive(Debug, Default)]
pub struct MatchSink {
    matches: Mutex<Vec<MatchPoint>>,
}

impl MatchSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a match. Safe to call from any number of threads.
    pub fn push(&self, point: MatchPoint) {
        // A poisoned lock still holds every completed push.
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(point);
    }

    /// Number of matches recorded so far.
    pub fn len(&self) -> usize {
        self.matches
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true when no match has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drains the sink into row-major order.
    pub fn into_sorted(self) -> Vec<MatchPoint> {
        let mut matches = self
            .matches
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        matches.sort_unstable();
        matches
    }
}

/// Single error channel for worker failures.
#[derive(Debug, Default)]
pub(crate) struct FailureLog {
    failures: Mutex<Vec<WorkerFailure>>,
}

impl FailureLog {
    pub(crate) fn record(&self, failure: WorkerFailure) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(failure);
    }

    /// Folds all recorded failures into one error naming the lowest-indexed
    /// failing worker.
    pub(crate) fn into_error(self) -> Option<SearchError> {
        let failures = self
            .failures
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        let failed_workers = failures.len();
        let failure = failures
            .into_iter()
            .min_by_key(|failure| failure.partition.index)?;
        Some(SearchError::WorkerFailed {
            failure,
            failed_workers,
        })
    }
}
