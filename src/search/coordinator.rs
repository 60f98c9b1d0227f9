//! Thread-per-partition search execution.
//!
//! Workers are scoped OS threads spawned fresh for every search. Each one owns
//! a disjoint range of window positions and only reads the shared rasters;
//! matches and failures go through the mutex-guarded collectors. The scope
//! joins every worker before results are read.

use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crate::kernel::Predicate;
use crate::search::aggregate::{FailureLog, MatchSink};
use crate::search::partition::{SearchGeometry, WorkPartition};
use crate::search::MatchPoint;
use crate::trace::{enter_span, record_event};
use crate::util::{SearchResult, WorkerFailure};
use crate::RasterView;

/// Runs one worker per partition and returns matches in row-major order.
pub(crate) fn run_partitions<P>(
    haystack: RasterView<'_>,
    needle: RasterView<'_>,
    geometry: SearchGeometry,
    partitions: &[WorkPartition],
    predicate: &P,
) -> SearchResult<Vec<MatchPoint>>
where
    P: Predicate + ?Sized,
{
    let sink = MatchSink::new();
    let failures = FailureLog::default();

    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(partitions.len());
        for &partition in partitions {
            let sink = &sink;
            let failures = &failures;
            let spawned = thread::Builder::new()
                .name(format!("imgsearch-worker-{}", partition.index))
                .spawn_scoped(scope, move || {
                    scan_partition(haystack, needle, geometry, partition, predicate, sink, failures)
                });
            match spawned {
                Ok(handle) => handles.push((partition, handle)),
                Err(err) => failures.record(WorkerFailure {
                    partition,
                    position: None,
                    reason: format!("failed to spawn worker thread: {err}"),
                }),
            }
        }

        for (partition, handle) in handles {
            if let Err(payload) = handle.join() {
                failures.record(WorkerFailure {
                    partition,
                    position: None,
                    reason: panic_message(payload.as_ref()),
                });
            }
        }
    });

    if let Some(err) = failures.into_error() {
        record_event!(WARN, "search_failed", error = err.to_string().as_str());
        return Err(err);
    }
    Ok(sink.into_sorted())
}

/// Evaluates every position of `partition`; never stops early on a match.
fn scan_partition<P>(
    haystack: RasterView<'_>,
    needle: RasterView<'_>,
    geometry: SearchGeometry,
    partition: WorkPartition,
    predicate: &P,
    sink: &MatchSink,
    failures: &FailureLog,
) where
    P: Predicate + ?Sized,
{
    let _span = enter_span!(
        "worker",
        index = partition.index,
        start = partition.start,
        end = partition.end
    );

    let cursor = Cell::new(partition.start);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> SearchResult<usize> {
        let mut found = 0usize;
        for index in partition.range() {
            cursor.set(index);
            let point = geometry.position(index);
            if predicate.matches_at(haystack, needle, point.x, point.y)? {
                sink.push(point);
                found += 1;
            }
        }
        Ok(found)
    }));

    let reason = match outcome {
        Ok(Ok(found)) => {
            record_event!(DEBUG, "worker_done", index = partition.index, matches = found);
            return;
        }
        Ok(Err(err)) => err.to_string(),
        Err(payload) => panic_message(payload.as_ref()),
    };
    failures.record(WorkerFailure {
        partition,
        position: Some(geometry.position(cursor.get())),
        reason,
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("worker panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("worker panicked: {msg}")
    } else {
        "worker panicked".to_string()
    }
}
