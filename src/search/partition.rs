//! Search geometry and static work partitioning.
//!
//! Window positions are linearized row-major as `index = y * (max_x + 1) + x`
//! and split into one contiguous range per worker.

use std::ops::Range;

use crate::search::MatchPoint;
use crate::util::{SearchError, SearchResult};
use crate::RasterView;

/// Valid window offsets for a haystack/needle pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SearchGeometry {
    max_x: usize,
    max_y: usize,
}

impl SearchGeometry {
    /// Returns `None` when the needle is larger than the haystack in either
    /// dimension, in which case there is nothing to search.
    pub fn new(
        haystack_width: usize,
        haystack_height: usize,
        needle_width: usize,
        needle_height: usize,
    ) -> Option<Self> {
        Some(Self {
            max_x: haystack_width.checked_sub(needle_width)?,
            max_y: haystack_height.checked_sub(needle_height)?,
        })
    }

    /// Geometry for searching `needle` inside `haystack`.
    pub fn from_views(haystack: RasterView<'_>, needle: RasterView<'_>) -> Option<Self> {
        Self::new(
            haystack.width(),
            haystack.height(),
            needle.width(),
            needle.height(),
        )
    }

    /// Largest valid x offset.
    pub fn max_x(&self) -> usize {
        self.max_x
    }

    /// Largest valid y offset.
    pub fn max_y(&self) -> usize {
        self.max_y
    }

    /// Number of window offsets per row.
    pub fn columns(&self) -> usize {
        self.max_x + 1
    }

    /// Number of window offsets in total.
    pub fn total_positions(&self) -> usize {
        self.columns() * (self.max_y + 1)
    }

    /// Maps a linear index to its window offset.
    #[inline]
    pub fn position(&self, index: usize) -> MatchPoint {
        let columns = self.columns();
        MatchPoint {
            x: index % columns,
            y: index / columns,
        }
    }

    /// Maps a window offset to its linear index.
    pub fn index_of(&self, point: MatchPoint) -> usize {
        point.y * self.columns() + point.x
    }
}

/// Half-open range `[start, end)` of linear positions owned by one worker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorkPartition {
    /// Worker index in `0..worker_count`.
    pub index: usize,
    /// First position (inclusive).
    pub start: usize,
    /// Last position (exclusive).
    pub end: usize,
}

impl WorkPartition {
    /// Number of positions in the partition.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true when the worker has nothing to scan.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Positions as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Splits `[0, total_positions)` into `worker_count` contiguous partitions of
/// `ceil(total_positions / worker_count)` positions each; trailing partitions
/// may be shorter or empty.
pub fn partition(total_positions: usize, worker_count: usize) -> SearchResult<Vec<WorkPartition>> {
    if worker_count == 0 {
        return Err(SearchError::InvalidInput("worker count must be at least 1"));
    }
    let per_worker = total_positions.div_ceil(worker_count);
    let partitions = (0..worker_count)
        .map(|index| {
            let start = index.saturating_mul(per_worker).min(total_positions);
            let end = start.saturating_add(per_worker).min(total_positions);
            WorkPartition { index, start, end }
        })
        .collect();
    Ok(partitions)
}

#[cfg(test)]
mod tests {
    use super::{partition, SearchGeometry, WorkPartition};
    use crate::search::MatchPoint;
    use crate::util::SearchError;

    fn assert_exhaustive(parts: &[WorkPartition], total: usize) {
        let mut next = 0;
        for (idx, part) in parts.iter().enumerate() {
            assert_eq!(part.index, idx);
            assert_eq!(part.start, next, "gap or overlap before worker {idx}");
            assert!(part.start <= part.end);
            next = part.end;
        }
        assert_eq!(next, total);
    }

    #[test]
    fn covers_every_position_exactly_once() {
        for total in 0..40 {
            for workers in 1..12 {
                let parts = partition(total, workers).unwrap();
                assert_eq!(parts.len(), workers);
                assert_exhaustive(&parts, total);
            }
        }
    }

    #[test]
    fn uses_ceiling_chunk_size() {
        let parts = partition(10, 4).unwrap();
        let ranges: Vec<_> = parts.iter().map(|p| (p.start, p.end)).collect();
        assert_eq!(ranges, vec![(0, 3), (3, 6), (6, 9), (9, 10)]);
    }

    #[test]
    fn surplus_workers_get_empty_ranges() {
        let parts = partition(2, 5).unwrap();
        assert_eq!(parts.iter().filter(|p| p.is_empty()).count(), 3);
        assert_exhaustive(&parts, 2);
    }

    #[test]
    fn zero_workers_is_rejected() {
        assert!(matches!(partition(5, 0), Err(SearchError::InvalidInput(_))));
    }

    #[test]
    fn geometry_round_trips_indices() {
        let geom = SearchGeometry::new(7, 5, 3, 2).unwrap();
        assert_eq!(geom.columns(), 5);
        assert_eq!(geom.total_positions(), 20);
        assert_eq!(geom.position(7), MatchPoint { x: 2, y: 1 });
        assert_eq!(geom.index_of(MatchPoint { x: 4, y: 3 }), 19);
    }

    #[test]
    fn oversized_needle_has_no_geometry() {
        assert!(SearchGeometry::new(4, 4, 5, 1).is_none());
        assert!(SearchGeometry::new(4, 4, 1, 5).is_none());
        assert_eq!(SearchGeometry::new(4, 4, 4, 4).unwrap().total_positions(), 1);
    }
}
