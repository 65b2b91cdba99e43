//! Globally sorted marker index.
//!
//! The index holds handles to every marker of every tracked line, kept sorted
//! by position with a total-order tiebreak that places the active line's
//! markers after companion markers at equal positions (they are painted last,
//! so they end up on top). Positions live in the owning lines, so every
//! operation takes a key function resolving a handle to its sort key.
//!
//! Drags move a bounded set of markers, so instead of re-sorting the whole
//! sequence the affected slice is located by binary search before the move and
//! re-sorted afterwards. The slice must cover the old and new positions of
//! every moved marker, including any snap displacement.

use crate::core::TimeRange;
use crate::markers::marker::MarkerHandle;

/// Sort key of one marker: position first, then a rank placing active-line
/// markers after companions, then the physical slot for a total order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct IndexKey {
    pub position: i64,
    pub rank: u32,
    pub slot: u8,
}

/// Sequence of marker handles ordered by [`IndexKey`].
#[derive(Debug, Default, Clone)]
pub struct MarkerIndex {
    entries: Vec<MarkerHandle>,
}

impl MarkerIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the contents and sorts.
    pub fn rebuild(
        &mut self,
        handles: impl IntoIterator<Item = MarkerHandle>,
        key: impl Fn(MarkerHandle) -> IndexKey,
    ) {
        self.entries = handles.into_iter().collect();
        self.entries.sort_by_key(|&handle| key(handle));
    }

    #[must_use]
    pub fn as_slice(&self) -> &[MarkerHandle] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Handles with positions inside the half-open `range`, in sorted order.
    #[must_use]
    pub fn range(
        &self,
        range: TimeRange,
        key: impl Fn(MarkerHandle) -> IndexKey,
    ) -> &[MarkerHandle] {
        let begin = self
            .entries
            .partition_point(|&handle| key(handle).position < range.begin());
        let end = self
            .entries
            .partition_point(|&handle| key(handle).position < range.end());
        &self.entries[begin..end]
    }

    /// Index bounds of the slice whose positions lie in `[t_min, t_max]`
    /// (inclusive on both ends).
    #[must_use]
    pub fn bounds(
        &self,
        t_min: i64,
        t_max: i64,
        key: impl Fn(MarkerHandle) -> IndexKey,
    ) -> (usize, usize) {
        let begin = self
            .entries
            .partition_point(|&handle| key(handle).position < t_min);
        let end = self
            .entries
            .partition_point(|&handle| key(handle).position <= t_max);
        (begin, end)
    }

    /// Re-sorts one slice previously located with [`MarkerIndex::bounds`].
    ///
    /// Correct only when no marker outside the slice moved and no moved
    /// marker's new position falls outside the slice's value range.
    pub fn resort_slice(&mut self, bounds: (usize, usize), key: impl Fn(MarkerHandle) -> IndexKey) {
        let (begin, end) = bounds;
        self.entries[begin..end].sort_by_key(|&handle| key(handle));
    }

    /// Full re-sort, used after wholesale position resets.
    pub fn resort_all(&mut self, key: impl Fn(MarkerHandle) -> IndexKey) {
        self.entries.sort_by_key(|&handle| key(handle));
    }
}
