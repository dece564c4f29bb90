//! Cooperative cancellation and progress counters for long searches.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Shared handle polled from the innermost backtracking loops.
///
/// Cancelling is sticky: once set, every search holding the handle unwinds at
/// its next poll and reports [`SearchStatus::Cancelled`].
#[derive(Debug, Default)]
pub struct SearchControl {
    cancelled: AtomicBool,
    explored: AtomicU64,
    found: AtomicU64,
}

/// A point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    /// Search-tree nodes visited so far.
    pub explored: u64,
    /// Results produced so far.
    pub found: u64,
    /// Whether cancellation was requested.
    pub cancelled: bool,
}

impl SearchControl {
    /// A fresh, uncancelled handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every search using this handle to stop.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) was called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Count visited search-tree nodes.
    pub fn inc_explored(&self, by: u64) {
        self.explored.fetch_add(by, Ordering::Relaxed);
    }

    /// Count produced results.
    pub fn inc_found(&self, by: u64) {
        self.found.fetch_add(by, Ordering::Relaxed);
    }

    /// Read the counters for display/reporting.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            explored: self.explored.load(Ordering::Relaxed),
            found: self.found.load(Ordering::Relaxed),
            cancelled: self.is_cancelled(),
        }
    }
}

/// How an enumeration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStatus {
    /// The whole search space was covered.
    Complete,
    /// Stopped after reaching the configured result cap.
    Truncated,
    /// Stopped because cancellation was requested.
    Cancelled,
}

impl SearchStatus {
    /// True only for [`SearchStatus::Complete`].
    #[must_use]
    pub const fn is_complete(self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Results of a search together with how it ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome<T> {
    /// Results in discovery order.
    pub items: Vec<T>,
    /// Whether `items` is the full answer.
    pub status: SearchStatus,
}

impl<T> SearchOutcome<T> {
    /// Number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no result was produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancel_is_sticky_and_visible_in_snapshot() {
        let control = SearchControl::new();
        control.inc_explored(5);
        control.inc_found(2);
        assert!(!control.snapshot().cancelled);

        control.cancel();
        control.cancel();
        let snap = control.snapshot();
        assert!(snap.cancelled);
        assert_eq!(snap.explored, 5);
        assert_eq!(snap.found, 2);
    }
}
