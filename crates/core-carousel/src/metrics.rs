//! Per-instance carousel counters.
//!
//! Relaxed atomics so a snapshot can be taken through `&self` while the
//! controller keeps mutating; values are diagnostic only.

use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

#[derive(Debug, Default)]
pub struct CarouselMetrics {
    advances: AtomicU64,
    boundary_noops: AtomicU64,
    resize_events: AtomicU64,
    /// Resize events discarded because a newer one re-armed the timer.
    resize_collapsed: AtomicU64,
    resizes_applied: AtomicU64,
    index_reclamped: AtomicU64,
    fallback_width: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CarouselMetricsSnapshot {
    pub advances: u64,
    pub boundary_noops: u64,
    pub resize_events: u64,
    pub resize_collapsed: u64,
    pub resizes_applied: u64,
    pub index_reclamped: u64,
    pub fallback_width: u64,
}

impl CarouselMetrics {
    pub fn snapshot(&self) -> CarouselMetricsSnapshot {
        CarouselMetricsSnapshot {
            advances: self.advances.load(Relaxed),
            boundary_noops: self.boundary_noops.load(Relaxed),
            resize_events: self.resize_events.load(Relaxed),
            resize_collapsed: self.resize_collapsed.load(Relaxed),
            resizes_applied: self.resizes_applied.load(Relaxed),
            index_reclamped: self.index_reclamped.load(Relaxed),
            fallback_width: self.fallback_width.load(Relaxed),
        }
    }

    pub(crate) fn incr_advance(&self) {
        self.advances.fetch_add(1, Relaxed);
    }
    pub(crate) fn incr_boundary_noop(&self) {
        self.boundary_noops.fetch_add(1, Relaxed);
    }
    pub(crate) fn incr_resize_event(&self, collapsed_previous: bool) {
        self.resize_events.fetch_add(1, Relaxed);
        if collapsed_previous {
            self.resize_collapsed.fetch_add(1, Relaxed);
        }
    }
    pub(crate) fn incr_resize_applied(&self, reclamped: bool) {
        self.resizes_applied.fetch_add(1, Relaxed);
        if reclamped {
            self.index_reclamped.fetch_add(1, Relaxed);
        }
    }
    pub(crate) fn incr_fallback_width(&self) {
        self.fallback_width.fetch_add(1, Relaxed);
    }
}
