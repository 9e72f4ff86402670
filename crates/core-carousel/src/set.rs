//! Independent carousel instances on one page.
//!
//! Each region (`latest`, `more`, ...) is its own [`Carousel`] with its own
//! index and its own debounce timer. The set only routes: a resize is fanned
//! out to every instance and polled per instance.

use crate::controller::{AdvanceOutcome, Carousel, ResizeOutcome};
use core_events::NavDirection;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Default)]
pub struct CarouselSet {
    carousels: Vec<Carousel>,
}

impl CarouselSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `carousel`. An existing instance with the same id is torn down
    /// and returned.
    pub fn insert(&mut self, carousel: Carousel) -> Option<Carousel> {
        match self.carousels.iter().position(|c| c.id() == carousel.id()) {
            Some(pos) => {
                let mut old = std::mem::replace(&mut self.carousels[pos], carousel);
                old.teardown();
                debug!(target: "carousel", id = old.id(), "carousel_replaced");
                Some(old)
            }
            None => {
                self.carousels.push(carousel);
                None
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&Carousel> {
        self.carousels.iter().find(|c| c.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Carousel> {
        self.carousels.iter_mut().find(|c| c.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Carousel> {
        self.carousels.iter()
    }

    pub fn len(&self) -> usize {
        self.carousels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.carousels.is_empty()
    }

    /// `None` when no carousel is registered under `id`.
    pub fn advance(&mut self, id: &str, direction: NavDirection) -> Option<AdvanceOutcome> {
        self.get_mut(id).map(|c| c.advance(direction))
    }

    /// Forward a raw resize to every instance. Returns how many armed a timer.
    pub fn notify_resize(&mut self, width: u32, now: Instant) -> usize {
        self.carousels
            .iter_mut()
            .map(|c| c.notify_resize(width, now))
            .filter(|armed| *armed)
            .count()
    }

    /// Apply due resizes; returns the ids that re-rendered, in mount order.
    pub fn poll_resize(&mut self, now: Instant) -> Vec<String> {
        let mut applied = Vec::new();
        for c in &mut self.carousels {
            if let Some(ResizeOutcome::Applied { .. }) = c.poll_resize(now) {
                applied.push(c.id().to_string());
            }
        }
        applied
    }

    /// Earliest pending resize deadline across instances.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.carousels.iter().filter_map(|c| c.resize_deadline()).min()
    }

    pub fn teardown_all(&mut self) {
        for c in &mut self.carousels {
            c.teardown();
        }
    }
}
