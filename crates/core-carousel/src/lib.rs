//! Responsive carousel pagination.
//!
//! A [`Carousel`] owns the scroll state of one card strip: the first visible
//! card index, the page size derived from the viewport, the translation applied
//! to the strip and the enabled/disabled state of its controls. The page
//! itself is reached only through the [`surface`] traits, so the controller can
//! be driven by a browser binding, a terminal preview or a test double.
//!
//! Invariant: after every operation the index lies in
//! `[0, max(0, item_count - page_size)]`.
//!
//! Resize handling is debounced: [`Carousel::notify_resize`] (re)arms a
//! single-shot timer owned by the instance and [`Carousel::poll_resize`]
//! applies the last observed width once the window has elapsed. Several
//! instances are grouped by [`CarouselSet`] without sharing any state.

pub mod controller;
pub mod debounce;
pub mod metrics;
pub mod set;
pub mod surface;

pub use controller::{AdvanceOutcome, Carousel, CarouselOptions, CarouselSnapshot, ResizeOutcome};
pub use core_config::StepPolicy;
pub use core_events::NavDirection;
pub use debounce::Debounce;
pub use metrics::{CarouselMetrics, CarouselMetricsSnapshot};
pub use set::CarouselSet;
pub use surface::{Bindings, ControlState, ControlsWrapper, NavControl, Track};
