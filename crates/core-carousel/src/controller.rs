//! Carousel controller.
//!
//! Render rules (applied after every state change):
//! - `offset = -(index * (item_width + gap))`, with `item_width` measured from
//!   the track or `fallback_item_width` when unmeasurable.
//! - previous control disabled iff `index == 0`.
//! - next control disabled iff `index >= max_index`.
//! - controls wrapper visible iff `item_count > page_size`.
//!
//! An empty carousel is inert from construction: controls are hidden and
//! disabled once and every later operation reports `Inert`.

use crate::debounce::Debounce;
use crate::metrics::{CarouselMetrics, CarouselMetricsSnapshot};
use crate::surface::{Bindings, ControlState};
use core_config::{CarouselConfig, StepPolicy};
use core_events::NavDirection;
use core_layout::{Breakpoints, PageSizeTable, Viewport, ViewportClass};
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

#[derive(Debug, Clone, PartialEq)]
pub struct CarouselOptions {
    pub step: StepPolicy,
    pub gap: f32,
    pub fallback_item_width: f32,
    pub debounce: Duration,
    pub breakpoints: Breakpoints,
    pub page_sizes: PageSizeTable,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self::from_config(&CarouselConfig::default())
    }
}

impl CarouselOptions {
    pub fn from_config(cfg: &CarouselConfig) -> Self {
        Self {
            step: cfg.step,
            gap: cfg.gap,
            fallback_item_width: cfg.fallback_item_width,
            debounce: Duration::from_millis(cfg.debounce_ms),
            breakpoints: Breakpoints::from_config(&cfg.breakpoints),
            page_sizes: PageSizeTable::from_config(&cfg.page_sizes),
        }
    }

    pub fn with_step(mut self, step: StepPolicy) -> Self {
        self.step = step;
        self
    }

    pub fn with_page_sizes(mut self, page_sizes: PageSizeTable) -> Self {
        self.page_sizes = page_sizes;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Moved { from: usize, to: usize },
    /// Already at the first (PREV) or last (NEXT) position; nothing rendered.
    AtBoundary,
    /// Empty or torn-down carousel.
    Inert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    Applied {
        viewport: Viewport,
        /// Index before clamping, when the new page size forced a clamp.
        reclamped_from: Option<usize>,
    },
    Inert,
}

/// Serializable view of a carousel after its last render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselSnapshot {
    pub id: String,
    pub item_count: usize,
    pub viewport_width: u32,
    pub class: ViewportClass,
    pub page_size: usize,
    pub index: usize,
    pub max_index: usize,
    pub offset: f32,
    pub item_width: f32,
    pub prev_disabled: bool,
    pub next_disabled: bool,
    pub controls_visible: bool,
    pub inert: bool,
}

#[derive(Debug)]
pub struct Carousel {
    id: String,
    item_count: usize,
    options: CarouselOptions,
    viewport: Viewport,
    index: usize,
    offset: f32,
    item_width: f32,
    controls: ControlState,
    bindings: Bindings,
    resize: Debounce<u32>,
    metrics: CarouselMetrics,
    torn_down: bool,
}

impl Carousel {
    /// Build a controller for `item_count` cards and render its initial state
    /// at `viewport_width`.
    pub fn mount(
        id: impl Into<String>,
        item_count: usize,
        bindings: Bindings,
        options: CarouselOptions,
        viewport_width: u32,
    ) -> Self {
        let viewport = Viewport::resolve(viewport_width, &options.breakpoints, &options.page_sizes);
        let mut carousel = Self {
            id: id.into(),
            item_count,
            resize: Debounce::new(options.debounce),
            item_width: options.fallback_item_width,
            options,
            viewport,
            index: 0,
            offset: 0.0,
            controls: ControlState::PREV_DISABLED | ControlState::NEXT_DISABLED,
            bindings,
            metrics: CarouselMetrics::default(),
            torn_down: false,
        };

        if item_count == 0 {
            carousel.bindings.apply_controls(carousel.controls);
            debug!(target: "carousel", id = carousel.id.as_str(), "carousel_empty_inert");
            return carousel;
        }

        carousel.render();
        debug!(
            target: "carousel",
            id = carousel.id.as_str(),
            item_count,
            width = viewport_width,
            class = viewport.class.as_str(),
            page_size = viewport.page_size,
            step = carousel.options.step.as_str(),
            "carousel_mounted"
        );
        carousel
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn page_size(&self) -> usize {
        self.viewport.page_size
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn controls(&self) -> ControlState {
        self.controls
    }

    pub fn max_index(&self) -> usize {
        self.viewport.max_index(self.item_count)
    }

    pub fn is_inert(&self) -> bool {
        self.item_count == 0 || self.torn_down
    }

    pub fn metrics_snapshot(&self) -> CarouselMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn step(&self) -> usize {
        match self.options.step {
            StepPolicy::Page => self.viewport.page_size,
            StepPolicy::Item => 1,
        }
    }

    /// Move one step towards `direction`, clamped to the valid index range.
    pub fn advance(&mut self, direction: NavDirection) -> AdvanceOutcome {
        if self.is_inert() {
            return AdvanceOutcome::Inert;
        }
        let from = self.index;
        let max = self.max_index();
        let to = match direction {
            NavDirection::Prev if from == 0 => None,
            NavDirection::Prev => Some(from.saturating_sub(self.step())),
            NavDirection::Next if from >= max => None,
            NavDirection::Next => Some((from + self.step()).min(max)),
        };
        let Some(to) = to else {
            self.metrics.incr_boundary_noop();
            trace!(target: "carousel", id = self.id.as_str(), direction = direction.as_str(), index = from, "advance_at_boundary");
            return AdvanceOutcome::AtBoundary;
        };

        self.index = to;
        self.render();
        self.metrics.incr_advance();
        debug!(
            target: "carousel",
            id = self.id.as_str(),
            direction = direction.as_str(),
            from,
            to,
            offset = self.offset,
            "carousel_advance"
        );
        AdvanceOutcome::Moved { from, to }
    }

    /// Record a raw resize event. The resize is applied by a later
    /// [`poll_resize`](Self::poll_resize) once the debounce window has elapsed
    /// since the last call. Returns `false` for inert carousels.
    pub fn notify_resize(&mut self, width: u32, now: Instant) -> bool {
        if self.is_inert() {
            return false;
        }
        let collapsed = self.resize.schedule(width, now);
        self.metrics.incr_resize_event(collapsed);
        trace!(target: "carousel.resize", id = self.id.as_str(), width, collapsed, "resize_scheduled");
        true
    }

    /// Apply the pending resize if its window has elapsed.
    pub fn poll_resize(&mut self, now: Instant) -> Option<ResizeOutcome> {
        let width = self.resize.poll(now)?;
        Some(self.handle_resize(width))
    }

    pub fn resize_deadline(&self) -> Option<Instant> {
        self.resize.deadline()
    }

    /// Recompute page size for `width`, reclamp the index, reflow the track
    /// and re-render. Bypasses the debounce timer.
    pub fn handle_resize(&mut self, width: u32) -> ResizeOutcome {
        if self.is_inert() {
            return ResizeOutcome::Inert;
        }
        let viewport =
            Viewport::resolve(width, &self.options.breakpoints, &self.options.page_sizes);
        let max = viewport.max_index(self.item_count);
        let reclamped_from = (self.index > max).then_some(self.index);
        if reclamped_from.is_some() {
            self.index = max;
        }
        self.viewport = viewport;
        // Measurement below must see the layout of the new viewport.
        self.bindings.track_mut().reflow(viewport);
        self.render();
        self.metrics.incr_resize_applied(reclamped_from.is_some());
        debug!(
            target: "carousel.resize",
            id = self.id.as_str(),
            width,
            class = viewport.class.as_str(),
            page_size = viewport.page_size,
            index = self.index,
            reclamped_from = ?reclamped_from,
            "resize_applied"
        );
        ResizeOutcome::Applied {
            viewport,
            reclamped_from,
        }
    }

    /// Cancel the pending resize timer and make the instance inert.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        let cancelled = self.resize.cancel();
        self.torn_down = true;
        debug!(target: "carousel", id = self.id.as_str(), cancelled_resize = cancelled, "carousel_teardown");
    }

    pub fn snapshot(&self) -> CarouselSnapshot {
        CarouselSnapshot {
            id: self.id.clone(),
            item_count: self.item_count,
            viewport_width: self.viewport.width,
            class: self.viewport.class,
            page_size: self.viewport.page_size,
            index: self.index,
            max_index: self.max_index(),
            offset: self.offset,
            item_width: self.item_width,
            prev_disabled: self.controls.contains(ControlState::PREV_DISABLED),
            next_disabled: self.controls.contains(ControlState::NEXT_DISABLED),
            controls_visible: self.controls.contains(ControlState::VISIBLE),
            inert: self.is_inert(),
        }
    }

    fn render(&mut self) {
        let width = match self.bindings.measure_item_width() {
            Some(w) if w.is_finite() && w > 0.0 => w,
            other => {
                self.metrics.incr_fallback_width();
                trace!(target: "carousel", id = self.id.as_str(), measured = ?other, "item_width_fallback");
                self.options.fallback_item_width
            }
        };
        self.item_width = width;
        self.offset = if self.index == 0 {
            0.0
        } else {
            -(self.index as f32 * (width + self.options.gap))
        };
        self.bindings.track_mut().apply_offset(self.offset);

        let mut state = ControlState::empty();
        if self.index == 0 {
            state |= ControlState::PREV_DISABLED;
        }
        if self.index >= self.max_index() {
            state |= ControlState::NEXT_DISABLED;
        }
        if !self.viewport.fits(self.item_count) {
            state |= ControlState::VISIBLE;
        }
        self.controls = state;
        self.bindings.apply_controls(state);
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.resize.cancel();
    }
}
