//! Surfaces the controller writes to.
//!
//! A carousel region on the page consists of a track (the card container) and
//! up to three optional elements: previous control, next control and a
//! wrapper around both. The track is required; the others are resolved once
//! when [`Bindings`] is built and simply skipped when absent.

use core_layout::Viewport;
use std::fmt;

/// The card container.
pub trait Track {
    /// Translate the strip horizontally, in CSS pixels (negative moves left).
    fn apply_offset(&mut self, offset: f32);
    /// Rendered width of the first card. `None` when it cannot be measured
    /// (detached node, no layout yet).
    fn measure_item_width(&self) -> Option<f32>;
    /// Force layout for `viewport` so that the next measurement reflects it.
    fn reflow(&mut self, viewport: Viewport);
}

/// A previous or next button.
pub trait NavControl {
    fn set_disabled(&mut self, disabled: bool);
}

/// Element wrapping both controls; hidden when no scrolling is possible.
pub trait ControlsWrapper {
    fn set_visible(&mut self, visible: bool);
}

bitflags::bitflags! {
    /// Control state produced by a render pass.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ControlState: u8 {
        const PREV_DISABLED = 0b0000_0001;
        const NEXT_DISABLED = 0b0000_0010;
        const VISIBLE       = 0b0000_0100;
    }
}

pub struct Bindings {
    track: Box<dyn Track>,
    prev: Option<Box<dyn NavControl>>,
    next: Option<Box<dyn NavControl>>,
    controls: Option<Box<dyn ControlsWrapper>>,
}

impl Bindings {
    pub fn new(track: impl Track + 'static) -> Self {
        Self {
            track: Box::new(track),
            prev: None,
            next: None,
            controls: None,
        }
    }

    pub fn with_prev(mut self, control: impl NavControl + 'static) -> Self {
        self.prev = Some(Box::new(control));
        self
    }

    pub fn with_next(mut self, control: impl NavControl + 'static) -> Self {
        self.next = Some(Box::new(control));
        self
    }

    pub fn with_controls(mut self, wrapper: impl ControlsWrapper + 'static) -> Self {
        self.controls = Some(Box::new(wrapper));
        self
    }

    pub(crate) fn track_mut(&mut self) -> &mut dyn Track {
        self.track.as_mut()
    }

    pub(crate) fn measure_item_width(&self) -> Option<f32> {
        self.track.measure_item_width()
    }

    pub(crate) fn apply_controls(&mut self, state: ControlState) {
        if let Some(prev) = self.prev.as_mut() {
            prev.set_disabled(state.contains(ControlState::PREV_DISABLED));
        }
        if let Some(next) = self.next.as_mut() {
            next.set_disabled(state.contains(ControlState::NEXT_DISABLED));
        }
        if let Some(wrapper) = self.controls.as_mut() {
            wrapper.set_visible(state.contains(ControlState::VISIBLE));
        }
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bindings")
            .field("prev", &self.prev.is_some())
            .field("next", &self.next.is_some())
            .field("controls", &self.controls.is_some())
            .finish_non_exhaustive()
    }
}
