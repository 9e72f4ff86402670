//! Headless stand-ins for the page elements a carousel binds to. They lay
//! cards out the way the stylesheet does (cards share the track width minus
//! the gaps) and trace every write.

use core_carousel::{Bindings, ControlsWrapper, NavControl, Track};
use core_layout::Viewport;
use tracing::trace;

pub struct SimTrack {
    id: String,
    gap: f32,
    card_width: Option<f32>,
}

impl SimTrack {
    pub fn new(id: &str, gap: f32, viewport: Viewport) -> Self {
        let mut track = Self {
            id: id.to_string(),
            gap,
            card_width: None,
        };
        track.layout(viewport);
        track
    }

    fn layout(&mut self, viewport: Viewport) {
        let per_page = viewport.page_size as f32;
        let width = (viewport.width as f32 - self.gap * (per_page - 1.0)) / per_page;
        self.card_width = (width.is_finite() && width > 0.0).then_some(width);
    }
}

impl Track for SimTrack {
    fn apply_offset(&mut self, offset: f32) {
        trace!(target: "carousel", id = self.id.as_str(), offset, "track_transform");
    }

    fn measure_item_width(&self) -> Option<f32> {
        self.card_width
    }

    fn reflow(&mut self, viewport: Viewport) {
        self.layout(viewport);
        trace!(
            target: "carousel.resize",
            id = self.id.as_str(),
            width = viewport.width,
            card_width = ?self.card_width,
            "track_reflow"
        );
    }
}

pub struct SimButton {
    id: String,
    role: &'static str,
}

impl NavControl for SimButton {
    fn set_disabled(&mut self, disabled: bool) {
        trace!(target: "carousel", id = self.id.as_str(), role = self.role, disabled, "control_disabled");
    }
}

pub struct SimControls {
    id: String,
}

impl ControlsWrapper for SimControls {
    fn set_visible(&mut self, visible: bool) {
        trace!(target: "carousel", id = self.id.as_str(), visible, "controls_visibility");
    }
}

/// Bindings with every optional element present.
pub fn bindings(id: &str, gap: f32, viewport: Viewport) -> Bindings {
    Bindings::new(SimTrack::new(id, gap, viewport))
        .with_prev(SimButton {
            id: id.to_string(),
            role: "prev",
        })
        .with_next(SimButton {
            id: id.to_string(),
            role: "next",
        })
        .with_controls(SimControls { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_layout::{Breakpoints, PageSizeTable};

    #[test]
    fn cards_share_the_track_width() {
        let vp = Viewport::resolve(1280, &Breakpoints::default(), &PageSizeTable::default());
        let mut track = SimTrack::new("latest", 20.0, vp);
        assert_eq!(track.measure_item_width(), Some(305.0));

        let vp = Viewport::resolve(600, &Breakpoints::default(), &PageSizeTable::default());
        track.reflow(vp);
        assert_eq!(track.measure_item_width(), Some(290.0));
    }

    #[test]
    fn degenerate_width_is_unmeasurable() {
        let vp = Viewport::resolve(10, &Breakpoints::default(), &PageSizeTable::default());
        let track = SimTrack::new("latest", 20.0, vp);
        assert_eq!(track.measure_item_width(), None);
    }
}
