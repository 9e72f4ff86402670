#![allow(dead_code)]

use core_carousel::{Bindings, Carousel, CarouselOptions, ControlsWrapper, NavControl, Track};
use core_layout::{Viewport, ViewportClass};
use std::cell::RefCell;
use std::rc::Rc;

/// Everything the controller wrote to the fake page.
#[derive(Debug, Default)]
pub struct Page {
    pub offsets: Vec<f32>,
    pub reflows: Vec<Viewport>,
    pub prev_disabled: Option<bool>,
    pub next_disabled: Option<bool>,
    pub controls_visible: Option<bool>,
    pub item_width: Option<f32>,
}

pub type SharedPage = Rc<RefCell<Page>>;

/// How the fake track sizes its cards.
#[derive(Clone, Copy)]
pub enum Sizing {
    Fixed(f32),
    /// Width depends on the viewport class; only updated on reflow, like a
    /// stylesheet media query that has not been recomputed yet.
    PerClass([f32; 4]),
    Unmeasurable,
}

pub struct RecordingTrack {
    page: SharedPage,
    sizing: Sizing,
}

impl RecordingTrack {
    pub fn new(page: SharedPage, sizing: Sizing, initial: ViewportClass) -> Self {
        let width = match sizing {
            Sizing::Fixed(w) => Some(w),
            Sizing::PerClass(table) => Some(table[initial as usize]),
            Sizing::Unmeasurable => None,
        };
        page.borrow_mut().item_width = width;
        Self { page, sizing }
    }
}

impl Track for RecordingTrack {
    fn apply_offset(&mut self, offset: f32) {
        self.page.borrow_mut().offsets.push(offset);
    }

    fn measure_item_width(&self) -> Option<f32> {
        self.page.borrow().item_width
    }

    fn reflow(&mut self, viewport: Viewport) {
        let mut page = self.page.borrow_mut();
        page.reflows.push(viewport);
        if let Sizing::PerClass(table) = self.sizing {
            page.item_width = Some(table[viewport.class as usize]);
        }
    }
}

pub struct RecordingControl {
    page: SharedPage,
    is_prev: bool,
}

impl NavControl for RecordingControl {
    fn set_disabled(&mut self, disabled: bool) {
        let mut page = self.page.borrow_mut();
        if self.is_prev {
            page.prev_disabled = Some(disabled);
        } else {
            page.next_disabled = Some(disabled);
        }
    }
}

pub struct RecordingWrapper(SharedPage);

impl ControlsWrapper for RecordingWrapper {
    fn set_visible(&mut self, visible: bool) {
        self.0.borrow_mut().controls_visible = Some(visible);
    }
}

pub const CARD_WIDTH: f32 = 250.0;
pub const GAP: f32 = 20.0;

pub fn class_for(width: u32) -> ViewportClass {
    CarouselOptions::default().breakpoints.classify(width)
}

pub fn full_bindings(page: &SharedPage, sizing: Sizing, width: u32) -> Bindings {
    Bindings::new(RecordingTrack::new(page.clone(), sizing, class_for(width)))
        .with_prev(RecordingControl {
            page: page.clone(),
            is_prev: true,
        })
        .with_next(RecordingControl {
            page: page.clone(),
            is_prev: false,
        })
        .with_controls(RecordingWrapper(page.clone()))
}

/// Carousel with every binding present and fixed-width cards.
pub fn mount_recorded(n: usize, width: u32, options: CarouselOptions) -> (Carousel, SharedPage) {
    mount_sized(n, width, options, Sizing::Fixed(CARD_WIDTH))
}

pub fn mount_sized(
    n: usize,
    width: u32,
    options: CarouselOptions,
    sizing: Sizing,
) -> (Carousel, SharedPage) {
    let page = SharedPage::default();
    let carousel = Carousel::mount("latest", n, full_bindings(&page, sizing, width), options, width);
    (carousel, page)
}

/// Carousel whose only binding is the track.
pub fn mount_bare(id: &str, n: usize, width: u32, options: CarouselOptions) -> (Carousel, SharedPage) {
    let page = SharedPage::default();
    let track = RecordingTrack::new(page.clone(), Sizing::Fixed(CARD_WIDTH), class_for(width));
    let carousel = Carousel::mount(id, n, Bindings::new(track), options, width);
    (carousel, page)
}

pub fn expected_offset(index: usize, item_width: f32) -> f32 {
    if index == 0 {
        0.0
    } else {
        -(index as f32 * (item_width + GAP))
    }
}
