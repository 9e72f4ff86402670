//! End-to-end controller scenarios against a recording page.

mod common;

use common::*;
use core_carousel::{
    AdvanceOutcome, CarouselOptions, ControlState, NavDirection, ResizeOutcome, StepPolicy,
};
use core_layout::ViewportClass;
use pretty_assertions::assert_eq;

const DESKTOP: u32 = 1280; // L, page size 4
const TABLET: u32 = 900; // M, page size 3
const PHONE: u32 = 600; // S, page size 2

#[test]
fn page_step_walks_to_clamped_end() {
    let (mut c, page) = mount_recorded(10, DESKTOP, CarouselOptions::default());
    assert_eq!(c.page_size(), 4);
    assert_eq!(c.index(), 0);
    assert_eq!(page.borrow().prev_disabled, Some(true));
    assert_eq!(page.borrow().next_disabled, Some(false));
    assert_eq!(page.borrow().controls_visible, Some(true));

    assert_eq!(c.advance(NavDirection::Next), AdvanceOutcome::Moved { from: 0, to: 4 });
    assert_eq!(c.offset(), -4.0 * (CARD_WIDTH + GAP));
    assert_eq!(page.borrow().offsets.last().copied(), Some(-1080.0));
    assert_eq!(page.borrow().prev_disabled, Some(false));

    // Second NEXT clamps to max_index = 10 - 4.
    assert_eq!(c.advance(NavDirection::Next), AdvanceOutcome::Moved { from: 4, to: 6 });
    assert_eq!(c.max_index(), 6);
    assert_eq!(page.borrow().next_disabled, Some(true));
    assert!(c.controls().contains(ControlState::NEXT_DISABLED));

    let renders = page.borrow().offsets.len();
    assert_eq!(c.advance(NavDirection::Next), AdvanceOutcome::AtBoundary);
    assert_eq!(page.borrow().offsets.len(), renders, "boundary no-op does not render");

    assert_eq!(c.advance(NavDirection::Prev), AdvanceOutcome::Moved { from: 6, to: 2 });
    assert_eq!(c.advance(NavDirection::Prev), AdvanceOutcome::Moved { from: 2, to: 0 });
    assert_eq!(c.offset(), 0.0);
    assert_eq!(page.borrow().prev_disabled, Some(true));
    assert_eq!(c.advance(NavDirection::Prev), AdvanceOutcome::AtBoundary);

    let m = c.metrics_snapshot();
    assert_eq!(m.advances, 4);
    assert_eq!(m.boundary_noops, 2);
}

#[test]
fn item_step_resize_keeps_index_and_reenables_next() {
    let options = CarouselOptions::default().with_step(StepPolicy::Item);
    let (mut c, page) = mount_recorded(10, DESKTOP, options);
    for _ in 0..6 {
        c.advance(NavDirection::Next);
    }
    assert_eq!(c.index(), 6);
    assert_eq!(page.borrow().next_disabled, Some(true));

    let out = c.handle_resize(TABLET);
    let ResizeOutcome::Applied { viewport, reclamped_from } = out else {
        panic!("expected applied resize, got {out:?}");
    };
    assert_eq!(viewport.class, ViewportClass::M);
    assert_eq!(viewport.page_size, 3);
    assert_eq!(reclamped_from, None);
    assert_eq!(c.max_index(), 7);
    assert_eq!(c.index(), 6);
    assert_eq!(page.borrow().next_disabled, Some(false));
    assert_eq!(c.advance(NavDirection::Next), AdvanceOutcome::Moved { from: 6, to: 7 });
}

#[test]
fn growing_page_size_reclamps_index() {
    let (mut c, page) = mount_recorded(5, PHONE, CarouselOptions::default());
    assert_eq!(c.page_size(), 2);
    c.advance(NavDirection::Next);
    c.advance(NavDirection::Next);
    assert_eq!(c.index(), 3);

    let out = c.handle_resize(DESKTOP);
    assert!(matches!(
        out,
        ResizeOutcome::Applied { reclamped_from: Some(3), .. }
    ));
    assert_eq!(c.index(), 1);
    assert_eq!(c.offset(), expected_offset(1, CARD_WIDTH));
    assert_eq!(page.borrow().next_disabled, Some(true));
    assert_eq!(page.borrow().prev_disabled, Some(false));
    assert_eq!(c.metrics_snapshot().index_reclamped, 1);
}

#[test]
fn empty_collection_is_inert() {
    let (mut c, page) = mount_recorded(0, DESKTOP, CarouselOptions::default());
    assert!(c.is_inert());
    {
        let p = page.borrow();
        assert_eq!(p.controls_visible, Some(false));
        assert_eq!(p.prev_disabled, Some(true));
        assert_eq!(p.next_disabled, Some(true));
        assert!(p.offsets.is_empty(), "empty carousel never touches the track");
    }
    assert_eq!(c.advance(NavDirection::Next), AdvanceOutcome::Inert);
    assert_eq!(c.advance(NavDirection::Prev), AdvanceOutcome::Inert);
    assert_eq!(c.index(), 0);
    assert!(!c.notify_resize(500, std::time::Instant::now()));
    assert_eq!(c.handle_resize(500), ResizeOutcome::Inert);
    assert!(page.borrow().reflows.is_empty());
    assert!(c.snapshot().inert);
}

#[test]
fn fits_on_one_page_hides_controls() {
    let (mut c, page) = mount_recorded(4, DESKTOP, CarouselOptions::default());
    let p = page.borrow();
    assert_eq!(p.prev_disabled, Some(true));
    assert_eq!(p.next_disabled, Some(true));
    assert_eq!(p.controls_visible, Some(false));
    assert_eq!(p.offsets, vec![0.0]);
    drop(p);
    assert_eq!(c.advance(NavDirection::Next), AdvanceOutcome::AtBoundary);

    // Shrinking the viewport makes scrolling possible again.
    c.handle_resize(TABLET);
    assert_eq!(page.borrow().controls_visible, Some(true));
    assert_eq!(page.borrow().next_disabled, Some(false));
}

#[test]
fn reflow_happens_before_measurement() {
    let widths = [150.0, 220.0, 260.0, 300.0];
    let (mut c, page) = mount_sized(
        12,
        DESKTOP,
        CarouselOptions::default().with_step(StepPolicy::Item),
        Sizing::PerClass(widths),
    );
    c.advance(NavDirection::Next);
    assert_eq!(c.offset(), expected_offset(1, 300.0));

    c.handle_resize(PHONE);
    let p = page.borrow();
    assert_eq!(p.reflows.len(), 1);
    assert_eq!(p.reflows[0].class, ViewportClass::S);
    assert_eq!(p.offsets.last().copied(), Some(expected_offset(1, 220.0)));
    assert_eq!(c.snapshot().item_width, 220.0);
}

#[test]
fn unmeasurable_track_falls_back() {
    let (mut c, _page) = mount_sized(
        10,
        DESKTOP,
        CarouselOptions::default(),
        Sizing::Unmeasurable,
    );
    c.advance(NavDirection::Next);
    assert_eq!(c.offset(), -4.0 * (280.0 + GAP));
    assert_eq!(c.snapshot().item_width, 280.0);
}

#[test]
fn missing_optional_bindings_do_not_panic() {
    let (mut c, page) = mount_bare("more", 6, PHONE, CarouselOptions::default());
    assert_eq!(c.advance(NavDirection::Next), AdvanceOutcome::Moved { from: 0, to: 2 });
    c.handle_resize(DESKTOP);
    let p = page.borrow();
    assert_eq!(p.prev_disabled, None);
    assert_eq!(p.next_disabled, None);
    assert_eq!(p.controls_visible, None);
    assert_eq!(c.index(), 2);
    let snap = c.snapshot();
    assert!(snap.next_disabled);
    assert!(!snap.prev_disabled);
    assert!(snap.controls_visible);
}

#[test]
fn handle_resize_is_idempotent() {
    let (mut c, _page) = mount_recorded(9, DESKTOP, CarouselOptions::default());
    c.advance(NavDirection::Next);
    c.handle_resize(PHONE);
    let once = c.snapshot();
    c.handle_resize(PHONE);
    assert_eq!(c.snapshot(), once);
}

#[test]
fn custom_page_table_changes_xs_size() {
    let options =
        CarouselOptions::default().with_page_sizes(core_layout::PageSizeTable::new(1, 2, 3, 4));
    let (mut c, _page) = mount_recorded(3, 320, options);
    assert_eq!(c.viewport().class, ViewportClass::Xs);
    assert_eq!(c.page_size(), 1);
    assert_eq!(c.advance(NavDirection::Next), AdvanceOutcome::Moved { from: 0, to: 1 });
}
