#![forbid(unsafe_code)]

//! Integration tests: anchored placement is pure, flips once, and stays on
//! screen.

use proptest::prelude::*;
use veil_core::{Rect, Size};
use veil_harness::strategies::{anchor_within, content_within, corner_anchor, side, viewport};
use veil_harness::TestHost;
use veil_widgets::{Align, Disclosure, Placement, Popover, Side, resolve_placement, resolve_position};

fn on_screen(r: Rect, viewport: Size) -> bool {
    r.x >= 0.0 && r.y >= 0.0 && r.right() <= viewport.width + 1e-3 && r.bottom() <= viewport.height + 1e-3
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn same_inputs_same_position(
        (vp, anchor, content) in viewport().prop_flat_map(|vp| (Just(vp), anchor_within(vp), content_within(vp))),
        preferred in side(),
    ) {
        let a = resolve_position(anchor, content, vp, preferred);
        let b = resolve_position(anchor, content, vp, preferred);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn fitting_content_stays_in_viewport(
        (vp, anchor, content) in viewport().prop_flat_map(|vp| (Just(vp), anchor_within(vp), content_within(vp))),
        preferred in side(),
    ) {
        let pos = resolve_position(anchor, content, vp, preferred);
        prop_assert!(on_screen(pos.rect(content), vp), "{pos:?} {content:?} in {vp:?}");
    }

    #[test]
    fn corner_anchor_never_double_flips(
        (vp, anchor, content) in viewport().prop_flat_map(|vp| {
            (Just(vp), corner_anchor(vp, 20.0), content_within(vp))
        }),
        preferred in side(),
    ) {
        let pos = resolve_position(anchor, content, vp, preferred);
        prop_assert!(
            pos.side == preferred || pos.side == preferred.opposite(),
            "resolved to {:?} from {:?}", pos.side, preferred,
        );
        prop_assert!(on_screen(pos.rect(content), vp));
    }

    #[test]
    fn alignment_never_escapes_viewport(
        (vp, anchor, content) in viewport().prop_flat_map(|vp| (Just(vp), anchor_within(vp), content_within(vp))),
        preferred in side(),
        align in prop_oneof![Just(Align::Start), Just(Align::Center), Just(Align::End)],
        offset in 0.0f32..24.0,
    ) {
        let placement = Placement::new(preferred).align(align).offset(offset);
        let pos = resolve_placement(anchor, content, vp, placement);
        prop_assert!(on_screen(pos.rect(content), vp));
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn bottom_right_corner_flips_up_and_clamps() {
    let vp = Size::new(390.0, 844.0);
    let anchor = Rect::new(370.0, 820.0, 20.0, 20.0);
    let content = Size::new(200.0, 150.0);
    let pos = resolve_position(anchor, content, vp, Side::Bottom);
    assert_eq!(pos.side, Side::Top);
    assert_eq!(pos.left, 190.0);
    assert_eq!(pos.top, 820.0 - 6.0 - 150.0);
}

#[test]
fn content_fitting_neither_side_keeps_preferred_and_clamps() {
    let vp = Size::new(390.0, 400.0);
    let anchor = Rect::new(100.0, 180.0, 40.0, 40.0);
    let content = Size::new(100.0, 300.0);
    let pos = resolve_position(anchor, content, vp, Side::Bottom);
    assert_eq!(pos.side, Side::Bottom);
    assert_eq!(pos.top, 100.0);
    assert!(on_screen(pos.rect(content), vp));
}

#[test]
fn anchor_sampled_when_presented_not_tracked() {
    use std::cell::Cell;
    use std::rc::Rc;
    use veil_widgets::TriggerAnchor;

    let host = TestHost::default();
    let y = Rc::new(Cell::new(100.0_f32));
    let y_src = Rc::clone(&y);
    let anchor = TriggerAnchor::new(move || Rect::new(40.0, y_src.get(), 80.0, 30.0));
    let mut pop = Popover::new(host.env(), Disclosure::new(false), anchor, Size::new(120.0, 60.0));
    pop.open();
    let first = pop.content_rect().expect("presented");
    y.set(300.0);
    assert_eq!(pop.content_rect(), Some(first));
    pop.surface_mut().reposition();
    assert_eq!(pop.content_rect().map(|r| r.y), Some(336.0));
}
