#![forbid(unsafe_code)]

//! Disclosure + transition + overlay host, wired together.
//!
//! Every overlay-style component (dialog, sheet, popover, menu, tooltip, ...)
//! is a [`Surface`] with a particular placement and set of overlay options.
//!
//! The host calls [`Surface::sync`] after advancing the scheduler (once per
//! frame is enough). `sync` starts enter/exit animations for open-state
//! changes and removes the content once the exit animation has finished.
//! Every mutating method syncs on its own.
//!
//! # Invariants
//!
//! 1. Content is presented when the disclosure opens and removed only after
//!    the transition reaches `Closed`, never directly on close.
//! 2. Anchored placement samples the anchor bounds once per presentation.
//! 3. After [`Surface::unmount`], no timer is pending and no callback fires.

use std::fmt;
use std::rc::Rc;

use veil_core::{Event, Point, Rect, Size};
use veil_style::Style;

use crate::disclosure::Disclosure;
use crate::env::Env;
use crate::overlay::{EventOutcome, OverlayHost, OverlayOptions};
use crate::position::{self, Placement, Side, resolve_placement};
use crate::transition::{Completion, Transition, TransitionPhase};

/// Geometry of the element that opens a surface.
#[derive(Clone)]
pub struct TriggerAnchor {
    bounds: Rc<dyn Fn() -> Rect>,
}

impl TriggerAnchor {
    /// Anchor whose bounds are queried from `provider` at presentation time.
    pub fn new(provider: impl Fn() -> Rect + 'static) -> Self {
        Self {
            bounds: Rc::new(provider),
        }
    }

    /// Anchor with constant bounds.
    #[must_use]
    pub fn fixed(rect: Rect) -> Self {
        Self::new(move || rect)
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        (self.bounds)()
    }
}

impl fmt::Debug for TriggerAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerAnchor")
            .field("bounds", &self.bounds())
            .finish()
    }
}

impl From<Rect> for TriggerAnchor {
    fn from(rect: Rect) -> Self {
        Self::fixed(rect)
    }
}

/// Where presented content goes.
#[derive(Debug, Clone)]
pub enum SurfacePlacement {
    /// Centered in the viewport (dialogs).
    Centered,
    /// Next to a trigger (popovers, menus, tooltips).
    Anchored {
        anchor: TriggerAnchor,
        placement: Placement,
    },
    /// Attached to a viewport edge (sheets, drawers).
    Edge(Side),
    /// Below and right of a point (context menus).
    AtPoint(Point),
}

/// Animated, overlay-hosted disclosure.
pub struct Surface {
    env: Env,
    disclosure: Disclosure,
    transition: Transition,
    host: OverlayHost,
    placement: SurfacePlacement,
    options: OverlayOptions,
    content_size: Size,
    side: Option<Side>,
    /// Last resolved content rectangle.
    resting: Rect,
    /// Visual displacement of the content from `resting`.
    shift: Point,
    unmounted: bool,
}

impl fmt::Debug for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("open", &self.disclosure.is_open())
            .field("phase", &self.transition.phase())
            .field("presented", &self.host.is_presented())
            .field("placement", &self.placement)
            .field("unmounted", &self.unmounted)
            .finish()
    }
}

impl Surface {
    /// Surface for `disclosure`. An initially open disclosure is presented
    /// right away without an enter animation.
    #[must_use]
    pub fn new(
        env: &Env,
        disclosure: Disclosure,
        placement: SurfacePlacement,
        options: OverlayOptions,
        content_size: Size,
    ) -> Self {
        let mut surface = Self {
            env: env.clone(),
            transition: env.transition(),
            disclosure,
            host: OverlayHost::new(),
            placement,
            options,
            content_size,
            side: None,
            resting: Rect::default(),
            shift: Point::ORIGIN,
            unmounted: false,
        };
        if surface.disclosure.is_open() {
            surface.present();
            surface.transition.snap_to(true);
        }
        surface
    }

    // --- state ---

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.disclosure.is_open()
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.transition.phase()
    }

    /// Whether content is currently mounted in the overlay layer.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.host.is_presented() && self.transition.phase().is_visible()
    }

    #[must_use]
    pub fn is_unmounted(&self) -> bool {
        self.unmounted
    }

    #[must_use]
    pub fn disclosure(&self) -> &Disclosure {
        &self.disclosure
    }

    /// Direct access for wiring callbacks or control. Call [`Surface::sync`]
    /// after changing the open state through it.
    pub fn disclosure_mut(&mut self) -> &mut Disclosure {
        &mut self.disclosure
    }

    #[must_use]
    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    #[must_use]
    pub fn env(&self) -> &Env {
        &self.env
    }

    #[must_use]
    pub fn placement(&self) -> &SurfacePlacement {
        &self.placement
    }

    /// Side used for anchored content after flipping.
    #[must_use]
    pub fn side(&self) -> Option<Side> {
        self.side
    }

    /// Resolved content rectangle, before any shift.
    #[must_use]
    pub fn content_rect(&self) -> Option<Rect> {
        self.is_mounted().then(|| self.resting_rect()).flatten()
    }

    /// Where the content is drawn, and so where presses count as inside.
    #[must_use]
    pub fn hit_rect(&self) -> Option<Rect> {
        self.is_mounted().then(|| self.host.content_rect()).flatten()
    }

    /// Move the hit area along with content that is drawn displaced, such as a
    /// sheet mid-slide or a drawer mid-drag.
    pub fn set_shift(&mut self, shift: Point) {
        if let Some(rest) = self.resting_rect() {
            self.host.set_content_rect(rest.offset(shift.x, shift.y));
        }
        self.shift = shift;
    }

    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.transition.opacity()
    }

    #[must_use]
    pub fn scale(&self) -> f32 {
        self.transition.scale()
    }

    /// Barrier fill for the current animation frame, if modal.
    #[must_use]
    pub fn barrier_style(&self) -> Option<Style> {
        if !self.is_mounted() {
            return None;
        }
        self.host
            .barrier_style(&self.env.theme.load(), self.transition.value())
    }

    // --- requests ---

    pub fn open(&mut self) -> bool {
        let requested = self.disclosure.request_open();
        self.sync();
        requested
    }

    pub fn close(&mut self) -> bool {
        let requested = self.disclosure.request_close();
        self.sync();
        requested
    }

    pub fn toggle(&mut self) -> bool {
        let requested = self.disclosure.toggle();
        self.sync();
        requested
    }

    /// Push a parent-owned open value (`None` drops control).
    pub fn set_open(&mut self, open: Option<bool>) {
        self.disclosure.set_controlled(open);
        self.sync();
    }

    /// Change where the content goes. Takes effect on the next presentation,
    /// or immediately via [`Surface::reposition`].
    pub fn set_placement(&mut self, placement: SurfacePlacement) {
        self.placement = placement;
    }

    pub fn set_content_size(&mut self, size: Size) {
        self.content_size = size;
    }

    /// Viewport changed (rotation, resize). Re-resolves mounted content.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.env.viewport = viewport;
        self.reposition();
    }

    /// Recompute the content rectangle, sampling the anchor again.
    pub fn reposition(&mut self) {
        if self.host.is_presented() {
            self.resting = self.resolve_rect();
            self.host
                .set_content_rect(self.resting.offset(self.shift.x, self.shift.y));
        }
    }

    /// Reconcile the displayed open state with the animation and overlay.
    /// Returns the completion of an animation started by this call.
    pub fn sync(&mut self) -> Option<Completion> {
        if self.unmounted {
            return None;
        }
        let open = self.disclosure.is_open();
        let phase = self.transition.phase();
        let mut started = None;

        if open && !phase.is_opening_or_open() {
            if !self.host.is_presented() {
                self.present();
            }
            started = Some(self.transition.animate_open(self.env.config.enter_duration));
        } else if !open && phase.is_opening_or_open() {
            started = Some(self.transition.animate_close(self.env.config.exit_duration));
        }

        if !open && self.transition.phase() == TransitionPhase::Closed && self.host.is_presented() {
            self.host.dismiss();
            self.side = None;
            self.shift = Point::ORIGIN;
        }
        started
    }

    /// Route input through the overlay host. Outside taps and back presses
    /// become close requests.
    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        if self.unmounted {
            return EventOutcome::Ignored;
        }
        self.sync();
        let outcome = self.host.handle_event(event, &mut self.disclosure);
        if outcome == EventOutcome::DismissRequested {
            self.sync();
        }
        outcome
    }

    /// Close with no exit animation.
    pub fn close_immediately(&mut self) {
        self.disclosure.request_close();
        if !self.disclosure.is_open() {
            self.transition.snap_to(false);
        }
        self.sync();
    }

    /// Teardown: cancel timers, drop content without notifying, detach callbacks.
    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        self.transition.cancel();
        self.host.teardown();
        self.disclosure.detach();
        self.unmounted = true;
        tracing::debug!("surface unmounted");
    }

    fn present(&mut self) {
        self.resting = self.resolve_rect();
        self.host
            .present(self.resting.offset(self.shift.x, self.shift.y), self.options);
    }

    fn resting_rect(&self) -> Option<Rect> {
        self.host.is_presented().then_some(self.resting)
    }

    fn resolve_rect(&mut self) -> Rect {
        let viewport = self.env.viewport;
        let content = self.content_size;
        match &self.placement {
            SurfacePlacement::Centered => {
                self.side = None;
                position::centered(content, viewport)
            }
            SurfacePlacement::Edge(side) => {
                self.side = Some(*side);
                let extent = if side.is_vertical() {
                    content.height
                } else {
                    content.width
                };
                position::edge(*side, extent, viewport)
            }
            SurfacePlacement::Anchored { anchor, placement } => {
                let resolved = resolve_placement(anchor.bounds(), content, viewport, *placement);
                self.side = Some(resolved.side);
                resolved.rect(content)
            }
            SurfacePlacement::AtPoint(point) => {
                let anchor = Rect::from_origin_size(*point, Size::ZERO);
                let resolved = resolve_placement(
                    anchor,
                    content,
                    viewport,
                    Placement::new(Side::Bottom)
                        .align(position::Align::Start)
                        .offset(0.0),
                );
                self.side = Some(resolved.side);
                resolved.rect(content)
            }
        }
    }
}

impl Drop for Surface {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::time::Duration;
    use veil_core::PointerEvent;
    use veil_runtime::Scheduler;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn env() -> (Scheduler, Env) {
        let scheduler = Scheduler::new();
        let env = Env::new(Size::new(400.0, 800.0)).scheduler(scheduler.clone());
        (scheduler, env)
    }

    fn dialog(env: &Env, log: &Rc<RefCell<Vec<bool>>>) -> Surface {
        let l = Rc::clone(log);
        Surface::new(
            env,
            Disclosure::new(false).on_open_change(move |o| l.borrow_mut().push(o)),
            SurfacePlacement::Centered,
            OverlayOptions::default(),
            Size::new(200.0, 100.0),
        )
    }

    // --- lifecycle ---

    #[test]
    fn open_presents_and_animates() {
        let (sched, env) = env();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut s = dialog(&env, &log);
        assert!(s.open());
        assert!(s.is_mounted());
        assert_eq!(s.phase(), TransitionPhase::Opening);
        assert_eq!(s.content_rect(), Some(Rect::new(100.0, 350.0, 200.0, 100.0)));
        sched.advance(ms(200));
        assert_eq!(s.phase(), TransitionPhase::Open);
        assert_eq!(s.opacity(), 1.0);
        assert_eq!(*log.borrow(), vec![true]);
    }

    #[test]
    fn content_unmounts_only_after_exit() {
        let (sched, env) = env();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut s = dialog(&env, &log);
        s.open();
        sched.advance(ms(200));
        s.close();
        assert!(s.is_mounted(), "exit animation still playing");
        assert_eq!(s.phase(), TransitionPhase::Closing);
        sched.advance(ms(149));
        s.sync();
        assert!(s.is_mounted());
        sched.advance(ms(1));
        assert!(!s.is_mounted());
        s.sync();
        assert_eq!(s.content_rect(), None);
    }

    #[test]
    fn reopen_during_exit_reverses() {
        let (sched, env) = env();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut s = dialog(&env, &log);
        s.open();
        sched.advance(ms(200));
        s.close();
        sched.advance(ms(50));
        let mid = s.opacity();
        s.open();
        assert_eq!(s.phase(), TransitionPhase::Opening);
        assert_eq!(s.opacity(), mid);
        assert!(s.is_mounted());
    }

    #[test]
    fn default_open_mounts_without_animation() {
        let (sched, env) = env();
        let s = Surface::new(
            &env,
            Disclosure::new(true),
            SurfacePlacement::Edge(Side::Bottom),
            OverlayOptions::default(),
            Size::new(0.0, 300.0),
        );
        assert_eq!(s.phase(), TransitionPhase::Open);
        assert_eq!(s.content_rect(), Some(Rect::new(0.0, 500.0, 400.0, 300.0)));
        assert_eq!(s.side(), Some(Side::Bottom));
        assert_eq!(sched.pending(), 0);
    }

    // --- input ---

    #[test]
    fn outside_tap_closes() {
        let (sched, env) = env();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut s = dialog(&env, &log);
        s.open();
        sched.advance(ms(200));
        s.handle_event(&PointerEvent::down(5.0, 5.0, sched.now()).into());
        let out = s.handle_event(&PointerEvent::up(5.0, 5.0, sched.now()).into());
        assert_eq!(out, EventOutcome::DismissRequested);
        assert_eq!(s.phase(), TransitionPhase::Closing);
        assert_eq!(*log.borrow(), vec![true, false]);
        assert!(s.barrier_style().is_some());
    }

    // --- controlled ---

    #[test]
    fn controlled_surface_waits_for_parent() {
        let (_sched, env) = env();
        let mut s = Surface::new(
            &env,
            Disclosure::controlled(false),
            SurfacePlacement::Centered,
            OverlayOptions::default(),
            Size::new(10.0, 10.0),
        );
        assert!(s.open());
        assert!(!s.is_mounted());
        s.set_open(Some(true));
        assert!(s.is_mounted());
    }

    // --- anchored ---

    #[test]
    fn anchor_sampled_at_presentation() {
        let (_sched, env) = env();
        let bounds = Rc::new(RefCell::new(Rect::new(10.0, 760.0, 50.0, 30.0)));
        let b = Rc::clone(&bounds);
        let mut s = Surface::new(
            &env,
            Disclosure::default(),
            SurfacePlacement::Anchored {
                anchor: TriggerAnchor::new(move || *b.borrow()),
                placement: Placement::new(Side::Bottom),
            },
            OverlayOptions::floating(),
            Size::new(100.0, 100.0),
        );
        s.open();
        assert_eq!(s.side(), Some(Side::Top));
        let first = s.content_rect();
        *bounds.borrow_mut() = Rect::new(10.0, 10.0, 50.0, 30.0);
        assert_eq!(s.content_rect(), first, "not live-tracked");
        s.reposition();
        assert_eq!(s.side(), Some(Side::Bottom));
    }

    // --- teardown ---

    #[test]
    fn unmount_mid_animation_is_silent() {
        let (sched, env) = env();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut s = dialog(&env, &log);
        assert!(s.open());
        s.unmount();
        assert_eq!(sched.pending(), 0);
        sched.advance(ms(1000));
        assert_eq!(*log.borrow(), vec![true]);
        assert!(!s.open());
        assert_eq!(s.handle_event(&Event::Back), EventOutcome::Ignored);
    }

    #[test]
    fn snaps_without_animation_driver() {
        let env = Env::without_animation(Size::new(400.0, 800.0));
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut s = dialog(&env, &log);
        s.open();
        assert_eq!(s.phase(), TransitionPhase::Open);
        s.close();
        assert!(!s.is_mounted());
        assert_eq!(s.content_rect(), None);
    }

    // --- shift ---

    #[test]
    fn shift_moves_hit_area_but_not_resolved_rect() {
        let (_sched, env) = env();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut s = dialog(&env, &log);
        s.open();
        let rest = s.content_rect().expect("mounted");
        s.set_shift(Point::new(0.0, 120.0));
        assert_eq!(s.content_rect(), Some(rest));
        assert_eq!(s.hit_rect(), Some(rest.offset(0.0, 120.0)));
        let top = rest.y + 10.0;
        s.handle_event(&PointerEvent::down(200.0, top, Duration::ZERO).into());
        let out = s.handle_event(&PointerEvent::up(200.0, top, Duration::ZERO).into());
        assert_eq!(out, EventOutcome::DismissRequested);
        assert_eq!(*log.borrow(), vec![true, false]);
    }
}
