#![forbid(unsafe_code)]

//! Popover: floating panel anchored to a trigger and toggled by tapping it.

use veil_core::{Event, Rect, Size};

use crate::disclosure::Disclosure;
use crate::env::Env;
use crate::floating::TriggerTap;
use crate::overlay::{EventOutcome, OverlayOptions};
use crate::position::{Placement, Side};
use crate::surface::{Surface, SurfacePlacement, TriggerAnchor};
use crate::transition::{Completion, TransitionPhase};

/// Floating panel toggled by tapping its trigger.
#[derive(Debug)]
pub struct Popover {
    surface: Surface,
    anchor: TriggerAnchor,
    tap: TriggerTap,
}

impl Popover {
    #[must_use]
    pub fn new(
        env: &Env,
        disclosure: Disclosure,
        anchor: impl Into<TriggerAnchor>,
        content_size: Size,
    ) -> Self {
        let anchor = anchor.into();
        Self {
            surface: Surface::new(
                env,
                disclosure,
                SurfacePlacement::Anchored {
                    anchor: anchor.clone(),
                    placement: env.placement(Side::Bottom),
                },
                OverlayOptions::floating(),
                content_size,
            ),
            anchor,
            tap: TriggerTap::default(),
        }
    }

    /// Preferred placement relative to the trigger.
    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.surface.set_placement(SurfacePlacement::Anchored {
            anchor: self.anchor.clone(),
            placement,
        });
        self.surface.reposition();
        self
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.surface.is_open()
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.surface.phase()
    }

    /// Side actually used after flipping.
    #[must_use]
    pub fn side(&self) -> Option<Side> {
        self.surface.side()
    }

    #[must_use]
    pub fn content_rect(&self) -> Option<Rect> {
        self.surface.content_rect()
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    pub fn open(&mut self) -> bool {
        self.surface.open()
    }

    pub fn close(&mut self) -> bool {
        self.surface.close()
    }

    pub fn toggle(&mut self) -> bool {
        self.surface.toggle()
    }

    pub fn set_open(&mut self, open: Option<bool>) {
        self.surface.set_open(open);
    }

    pub fn sync(&mut self) -> Option<Completion> {
        self.surface.sync()
    }

    /// Route input. A tap on the trigger opens; while open, any outside tap
    /// (the trigger included) closes.
    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        let outcome = self.surface.handle_event(event);
        if outcome != EventOutcome::Ignored {
            return outcome;
        }
        if self.tap.feed(event, self.anchor.bounds()) {
            self.surface.open();
            return EventOutcome::Consumed;
        }
        EventOutcome::Ignored
    }

    pub fn unmount(&mut self) {
        self.surface.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use veil_core::PointerEvent;
    use veil_runtime::Scheduler;

    const T: Duration = Duration::ZERO;

    fn setup(trigger: Rect) -> (Scheduler, Popover) {
        let scheduler = Scheduler::new();
        let env = Env::new(Size::new(400.0, 800.0)).scheduler(scheduler.clone());
        let p = Popover::new(&env, Disclosure::default(), trigger, Size::new(200.0, 100.0));
        (scheduler, p)
    }

    fn tap(p: &mut Popover, x: f32, y: f32) -> EventOutcome {
        p.handle_event(&PointerEvent::down(x, y, T).into());
        p.handle_event(&PointerEvent::up(x, y, T).into())
    }

    #[test]
    fn trigger_tap_opens_below() {
        let (_s, mut p) = setup(Rect::new(20.0, 100.0, 80.0, 30.0));
        assert_eq!(tap(&mut p, 50.0, 110.0), EventOutcome::Consumed);
        assert!(p.is_open());
        assert_eq!(p.side(), Some(Side::Bottom));
        assert_eq!(p.content_rect(), Some(Rect::new(0.0, 136.0, 200.0, 100.0)));
    }

    #[test]
    fn tap_elsewhere_while_closed_is_ignored() {
        let (_s, mut p) = setup(Rect::new(20.0, 100.0, 80.0, 30.0));
        assert_eq!(tap(&mut p, 300.0, 500.0), EventOutcome::Ignored);
        assert!(!p.is_open());
    }

    #[test]
    fn second_trigger_tap_closes() {
        let (s, mut p) = setup(Rect::new(20.0, 100.0, 80.0, 30.0));
        tap(&mut p, 50.0, 110.0);
        s.advance(Duration::from_millis(200));
        assert_eq!(tap(&mut p, 50.0, 110.0), EventOutcome::DismissRequested);
        assert!(!p.is_open());
        s.advance(Duration::from_millis(150));
        p.sync();
        assert!(!p.surface().is_mounted());
    }

    #[test]
    fn flips_above_near_bottom_edge() {
        let (_s, p) = setup(Rect::new(20.0, 740.0, 80.0, 30.0));
        let mut p = p.placement(Placement::new(Side::Bottom));
        p.open();
        assert_eq!(p.side(), Some(Side::Top));
        assert!(p.surface().barrier_style().is_none());
    }
}
