#![forbid(unsafe_code)]

//! Drag-to-dismiss for bottom sheets and drawers.
//!
//! State machine:
//!
//! ```text
//! Resting ──drag down──▶ Dragging ──release──▶ SnapBack ──▶ Resting
//!                            │
//!                            ├──release past threshold──▶ Dismissing ──▶ Dismissed
//!                            └──cancel──▶ SnapBack
//! ```
//!
//! # Invariants
//!
//! 1. The offset follows the pointer 1:1 and is never negative.
//! 2. Every gesture ends in `SnapBack` or `Dismissing`; a cancelled gesture
//!    always snaps back.
//! 3. The dismiss callback runs once, after the dismiss animation finishes.
//! 4. [`DragDismiss::cancel`] and `Drop` remove pending timers; no callback
//!    fires afterwards.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use veil_core::{PointerEvent, PointerPhase};
use veil_runtime::{Scheduler, TimerHandle, VeilConfig};

use crate::transition::{Easing, Tween};

/// Gesture phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Resting,
    Dragging,
    /// Animating back to rest.
    SnapBack,
    /// Animating off-screen.
    Dismissing,
    /// Off-screen; the dismiss callback has run.
    Dismissed,
}

/// Decision taken on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragRelease {
    SnapBack,
    Dismiss,
}

#[derive(Debug, Clone, Copy)]
struct Press {
    /// Pointer y at which the offset would be zero.
    origin_y: f32,
    last_y: f32,
    last_t: Duration,
}

struct Inner {
    phase: DragPhase,
    offset: f32,
    tween: Option<Tween>,
    timer: Option<TimerHandle>,
    on_dismiss: Option<Box<dyn FnMut()>>,
}

/// Vertical drag tracker for a bottom-anchored surface.
pub struct DragDismiss {
    inner: Rc<RefCell<Inner>>,
    scheduler: Option<Scheduler>,
    distance_threshold: f32,
    velocity_threshold: f32,
    /// Distance to travel off-screen (content height).
    extent: f32,
    duration: Duration,
    press: Option<Press>,
    /// Latest downward velocity in px/ms.
    velocity: f32,
}

impl fmt::Debug for DragDismiss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragDismiss")
            .field("phase", &self.phase())
            .field("offset", &self.offset())
            .field("velocity", &self.velocity)
            .finish()
    }
}

impl DragDismiss {
    /// Tracker for content `extent` px tall, with thresholds from `config`.
    #[must_use]
    pub fn new(scheduler: Option<Scheduler>, config: &VeilConfig, extent: f32) -> Self {
        let scheduler = if config.reduced_motion {
            None
        } else {
            scheduler
        };
        Self {
            inner: Rc::new(RefCell::new(Inner {
                phase: DragPhase::Resting,
                offset: 0.0,
                tween: None,
                timer: None,
                on_dismiss: None,
            })),
            scheduler,
            distance_threshold: config.drag_dismiss_distance,
            velocity_threshold: config.drag_dismiss_velocity,
            extent: extent.max(0.0),
            duration: config.exit_duration,
            press: None,
            velocity: 0.0,
        }
    }

    /// Called once when a dismissal finishes.
    #[must_use]
    pub fn on_dismiss(self, f: impl FnMut() + 'static) -> Self {
        self.inner.borrow_mut().on_dismiss = Some(Box::new(f));
        self
    }

    pub fn set_extent(&mut self, extent: f32) {
        self.extent = extent.max(0.0);
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.inner.borrow().phase
    }

    /// Current downward translation in px.
    #[must_use]
    pub fn offset(&self) -> f32 {
        let inner = self.inner.borrow();
        match (&inner.tween, &self.scheduler) {
            (Some(tween), Some(s)) => tween.value_at(s.now()),
            _ => inner.offset,
        }
    }

    /// Latest downward velocity in px/ms.
    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Feed a pointer sample. Returns the release decision on `Up`/`Cancel`
    /// of an active drag.
    pub fn handle_pointer(&mut self, event: &PointerEvent) -> Option<DragRelease> {
        let y = event.position.y;
        match event.phase {
            PointerPhase::Down => {
                if matches!(self.phase(), DragPhase::Dismissing | DragPhase::Dismissed) {
                    return None;
                }
                let current = self.offset();
                if self.phase() == DragPhase::SnapBack {
                    // Catch the sheet mid-animation.
                    self.stop_animation(current);
                    self.set_phase(DragPhase::Dragging);
                }
                self.velocity = 0.0;
                self.press = Some(Press {
                    origin_y: y - current,
                    last_y: y,
                    last_t: event.timestamp,
                });
                None
            }
            PointerPhase::Move => {
                let press = self.press.as_mut()?;
                let delta = y - press.origin_y;
                let dt = event.timestamp.saturating_sub(press.last_t).as_secs_f32() * 1000.0;
                if dt > 0.0 {
                    self.velocity = (y - press.last_y) / dt;
                }
                press.last_y = y;
                press.last_t = event.timestamp;

                let phase = self.phase();
                if phase == DragPhase::Resting && delta <= 0.0 {
                    return None;
                }
                if phase == DragPhase::Resting {
                    tracing::trace!("drag started");
                    self.set_phase(DragPhase::Dragging);
                }
                if self.phase() == DragPhase::Dragging {
                    self.inner.borrow_mut().offset = delta.max(0.0);
                }
                None
            }
            PointerPhase::Up => {
                self.press = None;
                (self.phase() == DragPhase::Dragging).then(|| self.release())
            }
            PointerPhase::Cancel => {
                self.press = None;
                if self.phase() == DragPhase::Dragging {
                    tracing::debug!("drag cancelled by host; snapping back");
                    self.animate_to(0.0, DragPhase::SnapBack);
                    Some(DragRelease::SnapBack)
                } else {
                    None
                }
            }
        }
    }

    /// Decide and animate the end of the current drag.
    pub fn release(&mut self) -> DragRelease {
        let offset = self.offset();
        let decision = if offset > self.distance_threshold || self.velocity > self.velocity_threshold
        {
            DragRelease::Dismiss
        } else {
            DragRelease::SnapBack
        };
        tracing::debug!(offset, velocity = self.velocity, ?decision, "drag released");
        match decision {
            DragRelease::Dismiss => self.animate_to(self.extent, DragPhase::Dismissing),
            DragRelease::SnapBack => self.animate_to(0.0, DragPhase::SnapBack),
        }
        decision
    }

    /// Back to rest with no animation, keeping the dismiss callback.
    pub fn reset(&mut self) {
        self.stop_animation(0.0);
        self.press = None;
        self.velocity = 0.0;
        self.set_phase(DragPhase::Resting);
    }

    /// Teardown: drop timers, tracking, and the dismiss callback.
    pub fn cancel(&mut self) {
        self.reset();
        self.inner.borrow_mut().on_dismiss = None;
    }

    fn set_phase(&self, phase: DragPhase) {
        self.inner.borrow_mut().phase = phase;
    }

    fn stop_animation(&self, offset: f32) {
        let timer = {
            let mut inner = self.inner.borrow_mut();
            inner.tween = None;
            inner.offset = offset;
            inner.timer.take()
        };
        if let (Some(timer), Some(s)) = (timer, &self.scheduler) {
            s.cancel(timer);
        }
    }

    fn animate_to(&mut self, target: f32, moving: DragPhase) {
        let from = self.offset();
        self.stop_animation(from);
        let settled = if moving == DragPhase::Dismissing {
            DragPhase::Dismissed
        } else {
            DragPhase::Resting
        };

        let scheduler = match &self.scheduler {
            Some(s) if !self.duration.is_zero() => s.clone(),
            _ => {
                self.set_phase(moving);
                settle(&self.inner, settled, target);
                return;
            }
        };

        let tween = Tween::new(from, target, scheduler.now(), self.duration).easing(Easing::EaseOut);
        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
        let timer = scheduler.schedule_after(self.duration, move || {
            if let Some(inner) = weak.upgrade() {
                settle(&inner, settled, target);
            }
        });
        let mut inner = self.inner.borrow_mut();
        inner.phase = moving;
        inner.tween = Some(tween);
        inner.timer = Some(timer);
    }
}

fn settle(inner: &Rc<RefCell<Inner>>, phase: DragPhase, offset: f32) {
    let callback = {
        let mut inner = inner.borrow_mut();
        inner.phase = phase;
        inner.offset = offset;
        inner.tween = None;
        inner.timer = None;
        if phase == DragPhase::Dismissed {
            inner.on_dismiss.take()
        } else {
            None
        }
    };
    if let Some(mut callback) = callback {
        tracing::debug!("drag dismissal finished");
        callback();
        let mut inner = inner.borrow_mut();
        if inner.on_dismiss.is_none() {
            inner.on_dismiss = Some(callback);
        }
    }
}

impl Drop for DragDismiss {
    fn drop(&mut self) {
        self.stop_animation(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn tracker() -> (Scheduler, DragDismiss, Rc<Cell<u32>>) {
        let scheduler = Scheduler::new();
        let closes = Rc::new(Cell::new(0));
        let c = Rc::clone(&closes);
        let drag = DragDismiss::new(Some(scheduler.clone()), &VeilConfig::default(), 400.0)
            .on_dismiss(move || c.set(c.get() + 1));
        (scheduler, drag, closes)
    }

    fn drag_to(drag: &mut DragDismiss, dy: f32, over: Duration) -> Option<DragRelease> {
        drag.handle_pointer(&PointerEvent::down(50.0, 100.0, ms(0)));
        drag.handle_pointer(&PointerEvent::moved(50.0, 100.0 + dy, over));
        drag.handle_pointer(&PointerEvent::up(50.0, 100.0 + dy, over))
    }

    // --- dragging ---

    #[test]
    fn offset_follows_pointer_and_clamps() {
        let (_s, mut drag, _) = tracker();
        drag.handle_pointer(&PointerEvent::down(0.0, 100.0, ms(0)));
        drag.handle_pointer(&PointerEvent::moved(0.0, 130.0, ms(16)));
        assert_eq!(drag.phase(), DragPhase::Dragging);
        assert_eq!(drag.offset(), 30.0);
        drag.handle_pointer(&PointerEvent::moved(0.0, 60.0, ms(32)));
        assert_eq!(drag.offset(), 0.0);
    }

    #[test]
    fn upward_drag_never_starts() {
        let (_s, mut drag, _) = tracker();
        drag.handle_pointer(&PointerEvent::down(0.0, 100.0, ms(0)));
        drag.handle_pointer(&PointerEvent::moved(0.0, 50.0, ms(16)));
        assert_eq!(drag.phase(), DragPhase::Resting);
        assert_eq!(drag.handle_pointer(&PointerEvent::up(0.0, 50.0, ms(32))), None);
    }

    // --- release ---

    #[test]
    fn past_distance_dismisses_once() {
        let (sched, mut drag, closes) = tracker();
        assert_eq!(drag_to(&mut drag, 150.0, ms(1000)), Some(DragRelease::Dismiss));
        assert_eq!(drag.phase(), DragPhase::Dismissing);
        assert_eq!(closes.get(), 0, "closes after the animation");
        sched.advance(ms(150));
        assert_eq!(drag.phase(), DragPhase::Dismissed);
        assert_eq!(drag.offset(), 400.0);
        sched.advance(ms(1000));
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn fast_flick_dismisses() {
        let (_s, mut drag, _) = tracker();
        assert_eq!(drag_to(&mut drag, 40.0, ms(20)), Some(DragRelease::Dismiss));
        assert!(drag.velocity() > 0.5);
    }

    #[test]
    fn short_slow_drag_snaps_back() {
        let (sched, mut drag, closes) = tracker();
        assert_eq!(drag_to(&mut drag, 40.0, ms(400)), Some(DragRelease::SnapBack));
        assert_eq!(drag.phase(), DragPhase::SnapBack);
        sched.advance(ms(75));
        assert!(drag.offset() > 0.0 && drag.offset() < 40.0);
        sched.advance(ms(75));
        assert_eq!(drag.phase(), DragPhase::Resting);
        assert_eq!(drag.offset(), 0.0);
        assert_eq!(closes.get(), 0);
    }

    #[test]
    #[tracing_test::traced_test]
    fn cancelled_gesture_snaps_back() {
        let (sched, mut drag, closes) = tracker();
        drag.handle_pointer(&PointerEvent::down(0.0, 0.0, ms(0)));
        drag.handle_pointer(&PointerEvent::moved(0.0, 300.0, ms(100)));
        let out = drag.handle_pointer(&PointerEvent::cancel(0.0, 300.0, ms(110)));
        assert_eq!(out, Some(DragRelease::SnapBack));
        sched.advance(ms(150));
        assert_eq!(drag.phase(), DragPhase::Resting);
        assert_eq!(closes.get(), 0);
        assert!(logs_contain("drag cancelled by host"));
    }

    #[test]
    fn grab_during_snap_back() {
        let (sched, mut drag, _) = tracker();
        drag_to(&mut drag, 60.0, ms(600));
        sched.advance(ms(30));
        let caught = drag.offset();
        drag.handle_pointer(&PointerEvent::down(0.0, 500.0, sched.now()));
        assert_eq!(drag.phase(), DragPhase::Dragging);
        assert_eq!(drag.offset(), caught);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn snaps_without_scheduler() {
        let closes = Rc::new(Cell::new(0));
        let c = Rc::clone(&closes);
        let mut drag = DragDismiss::new(None, &VeilConfig::default(), 300.0)
            .on_dismiss(move || c.set(c.get() + 1));
        drag_to(&mut drag, 150.0, ms(1000));
        assert_eq!(drag.phase(), DragPhase::Dismissed);
        assert_eq!(closes.get(), 1);
    }

    // --- teardown ---

    #[test]
    fn cancel_prevents_dismiss_callback() {
        let (sched, mut drag, closes) = tracker();
        drag_to(&mut drag, 150.0, ms(1000));
        drag.cancel();
        sched.advance(ms(1000));
        assert_eq!(closes.get(), 0);
        assert_eq!(sched.pending(), 0);
        assert_eq!(drag.phase(), DragPhase::Resting);
    }
}
