#![forbid(unsafe_code)]

//! Enter/exit animation state machine.
//!
//! A [`Transition`] drives a single value from 0.0 (closed) to 1.0 (open)
//! and back, on top of a [`Scheduler`]. Opacity follows the value directly;
//! scale runs from `min_scale` to 1.0.
//!
//! State machine: `Closed → Opening → Open → Closing → Closed`.
//! Reversing mid-flight skips directly from `Opening` to `Closing` (or back).
//!
//! # Invariants
//!
//! 1. At most one animation is in flight per transition. Starting another
//!    cancels the in-flight timer and starts from the current value, so the
//!    value never jumps.
//! 2. The value is always within `[0.0, 1.0]`.
//! 3. `Opening` becomes `Open` and `Closing` becomes `Closed` only when the
//!    scheduled duration has elapsed.
//! 4. Each [`Completion`] resolves exactly once.
//!
//! # Failure Modes
//!
//! - No scheduler, reduced motion, or a zero duration: the end state is
//!   applied immediately and the completion is already resolved.
//! - Dropping or cancelling the transition resolves any pending completion
//!   as [`TransitionOutcome::Cancelled`] and removes its timer.

use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::{Rc, Weak};
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use veil_runtime::{Scheduler, TimerHandle};

// ============================================================================
// Easing
// ============================================================================

/// Easing curve applied to linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    Linear,
    /// Decelerating cubic; good for entrances.
    #[default]
    EaseOut,
    /// Accelerating cubic; good for exits.
    EaseIn,
    /// Cubic S-curve.
    EaseInOut,
}

impl Easing {
    /// Map progress in `[0, 1]` to eased progress in `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseOut => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Self::EaseIn => t * t * t,
            Self::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let inv = -2.0 * t + 2.0;
                    1.0 - inv * inv * inv / 2.0
                }
            }
        }
    }
}

// ============================================================================
// Tween
// ============================================================================

/// Time-based interpolation between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start: Duration,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    #[must_use]
    pub fn new(from: f32, to: f32, start: Duration, duration: Duration) -> Self {
        Self {
            from,
            to,
            start,
            duration,
            easing: Easing::default(),
        }
    }

    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Linear progress in `[0, 1]` at `now`.
    #[must_use]
    pub fn progress_at(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    /// Interpolated value at `now`.
    #[must_use]
    pub fn value_at(&self, now: Duration) -> f32 {
        let eased = self.easing.apply(self.progress_at(now));
        self.from + (self.to - self.from) * eased
    }

    /// Time at which the tween reaches `to`.
    #[must_use]
    pub fn end(&self) -> Duration {
        self.start.saturating_add(self.duration)
    }
}

// ============================================================================
// Completion
// ============================================================================

/// How an animation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Ran to its end state.
    Finished,
    /// Superseded by an animation in the opposite direction.
    Interrupted,
    /// Stopped by teardown.
    Cancelled,
}

#[derive(Default)]
struct CompletionState {
    outcome: Option<TransitionOutcome>,
    waker: Option<Waker>,
    on_finished: Vec<Box<dyn FnOnce()>>,
}

/// Resolves when an animation ends. Also usable as a `Future`.
///
/// Clones observe the same resolution.
#[derive(Clone)]
pub struct Completion {
    state: Rc<RefCell<CompletionState>>,
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("outcome", &self.state.borrow().outcome)
            .finish()
    }
}

impl Completion {
    fn pending() -> Self {
        Self {
            state: Rc::new(RefCell::new(CompletionState::default())),
        }
    }

    fn resolved(outcome: TransitionOutcome) -> Self {
        let completion = Self::pending();
        completion.state.borrow_mut().outcome = Some(outcome);
        completion
    }

    /// Outcome, once resolved.
    #[must_use]
    pub fn outcome(&self) -> Option<TransitionOutcome> {
        self.state.borrow().outcome
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.outcome().is_some()
    }

    /// Run `f` when the animation finishes. Runs immediately if it already
    /// finished; never runs if it was interrupted or cancelled.
    pub fn on_finished(&self, f: impl FnOnce() + 'static) {
        let outcome = self.outcome();
        match outcome {
            Some(TransitionOutcome::Finished) => f(),
            Some(_) => {}
            None => self.state.borrow_mut().on_finished.push(Box::new(f)),
        }
    }

    fn resolve(&self, outcome: TransitionOutcome) {
        let (waker, callbacks) = {
            let mut state = self.state.borrow_mut();
            if state.outcome.is_some() {
                return;
            }
            state.outcome = Some(outcome);
            (state.waker.take(), std::mem::take(&mut state.on_finished))
        };
        if outcome == TransitionOutcome::Finished {
            for callback in callbacks {
                callback();
            }
        }
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl Future for Completion {
    type Output = TransitionOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        match state.outcome {
            Some(outcome) => Poll::Ready(outcome),
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

// ============================================================================
// Transition
// ============================================================================

/// Lifecycle phase of an animated surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransitionPhase {
    /// Fully hidden; content may be unmounted.
    #[default]
    Closed,
    Opening,
    /// Fully shown.
    Open,
    Closing,
}

impl TransitionPhase {
    /// Whether content should be mounted.
    #[inline]
    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Closed)
    }

    #[inline]
    #[must_use]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }

    /// Whether this phase is headed towards (or at) open.
    #[inline]
    #[must_use]
    pub fn is_opening_or_open(self) -> bool {
        matches!(self, Self::Opening | Self::Open)
    }
}

struct Inner {
    phase: TransitionPhase,
    /// Resting value when no tween is active.
    value: f32,
    tween: Option<Tween>,
    timer: Option<TimerHandle>,
    completion: Option<Completion>,
}

/// Animated open/close value.
pub struct Transition {
    inner: Rc<RefCell<Inner>>,
    scheduler: Option<Scheduler>,
    easing: Easing,
    min_scale: f32,
    reduced_motion: bool,
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("phase", &self.phase())
            .field("value", &self.value())
            .field("reduced_motion", &self.reduced_motion)
            .finish()
    }
}

impl Transition {
    /// Closed transition driven by `scheduler`. `None` means every animation
    /// snaps to its end state.
    #[must_use]
    pub fn new(scheduler: Option<Scheduler>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                phase: TransitionPhase::Closed,
                value: 0.0,
                tween: None,
                timer: None,
                completion: None,
            })),
            scheduler,
            easing: Easing::default(),
            min_scale: 0.95,
            reduced_motion: false,
        }
    }

    #[must_use]
    pub fn easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Scale at the closed end. Clamped to `[0.5, 1.0]`.
    #[must_use]
    pub fn min_scale(mut self, scale: f32) -> Self {
        self.min_scale = if scale.is_finite() {
            scale.clamp(0.5, 1.0)
        } else {
            1.0
        };
        self
    }

    #[must_use]
    pub fn reduced_motion(mut self, on: bool) -> Self {
        self.reduced_motion = on;
        self
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.inner.borrow().phase
    }

    /// Current value in `[0, 1]`.
    #[must_use]
    pub fn value(&self) -> f32 {
        let inner = self.inner.borrow();
        match (&inner.tween, &self.scheduler) {
            (Some(tween), Some(scheduler)) => tween.value_at(scheduler.now()).clamp(0.0, 1.0),
            _ => inner.value,
        }
    }

    /// Content opacity.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.value()
    }

    /// Content scale.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.min_scale + (1.0 - self.min_scale) * self.value()
    }

    /// Slide offset for content that travels `distance` px when closed.
    #[must_use]
    pub fn translate(&self, distance: f32) -> f32 {
        distance * (1.0 - self.value())
    }

    /// Whether an animation would actually run (rather than snap).
    #[must_use]
    pub fn is_driven(&self) -> bool {
        self.scheduler.is_some() && !self.reduced_motion
    }

    /// Animate towards open.
    pub fn animate_open(&self, duration: Duration) -> Completion {
        self.start(true, duration)
    }

    /// Animate towards closed.
    pub fn animate_close(&self, duration: Duration) -> Completion {
        self.start(false, duration)
    }

    /// Jump to a settled state without animating.
    pub fn snap_to(&self, open: bool) {
        self.stop(TransitionOutcome::Interrupted);
        let mut inner = self.inner.borrow_mut();
        inner.phase = if open {
            TransitionPhase::Open
        } else {
            TransitionPhase::Closed
        };
        inner.value = if open { 1.0 } else { 0.0 };
    }

    /// Abort any in-flight animation and return to `Closed`. Pending
    /// completions resolve as cancelled; their `on_finished` callbacks never run.
    pub fn cancel(&self) {
        self.stop(TransitionOutcome::Cancelled);
        let mut inner = self.inner.borrow_mut();
        inner.phase = TransitionPhase::Closed;
        inner.value = 0.0;
    }

    fn start(&self, open: bool, duration: Duration) -> Completion {
        let (target_value, moving, settled) = if open {
            (1.0, TransitionPhase::Opening, TransitionPhase::Open)
        } else {
            (0.0, TransitionPhase::Closing, TransitionPhase::Closed)
        };

        {
            let inner = self.inner.borrow();
            if inner.phase == settled {
                return Completion::resolved(TransitionOutcome::Finished);
            }
            if inner.phase == moving
                && let Some(completion) = &inner.completion
            {
                return completion.clone();
            }
        }

        let from = self.value();
        let was_animating = self.phase().is_animating();
        self.stop(TransitionOutcome::Interrupted);
        if was_animating {
            tracing::debug!(from, toward_open = open, "transition reversed");
        }

        let scheduler = match &self.scheduler {
            Some(s) if !self.reduced_motion && !duration.is_zero() => s,
            _ => {
                tracing::debug!(
                    toward_open = open,
                    reduced_motion = self.reduced_motion,
                    "animation driver unavailable; applying end state"
                );
                let mut inner = self.inner.borrow_mut();
                inner.phase = settled;
                inner.value = target_value;
                return Completion::resolved(TransitionOutcome::Finished);
            }
        };

        let completion = Completion::pending();
        let tween = Tween::new(from, target_value, scheduler.now(), duration).easing(self.easing);
        let weak: Weak<RefCell<Inner>> = Rc::downgrade(&self.inner);
        let timer = scheduler.schedule_after(duration, move || {
            if let Some(inner) = weak.upgrade() {
                settle(&inner, settled, target_value);
            }
        });

        let mut inner = self.inner.borrow_mut();
        inner.phase = moving;
        inner.tween = Some(tween);
        inner.timer = Some(timer);
        inner.completion = Some(completion.clone());
        tracing::debug!(
            phase = ?moving,
            from,
            duration_ms = duration.as_millis() as u64,
            "transition started"
        );
        completion
    }

    /// Freeze the current value, cancel the timer, resolve the completion.
    fn stop(&self, outcome: TransitionOutcome) {
        let value = self.value();
        let (timer, completion) = {
            let mut inner = self.inner.borrow_mut();
            inner.tween = None;
            inner.value = value;
            (inner.timer.take(), inner.completion.take())
        };
        if let (Some(timer), Some(scheduler)) = (timer, &self.scheduler) {
            scheduler.cancel(timer);
        }
        if let Some(completion) = completion {
            completion.resolve(outcome);
        }
    }
}

fn settle(inner: &Rc<RefCell<Inner>>, phase: TransitionPhase, value: f32) {
    let completion = {
        let mut inner = inner.borrow_mut();
        inner.phase = phase;
        inner.value = value;
        inner.tween = None;
        inner.timer = None;
        inner.completion.take()
    };
    tracing::trace!(?phase, "transition settled");
    if let Some(completion) = completion {
        completion.resolve(TransitionOutcome::Finished);
    }
}

impl Drop for Transition {
    fn drop(&mut self) {
        self.stop(TransitionOutcome::Cancelled);
    }
}
