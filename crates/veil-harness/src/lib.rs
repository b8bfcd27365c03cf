#![forbid(unsafe_code)]

//! Test fixtures for veil components.
//!
//! - [`Recorder`]: captures every value passed to a callback
//! - [`TestHost`]: a virtual-time scheduler plus an [`Env`] wired to it
//! - [`strategies`]: proptest generators for geometry and sides
//!
//! Time never passes on its own here. Tests move it with
//! [`TestHost::advance_ms`] or [`TestHost::settle`].

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use veil_core::{Event, PointerEvent, Size};
use veil_runtime::{Scheduler, VeilConfig};
use veil_widgets::{Env, EventOutcome};

/// Phone-sized viewport used by default.
pub const VIEWPORT: Size = Size {
    width: 390.0,
    height: 844.0,
};

/// Shared log of callback arguments.
///
/// Clones share the same log, so one clone goes into the callback and the
/// test keeps another.
pub struct Recorder<T> {
    calls: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            calls: Rc::clone(&self.calls),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Recorder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.calls.borrow().iter()).finish()
    }
}

impl<T: Clone + 'static> Recorder<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, value: T) {
        self.calls.borrow_mut().push(value);
    }

    /// Callback that records its argument.
    pub fn sink(&self) -> impl FnMut(T) + 'static {
        let calls = Rc::clone(&self.calls);
        move |value| calls.borrow_mut().push(value)
    }

    #[must_use]
    pub fn calls(&self) -> Vec<T> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.calls.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl Recorder<String> {
    /// Callback for `&str` sinks such as `on_value_change`.
    pub fn str_sink(&self) -> impl FnMut(&str) + 'static {
        let calls = Rc::clone(&self.calls);
        move |value| calls.borrow_mut().push(value.to_string())
    }
}

impl Recorder<()> {
    /// Callback for argument-less sinks such as `on_dismiss`.
    pub fn unit_sink(&self) -> impl FnMut() + 'static {
        let calls = Rc::clone(&self.calls);
        move || calls.borrow_mut().push(())
    }
}

/// Virtual-time host: one scheduler and an [`Env`] that uses it.
#[derive(Debug, Clone)]
pub struct TestHost {
    scheduler: Scheduler,
    env: Env,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new(VIEWPORT)
    }
}

impl TestHost {
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self::with_config(viewport, VeilConfig::default())
    }

    #[must_use]
    pub fn with_config(viewport: Size, config: VeilConfig) -> Self {
        let scheduler = Scheduler::new();
        let env = Env::new(viewport)
            .scheduler(scheduler.clone())
            .config(config);
        Self { scheduler, env }
    }

    #[must_use]
    pub fn env(&self) -> &Env {
        &self.env
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn config(&self) -> &VeilConfig {
        &self.env.config
    }

    /// Virtual time now.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    /// Move time forward; returns how many timers fired.
    pub fn advance_ms(&self, ms: u64) -> usize {
        let fired = self.scheduler.advance(Duration::from_millis(ms));
        tracing::trace!(ms, fired, now_ms = self.now().as_millis() as u64, "virtual time advanced");
        fired
    }

    /// Fire every pending timer.
    pub fn settle(&self) -> usize {
        self.scheduler.run_until_idle()
    }

    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// Press and release at `(x, y)` through `handler`. Returns the outcome of
    /// the release.
    pub fn tap(&self, x: f32, y: f32, mut handler: impl FnMut(&Event) -> EventOutcome) -> EventOutcome {
        let now = self.now();
        handler(&PointerEvent::down(x, y, now).into());
        handler(&PointerEvent::up(x, y, now).into())
    }

    /// Vertical drag from `y0` to `y1` over `ms`, in `steps` moves, without
    /// releasing. Advances virtual time as it goes.
    pub fn drag_to(
        &self,
        x: f32,
        y0: f32,
        y1: f32,
        ms: u64,
        steps: u32,
        mut handler: impl FnMut(&Event) -> EventOutcome,
    ) {
        handler(&PointerEvent::down(x, y0, self.now()).into());
        let steps = steps.max(1);
        for i in 1..=steps {
            self.advance_ms(ms / u64::from(steps));
            let y = y0 + (y1 - y0) * (i as f32 / steps as f32);
            handler(&PointerEvent::moved(x, y, self.now()).into());
        }
    }

    /// Release a drag at `(x, y)`.
    pub fn release(&self, x: f32, y: f32, mut handler: impl FnMut(&Event) -> EventOutcome) -> EventOutcome {
        handler(&PointerEvent::up(x, y, self.now()).into())
    }
}

/// proptest generators.
pub mod strategies {
    use proptest::prelude::*;
    use veil_core::{Rect, Size};
    use veil_widgets::Side;

    pub fn side() -> impl Strategy<Value = Side> {
        prop_oneof![
            Just(Side::Top),
            Just(Side::Right),
            Just(Side::Bottom),
            Just(Side::Left),
        ]
    }

    pub fn viewport() -> impl Strategy<Value = Size> {
        (200.0f32..1600.0, 200.0f32..1600.0).prop_map(|(w, h)| Size::new(w, h))
    }

    /// Content no larger than `viewport`.
    pub fn content_within(viewport: Size) -> impl Strategy<Value = Size> {
        (1.0f32..=viewport.width, 1.0f32..=viewport.height).prop_map(|(w, h)| Size::new(w, h))
    }

    /// Anchor somewhere inside `viewport`, possibly hugging a corner.
    pub fn anchor_within(viewport: Size) -> impl Strategy<Value = Rect> {
        (
            0.0f32..viewport.width,
            0.0f32..viewport.height,
            0.0f32..80.0,
            0.0f32..80.0,
        )
            .prop_map(move |(x, y, w, h)| {
                Rect::new(x, y, w.min(viewport.width - x), h.min(viewport.height - y))
            })
    }

    /// Anchor within `margin` px of one of the four corners.
    pub fn corner_anchor(viewport: Size, margin: f32) -> impl Strategy<Value = Rect> {
        (0usize..4, 0.0f32..margin, 0.0f32..margin).prop_map(move |(corner, dx, dy)| {
            let x = if corner % 2 == 0 { dx } else { viewport.width - dx - 1.0 };
            let y = if corner < 2 { dy } else { viewport.height - dy - 1.0 };
            Rect::new(x.max(0.0), y.max(0.0), 1.0, 1.0)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_clones_share_log() {
        let rec = Recorder::<bool>::new();
        let mut sink = rec.sink();
        sink(true);
        rec.clone().record(false);
        assert_eq!(rec.calls(), vec![true, false]);
        assert_eq!(rec.last(), Some(false));
        rec.clear();
        assert_eq!(rec.count(), 0);
    }

    #[test]
    fn host_time_is_virtual() {
        let host = TestHost::default();
        assert_eq!(host.now(), Duration::ZERO);
        host.scheduler().schedule_after(Duration::from_millis(10), || {});
        assert_eq!(host.pending_timers(), 1);
        assert_eq!(host.advance_ms(10), 1);
        assert_eq!(host.now(), Duration::from_millis(10));
    }
}
