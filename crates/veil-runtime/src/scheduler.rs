#![forbid(unsafe_code)]

//! Virtual-time timer queue.
//!
//! Every time-based suspension point in veil (enter/exit animations, hover
//! delays, toast auto-dismiss) is a one-shot timer on a [`Scheduler`]. The
//! scheduler never reads a wall clock on its own: hosts move it forward with
//! [`Scheduler::advance`] or [`Scheduler::sync`], and tests do the same with
//! exact durations.
//!
//! # Invariants
//!
//! 1. Due timers fire in `(deadline, insertion)` order.
//! 2. A cancelled timer never fires; cancelling a fired or unknown timer
//!    returns `false`.
//! 3. No borrow is held while a callback runs, so callbacks may schedule,
//!    cancel, or advance.
//! 4. `now()` never goes backwards.
//!
//! # Failure Modes
//!
//! - A callback that schedules a zero-delay timer while `advance` is running
//!   gets it fired in the same `advance` call, after the current one.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use ahash::AHashMap;
use veil_core::Clock;

type TimerFn = Box<dyn FnOnce()>;

/// Identifies a scheduled timer for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Raw id, unique per scheduler.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

#[derive(Default)]
struct State {
    now: Duration,
    next_id: u64,
    queue: BTreeMap<(Duration, u64), TimerFn>,
    deadlines: AHashMap<u64, Duration>,
}

/// Shared handle to a timer queue. Clones refer to the same queue.
#[derive(Clone, Default)]
pub struct Scheduler {
    state: Rc<RefCell<State>>,
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Scheduler")
            .field("now", &state.now)
            .field("pending", &state.queue.len())
            .finish()
    }
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.borrow().now
    }

    /// Run `callback` once, `delay` after the current virtual time.
    pub fn schedule_after(&self, delay: Duration, callback: impl FnOnce() + 'static) -> TimerHandle {
        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        let deadline = state.now.saturating_add(delay);
        state.queue.insert((deadline, id), Box::new(callback));
        state.deadlines.insert(id, deadline);
        tracing::trace!(timer = id, ?deadline, "timer scheduled");
        TimerHandle(id)
    }

    /// Cancel a pending timer. Returns `true` if it was still pending.
    pub fn cancel(&self, handle: TimerHandle) -> bool {
        let removed = {
            let mut state = self.state.borrow_mut();
            match state.deadlines.remove(&handle.0) {
                Some(deadline) => state.queue.remove(&(deadline, handle.0)),
                None => None,
            }
        };
        // Drop the callback (and whatever it captured) outside the borrow.
        let cancelled = removed.is_some();
        drop(removed);
        if cancelled {
            tracing::trace!(timer = handle.0, "timer cancelled");
        }
        cancelled
    }

    /// Whether `handle` is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.state.borrow().deadlines.contains_key(&handle.0)
    }

    /// Number of timers waiting to fire.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.state
            .borrow()
            .queue
            .keys()
            .next()
            .map(|(deadline, _)| *deadline)
    }

    /// Move virtual time forward by `delta`, firing due timers.
    /// Returns the number of timers fired.
    pub fn advance(&self, delta: Duration) -> usize {
        let target = self.now().saturating_add(delta);
        self.advance_to(target)
    }

    /// Move virtual time forward to `target`, firing due timers.
    /// A `target` in the past only fires timers that are already due.
    pub fn advance_to(&self, target: Duration) -> usize {
        let mut fired = 0;
        loop {
            let next = {
                let mut state = self.state.borrow_mut();
                let due = state
                    .queue
                    .first_key_value()
                    .is_some_and(|((deadline, _), _)| *deadline <= target);
                if !due {
                    break;
                }
                state.queue.pop_first().map(|((deadline, id), callback)| {
                    state.deadlines.remove(&id);
                    if deadline > state.now {
                        state.now = deadline;
                    }
                    (id, callback)
                })
            };
            let Some((id, callback)) = next else { break };
            tracing::trace!(timer = id, "timer fired");
            callback();
            fired += 1;
        }
        let mut state = self.state.borrow_mut();
        if target > state.now {
            state.now = target;
        }
        fired
    }

    /// Advance to the time reported by `clock`.
    pub fn sync(&self, clock: &dyn Clock) -> usize {
        self.advance_to(clock.now())
    }

    /// Fire every pending timer, including ones scheduled while firing.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        while let Some(deadline) = self.next_deadline() {
            fired += self.advance_to(deadline);
        }
        fired
    }

    /// Drop every pending timer without firing it.
    pub fn clear(&self) {
        let drained = {
            let mut state = self.state.borrow_mut();
            state.deadlines.clear();
            std::mem::take(&mut state.queue)
        };
        drop(drained);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use veil_core::ManualClock;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // --- ordering ---

    #[test]
    fn fires_in_deadline_then_insertion_order() {
        let sched = Scheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for (name, delay) in [("c", 30), ("a", 10), ("b", 10)] {
            let log = Rc::clone(&log);
            sched.schedule_after(ms(delay), move || log.borrow_mut().push(name));
        }
        assert_eq!(sched.advance(ms(30)), 3);
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn not_due_timers_wait() {
        let sched = Scheduler::new();
        let hit = Rc::new(Cell::new(false));
        let h = Rc::clone(&hit);
        sched.schedule_after(ms(100), move || h.set(true));
        sched.advance(ms(99));
        assert!(!hit.get());
        assert_eq!(sched.now(), ms(99));
        sched.advance(ms(1));
        assert!(hit.get());
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn now_tracks_deadline_while_firing() {
        let sched = Scheduler::new();
        let seen = Rc::new(Cell::new(Duration::ZERO));
        let (s, inner) = (Rc::clone(&seen), sched.clone());
        sched.schedule_after(ms(40), move || s.set(inner.now()));
        sched.advance(ms(100));
        assert_eq!(seen.get(), ms(40));
        assert_eq!(sched.now(), ms(100));
    }

    // --- cancellation ---

    #[test]
    fn cancelled_timer_never_fires() {
        let sched = Scheduler::new();
        let hit = Rc::new(Cell::new(false));
        let h = Rc::clone(&hit);
        let handle = sched.schedule_after(ms(10), move || h.set(true));
        assert!(sched.is_pending(handle));
        assert!(sched.cancel(handle));
        assert!(!sched.cancel(handle));
        sched.advance(ms(50));
        assert!(!hit.get());
    }

    #[test]
    fn cancel_after_fire_returns_false() {
        let sched = Scheduler::new();
        let handle = sched.schedule_after(ms(1), || {});
        sched.advance(ms(1));
        assert!(!sched.cancel(handle));
    }

    #[test]
    fn callback_can_cancel_sibling() {
        let sched = Scheduler::new();
        let hit = Rc::new(Cell::new(false));
        let h = Rc::clone(&hit);
        let later = sched.schedule_after(ms(20), move || h.set(true));
        let inner = sched.clone();
        sched.schedule_after(ms(10), move || {
            inner.cancel(later);
        });
        assert_eq!(sched.advance(ms(30)), 1);
        assert!(!hit.get());
    }

    #[test]
    fn callback_can_reschedule() {
        let sched = Scheduler::new();
        let count = Rc::new(Cell::new(0));
        let (c, inner) = (Rc::clone(&count), sched.clone());
        sched.schedule_after(ms(10), move || {
            c.set(c.get() + 1);
            let c2 = Rc::clone(&c);
            inner.schedule_after(ms(10), move || c2.set(c2.get() + 1));
        });
        sched.advance(ms(15));
        assert_eq!(count.get(), 1);
        sched.advance(ms(5));
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn clear_drops_everything() {
        let sched = Scheduler::new();
        let hit = Rc::new(Cell::new(false));
        let h = Rc::clone(&hit);
        let handle = sched.schedule_after(ms(1), move || h.set(true));
        sched.clear();
        assert!(!sched.is_pending(handle));
        assert_eq!(sched.run_until_idle(), 0);
        assert!(!hit.get());
    }

    // --- host integration ---

    #[test]
    fn sync_follows_clock() {
        let clock = ManualClock::new();
        let sched = Scheduler::new();
        sched.schedule_after(ms(16), || {});
        clock.advance(ms(20));
        assert_eq!(sched.sync(&clock), 1);
        assert_eq!(sched.now(), ms(20));
    }

    #[test]
    fn advance_to_past_does_not_rewind() {
        let sched = Scheduler::new();
        sched.advance(ms(50));
        sched.advance_to(ms(10));
        assert_eq!(sched.now(), ms(50));
    }

    #[test]
    fn next_deadline_reports_earliest() {
        let sched = Scheduler::new();
        assert_eq!(sched.next_deadline(), None);
        sched.schedule_after(ms(30), || {});
        sched.schedule_after(ms(5), || {});
        assert_eq!(sched.next_deadline(), Some(ms(5)));
    }

    // --- properties ---

    proptest::proptest! {
        #[test]
        fn fire_order_is_sorted_by_deadline(
            delays in proptest::collection::vec(0u64..200, 0..40),
            steps in proptest::collection::vec(1u64..60, 1..10),
        ) {
            let sched = Scheduler::new();
            let log = Rc::new(RefCell::new(Vec::new()));
            for (i, d) in delays.iter().enumerate() {
                let (log, inner) = (Rc::clone(&log), sched.clone());
                sched.schedule_after(ms(*d), move || log.borrow_mut().push((inner.now(), i)));
            }
            let mut last = Duration::ZERO;
            for step in steps {
                sched.advance(ms(step));
                proptest::prop_assert!(sched.now() >= last);
                last = sched.now();
            }
            sched.run_until_idle();
            let fired = log.borrow().clone();
            proptest::prop_assert_eq!(fired.len(), delays.len());
            for pair in fired.windows(2) {
                proptest::prop_assert!(pair[0] <= pair[1]);
            }
            for (at, i) in fired {
                proptest::prop_assert_eq!(at, ms(delays[i]));
            }
        }
    }
}
