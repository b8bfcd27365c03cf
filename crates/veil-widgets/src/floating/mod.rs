#![forbid(unsafe_code)]

//! Non-modal content anchored to a trigger: popovers, hover cards, tooltips.
//!
//! Delayed opening and closing uses scheduler timers that only raise a flag;
//! the widget acts on the flag in its `sync`, so a timer never reaches into
//! widget state. Timers are cancelled when superseded and on unmount.

mod hover_card;
mod popover;
mod tooltip;

pub use hover_card::HoverCard;
pub use popover::Popover;
pub use tooltip::Tooltip;

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use veil_core::{Event, PointerPhase, Rect};
use veil_runtime::{Scheduler, TimerHandle};

/// One pending open or close request, raised after a delay.
#[derive(Debug)]
pub(crate) struct DelayedRequest {
    scheduler: Option<Scheduler>,
    timer: Option<TimerHandle>,
    ready: Rc<Cell<Option<bool>>>,
}

impl DelayedRequest {
    pub(crate) fn new(scheduler: Option<Scheduler>) -> Self {
        Self {
            scheduler,
            timer: None,
            ready: Rc::new(Cell::new(None)),
        }
    }

    /// Raise `open` after `delay`, replacing any pending request. Without a
    /// scheduler the request is raised at once.
    pub(crate) fn schedule(&mut self, open: bool, delay: Duration) {
        self.cancel();
        match &self.scheduler {
            Some(scheduler) if !delay.is_zero() => {
                let ready = Rc::clone(&self.ready);
                self.timer = Some(scheduler.schedule_after(delay, move || ready.set(Some(open))));
            }
            _ => self.ready.set(Some(open)),
        }
    }

    pub(crate) fn cancel(&mut self) {
        if let (Some(timer), Some(scheduler)) = (self.timer.take(), &self.scheduler) {
            scheduler.cancel(timer);
        }
        self.ready.set(None);
    }

    /// Whether a timer is still waiting to fire.
    pub(crate) fn is_pending(&self) -> bool {
        self.timer
            .zip(self.scheduler.as_ref())
            .is_some_and(|(t, s)| s.is_pending(t))
    }

    /// Fired request, if any. Clears it.
    pub(crate) fn take(&mut self) -> Option<bool> {
        let fired = self.ready.take();
        if fired.is_some() {
            self.timer = None;
        }
        fired
    }
}

impl Drop for DelayedRequest {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Recognizes a press and release both on the trigger.
#[derive(Debug, Default)]
pub(crate) struct TriggerTap {
    armed: bool,
}

impl TriggerTap {
    /// Feed an event that the overlay did not claim. Returns `true` when a
    /// tap on `trigger` completed.
    pub(crate) fn feed(&mut self, event: &Event, trigger: Rect) -> bool {
        let Event::Pointer(pointer) = event else {
            return false;
        };
        let inside = trigger.contains(pointer.position);
        match pointer.phase {
            PointerPhase::Down => {
                self.armed = inside;
                false
            }
            PointerPhase::Move => {
                self.armed &= inside;
                false
            }
            PointerPhase::Up => std::mem::take(&mut self.armed) && inside,
            PointerPhase::Cancel => {
                self.armed = false;
                false
            }
        }
    }
}
