#![forbid(unsafe_code)]

//! Toast queue backed by an explicit [`Store`].
//!
//! Build one [`Toaster`] per screen and hand clones of its store to whatever
//! renders the toasts. A toast goes `Visible` → `Leaving` → removed:
//! dismissal (manual, auto, or eviction) marks it `Leaving`, and it leaves the
//! store once the exit duration has passed.
//!
//! # Invariants
//!
//! 1. At most `toast_limit` toasts are `Visible`; adding one past the limit
//!    starts dismissal of the oldest visible toast.
//! 2. Every toast has at most one pending timer.
//! 3. After [`Toaster::unmount`] no timer is pending and the store no longer
//!    changes.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use ahash::AHashMap;
use veil_runtime::{Scheduler, Store, Subscription, TimerHandle};
use veil_style::ToastVariant;

use crate::env::Env;

static NEXT_TOAST_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a toast for dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl ToastId {
    fn next() -> Self {
        Self(NEXT_TOAST_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Lifecycle stage of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastState {
    #[default]
    Visible,
    /// Exit animation running.
    Leaving,
}

/// How long a toast stays before dismissing itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastDuration {
    /// The toaster's configured duration.
    #[default]
    Default,
    After(Duration),
    /// Until dismissed.
    Persistent,
}

/// A toast request, and its stored record.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: ToastId,
    pub title: String,
    pub description: Option<String>,
    pub action: Option<String>,
    pub variant: ToastVariant,
    pub duration: ToastDuration,
    pub state: ToastState,
}

impl Toast {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ToastId::next(),
            title: title.into(),
            description: None,
            action: None,
            variant: ToastVariant::Default,
            duration: ToastDuration::Default,
            state: ToastState::Visible,
        }
    }

    #[must_use]
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Label of an action button rendered on the toast.
    #[must_use]
    pub fn action(mut self, label: impl Into<String>) -> Self {
        self.action = Some(label.into());
        self
    }

    #[must_use]
    pub fn variant(mut self, variant: ToastVariant) -> Self {
        self.variant = variant;
        self
    }

    #[must_use]
    pub fn duration(mut self, duration: ToastDuration) -> Self {
        self.duration = duration;
        self
    }
}

#[derive(Clone)]
struct Shared {
    store: Store<Vec<Toast>>,
    timers: Rc<RefCell<AHashMap<ToastId, TimerHandle>>>,
    scheduler: Option<Scheduler>,
    exit: Duration,
}

impl Shared {
    fn replace_timer(&self, id: ToastId, timer: Option<TimerHandle>) {
        let old = match timer {
            Some(t) => self.timers.borrow_mut().insert(id, t),
            None => self.timers.borrow_mut().remove(&id),
        };
        if let (Some(old), Some(s)) = (old, &self.scheduler) {
            s.cancel(old);
        }
    }

    fn begin_dismiss(&self, id: ToastId) -> bool {
        let visible = self
            .store
            .with(|t| t.iter().any(|t| t.id == id && t.state == ToastState::Visible));
        if !visible {
            return false;
        }
        tracing::debug!(toast_id = id.0, "toast leaving");
        self.store.update(|toasts| {
            if let Some(t) = toasts.iter_mut().find(|t| t.id == id) {
                t.state = ToastState::Leaving;
            }
        });
        match &self.scheduler {
            Some(s) if !self.exit.is_zero() => {
                let shared = self.clone();
                let timer = s.schedule_after(self.exit, move || shared.remove(id));
                self.replace_timer(id, Some(timer));
            }
            _ => self.remove(id),
        }
        true
    }

    fn remove(&self, id: ToastId) {
        self.timers.borrow_mut().remove(&id);
        self.store.update(|toasts| toasts.retain(|t| t.id != id));
        tracing::trace!(toast_id = id.0, "toast removed");
    }
}

/// Toast queue for one screen.
pub struct Toaster {
    shared: Shared,
    limit: usize,
    default_duration: Duration,
    unmounted: bool,
}

impl std::fmt::Debug for Toaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toaster")
            .field("toasts", &self.shared.store.with(Vec::len))
            .field("timers", &self.shared.timers.borrow().len())
            .field("limit", &self.limit)
            .finish()
    }
}

impl Toaster {
    #[must_use]
    pub fn new(env: &Env) -> Self {
        Self {
            shared: Shared {
                store: Store::new(Vec::new()),
                timers: Rc::new(RefCell::new(AHashMap::new())),
                scheduler: env.scheduler.clone(),
                exit: if env.config.reduced_motion {
                    Duration::ZERO
                } else {
                    env.config.exit_duration
                },
            },
            limit: env.config.toast_limit.max(1),
            default_duration: env.config.toast_duration,
            unmounted: false,
        }
    }

    /// The store renderers read from.
    #[must_use]
    pub fn store(&self) -> &Store<Vec<Toast>> {
        &self.shared.store
    }

    pub fn subscribe(&self, callback: impl Fn(&Vec<Toast>) + 'static) -> Subscription {
        self.shared.store.subscribe(callback)
    }

    /// Snapshot of all toasts, oldest first.
    #[must_use]
    pub fn toasts(&self) -> Vec<Toast> {
        self.shared.store.get()
    }

    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.shared
            .store
            .with(|t| t.iter().filter(|t| t.state == ToastState::Visible).count())
    }

    /// Show `toast`. Returns its id.
    pub fn toast(&mut self, toast: Toast) -> ToastId {
        let id = toast.id;
        if self.unmounted {
            return id;
        }
        let duration = match toast.duration {
            ToastDuration::Default => Some(self.default_duration),
            ToastDuration::After(d) => Some(d),
            ToastDuration::Persistent => None,
        };
        tracing::debug!(toast_id = id.0, title = %toast.title, "toast shown");
        self.shared.store.update(|toasts| {
            toasts.retain(|t| t.id != id);
            toasts.push(Toast {
                state: ToastState::Visible,
                ..toast
            });
        });
        self.evict_over_limit();

        match (duration, &self.shared.scheduler) {
            (Some(d), Some(s)) if !d.is_zero() => {
                let shared = self.shared.clone();
                let timer = s.schedule_after(d, move || {
                    shared.timers.borrow_mut().remove(&id);
                    shared.begin_dismiss(id);
                });
                self.shared.replace_timer(id, Some(timer));
            }
            (Some(_), None) => {
                tracing::debug!(toast_id = id.0, "no scheduler; toast stays until dismissed");
            }
            _ => {}
        }
        id
    }

    /// Start dismissing one toast. Returns `false` if it is not visible.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        if self.unmounted {
            return false;
        }
        self.shared.begin_dismiss(id)
    }

    pub fn dismiss_all(&mut self) {
        if self.unmounted {
            return;
        }
        let ids: Vec<ToastId> = self.shared.store.with(|t| t.iter().map(|t| t.id).collect());
        for id in ids {
            self.shared.begin_dismiss(id);
        }
    }

    /// Cancel every timer and freeze the store.
    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        let timers: Vec<TimerHandle> = self.shared.timers.borrow_mut().drain().map(|(_, t)| t).collect();
        if let Some(s) = &self.shared.scheduler {
            for timer in timers {
                s.cancel(timer);
            }
        }
        self.unmounted = true;
        tracing::debug!("toaster unmounted");
    }

    fn evict_over_limit(&self) {
        while self.visible_count() > self.limit {
            let oldest = self.shared.store.with(|t| {
                t.iter()
                    .find(|t| t.state == ToastState::Visible)
                    .map(|t| t.id)
            });
            match oldest {
                Some(id) => {
                    tracing::debug!(toast_id = id.0, "toast evicted over limit");
                    self.shared.begin_dismiss(id);
                }
                None => break,
            }
        }
    }
}

impl Drop for Toaster {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use veil_core::Size;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn setup() -> (Scheduler, Toaster) {
        let scheduler = Scheduler::new();
        let env = Env::new(Size::new(400.0, 800.0)).scheduler(scheduler.clone());
        (scheduler, Toaster::new(&env))
    }

    fn titles(t: &Toaster) -> Vec<String> {
        t.toasts().into_iter().map(|t| t.title).collect()
    }

    // --- lifecycle ---

    #[test]
    fn auto_dismiss_then_removal() {
        let (s, mut t) = setup();
        t.toast(Toast::new("Saved"));
        s.advance(ms(4999));
        assert_eq!(t.visible_count(), 1);
        s.advance(ms(1));
        assert_eq!(t.toasts()[0].state, ToastState::Leaving);
        s.advance(ms(150));
        assert!(t.toasts().is_empty());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn manual_dismiss_cancels_auto_timer() {
        let (s, mut t) = setup();
        let id = t.toast(Toast::new("Hi"));
        assert!(t.dismiss(id));
        assert!(!t.dismiss(id), "already leaving");
        assert_eq!(s.pending(), 1);
        s.advance(ms(150));
        assert!(t.toasts().is_empty());
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn persistent_toast_stays() {
        let (s, mut t) = setup();
        t.toast(Toast::new("Offline").duration(ToastDuration::Persistent));
        s.advance(ms(60_000));
        assert_eq!(t.visible_count(), 1);
    }

    #[test]
    fn custom_duration() {
        let (s, mut t) = setup();
        t.toast(Toast::new("Quick").duration(ToastDuration::After(ms(1000))));
        s.advance(ms(1000));
        assert_eq!(t.visible_count(), 0);
    }

    // --- limit ---

    #[test]
    fn limit_evicts_oldest_first() {
        let (s, mut t) = setup();
        for title in ["a", "b", "c", "d"] {
            t.toast(Toast::new(title));
        }
        assert_eq!(t.visible_count(), 3);
        assert_eq!(t.toasts()[0].state, ToastState::Leaving);
        s.advance(ms(150));
        assert_eq!(titles(&t), vec!["b", "c", "d"]);
    }

    #[test]
    fn dismiss_all_clears_after_exit() {
        let (s, mut t) = setup();
        t.toast(Toast::new("a"));
        t.toast(Toast::new("b").variant(ToastVariant::Destructive));
        t.dismiss_all();
        assert_eq!(t.visible_count(), 0);
        s.advance(ms(150));
        assert!(t.toasts().is_empty());
    }

    // --- store ---

    #[test]
    fn subscribers_see_changes() {
        let (s, mut t) = setup();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let _sub = t.subscribe(move |_| h.set(h.get() + 1));
        t.toast(Toast::new("a"));
        s.advance(ms(5150));
        assert_eq!(hits.get(), 3, "shown, leaving, removed");
    }

    #[test]
    fn without_scheduler_dismiss_is_immediate() {
        let env = Env::without_animation(Size::new(400.0, 800.0));
        let mut t = Toaster::new(&env);
        let id = t.toast(Toast::new("a"));
        assert!(t.dismiss(id));
        assert!(t.toasts().is_empty());
    }

    // --- teardown ---

    #[test]
    fn unmount_cancels_all_timers() {
        let (s, mut t) = setup();
        let id = t.toast(Toast::new("a"));
        t.toast(Toast::new("b"));
        t.dismiss(id);
        t.unmount();
        assert_eq!(s.pending(), 0);
        let before = t.toasts();
        s.advance(ms(10_000));
        assert_eq!(t.toasts(), before);
        assert!(!t.dismiss(id));
    }
}
