#![forbid(unsafe_code)]

//! Read bindings and per-component subscription scopes.
//!
//! A [`Binding<T>`] derives a display value from an [`Observable`] on demand.
//! A [`BindingScope`] owns every subscription a component registers, so
//! unmounting the component is a single `drop` (or [`BindingScope::clear`]).
//!
//! # Invariants
//!
//! 1. `Binding::get()` always reflects the current source value.
//! 2. A binding's transform runs on every `get()`; nothing is cached.
//! 3. After a scope is dropped or cleared, none of its callbacks fire again.

use std::fmt;
use std::rc::Rc;

use super::observable::{Observable, Subscription};

/// Read-only, lazily evaluated view of observable state.
pub struct Binding<T> {
    eval: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("value", &self.get())
            .finish()
    }
}

impl<T: 'static> Binding<T> {
    /// Binding that evaluates `f` on each `get()`.
    pub fn new(f: impl Fn() -> T + 'static) -> Self {
        Self { eval: Rc::new(f) }
    }

    /// Binding that always yields `value`.
    pub fn constant(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(move || value.clone())
    }

    #[must_use]
    pub fn get(&self) -> T {
        (self.eval)()
    }

    /// Chain a further transform.
    pub fn then<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Binding<U> {
        Binding {
            eval: Rc::new(move || f((self.eval)())),
        }
    }
}

/// Identity binding to `source`.
pub fn bind_observable<T: Clone + PartialEq + 'static>(source: &Observable<T>) -> Binding<T> {
    let src = source.clone();
    Binding::new(move || src.get())
}

/// Binding to `source` transformed by `map`.
pub fn bind_mapped<S: Clone + PartialEq + 'static, T: 'static>(
    source: &Observable<S>,
    map: impl Fn(&S) -> T + 'static,
) -> Binding<T> {
    let src = source.clone();
    Binding::new(move || src.with(|v| map(v)))
}

/// Subscriptions held on behalf of one component instance.
#[derive(Default)]
pub struct BindingScope {
    subscriptions: Vec<Subscription>,
}

impl BindingScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep `sub` alive until the scope is dropped or cleared.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to `source` for the lifetime of this scope.
    pub fn subscribe<T: Clone + PartialEq + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        self.subscriptions.push(source.subscribe(callback));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release every subscription now. The scope stays usable.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("binding_count", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn binding_tracks_source() {
        let open = Observable::new(false);
        let b = bind_observable(&open);
        assert!(!b.get());
        open.set(true);
        assert!(b.get());
    }

    #[test]
    fn mapped_binding_derives_label() {
        let unread = Observable::new(2usize);
        let label = bind_mapped(&unread, |n| format!("{n} notifications"));
        assert_eq!(label.get(), "2 notifications");
        unread.set(0);
        assert_eq!(label.get(), "0 notifications");
    }

    #[test]
    fn then_chains_transforms() {
        let count = Observable::new(4);
        let doubled = bind_observable(&count).then(|v| v * 2);
        assert_eq!(doubled.get(), 8);
    }

    #[test]
    fn constant_binding() {
        let b = Binding::constant("fixed");
        assert_eq!(b.get(), "fixed");
        assert_eq!(b.clone().get(), "fixed");
    }

    #[test]
    fn scope_drop_releases_subscriptions() {
        let obs = Observable::new(0);
        let seen = Rc::new(Cell::new(0));
        {
            let mut scope = BindingScope::new();
            let s = Rc::clone(&seen);
            scope.subscribe(&obs, move |v| s.set(*v));
            obs.set(1);
            assert_eq!(seen.get(), 1);
        }
        obs.set(99);
        assert_eq!(seen.get(), 1, "callback should not fire after scope dropped");
    }

    #[test]
    fn scope_clear_is_reusable() {
        let obs = Observable::new(0);
        let first = Rc::new(Cell::new(false));
        let second = Rc::new(Cell::new(false));

        let mut scope = BindingScope::new();
        let f = Rc::clone(&first);
        scope.subscribe(&obs, move |_| f.set(true));
        scope.clear();
        assert!(scope.is_empty());

        let s = Rc::clone(&second);
        scope.hold(obs.subscribe(move |_| s.set(true)));
        obs.set(1);
        assert!(!first.get());
        assert!(second.get());
        assert_eq!(scope.len(), 1);
    }

    #[test]
    fn scope_debug_format() {
        let mut scope = BindingScope::new();
        let obs = Observable::new(0);
        scope.subscribe(&obs, |_| {}).subscribe(&obs, |_| {});
        assert!(format!("{scope:?}").contains("binding_count: 2"));
    }
}
