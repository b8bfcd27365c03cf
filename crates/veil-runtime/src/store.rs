#![forbid(unsafe_code)]

//! Explicit shared state container.
//!
//! A [`Store`] is built once per screen (or app root) and handed to every
//! component that needs it. Toasts, sidebar state, and grouped collapsibles
//! all live in stores instead of ambient context lookups.

use std::fmt;

use crate::reactive::{Binding, Observable, Subscription, bind_mapped};

/// Shared, subscribable state. Clones refer to the same state.
pub struct Store<S> {
    state: Observable<S>,
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Store").field(&self.state).finish()
    }
}

impl<S: Default + Clone + PartialEq + 'static> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Clone + PartialEq + 'static> Store<S> {
    pub fn new(initial: S) -> Self {
        Self {
            state: Observable::new(initial),
        }
    }

    /// Snapshot of the state.
    #[must_use]
    pub fn get(&self) -> S {
        self.state.get()
    }

    /// Read the state without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        self.state.with(f)
    }

    /// Apply `f` to the state. Subscribers run only if the state changed.
    pub fn update(&self, f: impl FnOnce(&mut S)) {
        self.state.update(f);
    }

    /// Replace the state.
    pub fn set(&self, state: S) {
        self.state.set(state);
    }

    /// Observe every change. The callback lives as long as the guard.
    pub fn subscribe(&self, callback: impl Fn(&S) + 'static) -> Subscription {
        self.state.subscribe(callback)
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.state.version()
    }

    /// Derived value that re-reads the state on every `get()`.
    pub fn bind<T: 'static>(&self, map: impl Fn(&S) -> T + 'static) -> Binding<T> {
        bind_mapped(&self.state, map)
    }

    /// Underlying observable, for bindings.
    #[must_use]
    pub fn observable(&self) -> &Observable<S> {
        &self.state
    }
}
