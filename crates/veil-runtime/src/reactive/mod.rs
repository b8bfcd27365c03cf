#![forbid(unsafe_code)]

//! Single-threaded reactive primitives.
//!
//! - [`Observable`]: shared, version-tracked value with change callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`Binding`]: lazily evaluated view over observable state.
//! - [`BindingScope`]: owns a component's subscriptions so teardown is one drop.
//!
//! Everything here uses `Rc<RefCell<..>>`; values never cross threads. All
//! entry points are reached from the host's UI event queue.

pub mod binding;
pub mod observable;

pub use binding::{Binding, BindingScope, bind_mapped, bind_observable};
pub use observable::{Observable, Subscription};
