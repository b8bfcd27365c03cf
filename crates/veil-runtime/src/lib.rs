#![forbid(unsafe_code)]

//! Runtime plumbing for veil components.
//!
//! This crate provides:
//! - [`reactive`]: observables, bindings, and subscription scopes
//! - [`store`]: explicit shared state passed to components by reference
//! - [`scheduler`]: the virtual-time timer queue behind every animation and delay
//! - [`config`]: tunables loaded from defaults, environment, and TOML
//!
//! Everything here is single-threaded and driven from the host's UI event
//! queue.

pub mod config;
pub mod reactive;
pub mod scheduler;
pub mod store;

pub use config::{ConfigError, VeilConfig};
pub use reactive::{Binding, BindingScope, Observable, Subscription, bind_mapped, bind_observable};
pub use scheduler::{Scheduler, TimerHandle};
pub use store::Store;
