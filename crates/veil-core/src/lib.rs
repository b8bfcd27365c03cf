#![forbid(unsafe_code)]

//! Core primitives for veil.
//!
//! This crate provides:
//! - [`geometry`]: [`Point`], [`Size`], and [`Rect`] in logical pixels
//! - [`event`]: the input stream consumed by disclosure components
//! - [`clock`]: monotonic time sources for the runtime scheduler
//! - `logging`: structured log bootstrap (`tracing-json` feature)

pub mod clock;
pub mod event;
pub mod geometry;
#[cfg(feature = "tracing-json")]
pub mod logging;

pub use clock::{Clock, ManualClock, SystemClock};
pub use event::{Event, PointerEvent, PointerPhase};
pub use geometry::{Point, Rect, Size};
