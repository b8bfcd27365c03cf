#![forbid(unsafe_code)]

//! Style types for veil.
//!
//! This crate provides:
//! - [`Rgba`] packed colors with opacity and compositing helpers
//! - [`Style`] descriptors with "later wins" merging
//! - [`Theme`] tokens and a runtime-swappable [`ThemeHandle`]
//! - pure resolvers mapping `(variant, state)` to a [`Style`]

pub mod color;
pub mod style;
pub mod theme;
pub mod variant;

pub use color::Rgba;
pub use style::{Style, StyleFlags};
pub use theme::{Theme, ThemeHandle};
pub use variant::{
    ButtonSize, ButtonVariant, DISABLED_OPACITY, InteractionState, ToastVariant, barrier_style,
    button_style, item_style, toast_style, trigger_style,
};
