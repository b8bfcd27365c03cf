#![forbid(unsafe_code)]

//! Design tokens and a swappable theme handle.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::color::Rgba;

/// Color tokens shared by every resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Theme {
    pub background: Rgba,
    pub foreground: Rgba,
    pub primary: Rgba,
    pub primary_foreground: Rgba,
    pub secondary: Rgba,
    pub secondary_foreground: Rgba,
    pub muted: Rgba,
    pub muted_foreground: Rgba,
    pub accent: Rgba,
    pub accent_foreground: Rgba,
    pub destructive: Rgba,
    pub destructive_foreground: Rgba,
    pub border: Rgba,
    /// Modal barrier color before opacity is applied.
    pub overlay: Rgba,
}

impl Theme {
    /// Light palette.
    #[must_use]
    pub const fn light() -> Self {
        Self {
            background: Rgba::rgb(255, 255, 255),
            foreground: Rgba::rgb(9, 9, 11),
            primary: Rgba::rgb(24, 24, 27),
            primary_foreground: Rgba::rgb(250, 250, 250),
            secondary: Rgba::rgb(244, 244, 245),
            secondary_foreground: Rgba::rgb(24, 24, 27),
            muted: Rgba::rgb(244, 244, 245),
            muted_foreground: Rgba::rgb(113, 113, 122),
            accent: Rgba::rgb(244, 244, 245),
            accent_foreground: Rgba::rgb(24, 24, 27),
            destructive: Rgba::rgb(239, 68, 68),
            destructive_foreground: Rgba::rgb(250, 250, 250),
            border: Rgba::rgb(228, 228, 231),
            overlay: Rgba::rgb(0, 0, 0),
        }
    }

    /// Dark palette.
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            background: Rgba::rgb(9, 9, 11),
            foreground: Rgba::rgb(250, 250, 250),
            primary: Rgba::rgb(250, 250, 250),
            primary_foreground: Rgba::rgb(24, 24, 27),
            secondary: Rgba::rgb(39, 39, 42),
            secondary_foreground: Rgba::rgb(250, 250, 250),
            muted: Rgba::rgb(39, 39, 42),
            muted_foreground: Rgba::rgb(161, 161, 170),
            accent: Rgba::rgb(39, 39, 42),
            accent_foreground: Rgba::rgb(250, 250, 250),
            destructive: Rgba::rgb(127, 29, 29),
            destructive_foreground: Rgba::rgb(250, 250, 250),
            border: Rgba::rgb(39, 39, 42),
            overlay: Rgba::rgb(0, 0, 0),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

/// Shared theme that can be swapped at runtime (light/dark switch).
///
/// Readers get a consistent snapshot; a swap is visible to the next `load`.
#[derive(Debug, Clone)]
pub struct ThemeHandle {
    current: Arc<ArcSwap<Theme>>,
}

impl ThemeHandle {
    #[must_use]
    pub fn new(theme: Theme) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(theme)),
        }
    }

    /// Snapshot of the active theme.
    #[must_use]
    pub fn load(&self) -> Theme {
        **self.current.load()
    }

    /// Replace the active theme.
    pub fn store(&self, theme: Theme) {
        let previous = self.current.swap(Arc::new(theme));
        if *previous != theme {
            tracing::debug!(background = ?theme.background, "theme swapped");
        }
    }
}

impl Default for ThemeHandle {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}
