#![forbid(unsafe_code)]

//! Pure `(variant, state) → Style` resolvers.
//!
//! # Invariants
//!
//! 1. Resolvers are pure: identical inputs produce identical styles.
//! 2. `DISABLED` always yields opacity [`DISABLED_OPACITY`], whatever else is set.
//! 3. `PRESSED` never changes layout properties (padding, height), only color
//!    and opacity, so pressing an element cannot reflow its neighbours.

use bitflags::bitflags;

use crate::color::Rgba;
use crate::style::{Style, StyleFlags};
use crate::theme::Theme;

/// Opacity applied to disabled elements.
pub const DISABLED_OPACITY: f32 = 0.5;

/// Opacity applied to pressed elements of variants without a pressed color.
pub const PRESSED_OPACITY: f32 = 0.8;

bitflags! {
    /// Interaction state of an element.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct InteractionState: u8 {
        const PRESSED = 1 << 0;
        const DISABLED = 1 << 1;
        const SELECTED = 1 << 2;
        const HIGHLIGHTED = 1 << 3;
        const OPEN = 1 << 4;
        const CHECKED = 1 << 5;
    }
}

/// Visual variant of a button-like trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonVariant {
    #[default]
    Default,
    Destructive,
    Outline,
    Secondary,
    Ghost,
    Link,
}

/// Size preset of a button-like trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonSize {
    #[default]
    Default,
    Sm,
    Lg,
    Icon,
}

impl ButtonSize {
    /// `(horizontal padding, vertical padding, min height)`.
    const fn metrics(self) -> (f32, f32, f32) {
        match self {
            Self::Default => (16.0, 8.0, 40.0),
            Self::Sm => (12.0, 6.0, 36.0),
            Self::Lg => (32.0, 10.0, 44.0),
            Self::Icon => (0.0, 0.0, 40.0),
        }
    }
}

/// Visual variant of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

/// Resolve a button style.
#[must_use]
pub fn button_style(
    theme: &Theme,
    variant: ButtonVariant,
    size: ButtonSize,
    state: InteractionState,
) -> Style {
    let (px, py, min_height) = size.metrics();
    let base = Style::new()
        .padding(px, py)
        .min_height(min_height)
        .corner_radius(6.0);

    let colors = match variant {
        ButtonVariant::Default => Style::new()
            .background(theme.primary)
            .foreground(theme.primary_foreground),
        ButtonVariant::Destructive => Style::new()
            .background(theme.destructive)
            .foreground(theme.destructive_foreground),
        ButtonVariant::Outline => Style::new()
            .background(theme.background)
            .foreground(theme.foreground)
            .border(theme.border),
        ButtonVariant::Secondary => Style::new()
            .background(theme.secondary)
            .foreground(theme.secondary_foreground),
        ButtonVariant::Ghost => Style::new()
            .background(Rgba::TRANSPARENT)
            .foreground(theme.foreground),
        ButtonVariant::Link => Style::new()
            .background(Rgba::TRANSPARENT)
            .foreground(theme.primary)
            .add_flags(StyleFlags::UNDERLINE),
    };

    let mut style = base.merge(colors);
    if state.contains(InteractionState::PRESSED) {
        style = style.merge(match variant {
            ButtonVariant::Outline | ButtonVariant::Ghost => Style::new()
                .background(theme.accent)
                .foreground(theme.accent_foreground),
            _ => Style::new().opacity(PRESSED_OPACITY),
        });
    }
    finish(style, state)
}

/// Resolve a menu/list item style (dropdown, context menu, command palette).
#[must_use]
pub fn item_style(theme: &Theme, state: InteractionState) -> Style {
    let mut style = Style::new()
        .padding(8.0, 6.0)
        .corner_radius(4.0)
        .foreground(theme.foreground);
    if state.intersects(InteractionState::HIGHLIGHTED | InteractionState::PRESSED) {
        style = style.merge(
            Style::new()
                .background(theme.accent)
                .foreground(theme.accent_foreground),
        );
    }
    if state.intersects(InteractionState::SELECTED | InteractionState::CHECKED) {
        style = style.add_flags(StyleFlags::BOLD);
    }
    finish(style, state)
}

/// Resolve an accordion/collapsible trigger style.
#[must_use]
pub fn trigger_style(theme: &Theme, state: InteractionState) -> Style {
    let mut style = Style::new().padding(0.0, 16.0).foreground(theme.foreground);
    if state.contains(InteractionState::OPEN) {
        style = style.add_flags(StyleFlags::BOLD);
    }
    if state.contains(InteractionState::PRESSED) {
        style = style.add_flags(StyleFlags::UNDERLINE);
    }
    finish(style, state)
}

/// Resolve a toast container style.
#[must_use]
pub fn toast_style(theme: &Theme, variant: ToastVariant) -> Style {
    let base = Style::new().padding(16.0, 12.0).corner_radius(8.0);
    base.merge(match variant {
        ToastVariant::Default => Style::new()
            .background(theme.background)
            .foreground(theme.foreground)
            .border(theme.border),
        ToastVariant::Destructive => Style::new()
            .background(theme.destructive)
            .foreground(theme.destructive_foreground)
            .border(theme.destructive),
    })
}

/// Modal barrier fill at the given animated opacity.
#[must_use]
pub fn barrier_style(theme: &Theme, opacity: f32) -> Style {
    Style::new().background(theme.overlay.with_opacity(opacity))
}

fn finish(style: Style, state: InteractionState) -> Style {
    if state.contains(InteractionState::DISABLED) {
        style.merge(Style::new().opacity(DISABLED_OPACITY))
    } else {
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VARIANTS: [ButtonVariant; 6] = [
        ButtonVariant::Default,
        ButtonVariant::Destructive,
        ButtonVariant::Outline,
        ButtonVariant::Secondary,
        ButtonVariant::Ghost,
        ButtonVariant::Link,
    ];

    const SIZES: [ButtonSize; 4] = [
        ButtonSize::Default,
        ButtonSize::Sm,
        ButtonSize::Lg,
        ButtonSize::Icon,
    ];

    #[test]
    fn default_button_uses_primary_colors() {
        let theme = Theme::light();
        let style = button_style(
            &theme,
            ButtonVariant::Default,
            ButtonSize::Default,
            InteractionState::empty(),
        );
        assert_eq!(style.background, Some(theme.primary));
        assert_eq!(style.foreground, Some(theme.primary_foreground));
        assert_eq!(style.opacity, None);
    }

    #[test]
    fn outline_pressed_uses_accent() {
        let theme = Theme::light();
        let style = button_style(
            &theme,
            ButtonVariant::Outline,
            ButtonSize::Sm,
            InteractionState::PRESSED,
        );
        assert_eq!(style.background, Some(theme.accent));
        assert_eq!(style.border, Some(theme.border));
    }

    #[test]
    fn link_is_underlined() {
        let style = button_style(
            &Theme::light(),
            ButtonVariant::Link,
            ButtonSize::Default,
            InteractionState::empty(),
        );
        assert!(style.flags.unwrap_or_default().contains(StyleFlags::UNDERLINE));
    }

    #[test]
    fn highlighted_item_uses_accent() {
        let theme = Theme::dark();
        let style = item_style(&theme, InteractionState::HIGHLIGHTED);
        assert_eq!(style.background, Some(theme.accent));
        let plain = item_style(&theme, InteractionState::empty());
        assert_eq!(plain.background, None);
    }

    #[test]
    fn barrier_applies_opacity() {
        let theme = Theme::light();
        let style = barrier_style(&theme, 0.5);
        assert_eq!(style.background.map(Rgba::a), Some(128));
    }

    #[test]
    fn destructive_toast() {
        let theme = Theme::light();
        let style = toast_style(&theme, ToastVariant::Destructive);
        assert_eq!(style.background, Some(theme.destructive));
    }

    proptest! {
        #[test]
        fn disabled_always_half_opacity(v in 0usize..6, s in 0usize..4, bits in 0u8..64) {
            let state = InteractionState::from_bits_truncate(bits) | InteractionState::DISABLED;
            let style = button_style(&Theme::light(), VARIANTS[v], SIZES[s], state);
            prop_assert_eq!(style.opacity, Some(DISABLED_OPACITY));
            let item = item_style(&Theme::light(), state);
            prop_assert_eq!(item.opacity, Some(DISABLED_OPACITY));
        }

        #[test]
        fn pressed_never_changes_layout(v in 0usize..6, s in 0usize..4) {
            let theme = Theme::light();
            let idle = button_style(&theme, VARIANTS[v], SIZES[s], InteractionState::empty());
            let pressed = button_style(&theme, VARIANTS[v], SIZES[s], InteractionState::PRESSED);
            prop_assert_eq!(idle.padding, pressed.padding);
            prop_assert_eq!(idle.min_height, pressed.min_height);
        }

        #[test]
        fn resolvers_are_pure(v in 0usize..6, s in 0usize..4, bits in 0u8..64) {
            let state = InteractionState::from_bits_truncate(bits);
            let theme = Theme::dark();
            prop_assert_eq!(
                button_style(&theme, VARIANTS[v], SIZES[s], state),
                button_style(&theme, VARIANTS[v], SIZES[s], state)
            );
        }
    }
}
