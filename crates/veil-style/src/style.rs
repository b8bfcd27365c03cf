#![forbid(unsafe_code)]

//! Backend-independent style descriptors.
//!
//! A [`Style`] is a bag of optional properties. Unset properties inherit from
//! whatever the style is merged onto, so resolvers can build a result from a
//! base style plus state-specific overrides without caring about order beyond
//! "later wins".

use bitflags::bitflags;

use crate::color::Rgba;

bitflags! {
    /// Text decoration flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleFlags: u8 {
        const BOLD = 1 << 0;
        const ITALIC = 1 << 1;
        const UNDERLINE = 1 << 2;
        const STRIKETHROUGH = 1 << 3;
    }
}

/// Backend-independent style descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Style {
    pub background: Option<Rgba>,
    pub foreground: Option<Rgba>,
    pub border: Option<Rgba>,
    /// Whole-element opacity in `[0, 1]`.
    pub opacity: Option<f32>,
    pub corner_radius: Option<f32>,
    /// Horizontal, vertical padding.
    pub padding: Option<(f32, f32)>,
    pub min_height: Option<f32>,
    pub flags: Option<StyleFlags>,
}

impl Style {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            background: None,
            foreground: None,
            border: None,
            opacity: None,
            corner_radius: None,
            padding: None,
            min_height: None,
            flags: None,
        }
    }

    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.background = Some(color);
        self
    }

    #[must_use]
    pub fn foreground(mut self, color: Rgba) -> Self {
        self.foreground = Some(color);
        self
    }

    #[must_use]
    pub fn border(mut self, color: Rgba) -> Self {
        self.border = Some(color);
        self
    }

    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity.clamp(0.0, 1.0));
        self
    }

    #[must_use]
    pub fn corner_radius(mut self, radius: f32) -> Self {
        self.corner_radius = Some(radius.max(0.0));
        self
    }

    #[must_use]
    pub fn padding(mut self, horizontal: f32, vertical: f32) -> Self {
        self.padding = Some((horizontal.max(0.0), vertical.max(0.0)));
        self
    }

    #[must_use]
    pub fn min_height(mut self, height: f32) -> Self {
        self.min_height = Some(height.max(0.0));
        self
    }

    /// Add decoration flags (accumulates with any already set).
    #[must_use]
    pub fn add_flags(mut self, flags: StyleFlags) -> Self {
        self.flags = Some(self.flags.unwrap_or_default() | flags);
        self
    }

    /// Whether no property is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::new()
    }

    /// Overlay `other` on top of `self`: set properties in `other` win.
    ///
    /// Flags are unioned rather than replaced.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        let flags = match (self.flags, other.flags) {
            (Some(a), Some(b)) => Some(a | b),
            (a, b) => b.or(a),
        };
        Self {
            background: other.background.or(self.background),
            foreground: other.foreground.or(self.foreground),
            border: other.border.or(self.border),
            opacity: other.opacity.or(self.opacity),
            corner_radius: other.corner_radius.or(self.corner_radius),
            padding: other.padding.or(self.padding),
            min_height: other.min_height.or(self.min_height),
            flags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_style_is_empty() {
        assert!(Style::new().is_empty());
        assert!(!Style::new().opacity(0.5).is_empty());
    }

    #[test]
    fn merge_later_wins() {
        let base = Style::new()
            .background(Rgba::WHITE)
            .foreground(Rgba::BLACK);
        let over = Style::new().background(Rgba::BLACK);
        let merged = base.merge(over);
        assert_eq!(merged.background, Some(Rgba::BLACK));
        assert_eq!(merged.foreground, Some(Rgba::BLACK));
    }

    #[test]
    fn merge_unions_flags() {
        let a = Style::new().add_flags(StyleFlags::BOLD);
        let b = Style::new().add_flags(StyleFlags::UNDERLINE);
        assert_eq!(
            a.merge(b).flags,
            Some(StyleFlags::BOLD | StyleFlags::UNDERLINE)
        );
        assert_eq!(Style::new().merge(a).flags, Some(StyleFlags::BOLD));
    }

    #[test]
    fn builders_clamp() {
        let s = Style::new().opacity(3.0).corner_radius(-1.0).padding(-2.0, 4.0);
        assert_eq!(s.opacity, Some(1.0));
        assert_eq!(s.corner_radius, Some(0.0));
        assert_eq!(s.padding, Some((0.0, 4.0)));
    }
}
