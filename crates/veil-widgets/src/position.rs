#![forbid(unsafe_code)]

//! Placement of floating content next to its anchor.
//!
//! [`resolve_position`] is a pure function of its inputs. The anchor bounds
//! are sampled once, when the content is presented; nothing here tracks
//! scrolling.
//!
//! # Invariants
//!
//! 1. Identical inputs produce identical outputs.
//! 2. The preferred side is used if the content fits there; otherwise the
//!    opposite side if it fits there; otherwise the preferred side, clamped.
//!    The side never changes more than once.
//! 3. If the content is no larger than the viewport, the returned rectangle
//!    lies inside `[0, width] × [0, height]`. Oversized content is pinned to
//!    the top/left edge.

use veil_core::{Point, Rect, Size};

/// Gap between anchor and content when no offset is given.
pub const DEFAULT_OFFSET: f32 = 6.0;

/// Side of the anchor the content sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Side {
    Top,
    Right,
    #[default]
    Bottom,
    Left,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether the side stacks content vertically relative to the anchor.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Cross-axis alignment against the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    Start,
    #[default]
    Center,
    End,
}

/// Full placement request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub side: Side,
    pub align: Align,
    /// Gap from the anchor along the main axis, in px.
    pub offset: f32,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            side: Side::Bottom,
            align: Align::Center,
            offset: DEFAULT_OFFSET,
        }
    }
}

impl Placement {
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self {
            side,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: f32) -> Self {
        self.offset = offset;
        self
    }
}

/// Where the content ended up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPosition {
    pub top: f32,
    pub left: f32,
    /// Side actually used, after any flip.
    pub side: Side,
}

impl ResolvedPosition {
    /// Content rectangle at this position.
    #[must_use]
    pub fn rect(self, content: Size) -> Rect {
        Rect::from_origin_size(Point::new(self.left, self.top), content)
    }
}

/// Place `content` on `preferred` side of `anchor` with the default gap and
/// centered alignment.
#[must_use]
pub fn resolve_position(
    anchor: Rect,
    content: Size,
    viewport: Size,
    preferred: Side,
) -> ResolvedPosition {
    resolve_placement(anchor, content, viewport, Placement::new(preferred))
}

/// Place `content` next to `anchor` according to `placement`.
#[must_use]
pub fn resolve_placement(
    anchor: Rect,
    content: Size,
    viewport: Size,
    placement: Placement,
) -> ResolvedPosition {
    let offset = if placement.offset.is_finite() {
        placement.offset.max(0.0)
    } else {
        0.0
    };
    let preferred = placement.side;

    let side = if fits(anchor, content, viewport, preferred, offset) {
        preferred
    } else if fits(anchor, content, viewport, preferred.opposite(), offset) {
        tracing::trace!(?preferred, "floating content flipped");
        preferred.opposite()
    } else {
        tracing::trace!(?preferred, "floating content fits no side; clamping");
        preferred
    };

    let (main_left, main_top) = main_axis_origin(anchor, content, side, offset);
    let (left, top) = if side.is_vertical() {
        let cross = align_start(anchor.x, anchor.width, content.width, placement.align);
        (
            clamp_axis(cross, content.width, viewport.width),
            clamp_axis(main_top, content.height, viewport.height),
        )
    } else {
        let cross = align_start(anchor.y, anchor.height, content.height, placement.align);
        (
            clamp_axis(main_left, content.width, viewport.width),
            clamp_axis(cross, content.height, viewport.height),
        )
    };

    ResolvedPosition { top, left, side }
}

/// Content rectangle centered in the viewport.
#[must_use]
pub fn centered(content: Size, viewport: Size) -> Rect {
    let left = clamp_axis((viewport.width - content.width) / 2.0, content.width, viewport.width);
    let top = clamp_axis(
        (viewport.height - content.height) / 2.0,
        content.height,
        viewport.height,
    );
    Rect::from_origin_size(Point::new(left, top), content)
}

/// Content rectangle attached to a viewport edge, spanning the full cross axis.
/// `extent` is the height (top/bottom) or width (left/right) of the content.
#[must_use]
pub fn edge(side: Side, extent: f32, viewport: Size) -> Rect {
    match side {
        Side::Top => Rect::new(0.0, 0.0, viewport.width, extent.min(viewport.height)),
        Side::Bottom => {
            let h = extent.min(viewport.height);
            Rect::new(0.0, viewport.height - h, viewport.width, h)
        }
        Side::Left => Rect::new(0.0, 0.0, extent.min(viewport.width), viewport.height),
        Side::Right => {
            let w = extent.min(viewport.width);
            Rect::new(viewport.width - w, 0.0, w, viewport.height)
        }
    }
}

fn main_axis_origin(anchor: Rect, content: Size, side: Side, offset: f32) -> (f32, f32) {
    match side {
        Side::Top => (anchor.x, anchor.y - offset - content.height),
        Side::Bottom => (anchor.x, anchor.bottom() + offset),
        Side::Left => (anchor.x - offset - content.width, anchor.y),
        Side::Right => (anchor.right() + offset, anchor.y),
    }
}

fn fits(anchor: Rect, content: Size, viewport: Size, side: Side, offset: f32) -> bool {
    let (left, top) = main_axis_origin(anchor, content, side, offset);
    match side {
        Side::Top => top >= 0.0,
        Side::Bottom => top + content.height <= viewport.height,
        Side::Left => left >= 0.0,
        Side::Right => left + content.width <= viewport.width,
    }
}

fn align_start(anchor_start: f32, anchor_len: f32, content_len: f32, align: Align) -> f32 {
    match align {
        Align::Start => anchor_start,
        Align::Center => anchor_start + (anchor_len - content_len) / 2.0,
        Align::End => anchor_start + anchor_len - content_len,
    }
}

/// Clamp a start coordinate so `[start, start + len]` stays inside `[0, limit]`.
/// NaN inputs land on 0.
fn clamp_axis(start: f32, len: f32, limit: f32) -> f32 {
    let max = (limit - len).max(0.0);
    start.max(0.0).min(max)
}
