#![forbid(unsafe_code)]

//! Layer that shows content above the normal layout.
//!
//! An [`OverlayHost`] presents at most one piece of content at a time,
//! optionally behind a barrier, and turns presses outside that content into
//! close requests on the owning [`Disclosure`].
//!
//! # Invariants
//!
//! 1. At most one overlay is presented per host; presenting again replaces it.
//! 2. While presented, every pointer event outside the content is consumed.
//! 3. A full tap outside (down and up both outside) requests a close at most
//!    once, and only if `dismiss_on_outside_press` is set.
//! 4. [`OverlayHost::teardown`] removes content without touching the owner.
//!
//! # Failure Modes
//!
//! - Events with no presented overlay are [`EventOutcome::Ignored`].
//! - A press that starts inside the content and ends outside never dismisses.

use std::sync::atomic::{AtomicU64, Ordering};

use veil_core::{Event, PointerPhase, Rect};
use veil_style::{Rgba, Style, Theme, barrier_style};

use crate::disclosure::Disclosure;

/// Global counter for overlay ids.
static OVERLAY_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifies one presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

impl OverlayId {
    fn next() -> Self {
        Self(OVERLAY_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Modal barrier drawn behind presented content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barrier {
    /// Barrier color; `None` uses the theme's overlay token.
    pub color: Option<Rgba>,
    /// Opacity at full open, in `[0.0, 1.0]`.
    pub opacity: f32,
}

impl Default for Barrier {
    fn default() -> Self {
        Self {
            color: None,
            opacity: 0.5,
        }
    }
}

impl Barrier {
    #[must_use]
    pub fn new(opacity: f32) -> Self {
        Self {
            color: None,
            opacity,
        }
    }

    #[must_use]
    pub fn color(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }

    /// Fill style at `progress` (0 = closed, 1 = open).
    #[must_use]
    pub fn style(&self, theme: &Theme, progress: f32) -> Style {
        let opacity = (self.opacity * progress).clamp(0.0, 1.0);
        match self.color {
            Some(color) => Style::new().background(color.with_opacity(opacity)),
            None => barrier_style(theme, opacity),
        }
    }
}

/// Presentation options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayOptions {
    /// Close the owner on a tap outside the content.
    pub dismiss_on_outside_press: bool,
    /// Close the owner on [`Event::Back`].
    pub dismiss_on_back: bool,
    /// Barrier behind the content; `None` for non-modal overlays.
    pub barrier: Option<Barrier>,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            dismiss_on_outside_press: true,
            dismiss_on_back: true,
            barrier: Some(Barrier::default()),
        }
    }
}

impl OverlayOptions {
    /// Floating content: dismissable, no barrier.
    #[must_use]
    pub fn floating() -> Self {
        Self {
            barrier: None,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn dismiss_on_outside_press(mut self, on: bool) -> Self {
        self.dismiss_on_outside_press = on;
        self
    }

    #[must_use]
    pub fn dismiss_on_back(mut self, on: bool) -> Self {
        self.dismiss_on_back = on;
        self
    }

    #[must_use]
    pub fn barrier(mut self, barrier: Option<Barrier>) -> Self {
        self.barrier = barrier;
        self
    }
}

/// What the host did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Nothing is presented.
    Ignored,
    /// Inside the content; the content should handle it.
    Forward,
    /// Outside the content; swallowed.
    Consumed,
    /// Swallowed, and a close was requested on the owner.
    DismissRequested,
}

#[derive(Debug, Clone, Copy)]
struct Presented {
    id: OverlayId,
    content: Rect,
    options: OverlayOptions,
    /// A press started outside the content and has not been released.
    outside_press: bool,
}

/// Single-slot overlay layer.
#[derive(Debug, Default)]
pub struct OverlayHost {
    current: Option<Presented>,
}

impl OverlayHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Show content at `content`, replacing anything already shown.
    pub fn present(&mut self, content: Rect, options: OverlayOptions) -> OverlayId {
        let id = OverlayId::next();
        if let Some(old) = self.current.take() {
            tracing::debug!(overlay_id = old.id.0, replaced_by = id.0, "overlay replaced");
        } else {
            tracing::debug!(overlay_id = id.0, "overlay presented");
        }
        self.current = Some(Presented {
            id,
            content,
            options,
            outside_press: false,
        });
        id
    }

    /// Move or resize the presented content.
    pub fn set_content_rect(&mut self, content: Rect) {
        if let Some(current) = self.current.as_mut() {
            current.content = content;
        }
    }

    /// Remove the presented content. Returns its id.
    pub fn dismiss(&mut self) -> Option<OverlayId> {
        let removed = self.current.take().map(|p| p.id);
        if let Some(id) = removed {
            tracing::debug!(overlay_id = id.0, "overlay dismissed");
        }
        removed
    }

    /// Forced removal on unmount. Never notifies the owner.
    pub fn teardown(&mut self) {
        if let Some(p) = self.current.take() {
            tracing::debug!(overlay_id = p.id.0, "overlay torn down");
        }
    }

    #[must_use]
    pub fn is_presented(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn current_id(&self) -> Option<OverlayId> {
        self.current.map(|p| p.id)
    }

    #[must_use]
    pub fn content_rect(&self) -> Option<Rect> {
        self.current.map(|p| p.content)
    }

    #[must_use]
    pub fn options(&self) -> Option<OverlayOptions> {
        self.current.map(|p| p.options)
    }

    /// Barrier fill at `progress`, if the presented overlay is modal.
    #[must_use]
    pub fn barrier_style(&self, theme: &Theme, progress: f32) -> Option<Style> {
        self.current
            .and_then(|p| p.options.barrier)
            .map(|b| b.style(theme, progress))
    }

    /// Route `event`, requesting a close on `owner` for outside taps and back.
    pub fn handle_event(&mut self, event: &Event, owner: &mut Disclosure) -> EventOutcome {
        let Some(current) = self.current.as_mut() else {
            return EventOutcome::Ignored;
        };

        match event {
            Event::Back => {
                if current.options.dismiss_on_back && owner.request_close() {
                    tracing::debug!(overlay_id = current.id.0, "back dismissed overlay");
                    return EventOutcome::DismissRequested;
                }
                EventOutcome::Consumed
            }
            Event::Pointer(pointer) => {
                let inside = current.content.contains(pointer.position);
                match pointer.phase {
                    PointerPhase::Down => {
                        current.outside_press = !inside;
                        if inside {
                            EventOutcome::Forward
                        } else {
                            EventOutcome::Consumed
                        }
                    }
                    PointerPhase::Move => {
                        if inside && !current.outside_press {
                            EventOutcome::Forward
                        } else {
                            EventOutcome::Consumed
                        }
                    }
                    PointerPhase::Up => {
                        let tapped_outside = current.outside_press && !inside;
                        current.outside_press = false;
                        if tapped_outside && current.options.dismiss_on_outside_press {
                            if owner.request_close() {
                                tracing::debug!(
                                    overlay_id = current.id.0,
                                    "outside press dismissed overlay"
                                );
                                return EventOutcome::DismissRequested;
                            }
                            return EventOutcome::Consumed;
                        }
                        if inside && !tapped_outside {
                            EventOutcome::Forward
                        } else {
                            EventOutcome::Consumed
                        }
                    }
                    PointerPhase::Cancel => {
                        current.outside_press = false;
                        EventOutcome::Consumed
                    }
                }
            }
            Event::LongPress(p) | Event::HoverEnter(p) | Event::HoverLeave(p) => {
                if current.content.contains(*p) {
                    EventOutcome::Forward
                } else {
                    EventOutcome::Consumed
                }
            }
        }
    }
}
