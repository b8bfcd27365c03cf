#![forbid(unsafe_code)]

//! Slide index with optional wrap-around and swipe navigation.

use std::fmt;

use veil_core::{Event, Point, PointerPhase, Rect};

use crate::overlay::EventOutcome;

/// Swipe axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

type SelectSink = Box<dyn FnMut(usize)>;

/// Index state for a row of slides.
///
/// With looping off, `index` stays in `0..len` and the ends are hard stops.
/// With looping on, `next` from the last slide goes to the first and back.
/// `on_select` fires once per index change.
pub struct Carousel {
    len: usize,
    index: usize,
    looping: bool,
    orientation: Orientation,
    viewport: Rect,
    swipe_threshold: f32,
    press: Option<Point>,
    on_select: Option<SelectSink>,
}

impl fmt::Debug for Carousel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carousel")
            .field("len", &self.len)
            .field("index", &self.index)
            .field("looping", &self.looping)
            .field("orientation", &self.orientation)
            .finish()
    }
}

impl Carousel {
    /// Carousel of `len` slides shown inside `viewport`.
    #[must_use]
    pub fn new(len: usize, viewport: Rect) -> Self {
        Self {
            len,
            index: 0,
            looping: false,
            orientation: Orientation::Horizontal,
            viewport,
            swipe_threshold: 50.0,
            press: None,
            on_select: None,
        }
    }

    #[must_use]
    pub fn looping(mut self, on: bool) -> Self {
        self.looping = on;
        self
    }

    #[must_use]
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Minimum travel along the axis for a swipe to change slides.
    #[must_use]
    pub fn swipe_threshold(mut self, px: f32) -> Self {
        self.swipe_threshold = px.max(0.0);
        self
    }

    #[must_use]
    pub fn on_select(mut self, f: impl FnMut(usize) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn can_scroll_prev(&self) -> bool {
        self.len > 1 && (self.looping || self.index > 0)
    }

    #[must_use]
    pub fn can_scroll_next(&self) -> bool {
        self.len > 1 && (self.looping || self.index + 1 < self.len)
    }

    pub fn next(&mut self) -> bool {
        if !self.can_scroll_next() {
            return false;
        }
        self.select((self.index + 1) % self.len)
    }

    pub fn prev(&mut self) -> bool {
        if !self.can_scroll_prev() {
            return false;
        }
        self.select((self.index + self.len - 1) % self.len)
    }

    /// Jump to `index`. Out-of-range indices are ignored.
    pub fn scroll_to(&mut self, index: usize) -> bool {
        if index >= self.len {
            tracing::debug!(index, len = self.len, "slide index out of range");
            return false;
        }
        self.select(index)
    }

    /// Slides were added or removed. Keeps the index in range.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.index = 0;
        } else if self.index >= len {
            self.select(len - 1);
        }
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Swipes inside the viewport change slides on release.
    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        let Event::Pointer(pointer) = *event else {
            return EventOutcome::Ignored;
        };
        match pointer.phase {
            PointerPhase::Down if self.viewport.contains(pointer.position) => {
                self.press = Some(pointer.position);
                EventOutcome::Consumed
            }
            PointerPhase::Move if self.press.is_some() => EventOutcome::Consumed,
            PointerPhase::Up => {
                let Some(start) = self.press.take() else {
                    return EventOutcome::Ignored;
                };
                let travel = match self.orientation {
                    Orientation::Horizontal => pointer.position.x - start.x,
                    Orientation::Vertical => pointer.position.y - start.y,
                };
                if travel <= -self.swipe_threshold {
                    self.next();
                } else if travel >= self.swipe_threshold {
                    self.prev();
                }
                EventOutcome::Consumed
            }
            PointerPhase::Cancel if self.press.take().is_some() => {
                tracing::trace!("carousel swipe cancelled");
                EventOutcome::Consumed
            }
            _ => EventOutcome::Ignored,
        }
    }

    /// Drop the callback and any swipe in progress.
    pub fn unmount(&mut self) {
        self.on_select = None;
        self.press = None;
    }

    fn select(&mut self, index: usize) -> bool {
        if index == self.index {
            return false;
        }
        self.index = index;
        tracing::debug!(index, "slide selected");
        if let Some(sink) = self.on_select.as_mut() {
            sink(index);
        }
        true
    }
}
