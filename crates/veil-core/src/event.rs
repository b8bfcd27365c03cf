#![forbid(unsafe_code)]

//! Input events delivered by the host framework.
//!
//! The host translates its native touch/mouse stream into [`Event`] values and
//! dispatches them on the UI thread, in order. Timestamps are monotonic and
//! share the time base of the runtime scheduler.

use std::time::Duration;

use crate::geometry::Point;

/// Phase of a pointer (touch or mouse) interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    /// Finger down / button pressed.
    Down,
    /// Pointer moved while down.
    Move,
    /// Finger lifted / button released.
    Up,
    /// The host aborted the gesture (scroll takeover, system gesture, …).
    Cancel,
}

/// A single pointer sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
    /// Monotonic timestamp of the sample.
    pub timestamp: Duration,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, position: Point, timestamp: Duration) -> Self {
        Self {
            phase,
            position,
            timestamp,
        }
    }

    pub fn down(x: f32, y: f32, timestamp: Duration) -> Self {
        Self::new(PointerPhase::Down, Point::new(x, y), timestamp)
    }

    pub fn moved(x: f32, y: f32, timestamp: Duration) -> Self {
        Self::new(PointerPhase::Move, Point::new(x, y), timestamp)
    }

    pub fn up(x: f32, y: f32, timestamp: Duration) -> Self {
        Self::new(PointerPhase::Up, Point::new(x, y), timestamp)
    }

    pub fn cancel(x: f32, y: f32, timestamp: Duration) -> Self {
        Self::new(PointerPhase::Cancel, Point::new(x, y), timestamp)
    }
}

/// Canonical input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// Raw pointer sample.
    Pointer(PointerEvent),
    /// Press held past the host's long-press threshold.
    LongPress(Point),
    /// Pointer entered a hover target (pointer devices only).
    HoverEnter(Point),
    /// Pointer left a hover target.
    HoverLeave(Point),
    /// Hardware back button or Escape key.
    Back,
}

impl Event {
    /// Position carried by the event, if any.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::Pointer(p) => Some(p.position),
            Self::LongPress(p) | Self::HoverEnter(p) | Self::HoverLeave(p) => Some(*p),
            Self::Back => None,
        }
    }
}

impl From<PointerEvent> for Event {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}
