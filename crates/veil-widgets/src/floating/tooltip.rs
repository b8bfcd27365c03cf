#![forbid(unsafe_code)]

//! Tooltip: non-interactive label anchored above a trigger.
//!
//! Opens once the trigger has been hovered or held for `tooltip_delay`, or on
//! the host's long-press event. Closes as soon as the pointer is released or
//! leaves. Never captures input.

use std::time::Duration;

use veil_core::{Event, PointerPhase, Rect, Size};

use crate::disclosure::Disclosure;
use crate::env::Env;
use crate::floating::DelayedRequest;
use crate::overlay::{EventOutcome, OverlayOptions};
use crate::position::{Placement, Side};
use crate::surface::{Surface, SurfacePlacement, TriggerAnchor};
use crate::transition::{Completion, TransitionPhase};

/// Non-interactive label shown above a trigger.
#[derive(Debug)]
pub struct Tooltip {
    surface: Surface,
    anchor: TriggerAnchor,
    delay: DelayedRequest,
    open_delay: Duration,
}

impl Tooltip {
    #[must_use]
    pub fn new(
        env: &Env,
        disclosure: Disclosure,
        anchor: impl Into<TriggerAnchor>,
        content_size: Size,
    ) -> Self {
        let anchor = anchor.into();
        Self {
            surface: Surface::new(
                env,
                disclosure,
                SurfacePlacement::Anchored {
                    anchor: anchor.clone(),
                    placement: env.placement(Side::Top),
                },
                OverlayOptions::floating().dismiss_on_outside_press(false),
                content_size,
            ),
            anchor,
            delay: DelayedRequest::new(env.scheduler.clone()),
            open_delay: env.config.tooltip_delay,
        }
    }

    #[must_use]
    pub fn placement(mut self, placement: Placement) -> Self {
        self.surface.set_placement(SurfacePlacement::Anchored {
            anchor: self.anchor.clone(),
            placement,
        });
        self
    }

    #[must_use]
    pub fn delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.surface.is_open()
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.surface.phase()
    }

    #[must_use]
    pub fn has_pending_delay(&self) -> bool {
        self.delay.is_pending()
    }

    #[must_use]
    pub fn content_rect(&self) -> Option<Rect> {
        self.surface.content_rect()
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn sync(&mut self) -> Option<Completion> {
        if self.delay.take() == Some(true) {
            self.surface.open();
        }
        self.surface.sync()
    }

    /// Observe input. Always returns [`EventOutcome::Ignored`] so the event
    /// continues to the trigger, except for a back press that closed it.
    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        if self.surface.is_unmounted() {
            return EventOutcome::Ignored;
        }
        self.sync();
        match *event {
            Event::HoverEnter(p) if self.anchor.bounds().contains(p) => self.arm(),
            Event::HoverLeave(_) => self.release(),
            Event::LongPress(p) if self.anchor.bounds().contains(p) => {
                self.delay.cancel();
                self.surface.open();
            }
            Event::Pointer(pointer) => match pointer.phase {
                PointerPhase::Down if self.anchor.bounds().contains(pointer.position) => {
                    self.arm();
                }
                PointerPhase::Move if !self.anchor.bounds().contains(pointer.position) => {
                    self.release();
                }
                PointerPhase::Up | PointerPhase::Cancel => self.release(),
                _ => {}
            },
            Event::Back => {
                if self.surface.is_open() {
                    return self.surface.handle_event(event);
                }
            }
            _ => {}
        }
        EventOutcome::Ignored
    }

    pub fn unmount(&mut self) {
        self.delay.cancel();
        self.surface.unmount();
    }

    fn arm(&mut self) {
        if !self.surface.is_open() {
            self.delay.schedule(true, self.open_delay);
        }
    }

    fn release(&mut self) {
        self.delay.cancel();
        if self.surface.is_open() {
            self.surface.close();
        }
    }
}
