#![forbid(unsafe_code)]

//! Hover card: preview anchored to a trigger, opened by a resting pointer.
//!
//! Hovering the trigger opens after `tooltip_delay`. Leaving the trigger or
//! the card closes after `hover_close_delay`, unless the pointer comes back
//! first. A long press on the trigger opens at once (touch devices).

use std::time::Duration;

use veil_core::{Event, Point, Rect, Size};

use crate::disclosure::Disclosure;
use crate::env::Env;
use crate::floating::DelayedRequest;
use crate::overlay::{EventOutcome, OverlayOptions};
use crate::position::{Placement, Side};
use crate::surface::{Surface, SurfacePlacement, TriggerAnchor};
use crate::transition::{Completion, TransitionPhase};

/// Preview card shown while the pointer rests on a trigger.
#[derive(Debug)]
pub struct HoverCard {
    surface: Surface,
    anchor: TriggerAnchor,
    delay: DelayedRequest,
    open_delay: Duration,
    close_delay: Duration,
}

impl HoverCard {
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
                    placement: env.placement(Side::Bottom),
                },
                OverlayOptions::floating(),
                content_size,
            ),
            anchor,
            delay: DelayedRequest::new(env.scheduler.clone()),
            open_delay: env.config.tooltip_delay,
            close_delay: env.config.hover_close_delay,
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
    pub fn delays(mut self, open: Duration, close: Duration) -> Self {
        self.open_delay = open;
        self.close_delay = close;
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

    /// Whether an open or close is waiting on its delay.
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

    pub fn open(&mut self) -> bool {
        self.delay.cancel();
        self.surface.open()
    }

    pub fn close(&mut self) -> bool {
        self.delay.cancel();
        self.surface.close()
    }

    /// Apply a fired delay, then reconcile the surface.
    pub fn sync(&mut self) -> Option<Completion> {
        match self.delay.take() {
            Some(true) => {
                self.surface.open();
            }
            Some(false) => {
                self.surface.close();
            }
            None => {}
        }
        self.surface.sync()
    }

    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        if self.surface.is_unmounted() {
            return EventOutcome::Ignored;
        }
        self.sync();
        match *event {
            Event::HoverEnter(p) if self.is_hover_target(p) => {
                if self.surface.is_open() {
                    self.delay.cancel();
                } else {
                    self.delay.schedule(true, self.open_delay);
                }
                EventOutcome::Consumed
            }
            Event::HoverLeave(_) => {
                if self.surface.is_open() {
                    self.delay.schedule(false, self.close_delay);
                } else {
                    self.delay.cancel();
                }
                self.sync();
                EventOutcome::Consumed
            }
            Event::LongPress(p) if self.anchor.bounds().contains(p) => {
                self.open();
                EventOutcome::Consumed
            }
            _ => {
                let outcome = self.surface.handle_event(event);
                if outcome == EventOutcome::DismissRequested {
                    self.delay.cancel();
                }
                outcome
            }
        }
    }

    pub fn unmount(&mut self) {
        self.delay.cancel();
        self.surface.unmount();
    }

    fn is_hover_target(&self, p: Point) -> bool {
        self.anchor.bounds().contains(p) || self.surface.content_rect().is_some_and(|r| r.contains(p))
    }
}
