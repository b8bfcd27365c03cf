#![forbid(unsafe_code)]

use veil_core::{Event, Point, Rect, Size};

use crate::disclosure::Disclosure;
use crate::env::Env;
use crate::floating::TriggerTap;
use crate::menu::{MenuActivation, MenuModel};
use crate::overlay::{EventOutcome, OverlayOptions};
use crate::position::{Align, Placement, Side};
use crate::surface::{Surface, SurfacePlacement, TriggerAnchor};
use crate::transition::{Completion, TransitionPhase};

fn close_after(surface: &mut Surface, value: &str, activation: MenuActivation) {
    if activation.closes_menu() {
        tracing::debug!(value, "menu closing after selection");
        surface.close();
    }
}

/// Menu dropped down from a trigger button.
#[derive(Debug)]
pub struct DropdownMenu {
    surface: Surface,
    anchor: TriggerAnchor,
    tap: TriggerTap,
    model: MenuModel,
}

impl DropdownMenu {
    #[must_use]
    pub fn new(
        env: &Env,
        disclosure: Disclosure,
        anchor: impl Into<TriggerAnchor>,
        model: MenuModel,
        content_size: Size,
    ) -> Self {
        let anchor = anchor.into();
        Self {
            surface: Surface::new(
                env,
                disclosure,
                SurfacePlacement::Anchored {
                    anchor: anchor.clone(),
                    placement: env.placement(Side::Bottom).align(Align::Start),
                },
                OverlayOptions::floating(),
                content_size,
            ),
            anchor,
            tap: TriggerTap::default(),
            model,
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
    pub fn is_open(&self) -> bool {
        self.surface.is_open()
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.surface.phase()
    }

    #[must_use]
    pub fn trigger_bounds(&self) -> Rect {
        self.anchor.bounds()
    }

    #[must_use]
    pub fn content_rect(&self) -> Option<Rect> {
        self.surface.content_rect()
    }

    #[must_use]
    pub fn model(&self) -> &MenuModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut MenuModel {
        &mut self.model
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn open(&mut self) -> bool {
        self.surface.open()
    }

    pub fn close(&mut self) -> bool {
        self.surface.close()
    }

    pub fn toggle(&mut self) -> bool {
        self.surface.toggle()
    }

    pub fn set_open(&mut self, open: Option<bool>) {
        self.surface.set_open(open);
    }

    /// Press on the entry with `value`. Ignored while the menu is closed.
    pub fn activate(&mut self, value: &str) -> MenuActivation {
        if !self.surface.is_open() {
            return MenuActivation::Unknown;
        }
        let activation = self.model.activate(value);
        close_after(&mut self.surface, value, activation);
        activation
    }

    pub fn sync(&mut self) -> Option<Completion> {
        self.surface.sync()
    }

    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        let outcome = self.surface.handle_event(event);
        if outcome != EventOutcome::Ignored {
            return outcome;
        }
        if self.tap.feed(event, self.anchor.bounds()) {
            self.surface.open();
            return EventOutcome::Consumed;
        }
        EventOutcome::Ignored
    }

    pub fn unmount(&mut self) {
        self.surface.unmount();
    }
}

/// Menu opened by a long press inside a region, at the press point.
#[derive(Debug)]
pub struct ContextMenu {
    surface: Surface,
    region: TriggerAnchor,
    model: MenuModel,
}

impl ContextMenu {
    #[must_use]
    pub fn new(
        env: &Env,
        disclosure: Disclosure,
        region: impl Into<TriggerAnchor>,
        model: MenuModel,
        content_size: Size,
    ) -> Self {
        let region = region.into();
        let origin = region.bounds().origin();
        Self {
            surface: Surface::new(
                env,
                disclosure,
                SurfacePlacement::AtPoint(origin),
                OverlayOptions::floating(),
                content_size,
            ),
            region,
            model,
        }
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
    pub fn content_rect(&self) -> Option<Rect> {
        self.surface.content_rect()
    }

    #[must_use]
    pub fn model(&self) -> &MenuModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut MenuModel {
        &mut self.model
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Open with the menu's corner at `point`.
    pub fn open_at(&mut self, point: Point) -> bool {
        if !self.surface.is_open() {
            self.surface.set_placement(SurfacePlacement::AtPoint(point));
        }
        self.surface.open()
    }

    pub fn close(&mut self) -> bool {
        self.surface.close()
    }

    pub fn set_open(&mut self, open: Option<bool>) {
        self.surface.set_open(open);
    }

    pub fn activate(&mut self, value: &str) -> MenuActivation {
        if !self.surface.is_open() {
            return MenuActivation::Unknown;
        }
        let activation = self.model.activate(value);
        close_after(&mut self.surface, value, activation);
        activation
    }

    pub fn sync(&mut self) -> Option<Completion> {
        self.surface.sync()
    }

    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        let outcome = self.surface.handle_event(event);
        if outcome != EventOutcome::Ignored {
            return outcome;
        }
        match *event {
            Event::LongPress(p) if self.region.bounds().contains(p) => {
                self.open_at(p);
                EventOutcome::Consumed
            }
            _ => EventOutcome::Ignored,
        }
    }

    pub fn unmount(&mut self) {
        self.surface.unmount();
    }
}
