#![forbid(unsafe_code)]

//! Edge-attached sheets and the drag-dismissable bottom drawer.

use std::cell::Cell;
use std::rc::Rc;

use veil_core::{Event, Point, PointerPhase, Rect, Size};

use crate::disclosure::Disclosure;
use crate::drag::{DragDismiss, DragPhase};
use crate::env::Env;
use crate::overlay::{EventOutcome, OverlayOptions};
use crate::position::Side;
use crate::surface::{Surface, SurfacePlacement};
use crate::transition::{Completion, TransitionPhase};

fn edge_size(side: Side, extent: f32) -> Size {
    if side.is_vertical() {
        Size::new(0.0, extent)
    } else {
        Size::new(extent, 0.0)
    }
}

/// Shift `rect` away from the viewport towards `side` by `distance`.
fn slide(rect: Rect, side: Side, distance: f32) -> Rect {
    match side {
        Side::Top => rect.offset(0.0, -distance),
        Side::Bottom => rect.offset(0.0, distance),
        Side::Left => rect.offset(-distance, 0.0),
        Side::Right => rect.offset(distance, 0.0),
    }
}

/// Displacement `slide` applies for `distance` towards `side`.
fn slide_vector(side: Side, distance: f32) -> Point {
    let moved = slide(Rect::default(), side, distance);
    Point::new(moved.x, moved.y)
}

/// Modal panel sliding in from a viewport edge.
#[derive(Debug)]
pub struct Sheet {
    surface: Surface,
    side: Side,
    extent: f32,
}

impl Sheet {
    /// Sheet `extent` px deep (height for top/bottom, width for left/right).
    #[must_use]
    pub fn new(env: &Env, disclosure: Disclosure, side: Side, extent: f32) -> Self {
        let extent = extent.max(0.0);
        Self {
            surface: Surface::new(
                env,
                disclosure,
                SurfacePlacement::Edge(side),
                OverlayOptions::default(),
                edge_size(side, extent),
            ),
            side,
            extent,
        }
    }

    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.surface.is_open()
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.surface.phase()
    }

    /// Distance still to travel before fully shown.
    #[must_use]
    pub fn slide_offset(&self) -> f32 {
        self.surface.transition().translate(self.extent)
    }

    /// Rendered rectangle for the current frame, including the slide.
    #[must_use]
    pub fn content_rect(&self) -> Option<Rect> {
        self.surface
            .content_rect()
            .map(|r| slide(r, self.side, self.slide_offset()))
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
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

    pub fn sync(&mut self) -> Option<Completion> {
        let started = self.surface.sync();
        self.track();
        started
    }

    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        self.sync();
        self.surface.handle_event(event)
    }

    pub fn unmount(&mut self) {
        self.surface.unmount();
    }

    fn track(&mut self) {
        let shift = slide_vector(self.side, self.slide_offset());
        self.surface.set_shift(shift);
    }
}

/// Bottom sheet that can be dragged down to dismiss.
///
/// A press inside the content starts gesture tracking; every pointer sample
/// until release goes to the [`DragDismiss`] tracker. A finished dismissal is
/// turned into a close request on the next [`Drawer::sync`] (or event).
///
/// With a controlled disclosure the drawer then waits off-screen for the
/// parent's answer. `set_open(Some(false))` removes it with no second exit
/// slide; `set_open(Some(true))` or a new press brings it back to rest.
#[derive(Debug)]
pub struct Drawer {
    surface: Surface,
    drag: DragDismiss,
    dismissed: Rc<Cell<bool>>,
    /// Dragged out and close requested, but the parent still shows it open.
    awaiting_close: bool,
    tracking: bool,
    extent: f32,
}

impl Drawer {
    #[must_use]
    pub fn new(env: &Env, disclosure: Disclosure, extent: f32) -> Self {
        let extent = extent.max(0.0);
        let dismissed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&dismissed);
        let drag = DragDismiss::new(env.scheduler.clone(), &env.config, extent)
            .on_dismiss(move || flag.set(true));
        Self {
            surface: Surface::new(
                env,
                disclosure,
                SurfacePlacement::Edge(Side::Bottom),
                OverlayOptions::default(),
                edge_size(Side::Bottom, extent),
            ),
            drag,
            dismissed,
            awaiting_close: false,
            tracking: false,
            extent,
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
    pub fn drag(&self) -> &DragDismiss {
        &self.drag
    }

    /// Downward translation for the current frame: drag plus slide.
    #[must_use]
    pub fn offset(&self) -> f32 {
        self.drag.offset() + self.surface.transition().translate(self.extent)
    }

    #[must_use]
    pub fn content_rect(&self) -> Option<Rect> {
        self.surface
            .content_rect()
            .map(|r| r.offset(0.0, self.offset()))
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn open(&mut self) -> bool {
        self.rearm();
        self.surface.open()
    }

    pub fn close(&mut self) -> bool {
        self.surface.close()
    }

    pub fn toggle(&mut self) -> bool {
        if !self.surface.is_open() {
            self.rearm();
        }
        self.surface.toggle()
    }

    pub fn set_open(&mut self, open: Option<bool>) {
        if open == Some(true) {
            self.rearm();
        }
        if self.awaiting_close {
            self.surface.disclosure_mut().set_controlled(open);
            if !self.surface.is_open() {
                tracing::debug!("drawer close accepted");
                self.awaiting_close = false;
                // Already off-screen, so no exit animation.
                self.surface.close_immediately();
                self.track();
                return;
            }
        }
        self.surface.set_open(open);
        self.track();
    }

    /// Turn a finished drag dismissal into a close request, then reconcile.
    pub fn sync(&mut self) -> Option<Completion> {
        if self.dismissed.replace(false) {
            tracing::debug!("drawer dragged closed");
            // Already off-screen, so no exit animation.
            self.surface.close_immediately();
            if self.surface.is_open() {
                tracing::debug!("drawer close pending with parent");
                self.awaiting_close = true;
            }
        }
        if self.awaiting_close && !self.surface.is_open() {
            self.awaiting_close = false;
            self.surface.close_immediately();
        }
        let started = self.surface.sync();
        self.track();
        started
    }

    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        self.sync();
        if let Event::Pointer(pointer) = event {
            if self.awaiting_close && pointer.phase == PointerPhase::Down {
                tracing::debug!("drawer close declined; back to rest");
                self.awaiting_close = false;
                self.drag.reset();
                self.track();
            }
            if self.tracking {
                if matches!(pointer.phase, PointerPhase::Up | PointerPhase::Cancel) {
                    self.tracking = false;
                }
                self.drag.handle_pointer(pointer);
                self.sync();
                return EventOutcome::Forward;
            }
            let outcome = self.surface.handle_event(event);
            if outcome == EventOutcome::Forward && pointer.phase == PointerPhase::Down {
                self.tracking = true;
                self.drag.handle_pointer(pointer);
            }
            return outcome;
        }
        self.surface.handle_event(event)
    }

    pub fn unmount(&mut self) {
        self.tracking = false;
        self.awaiting_close = false;
        self.drag.cancel();
        self.surface.unmount();
    }

    fn rearm(&mut self) {
        if matches!(self.drag.phase(), DragPhase::Dismissing | DragPhase::Dismissed) {
            self.drag.reset();
        }
        self.dismissed.set(false);
        self.awaiting_close = false;
    }

    /// Keep the hit area under the drawn content.
    fn track(&mut self) {
        let dy = self.offset();
        self.surface.set_shift(Point::new(0.0, dy));
    }
}
