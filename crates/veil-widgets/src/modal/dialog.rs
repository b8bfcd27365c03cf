#![forbid(unsafe_code)]

//! Centered modal dialogs.
//!
//! # Example
//!
//! ```ignore
//! let mut dialog = Dialog::new(&env, Disclosure::default());
//! dialog.open();
//! // ... outside tap
//! assert_eq!(dialog.take_result(), Some(DialogResult::Dismissed));
//! ```

use veil_core::{Event, Rect, Size};

use crate::disclosure::Disclosure;
use crate::env::Env;
use crate::overlay::{EventOutcome, OverlayOptions};
use crate::surface::{Surface, SurfacePlacement};
use crate::transition::{Completion, TransitionPhase};

/// How a dialog was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogResult {
    /// Outside press or back.
    Dismissed,
    /// Primary action pressed.
    Action,
    /// Cancel pressed.
    Cancel,
}

fn default_size() -> Size {
    Size::new(320.0, 200.0)
}

/// Modal dialog centered in the viewport.
#[derive(Debug)]
pub struct Dialog {
    surface: Surface,
    result: Option<DialogResult>,
}

impl Dialog {
    #[must_use]
    pub fn new(env: &Env, disclosure: Disclosure) -> Self {
        Self::with_options(env, disclosure, OverlayOptions::default())
    }

    fn with_options(env: &Env, disclosure: Disclosure, options: OverlayOptions) -> Self {
        Self {
            surface: Surface::new(
                env,
                disclosure,
                SurfacePlacement::Centered,
                options,
                default_size(),
            ),
            result: None,
        }
    }

    /// Content size used when centering.
    #[must_use]
    pub fn size(mut self, size: Size) -> Self {
        self.surface.set_content_size(size);
        self.surface.reposition();
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
    pub fn content_rect(&self) -> Option<Rect> {
        self.surface.content_rect()
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    /// Result of the last close, if not yet taken.
    #[must_use]
    pub fn result(&self) -> Option<DialogResult> {
        self.result
    }

    pub fn take_result(&mut self) -> Option<DialogResult> {
        self.result.take()
    }

    /// Opening clears any previous result.
    pub fn open(&mut self) -> bool {
        let requested = self.surface.open();
        if requested {
            self.result = None;
        }
        requested
    }

    pub fn close(&mut self) -> bool {
        self.close_with(DialogResult::Dismissed)
    }

    /// Request a close, recording `result` if the request went through.
    pub fn close_with(&mut self, result: DialogResult) -> bool {
        let requested = self.surface.close();
        if requested {
            tracing::debug!(?result, "dialog close requested");
            self.result = Some(result);
        }
        requested
    }

    pub fn set_open(&mut self, open: Option<bool>) {
        self.surface.set_open(open);
    }

    pub fn sync(&mut self) -> Option<Completion> {
        self.surface.sync()
    }

    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        let outcome = self.surface.handle_event(event);
        if outcome == EventOutcome::DismissRequested {
            self.result = Some(DialogResult::Dismissed);
        }
        outcome
    }

    pub fn unmount(&mut self) {
        self.surface.unmount();
    }
}

/// Dialog that only closes through its buttons or back.
#[derive(Debug)]
pub struct AlertDialog {
    dialog: Dialog,
}

impl AlertDialog {
    #[must_use]
    pub fn new(env: &Env, disclosure: Disclosure) -> Self {
        Self {
            dialog: Dialog::with_options(
                env,
                disclosure,
                OverlayOptions::default().dismiss_on_outside_press(false),
            ),
        }
    }

    #[must_use]
    pub fn size(self, size: Size) -> Self {
        Self {
            dialog: self.dialog.size(size),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.dialog.is_open()
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.dialog.phase()
    }

    #[must_use]
    pub fn surface(&self) -> &Surface {
        self.dialog.surface()
    }

    pub fn surface_mut(&mut self) -> &mut Surface {
        self.dialog.surface_mut()
    }

    #[must_use]
    pub fn result(&self) -> Option<DialogResult> {
        self.dialog.result()
    }

    pub fn take_result(&mut self) -> Option<DialogResult> {
        self.dialog.take_result()
    }

    pub fn open(&mut self) -> bool {
        self.dialog.open()
    }

    /// Confirm and close.
    pub fn action(&mut self) -> bool {
        self.dialog.close_with(DialogResult::Action)
    }

    /// Back out and close.
    pub fn cancel(&mut self) -> bool {
        self.dialog.close_with(DialogResult::Cancel)
    }

    pub fn set_open(&mut self, open: Option<bool>) {
        self.dialog.set_open(open);
    }

    pub fn sync(&mut self) -> Option<Completion> {
        self.dialog.sync()
    }

    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        self.dialog.handle_event(event)
    }

    pub fn unmount(&mut self) {
        self.dialog.unmount();
    }
}
