#![forbid(unsafe_code)]

//! Open/closed state shared by every disclosure component.
//!
//! A [`Disclosure`] is either *uncontrolled* (it owns the open flag) or
//! *controlled* (the parent owns it and pushes it in with
//! [`Disclosure::set_controlled`]). Requests always go through the
//! `on_open_change` sink; only uncontrolled disclosures change their own
//! displayed state.
//!
//! # Invariants
//!
//! 1. Controlled: `is_open()` equals the last value passed to
//!    `set_controlled`, whatever requests happened since.
//! 2. Uncontrolled: a request updates the state synchronously, then notifies.
//! 3. A request for the state already displayed is a no-op and does not
//!    notify.
//! 4. After [`Disclosure::detach`], requests are ignored and nothing is
//!    notified.
//!
//! # Example
//!
//! ```ignore
//! let mut menu = Disclosure::new(false).on_open_change(|open| log(open));
//! menu.request_open();
//! assert!(menu.is_open());
//! ```

use std::fmt;

/// Who owns the open flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisclosureMode {
    /// The parent supplies the value and reacts to change requests.
    Controlled,
    /// The disclosure owns the value.
    Uncontrolled,
}

/// Open/closed controller.
pub struct Disclosure {
    /// Internal value. Mirrors the controlled value while controlled so that
    /// dropping control later keeps the last displayed state.
    internal: bool,
    controlled: Option<bool>,
    on_open_change: Option<Box<dyn FnMut(bool)>>,
    detached: bool,
}

impl fmt::Debug for Disclosure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Disclosure")
            .field("open", &self.is_open())
            .field("mode", &self.mode())
            .field("detached", &self.detached)
            .finish()
    }
}

impl Default for Disclosure {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Disclosure {
    /// Uncontrolled disclosure starting at `default_open`.
    #[must_use]
    pub fn new(default_open: bool) -> Self {
        Self {
            internal: default_open,
            controlled: None,
            on_open_change: None,
            detached: false,
        }
    }

    /// Controlled disclosure displaying `open`.
    #[must_use]
    pub fn controlled(open: bool) -> Self {
        Self {
            internal: open,
            controlled: Some(open),
            on_open_change: None,
            detached: false,
        }
    }

    /// Set the change sink.
    #[must_use]
    pub fn on_open_change(mut self, f: impl FnMut(bool) + 'static) -> Self {
        self.on_open_change = Some(Box::new(f));
        self
    }

    /// Replace the change sink on an existing disclosure.
    pub fn set_on_open_change(&mut self, f: impl FnMut(bool) + 'static) {
        self.on_open_change = Some(Box::new(f));
    }

    /// Displayed open state.
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.controlled.unwrap_or(self.internal)
    }

    #[must_use]
    pub fn mode(&self) -> DisclosureMode {
        if self.controlled.is_some() {
            DisclosureMode::Controlled
        } else {
            DisclosureMode::Uncontrolled
        }
    }

    #[must_use]
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Push the parent-owned value. `None` drops control; the disclosure
    /// then continues from the last controlled value.
    pub fn set_controlled(&mut self, value: Option<bool>) {
        if let Some(open) = value {
            self.internal = open;
        }
        self.controlled = value;
    }

    /// Ask to open. Returns `true` if a change was requested.
    pub fn request_open(&mut self) -> bool {
        self.request(true)
    }

    /// Ask to close. Returns `true` if a change was requested.
    pub fn request_close(&mut self) -> bool {
        self.request(false)
    }

    /// Ask for the opposite of the displayed state.
    pub fn toggle(&mut self) -> bool {
        let next = !self.is_open();
        self.request(next)
    }

    /// Stop reacting: drop the sink and ignore further requests.
    pub fn detach(&mut self) {
        self.detached = true;
        self.on_open_change = None;
    }

    fn request(&mut self, open: bool) -> bool {
        if self.detached {
            tracing::trace!(open, "request on detached disclosure ignored");
            return false;
        }
        if self.is_open() == open {
            return false;
        }
        let mode = self.mode();
        if mode == DisclosureMode::Uncontrolled {
            self.internal = open;
        }
        tracing::debug!(open, ?mode, "disclosure change requested");
        if let Some(sink) = self.on_open_change.as_mut() {
            sink(open);
        }
        true
    }
}
