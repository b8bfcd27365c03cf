#![forbid(unsafe_code)]

//! Application sidebar: a collapsible desktop rail and a mobile sheet.
//!
//! State lives in a [`Store<SidebarState>`] created by the screen and passed
//! in, so headers, content, and the sidebar itself read the same flags.
//! [`Sidebar::toggle`] acts on whichever presentation is current.

use veil_core::{Event, Rect};
use veil_runtime::{Binding, BindingScope, Store, Subscription};

use crate::disclosure::Disclosure;
use crate::env::Env;
use crate::modal::Sheet;
use crate::overlay::EventOutcome;
use crate::position::Side;
use crate::transition::{Completion, Transition, TransitionPhase};

/// Shared sidebar flags.
///
/// With `state-persistence`, serializable so the rail state can survive a
/// restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "state-persistence", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "state-persistence", serde(default))]
pub struct SidebarState {
    /// Desktop rail expanded.
    pub open: bool,
    /// Mobile sheet shown.
    pub open_mobile: bool,
    pub is_mobile: bool,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self {
            open: true,
            open_mobile: false,
            is_mobile: false,
        }
    }
}

/// Whether the desktop rail shows labels or icons only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RailState {
    Expanded,
    Collapsed,
}

/// Desktop rail plus mobile sheet over one [`Store`].
#[derive(Debug)]
pub struct Sidebar {
    store: Store<SidebarState>,
    rail_target: Binding<RailState>,
    scope: BindingScope,
    sheet: Sheet,
    rail: Transition,
    env: Env,
    expanded_width: f32,
    collapsed_width: f32,
    unmounted: bool,
}

impl Sidebar {
    /// Sidebar `width` px wide when expanded, on the left edge.
    #[must_use]
    pub fn new(env: &Env, store: Store<SidebarState>, width: f32) -> Self {
        let sink = store.clone();
        let initial = store.get();
        let disclosure = Disclosure::controlled(initial.is_mobile && initial.open_mobile)
            .on_open_change(move |open| sink.update(|s| s.open_mobile = open));
        let rail = env.transition();
        rail.snap_to(initial.open);
        let rail_target = store.bind(|s| {
            if s.open {
                RailState::Expanded
            } else {
                RailState::Collapsed
            }
        });
        Self {
            store,
            rail_target,
            scope: BindingScope::new(),
            sheet: Sheet::new(env, disclosure, Side::Left, width),
            rail,
            env: env.clone(),
            expanded_width: width.max(0.0),
            collapsed_width: 48.0_f32.min(width.max(0.0)),
            unmounted: false,
        }
    }

    /// Width of the icon-only rail.
    #[must_use]
    pub fn collapsed_width(mut self, width: f32) -> Self {
        self.collapsed_width = width.clamp(0.0, self.expanded_width);
        self
    }

    /// Observe state changes until the sidebar unmounts.
    #[must_use]
    pub fn on_state_change(mut self, callback: impl Fn(&SidebarState) + 'static) -> Self {
        self.scope.hold(self.store.subscribe(callback));
        self
    }

    #[must_use]
    pub fn store(&self) -> &Store<SidebarState> {
        &self.store
    }

    pub fn subscribe(&self, callback: impl Fn(&SidebarState) + 'static) -> Subscription {
        self.store.subscribe(callback)
    }

    #[must_use]
    pub fn state(&self) -> SidebarState {
        self.store.get()
    }

    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.store.with(|s| s.is_mobile)
    }

    #[must_use]
    pub fn rail_state(&self) -> RailState {
        self.rail_target.get()
    }

    #[must_use]
    pub fn rail_phase(&self) -> TransitionPhase {
        self.rail.phase()
    }

    /// Current rail width, interpolated while animating.
    #[must_use]
    pub fn rail_width(&self) -> f32 {
        let t = self.rail.value();
        self.collapsed_width + (self.expanded_width - self.collapsed_width) * t
    }

    #[must_use]
    pub fn sheet(&self) -> &Sheet {
        &self.sheet
    }

    /// Mobile sheet rectangle for this frame.
    #[must_use]
    pub fn sheet_rect(&self) -> Option<Rect> {
        self.sheet.content_rect()
    }

    /// Flip the mobile sheet on mobile, the rail otherwise.
    pub fn toggle(&mut self) {
        if self.unmounted {
            return;
        }
        self.store.update(|s| {
            if s.is_mobile {
                s.open_mobile = !s.open_mobile;
            } else {
                s.open = !s.open;
            }
        });
        tracing::debug!(state = ?self.store.get(), "sidebar toggled");
        self.sync();
    }

    pub fn set_open(&mut self, open: bool) {
        if self.unmounted {
            return;
        }
        self.store.update(|s| s.open = open);
        self.sync();
    }

    pub fn set_open_mobile(&mut self, open: bool) {
        if self.unmounted {
            return;
        }
        self.store.update(|s| s.open_mobile = open);
        self.sync();
    }

    /// Switch presentation. Leaving mobile closes the sheet.
    pub fn set_mobile(&mut self, is_mobile: bool) {
        if self.unmounted {
            return;
        }
        self.store.update(|s| {
            s.is_mobile = is_mobile;
            if !is_mobile {
                s.open_mobile = false;
            }
        });
        self.sync();
    }

    /// Apply store changes made elsewhere to the rail and sheet.
    pub fn sync(&mut self) -> Option<Completion> {
        if self.unmounted {
            return None;
        }
        let state = self.store.get();
        let phase = self.rail.phase();
        if state.open && !phase.is_opening_or_open() {
            self.rail.animate_open(self.env.config.enter_duration);
        } else if !state.open && phase.is_opening_or_open() {
            self.rail.animate_close(self.env.config.exit_duration);
        }
        self.sheet
            .surface_mut()
            .disclosure_mut()
            .set_controlled(Some(state.is_mobile && state.open_mobile));
        self.sheet.sync()
    }

    /// Only the mobile sheet takes input; the rail is plain layout.
    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        if self.unmounted || !self.is_mobile() {
            return EventOutcome::Ignored;
        }
        self.sync();
        let outcome = self.sheet.handle_event(event);
        if outcome == EventOutcome::DismissRequested {
            self.sync();
        }
        outcome
    }

    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        self.rail.cancel();
        self.sheet.unmount();
        self.scope.clear();
        self.unmounted = true;
    }
}
