#![forbid(unsafe_code)]

use std::ops::{Deref, DerefMut};

use veil_core::{Event, Point, PointerPhase};

use crate::menu::{DropdownMenu, MenuActivation};
use crate::overlay::EventOutcome;

/// A row of named dropdown menus with at most one open.
///
/// Trigger taps are handled here, not by the individual menus: tapping a
/// trigger opens its menu and closes whichever was open; tapping the open
/// menu's trigger closes it. While a menu is open, hovering another trigger
/// switches to it.
#[derive(Debug, Default)]
pub struct Menubar {
    menus: Vec<(String, DropdownMenu)>,
    active: Option<usize>,
    pressed: Option<usize>,
    open_on_hover: bool,
}

impl Menubar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a menu. Names should be unique; lookups use the first match.
    #[must_use]
    pub fn menu(mut self, name: impl Into<String>, menu: DropdownMenu) -> Self {
        self.push(name, menu);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, menu: DropdownMenu) {
        self.menus.push((name.into(), menu));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.menus.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.menus.is_empty()
    }

    /// Name of the open menu.
    #[must_use]
    pub fn active(&self) -> Option<&str> {
        self.active.map(|i| self.menus[i].0.as_str())
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&DropdownMenu> {
        self.index_of(name).map(|i| &self.menus[i].1)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut DropdownMenu> {
        self.index_of(name).map(|i| &mut self.menus[i].1)
    }

    /// Open `name`, closing any other open menu first.
    pub fn open(&mut self, name: &str) -> bool {
        match self.index_of(name) {
            Some(i) => self.open_index(i),
            None => {
                tracing::debug!(menu = name, "no menu with that name");
                false
            }
        }
    }

    pub fn toggle(&mut self, name: &str) -> bool {
        match self.index_of(name) {
            Some(i) if self.active == Some(i) => self.menus[i].1.close(),
            Some(i) => self.open_index(i),
            None => false,
        }
    }

    pub fn close_all(&mut self) {
        for (_, menu) in &mut self.menus {
            menu.close();
        }
        self.active = None;
    }

    /// Activate `value` in the open menu.
    pub fn activate(&mut self, value: &str) -> MenuActivation {
        let Some(i) = self.active else {
            return MenuActivation::Unknown;
        };
        let activation = self.menus[i].1.activate(value);
        self.refresh_active();
        activation
    }

    pub fn sync(&mut self) {
        for (_, menu) in &mut self.menus {
            menu.sync();
        }
        self.refresh_active();
    }

    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        self.sync();
        let outcome = match *event {
            Event::Pointer(pointer) => {
                if let Some(i) = self.trigger_at(pointer.position) {
                    self.handle_trigger_pointer(i, pointer.phase)
                } else {
                    self.pressed = None;
                    self.route_to_active(event)
                }
            }
            Event::HoverEnter(p) => match self.trigger_at(p) {
                Some(i) if self.active.is_some_and(|a| a != i) || self.open_on_hover => {
                    self.open_index(i);
                    EventOutcome::Consumed
                }
                _ => self.route_to_active(event),
            },
            _ => self.route_to_active(event),
        };
        self.refresh_active();
        outcome
    }

    pub fn unmount(&mut self) {
        for (_, menu) in &mut self.menus {
            menu.unmount();
        }
        self.active = None;
        self.pressed = None;
    }

    fn handle_trigger_pointer(&mut self, i: usize, phase: PointerPhase) -> EventOutcome {
        match phase {
            PointerPhase::Down => self.pressed = Some(i),
            PointerPhase::Up => {
                if self.pressed.take() == Some(i) {
                    if self.active == Some(i) {
                        self.menus[i].1.close();
                    } else {
                        self.open_index(i);
                    }
                }
            }
            PointerPhase::Move => {}
            PointerPhase::Cancel => self.pressed = None,
        }
        EventOutcome::Consumed
    }

    fn route_to_active(&mut self, event: &Event) -> EventOutcome {
        match self.active {
            Some(i) => self.menus[i].1.handle_event(event),
            None => EventOutcome::Ignored,
        }
    }

    fn open_index(&mut self, i: usize) -> bool {
        for (j, (_, menu)) in self.menus.iter_mut().enumerate() {
            if j != i && menu.is_open() {
                menu.close();
            }
        }
        let requested = self.menus[i].1.open();
        self.refresh_active();
        requested
    }

    fn refresh_active(&mut self) {
        self.active = self
            .menus
            .iter()
            .position(|(_, m)| m.is_open() && !m.surface().is_unmounted());
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.menus.iter().position(|(n, _)| n == name)
    }

    fn trigger_at(&self, p: Point) -> Option<usize> {
        self.menus
            .iter()
            .position(|(_, m)| m.trigger_bounds().contains(p))
    }
}

/// Site navigation row: like [`Menubar`], but hovering a trigger opens its
/// panel even when nothing is open yet.
#[derive(Debug)]
pub struct NavigationMenu(Menubar);

impl Default for NavigationMenu {
    fn default() -> Self {
        Self(Menubar {
            open_on_hover: true,
            ..Menubar::default()
        })
    }
}

impl NavigationMenu {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn menu(self, name: impl Into<String>, menu: DropdownMenu) -> Self {
        Self(self.0.menu(name, menu))
    }
}

impl Deref for NavigationMenu {
    type Target = Menubar;

    fn deref(&self) -> &Menubar {
        &self.0
    }
}

impl DerefMut for NavigationMenu {
    fn deref_mut(&mut self) -> &mut Menubar {
        &mut self.0
    }
}
