#![forbid(unsafe_code)]

//! Menus: entry model, dropdown and context menus, menubars.
//!
//! A menu's content is a tree of [`MenuEntry`] values. [`MenuModel`] walks the
//! tree once and registers every activatable entry: plain items by value,
//! checkbox items in one [`MultiSelect`], and each radio group in its own
//! [`SingleSelect`]. The host renders the tree and reports presses by value
//! through `activate`.
//!
//! # Invariants
//!
//! 1. Activating a plain item closes the menu; checkbox and radio items
//!    change state and leave it open.
//! 2. Disabled entries are dropped at dispatch and never reach a callback.
//! 3. Inside a radio group only radio items join the group. Labels and
//!    separators are display-only; nested groups are ignored.

mod bar;
mod dropdown;

pub use bar::{Menubar, NavigationMenu};
pub use dropdown::{ContextMenu, DropdownMenu};

use std::collections::BTreeSet;
use std::fmt;

use ahash::AHashMap;

use crate::selection::{ItemKey, MultiSelect, SelectOutcome, SingleSelect};

/// One row of menu content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    /// Runs an action and closes the menu.
    Item {
        value: String,
        label: String,
        shortcut: Option<String>,
        disabled: bool,
    },
    /// Toggles membership in the menu's checked set.
    Checkbox {
        value: String,
        label: String,
        shortcut: Option<String>,
        disabled: bool,
    },
    /// Exclusive choice within its enclosing radio group.
    Radio {
        value: String,
        label: String,
        disabled: bool,
    },
    RadioGroup {
        name: String,
        entries: Vec<MenuEntry>,
    },
    /// Non-interactive heading.
    Label(String),
    Separator,
}

impl MenuEntry {
    pub fn item(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Item {
            value: value.into(),
            label: label.into(),
            shortcut: None,
            disabled: false,
        }
    }

    pub fn checkbox(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Checkbox {
            value: value.into(),
            label: label.into(),
            shortcut: None,
            disabled: false,
        }
    }

    pub fn radio(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Radio {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    pub fn radio_group(name: impl Into<String>, entries: Vec<MenuEntry>) -> Self {
        Self::RadioGroup {
            name: name.into(),
            entries,
        }
    }

    pub fn label(text: impl Into<String>) -> Self {
        Self::Label(text.into())
    }

    pub fn separator() -> Self {
        Self::Separator
    }

    /// Mark as disabled. No effect on labels, separators, and groups.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        if let Self::Item { disabled, .. }
        | Self::Checkbox { disabled, .. }
        | Self::Radio { disabled, .. } = &mut self
        {
            *disabled = true;
        }
        self
    }

    /// Keyboard hint shown next to the label (display only).
    #[must_use]
    pub fn shortcut(mut self, hint: impl Into<String>) -> Self {
        if let Self::Item { shortcut, .. } | Self::Checkbox { shortcut, .. } = &mut self {
            *shortcut = Some(hint.into());
        }
        self
    }

    /// Value of an activatable entry.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Item { value, .. } | Self::Checkbox { value, .. } | Self::Radio { value, .. } => {
                Some(value)
            }
            _ => None,
        }
    }
}

/// What activating an entry did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuActivation {
    /// Plain item ran.
    Selected,
    /// Checkbox flipped to the given state.
    Checked(bool),
    /// Radio item became the group's value.
    RadioSelected,
    /// Radio item was already selected.
    Unchanged,
    Disabled,
    /// No entry with that value.
    Unknown,
}

impl MenuActivation {
    /// Whether the menu should close after this activation.
    #[must_use]
    pub fn closes_menu(self) -> bool {
        self == Self::Selected
    }
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Item { disabled: bool },
    Checkbox(ItemKey),
    Radio { group: usize, key: ItemKey },
}

type SelectSink = Box<dyn FnMut(&str)>;

/// Registered state behind a menu's entries.
pub struct MenuModel {
    entries: Vec<MenuEntry>,
    slots: AHashMap<String, Slot>,
    checkboxes: MultiSelect,
    groups: Vec<(String, SingleSelect)>,
    on_select: Option<SelectSink>,
}

impl fmt::Debug for MenuModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuModel")
            .field("entries", &self.entries.len())
            .field("checked", self.checkboxes.values())
            .field("groups", &self.groups)
            .finish()
    }
}

impl MenuModel {
    #[must_use]
    pub fn new(entries: Vec<MenuEntry>) -> Self {
        let mut model = Self {
            entries: Vec::new(),
            slots: AHashMap::new(),
            checkboxes: MultiSelect::new(),
            groups: Vec::new(),
            on_select: None,
        };
        for entry in &entries {
            model.register(entry, None);
        }
        model.entries = entries;
        model
    }

    fn register(&mut self, entry: &MenuEntry, group: Option<usize>) {
        let slot = match entry {
            MenuEntry::Item {
                value, disabled, ..
            } => (
                value,
                Slot::Item {
                    disabled: *disabled,
                },
            ),
            MenuEntry::Checkbox {
                value, disabled, ..
            } => (value, Slot::Checkbox(self.checkboxes.register(value, *disabled))),
            MenuEntry::Radio {
                value, disabled, ..
            } => {
                let Some(group) = group else {
                    tracing::trace!(value = %value, "radio item outside a group ignored");
                    return;
                };
                let key = self.groups[group].1.register(value, *disabled);
                (value, Slot::Radio { group, key })
            }
            MenuEntry::RadioGroup { name, entries } => {
                if group.is_some() {
                    tracing::trace!(group = %name, "nested radio group ignored");
                    return;
                }
                let index = match self.groups.iter().position(|(n, _)| n == name) {
                    Some(i) => i,
                    None => {
                        self.groups.push((name.clone(), SingleSelect::new()));
                        self.groups.len() - 1
                    }
                };
                for child in entries {
                    self.register(child, Some(index));
                }
                return;
            }
            MenuEntry::Label(_) | MenuEntry::Separator => return,
        };
        let (value, slot) = slot;
        if self.slots.contains_key(value.as_str()) {
            tracing::debug!(value = %value, "duplicate menu value; first entry wins");
            return;
        }
        self.slots.insert(value.clone(), slot);
    }

    /// Called with the value of each plain item that runs.
    #[must_use]
    pub fn on_select(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_select = Some(Box::new(f));
        self
    }

    /// Called with the full checked set whenever a checkbox flips.
    #[must_use]
    pub fn on_checked_change(mut self, f: impl FnMut(&BTreeSet<String>) + 'static) -> Self {
        self.checkboxes.set_on_values_change(f);
        self
    }

    /// Called with the new value when radio group `name` changes.
    #[must_use]
    pub fn on_radio_change(mut self, name: &str, f: impl FnMut(&str) + 'static) -> Self {
        if let Some((_, group)) = self.groups.iter_mut().find(|(n, _)| n == name) {
            group.set_on_value_change(f);
        } else {
            tracing::debug!(group = name, "no radio group with that name");
        }
        self
    }

    #[must_use]
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    #[must_use]
    pub fn is_checked(&self, value: &str) -> bool {
        self.checkboxes.contains(value)
    }

    #[must_use]
    pub fn checked(&self) -> &BTreeSet<String> {
        self.checkboxes.values()
    }

    /// Selected value of radio group `name`.
    #[must_use]
    pub fn radio_value(&self, name: &str) -> Option<&str> {
        self.group(name).and_then(SingleSelect::value)
    }

    #[must_use]
    pub fn is_disabled(&self, value: &str) -> bool {
        match self.slots.get(value) {
            Some(Slot::Item { disabled }) => *disabled,
            Some(Slot::Checkbox(key)) => self.checkboxes.item(*key).is_some_and(|i| i.disabled),
            Some(Slot::Radio { group, key }) => self.groups[*group]
                .1
                .item(*key)
                .is_some_and(|i| i.disabled),
            None => false,
        }
    }

    pub fn set_disabled(&mut self, value: &str, on: bool) {
        match self.slots.get_mut(value) {
            Some(Slot::Item { disabled }) => *disabled = on,
            Some(Slot::Checkbox(key)) => self.checkboxes.set_disabled(*key, on),
            Some(Slot::Radio { group, key }) => self.groups[*group].1.set_disabled(*key, on),
            None => {}
        }
    }

    /// Overwrite the checked set (controlled sync). Fires no callback.
    pub fn set_checked(&mut self, values: BTreeSet<String>) {
        self.checkboxes.set_values(values);
    }

    /// Overwrite a radio group's value (controlled sync). Fires no callback.
    pub fn set_radio_value(&mut self, name: &str, value: Option<&str>) {
        if let Some((_, group)) = self.groups.iter_mut().find(|(n, _)| n == name) {
            group.set_value(value);
        }
    }

    /// Dispatch a press on the entry with `value`.
    pub fn activate(&mut self, value: &str) -> MenuActivation {
        let Some(slot) = self.slots.get(value).copied() else {
            tracing::debug!(value, "activation matches no menu entry");
            return MenuActivation::Unknown;
        };
        match slot {
            Slot::Item { disabled: true } => {
                tracing::trace!(value, "press on disabled menu item dropped");
                MenuActivation::Disabled
            }
            Slot::Item { disabled: false } => {
                tracing::debug!(value, "menu item selected");
                if let Some(sink) = self.on_select.as_mut() {
                    sink(value);
                }
                MenuActivation::Selected
            }
            Slot::Checkbox(key) => match self.checkboxes.press(key) {
                SelectOutcome::Changed => MenuActivation::Checked(self.checkboxes.is_selected(key)),
                SelectOutcome::Disabled => MenuActivation::Disabled,
                SelectOutcome::Unchanged => MenuActivation::Unchanged,
                SelectOutcome::UnknownKey => MenuActivation::Unknown,
            },
            Slot::Radio { group, key } => match self.groups[group].1.press(key) {
                SelectOutcome::Changed => MenuActivation::RadioSelected,
                SelectOutcome::Disabled => MenuActivation::Disabled,
                SelectOutcome::Unchanged => MenuActivation::Unchanged,
                SelectOutcome::UnknownKey => MenuActivation::Unknown,
            },
        }
    }

    fn group(&self, name: &str) -> Option<&SingleSelect> {
        self.groups.iter().find(|(n, _)| n == name).map(|(_, g)| g)
    }
}
