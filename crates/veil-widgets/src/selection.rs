#![forbid(unsafe_code)]

//! Radio-style and checkbox-style selection groups.
//!
//! A group is built once and each item gets an [`ItemKey`] from
//! [`SingleSelect::register`] / [`MultiSelect::register`]. Items never touch
//! the group's state; they hand their key back to [`SingleSelect::press`] or
//! [`MultiSelect::press`] (or the value-based `select` / `toggle`).
//!
//! # Invariants
//!
//! 1. A single-select group reports at most one selected item.
//! 2. The change callback fires before the group's state updates, and only
//!    when the state actually changes.
//! 3. Presses on disabled items are dropped at this boundary.
//! 4. Registering the same value twice returns the same key.
//!
//! # Failure Modes
//!
//! - Selecting a value that no item registered is accepted and stored; no
//!   item reports selected.

use std::collections::BTreeSet;
use std::fmt;

use ahash::AHashMap;

/// Handle an item keeps to its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(usize);

impl ItemKey {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// What a select/toggle call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// State changed and the callback fired.
    Changed,
    /// Already in the requested state; nothing fired.
    Unchanged,
    /// Item is disabled; the press was dropped.
    Disabled,
    /// Key does not belong to this group.
    UnknownKey,
}

impl SelectOutcome {
    #[must_use]
    pub fn changed(self) -> bool {
        self == Self::Changed
    }
}

/// A registered item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub value: String,
    pub disabled: bool,
}

/// Ordered item registry shared by both group kinds.
#[derive(Debug, Clone, Default)]
struct Registry {
    items: Vec<Item>,
    index: AHashMap<String, usize>,
}

impl Registry {
    fn register(&mut self, value: &str, disabled: bool) -> ItemKey {
        if let Some(&idx) = self.index.get(value) {
            self.items[idx].disabled = disabled;
            return ItemKey(idx);
        }
        let idx = self.items.len();
        self.items.push(Item {
            value: value.to_string(),
            disabled,
        });
        self.index.insert(value.to_string(), idx);
        ItemKey(idx)
    }

    fn get(&self, key: ItemKey) -> Option<&Item> {
        self.items.get(key.0)
    }

    fn key_of(&self, value: &str) -> Option<ItemKey> {
        self.index.get(value).copied().map(ItemKey)
    }

    fn set_disabled(&mut self, key: ItemKey, disabled: bool) {
        if let Some(item) = self.items.get_mut(key.0) {
            item.disabled = disabled;
        }
    }

    fn is_disabled_value(&self, value: &str) -> bool {
        self.key_of(value)
            .and_then(|k| self.get(k))
            .is_some_and(|item| item.disabled)
    }

    fn keys(&self) -> impl Iterator<Item = ItemKey> + '_ {
        (0..self.items.len()).map(ItemKey)
    }
}

// ============================================================================
// Single select
// ============================================================================

/// Radio group: at most one value selected.
#[derive(Default)]
pub struct SingleSelect {
    registry: Registry,
    selected: Option<String>,
    on_value_change: Option<Box<dyn FnMut(&str)>>,
}

impl fmt::Debug for SingleSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleSelect")
            .field("items", &self.registry.items)
            .field("selected", &self.selected)
            .finish()
    }
}

impl SingleSelect {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `value` selected.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.selected = Some(value.into());
        self
    }

    #[must_use]
    pub fn on_value_change(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_value_change = Some(Box::new(f));
        self
    }

    pub fn set_on_value_change(&mut self, f: impl FnMut(&str) + 'static) {
        self.on_value_change = Some(Box::new(f));
    }

    /// Add an item, or update an existing item's disabled flag.
    pub fn register(&mut self, value: &str, disabled: bool) -> ItemKey {
        self.registry.register(value, disabled)
    }

    pub fn set_disabled(&mut self, key: ItemKey, disabled: bool) {
        self.registry.set_disabled(key, disabled);
    }

    #[must_use]
    pub fn item(&self, key: ItemKey) -> Option<&Item> {
        self.registry.get(key)
    }

    #[must_use]
    pub fn key_of(&self, value: &str) -> Option<ItemKey> {
        self.registry.key_of(value)
    }

    /// Registered items in order.
    pub fn items(&self) -> impl Iterator<Item = (ItemKey, &Item)> + '_ {
        self.registry.keys().zip(self.registry.items.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.items.is_empty()
    }

    /// Currently selected value, registered or not.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Whether the item behind `key` is the selected one.
    #[must_use]
    pub fn is_selected(&self, key: ItemKey) -> bool {
        match (self.registry.get(key), &self.selected) {
            (Some(item), Some(selected)) => &item.value == selected,
            _ => false,
        }
    }

    /// Dispatch a press from the item behind `key`.
    pub fn press(&mut self, key: ItemKey) -> SelectOutcome {
        let Some(item) = self.registry.get(key) else {
            return SelectOutcome::UnknownKey;
        };
        if item.disabled {
            tracing::trace!(value = %item.value, "press on disabled item dropped");
            return SelectOutcome::Disabled;
        }
        let value = item.value.clone();
        self.apply(value)
    }

    /// Select by value.
    pub fn select(&mut self, value: &str) -> SelectOutcome {
        if self.registry.is_disabled_value(value) {
            tracing::trace!(value, "select of disabled item dropped");
            return SelectOutcome::Disabled;
        }
        if self.registry.key_of(value).is_none() {
            tracing::debug!(value, "selected value matches no registered item");
        }
        self.apply(value.to_string())
    }

    /// Clear the selection. Fires no callback.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Overwrite the selection from outside (controlled sync). Fires no callback.
    pub fn set_value(&mut self, value: Option<&str>) {
        self.selected = value.map(str::to_string);
    }

    fn apply(&mut self, value: String) -> SelectOutcome {
        if self.selected.as_deref() == Some(value.as_str()) {
            return SelectOutcome::Unchanged;
        }
        tracing::debug!(value = %value, "selection changed");
        if let Some(sink) = self.on_value_change.as_mut() {
            sink(&value);
        }
        self.selected = Some(value);
        SelectOutcome::Changed
    }
}

// ============================================================================
// Multi select
// ============================================================================

/// Checkbox group: any subset selected.
#[derive(Default)]
pub struct MultiSelect {
    registry: Registry,
    selected: BTreeSet<String>,
    on_values_change: Option<Box<dyn FnMut(&BTreeSet<String>)>>,
}

impl fmt::Debug for MultiSelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiSelect")
            .field("items", &self.registry.items)
            .field("selected", &self.selected)
            .finish()
    }
}

impl MultiSelect {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `values` selected.
    #[must_use]
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn on_values_change(mut self, f: impl FnMut(&BTreeSet<String>) + 'static) -> Self {
        self.on_values_change = Some(Box::new(f));
        self
    }

    pub fn set_on_values_change(&mut self, f: impl FnMut(&BTreeSet<String>) + 'static) {
        self.on_values_change = Some(Box::new(f));
    }

    pub fn register(&mut self, value: &str, disabled: bool) -> ItemKey {
        self.registry.register(value, disabled)
    }

    pub fn set_disabled(&mut self, key: ItemKey, disabled: bool) {
        self.registry.set_disabled(key, disabled);
    }

    #[must_use]
    pub fn item(&self, key: ItemKey) -> Option<&Item> {
        self.registry.get(key)
    }

    #[must_use]
    pub fn key_of(&self, value: &str) -> Option<ItemKey> {
        self.registry.key_of(value)
    }

    pub fn items(&self) -> impl Iterator<Item = (ItemKey, &Item)> + '_ {
        self.registry.keys().zip(self.registry.items.iter())
    }

    #[must_use]
    pub fn values(&self) -> &BTreeSet<String> {
        &self.selected
    }

    #[must_use]
    pub fn contains(&self, value: &str) -> bool {
        self.selected.contains(value)
    }

    #[must_use]
    pub fn is_selected(&self, key: ItemKey) -> bool {
        self.registry
            .get(key)
            .is_some_and(|item| self.selected.contains(&item.value))
    }

    /// Dispatch a press from the item behind `key`.
    pub fn press(&mut self, key: ItemKey) -> SelectOutcome {
        let Some(item) = self.registry.get(key) else {
            return SelectOutcome::UnknownKey;
        };
        if item.disabled {
            tracing::trace!(value = %item.value, "press on disabled item dropped");
            return SelectOutcome::Disabled;
        }
        let value = item.value.clone();
        let on = !self.selected.contains(&value);
        self.apply(&value, on)
    }

    /// Flip membership of `value`.
    pub fn toggle(&mut self, value: &str) -> SelectOutcome {
        let on = !self.selected.contains(value);
        self.set_checked(value, on)
    }

    /// Force membership of `value`.
    pub fn set_checked(&mut self, value: &str, on: bool) -> SelectOutcome {
        if self.registry.is_disabled_value(value) {
            tracing::trace!(value, "toggle of disabled item dropped");
            return SelectOutcome::Disabled;
        }
        self.apply(value, on)
    }

    /// Overwrite the set from outside (controlled sync). Fires no callback.
    pub fn set_values(&mut self, values: BTreeSet<String>) {
        self.selected = values;
    }

    fn apply(&mut self, value: &str, on: bool) -> SelectOutcome {
        if self.selected.contains(value) == on {
            return SelectOutcome::Unchanged;
        }
        let mut next = self.selected.clone();
        if on {
            next.insert(value.to_string());
        } else {
            next.remove(value);
        }
        tracing::debug!(value, on, count = next.len(), "multi-selection changed");
        if let Some(sink) = self.on_values_change.as_mut() {
            sink(&next);
        }
        self.selected = next;
        SelectOutcome::Changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    // --- single ---

    #[test]
    fn select_fires_once() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let mut group = SingleSelect::new().on_value_change(move |v| l.borrow_mut().push(v.to_string()));
        let a = group.register("a", false);
        group.register("b", false);
        assert_eq!(group.press(a), SelectOutcome::Changed);
        assert_eq!(group.press(a), SelectOutcome::Unchanged);
        assert_eq!(group.select("b"), SelectOutcome::Changed);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
        assert!(!group.is_selected(a));
    }

    #[test]
    fn callback_sees_old_state() {
        let seen = Rc::new(RefCell::new(None));
        let s = Rc::clone(&seen);
        // The callback cannot borrow the group; it records what it was told.
        let mut group = SingleSelect::new()
            .with_value("a")
            .on_value_change(move |v| *s.borrow_mut() = Some(v.to_string()));
        group.register("a", false);
        group.register("b", false);
        group.select("b");
        assert_eq!(seen.borrow().as_deref(), Some("b"));
        assert_eq!(group.value(), Some("b"));
    }

    #[test]
    fn disabled_press_is_dropped() {
        let mut group = SingleSelect::new();
        let off = group.register("off", true);
        assert_eq!(group.press(off), SelectOutcome::Disabled);
        assert_eq!(group.select("off"), SelectOutcome::Disabled);
        assert_eq!(group.value(), None);
        group.set_disabled(off, false);
        assert!(group.press(off).changed());
    }

    #[test]
    fn unknown_value_matches_nothing() {
        let mut group = SingleSelect::new();
        let a = group.register("a", false);
        assert_eq!(group.select("ghost"), SelectOutcome::Changed);
        assert_eq!(group.value(), Some("ghost"));
        assert!(!group.is_selected(a));
        assert_eq!(group.press(ItemKey(99)), SelectOutcome::UnknownKey);
    }

    #[test]
    fn duplicate_register_returns_same_key() {
        let mut group = SingleSelect::new();
        let a = group.register("a", false);
        let again = group.register("a", true);
        assert_eq!(a, again);
        assert_eq!(group.len(), 1);
        assert!(group.item(a).is_some_and(|i| i.disabled));
    }

    #[test]
    fn set_value_is_silent() {
        let hits = Rc::new(RefCell::new(0));
        let h = Rc::clone(&hits);
        let mut group = SingleSelect::new().on_value_change(move |_| *h.borrow_mut() += 1);
        group.set_value(Some("x"));
        group.clear();
        assert_eq!(*hits.borrow(), 0);
        assert!(group.is_empty());
    }

    // --- multi ---

    #[test]
    fn toggle_flips_membership() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let mut group = MultiSelect::new().on_values_change(move |set| l.borrow_mut().push(set.len()));
        let a = group.register("a", false);
        group.register("b", false);
        assert!(group.press(a).changed());
        assert!(group.toggle("b").changed());
        assert!(group.toggle("a").changed());
        assert_eq!(*log.borrow(), vec![1, 2, 1]);
        assert!(group.contains("b"));
        assert!(!group.is_selected(a));
    }

    #[test]
    fn set_checked_is_idempotent() {
        let mut group = MultiSelect::new().with_values(["a"]);
        assert_eq!(group.set_checked("a", true), SelectOutcome::Unchanged);
        let locked = group.register("locked", true);
        assert_eq!(group.press(locked), SelectOutcome::Disabled);
        assert_eq!(group.toggle("locked"), SelectOutcome::Disabled);
        group.set_values(BTreeSet::new());
        assert!(group.values().is_empty());
    }

    // --- degrade paths ---

    #[test]
    #[tracing_test::traced_test]
    fn unknown_value_selects_and_logs() {
        let mut group = SingleSelect::new();
        group.register("a", false);
        assert_eq!(group.select("ghost"), SelectOutcome::Changed);
        assert_eq!(group.value(), Some("ghost"));
        assert!(logs_contain("selected value matches no registered item"));
    }

    #[test]
    #[tracing_test::traced_test]
    fn disabled_press_logs_at_trace() {
        let mut group = SingleSelect::new();
        let key = group.register("off", true);
        assert_eq!(group.press(key), SelectOutcome::Disabled);
        assert!(logs_contain("press on disabled item dropped"));
        assert!(!logs_contain("WARN"));
    }

    proptest! {
        #[test]
        fn single_select_is_exclusive(
            n in 1usize..8,
            presses in proptest::collection::vec((0usize..10, any::<bool>()), 0..40),
        ) {
            let mut group = SingleSelect::new();
            let keys: Vec<ItemKey> = (0..n)
                .map(|i| group.register(&format!("item-{i}"), i % 3 == 2))
                .collect();
            for (idx, by_value) in presses {
                if by_value {
                    group.select(&format!("item-{idx}"));
                } else if let Some(&key) = keys.get(idx) {
                    group.press(key);
                }
                let selected = keys.iter().filter(|k| group.is_selected(**k)).count();
                prop_assert!(selected <= 1);
            }
        }
    }
}
