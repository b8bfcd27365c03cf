#![forbid(unsafe_code)]

//! Integration tests: radio and checkbox groups, and the components built on
//! them.

use std::collections::BTreeSet;

use proptest::prelude::*;
use veil_harness::{Recorder, TestHost};
use veil_widgets::{
    Accordion, AccordionKind, Disclosure, DropdownMenu, MenuActivation, MenuEntry, MenuModel,
    MultiSelect, SelectOutcome, SingleSelect,
};

#[derive(Debug, Clone)]
enum Input {
    Press(usize),
    Select(usize),
    Disable(usize, bool),
}

fn input(n: usize) -> impl Strategy<Value = Input> {
    prop_oneof![
        (0..n + 2).prop_map(Input::Press),
        (0..n + 2).prop_map(Input::Select),
        ((0..n), any::<bool>()).prop_map(|(i, d)| Input::Disable(i, d)),
    ]
}

fn group_and_inputs() -> impl Strategy<Value = (usize, Vec<Input>)> {
    (1usize..8).prop_flat_map(|n| (Just(n), proptest::collection::vec(input(n), 0..50)))
}

// ============================================================================
// Single select
// ============================================================================

proptest! {
    #[test]
    fn at_most_one_selected_after_every_call((n, inputs) in group_and_inputs()) {
        let changes = Recorder::<String>::new();
        let mut group = SingleSelect::new().on_value_change(changes.str_sink());
        let keys: Vec<_> = (0..n).map(|i| group.register(&format!("v{i}"), false)).collect();
        let mut previous = group.value().map(str::to_string);

        for input in inputs {
            let outcome = match input {
                Input::Press(i) => keys.get(i).map(|&k| group.press(k)),
                Input::Select(i) => Some(group.select(&format!("v{i}"))),
                Input::Disable(i, d) => {
                    group.set_disabled(keys[i], d);
                    None
                }
            };
            let selected = keys.iter().filter(|&&k| group.is_selected(k)).count();
            prop_assert!(selected <= 1);

            let now = group.value().map(str::to_string);
            match outcome {
                Some(SelectOutcome::Changed) => {
                    prop_assert_ne!(&now, &previous);
                    prop_assert_eq!(changes.last(), now.clone());
                }
                Some(_) | None => prop_assert_eq!(&now, &previous),
            }
            previous = now;
        }
    }

    #[test]
    fn disabled_items_never_become_selected((n, inputs) in group_and_inputs()) {
        let mut group = SingleSelect::new();
        let keys: Vec<_> = (0..n).map(|i| group.register(&format!("v{i}"), i % 2 == 1)).collect();
        for input in inputs {
            match input {
                Input::Press(i) => {
                    if let Some(&k) = keys.get(i) {
                        group.press(k);
                    }
                }
                Input::Select(i) => {
                    group.select(&format!("v{i}"));
                }
                Input::Disable(..) => {}
            }
            for (i, &k) in keys.iter().enumerate() {
                if i % 2 == 1 {
                    prop_assert!(!group.is_selected(k));
                }
            }
        }
    }

    #[test]
    fn multi_select_notifies_with_new_set(
        toggles in proptest::collection::vec(0usize..5, 0..40),
    ) {
        let sets = Recorder::<BTreeSet<String>>::new();
        let sink = sets.clone();
        let mut group = MultiSelect::new().on_values_change(move |s| sink.record(s.clone()));
        for i in 0..5 {
            group.register(&format!("v{i}"), false);
        }
        let mut model = BTreeSet::new();
        for i in toggles {
            let v = format!("v{i}");
            if !model.remove(&v) {
                model.insert(v.clone());
            }
            prop_assert_eq!(group.toggle(&v), SelectOutcome::Changed);
            prop_assert_eq!(group.values(), &model);
            let last = sets.last();
            prop_assert_eq!(last.as_ref(), Some(&model));
        }
    }
}

#[test]
fn reselecting_fires_nothing() {
    let changes = Recorder::<String>::new();
    let mut group = SingleSelect::new().on_value_change(changes.str_sink());
    let a = group.register("a", false);
    assert_eq!(group.press(a), SelectOutcome::Changed);
    assert_eq!(group.press(a), SelectOutcome::Unchanged);
    assert_eq!(group.select("a"), SelectOutcome::Unchanged);
    assert_eq!(changes.calls(), vec!["a".to_string()]);
}

#[test]
fn unknown_value_matches_nothing() {
    let mut group = SingleSelect::new();
    let keys = [group.register("a", false), group.register("b", false)];
    assert_eq!(group.select("zzz"), SelectOutcome::Changed);
    assert!(keys.iter().all(|&k| !group.is_selected(k)));
}

// ============================================================================
// Built on groups
// ============================================================================

#[test]
fn accordion_single_keeps_one_section_open() {
    let host = TestHost::default();
    let changes = Recorder::<Option<String>>::new();
    let sink = changes.clone();
    let mut acc = Accordion::new(host.env(), AccordionKind::Single { collapsible: true })
        .on_value_change(move |v| sink.record(v.map(str::to_string)));
    let a = acc.section("a", false);
    let b = acc.section("b", false);
    let locked = acc.section("locked", true);
    acc.press(a);
    acc.press(b);
    assert_eq!(acc.expanded(), vec!["b"]);
    assert_eq!(acc.press(locked), SelectOutcome::Disabled);
    acc.press(b);
    assert!(acc.expanded().is_empty());
    assert_eq!(
        changes.calls(),
        vec![Some("a".to_string()), Some("b".to_string()), None]
    );
}

#[test]
fn menu_radio_group_is_exclusive_and_keeps_menu_open() {
    let host = TestHost::default();
    let mut menu = DropdownMenu::new(
        host.env(),
        Disclosure::new(true),
        veil_core::Rect::new(10.0, 10.0, 80.0, 30.0),
        MenuModel::new(vec![
            MenuEntry::label("Sort by"),
            MenuEntry::radio_group(
                "sort",
                vec![
                    MenuEntry::radio("name", "Name"),
                    MenuEntry::separator(),
                    MenuEntry::radio("date", "Date"),
                    MenuEntry::radio("size", "Size").disabled(),
                ],
            ),
        ]),
        veil_core::Size::new(160.0, 140.0),
    );
    assert_eq!(menu.activate("name"), MenuActivation::RadioSelected);
    assert_eq!(menu.activate("date"), MenuActivation::RadioSelected);
    assert_eq!(menu.activate("size"), MenuActivation::Disabled);
    assert_eq!(menu.activate("Sort by"), MenuActivation::Unknown);
    assert_eq!(menu.model().radio_value("sort"), Some("date"));
    assert!(menu.is_open());
}
