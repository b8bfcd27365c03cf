#![forbid(unsafe_code)]

//! Expandable sections: [`Collapsible`] (one section) and [`Accordion`]
//! (a set of sections over a selection group).
//!
//! Expansion state changes synchronously; the height animation follows on
//! `sync`, using the same enter/exit transition as overlays. Renderers scale
//! section height by [`Collapsible::height_fraction`] /
//! [`Accordion::height_fraction`] and drop the content once the phase is
//! `Closed`.

use std::collections::BTreeSet;
use std::fmt;

use veil_runtime::VeilConfig;

use crate::disclosure::Disclosure;
use crate::env::Env;
use crate::selection::{ItemKey, MultiSelect, SelectOutcome, SingleSelect};
use crate::transition::{Completion, Transition, TransitionPhase};

fn drive(transition: &Transition, open: bool, config: &VeilConfig) -> Option<Completion> {
    let phase = transition.phase();
    if open && !phase.is_opening_or_open() {
        Some(transition.animate_open(config.enter_duration))
    } else if !open && phase.is_opening_or_open() {
        Some(transition.animate_close(config.exit_duration))
    } else {
        None
    }
}

// ============================================================================
// Collapsible
// ============================================================================

/// A disclosure with an animated height and no overlay.
#[derive(Debug)]
pub struct Collapsible {
    disclosure: Disclosure,
    transition: Transition,
    config: VeilConfig,
}

impl Collapsible {
    #[must_use]
    pub fn new(env: &Env, disclosure: Disclosure) -> Self {
        let transition = env.transition();
        if disclosure.is_open() {
            transition.snap_to(true);
        }
        Self {
            disclosure,
            transition,
            config: env.config.clone(),
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.disclosure.is_open()
    }

    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.transition.phase()
    }

    /// Share of the content's natural height to show, in `[0, 1]`.
    #[must_use]
    pub fn height_fraction(&self) -> f32 {
        self.transition.value()
    }

    /// Whether content should be laid out at all.
    #[must_use]
    pub fn is_content_mounted(&self) -> bool {
        self.transition.phase().is_visible()
    }

    #[must_use]
    pub fn disclosure(&self) -> &Disclosure {
        &self.disclosure
    }

    pub fn open(&mut self) -> bool {
        let requested = self.disclosure.request_open();
        self.sync();
        requested
    }

    pub fn close(&mut self) -> bool {
        let requested = self.disclosure.request_close();
        self.sync();
        requested
    }

    pub fn toggle(&mut self) -> bool {
        let requested = self.disclosure.toggle();
        self.sync();
        requested
    }

    pub fn set_open(&mut self, open: Option<bool>) {
        self.disclosure.set_controlled(open);
        self.sync();
    }

    pub fn sync(&mut self) -> Option<Completion> {
        if self.disclosure.is_detached() {
            return None;
        }
        drive(&self.transition, self.disclosure.is_open(), &self.config)
    }

    pub fn unmount(&mut self) {
        self.transition.cancel();
        self.disclosure.detach();
    }
}

// ============================================================================
// Accordion
// ============================================================================

/// Expansion policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccordionKind {
    /// At most one section open. With `collapsible`, pressing the open
    /// section closes it.
    Single { collapsible: bool },
    /// Any set of sections open.
    Multiple,
}

struct Section {
    key: ItemKey,
    value: String,
    transition: Transition,
}

type ValueSink = Box<dyn FnMut(Option<&str>)>;

/// Set of expandable sections.
pub struct Accordion {
    kind: AccordionKind,
    single: SingleSelect,
    multi: MultiSelect,
    sections: Vec<Section>,
    env: Env,
    on_value_change: Option<ValueSink>,
    unmounted: bool,
}

impl fmt::Debug for Accordion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accordion")
            .field("kind", &self.kind)
            .field("expanded", &self.expanded())
            .field("sections", &self.sections.len())
            .finish()
    }
}

impl Accordion {
    #[must_use]
    pub fn new(env: &Env, kind: AccordionKind) -> Self {
        Self {
            kind,
            single: SingleSelect::new(),
            multi: MultiSelect::new(),
            sections: Vec::new(),
            env: env.clone(),
            on_value_change: None,
            unmounted: false,
        }
    }

    /// Start with `values` expanded (only the first counts for `Single`).
    #[must_use]
    pub fn default_expanded<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        match self.kind {
            AccordionKind::Single { .. } => self.single.set_value(values.first().map(String::as_str)),
            AccordionKind::Multiple => self.multi.set_values(values.into_iter().collect()),
        }
        for section in &self.sections {
            section.transition.snap_to(self.is_expanded(&section.value));
        }
        self
    }

    /// Single mode: called with the new open section (`None` when collapsed),
    /// before the accordion's state changes.
    #[must_use]
    pub fn on_value_change(mut self, f: impl FnMut(Option<&str>) + 'static) -> Self {
        self.on_value_change = Some(Box::new(f));
        self
    }

    /// Multiple mode: called with the new open set.
    #[must_use]
    pub fn on_values_change(mut self, f: impl FnMut(&BTreeSet<String>) + 'static) -> Self {
        self.multi.set_on_values_change(f);
        self
    }

    /// Add a section. Registering an existing value returns its key.
    pub fn section(&mut self, value: &str, disabled: bool) -> ItemKey {
        let key = match self.kind {
            AccordionKind::Single { .. } => self.single.register(value, disabled),
            AccordionKind::Multiple => self.multi.register(value, disabled),
        };
        if !self.sections.iter().any(|s| s.key == key) {
            let transition = self.env.transition();
            if self.is_expanded(value) {
                transition.snap_to(true);
            }
            self.sections.push(Section {
                key,
                value: value.to_string(),
                transition,
            });
        }
        key
    }

    #[must_use]
    pub fn kind(&self) -> AccordionKind {
        self.kind
    }

    #[must_use]
    pub fn is_expanded(&self, value: &str) -> bool {
        match self.kind {
            AccordionKind::Single { .. } => self.single.value() == Some(value),
            AccordionKind::Multiple => self.multi.contains(value),
        }
    }

    /// Expanded section values, in registration order.
    #[must_use]
    pub fn expanded(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| self.is_expanded(&s.value))
            .map(|s| s.value.as_str())
            .collect()
    }

    #[must_use]
    pub fn height_fraction(&self, key: ItemKey) -> f32 {
        self.find(key).map_or(0.0, |s| s.transition.value())
    }

    #[must_use]
    pub fn phase(&self, key: ItemKey) -> TransitionPhase {
        self.find(key)
            .map_or(TransitionPhase::Closed, |s| s.transition.phase())
    }

    /// Press on a section header.
    pub fn press(&mut self, key: ItemKey) -> SelectOutcome {
        if self.unmounted {
            return SelectOutcome::Unchanged;
        }
        let outcome = match self.kind {
            AccordionKind::Single { collapsible } => self.press_single(key, collapsible),
            AccordionKind::Multiple => self.multi.press(key),
        };
        self.sync();
        outcome
    }

    fn press_single(&mut self, key: ItemKey, collapsible: bool) -> SelectOutcome {
        let Some(item) = self.single.item(key) else {
            return SelectOutcome::UnknownKey;
        };
        if item.disabled {
            tracing::trace!(value = %item.value, "press on disabled section dropped");
            return SelectOutcome::Disabled;
        }
        if self.single.is_selected(key) {
            if !collapsible {
                return SelectOutcome::Unchanged;
            }
            if let Some(sink) = self.on_value_change.as_mut() {
                sink(None);
            }
            self.single.clear();
            tracing::debug!("accordion collapsed");
            return SelectOutcome::Changed;
        }
        let value = item.value.clone();
        if let Some(sink) = self.on_value_change.as_mut() {
            sink(Some(&value));
        }
        self.single.press(key)
    }

    /// Overwrite the single-mode value (controlled sync). Fires no callback.
    pub fn set_value(&mut self, value: Option<&str>) {
        self.single.set_value(value);
        self.sync();
    }

    /// Overwrite the multiple-mode set (controlled sync). Fires no callback.
    pub fn set_values(&mut self, values: BTreeSet<String>) {
        self.multi.set_values(values);
        self.sync();
    }

    /// Start height animations for sections whose expansion changed.
    pub fn sync(&mut self) {
        if self.unmounted {
            return;
        }
        for section in &self.sections {
            let open = match self.kind {
                AccordionKind::Single { .. } => self.single.value() == Some(section.value.as_str()),
                AccordionKind::Multiple => self.multi.contains(&section.value),
            };
            drive(&section.transition, open, &self.env.config);
        }
    }

    pub fn unmount(&mut self) {
        for section in &self.sections {
            section.transition.cancel();
        }
        self.on_value_change = None;
        self.unmounted = true;
    }

    fn find(&self, key: ItemKey) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }
}
