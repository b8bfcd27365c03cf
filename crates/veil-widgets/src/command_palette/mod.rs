#![forbid(unsafe_code)]

//! Command palette: a dialog holding a filterable list of commands.
//!
//! The query matches a command when its characters appear in the label (or
//! a keyword) in order, ignoring case. Matches keep registration order.
//! Disabled commands are listed but never run and are skipped by the
//! highlight.

use std::fmt;

use veil_core::{Event, Size};

use crate::disclosure::Disclosure;
use crate::env::Env;
use crate::modal::Dialog;
use crate::overlay::EventOutcome;
use crate::transition::Completion;

/// One runnable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub id: String,
    pub label: String,
    pub keywords: Vec<String>,
    pub disabled: bool,
}

impl Command {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            keywords: Vec::new(),
            disabled: false,
        }
    }

    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    fn matches(&self, query: &str) -> bool {
        is_subsequence(query, &self.label) || self.keywords.iter().any(|k| is_subsequence(query, k))
    }
}

/// Whether `needle` appears in order within `haystack`, ignoring case.
#[must_use]
pub fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut hay = haystack.chars().flat_map(char::to_lowercase);
    needle
        .chars()
        .flat_map(char::to_lowercase)
        .all(|c| hay.any(|h| h == c))
}

type RunSink = Box<dyn FnMut(&str)>;

/// Searchable command list in a dialog.
pub struct CommandPalette {
    dialog: Dialog,
    commands: Vec<Command>,
    query: String,
    matches: Vec<usize>,
    highlighted: Option<usize>,
    on_run: Option<RunSink>,
}

impl fmt::Debug for CommandPalette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandPalette")
            .field("open", &self.dialog.is_open())
            .field("commands", &self.commands.len())
            .field("query", &self.query)
            .field("matches", &self.matches.len())
            .field("highlighted", &self.highlighted)
            .finish()
    }
}

impl CommandPalette {
    #[must_use]
    pub fn new(env: &Env, disclosure: Disclosure) -> Self {
        let mut palette = Self {
            dialog: Dialog::new(env, disclosure).size(Size::new(360.0, 420.0)),
            commands: Vec::new(),
            query: String::new(),
            matches: Vec::new(),
            highlighted: None,
            on_run: None,
        };
        palette.refilter();
        palette
    }

    #[must_use]
    pub fn commands(mut self, commands: impl IntoIterator<Item = Command>) -> Self {
        self.commands.extend(commands);
        self.refilter();
        self
    }

    /// Called with the id of each command that runs.
    #[must_use]
    pub fn on_run(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_run = Some(Box::new(f));
        self
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
        self.refilter();
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.dialog.is_open()
    }

    #[must_use]
    pub fn dialog(&self) -> &Dialog {
        &self.dialog
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Commands matching the query, in registration order.
    pub fn matches(&self) -> impl Iterator<Item = &Command> + '_ {
        self.matches.iter().map(|&i| &self.commands[i])
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<&Command> {
        self.highlighted.map(|m| &self.commands[self.matches[m]])
    }

    /// Opening starts from an empty query.
    pub fn open(&mut self) -> bool {
        let requested = self.dialog.open();
        if requested {
            self.set_query("");
        }
        requested
    }

    pub fn close(&mut self) -> bool {
        self.dialog.close()
    }

    pub fn toggle(&mut self) -> bool {
        if self.dialog.is_open() {
            self.close()
        } else {
            self.open()
        }
    }

    pub fn set_query(&mut self, query: &str) {
        if self.query != query {
            query.clone_into(&mut self.query);
        }
        self.refilter();
    }

    pub fn highlight_next(&mut self) {
        self.move_highlight(true);
    }

    pub fn highlight_prev(&mut self) {
        self.move_highlight(false);
    }

    /// Run the command with `id`. Returns `false` for unknown or disabled
    /// commands and while closed.
    pub fn run(&mut self, id: &str) -> bool {
        if !self.dialog.is_open() {
            return false;
        }
        let Some(command) = self.commands.iter().find(|c| c.id == id) else {
            tracing::debug!(id, "no command with that id");
            return false;
        };
        if command.disabled {
            tracing::trace!(id, "disabled command skipped");
            return false;
        }
        tracing::debug!(id, "command run");
        if let Some(sink) = self.on_run.as_mut() {
            sink(id);
        }
        self.dialog.close();
        true
    }

    pub fn run_highlighted(&mut self) -> bool {
        match self.highlighted().map(|c| c.id.clone()) {
            Some(id) => self.run(&id),
            None => false,
        }
    }

    pub fn sync(&mut self) -> Option<Completion> {
        self.dialog.sync()
    }

    pub fn handle_event(&mut self, event: &Event) -> EventOutcome {
        self.dialog.handle_event(event)
    }

    pub fn unmount(&mut self) {
        self.on_run = None;
        self.dialog.unmount();
    }

    fn refilter(&mut self) {
        let query = self.query.trim();
        self.matches = self
            .commands
            .iter()
            .enumerate()
            .filter(|(_, c)| c.matches(query))
            .map(|(i, _)| i)
            .collect();
        self.highlighted = self
            .matches
            .iter()
            .position(|&i| !self.commands[i].disabled);
    }

    fn move_highlight(&mut self, forward: bool) {
        let n = self.matches.len();
        let Some(start) = self.highlighted else {
            return;
        };
        for step in 1..=n {
            let m = if forward {
                (start + step) % n
            } else {
                (start + n - step % n) % n
            };
            if !self.commands[self.matches[m]].disabled {
                self.highlighted = Some(m);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn palette() -> (CommandPalette, Rc<RefCell<Vec<String>>>) {
        let env = Env::new(Size::new(400.0, 800.0));
        let ran = Rc::new(RefCell::new(Vec::new()));
        let r = Rc::clone(&ran);
        let p = CommandPalette::new(&env, Disclosure::default())
            .commands([
                Command::new("new-event", "New Event").keyword("calendar"),
                Command::new("new-task", "New Task"),
                Command::new("pay-dues", "Pay Dues").disabled(),
                Command::new("members", "Members"),
            ])
            .on_run(move |id| r.borrow_mut().push(id.to_string()));
        (p, ran)
    }

    fn ids(p: &CommandPalette) -> Vec<&str> {
        p.matches().map(|c| c.id.as_str()).collect()
    }

    // --- matching ---

    #[test]
    fn subsequence_ignores_case() {
        assert!(is_subsequence("nwt", "New Task"));
        assert!(is_subsequence("", "anything"));
        assert!(!is_subsequence("tn", "New Task x"));
        assert!(is_subsequence("ÉV", "évent"));
    }

    #[test]
    fn query_filters_in_order() {
        let (mut p, _) = palette();
        p.open();
        assert_eq!(ids(&p).len(), 4);
        p.set_query("new");
        assert_eq!(ids(&p), vec!["new-event", "new-task"]);
        p.set_query("cal");
        assert_eq!(ids(&p), vec!["new-event"]);
        p.set_query("zzz");
        assert!(ids(&p).is_empty());
        assert!(p.highlighted().is_none());
    }

    // --- running ---

    #[test]
    fn run_closes_and_reports() {
        let (mut p, ran) = palette();
        p.open();
        assert!(p.run("members"));
        assert!(!p.is_open());
        assert_eq!(*ran.borrow(), vec!["members".to_string()]);
        assert!(!p.run("members"), "closed");
    }

    #[test]
    fn disabled_never_runs() {
        let (mut p, ran) = palette();
        p.open();
        assert!(!p.run("pay-dues"));
        assert!(!p.run("missing"));
        assert!(p.is_open());
        assert!(ran.borrow().is_empty());
    }

    #[test]
    fn highlight_skips_disabled() {
        let (mut p, ran) = palette();
        p.open();
        p.set_query("e");
        assert_eq!(p.highlighted().map(|c| c.id.as_str()), Some("new-event"));
        p.highlight_next();
        p.highlight_next();
        assert_eq!(p.highlighted().map(|c| c.id.as_str()), Some("members"));
        p.highlight_prev();
        assert_eq!(p.highlighted().map(|c| c.id.as_str()), Some("new-task"));
        assert!(p.run_highlighted());
        assert_eq!(*ran.borrow(), vec!["new-task".to_string()]);
    }

    #[test]
    fn reopening_resets_query() {
        let (mut p, _) = palette();
        p.open();
        p.set_query("mem");
        p.close();
        p.open();
        assert_eq!(p.query(), "");
        assert_eq!(ids(&p).len(), 4);
    }
}
