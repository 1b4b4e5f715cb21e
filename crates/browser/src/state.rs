use crate::history::{Crumb, History};
use satchel_provider::{DirectoryEntry, LocationId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing requested yet
    #[default]
    Idle,
    Loading,
    Ready,
    /// Last listing failed; the message is meant for humans
    Error(String),
}
impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Everything a UI needs to draw one folder browser.
///
/// Only [`FolderBrowser`](crate::FolderBrowser) can change it; everyone else
/// gets a read-only view or a cloned snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    current: Crumb,
    history: History,
    entries: Vec<DirectoryEntry>,
    filter: String,
    visible: Vec<DirectoryEntry>,
    load_state: LoadState,
}

impl NavigationState {
    pub(crate) fn new(root: Crumb) -> Self {
        Self {
            current: root,
            history: History::default(),
            entries: Vec::new(),
            filter: String::new(),
            visible: Vec::new(),
            load_state: LoadState::Idle,
        }
    }

    /// Folder currently displayed.
    pub fn current(&self) -> &Crumb {
        &self.current
    }

    pub fn current_id(&self) -> &LocationId {
        &self.current.id
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Last successfully fetched listing, unfiltered, in provider order.
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Entries whose name contains the filter text, ignoring case.
    pub fn visible(&self) -> &[DirectoryEntry] {
        &self.visible
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn at_root(&self) -> bool {
        self.history.is_empty()
    }

    pub(crate) fn descend(&mut self, folder: Crumb) {
        let parent = std::mem::replace(&mut self.current, folder);
        self.history = self.history.pushed(parent);
        self.set_filter(String::new());
    }

    /// Returns `false` (and changes nothing) when already at the root.
    pub(crate) fn ascend(&mut self) -> bool {
        let Some((parent, rest)) = self.history.popped() else {
            return false;
        };
        self.current = parent;
        self.history = rest;
        self.set_filter(String::new());
        true
    }

    pub(crate) fn set_filter(&mut self, filter: String) {
        self.filter = filter;
        self.refilter();
    }

    pub(crate) fn set_loading(&mut self) {
        self.load_state = LoadState::Loading;
    }

    pub(crate) fn set_entries(&mut self, entries: Vec<DirectoryEntry>) {
        self.entries = entries;
        self.load_state = LoadState::Ready;
        self.refilter();
    }

    /// Entries stay as they were: a stale listing beats an empty one.
    pub(crate) fn set_error(&mut self, message: String) {
        self.load_state = LoadState::Error(message);
    }

    fn refilter(&mut self) {
        if self.filter.is_empty() {
            self.visible = self.entries.clone();
            return;
        }
        let needle = self.filter.to_lowercase();
        self.visible = self.entries.iter().filter(|entry| entry.name.to_lowercase().contains(&needle)).cloned().collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn state() -> NavigationState {
        let mut state = NavigationState::new(Crumb::new("root", "Material"));
        state.set_entries(vec![
            DirectoryEntry::folder("1", "Math"),
            DirectoryEntry::file("2", "notes.pdf"),
            DirectoryEntry::file("3", "MATH-101 Midterm.pdf"),
            DirectoryEntry::folder("4", "Über Physik"),
        ]);
        state
    }

    fn visible_ids(state: &NavigationState) -> Vec<&str> {
        state.visible().iter().map(|e| e.id.as_str()).collect()
    }

    #[rstest]
    #[case("", vec!["1", "2", "3", "4"])]
    #[case("not", vec!["2"])]
    #[case("math", vec!["1", "3"])]
    #[case("MATH", vec!["1", "3"])]
    #[case(".pdf", vec!["2", "3"])]
    #[case("über", vec!["4"])]
    #[case("ÜBER", vec!["4"])]
    #[case("chemistry", vec![])]
    fn test_filter(#[case] filter: &str, #[case] expected: Vec<&str>) {
        let mut state = state();
        state.set_filter(filter.to_string());
        assert_eq!(visible_ids(&state), expected);
    }

    #[test]
    fn test_filter_spaces_are_literal() {
        let mut state = state();
        state.set_filter(" midterm".to_string());
        assert_eq!(visible_ids(&state), ["3"]);
        state.set_filter("math ".to_string());
        assert!(state.visible().is_empty());
    }

    #[test]
    fn test_new_entries_respect_filter() {
        let mut state = state();
        state.set_filter("pdf".to_string());
        state.set_entries(vec![DirectoryEntry::file("9", "answers.PDF"), DirectoryEntry::folder("8", "Old")]);
        assert_eq!(visible_ids(&state), ["9"]);
    }

    #[test]
    fn test_error_keeps_entries() {
        let mut state = state();
        state.set_loading();
        state.set_error("network error: timed out".to_string());
        assert_eq!(state.entries().len(), 4);
        assert_eq!(state.visible().len(), 4);
        assert_eq!(state.load_state().error(), Some("network error: timed out"));
    }

    #[test]
    fn test_descend_and_ascend() {
        let mut state = state();
        state.set_filter("math".to_string());
        state.descend(Crumb::new("1", "Math"));
        assert_eq!(state.current_id(), &LocationId::from("1"));
        assert_eq!(state.filter(), "");
        assert!(!state.at_root());
        assert!(state.ascend());
        assert_eq!(state.current_id(), &LocationId::from("root"));
        assert!(state.at_root());
        assert!(!state.ascend());
    }
}
