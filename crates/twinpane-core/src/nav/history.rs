//! Bounded back/forward navigation history.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// One visited directory and the selection it had when it was left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    path: PathBuf,
    selection: Vec<String>,
}

impl HistoryEntry {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Selected raw names captured when navigation left this directory.
    pub fn selection(&self) -> &[String] {
        &self.selection
    }
}

/// Where a back/forward step landed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStep {
    pub path: PathBuf,
    pub selection: Vec<String>,
}

/// Browser-style history: one stack, one cursor.
///
/// Entries after the cursor are forward history and are dropped when a new
/// path is pushed from a non-tail position. The stack never holds more than
/// `max_len` entries; the oldest are evicted first.
#[derive(Debug, Clone)]
pub struct NavigationHistory {
    entries: VecDeque<HistoryEntry>,
    cursor: Option<usize>,
    max_len: usize,
    suppressed: bool,
}

impl NavigationHistory {
    /// Creates an empty history holding at most `max_len` entries (minimum 1).
    pub fn new(max_len: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: None,
            max_len: max_len.max(1),
            suppressed: false,
        }
    }

    /// Records a visit to `path`.
    ///
    /// Skipped entirely while recording is suppressed. Re-visiting the path
    /// at the cursor is a no-op.
    pub fn push(&mut self, path: PathBuf) {
        if self.suppressed {
            return;
        }

        if let Some(cursor) = self.cursor {
            self.entries.truncate(cursor + 1);
            if self.entries[cursor].path == path {
                return;
            }
        }

        self.entries.push_back(HistoryEntry {
            path,
            selection: Vec::new(),
        });
        while self.entries.len() > self.max_len {
            self.entries.pop_front();
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    /// Steps back one entry. `None` at the oldest entry or when empty.
    pub fn back(&mut self) -> Option<HistoryStep> {
        let cursor = self.cursor?;
        if cursor == 0 {
            return None;
        }
        self.cursor = Some(cursor - 1);
        self.step_at(cursor - 1)
    }

    /// Steps forward one entry. `None` at the newest entry or when empty.
    pub fn forward(&mut self) -> Option<HistoryStep> {
        let cursor = self.cursor?;
        if cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor = Some(cursor + 1);
        self.step_at(cursor + 1)
    }

    fn step_at(&self, index: usize) -> Option<HistoryStep> {
        self.entries.get(index).map(|e| HistoryStep {
            path: e.path.clone(),
            selection: e.selection.clone(),
        })
    }

    /// Stores `selection` on the entry at the cursor (the one about to be left).
    pub fn record_selection(&mut self, selection: Vec<String>) {
        if let Some(entry) = self.cursor.and_then(|c| self.entries.get_mut(c)) {
            entry.selection = selection;
        }
    }

    /// While `true`, [`push`](Self::push) does nothing.
    pub fn suppress_recording(&mut self, suppress: bool) {
        self.suppressed = suppress;
    }

    pub fn is_recording(&self) -> bool {
        !self.suppressed
    }

    /// The entry at the cursor.
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn can_go_back(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_go_forward(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// All recorded paths, oldest first.
    pub fn paths(&self) -> Vec<&Path> {
        self.entries.iter().map(|e| e.path.as_path()).collect()
    }
}

impl Default for NavigationHistory {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    #[test]
    fn new_history_is_empty() {
        let mut history = NavigationHistory::new(10);
        assert!(history.is_empty());
        assert!(!history.can_go_back());
        assert!(!history.can_go_forward());
        assert!(history.back().is_none());
        assert!(history.forward().is_none());
        assert!(history.current().is_none());
    }

    #[test]
    fn push_moves_cursor_to_tail() {
        let mut history = NavigationHistory::new(10);
        history.push(p("/a"));
        history.push(p("/b"));
        assert_eq!(history.current().unwrap().path(), Path::new("/b"));
        assert!(history.can_go_back());
        assert!(!history.can_go_forward());
    }

    #[test]
    fn branch_truncates_forward_history() {
        let mut history = NavigationHistory::new(10);
        history.push(p("/A"));
        history.push(p("/B"));
        history.push(p("/C"));

        assert_eq!(history.back().unwrap().path, p("/B"));
        assert_eq!(history.back().unwrap().path, p("/A"));

        history.push(p("/D"));
        assert_eq!(history.paths(), vec![Path::new("/A"), Path::new("/D")]);
        assert!(history.forward().is_none());
    }

    #[test]
    fn revisit_restores_selection_snapshot() {
        let mut history = NavigationHistory::new(10);
        history.push(p("/B"));
        history.record_selection(vec!["x.txt".to_owned()]);
        history.push(p("/C"));

        history.record_selection(Vec::new());
        let step = history.back().unwrap();
        assert_eq!(step.path, p("/B"));
        assert_eq!(step.selection, vec!["x.txt".to_owned()]);
    }

    #[test]
    fn pushing_current_path_again_is_noop() {
        let mut history = NavigationHistory::new(10);
        history.push(p("/a"));
        history.push(p("/a"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn pushing_current_path_from_middle_still_truncates() {
        let mut history = NavigationHistory::new(10);
        history.push(p("/a"));
        history.push(p("/b"));
        history.back();
        history.push(p("/a"));
        assert_eq!(history.paths(), vec![Path::new("/a")]);
        assert!(!history.can_go_forward());
    }

    #[test]
    fn oldest_entries_are_evicted() {
        let mut history = NavigationHistory::new(3);
        for dir in ["/1", "/2", "/3", "/4", "/5"] {
            history.push(p(dir));
        }
        assert_eq!(
            history.paths(),
            vec![Path::new("/3"), Path::new("/4"), Path::new("/5")]
        );
        assert_eq!(history.back().unwrap().path, p("/4"));
        assert_eq!(history.back().unwrap().path, p("/3"));
        assert!(history.back().is_none());
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut history = NavigationHistory::new(0);
        history.push(p("/a"));
        history.push(p("/b"));
        assert_eq!(history.max_len(), 1);
        assert_eq!(history.paths(), vec![Path::new("/b")]);
    }

    #[test]
    fn suppressed_push_is_skipped() {
        let mut history = NavigationHistory::new(10);
        history.push(p("/a"));
        history.suppress_recording(true);
        assert!(!history.is_recording());
        history.push(p("/b"));
        history.suppress_recording(false);
        assert_eq!(history.len(), 1);
        history.push(p("/c"));
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn back_then_forward_round_trip() {
        let mut history = NavigationHistory::new(10);
        history.push(p("/a"));
        history.push(p("/b"));
        assert_eq!(history.back().unwrap().path, p("/a"));
        assert!(history.back().is_none());
        assert_eq!(history.forward().unwrap().path, p("/b"));
        assert!(history.forward().is_none());
    }
}
