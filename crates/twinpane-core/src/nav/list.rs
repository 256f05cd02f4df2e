//! The current-directory list model.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError};
use parking_lot::Mutex;

use crate::config::session::Session;
use crate::error::CoreResult;
use crate::event::{Command, ListUpdate, Outcome};
use crate::fs::icons::IconResolver;
use crate::fs::ops::{enumerate_or_empty, DirectoryEnumerator};
use crate::nav::entry::ListEntry;
use crate::nav::filter::{filter_files, filter_hidden, FilterPattern};
use crate::nav::history::{HistoryStep, NavigationHistory};
use crate::nav::sort::{sort_entries, SortDirection, SortKey};
use crate::pipeline::{EntrySet, IconPipeline, PipelineTimings, ScanState, SharedEntries};

/// Sorted, filtered rows of one directory plus selection and history.
///
/// All methods are meant to be called from one interactive thread. Icons
/// are filled in by a background [`IconPipeline`]; callers learn about it
/// through [`poll_updates`](Self::poll_updates) and re-read the rows.
pub struct VirtualList {
    session: Session,
    current_path: Option<PathBuf>,
    entries: SharedEntries,
    selection: Vec<String>,
    history: NavigationHistory,
    enumerator: Arc<dyn DirectoryEnumerator>,
    updates: Receiver<ListUpdate>,
    pipeline: IconPipeline,
}

impl VirtualList {
    /// Creates an empty list and spawns its icon worker.
    ///
    /// # Errors
    ///
    /// Fails only if the worker thread cannot be spawned.
    pub fn new(
        session: Session,
        enumerator: Arc<dyn DirectoryEnumerator>,
        resolver: Arc<dyn IconResolver>,
    ) -> CoreResult<Self> {
        let entries: SharedEntries = Arc::new(Mutex::new(EntrySet::default()));
        let (tx, updates) = crossbeam_channel::unbounded();
        let pipeline = IconPipeline::spawn(
            Arc::clone(&entries),
            resolver,
            tx,
            PipelineTimings {
                resolve_timeout: session.resolve_timeout,
                interrupt_timeout: session.interrupt_timeout,
                step_pause: session.step_pause,
            },
        )?;
        let history = NavigationHistory::new(session.history_limit);

        Ok(Self {
            session,
            current_path: None,
            entries,
            selection: Vec::new(),
            history,
            enumerator,
            updates,
            pipeline,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn history(&self) -> &NavigationHistory {
        &self.history
    }

    pub fn scan_state(&self) -> ScanState {
        self.pipeline.state()
    }

    /// Generation of the current row collection.
    pub fn generation(&self) -> u64 {
        self.entries.lock().generation
    }

    // --- Viewing ---

    /// Shows `path`. An unreadable or missing directory shows as empty.
    ///
    /// While history records, the selection of the directory being left is
    /// stored in its history entry and the visit is pushed. The selection is
    /// cleared.
    pub fn view_path(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        if self.history.is_recording() {
            self.history.record_selection(self.selection.clone());
        }
        self.load(&path);
        self.selection.clear();
        self.history.push(path);
    }

    /// Replaces the filter and re-reads the current directory.
    ///
    /// Selected names that survive the new filter stay selected.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidPattern`](crate::error::CoreError::InvalidPattern);
    /// the previous filter is kept.
    pub fn filter(&mut self, pattern: &str) -> CoreResult<()> {
        self.session.filter = FilterPattern::new(pattern)?;
        if let Some(path) = self.current_path.clone() {
            self.load(&path);
            self.retain_existing_selection();
        }
        Ok(())
    }

    /// Re-sorts the rows in place. Selection and resolved icons are kept.
    ///
    /// The rows keep their generation, so a lookup still in flight lands on
    /// its row in the new order and is not repeated.
    pub fn sort_by(&mut self, key: SortKey, direction: SortDirection) {
        self.session.sort_key = key;
        self.session.sort_direction = direction;

        self.pipeline.interrupt();
        let generation = {
            let mut set = self.entries.lock();
            sort_entries(&mut set.entries, key, direction);
            set.generation
        };
        self.restart_pipeline(generation);
    }

    /// Re-reads the current directory without touching history.
    ///
    /// Returns `false` if nothing is being viewed.
    pub fn refresh(&mut self) -> bool {
        let Some(path) = self.current_path.clone() else {
            return false;
        };
        self.load(&path);
        self.retain_existing_selection();
        true
    }

    /// Shows or hides dot-entries and re-reads the current directory.
    pub fn set_show_hidden(&mut self, show_hidden: bool) {
        if self.session.show_hidden != show_hidden {
            self.session.show_hidden = show_hidden;
            self.refresh();
        }
    }

    pub fn toggle_hidden(&mut self) {
        self.set_show_hidden(!self.session.show_hidden);
    }

    /// Runs another icon pass over the current rows. Resolved rows are skipped.
    pub fn rescan_icons(&self) {
        if self.current_path.is_some() {
            self.pipeline.start(self.generation());
        }
    }

    fn load(&mut self, path: &Path) {
        if !self.pipeline.interrupt() {
            tracing::debug!("replacing rows while the old icon pass is still running");
        }
        let rows = self.build_rows(path);
        let generation = {
            let mut set = self.entries.lock();
            set.generation += 1;
            set.entries = rows;
            set.generation
        };
        self.current_path = Some(path.to_path_buf());
        self.restart_pipeline(generation);
    }

    fn build_rows(&self, path: &Path) -> Vec<ListEntry> {
        let files = enumerate_or_empty(self.enumerator.as_ref(), path);
        let files = filter_hidden(files, self.session.show_hidden);
        let files = filter_files(files, &self.session.filter);

        let mut rows = Vec::with_capacity(files.len() + 1);
        if let Some(parent) = path.parent() {
            rows.push(ListEntry::parent_pseudo(parent));
        }
        rows.extend(files.iter().map(ListEntry::from_file_entry));
        sort_entries(&mut rows, self.session.sort_key, self.session.sort_direction);
        rows
    }

    /// Drops queued row notifications, whose indices no longer apply, and
    /// starts a new pass.
    fn restart_pipeline(&self, generation: u64) {
        let dropped = self.updates.try_iter().count();
        if dropped > 0 {
            tracing::trace!("dropped {dropped} updates for outdated rows");
        }
        self.pipeline.start(generation);
    }

    // --- Rows ---

    /// Number of rows, pseudo-parent included.
    pub fn entry_count(&self) -> usize {
        self.entries.lock().entries.len()
    }

    /// Snapshot of row `index`.
    pub fn entry(&self, index: usize) -> Option<ListEntry> {
        self.entries.lock().entries.get(index).cloned()
    }

    /// Snapshot of every row, in display order.
    pub fn entries(&self) -> Vec<ListEntry> {
        self.entries.lock().entries.clone()
    }

    // --- Selection ---

    /// Adds the row named `raw_name` to the selection.
    ///
    /// Returns `false` if no such row is shown. The pseudo-parent cannot be
    /// selected.
    pub fn select_by_name(&mut self, raw_name: &str) -> bool {
        let exists = self
            .entries
            .lock()
            .entries
            .iter()
            .any(|e| !e.is_parent_pseudo_entry() && e.raw_name() == raw_name);
        if exists && !self.selection.iter().any(|n| n == raw_name) {
            self.selection.push(raw_name.to_owned());
        }
        exists
    }

    pub fn deselect_by_name(&mut self, raw_name: &str) -> bool {
        let before = self.selection.len();
        self.selection.retain(|n| n != raw_name);
        self.selection.len() != before
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected raw names, in selection order.
    pub fn selected_names(&self) -> &[String] {
        &self.selection
    }

    /// Row indices of the selected entries, ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.entries
            .lock()
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| {
                !e.is_parent_pseudo_entry() && self.selection.iter().any(|n| n == e.raw_name())
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn retain_existing_selection(&mut self) {
        let set = self.entries.lock();
        self.selection.retain(|name| {
            set.entries
                .iter()
                .any(|e| !e.is_parent_pseudo_entry() && e.raw_name() == name)
        });
    }

    // --- Navigation ---

    /// Goes back one history step, restoring that directory's selection.
    pub fn go_back(&mut self) -> bool {
        self.history.record_selection(self.selection.clone());
        match self.history.back() {
            Some(step) => {
                self.replay(step);
                true
            }
            None => false,
        }
    }

    /// Goes forward one history step, restoring that directory's selection.
    pub fn go_forward(&mut self) -> bool {
        self.history.record_selection(self.selection.clone());
        match self.history.forward() {
            Some(step) => {
                self.replay(step);
                true
            }
            None => false,
        }
    }

    fn replay(&mut self, step: HistoryStep) {
        self.history.suppress_recording(true);
        self.view_path(&step.path);
        self.history.suppress_recording(false);
        for name in &step.selection {
            self.select_by_name(name);
        }
    }

    /// Shows the parent directory with the folder we came from selected.
    pub fn go_up(&mut self) -> bool {
        let Some(current) = self.current_path.clone() else {
            return false;
        };
        let Some(parent) = current.parent() else {
            return false;
        };
        self.view_path(parent);
        if let Some(child) = current.file_name() {
            self.select_by_name(&crate::nfc_string(&child.to_string_lossy()));
        }
        true
    }

    /// Activates row `index`.
    ///
    /// Folders and the pseudo-parent are entered; a file is handed back in
    /// [`Outcome::opened_file`]. An out-of-range index does nothing.
    pub fn open(&mut self, index: usize) -> Outcome {
        let Some(entry) = self.entry(index) else {
            return Outcome::default();
        };
        if entry.is_parent_pseudo_entry() {
            Outcome {
                changed_view: self.go_up(),
                opened_file: None,
            }
        } else if entry.is_folder() {
            self.view_path(entry.path());
            Outcome {
                changed_view: true,
                opened_file: None,
            }
        } else {
            Outcome {
                changed_view: false,
                opened_file: Some(entry.path().to_path_buf()),
            }
        }
    }

    /// Executes a UI command.
    ///
    /// # Errors
    ///
    /// Only [`Command::Filter`] can fail, on an invalid pattern.
    pub fn execute(&mut self, command: Command) -> CoreResult<Outcome> {
        let changed_view = match command {
            Command::ViewPath(path) => {
                self.view_path(path);
                true
            }
            Command::Filter(pattern) => {
                self.filter(&pattern)?;
                true
            }
            Command::SortBy(key, direction) => {
                self.sort_by(key, direction);
                true
            }
            Command::SelectByName(name) => {
                self.select_by_name(&name);
                false
            }
            Command::ClearSelection => {
                self.clear_selection();
                false
            }
            Command::ToggleHidden => {
                self.toggle_hidden();
                true
            }
            Command::GoBack => self.go_back(),
            Command::GoForward => self.go_forward(),
            Command::GoUp => self.go_up(),
            Command::Open(index) => return Ok(self.open(index)),
            Command::Refresh => self.refresh(),
        };
        Ok(Outcome {
            changed_view,
            opened_file: None,
        })
    }

    // --- Updates ---

    /// Drains pipeline notifications for the current rows.
    pub fn poll_updates(&self) -> Vec<ListUpdate> {
        let generation = self.generation();
        self.updates
            .try_iter()
            .filter(|u| u.generation() == generation)
            .collect()
    }

    /// Blocks until the current icon pass finishes or `timeout` elapses.
    ///
    /// Returns the notifications received meanwhile, like
    /// [`poll_updates`](Self::poll_updates).
    pub fn wait_idle(&self, timeout: Duration) -> Vec<ListUpdate> {
        let deadline = Instant::now() + timeout;
        let generation = self.generation();
        let mut seen = Vec::new();
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            let slice = (deadline - now).min(Duration::from_millis(10));
            match self.updates.recv_timeout(slice) {
                Ok(update) if update.generation() == generation => {
                    seen.push(update);
                    if matches!(update, ListUpdate::ScanFinished { .. }) {
                        break;
                    }
                }
                Ok(_) => {}
                Err(RecvTimeoutError::Timeout) => {
                    if !self.pipeline.state().is_scanning() && self.updates.is_empty() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        seen
    }
}
