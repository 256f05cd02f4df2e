//! Debounced watcher on the directory shown in the list.
//!
//! Change notifications go to the main loop, which refreshes the list and
//! the tree.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crossbeam_channel::Sender;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, DebouncedEventKind, Debouncer};

/// Messages from the watcher to the main loop.
#[derive(Debug)]
pub enum WatchMessage {
    /// The watched directory contents changed.
    Changed,
    Error(String),
}

pub struct DirWatcher {
    debouncer: Debouncer<notify::RecommendedWatcher>,
    current_dir: Option<PathBuf>,
}

impl DirWatcher {
    /// # Errors
    ///
    /// Returns an error if the underlying notify watcher cannot be initialised.
    pub fn new(tx: Sender<WatchMessage>, debounce: Duration) -> anyhow::Result<Self> {
        let debouncer = new_debouncer(
            debounce,
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    if events.iter().any(|e| matches!(e.kind, DebouncedEventKind::Any)) {
                        let _ = tx.send(WatchMessage::Changed);
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchMessage::Error(e.to_string()));
                }
            },
        )?;

        Ok(Self {
            debouncer,
            current_dir: None,
        })
    }

    /// Switches the watch to `dir`. Watching the same directory again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be watched.
    pub fn watch(&mut self, dir: &Path) -> anyhow::Result<()> {
        if self.current_dir.as_deref() == Some(dir) {
            return Ok(());
        }
        if let Some(prev) = self.current_dir.take() {
            let _ = self.debouncer.watcher().unwatch(&prev);
        }

        self.debouncer
            .watcher()
            .watch(dir, notify::RecursiveMode::NonRecursive)?;
        tracing::debug!("watching {}", dir.display());
        self.current_dir = Some(dir.to_path_buf());
        Ok(())
    }

    pub fn current_dir(&self) -> Option<&Path> {
        self.current_dir.as_deref()
    }
}
