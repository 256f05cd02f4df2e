//! In-memory collaborators shared by the unit tests.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::Receiver;
use parking_lot::Mutex;

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::FileEntry;
use crate::fs::icons::{IconResolver, IconSet};
use crate::fs::ops::DirectoryEnumerator;

/// Directory listings kept in memory. Clones share state.
#[derive(Debug, Clone, Default)]
pub(crate) struct MemoryFs {
    dirs: Arc<Mutex<HashMap<PathBuf, Vec<FileEntry>>>>,
    denied: Arc<Mutex<HashSet<PathBuf>>>,
}

impl MemoryFs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replaces the listing of `dir`. Names ending in `/` are folders.
    pub(crate) fn set_dir(&self, dir: &str, names: &[&str]) {
        let dir = PathBuf::from(dir);
        let entries = names
            .iter()
            .map(|n| match n.strip_suffix('/') {
                Some(folder) => FileEntry::folder(dir.join(folder)),
                None => FileEntry::file(dir.join(n), 0),
            })
            .collect();
        self.set_entries(dir, entries);
    }

    pub(crate) fn set_entries(&self, dir: impl Into<PathBuf>, entries: Vec<FileEntry>) {
        let dir = dir.into();
        self.denied.lock().remove(&dir);
        self.dirs.lock().insert(dir, entries);
    }

    pub(crate) fn deny(&self, dir: &str) {
        self.denied.lock().insert(PathBuf::from(dir));
    }
}

impl DirectoryEnumerator for MemoryFs {
    fn enumerate(&self, path: &Path) -> CoreResult<Vec<FileEntry>> {
        if self.denied.lock().contains(path) {
            return Err(CoreError::PermissionDenied(path.to_path_buf()));
        }
        self.dirs
            .lock()
            .get(path)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(path.to_path_buf()))
    }
}

/// Resolver that counts calls and can be slowed down or gated.
pub(crate) struct CountingResolver {
    calls: AtomicUsize,
    per_path: Mutex<HashMap<PathBuf, usize>>,
    delay: Duration,
    gate: Option<(PathBuf, Receiver<()>)>,
    overlay: Option<u32>,
}

impl CountingResolver {
    pub(crate) fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            per_path: Mutex::new(HashMap::new()),
            delay: Duration::ZERO,
            gate: None,
            overlay: Some(7),
        }
    }

    pub(crate) fn with_delay(self, delay: Duration) -> Self {
        Self { delay, ..self }
    }

    /// Paths under `prefix` block until a permit arrives on `permits`.
    pub(crate) fn with_gate(self, prefix: impl Into<PathBuf>, permits: Receiver<()>) -> Self {
        Self {
            gate: Some((prefix.into(), permits)),
            ..self
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn calls_for(&self, path: &Path) -> usize {
        self.per_path.lock().get(path).copied().unwrap_or(0)
    }
}

impl IconResolver for CountingResolver {
    fn resolve(&self, path: &Path, is_folder: bool) -> IconSet {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.per_path.lock().entry(path.to_path_buf()).or_insert(0) += 1;
        if let Some((prefix, permits)) = &self.gate {
            if path.starts_with(prefix) {
                let _ = permits.recv_timeout(Duration::from_secs(10));
            }
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        IconSet {
            overlay: self.overlay,
            ..IconSet::placeholder(is_folder)
        }
    }
}
