//! Directory enumeration.

use std::path::Path;

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::FileEntry;

/// Lists the immediate children of a directory.
///
/// Implementations return entries in no particular order. A child that
/// cannot be stat'ed is skipped rather than failing the whole listing, so a
/// partially readable directory still yields what was obtainable.
pub trait DirectoryEnumerator: Send + Sync {
    /// Lists `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`]: the path does not exist.
    /// - [`CoreError::NotADirectory`]: the path is not a directory.
    /// - [`CoreError::PermissionDenied`]: the directory cannot be opened.
    fn enumerate(&self, path: &Path) -> CoreResult<Vec<FileEntry>>;
}

/// [`DirectoryEnumerator`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsEnumerator;

impl DirectoryEnumerator for FsEnumerator {
    fn enumerate(&self, path: &Path) -> CoreResult<Vec<FileEntry>> {
        read_directory(path)
    }
}

/// Reads the immediate contents of a directory from disk.
///
/// The returned entries are **unsorted**. Symlinks are not followed for the
/// metadata itself, only to decide whether they point at a folder.
///
/// # Errors
///
/// See [`DirectoryEnumerator::enumerate`].
pub fn read_directory(path: &Path) -> CoreResult<Vec<FileEntry>> {
    let metadata = std::fs::metadata(path).map_err(|e| CoreError::from_io(e, path))?;
    if !metadata.is_dir() {
        return Err(CoreError::NotADirectory(path.to_path_buf()));
    }

    let read_dir = std::fs::read_dir(path).map_err(|e| CoreError::from_io(e, path))?;

    let mut entries = Vec::new();
    let mut skipped = 0usize;
    for dir_entry in read_dir {
        let dir_entry = match dir_entry {
            Ok(e) => e,
            Err(_) => {
                skipped += 1;
                continue;
            }
        };
        let child = dir_entry.path();
        match std::fs::symlink_metadata(&child) {
            Ok(m) => entries.push(FileEntry::new(child, &m)),
            Err(e) => {
                skipped += 1;
                tracing::debug!("skipping unreadable entry {}: {e}", child.display());
            }
        }
    }

    if skipped > 0 {
        tracing::debug!(
            "listed {} with {skipped} unreadable entries skipped",
            path.display()
        );
    }

    Ok(entries)
}

/// Lists `path`, absorbing failures into an empty listing.
///
/// Used by the list model and the tree refresh, where a directory that
/// vanished or became unreadable is shown as empty rather than reported.
pub fn enumerate_or_empty(enumerator: &dyn DirectoryEnumerator, path: &Path) -> Vec<FileEntry> {
    match enumerator.enumerate(path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("showing {} as empty: {e}", path.display());
            Vec::new()
        }
    }
}
