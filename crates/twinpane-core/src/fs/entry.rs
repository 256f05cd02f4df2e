//! Raw directory listing entries.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// One child of a directory as reported by a [`DirectoryEnumerator`].
///
/// This is the enumerator's view of the disk, before any filtering,
/// sorting or icon work. Folder sizes are always `0`.
///
/// [`DirectoryEnumerator`]: crate::fs::ops::DirectoryEnumerator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    name: String,
    size: u64,
    modified: Option<SystemTime>,
    is_dir: bool,
    is_hidden: bool,
    is_symlink: bool,
}

impl FileEntry {
    /// Creates an entry from a path and its (symlink-aware) metadata.
    ///
    /// Names are normalised to NFC. Hidden entries are detected by a
    /// leading `.` in the name. A symlink pointing at a directory is
    /// treated as a folder.
    pub fn new(path: PathBuf, metadata: &std::fs::Metadata) -> Self {
        let is_symlink = metadata.file_type().is_symlink();
        let is_dir = if is_symlink {
            std::fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false)
        } else {
            metadata.is_dir()
        };
        let name = path
            .file_name()
            .map(|n| crate::nfc_string(&n.to_string_lossy()))
            .unwrap_or_default();
        let is_hidden = name.starts_with('.');

        Self {
            path,
            name,
            size: if is_dir { 0 } else { metadata.len() },
            modified: metadata.modified().ok(),
            is_dir,
            is_hidden,
            is_symlink,
        }
    }

    /// Creates a folder entry without touching the disk.
    pub fn folder(path: impl Into<PathBuf>) -> Self {
        Self::synthetic(path.into(), true, 0)
    }

    /// Creates a file entry without touching the disk.
    pub fn file(path: impl Into<PathBuf>, size: u64) -> Self {
        Self::synthetic(path.into(), false, size)
    }

    fn synthetic(path: PathBuf, is_dir: bool, size: u64) -> Self {
        let name = path
            .file_name()
            .map(|n| crate::nfc_string(&n.to_string_lossy()))
            .unwrap_or_default();
        let is_hidden = name.starts_with('.');
        Self {
            path,
            name,
            size: if is_dir { 0 } else { size },
            modified: None,
            is_dir,
            is_hidden,
            is_symlink: false,
        }
    }

    /// Returns a copy with the given modification time.
    #[must_use]
    pub fn with_modified(self, modified: SystemTime) -> Self {
        Self {
            modified: Some(modified),
            ..self
        }
    }

    /// Returns a copy with the hidden attribute overridden.
    #[must_use]
    pub fn with_hidden(self, is_hidden: bool) -> Self {
        Self { is_hidden, ..self }
    }

    /// Returns a copy flagged as a symbolic link.
    #[must_use]
    pub fn with_symlink(self, is_symlink: bool) -> Self {
        Self { is_symlink, ..self }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File size in bytes. Always `0` for folders.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Modification time as nanoseconds since the UNIX epoch.
    ///
    /// Unknown or pre-epoch times map to `0`; far-future times saturate.
    pub fn modified_ticks(&self) -> u64 {
        self.modified
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0)
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    pub fn is_symlink(&self) -> bool {
        self.is_symlink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn entry_from_regular_file() {
        let tmp = TempDir::new().unwrap();
        let file_path = tmp.path().join("notes.txt");
        fs::write(&file_path, "hello").unwrap();

        let metadata = fs::symlink_metadata(&file_path).unwrap();
        let entry = FileEntry::new(file_path.clone(), &metadata);

        assert_eq!(entry.name(), "notes.txt");
        assert_eq!(entry.size(), 5);
        assert!(!entry.is_dir());
        assert!(!entry.is_hidden());
        assert_eq!(entry.path(), file_path);
        assert!(entry.modified_ticks() > 0);
    }

    #[test]
    fn entry_from_directory_has_zero_size() {
        let tmp = TempDir::new().unwrap();
        let dir_path = tmp.path().join("src");
        fs::create_dir(&dir_path).unwrap();
        fs::write(dir_path.join("lib.rs"), "fn main() {}").unwrap();

        let metadata = fs::symlink_metadata(&dir_path).unwrap();
        let entry = FileEntry::new(dir_path, &metadata);

        assert!(entry.is_dir());
        assert_eq!(entry.size(), 0);
    }

    #[test]
    fn dot_prefixed_names_are_hidden() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(".env");
        fs::write(&path, "KEY=1").unwrap();

        let metadata = fs::symlink_metadata(&path).unwrap();
        assert!(FileEntry::new(path, &metadata).is_hidden());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_to_directory_counts_as_folder() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("real");
        fs::create_dir(&target).unwrap();
        let link = tmp.path().join("alias");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let metadata = fs::symlink_metadata(&link).unwrap();
        let entry = FileEntry::new(link, &metadata);

        assert!(entry.is_symlink());
        assert!(entry.is_dir());
    }

    #[test]
    fn synthetic_folder_ignores_size() {
        let entry = FileEntry::folder("/data/photos");
        assert_eq!(entry.name(), "photos");
        assert!(entry.is_dir());
        assert_eq!(entry.size(), 0);
    }

    #[test]
    fn unknown_modified_time_is_zero_ticks() {
        let entry = FileEntry::file("/data/a.bin", 3);
        assert_eq!(entry.modified_ticks(), 0);
    }

    #[test]
    fn modified_ticks_are_nanoseconds() {
        let entry = FileEntry::file("/data/a.bin", 3)
            .with_modified(UNIX_EPOCH + Duration::from_secs(2));
        assert_eq!(entry.modified_ticks(), 2_000_000_000);
    }

    #[test]
    fn hidden_override() {
        let entry = FileEntry::file("/data/thumbs.db", 1).with_hidden(true);
        assert!(entry.is_hidden());
    }
}
