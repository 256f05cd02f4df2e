//! Rows of the current-directory list.

use std::path::{Path, PathBuf};

use crate::fs::entry::FileEntry;
use crate::fs::icons::{glyph, IconSet};

/// Resolution state of a row's overlay icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    /// The background pipeline has not looked at this row yet.
    Unresolved,
    /// Looked up; `None` means "no overlay" (or the lookup timed out).
    Resolved(Option<u32>),
}

/// One row of the virtual list, as handed out to the display layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    path: PathBuf,
    is_parent: bool,
    name: String,
    extension: String,
    raw_name: String,
    size: u64,
    modified: u64,
    is_hidden: bool,
    is_folder: bool,
    is_symlink: bool,
    icons: IconSet,
    overlay: OverlayState,
}

impl ListEntry {
    /// Builds a row from an enumerated entry.
    ///
    /// Files are split into stem and extension at the last `.`; a leading
    /// dot does not start an extension. Folders keep their full name.
    pub fn from_file_entry(entry: &FileEntry) -> Self {
        let raw_name = entry.name().to_owned();
        let (name, extension) = if entry.is_dir() {
            (raw_name.clone(), String::new())
        } else {
            split_extension(&raw_name)
        };
        Self {
            path: entry.path().to_path_buf(),
            is_parent: false,
            name,
            extension,
            raw_name,
            size: entry.size(),
            modified: entry.modified_ticks(),
            is_hidden: entry.is_hidden(),
            is_folder: entry.is_dir(),
            is_symlink: entry.is_symlink(),
            icons: IconSet::placeholder(entry.is_dir()),
            overlay: OverlayState::Unresolved,
        }
    }

    /// The synthetic `..` row pointing at `parent`.
    ///
    /// Its icon is static, so it is born resolved.
    pub fn parent_pseudo(parent: &Path) -> Self {
        Self {
            path: parent.to_path_buf(),
            is_parent: true,
            name: "..".to_owned(),
            extension: String::new(),
            raw_name: "..".to_owned(),
            size: 0,
            modified: 0,
            is_hidden: false,
            is_folder: true,
            is_symlink: false,
            icons: IconSet {
                normal: glyph::PARENT,
                selected: glyph::PARENT,
                overlay: None,
            },
            overlay: OverlayState::Resolved(None),
        }
    }

    /// Full path; for the pseudo-parent this is the parent directory.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_parent_pseudo_entry(&self) -> bool {
        self.is_parent
    }

    /// Display name (stem for files).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extension without the dot; empty for folders and extensionless files.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Name with extension, as it exists on disk.
    pub fn raw_name(&self) -> &str {
        &self.raw_name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size
    }

    /// Modification time in nanoseconds since the UNIX epoch (`0` if unknown).
    pub fn modified(&self) -> u64 {
        self.modified
    }

    pub fn is_hidden(&self) -> bool {
        self.is_hidden
    }

    pub fn is_folder(&self) -> bool {
        self.is_folder
    }

    pub fn is_symlink(&self) -> bool {
        self.is_symlink
    }

    pub fn icons(&self) -> IconSet {
        self.icons
    }

    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.overlay, OverlayState::Resolved(_))
    }

    /// Stores a resolver answer.
    pub(crate) fn apply_icons(&mut self, icons: IconSet) {
        self.icons = icons;
        self.overlay = OverlayState::Resolved(icons.overlay);
    }

    /// Marks the row resolved without an answer; the placeholder icon stays.
    pub(crate) fn mark_unresolvable(&mut self) {
        self.overlay = OverlayState::Resolved(None);
    }
}

fn split_extension(raw: &str) -> (String, String) {
    match raw.rfind('.') {
        Some(dot) if dot > 0 => (raw[..dot].to_owned(), raw[dot + 1..].to_owned()),
        _ => (raw.to_owned(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_is_split_at_last_dot() {
        let row = ListEntry::from_file_entry(&FileEntry::file("/d/archive.tar.gz", 10));
        assert_eq!(row.name(), "archive.tar");
        assert_eq!(row.extension(), "gz");
        assert_eq!(row.raw_name(), "archive.tar.gz");
        assert_eq!(row.size_bytes(), 10);
    }

    #[test]
    fn leading_dot_is_not_an_extension() {
        let row = ListEntry::from_file_entry(&FileEntry::file("/d/.bashrc", 1));
        assert_eq!(row.name(), ".bashrc");
        assert_eq!(row.extension(), "");
        assert!(row.is_hidden());
    }

    #[test]
    fn folder_keeps_dotted_name() {
        let row = ListEntry::from_file_entry(&FileEntry::folder("/d/v1.2"));
        assert_eq!(row.name(), "v1.2");
        assert_eq!(row.extension(), "");
        assert!(row.is_folder());
    }

    #[test]
    fn new_rows_are_unresolved() {
        let row = ListEntry::from_file_entry(&FileEntry::file("/d/a.rs", 1));
        assert_eq!(row.overlay(), OverlayState::Unresolved);
        assert_eq!(row.icons(), IconSet::placeholder(false));
    }

    #[test]
    fn pseudo_parent_is_resolved_folder() {
        let row = ListEntry::parent_pseudo(Path::new("/home"));
        assert!(row.is_parent_pseudo_entry());
        assert!(row.is_folder());
        assert!(row.is_resolved());
        assert_eq!(row.raw_name(), "..");
        assert_eq!(row.path(), Path::new("/home"));
    }

    #[test]
    fn apply_icons_resolves_overlay() {
        let mut row = ListEntry::from_file_entry(&FileEntry::file("/d/a.rs", 1));
        row.apply_icons(IconSet {
            normal: glyph::RUST,
            selected: glyph::RUST,
            overlay: Some(0),
        });
        assert_eq!(row.overlay(), OverlayState::Resolved(Some(0)));
        assert_eq!(row.icons().normal, glyph::RUST);
    }

    #[test]
    fn unresolvable_keeps_placeholder() {
        let mut row = ListEntry::from_file_entry(&FileEntry::file("/d/a.rs", 1));
        row.mark_unresolvable();
        assert_eq!(row.overlay(), OverlayState::Resolved(None));
        assert_eq!(row.icons().normal, glyph::FILE);
    }
}
