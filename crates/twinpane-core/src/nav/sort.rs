//! Column sorting for the virtual list.
//!
//! The ordering contract:
//!
//! - the `..` row, when present, stays at index 0;
//! - folders precede files whatever the key, and are always ordered by name
//!   (the direction still applies);
//! - files are ordered by the chosen key and direction;
//! - for every key except [`SortKey::Name`], runs of files that compare equal
//!   are re-ordered by name ascending, regardless of the direction.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::nav::entry::ListEntry;

/// The column entries are compared by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    /// Case-insensitive name.
    Name,
    /// Case-insensitive extension.
    Extension,
    /// Size in bytes.
    Size,
    /// Last-modified time.
    Date,
}

/// Sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    /// Smallest / earliest / A–Z first.
    Ascending,
    /// Largest / latest / Z–A first.
    Descending,
}

impl SortDirection {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortKey::Name),
            "ext" | "extension" | "type" => Ok(SortKey::Extension),
            "size" => Ok(SortKey::Size),
            "date" | "modified" | "time" => Ok(SortKey::Date),
            other => Err(format!("unknown sort key: {other}")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortKey::Name => "name",
            SortKey::Extension => "ext",
            SortKey::Size => "size",
            SortKey::Date => "date",
        };
        f.write_str(s)
    }
}

/// Sorts `entries` in place.
pub fn sort_entries(entries: &mut [ListEntry], key: SortKey, direction: SortDirection) {
    if let Some(pos) = entries.iter().position(ListEntry::is_parent_pseudo_entry) {
        entries[..=pos].rotate_right(1);
    }
    let start = usize::from(entries.first().is_some_and(ListEntry::is_parent_pseudo_entry));
    let body = &mut entries[start..];

    let folder_count = partition_folders(body);
    let (folders, files) = body.split_at_mut(folder_count);

    folders.sort_unstable_by(|a, b| direction.apply(compare_names(a, b)));
    files.sort_unstable_by(|a, b| direction.apply(compare_by_key(a, b, key)));

    if key != SortKey::Name {
        break_ties(files, key);
    }
}

/// Moves every folder in front of every file; returns the folder count.
fn partition_folders(entries: &mut [ListEntry]) -> usize {
    let mut boundary = 0;
    for i in 0..entries.len() {
        if entries[i].is_folder() {
            entries.swap(boundary, i);
            boundary += 1;
        }
    }
    boundary
}

/// Re-sorts each run of key-equal entries by name ascending.
fn break_ties(files: &mut [ListEntry], key: SortKey) {
    let mut run_start = 0;
    while run_start < files.len() {
        let mut run_end = run_start + 1;
        while run_end < files.len()
            && compare_by_key(&files[run_start], &files[run_end], key) == Ordering::Equal
        {
            run_end += 1;
        }
        if run_end - run_start > 1 {
            files[run_start..run_end].sort_unstable_by(compare_names);
        }
        run_start = run_end;
    }
}

fn compare_by_key(a: &ListEntry, b: &ListEntry, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => compare_names(a, b),
        SortKey::Extension => cmp_ignore_case(a.extension(), b.extension()),
        SortKey::Size => a.size_bytes().cmp(&b.size_bytes()),
        SortKey::Date => a.modified().cmp(&b.modified()),
    }
}

/// Name order: stem, then extension, both case-insensitive, then the raw
/// name so that names differing only in case still order deterministically.
pub(crate) fn compare_names(a: &ListEntry, b: &ListEntry) -> Ordering {
    cmp_ignore_case(a.name(), b.name())
        .then_with(|| cmp_ignore_case(a.extension(), b.extension()))
        .then_with(|| a.raw_name().cmp(b.raw_name()))
}

/// Case-insensitive string comparison without allocating.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
