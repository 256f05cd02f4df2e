//! Messages between the front end and the list model.
//!
//! The UI translates user input into [`Command`]s and hands them to
//! [`VirtualList::execute`](crate::nav::list::VirtualList::execute). The
//! background icon pipeline reports back with [`ListUpdate`]s, which the UI
//! drains between frames.

use std::path::PathBuf;

use crate::nav::sort::{SortDirection, SortKey};

/// An action the UI requests the list model to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show the directory at the given path.
    ViewPath(PathBuf),
    /// Replace the file filter pattern.
    Filter(String),
    /// Re-sort by the given column.
    SortBy(SortKey, SortDirection),
    /// Add the entry with this raw name to the selection.
    SelectByName(String),
    /// Drop the whole selection.
    ClearSelection,
    /// Flip visibility of hidden entries.
    ToggleHidden,
    /// Navigate backward in history.
    GoBack,
    /// Navigate forward in history.
    GoForward,
    /// Show the parent directory.
    GoUp,
    /// Activate the row at this index (enter a folder, or hand back a file).
    Open(usize),
    /// Re-read the current directory.
    Refresh,
}

/// What executing a [`Command`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// The rows were rebuilt or reordered.
    pub changed_view: bool,
    /// A file row was activated; the caller decides what opening means.
    pub opened_file: Option<PathBuf>,
}

/// A notification from the background icon pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListUpdate {
    /// The icons of row `index` of collection `generation` changed.
    RowResolved { generation: u64, index: usize },
    /// Every row of collection `generation` has been looked at.
    ScanFinished { generation: u64 },
}

impl ListUpdate {
    pub fn generation(&self) -> u64 {
        match self {
            ListUpdate::RowResolved { generation, .. } | ListUpdate::ScanFinished { generation } => {
                *generation
            }
        }
    }
}
