//! twinpane core library: UI-agnostic synchronization logic for a dual-pane
//! file browser.
//!
//! A folder [`Tree`] is kept in step with the disk by in-place
//! reconciliation, and a [`VirtualList`] shows one directory's rows with a
//! background [`IconPipeline`] filling in icons. Front ends drive both
//! through plain method calls or [`Command`]s.
//!
//! # Modules
//!
//! - [`fs`]: directory enumeration ([`DirectoryEnumerator`]) and icon lookup ([`IconResolver`]).
//! - [`tree`]: the arena-backed folder tree and its reconciler.
//! - [`nav`]: list rows, sorting, filtering, the list model and navigation history.
//! - [`pipeline`]: the background icon worker.
//! - [`config`]: TOML settings and the per-view [`Session`].
//! - [`event`]: commands and notifications exchanged with the UI.
//! - [`error`]: unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod config;
pub mod error;
pub mod event;
pub mod fs;
pub mod nav;
pub mod pipeline;
pub mod tree;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::session::Session;
pub use config::settings::Config;
pub use error::{CoreError, CoreResult};
pub use event::{Command, ListUpdate, Outcome};
pub use fs::entry::FileEntry;
pub use fs::icons::{ExtensionIconResolver, IconResolver, IconSet};
pub use fs::ops::{DirectoryEnumerator, FsEnumerator};
pub use nav::entry::{ListEntry, OverlayState};
pub use nav::filter::FilterPattern;
pub use nav::history::NavigationHistory;
pub use nav::list::VirtualList;
pub use nav::sort::{sort_entries, SortDirection, SortKey};
pub use pipeline::{IconPipeline, ScanState};
pub use tree::{NodeId, Tree, TreeNode};

/// Normalises a string to NFC (composed) form.
///
/// macOS stores filenames in NFD, so names read from paths are re-composed
/// before they are compared with enumerated names.
pub fn nfc_string(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    s.nfc().collect()
}
