//! File system collaborators.
//!
//! [`entry::FileEntry`] is the raw listing record, [`ops::DirectoryEnumerator`]
//! produces listings, and [`icons::IconResolver`] maps paths to icon indices.

pub mod entry;
pub mod icons;
pub mod ops;

pub use entry::FileEntry;
pub use icons::{resolve_with_timeout, ExtensionIconResolver, IconResolver, IconSet};
pub use ops::{enumerate_or_empty, read_directory, DirectoryEnumerator, FsEnumerator};
