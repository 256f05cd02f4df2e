//! Error types for `twinpane-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`. Most runtime failures
//! (vanished directories, slow icon lookups) are absorbed by the components
//! themselves; the variants that reach callers are either configuration
//! problems or contract violations such as a stale [`NodeId`].

use std::path::PathBuf;

use crate::tree::NodeId;

/// Unified error type for all core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A directory was expected but the path points to a file.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An icon lookup did not answer within the configured bound.
    #[error("icon lookup timed out: {0}")]
    ResolveTimeout(PathBuf),

    /// A tree node id refers to a node that has been deleted.
    #[error("stale tree node: {0}")]
    StaleNode(NodeId),

    /// Reconciliation was requested for a node whose children were never realized.
    #[error("tree node was never expanded: {0}")]
    NotRealized(NodeId),

    /// A filter pattern could not be compiled.
    #[error("invalid filter pattern: {0}")]
    InvalidPattern(String),

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Maps an I/O error on `path` to the most specific variant.
    pub fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => {
                CoreError::PermissionDenied(path.to_path_buf())
            }
            _ => CoreError::Io(err),
        }
    }
}

/// Convenience alias used throughout `twinpane-core`.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn not_found_displays_path() {
        let err = CoreError::NotFound(PathBuf::from("/missing/dir"));
        assert_eq!(err.to_string(), "path not found: /missing/dir");
    }

    #[test]
    fn resolve_timeout_displays_path() {
        let err = CoreError::ResolveTimeout(PathBuf::from("/mnt/share/a.lnk"));
        assert_eq!(err.to_string(), "icon lookup timed out: /mnt/share/a.lnk");
    }

    #[test]
    fn from_io_maps_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = CoreError::from_io(io, Path::new("/gone"));
        assert!(matches!(err, CoreError::NotFound(p) if p == Path::new("/gone")));
    }

    #[test]
    fn from_io_maps_permission_denied() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "no");
        let err = CoreError::from_io(io, Path::new("/root"));
        assert!(matches!(err, CoreError::PermissionDenied(_)));
    }

    #[test]
    fn from_io_keeps_other_kinds() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "weird");
        let err = CoreError::from_io(io, Path::new("/x"));
        assert!(matches!(err, CoreError::Io(_)));
        assert!(err.to_string().contains("weird"));
    }

    #[test]
    fn invalid_pattern_displays_message() {
        let err = CoreError::InvalidPattern("[".to_string());
        assert_eq!(err.to_string(), "invalid filter pattern: [");
    }
}
