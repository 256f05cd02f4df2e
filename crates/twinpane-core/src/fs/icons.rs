//! Icon lookup for list rows and tree nodes.
//!
//! Icons are plain indices. The default [`ExtensionIconResolver`] indexes
//! into a static table of Nerd Font glyphs ([`glyph`]) and a small overlay
//! table ([`overlay_glyph`]); a GUI front end would plug in a resolver that
//! returns indices into its own image list instead.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::error::{CoreError, CoreResult};

/// Icon indices for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconSet {
    /// Icon shown normally.
    pub normal: u32,
    /// Icon shown while the entry is selected (open folder, etc.).
    pub selected: u32,
    /// Badge composited over the base icon, if any.
    pub overlay: Option<u32>,
}

impl IconSet {
    /// Placeholder icons used until the resolver answers.
    pub fn placeholder(is_folder: bool) -> Self {
        if is_folder {
            Self {
                normal: glyph::FOLDER,
                selected: glyph::FOLDER_OPEN,
                overlay: None,
            }
        } else {
            Self {
                normal: glyph::FILE,
                selected: glyph::FILE,
                overlay: None,
            }
        }
    }
}

/// Resolves the display icons of a path.
///
/// Calls may be slow (network shares, removable media). Callers that must
/// not block go through [`resolve_with_timeout`].
pub trait IconResolver: Send + Sync {
    fn resolve(&self, path: &Path, is_folder: bool) -> IconSet;
}

/// Glyph table indices.
pub mod glyph {
    pub const FOLDER: u32 = 0;
    pub const FOLDER_OPEN: u32 = 1;
    pub const FILE: u32 = 2;
    pub const PARENT: u32 = 3;
    pub const RUST: u32 = 4;
    pub const PYTHON: u32 = 5;
    pub const JAVASCRIPT: u32 = 6;
    pub const TYPESCRIPT: u32 = 7;
    pub const C_FAMILY: u32 = 8;
    pub const GO: u32 = 9;
    pub const JAVA: u32 = 10;
    pub const SHELL: u32 = 11;
    pub const CONFIG: u32 = 12;
    pub const JSON: u32 = 13;
    pub const MARKUP: u32 = 14;
    pub const MARKDOWN: u32 = 15;
    pub const TEXT: u32 = 16;
    pub const PDF: u32 = 17;
    pub const ARCHIVE: u32 = 18;
    pub const IMAGE: u32 = 19;
    pub const AUDIO: u32 = 20;
    pub const VIDEO: u32 = 21;
    pub const LOG: u32 = 22;
    pub const LOCK: u32 = 23;
    pub const GIT: u32 = 24;
    pub const DOCKER: u32 = 25;
}

/// Overlay table indices.
pub mod overlay {
    pub const LINK: u32 = 0;
}

const GLYPHS: &[&str] = &[
    "\u{f07b}", // folder
    "\u{f07c}", // folder open
    "\u{f15b}", // file
    "\u{f062}", // parent
    "\u{e7a8}", // rust
    "\u{e73c}", // python
    "\u{e74e}", // javascript
    "\u{e628}", // typescript
    "\u{e61e}", // c
    "\u{e724}", // go
    "\u{e738}", // java
    "\u{f489}", // shell
    "\u{e615}", // config
    "\u{e60b}", // json
    "\u{e736}", // markup
    "\u{e73e}", // markdown
    "\u{f15c}", // text
    "\u{f1c1}", // pdf
    "\u{f410}", // archive
    "\u{f1c5}", // image
    "\u{f001}", // audio
    "\u{f03d}", // video
    "\u{f18d}", // log
    "\u{f023}", // lock
    "\u{e702}", // git
    "\u{f308}", // docker
];

const OVERLAYS: &[&str] = &["\u{f0c1}"];

/// Returns the glyph for an icon index, falling back to the generic file glyph.
pub fn glyph(index: u32) -> &'static str {
    GLYPHS
        .get(index as usize)
        .copied()
        .unwrap_or(GLYPHS[glyph::FILE as usize])
}

/// Returns the glyph for an overlay index, or `""` for an unknown one.
pub fn overlay_glyph(index: u32) -> &'static str {
    OVERLAYS.get(index as usize).copied().unwrap_or("")
}

/// Default resolver: file name and extension lookup plus a link overlay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionIconResolver;

impl IconResolver for ExtensionIconResolver {
    fn resolve(&self, path: &Path, is_folder: bool) -> IconSet {
        let is_link = std::fs::symlink_metadata(path)
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(false);
        let overlay = is_link.then_some(overlay::LINK);

        if is_folder {
            return IconSet {
                overlay,
                ..IconSet::placeholder(true)
            };
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let index = icon_for_filename(&name).unwrap_or_else(|| {
            let ext = path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_default();
            icon_for_extension(&ext)
        });

        IconSet {
            normal: index,
            selected: index,
            overlay,
        }
    }
}

fn icon_for_filename(name: &str) -> Option<u32> {
    let index = match name {
        "makefile" | "gnumakefile" | "cmakelists.txt" => glyph::CONFIG,
        "dockerfile" => glyph::DOCKER,
        "cargo.toml" | "cargo.lock" => glyph::RUST,
        ".gitignore" | ".gitmodules" | ".gitattributes" => glyph::GIT,
        "readme" | "readme.md" | "readme.txt" => glyph::MARKDOWN,
        _ => return None,
    };
    Some(index)
}

fn icon_for_extension(ext: &str) -> u32 {
    match ext {
        "rs" => glyph::RUST,
        "py" | "pyw" | "pyi" => glyph::PYTHON,
        "js" | "mjs" | "cjs" | "jsx" => glyph::JAVASCRIPT,
        "ts" | "mts" | "cts" | "tsx" => glyph::TYPESCRIPT,
        "c" | "h" | "cpp" | "cc" | "cxx" | "hpp" | "hxx" => glyph::C_FAMILY,
        "go" => glyph::GO,
        "java" | "jar" | "kt" | "kts" => glyph::JAVA,
        "sh" | "bash" | "zsh" | "fish" | "bat" | "cmd" | "ps1" => glyph::SHELL,
        "toml" | "yaml" | "yml" | "ini" | "cfg" | "conf" => glyph::CONFIG,
        "json" | "jsonc" | "json5" => glyph::JSON,
        "html" | "htm" | "xml" | "xsl" | "css" | "scss" | "svg" => glyph::MARKUP,
        "md" | "markdown" | "mdx" => glyph::MARKDOWN,
        "txt" | "text" | "csv" => glyph::TEXT,
        "pdf" => glyph::PDF,
        "zip" | "tar" | "gz" | "bz2" | "xz" | "7z" | "rar" => glyph::ARCHIVE,
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "ico" | "tiff" | "tif" => glyph::IMAGE,
        "mp3" | "wav" | "flac" | "ogg" | "aac" | "m4a" => glyph::AUDIO,
        "mp4" | "avi" | "mkv" | "mov" | "wmv" | "webm" => glyph::VIDEO,
        "log" => glyph::LOG,
        "lock" => glyph::LOCK,
        _ => glyph::FILE,
    }
}

/// Runs `resolver` on a one-shot helper thread and waits at most `timeout`.
///
/// On expiry the helper is abandoned, not killed: it may still finish, but
/// its result goes into a channel whose receiver has already been dropped.
///
/// # Errors
///
/// - [`CoreError::ResolveTimeout`] when the resolver did not answer in time.
/// - [`CoreError::Io`] when the helper thread could not be spawned.
pub fn resolve_with_timeout(
    resolver: &Arc<dyn IconResolver>,
    path: &Path,
    is_folder: bool,
    timeout: Duration,
) -> CoreResult<IconSet> {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let resolver = Arc::clone(resolver);
    let owned: PathBuf = path.to_path_buf();

    std::thread::Builder::new()
        .name("icon-lookup".to_owned())
        .spawn(move || {
            let icons = resolver.resolve(&owned, is_folder);
            let _ = tx.send(icons);
        })?;

    rx.recv_timeout(timeout)
        .map_err(|_| CoreError::ResolveTimeout(path.to_path_buf()))
}
