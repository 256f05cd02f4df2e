//! Application configuration loaded from a TOML file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::nav::sort::{SortDirection, SortKey};

/// Top-level configuration.
///
/// Every field has a default so twinpane runs without a config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub icons: IconConfig,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed or names an
    ///   unknown sort key.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::from_io(e, path))?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> CoreResult<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| CoreError::ConfigParse(e.to_string()))?;
        config
            .general
            .sort_key()
            .map_err(CoreError::ConfigParse)?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> CoreResult<Self> {
        match Self::load(path) {
            Err(CoreError::NotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// `$XDG_CONFIG_HOME/twinpane/config.toml`, else `~/.config/twinpane/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("twinpane").join("config.toml"))
    }
}

/// List view preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default = "default_sort")]
    pub default_sort: String,
    #[serde(default = "default_true")]
    pub sort_ascending: bool,
    #[serde(default)]
    pub filter: String,
}

impl GeneralConfig {
    pub fn sort_key(&self) -> Result<SortKey, String> {
        self.default_sort.parse()
    }

    pub fn sort_direction(&self) -> SortDirection {
        SortDirection::from_ascending(self.sort_ascending)
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            show_hidden: false,
            default_sort: default_sort(),
            sort_ascending: true,
            filter: String::new(),
        }
    }
}

/// Navigation history limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_history_len")]
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_history_len(),
        }
    }
}

/// Background icon pipeline timings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IconConfig {
    #[serde(default = "default_resolve_timeout")]
    pub resolve_timeout_ms: u64,
    #[serde(default = "default_interrupt_timeout")]
    pub interrupt_timeout_ms: u64,
    #[serde(default)]
    pub step_pause_ms: u64,
}

impl IconConfig {
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_millis(self.resolve_timeout_ms)
    }

    pub fn interrupt_timeout(&self) -> Duration {
        Duration::from_millis(self.interrupt_timeout_ms)
    }

    pub fn step_pause(&self) -> Duration {
        Duration::from_millis(self.step_pause_ms)
    }
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            resolve_timeout_ms: default_resolve_timeout(),
            interrupt_timeout_ms: default_interrupt_timeout(),
            step_pause_ms: 0,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sort() -> String {
    "name".to_string()
}

fn default_history_len() -> usize {
    50
}

fn default_resolve_timeout() -> u64 {
    1000
}

fn default_interrupt_timeout() -> u64 {
    250
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert!(!config.general.show_hidden);
        assert_eq!(config.general.sort_key().unwrap(), SortKey::Name);
        assert_eq!(config.general.sort_direction(), SortDirection::Ascending);
        assert!(config.general.filter.is_empty());
        assert_eq!(config.history.max_entries, 50);
        assert_eq!(config.icons.resolve_timeout(), Duration::from_secs(1));
        assert_eq!(config.icons.interrupt_timeout(), Duration::from_millis(250));
        assert_eq!(config.icons.step_pause(), Duration::ZERO);
    }

    #[test]
    fn load_full_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[general]
show_hidden = true
default_sort = "size"
sort_ascending = false
filter = "*.rs"

[history]
max_entries = 7

[icons]
resolve_timeout_ms = 40
interrupt_timeout_ms = 20
step_pause_ms = 5
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert!(config.general.show_hidden);
        assert_eq!(config.general.sort_key().unwrap(), SortKey::Size);
        assert_eq!(config.general.sort_direction(), SortDirection::Descending);
        assert_eq!(config.general.filter, "*.rs");
        assert_eq!(config.history.max_entries, 7);
        assert_eq!(config.icons.resolve_timeout(), Duration::from_millis(40));
        assert_eq!(config.icons.interrupt_timeout(), Duration::from_millis(20));
        assert_eq!(config.icons.step_pause(), Duration::from_millis(5));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config = Config::parse("[history]\nmax_entries = 3\n").unwrap();
        assert_eq!(config.history.max_entries, 3);
        assert_eq!(config.general.default_sort, "name");
        assert_eq!(config.icons.resolve_timeout_ms, 1000);
    }

    #[test]
    fn unknown_sort_key_is_rejected() {
        let result = Config::parse("[general]\ndefault_sort = \"colour\"\n");
        assert!(matches!(result, Err(CoreError::ConfigParse(_))));
    }

    #[test]
    fn invalid_toml_returns_config_parse() {
        let result = Config::parse("this is not valid [[[toml");
        assert!(matches!(result, Err(CoreError::ConfigParse(_))));
    }

    #[test]
    fn missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load(&tmp.path().join("nope.toml"));
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[test]
    fn load_or_default_tolerates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load_or_default(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(config.history.max_entries, 50);
    }
}
