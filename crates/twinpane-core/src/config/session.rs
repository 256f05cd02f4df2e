//! Per-view context handed to the list model.

use std::time::Duration;

use crate::config::settings::Config;
use crate::error::CoreResult;
use crate::nav::filter::FilterPattern;
use crate::nav::sort::{SortDirection, SortKey};

/// View state and limits for one [`VirtualList`](crate::nav::list::VirtualList).
///
/// Built once from [`Config`] and then owned by the list; there is no
/// process-wide state.
#[derive(Debug, Clone)]
pub struct Session {
    pub filter: FilterPattern,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub show_hidden: bool,
    pub history_limit: usize,
    pub resolve_timeout: Duration,
    pub interrupt_timeout: Duration,
    pub step_pause: Duration,
}

impl Session {
    /// # Errors
    ///
    /// Fails if the configured sort key or filter pattern is invalid.
    pub fn from_config(config: &Config) -> CoreResult<Self> {
        let sort_key = config
            .general
            .sort_key()
            .map_err(crate::error::CoreError::ConfigParse)?;
        Ok(Self {
            filter: FilterPattern::new(&config.general.filter)?,
            sort_key,
            sort_direction: config.general.sort_direction(),
            show_hidden: config.general.show_hidden,
            history_limit: config.history.max_entries,
            resolve_timeout: config.icons.resolve_timeout(),
            interrupt_timeout: config.icons.interrupt_timeout(),
            step_pause: config.icons.step_pause(),
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        let icons = crate::config::settings::IconConfig::default();
        Self {
            filter: FilterPattern::match_all(),
            sort_key: SortKey::Name,
            sort_direction: SortDirection::Ascending,
            show_hidden: false,
            history_limit: crate::config::settings::HistoryConfig::default().max_entries,
            resolve_timeout: icons.resolve_timeout(),
            interrupt_timeout: icons.interrupt_timeout(),
            step_pause: icons.step_pause(),
        }
    }
}
