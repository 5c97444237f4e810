//! Configuration management for the tasklist binary.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use tasklist_runtime::StoreConfig;

/// Default tracing filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "tasklist=info,tasklist_runtime=warn";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Tracing filter directives (`RUST_LOG`)
    pub log_filter: String,
    /// Title printed above the task counter (`TASKLIST_HEADER_TITLE`)
    pub header_title: String,
    /// Feedback actions allowed per gesture (`TASKLIST_MAX_FEEDBACK_ACTIONS`)
    pub max_feedback_actions: usize,
}

impl Config {
    /// Load configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, falling back to defaults for
    /// missing or unparseable values
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_filter: lookup("RUST_LOG")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.log_filter),
            header_title: lookup("TASKLIST_HEADER_TITLE").unwrap_or(defaults.header_title),
            max_feedback_actions: lookup("TASKLIST_MAX_FEEDBACK_ACTIONS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_feedback_actions),
        }
    }

    /// Store settings derived from this configuration
    #[must_use]
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::default().with_max_feedback_actions(self.max_feedback_actions)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            header_title: "to.do".to_string(),
            max_feedback_actions: StoreConfig::default().max_feedback_actions,
        }
    }
}
