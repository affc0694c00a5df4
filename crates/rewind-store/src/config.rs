//! Store configuration

use crate::error::ConfigError;
use rewind_history::HistoryConfig;
use serde::{Deserialize, Serialize};

/// Configuration for [`create_store`](crate::create_store)
///
/// ```toml
/// [history]
/// max_undo_entries = 100
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// History retention policy
    pub history: HistoryConfig,
}

impl StoreConfig {
    /// Create default configuration (unbounded history)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from TOML
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] on malformed TOML or mistyped fields.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// With history settings
    #[inline]
    #[must_use]
    pub fn with_history(mut self, history: HistoryConfig) -> Self {
        self.history = history;
        self
    }

    /// With a per-scope undo cap
    #[inline]
    #[must_use]
    pub fn with_max_undo_entries(mut self, max: usize) -> Self {
        self.history = self.history.with_max_undo_entries(max);
        self
    }
}
