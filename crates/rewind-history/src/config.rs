//! History configuration

use serde::{Deserialize, Serialize};

/// Caller policy for history retention
///
/// The reducer contract itself is unbounded; a cap only applies through
/// [`reduce_with`](crate::reduce_with).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum undo entries kept per scope (`None` = unbounded)
    pub max_undo_entries: Option<usize>,
}

impl HistoryConfig {
    /// Unbounded history
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With a per-scope undo cap
    #[inline]
    #[must_use]
    pub fn with_max_undo_entries(mut self, max: usize) -> Self {
        self.max_undo_entries = Some(max);
        self
    }
}
