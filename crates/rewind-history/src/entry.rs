//! History entries and per-scope stacks

use im::Vector;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A recorded undoable action
///
/// Holds the action's type tag and its two opaque compensating payloads.
/// Only a handler registered for the same type knows their shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "type")]
    kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    undo: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    redo: Option<Value>,
}

impl HistoryEntry {
    /// Create entry
    #[inline]
    #[must_use]
    pub fn new(kind: impl Into<String>, undo: Option<Value>, redo: Option<Value>) -> Self {
        Self {
            kind: kind.into(),
            undo,
            redo,
        }
    }

    /// Entry with a type tag and no payloads
    #[inline]
    #[must_use]
    pub fn marker(kind: impl Into<String>) -> Self {
        Self::new(kind, None, None)
    }

    /// Action type tag
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Undo payload
    #[inline]
    #[must_use]
    pub fn undo(&self) -> Option<&Value> {
        self.undo.as_ref()
    }

    /// Redo payload
    #[inline]
    #[must_use]
    pub fn redo(&self) -> Option<&Value> {
        self.redo.as_ref()
    }
}

/// Undo and redo stacks of one scope, most recent entry last
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScopeHistory {
    undos: Vector<HistoryEntry>,
    redos: Vector<HistoryEntry>,
}

impl ScopeHistory {
    /// Empty stacks
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from explicit stacks (bottom first)
    #[must_use]
    pub fn from_parts(
        undos: impl IntoIterator<Item = HistoryEntry>,
        redos: impl IntoIterator<Item = HistoryEntry>,
    ) -> Self {
        Self {
            undos: undos.into_iter().collect(),
            redos: redos.into_iter().collect(),
        }
    }

    /// Undo stack
    #[inline]
    #[must_use]
    pub fn undos(&self) -> &Vector<HistoryEntry> {
        &self.undos
    }

    /// Redo stack
    #[inline]
    #[must_use]
    pub fn redos(&self) -> &Vector<HistoryEntry> {
        &self.redos
    }

    /// Entry the next undo would revert
    #[inline]
    #[must_use]
    pub fn peek_undo(&self) -> Option<&HistoryEntry> {
        self.undos.last()
    }

    /// Entry the next redo would reapply
    #[inline]
    #[must_use]
    pub fn peek_redo(&self) -> Option<&HistoryEntry> {
        self.redos.last()
    }

    /// Check if both stacks are empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undos.is_empty() && self.redos.is_empty()
    }

    /// Move the top undo entry onto the redo stack
    pub(crate) fn step_back(&self) -> Option<Self> {
        let mut next = self.clone();
        let entry = next.undos.pop_back()?;
        next.redos.push_back(entry);
        Some(next)
    }

    /// Move the top redo entry onto the undo stack
    pub(crate) fn step_forward(&self) -> Option<Self> {
        let mut next = self.clone();
        let entry = next.redos.pop_back()?;
        next.undos.push_back(entry);
        Some(next)
    }

    /// Push a new entry, discarding the redo branch
    ///
    /// With a cap, the oldest undo entries are dropped until it fits.
    pub(crate) fn record(&self, entry: HistoryEntry, cap: Option<usize>) -> Self {
        let mut undos = self.undos.clone();
        undos.push_back(entry);
        if let Some(max) = cap {
            while undos.len() > max {
                undos.pop_front();
            }
        }
        Self {
            undos,
            redos: Vector::new(),
        }
    }
}
