//! History state and selectors
//!
//! [`HistoryState`] maps every scope to its own `Arc<ScopeHistory>`. Updates
//! build a new map that shares every untouched scope with the old one, so
//! `Arc::ptr_eq` holds for scopes an action did not target.

use crate::entry::{HistoryEntry, ScopeHistory};
use crate::scope::ScopeId;
use im::OrdMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Anything that exposes the undo/redo history
///
/// Implemented by root store states so history-aware middleware can read
/// them without knowing the rest of the state tree.
pub trait HistorySource {
    /// Current history
    fn history(&self) -> &HistoryState;
}

/// Undo/redo stacks for every scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<ScopeRecord>", into = "Vec<ScopeRecord>")]
pub struct HistoryState {
    scopes: OrdMap<ScopeId, Arc<ScopeHistory>>,
}

impl Default for HistoryState {
    fn default() -> Self {
        Self {
            scopes: OrdMap::unit(ScopeId::Global, Arc::new(ScopeHistory::new())),
        }
    }
}

impl HistoryState {
    /// State with an empty global scope
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a scope's stacks
    #[must_use]
    pub fn with_scope(self, scope: impl Into<ScopeId>, history: ScopeHistory) -> Self {
        self.replace(scope.into(), history)
    }

    /// Stacks of a scope
    #[inline]
    #[must_use]
    pub fn scope(&self, scope: &ScopeId) -> Option<&Arc<ScopeHistory>> {
        self.scopes.get(scope)
    }

    /// Stacks of the global scope
    #[inline]
    #[must_use]
    pub fn global(&self) -> Option<&Arc<ScopeHistory>> {
        self.scope(&ScopeId::Global)
    }

    /// Check if a scope has been created
    #[inline]
    #[must_use]
    pub fn contains_scope(&self, scope: &ScopeId) -> bool {
        self.scopes.contains_key(scope)
    }

    /// All known scopes, in order
    pub fn scopes(&self) -> impl Iterator<Item = &ScopeId> {
        self.scopes.keys()
    }

    /// Number of known scopes
    #[inline]
    #[must_use]
    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }

    /// Check if an undo in this scope would move an entry
    #[must_use]
    pub fn can_undo(&self, scope: &ScopeId) -> bool {
        self.peek_undo(scope).is_some()
    }

    /// Check if a redo in this scope would move an entry
    #[must_use]
    pub fn can_redo(&self, scope: &ScopeId) -> bool {
        self.peek_redo(scope).is_some()
    }

    /// Top of a scope's undo stack
    #[must_use]
    pub fn peek_undo(&self, scope: &ScopeId) -> Option<&HistoryEntry> {
        self.scope(scope).and_then(|h| h.peek_undo())
    }

    /// Top of a scope's redo stack
    #[must_use]
    pub fn peek_redo(&self, scope: &ScopeId) -> Option<&HistoryEntry> {
        self.scope(scope).and_then(|h| h.peek_redo())
    }

    /// Undo stack depth (0 for unknown scopes)
    #[must_use]
    pub fn undo_depth(&self, scope: &ScopeId) -> usize {
        self.scope(scope).map_or(0, |h| h.undos().len())
    }

    /// Redo stack depth (0 for unknown scopes)
    #[must_use]
    pub fn redo_depth(&self, scope: &ScopeId) -> usize {
        self.scope(scope).map_or(0, |h| h.redos().len())
    }

    /// Empty both stacks of a scope
    ///
    /// Unknown scopes are left absent.
    #[must_use]
    pub fn clear_scope(&self, scope: &ScopeId) -> Self {
        if self.contains_scope(scope) {
            self.replace(scope.clone(), ScopeHistory::new())
        } else {
            self.clone()
        }
    }

    pub(crate) fn replace(&self, scope: ScopeId, history: ScopeHistory) -> Self {
        Self {
            scopes: self.scopes.update(scope, Arc::new(history)),
        }
    }

    pub(crate) fn ensure_global(self) -> Self {
        if self.contains_scope(&ScopeId::Global) {
            self
        } else {
            self.replace(ScopeId::Global, ScopeHistory::new())
        }
    }
}

impl HistorySource for HistoryState {
    fn history(&self) -> &HistoryState {
        self
    }
}

/// Serialized form of one scope
///
/// A list of records keeps numeric and named scope ids distinct, which a
/// JSON object (string keys only) cannot.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScopeRecord {
    scope: ScopeId,
    #[serde(flatten)]
    history: ScopeHistory,
}

impl From<Vec<ScopeRecord>> for HistoryState {
    fn from(records: Vec<ScopeRecord>) -> Self {
        let scopes = records
            .into_iter()
            .map(|r| (r.scope, Arc::new(r.history)))
            .collect();
        Self { scopes }.ensure_global()
    }
}

impl From<HistoryState> for Vec<ScopeRecord> {
    fn from(state: HistoryState) -> Self {
        state
            .scopes
            .into_iter()
            .map(|(scope, history)| ScopeRecord {
                scope,
                history: (*history).clone(),
            })
            .collect()
    }
}
