//! Testing utilities for Rewind workspace
//!
//! Shared test helpers, fixtures, and a dispatch spy.

#![allow(missing_docs)]

use parking_lot::Mutex;
use rewind_history::{Action, HistoryEntry, HistoryState, ScopeHistory, ScopeId};
use rewind_store::{StoreExtension, UndoHandler};
use serde_json::Value;
use std::sync::{Arc, Once};

static TRACING: Once = Once::new();

/// Install a test-friendly tracing subscriber once per process
///
/// Honors `RUST_LOG`; silent by default.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn marker(kind: &str) -> HistoryEntry {
    HistoryEntry::marker(kind)
}

pub fn undo_entry(kind: &str, undo: Value) -> HistoryEntry {
    HistoryEntry::new(kind, Some(undo), None)
}

pub fn redo_entry(kind: &str, redo: Value) -> HistoryEntry {
    HistoryEntry::new(kind, None, Some(redo))
}

pub fn global_history(undos: Vec<HistoryEntry>, redos: Vec<HistoryEntry>) -> HistoryState {
    HistoryState::new().with_scope(ScopeId::Global, ScopeHistory::from_parts(undos, redos))
}

pub fn with_scope(
    state: HistoryState,
    scope: impl Into<ScopeId>,
    undos: Vec<HistoryEntry>,
    redos: Vec<HistoryEntry>,
) -> HistoryState {
    state.with_scope(scope, ScopeHistory::from_parts(undos, redos))
}

/// Extension handling `TEST` by spreading the stored payload into
/// `UNDO_TEST` / `REDO_TEST`
pub fn test_extension() -> StoreExtension {
    StoreExtension::new("test").with_raw_handler(
        "TEST",
        UndoHandler::new()
            .with_undo(|undo| Ok(Action::new("UNDO_TEST").with_fields(undo.clone())))
            .with_redo(|redo| Ok(Action::new("REDO_TEST").with_fields(redo.clone()))),
    )
}

/// Records every action handed to it
#[derive(Debug, Clone, Default)]
pub struct DispatchSpy {
    calls: Arc<Mutex<Vec<Action>>>,
}

impl DispatchSpy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatch function that records into this spy
    pub fn recorder(&self) -> impl FnMut(Action) + Send + 'static {
        let calls = Arc::clone(&self.calls);
        move |action| calls.lock().push(action)
    }

    pub fn calls(&self) -> Vec<Action> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn was_called(&self) -> bool {
        self.call_count() > 0
    }

    pub fn was_called_with(&self, action: &Action) -> bool {
        self.calls.lock().iter().any(|a| a == action)
    }
}
