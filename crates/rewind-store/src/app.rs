//! Application state tree
//!
//! [`AppState`] holds the undo/redo history next to one JSON slice per
//! registered extension. [`create_store`] wires it to the undo middleware.

use crate::config::StoreConfig;
use crate::middleware::UndoMiddleware;
use crate::registry::ExtensionRegistry;
use crate::store::Store;
use im::OrdMap;
use rewind_history::{reduce_with, Action, HistoryConfig, HistorySource, HistoryState};
use serde_json::Value;
use std::sync::Arc;

/// Root state: history plus extension slices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    undo_action_history: HistoryState,
    slices: OrdMap<String, Value>,
}

impl AppState {
    /// Empty state
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With explicit history
    #[inline]
    #[must_use]
    pub fn with_history(mut self, history: HistoryState) -> Self {
        self.undo_action_history = history;
        self
    }

    /// With an extension slice preset
    #[must_use]
    pub fn with_slice(mut self, key: impl Into<String>, value: Value) -> Self {
        self.slices.insert(key.into(), value);
        self
    }

    /// Extension slice
    #[inline]
    #[must_use]
    pub fn slice(&self, key: &str) -> Option<&Value> {
        self.slices.get(key)
    }

    /// Apply one action: history first, then every registered slice reducer
    #[must_use]
    pub fn reduce(
        &self,
        registry: &ExtensionRegistry,
        config: &HistoryConfig,
        action: &Action,
    ) -> Self {
        let undo_action_history = reduce_with(config, &self.undo_action_history, action);

        let mut slices = self.slices.clone();
        for (key, reducer) in registry.reducers() {
            let previous = slices.get(&key).cloned().unwrap_or(Value::Null);
            let next = reducer(&previous, action);
            if next.is_null() {
                slices.remove(&key);
            } else {
                slices.insert(key, next);
            }
        }

        Self {
            undo_action_history,
            slices,
        }
    }
}

impl HistorySource for AppState {
    fn history(&self) -> &HistoryState {
        &self.undo_action_history
    }
}

/// Build a store with the undo middleware and the registry's slice reducers
#[must_use]
pub fn create_store(registry: Arc<ExtensionRegistry>, config: &StoreConfig) -> Store<AppState> {
    let history_config = config.history;
    let reducer_registry = Arc::clone(&registry);

    Store::builder(AppState::new(), move |state: &AppState, action: &Action| {
        state.reduce(&reducer_registry, &history_config, action)
    })
    .with_middleware(UndoMiddleware::new(registry))
    .build()
}
