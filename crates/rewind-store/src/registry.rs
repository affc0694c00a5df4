//! Extension registry
//!
//! Provides [`ExtensionRegistry`], the shared table of [`StoreExtension`]s.
//! Features register at any time; the store and its middleware query it
//! synchronously during dispatch.

use crate::error::RegistryError;
use crate::handler::{typed, Direction, HandlerFn, UndoHandler, UndoableAction};
use indexmap::IndexMap;
use parking_lot::RwLock;
use rewind_history::Action;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Reducer over one extension's state slice
///
/// Receives `Value::Null` before the slice has ever been set. Returning
/// `Value::Null` removes the slice.
pub type SliceReducer = Arc<dyn Fn(&Value, &Action) -> Value + Send + Sync>;

/// A feature's contribution to the store
#[derive(Clone)]
pub struct StoreExtension {
    key: String,
    reducer: Option<SliceReducer>,
    undo_actions: IndexMap<String, UndoHandler>,
}

impl StoreExtension {
    /// Create extension with no reducer and no handlers
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            reducer: None,
            undo_actions: IndexMap::new(),
        }
    }

    /// Set the slice reducer
    #[must_use]
    pub fn with_reducer<F>(mut self, reducer: F) -> Self
    where
        F: Fn(&Value, &Action) -> Value + Send + Sync + 'static,
    {
        self.reducer = Some(Arc::new(reducer));
        self
    }

    /// Register untyped handlers for an action type
    ///
    /// Replaces any handler already set for that type.
    #[must_use]
    pub fn with_raw_handler(mut self, action_type: impl Into<String>, handler: UndoHandler) -> Self {
        self.undo_actions.insert(action_type.into(), handler);
        self
    }

    /// Register typed undo and redo handlers for `A`
    #[must_use]
    pub fn with_handler<A, U, R>(self, undo: U, redo: R) -> Self
    where
        A: UndoableAction,
        U: Fn(A::Undo) -> Action + Send + Sync + 'static,
        R: Fn(A::Redo) -> Action + Send + Sync + 'static,
    {
        self.with_undo::<A, U>(undo).with_redo::<A, R>(redo)
    }

    /// Register a typed undo handler for `A`
    #[must_use]
    pub fn with_undo<A, F>(self, f: F) -> Self
    where
        A: UndoableAction,
        F: Fn(A::Undo) -> Action + Send + Sync + 'static,
    {
        self.with_direction(A::TYPE, Direction::Undo, typed::<A::Undo, F>(A::TYPE, f))
    }

    /// Register a typed redo handler for `A`
    #[must_use]
    pub fn with_redo<A, F>(self, f: F) -> Self
    where
        A: UndoableAction,
        F: Fn(A::Redo) -> Action + Send + Sync + 'static,
    {
        self.with_direction(A::TYPE, Direction::Redo, typed::<A::Redo, F>(A::TYPE, f))
    }

    fn with_direction(mut self, action_type: &str, direction: Direction, f: HandlerFn) -> Self {
        self.undo_actions
            .entry(action_type.to_string())
            .or_default()
            .set(direction, f);
        self
    }

    /// Extension key (also the state slice key)
    #[inline]
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Slice reducer, if any
    #[inline]
    #[must_use]
    pub fn reducer(&self) -> Option<&SliceReducer> {
        self.reducer.as_ref()
    }

    /// Handlers for an action type
    #[inline]
    #[must_use]
    pub fn handler(&self, action_type: &str) -> Option<&UndoHandler> {
        self.undo_actions.get(action_type)
    }

    /// Action types this extension can undo or redo
    pub fn action_types(&self) -> impl Iterator<Item = &str> {
        self.undo_actions.keys().map(String::as_str)
    }
}

impl fmt::Debug for StoreExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreExtension")
            .field("key", &self.key)
            .field("reducer", &self.reducer.is_some())
            .field("undo_actions", &self.undo_actions)
            .finish()
    }
}

/// Registry of store extensions, in registration order
#[derive(Debug, Default)]
pub struct ExtensionRegistry {
    extensions: RwLock<IndexMap<String, StoreExtension>>,
}

impl ExtensionRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry ready to be shared with a store
    #[inline]
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register an extension
    ///
    /// # Errors
    /// - [`RegistryError::EmptyKey`] if the key is empty
    /// - [`RegistryError::DuplicateKey`] if the key is taken
    pub fn register(&self, extension: StoreExtension) -> Result<(), RegistryError> {
        if extension.key.is_empty() {
            return Err(RegistryError::EmptyKey);
        }

        let mut extensions = self.extensions.write();
        if extensions.contains_key(&extension.key) {
            return Err(RegistryError::DuplicateKey(extension.key));
        }

        tracing::info!(
            "Registered store extension {} ({} undoable action types)",
            extension.key,
            extension.undo_actions.len()
        );
        extensions.insert(extension.key.clone(), extension);
        Ok(())
    }

    /// Remove an extension
    pub fn unregister(&self, key: &str) -> bool {
        self.extensions.write().shift_remove(key).is_some()
    }

    /// Check if an extension is registered
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.extensions.read().contains_key(key)
    }

    /// Registered keys, in registration order
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.extensions.read().keys().cloned().collect()
    }

    /// Get number of registered extensions
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.read().len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.read().is_empty()
    }

    /// Find the handler for an action type and direction
    ///
    /// Searches extensions in registration order and returns the first one
    /// that defines this direction for this type. The function is cloned
    /// out, so no lock is held while it runs.
    #[must_use]
    pub fn find_handler(&self, action_type: &str, direction: Direction) -> Option<HandlerFn> {
        self.extensions
            .read()
            .values()
            .find_map(|ext| ext.handler(action_type)?.get(direction).cloned())
    }

    /// Snapshot of every registered slice reducer
    #[must_use]
    pub fn reducers(&self) -> Vec<(String, SliceReducer)> {
        self.extensions
            .read()
            .values()
            .filter_map(|ext| Some((ext.key.clone(), ext.reducer.clone()?)))
            .collect()
    }
}
