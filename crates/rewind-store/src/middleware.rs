//! Dispatch middleware
//!
//! Provides the [`Middleware`] trait and [`UndoMiddleware`], which turns an
//! abstract `UNDO`/`REDO` intent into the concrete compensating action
//! registered for the history entry on top of the targeted scope.

use crate::handler::Direction;
use crate::registry::ExtensionRegistry;
use crate::store::Store;
use rewind_history::{Action, HistorySource, Intent};
use serde_json::Value;
use std::sync::Arc;

/// One stage of the dispatch pipeline
pub trait Middleware<S>: Send + Sync {
    /// Handle an action
    ///
    /// Call `next.run(action)` to pass it on; the returned value becomes the
    /// result of [`Store::dispatch`].
    fn handle(&self, store: &Store<S>, action: Action, next: Next<'_, S>) -> Action;
}

/// Remaining stages after the current middleware
pub struct Next<'a, S> {
    store: &'a Store<S>,
    index: usize,
}

impl<'a, S: Clone> Next<'a, S> {
    pub(crate) fn new(store: &'a Store<S>, index: usize) -> Self {
        Self { store, index }
    }

    /// Forward the action to the next stage
    pub fn run(self, action: Action) -> Action {
        self.store.run_stage(self.index, action)
    }
}

/// Translates `UNDO`/`REDO` into registered compensating actions
///
/// # Contract
/// - the original action is always forwarded and returned unchanged
/// - at most one extra action is dispatched per intent
/// - a missing handler or a failing handler dispatches nothing; the
///   forwarded intent still moves the history entry in the reducer
#[derive(Debug, Clone)]
pub struct UndoMiddleware {
    registry: Arc<ExtensionRegistry>,
}

impl UndoMiddleware {
    /// Create middleware backed by a registry
    #[inline]
    #[must_use]
    pub fn new(registry: Arc<ExtensionRegistry>) -> Self {
        Self { registry }
    }

    /// Registry consulted for handlers
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<ExtensionRegistry> {
        &self.registry
    }

    /// Compensating action for an intent, if one applies
    ///
    /// Returns `None` for non-intents, unusable scope ids, empty stacks,
    /// unknown scopes, missing handlers and failing handlers.
    #[must_use]
    pub fn compensation<H>(&self, state: &H, action: &Action) -> Option<Action>
    where
        H: HistorySource + ?Sized,
    {
        let direction = match action.intent() {
            Intent::Undo => Direction::Undo,
            Intent::Redo => Direction::Redo,
            Intent::Record | Intent::Passthrough => return None,
        };

        let Some(scope) = action.undo_scope() else {
            tracing::debug!("Ignoring {}: scope id is not an integer or string", action.kind());
            return None;
        };
        let history = state.history();
        let entry = match direction {
            Direction::Undo => history.peek_undo(&scope),
            Direction::Redo => history.peek_redo(&scope),
        }?;

        let Some(handler) = self.registry.find_handler(entry.kind(), direction) else {
            tracing::debug!(
                "No {:?} handler registered for {} in scope {}",
                direction,
                entry.kind(),
                scope
            );
            return None;
        };

        let payload = match direction {
            Direction::Undo => entry.undo(),
            Direction::Redo => entry.redo(),
        }
        .cloned()
        .unwrap_or(Value::Null);

        match handler(&payload) {
            Ok(compensating) => Some(compensating),
            Err(e) => {
                tracing::warn!(
                    "{:?} handler for {} in scope {} failed: {}",
                    direction,
                    entry.kind(),
                    scope,
                    e
                );
                None
            }
        }
    }

    /// Dispatch the compensating action for an intent, if one applies
    ///
    /// Returns whether anything was dispatched.
    pub fn process<H, D>(&self, state: &H, action: &Action, mut dispatch: D) -> bool
    where
        H: HistorySource + ?Sized,
        D: FnMut(Action),
    {
        match self.compensation(state, action) {
            Some(compensating) => {
                tracing::debug!("Dispatching {} for {}", compensating.kind(), action.kind());
                dispatch(compensating);
                true
            }
            None => false,
        }
    }
}

impl<S> Middleware<S> for UndoMiddleware
where
    S: HistorySource + Clone + Send + Sync,
{
    fn handle(&self, store: &Store<S>, action: Action, next: Next<'_, S>) -> Action {
        if matches!(action.intent(), Intent::Undo | Intent::Redo) {
            let state = store.state();
            self.process(&state, &action, |compensating| {
                store.dispatch(compensating);
            });
        }
        next.run(action)
    }
}
