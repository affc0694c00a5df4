//! History reducer
//!
//! Pure `(state, action) -> state` transition over [`HistoryState`]:
//!
//! - `UNDO`: move the scope's top undo entry onto its redo stack
//! - `REDO`: move the scope's top redo entry onto its undo stack
//! - undoable action: push an entry onto the scope's undo stack and drop its
//!   redo branch
//! - anything else: unchanged
//!
//! Malformed or unknown actions never fail; they fall through unchanged. That
//! includes history actions whose scope id is neither an integer nor a string.

use crate::action::{Action, Intent};
use crate::config::HistoryConfig;
use crate::entry::ScopeHistory;
use crate::scope::ScopeId;
use crate::state::HistoryState;

/// Apply one action to the history with no retention cap
#[must_use]
pub fn reduce(state: &HistoryState, action: &Action) -> HistoryState {
    reduce_with(&HistoryConfig::default(), state, action)
}

/// Apply one action to the history under a retention policy
#[must_use]
pub fn reduce_with(config: &HistoryConfig, state: &HistoryState, action: &Action) -> HistoryState {
    let state = state.clone().ensure_global();

    let intent = action.intent();
    if intent == Intent::Passthrough {
        return state;
    }
    let Some(scope) = action.undo_scope() else {
        tracing::debug!("Ignoring {}: scope id is not an integer or string", action.kind());
        return state;
    };

    match intent {
        Intent::Undo => step(state, &scope, Direction::Back),
        Intent::Redo => step(state, &scope, Direction::Forward),
        Intent::Record => record(config, state, scope, action),
        Intent::Passthrough => state,
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Back,
    Forward,
}

fn step(state: HistoryState, scope: &ScopeId, direction: Direction) -> HistoryState {
    let Some(history) = state.scope(scope) else {
        tracing::debug!("No history for scope {}, nothing to step", scope);
        return state;
    };

    let next = match direction {
        Direction::Back => history.step_back(),
        Direction::Forward => history.step_forward(),
    };

    match next {
        Some(next) => state.replace(scope.clone(), next),
        None => {
            tracing::debug!("History stack for scope {} is empty", scope);
            state
        }
    }
}

fn record(
    config: &HistoryConfig,
    state: HistoryState,
    scope: ScopeId,
    action: &Action,
) -> HistoryState {
    let Some(entry) = action.history_entry() else {
        return state;
    };

    tracing::trace!("Recording {} in scope {}", entry.kind(), scope);

    let next = match state.scope(&scope) {
        Some(history) => history.record(entry, config.max_undo_entries),
        None => ScopeHistory::new().record(entry, config.max_undo_entries),
    };
    state.replace(scope, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::HistoryEntry;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;

    fn marker(kind: &str) -> HistoryEntry {
        HistoryEntry::marker(kind)
    }

    fn entry(undo: &str, redo: &str) -> HistoryEntry {
        HistoryEntry::new("TEST", Some(json!(undo)), Some(json!(redo)))
    }

    fn global(undos: Vec<HistoryEntry>, redos: Vec<HistoryEntry>) -> HistoryState {
        HistoryState::new().with_scope(ScopeId::Global, ScopeHistory::from_parts(undos, redos))
    }

    fn scoped_undo() -> Action {
        Action::undo_intent().in_scope(1)
    }

    fn scoped_redo() -> Action {
        Action::redo_intent().in_scope(1)
    }

    #[test]
    fn initializes_state() {
        let state = reduce(&HistoryState::new(), &Action::new("ANYTHING"));
        assert_eq!(state, HistoryState::new());
    }

    #[test]
    fn global_undo_moves_entry() {
        let state = global(vec![marker("TEST")], vec![]);
        assert_eq!(
            reduce(&state, &Action::undo_intent()),
            global(vec![], vec![marker("TEST")])
        );
    }

    #[test]
    fn scoped_undo_moves_entry() {
        let state = HistoryState::new()
            .with_scope(1, ScopeHistory::from_parts([marker("TEST")], []));
        let expected = HistoryState::new()
            .with_scope(1, ScopeHistory::from_parts([], [marker("TEST")]));
        assert_eq!(reduce(&state, &scoped_undo()), expected);
    }

    #[test]
    fn global_undo_with_nothing_to_undo() {
        let state = global(vec![], vec![]);
        assert_eq!(reduce(&state, &Action::undo_intent()), state);
    }

    #[test]
    fn scoped_undo_before_scope_exists() {
        let state = global(vec![marker("TEST")], vec![]);
        let next = reduce(&state, &scoped_undo());
        assert_eq!(next, state);
        assert!(!next.contains_scope(&ScopeId::from(1)));
    }

    #[test]
    fn scoped_undo_with_nothing_in_scope() {
        let state = global(vec![marker("TEST")], vec![]).with_scope(1, ScopeHistory::new());
        assert_eq!(reduce(&state, &scoped_undo()), state);
    }

    #[test]
    fn global_redo_moves_last_entry() {
        let state = global(vec![], vec![marker("TEST_1"), marker("TEST_2")]);
        assert_eq!(
            reduce(&state, &Action::redo_intent()),
            global(vec![marker("TEST_2")], vec![marker("TEST_1")])
        );
    }

    #[test]
    fn scoped_redo_moves_entry() {
        let state = HistoryState::new()
            .with_scope(1, ScopeHistory::from_parts([], [marker("TEST")]));
        let expected = HistoryState::new()
            .with_scope(1, ScopeHistory::from_parts([marker("TEST")], []));
        assert_eq!(reduce(&state, &scoped_redo()), expected);
    }

    #[test]
    fn global_redo_with_nothing_to_redo() {
        let state = global(vec![], vec![]);
        assert_eq!(reduce(&state, &Action::redo_intent()), state);
    }

    #[test]
    fn scoped_redo_before_scope_exists() {
        let state = global(vec![], vec![marker("TEST")]);
        assert_eq!(reduce(&state, &scoped_redo()), state);
    }

    #[test]
    fn scoped_redo_with_nothing_in_scope() {
        let state = global(vec![], vec![marker("TEST")]).with_scope(1, ScopeHistory::new());
        assert_eq!(reduce(&state, &scoped_redo()), state);
    }

    #[test]
    fn records_global_undoable_action() {
        let action = Action::undoable("TEST", json!("UNDO_PAYLOAD"), json!("REDO_PAYLOAD"));
        assert_eq!(
            reduce(&global(vec![], vec![]), &action),
            global(vec![entry("UNDO_PAYLOAD", "REDO_PAYLOAD")], vec![])
        );
    }

    #[test]
    fn records_scoped_undoable_action_lazily_creating_scope() {
        let action =
            Action::undoable("TEST", json!("UNDO_PAYLOAD"), json!("REDO_PAYLOAD")).in_scope(1);
        let expected = HistoryState::new().with_scope(
            1,
            ScopeHistory::from_parts([entry("UNDO_PAYLOAD", "REDO_PAYLOAD")], []),
        );
        assert_eq!(reduce(&HistoryState::new(), &action), expected);
    }

    #[test]
    fn records_onto_existing_stack() {
        let state = global(vec![entry("UNDO_PAYLOAD_1", "REDO_PAYLOAD_1")], vec![]);
        let action = Action::undoable("TEST", json!("UNDO_PAYLOAD_2"), json!("REDO_PAYLOAD_2"));
        assert_eq!(
            reduce(&state, &action),
            global(
                vec![
                    entry("UNDO_PAYLOAD_1", "REDO_PAYLOAD_1"),
                    entry("UNDO_PAYLOAD_2", "REDO_PAYLOAD_2"),
                ],
                vec![]
            )
        );
    }

    #[test]
    fn recording_clears_redos() {
        let state = global(vec![], vec![entry("OLD_U", "OLD_R")]);
        let next = reduce(&state, &Action::undoable("TEST", json!("U"), json!("R")));
        assert_eq!(next, global(vec![entry("U", "R")], vec![]));
    }

    #[test]
    fn undos_behave_as_a_stack() {
        let state = HistoryState::new().with_scope(
            1,
            ScopeHistory::from_parts(
                [entry("UNDO_PAYLOAD_1", "REDO_PAYLOAD_1")],
                [entry("UNDO_PAYLOAD_2", "REDO_PAYLOAD_2")],
            ),
        );
        let expected = HistoryState::new().with_scope(
            1,
            ScopeHistory::from_parts(
                [],
                [
                    entry("UNDO_PAYLOAD_2", "REDO_PAYLOAD_2"),
                    entry("UNDO_PAYLOAD_1", "REDO_PAYLOAD_1"),
                ],
            ),
        );
        assert_eq!(reduce(&state, &scoped_undo()), expected);
    }

    #[test]
    fn redos_behave_as_a_stack() {
        let state = HistoryState::new().with_scope(
            1,
            ScopeHistory::from_parts(
                [entry("UNDO_PAYLOAD_1", "REDO_PAYLOAD_1")],
                [entry("UNDO_PAYLOAD_2", "REDO_PAYLOAD_2")],
            ),
        );
        let expected = HistoryState::new().with_scope(
            1,
            ScopeHistory::from_parts(
                [
                    entry("UNDO_PAYLOAD_1", "REDO_PAYLOAD_1"),
                    entry("UNDO_PAYLOAD_2", "REDO_PAYLOAD_2"),
                ],
                [],
            ),
        );
        assert_eq!(reduce(&state, &scoped_redo()), expected);
    }

    #[test]
    fn top_level_convention_records_and_scopes() {
        let action = Action::from_value(json!({
            "type": "TEST",
            "scope": "ws",
            "undo": "U",
            "redo": "R"
        }))
        .unwrap();
        let next = reduce(&HistoryState::new(), &action);
        assert_eq!(
            next.peek_undo(&ScopeId::from("ws")),
            Some(&entry("U", "R"))
        );
    }

    #[test]
    fn scoped_update_shares_untouched_scopes() {
        let state = global(vec![marker("G")], vec![])
            .with_scope(2, ScopeHistory::from_parts([marker("TWO")], []))
            .with_scope(1, ScopeHistory::from_parts([marker("ONE")], []));
        let next = reduce(&state, &scoped_undo());

        let same = |scope: &ScopeId| {
            Arc::ptr_eq(state.scope(scope).unwrap(), next.scope(scope).unwrap())
        };
        assert!(same(&ScopeId::Global));
        assert!(same(&ScopeId::from(2)));
        assert!(!same(&ScopeId::from(1)));
    }

    #[test]
    fn unusable_scope_leaves_every_stack_alone() {
        let state = global(vec![marker("G")], vec![marker("H")])
            .with_scope(1, ScopeHistory::from_parts([marker("ONE")], []));

        let undo = Action::undo_intent().with_payload(json!({ "undoScope": 1.5 }));
        assert_eq!(reduce(&state, &undo), state);

        let redo = Action::from_value(json!({ "type": "REDO", "scope": { "id": 1 } })).unwrap();
        assert_eq!(reduce(&state, &redo), state);

        let record = Action::from_value(json!({
            "type": "TEST",
            "payload": { "undoScope": 1.5, "undo": "U", "redo": "R" }
        }))
        .unwrap();
        assert_eq!(reduce(&state, &record), state);
    }

    #[test]
    fn passthrough_action_is_noop() {
        let state = global(vec![marker("G")], vec![marker("H")]);
        assert_eq!(reduce(&state, &Action::new("NOT_UNDO")), state);
    }

    #[test]
    fn cap_drops_oldest_entries() {
        let config = HistoryConfig::new().with_max_undo_entries(2);
        let mut state = HistoryState::new();
        for i in 0..4 {
            state = reduce_with(
                &config,
                &state,
                &Action::undoable("TEST", json!(i), json!(i)),
            );
        }
        let undos: Vec<_> = state
            .global()
            .unwrap()
            .undos()
            .iter()
            .map(|e| e.undo().cloned())
            .collect();
        assert_eq!(undos, vec![Some(json!(2)), Some(json!(3))]);
    }
}
