use proptest::prelude::*;
use rewind_history::{Action, HistoryEntry, HistoryState, ScopeHistory, ScopeId};
use rewind_store::{
    create_store, ExtensionRegistry, HandlerError, StoreConfig, StoreExtension, UndoHandler,
    UndoMiddleware,
};
use rewind_test_utils::DispatchSpy;
use serde_json::json;
use std::sync::Arc;

const KINDS: [&str; 3] = ["A", "B", "C"];

/// How one direction of one action type is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Handling {
    Missing,
    Succeeds,
    Fails,
}

fn handling_strategy() -> impl Strategy<Value = Handling> {
    prop_oneof![
        Just(Handling::Missing),
        Just(Handling::Succeeds),
        Just(Handling::Fails),
    ]
}

/// `(undo, redo)` handling for each of [`KINDS`]
fn table_strategy() -> impl Strategy<Value = Vec<(Handling, Handling)>> {
    prop::collection::vec((handling_strategy(), handling_strategy()), KINDS.len())
}

fn scope_strategy() -> impl Strategy<Value = ScopeId> {
    prop_oneof![
        Just(ScopeId::Global),
        Just(ScopeId::Numeric(1)),
        Just(ScopeId::Named("ws".to_string())),
    ]
}

fn entry_strategy() -> impl Strategy<Value = HistoryEntry> {
    (prop::sample::select(KINDS.to_vec()), 0i64..10)
        .prop_map(|(kind, n)| HistoryEntry::new(kind, Some(json!(n)), Some(json!(-n))))
}

fn state_strategy() -> impl Strategy<Value = HistoryState> {
    let history = (
        prop::collection::vec(entry_strategy(), 0..3),
        prop::collection::vec(entry_strategy(), 0..3),
    )
        .prop_map(|(undos, redos)| ScopeHistory::from_parts(undos, redos));

    prop::collection::vec((scope_strategy(), history), 0..3).prop_map(|scopes| {
        scopes
            .into_iter()
            .fold(HistoryState::new(), |state, (scope, history)| {
                state.with_scope(scope, history)
            })
    })
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        scope_strategy().prop_map(|s| Action::undo_intent().in_scope(s)),
        scope_strategy().prop_map(|s| Action::redo_intent().in_scope(s)),
        (prop::sample::select(KINDS.to_vec()), scope_strategy(), 0i64..10)
            .prop_map(|(kind, s, n)| Action::undoable(kind, json!(n), json!(-n)).in_scope(s)),
        Just(Action::new("NOT_UNDO")),
        Just(Action::undo_intent().with_payload(json!({ "undoScope": 1.5 }))),
    ]
}

fn handler_for(kind: &'static str, undo: Handling, redo: Handling) -> UndoHandler {
    let mut handler = UndoHandler::new();
    match undo {
        Handling::Missing => {}
        Handling::Succeeds => {
            handler = handler.with_undo(move |_| Ok(Action::new(format!("UNDO_{kind}"))));
        }
        Handling::Fails => {
            handler = handler.with_undo(|_| Err(HandlerError::Failed("undo".into())));
        }
    }
    match redo {
        Handling::Missing => {}
        Handling::Succeeds => {
            handler = handler.with_redo(move |_| Ok(Action::new(format!("REDO_{kind}"))));
        }
        Handling::Fails => {
            handler = handler.with_redo(|_| Err(HandlerError::Failed("redo".into())));
        }
    }
    handler
}

fn registry_for(table: &[(Handling, Handling)]) -> Arc<ExtensionRegistry> {
    let extension = KINDS
        .iter()
        .zip(table)
        .fold(StoreExtension::new("laws"), |ext, (kind, (undo, redo))| {
            ext.with_raw_handler(*kind, handler_for(*kind, *undo, *redo))
        });

    let registry = ExtensionRegistry::shared();
    registry.register(extension).unwrap();
    registry
}

fn handling_of(table: &[(Handling, Handling)], kind: &str, undo: bool) -> Handling {
    KINDS
        .iter()
        .position(|k| *k == kind)
        .map_or(Handling::Missing, |i| if undo { table[i].0 } else { table[i].1 })
}

proptest! {
    #[test]
    fn prop_process_dispatches_at_most_once(
        table in table_strategy(),
        state in state_strategy(),
        action in action_strategy(),
    ) {
        let middleware = UndoMiddleware::new(registry_for(&table));
        let spy = DispatchSpy::new();

        let fired = middleware.process(&state, &action, spy.recorder());

        prop_assert!(spy.call_count() <= 1);
        prop_assert_eq!(fired, spy.was_called());
    }

    #[test]
    fn prop_process_dispatches_only_for_a_working_handler(
        table in table_strategy(),
        state in state_strategy(),
        scope in scope_strategy(),
        undo in any::<bool>(),
    ) {
        let middleware = UndoMiddleware::new(registry_for(&table));
        let action = if undo {
            Action::undo_intent().in_scope(scope.clone())
        } else {
            Action::redo_intent().in_scope(scope.clone())
        };
        let top = if undo { state.peek_undo(&scope) } else { state.peek_redo(&scope) };
        let expected = top
            .filter(|entry| handling_of(&table, entry.kind(), undo) == Handling::Succeeds)
            .map(|entry| {
                let prefix = if undo { "UNDO" } else { "REDO" };
                Action::new(format!("{prefix}_{}", entry.kind()))
            });

        let spy = DispatchSpy::new();
        middleware.process(&state, &action, spy.recorder());

        prop_assert_eq!(spy.calls(), expected.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn prop_dispatch_returns_its_input(
        table in table_strategy(),
        actions in prop::collection::vec(action_strategy(), 1..12),
    ) {
        let store = create_store(registry_for(&table), &StoreConfig::default());
        for action in actions {
            prop_assert_eq!(store.dispatch(action.clone()), action);
        }
    }
}
