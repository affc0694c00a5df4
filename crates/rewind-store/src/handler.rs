//! Undo/redo handlers
//!
//! A handler turns a stored `undo` or `redo` payload into the concrete action
//! that reverses (or reapplies) the recorded one. Handlers are either raw
//! (`&Value -> Action`) or typed through [`UndoableAction`], in which case
//! the payload is decoded into the action's declared payload type.

use crate::error::HandlerError;
use rewind_history::Action;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Shared handler function
pub type HandlerFn = Arc<dyn Fn(&Value) -> Result<Action, HandlerError> + Send + Sync>;

/// Which stack a handler serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Reverse the recorded action
    Undo,

    /// Reapply the recorded action
    Redo,
}

/// Undoable domain action with typed compensating payloads
///
/// Declaring the payload types here is what lets
/// [`StoreExtension::with_handler`](crate::StoreExtension::with_handler)
/// check handler closures against the recorded data.
///
/// ```rust
/// use rewind_store::UndoableAction;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Positions { x: i32 }
///
/// struct SetPositions;
///
/// impl UndoableAction for SetPositions {
///     const TYPE: &'static str = "PRODUCT_GRAPH_SET_POSITIONS";
///     type Undo = Positions;
///     type Redo = Positions;
/// }
///
/// let action = SetPositions::record(&Positions { x: 0 }, &Positions { x: 5 }).unwrap();
/// assert_eq!(action.kind(), "PRODUCT_GRAPH_SET_POSITIONS");
/// ```
pub trait UndoableAction {
    /// Action type tag
    const TYPE: &'static str;

    /// Payload handed to the undo handler
    type Undo: Serialize + DeserializeOwned;

    /// Payload handed to the redo handler
    type Redo: Serialize + DeserializeOwned;

    /// Build the undoable action carrying both payloads
    ///
    /// # Errors
    /// Fails if either payload cannot be serialized to JSON.
    fn record(undo: &Self::Undo, redo: &Self::Redo) -> Result<Action, HandlerError> {
        let undo = serde_json::to_value(undo).map_err(|e| HandlerError::encode(Self::TYPE, e))?;
        let redo = serde_json::to_value(redo).map_err(|e| HandlerError::encode(Self::TYPE, e))?;
        Ok(Action::undoable(Self::TYPE, undo, redo))
    }
}

/// Undo and redo functions registered for one action type
#[derive(Clone, Default)]
pub struct UndoHandler {
    undo: Option<HandlerFn>,
    redo: Option<HandlerFn>,
}

impl UndoHandler {
    /// Handler with neither direction
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the undo function
    #[must_use]
    pub fn with_undo<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Action, HandlerError> + Send + Sync + 'static,
    {
        self.undo = Some(Arc::new(f));
        self
    }

    /// Set the redo function
    #[must_use]
    pub fn with_redo<F>(mut self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<Action, HandlerError> + Send + Sync + 'static,
    {
        self.redo = Some(Arc::new(f));
        self
    }

    /// Function for one direction
    #[inline]
    #[must_use]
    pub fn get(&self, direction: Direction) -> Option<&HandlerFn> {
        match direction {
            Direction::Undo => self.undo.as_ref(),
            Direction::Redo => self.redo.as_ref(),
        }
    }

    pub(crate) fn set(&mut self, direction: Direction, f: HandlerFn) {
        match direction {
            Direction::Undo => self.undo = Some(f),
            Direction::Redo => self.redo = Some(f),
        }
    }
}

impl fmt::Debug for UndoHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UndoHandler")
            .field("undo", &self.undo.is_some())
            .field("redo", &self.redo.is_some())
            .finish()
    }
}

/// Wrap a typed closure so it decodes the stored payload first
pub(crate) fn typed<P, F>(action_type: &'static str, f: F) -> HandlerFn
where
    P: DeserializeOwned,
    F: Fn(P) -> Action + Send + Sync + 'static,
{
    Arc::new(move |payload: &Value| {
        let decoded =
            P::deserialize(payload).map_err(|e| HandlerError::decode(action_type, e))?;
        Ok(f(decoded))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Moved {
        id: String,
        x: i32,
    }

    struct Move;

    impl UndoableAction for Move {
        const TYPE: &'static str = "MOVE";
        type Undo = Moved;
        type Redo = Moved;
    }

    #[test]
    fn record_builds_payload() {
        let action = Move::record(
            &Moved { id: "v1".into(), x: 0 },
            &Moved { id: "v1".into(), x: 10 },
        )
        .unwrap();
        assert_eq!(action.kind(), "MOVE");
        assert_eq!(action.undo_payload(), Some(&json!({ "id": "v1", "x": 0 })));
        assert_eq!(action.redo_payload(), Some(&json!({ "id": "v1", "x": 10 })));
    }

    #[test]
    fn typed_handler_decodes_payload() {
        let handler = typed::<Moved, _>("MOVE", |m| {
            Action::new("MOVE_BACK").with_field("x", json!(m.x))
        });
        let action = handler(&json!({ "id": "v1", "x": 3 })).unwrap();
        assert_eq!(action.field("x"), Some(&json!(3)));
    }

    #[test]
    fn typed_handler_reports_bad_payload() {
        let handler = typed::<Moved, _>("MOVE", |_| Action::new("MOVE_BACK"));
        let err = handler(&json!("not an object")).unwrap_err();
        assert!(matches!(err, HandlerError::Decode { .. }));
    }

    #[test]
    fn unit_payload_accepts_null() {
        let handler = typed::<(), _>("PING", |()| Action::new("PONG"));
        assert_eq!(handler(&Value::Null).unwrap().kind(), "PONG");
    }

    #[test]
    fn handler_directions() {
        let handler = UndoHandler::new().with_undo(|_| Ok(Action::new("UNDONE")));
        assert!(handler.get(Direction::Undo).is_some());
        assert!(handler.get(Direction::Redo).is_none());
        assert_eq!(format!("{handler:?}"), "UndoHandler { undo: true, redo: false }");
    }
}
