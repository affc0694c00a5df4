//! Action envelope
//!
//! Provides [`Action`], the record that flows through the dispatch pipeline.
//! Two call conventions are accepted for history data: nested under
//! `payload` (`payload.undoScope`, `payload.undo`, `payload.redo`) or at the
//! top level (`scope`, `undo`, `redo`). The nested form wins when both exist.
//!
//! Scope ids arrive as loose JSON and are only resolved on demand; a present
//! but unusable id resolves to nothing rather than to the global scope.

use crate::entry::HistoryEntry;
use crate::scope::ScopeId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Type tag of the undo intent
pub const UNDO: &str = "UNDO";

/// Type tag of the redo intent
pub const REDO: &str = "REDO";

/// Payload key carrying the target scope
pub const UNDO_SCOPE_KEY: &str = "undoScope";

/// How the history layer treats an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Step the scope's history back
    Undo,

    /// Step the scope's history forward
    Redo,

    /// Record a new history entry
    Record,

    /// Not history related
    Passthrough,
}

/// A dispatched action
///
/// Any top-level keys besides the known ones are kept in [`Action::fields`],
/// so an action built from `{"type": "UNDO_TEST", "data": "X"}` keeps `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    scope: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    undo: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    redo: Option<Value>,

    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl Action {
    /// Create a bare action of the given type
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
            scope: None,
            undo: None,
            redo: None,
            fields: Map::new(),
        }
    }

    /// `UNDO` intent for the global scope
    #[inline]
    #[must_use]
    pub fn undo_intent() -> Self {
        Self::new(UNDO)
    }

    /// `REDO` intent for the global scope
    #[inline]
    #[must_use]
    pub fn redo_intent() -> Self {
        Self::new(REDO)
    }

    /// Undoable domain action carrying both compensating payloads
    #[must_use]
    pub fn undoable(kind: impl Into<String>, undo: Value, redo: Value) -> Self {
        let mut payload = Map::new();
        payload.insert("undo".to_string(), undo);
        payload.insert("redo".to_string(), redo);
        Self::new(kind).with_payload(Value::Object(payload))
    }

    /// Build an action from a JSON object
    ///
    /// # Errors
    /// Fails if the value is not an object with a string `type`.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Convert back to JSON
    #[must_use]
    pub fn to_value(&self) -> Value {
        // Every field is already JSON, so this cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Set the payload
    #[inline]
    #[must_use]
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Target a scope
    ///
    /// Written to `payload.undoScope` when the payload is an object (or
    /// absent), otherwise to the top-level `scope` key.
    #[must_use]
    pub fn in_scope(mut self, scope: impl Into<ScopeId>) -> Self {
        let scope = scope.into().to_value();
        let payload = self
            .payload
            .get_or_insert_with(|| Value::Object(Map::new()));
        match payload {
            Value::Object(map) => {
                map.insert(UNDO_SCOPE_KEY.to_string(), scope);
            }
            _ => self.scope = Some(scope),
        }
        self
    }

    /// Set one top-level field
    ///
    /// `undo`, `redo`, `payload` and `scope` replace the matching part of the
    /// envelope; `type` is ignored.
    #[must_use]
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.set_field(key.into(), value);
        self
    }

    /// Merge every key of a JSON object into the top level
    ///
    /// Keys are routed as in [`Action::with_field`]. Non-object values are
    /// ignored.
    #[must_use]
    pub fn with_fields(mut self, value: Value) -> Self {
        if let Value::Object(map) = value {
            for (key, value) in map {
                self.set_field(key, value);
            }
        }
        self
    }

    /// Action type tag
    #[inline]
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Raw payload
    #[inline]
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Extra top-level field
    #[inline]
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All extra top-level fields
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Scope this action targets
    ///
    /// `payload.undoScope`, then top-level `scope`, then global. Returns
    /// `None` when the chosen id is present but is neither an integer nor a
    /// string; such an action targets no scope at all. `null` counts as
    /// absent.
    #[must_use]
    pub fn undo_scope(&self) -> Option<ScopeId> {
        let nested = self
            .payload
            .as_ref()
            .and_then(|p| p.get(UNDO_SCOPE_KEY))
            .filter(|v| !v.is_null());

        match nested.or(self.scope.as_ref()) {
            Some(raw) => ScopeId::from_value(raw),
            None => Some(ScopeId::Global),
        }
    }

    /// Undo fragment (`payload.undo`, then top-level `undo`)
    #[must_use]
    pub fn undo_payload(&self) -> Option<&Value> {
        self.fragment("undo", self.undo.as_ref())
    }

    /// Redo fragment (`payload.redo`, then top-level `redo`)
    #[must_use]
    pub fn redo_payload(&self) -> Option<&Value> {
        self.fragment("redo", self.redo.as_ref())
    }

    /// Classify the action for the history layer
    #[must_use]
    pub fn intent(&self) -> Intent {
        match self.kind.as_str() {
            UNDO => Intent::Undo,
            REDO => Intent::Redo,
            _ if self.undo_payload().is_some() || self.redo_payload().is_some() => Intent::Record,
            _ => Intent::Passthrough,
        }
    }

    /// History entry this action records, if it is undoable
    #[must_use]
    pub fn history_entry(&self) -> Option<HistoryEntry> {
        if self.intent() != Intent::Record {
            return None;
        }
        Some(HistoryEntry::new(
            self.kind.clone(),
            self.undo_payload().cloned(),
            self.redo_payload().cloned(),
        ))
    }

    fn set_field(&mut self, key: String, value: Value) {
        match key.as_str() {
            "undo" => self.undo = non_null(value),
            "redo" => self.redo = non_null(value),
            "payload" => self.payload = non_null(value),
            "scope" => self.scope = non_null(value),
            "type" => {}
            _ => {
                self.fields.insert(key, value);
            }
        }
    }

    fn fragment<'a>(&'a self, key: &str, top_level: Option<&'a Value>) -> Option<&'a Value> {
        self.payload
            .as_ref()
            .and_then(|p| p.get(key))
            .filter(|v| !v.is_null())
            .or(top_level)
    }
}

fn non_null(value: Value) -> Option<Value> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}
