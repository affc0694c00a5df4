//! History scopes
//!
//! Provides [`ScopeId`], the key that isolates one undo/redo stack pair from
//! another (the global bucket, a workspace, a product, ...).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// Literal key of the global scope
pub const GLOBAL_SCOPE: &str = "global";

/// Namespace for a history stack
///
/// Equality is strict: `Numeric(1)` and `Named("1")` are different scopes.
/// The only normalisation is that the string `"global"` always maps to
/// [`ScopeId::Global`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "RawScope", into = "RawScope")]
pub enum ScopeId {
    /// The always-present global bucket
    #[default]
    Global,

    /// Numeric identifier (e.g. a product id)
    Numeric(i64),

    /// String identifier (e.g. a workspace id)
    Named(String),
}

impl ScopeId {
    /// Create a named scope, normalising `"global"` to [`ScopeId::Global`]
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        if name == GLOBAL_SCOPE {
            Self::Global
        } else {
            Self::Named(name)
        }
    }

    /// Check if this is the global scope
    #[inline]
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// Read a scope id out of a loosely-typed JSON value
    ///
    /// Integers become [`ScopeId::Numeric`], strings become named scopes.
    /// Anything else (floats, objects, null) is not a scope id.
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Numeric),
            Value::String(s) => Some(Self::named(s.as_str())),
            _ => None,
        }
    }

    /// JSON form of this scope id
    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            Self::Global => Value::from(GLOBAL_SCOPE),
            Self::Numeric(n) => Value::from(*n),
            Self::Named(s) => Value::from(s.as_str()),
        }
    }
}

impl Display for ScopeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str(GLOBAL_SCOPE),
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Named(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ScopeId {
    fn from(id: i64) -> Self {
        Self::Numeric(id)
    }
}

impl From<i32> for ScopeId {
    fn from(id: i32) -> Self {
        Self::Numeric(i64::from(id))
    }
}

impl From<&str> for ScopeId {
    fn from(name: &str) -> Self {
        Self::named(name)
    }
}

impl From<String> for ScopeId {
    fn from(name: String) -> Self {
        Self::named(name)
    }
}

/// Wire form of a scope id: a bare JSON number or string
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawScope {
    Number(i64),
    Text(String),
}

impl From<RawScope> for ScopeId {
    fn from(raw: RawScope) -> Self {
        match raw {
            RawScope::Number(n) => Self::Numeric(n),
            RawScope::Text(s) => Self::named(s),
        }
    }
}

impl From<ScopeId> for RawScope {
    fn from(scope: ScopeId) -> Self {
        match scope {
            ScopeId::Global => Self::Text(GLOBAL_SCOPE.to_string()),
            ScopeId::Numeric(n) => Self::Number(n),
            ScopeId::Named(s) => Self::Text(s),
        }
    }
}
