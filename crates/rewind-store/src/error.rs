//! Error types for the store
//!
//! Dispatch itself never fails: unknown or malformed actions fall through as
//! no-ops. Errors only surface from registration, configuration, and from
//! handlers, whose failures the undo middleware logs and swallows.

/// Main store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Extension registration failed
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Undo/redo handler failed
    #[error("handler error: {0}")]
    Handler(#[from] HandlerError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Extension registration errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// An extension with this key is already registered
    #[error("extension already registered: {0}")]
    DuplicateKey(String),

    /// Extensions need a non-empty key
    #[error("extension key must not be empty")]
    EmptyKey,
}

/// Errors produced while turning a stored payload into an action
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Stored payload does not match the handler's payload type
    #[error("cannot decode {action_type} payload: {source}")]
    Decode {
        /// Action type the payload was recorded for
        action_type: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// Typed payload could not be encoded into an action
    #[error("cannot encode {action_type} payload: {source}")]
    Encode {
        /// Action type being recorded
        action_type: String,
        /// Underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// Handler-specific failure
    #[error("{0}")]
    Failed(String),
}

impl HandlerError {
    /// Create decode error
    #[inline]
    #[must_use]
    pub fn decode(action_type: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            action_type: action_type.into(),
            source,
        }
    }

    /// Create encode error
    #[inline]
    #[must_use]
    pub fn encode(action_type: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encode {
            action_type: action_type.into(),
            source,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML could not be parsed into a [`StoreConfig`](crate::StoreConfig)
    #[error("invalid store configuration: {0}")]
    Parse(#[from] toml::de::Error),
}
