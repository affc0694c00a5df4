//! Rewind History
//!
//! Scoped, linear undo/redo history driven by dispatched actions.
//!
//! # Core Concepts
//!
//! - [`Action`]: Dispatched record; carries optional `undo`/`redo` payloads
//! - [`ScopeId`]: Namespace isolating one history from another
//! - [`HistoryEntry`]: Recorded action type plus its compensating payloads
//! - [`HistoryState`]: Per-scope undo/redo stacks with structural sharing
//! - [`reduce`]: Pure state transition for `UNDO`, `REDO` and undoable actions
//!
//! # Example
//!
//! ```rust
//! use rewind_history::{reduce, Action, HistoryState, ScopeId};
//! use serde_json::json;
//!
//! let state = HistoryState::new();
//! let state = reduce(&state, &Action::undoable("MOVE", json!({ "x": 0 }), json!({ "x": 5 })));
//! assert!(state.can_undo(&ScopeId::Global));
//!
//! let state = reduce(&state, &Action::undo_intent());
//! assert!(state.can_redo(&ScopeId::Global));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod action;
mod config;
mod entry;
mod reducer;
mod scope;
mod state;

// Re-exports
pub use action::{Action, Intent, REDO, UNDO, UNDO_SCOPE_KEY};
pub use config::HistoryConfig;
pub use entry::{HistoryEntry, ScopeHistory};
pub use reducer::{reduce, reduce_with};
pub use scope::{ScopeId, GLOBAL_SCOPE};
pub use state::{HistorySource, HistoryState};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
