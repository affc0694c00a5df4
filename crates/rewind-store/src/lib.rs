//! Rewind Store
//!
//! Action-dispatch store with pluggable undo/redo handlers.
//!
//! # Core Concepts
//!
//! - [`ExtensionRegistry`]: Shared table of [`StoreExtension`]s (slice reducers + undo handlers)
//! - [`UndoableAction`]: Typed declaration of an action's undo/redo payloads
//! - [`UndoMiddleware`]: Turns `UNDO`/`REDO` into the registered compensating action
//! - [`Store`]: Middleware chain + root reducer + subscribers
//! - [`create_store`]: Store over [`AppState`] with the undo middleware installed
//!
//! # Example
//!
//! ```rust
//! use rewind_store::{create_store, ExtensionRegistry, StoreConfig, StoreExtension, UndoHandler};
//! use rewind_history::{Action, ScopeId, HistorySource};
//! use serde_json::json;
//!
//! let registry = ExtensionRegistry::shared();
//! registry
//!     .register(StoreExtension::new("graph").with_raw_handler(
//!         "MOVE",
//!         UndoHandler::new().with_undo(|undo| Ok(Action::new("MOVE_BACK").with_fields(undo.clone()))),
//!     ))
//!     .unwrap();
//!
//! let store = create_store(registry, &StoreConfig::default());
//! store.dispatch(Action::undoable("MOVE", json!({ "x": 0 }), json!({ "x": 5 })));
//! store.dispatch(Action::undo_intent());
//!
//! assert!(store.state().history().can_redo(&ScopeId::Global));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod app;
mod config;
mod error;
mod handler;
mod middleware;
mod registry;
mod store;

// Re-exports
pub use app::{create_store, AppState};
pub use config::StoreConfig;
pub use error::{ConfigError, HandlerError, RegistryError, StoreError};
pub use handler::{Direction, HandlerFn, UndoHandler, UndoableAction};
pub use middleware::{Middleware, Next, UndoMiddleware};
pub use registry::{ExtensionRegistry, SliceReducer, StoreExtension};
pub use store::{RootReducer, Store, StoreBuilder, Subscriber, SubscriptionId};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
