//! Dispatch store
//!
//! Provides [`Store`], which runs every dispatched action through a
//! middleware chain and then through the root reducer.
//!
//! # Dispatch
//! - serialised across threads by a re-entrant lock, so middleware may
//!   dispatch again from inside `handle`
//! - no lock is held while the reducer or subscribers run
//! - always returns the action it was given

use crate::middleware::{Middleware, Next};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use rewind_history::Action;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Root reducer of a store
pub type RootReducer<S> = Arc<dyn Fn(&S, &Action) -> S + Send + Sync>;

/// State change listener
pub type Subscriber<S> = Arc<dyn Fn(&S) + Send + Sync>;

/// Handle returned by [`Store::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Action-dispatch store
pub struct Store<S> {
    state: RwLock<S>,
    reducer: RootReducer<S>,
    middleware: Vec<Arc<dyn Middleware<S>>>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber<S>)>>,
    next_subscription: AtomicU64,
    dispatch_lock: ReentrantMutex<()>,
}

impl<S: Clone> Store<S> {
    /// Start building a store
    #[must_use]
    pub fn builder<F>(initial: S, reducer: F) -> StoreBuilder<S>
    where
        F: Fn(&S, &Action) -> S + Send + Sync + 'static,
    {
        StoreBuilder::new(initial, reducer)
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn state(&self) -> S {
        self.state.read().clone()
    }

    /// Dispatch an action through the middleware chain and reducer
    ///
    /// Returns the action that was passed in.
    pub fn dispatch(&self, action: Action) -> Action {
        let _serial = self.dispatch_lock.lock();
        self.run_stage(0, action)
    }

    /// Listen for state changes
    pub fn subscribe<F>(&self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers.lock().push((id, Arc::new(subscriber)));
        id
    }

    /// Stop listening
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.lock();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// Number of middleware stages
    #[inline]
    #[must_use]
    pub fn middleware_len(&self) -> usize {
        self.middleware.len()
    }

    pub(crate) fn run_stage(&self, index: usize, action: Action) -> Action {
        match self.middleware.get(index) {
            Some(middleware) => {
                let middleware = Arc::clone(middleware);
                middleware.handle(self, action, Next::new(self, index + 1))
            }
            None => self.apply(action),
        }
    }

    fn apply(&self, action: Action) -> Action {
        let current = self.state();
        let next = (self.reducer)(&current, &action);
        *self.state.write() = next.clone();

        let subscribers: Vec<Subscriber<S>> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, s)| Arc::clone(s))
            .collect();
        for subscriber in subscribers {
            subscriber(&next);
        }

        action
    }
}

impl<S> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("middleware", &self.middleware.len())
            .field("subscribers", &self.subscribers.lock().len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Store`]
pub struct StoreBuilder<S> {
    initial: S,
    reducer: RootReducer<S>,
    middleware: Vec<Arc<dyn Middleware<S>>>,
}

impl<S: Clone> StoreBuilder<S> {
    /// Create builder with initial state and root reducer
    #[must_use]
    pub fn new<F>(initial: S, reducer: F) -> Self
    where
        F: Fn(&S, &Action) -> S + Send + Sync + 'static,
    {
        Self {
            initial,
            reducer: Arc::new(reducer),
            middleware: Vec::new(),
        }
    }

    /// Append a middleware stage (first added runs first)
    #[must_use]
    pub fn with_middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<S> + 'static,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Build the store
    #[must_use]
    pub fn build(self) -> Store<S> {
        Store {
            state: RwLock::new(self.initial),
            reducer: self.reducer,
            middleware: self.middleware,
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(0),
            dispatch_lock: ReentrantMutex::new(()),
        }
    }
}

impl<S> fmt::Debug for StoreBuilder<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreBuilder")
            .field("middleware", &self.middleware.len())
            .finish_non_exhaustive()
    }
}
