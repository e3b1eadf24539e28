//! The name→handler registry consulted by the dispatch shim.

use super::ScalarHandler;
use crate::adapter::MasterAdapter;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Concurrent-safe map of handler name to scalar handler.
///
/// Reads proceed in parallel with other reads; writers exclude everything.
/// Dispatch runs on the master-agent thread while the application mutates
/// the registry from its own threads, so every operation takes the lock.
///
/// Enumeration order of [`all`](Self::all) is unspecified.
pub struct HandlerRegistry<A: MasterAdapter> {
    handlers: RwLock<HashMap<String, Arc<dyn ScalarHandler<A>>>>,
}

impl<A: MasterAdapter> HandlerRegistry<A> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    /// Register a handler under its own name, replacing any handler
    /// already registered under that name.
    pub fn add(&self, handler: Arc<dyn ScalarHandler<A>>) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        handlers.insert(handler.name().to_string(), handler);
    }

    /// Look up a handler by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ScalarHandler<A>>> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.get(name).cloned()
    }

    /// Remove a handler, returning it if it was present.
    pub fn remove(&self, name: &str) -> Option<Arc<dyn ScalarHandler<A>>> {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        handlers.remove(name)
    }

    /// Remove every registered handler.
    pub fn remove_all(&self) {
        let mut handlers = self
            .handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        handlers.clear();
    }

    /// A snapshot of the registered handlers, in unspecified order.
    pub fn all(&self) -> Vec<Arc<dyn ScalarHandler<A>>> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.values().cloned().collect()
    }

    /// The number of registered handlers.
    pub fn len(&self) -> usize {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<A: MasterAdapter> Default for HandlerRegistry<A> {
    fn default() -> Self {
        Self::new()
    }
}
