//! Registration facade: dispatchers and the scoped table registry.
//!
//! A [`Dispatcher`] is the dispatchable entry point for one table. It is a
//! cheap clonable handle; clones share the table, so repeatedly registering
//! under the same name and calling [`Dispatcher::overload`] are equivalent —
//! both end in an appended candidate behind the same entry point.
//!
//! A [`Registry`] owns tables keyed by (scope, name). It is an explicitly
//! owned value, not process-global state: its lifetime is its owner's
//! lifetime, which is also the lifetime of every table it created.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::dispatch::{Args, CallError, Candidate, DispatchTable};
use crate::value::Value;

/// The dispatchable entry point for one (scope, name) table.
///
/// Stored in a struct field, a dispatcher treats a receiver argument like
/// any other positional parameter; nothing here special-cases a first
/// parameter.
#[derive(Clone)]
pub struct Dispatcher {
    table: Arc<DispatchTable>,
}

impl Dispatcher {
    /// Create the table for (scope, name) and register its first candidate.
    /// The candidate's doc string becomes the table's documentation.
    pub fn new(scope: impl Into<String>, name: impl Into<String>, first: Candidate) -> Self {
        let table = DispatchTable::new(scope, name);
        table.push(first);
        Self {
            table: Arc::new(table),
        }
    }

    /// Register another implementation under the same name, appending it to
    /// the table. Returns the same entry point, so registration chains keep
    /// their identity.
    pub fn overload(&self, candidate: Candidate) -> Dispatcher {
        self.table.push(candidate);
        self.clone()
    }

    /// Dispatch a call: evaluate candidates in registration order and
    /// invoke the first that accepts.
    pub fn call(&self, args: &Args) -> Result<Value, CallError> {
        self.table.invoke(args)
    }

    /// The table's canonical documentation (the first candidate's doc).
    pub fn doc(&self) -> Option<String> {
        self.table.doc()
    }

    pub fn scope(&self) -> &str {
        self.table.scope()
    }

    pub fn name(&self) -> &str {
        self.table.name()
    }

    /// Number of registered candidates.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Rendered candidate signatures, in registration order.
    pub fn signatures(&self) -> Vec<String> {
        self.table.signatures()
    }

    /// Whether two handles share one table.
    pub fn same_table(&self, other: &Dispatcher) -> bool {
        Arc::ptr_eq(&self.table, &other.table)
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("scope", &self.scope())
            .field("name", &self.name())
            .field("candidates", &self.signatures())
            .finish()
    }
}

/// An explicitly owned map of dispatch tables keyed by (scope, name).
///
/// Tables are created lazily on first registration for a key and live as
/// long as the registry (or any dispatcher handle) keeps them reachable.
#[derive(Debug, Default)]
pub struct Registry {
    tables: FxHashMap<(String, String), Dispatcher>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `candidate` to the table for (scope, name), creating the
    /// table on first registration. Returns the shared dispatcher for the
    /// key — the same handle every registration under this key returns.
    pub fn register(
        &mut self,
        scope: impl Into<String>,
        name: impl Into<String>,
        candidate: Candidate,
    ) -> Dispatcher {
        let key = (scope.into(), name.into());
        match self.tables.get(&key) {
            Some(dispatcher) => dispatcher.overload(candidate),
            None => {
                let dispatcher = Dispatcher::new(key.0.clone(), key.1.clone(), candidate);
                self.tables.insert(key, dispatcher.clone());
                dispatcher
            }
        }
    }

    /// The dispatcher for (scope, name), if any candidate was registered.
    pub fn get(&self, scope: &str, name: &str) -> Option<&Dispatcher> {
        self.tables.get(&(scope.to_string(), name.to_string()))
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
