//! Ordered candidate tables and first-match invocation.
//!
//! A table owns the candidates registered under one dispatch name, in
//! registration order, append-only. Invocation evaluates candidates in that
//! order and invokes the first that accepts; when every candidate rejects,
//! the per-candidate failures are composed into a [`DispatchError`].
//!
//! Registration takes the write lock, dispatch the read lock; the selected
//! body is cloned out and the lock released before it runs, so candidate
//! bodies may re-enter the dispatcher.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::signature::Signature;
use crate::value::{CandidateError, Value};

use super::bind::{Args, BoundArgs};
use super::evaluate::evaluate;
use super::result::{CallError, CandidateFailure, DispatchError, MatchResult};

/// A type-erased candidate body.
pub type CandidateFn = Arc<dyn Fn(BoundArgs) -> Result<Value, CandidateError> + Send + Sync>;

/// One registered implementation: a signature plus its body.
#[derive(Clone)]
pub struct Candidate {
    signature: Signature,
    body: CandidateFn,
    doc: Option<String>,
}

impl Candidate {
    pub fn new<F>(signature: Signature, body: F) -> Self
    where
        F: Fn(BoundArgs) -> Result<Value, CandidateError> + Send + Sync + 'static,
    {
        Self {
            signature,
            body: Arc::new(body),
            doc: None,
        }
    }

    /// Attach a documentation string. The table records the first
    /// candidate's doc as its canonical documentation.
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub(crate) fn body(&self) -> CandidateFn {
        Arc::clone(&self.body)
    }

    pub(crate) fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }
}

impl fmt::Debug for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidate")
            .field("signature", &self.signature.to_string())
            .finish_non_exhaustive()
    }
}

struct TableState {
    candidates: Vec<Candidate>,
    doc: Option<String>,
}

/// The ordered candidates registered under one (scope, name) pair.
///
/// Append-only: candidates are never removed or reordered, so registration
/// order is the dispatch order for the table's whole lifetime.
pub struct DispatchTable {
    scope: String,
    name: String,
    state: RwLock<TableState>,
}

impl DispatchTable {
    pub fn new(scope: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
            state: RwLock::new(TableState {
                candidates: Vec::new(),
                doc: None,
            }),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a candidate. The first candidate's doc string becomes the
    /// table's documentation; later docs are discarded.
    pub fn push(&self, candidate: Candidate) {
        let mut state = self.state.write();
        if state.candidates.is_empty() {
            state.doc = candidate.doc().map(str::to_string);
        }
        debug!(
            scope = %self.scope,
            name = %self.name,
            index = state.candidates.len(),
            signature = %candidate.signature(),
            "registered candidate"
        );
        state.candidates.push(candidate);
    }

    pub fn len(&self) -> usize {
        self.state.read().candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().candidates.is_empty()
    }

    /// The table's canonical documentation: the first candidate's doc.
    pub fn doc(&self) -> Option<String> {
        self.state.read().doc.clone()
    }

    /// Rendered signatures of all candidates, in registration order.
    pub fn signatures(&self) -> Vec<String> {
        self.state
            .read()
            .candidates
            .iter()
            .map(|c| c.signature().to_string())
            .collect()
    }

    /// Evaluate candidates in registration order and invoke the first that
    /// accepts. Later candidates are never evaluated once one accepts.
    ///
    /// When every candidate rejects, returns a [`DispatchError`] listing
    /// each candidate's failure in registration order. An error from the
    /// selected body passes through unchanged.
    pub fn invoke(&self, args: &Args) -> Result<Value, CallError> {
        let (selected, failures) = {
            let state = self.state.read();
            debug_assert!(!state.candidates.is_empty());
            let mut failures = Vec::new();
            let mut selected = None;
            for (index, candidate) in state.candidates.iter().enumerate() {
                match evaluate(candidate, args) {
                    MatchResult::Accept(bound) => {
                        trace!(
                            name = %self.name,
                            index,
                            signature = %candidate.signature(),
                            "candidate accepted"
                        );
                        selected = Some((candidate.body(), bound));
                        break;
                    }
                    MatchResult::Reject(reason) => {
                        trace!(
                            name = %self.name,
                            index,
                            signature = %candidate.signature(),
                            ?reason,
                            "candidate rejected"
                        );
                        failures.push(CandidateFailure {
                            signature: candidate.signature().to_string(),
                            reason,
                        });
                    }
                }
            }
            (selected, failures)
        };

        match selected {
            Some((body, bound)) => body(bound).map_err(CallError::Candidate),
            None => {
                debug!(name = %self.name, "no candidate accepted");
                Err(DispatchError {
                    name: self.name.clone(),
                    arguments: args.to_string(),
                    failures,
                }
                .into())
            }
        }
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable")
            .field("scope", &self.scope)
            .field("name", &self.name)
            .field("candidates", &self.signatures())
            .finish()
    }
}
