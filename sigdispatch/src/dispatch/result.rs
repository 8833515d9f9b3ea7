//! Dispatch result and error types.
//!
//! Per-candidate failures ([`BindingError`], [`TypeMismatch`]) are data, not
//! errors: they are collected into a [`DispatchError`] only when every
//! candidate rejects. That composed error is the one failure a caller
//! ordinarily observes; a selected candidate's own error passes through
//! [`CallError::Candidate`] untouched.

use std::fmt;

use thiserror::Error;

use crate::constraint::Mismatch;
use crate::value::CandidateError;

use super::bind::{BindingError, BoundArgs};

/// A per-parameter type rejection for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeMismatch {
    /// The parameter whose bound value failed its constraint.
    pub parameter: String,
    /// What the constraint wanted, what arrived, and where.
    pub mismatch: Mismatch,
}

impl fmt::Display for TypeMismatch {
    /// `type of x[0] must be int; got str instead`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type of {}", self.parameter)?;
        for step in &self.mismatch.path {
            write!(f, "{step}")?;
        }
        write!(
            f,
            " must be {}; got {} instead",
            self.mismatch.expected, self.mismatch.actual
        )
    }
}

/// Why one candidate rejected a call.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// Binding failed; there is no per-parameter detail to report.
    Binding(BindingError),
    /// Binding succeeded but one or more parameters rejected their values.
    /// Every failing parameter is listed, first failure per parameter.
    Types(Vec<TypeMismatch>),
}

/// Outcome of evaluating one candidate against an argument pack.
#[derive(Debug)]
pub enum MatchResult {
    /// The candidate accepts; carries the bound parameter mapping.
    Accept(BoundArgs),
    /// The candidate rejects.
    Reject(RejectReason),
}

/// One candidate's contribution to a total dispatch failure.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFailure {
    /// The candidate's rendered signature, e.g. `(a: int)`.
    pub signature: String,
    /// Why it rejected.
    pub reason: RejectReason,
}

impl CandidateFailure {
    /// The diagnostic lines for this candidate: `{signature}: {reason}`,
    /// one line per rejection reason.
    pub fn lines(&self) -> Vec<String> {
        match &self.reason {
            RejectReason::Binding(err) => vec![format!("{}: {err}", self.signature)],
            RejectReason::Types(mismatches) => mismatches
                .iter()
                .map(|m| format!("{}: {m}", self.signature))
                .collect(),
        }
    }
}

/// Raised when no candidate accepts the arguments.
///
/// The message lists the received arguments and then, for every candidate in
/// registration order, its rendered signature followed by each specific
/// rejection reason, one per line.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchError {
    /// The dispatch name the call was made against.
    pub name: String,
    /// The rendered "arguments received" line.
    pub arguments: String,
    /// Every candidate's failure, in registration order.
    pub failures: Vec<CandidateFailure>,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "can't dispatch the given arguments to any of the candidate functions:"
        )?;
        writeln!(f, "arguments: {}", self.arguments)?;
        write!(f, "candidates:")?;
        for failure in &self.failures {
            for line in failure.lines() {
                write!(f, "\n{line}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for DispatchError {}

/// A failed call through a dispatcher.
#[derive(Debug, Error)]
pub enum CallError {
    /// No candidate accepted the arguments.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// The selected candidate's body failed; its error passes through
    /// unchanged.
    #[error("{0}")]
    Candidate(CandidateError),
}

impl CallError {
    /// The composed diagnostic, when dispatch itself failed.
    pub fn as_dispatch(&self) -> Option<&DispatchError> {
        match self {
            CallError::Dispatch(err) => Some(err),
            CallError::Candidate(_) => None,
        }
    }
}
