//! First-match dispatch over registered candidates.
//!
//! This module implements the call-time half of the crate: binding an
//! argument pack against one candidate's signature, type-checking the bound
//! values, and walking a table's candidates in registration order until one
//! accepts.
//!
//! # Algorithm Overview
//!
//! 1. **Bind**: resolve positional/keyword arguments against the candidate's
//!    parameter list ([`bind`]); failure rejects the candidate outright.
//! 2. **Check**: run every bound constrained parameter through the type
//!    matcher, per element for variadics ([`evaluate`]).
//! 3. **Select**: the first accepting candidate is invoked with its bound
//!    values; later candidates are never evaluated.
//! 4. **Compose**: if every candidate rejects, the per-candidate failures
//!    become one [`DispatchError`], in registration order.
//!
//! Candidates are never ranked by specificity: registration order is the
//! only order.
//!
//! # Module Structure
//!
//! - [`bind`] - Argument packs and arity/name binding
//! - [`evaluate`] - Per-candidate evaluation (bind + type check)
//! - [`result`] - Match results and composed errors
//! - [`table`] - Candidate tables and first-match invocation

mod bind;
mod evaluate;
mod result;
mod table;


pub use bind::{bind, Args, BindingError, BoundArgs};

pub use evaluate::evaluate;

pub use result::{
    CallError,
    CandidateFailure,
    DispatchError,
    MatchResult,
    RejectReason,
    TypeMismatch,
};

pub use table::{Candidate, CandidateFn, DispatchTable};
