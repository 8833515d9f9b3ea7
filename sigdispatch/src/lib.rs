//! Runtime signature dispatch.
//!
//! Register several implementations under one logical name, each with its
//! own parameter list and optional type constraints; at call time the
//! candidates are evaluated in registration order and the first one whose
//! signature and constraints accept the arguments is invoked. If none
//! accepts, the composed [`DispatchError`] lists the received arguments and
//! every candidate's rejection reasons, in registration order.
//!
//! Candidates are never ranked by specificity — declaration order is the
//! only tie-breaker, which keeps dispatch deterministic and diagnostics
//! reproducible.
//!
//! # Example
//!
//! ```
//! use sigdispatch::{Args, Candidate, Dispatcher, Parameter, Signature, TypeTag, Value};
//!
//! let by_int = Signature::new(vec![
//!     Parameter::positional("x").with_constraint(TypeTag::Int),
//! ])
//! .unwrap();
//! let by_pair = Signature::new(vec![
//!     Parameter::positional("x"),
//!     Parameter::positional("y"),
//! ])
//! .unwrap();
//!
//! let f = Dispatcher::new("docs", "f", Candidate::new(by_int, |mut bound| {
//!     Ok(bound.take("x").unwrap())
//! }));
//! f.overload(Candidate::new(by_pair, |bound| {
//!     Ok(Value::List(bound.into_iter().map(|(_, v)| v).collect()))
//! }));
//!
//! assert_eq!(f.call(&Args::positional([7])).unwrap(), Value::Int(7));
//! assert_eq!(
//!     f.call(&Args::positional([1, 2])).unwrap(),
//!     Value::list([1, 2]),
//! );
//! assert!(f.call(&Args::new()).is_err());
//! ```
//!
//! # Crate Structure
//!
//! - [`value`] - Runtime values and the callable value type
//! - [`signature`] - Validated parameter lists
//! - [`constraint`] - Type constraints and the matcher
//! - [`dispatch`] - Binding, evaluation, tables, composed errors
//! - [`registry`] - Dispatcher handles and the scoped registry

pub mod constraint;
pub mod dispatch;
pub mod registry;
pub mod signature;
pub mod value;

pub use constraint::{CustomConstraint, Mismatch, PathStep, TypeConstraint, TypeTag};

pub use dispatch::{
    Args,
    BindingError,
    BoundArgs,
    CallError,
    Candidate,
    CandidateFn,
    DispatchError,
    DispatchTable,
    TypeMismatch,
};

pub use registry::{Dispatcher, Registry};

pub use signature::{ParamKind, Parameter, Signature, SignatureError};

pub use value::{CandidateError, FnValue, Value};
