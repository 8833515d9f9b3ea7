//! Candidate evaluation: bind, then type-check the bound values.

use crate::constraint::{Mismatch, PathStep, TypeConstraint};
use crate::signature::{ParamKind, Parameter};
use crate::value::Value;

use super::bind::{bind, Args};
use super::result::{MatchResult, RejectReason, TypeMismatch};
use super::table::Candidate;

/// Evaluate one candidate against an argument pack.
///
/// Binding failures reject the candidate as a whole. When binding succeeds,
/// every bound constrained parameter is checked in declaration order — per
/// element for variadic parameters — and all failing parameters are
/// collected, so the final diagnostic can list every mismatch for this
/// candidate.
pub fn evaluate(candidate: &Candidate, args: &Args) -> MatchResult {
    let bound = match bind(candidate.signature(), args) {
        Ok(bound) => bound,
        Err(err) => return MatchResult::Reject(RejectReason::Binding(err)),
    };

    let mut mismatches = Vec::new();
    for param in candidate.signature().params() {
        let Some(constraint) = param.constraint() else {
            continue;
        };
        let Some(value) = bound.get(param.name()) else {
            // Unfilled defaulted parameter: nothing to check.
            continue;
        };
        if let Some(mismatch) = check_param(param, constraint, value) {
            mismatches.push(TypeMismatch {
                parameter: param.name().to_string(),
                mismatch,
            });
        }
    }

    if mismatches.is_empty() {
        MatchResult::Accept(bound)
    } else {
        MatchResult::Reject(RejectReason::Types(mismatches))
    }
}

/// Check one bound value, per element for variadic parameters. Returns the
/// first failure for this parameter, if any.
fn check_param(param: &Parameter, constraint: &TypeConstraint, value: &Value) -> Option<Mismatch> {
    match (param.kind(), value) {
        (ParamKind::VarPositional, Value::List(items)) => {
            items.iter().enumerate().find_map(|(i, item)| {
                constraint
                    .check(item)
                    .err()
                    .map(|mut m| {
                        m.path.insert(0, PathStep::Index(i));
                        m
                    })
            })
        }
        (ParamKind::VarKeyword, Value::Map(entries)) => {
            entries.iter().find_map(|(key, entry)| {
                constraint
                    .check(entry)
                    .err()
                    .map(|mut m| {
                        m.path.insert(0, PathStep::Key(key.clone()));
                        m
                    })
            })
        }
        _ => constraint.check(value).err(),
    }
}
