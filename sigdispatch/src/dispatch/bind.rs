//! Argument-to-parameter binding.
//!
//! Binding is purely arity/name resolution: positional arguments are
//! consumed left-to-right, leftover parameters are filled by keyword, and
//! variadic parameters absorb the excess. Type constraints are never
//! consulted here.

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::signature::{ParamKind, Signature};
use crate::value::Value;

/// A call-site argument pack: positional values plus keyword values in call
/// order.
#[derive(Debug, Clone, Default)]
pub struct Args {
    positional: Vec<Value>,
    keyword: IndexMap<String, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// An argument pack of positional values.
    pub fn positional<I>(values: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            keyword: IndexMap::new(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a keyword argument. Call order is preserved in diagnostics.
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.insert(name.into(), value.into());
        self
    }

    pub fn positional_args(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword_args(&self) -> &IndexMap<String, Value> {
        &self.keyword
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }
}

impl fmt::Display for Args {
    /// Renders the literal "arguments received" line: `1, 2, b='x'`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for value in &self.positional {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
            first = false;
        }
        for (name, value) in &self.keyword {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{name}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// Why a signature could not bind an argument pack. Internal to a single
/// candidate evaluation; always folded into the table-level diagnostic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// Excess positional arguments and no variadic-positional parameter.
    #[error("too many positional arguments")]
    TooManyPositional,

    /// A keyword argument matches no parameter and no variadic-keyword
    /// parameter exists.
    #[error("got an unexpected keyword argument '{0}'")]
    UnknownKeyword(String),

    /// A required parameter was left unfilled.
    #[error("missing a required argument: '{0}'")]
    MissingRequired(String),

    /// A keyword argument names a parameter already filled positionally.
    #[error("multiple values for argument '{0}'")]
    TooManyKeyword(String),

    /// A keyword argument names a positional-only parameter that no
    /// variadic-keyword parameter can absorb.
    #[error("positional-only argument '{0}' passed as keyword")]
    ArityMismatch(String),
}

/// The parameter-name → value mapping a candidate body receives, in
/// declaration order.
///
/// Variadic-positional parameters always appear, bound to a (possibly
/// empty) list; variadic-keyword parameters likewise bind to a map.
/// Defaulted parameters the call did not supply are absent — supplying the
/// default value is the candidate body's concern.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArgs {
    values: IndexMap<String, Value>,
}

impl BoundArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Remove and return a bound value, preserving the order of the rest.
    pub fn take(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for BoundArgs {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Bind an argument pack against a signature.
///
/// Positional arguments fill positional-only and positional-or-keyword
/// parameters in declaration order; a variadic-positional parameter absorbs
/// the excess. Remaining parameters are filled from keyword arguments by
/// name; a variadic-keyword parameter absorbs the unmatched rest.
pub fn bind(signature: &Signature, args: &Args) -> Result<BoundArgs, BindingError> {
    let positional = args.positional_args();
    let keyword = args.keyword_args();

    if positional.len() > signature.positional_capacity() && signature.var_positional().is_none() {
        return Err(BindingError::TooManyPositional);
    }

    let has_var_keyword = signature.var_keyword().is_some();
    let mut bound = IndexMap::with_capacity(signature.params().len());
    let mut consumed: FxHashSet<&str> = FxHashSet::default();
    let mut next_positional = 0usize;

    for param in signature.params() {
        match param.kind() {
            ParamKind::PositionalOnly => {
                // The parameter itself is never fillable by name, but its
                // name stays available to a variadic-keyword parameter.
                if keyword.contains_key(param.name()) && !has_var_keyword {
                    return Err(BindingError::ArityMismatch(param.name().to_string()));
                }
                if next_positional < positional.len() {
                    bound.insert(param.name().to_string(), positional[next_positional].clone());
                    next_positional += 1;
                } else if !param.has_default() {
                    return Err(BindingError::MissingRequired(param.name().to_string()));
                }
            }
            ParamKind::PositionalOrKeyword => {
                if next_positional < positional.len() {
                    if keyword.contains_key(param.name()) {
                        return Err(BindingError::TooManyKeyword(param.name().to_string()));
                    }
                    bound.insert(param.name().to_string(), positional[next_positional].clone());
                    next_positional += 1;
                } else if let Some(value) = keyword.get(param.name()) {
                    bound.insert(param.name().to_string(), value.clone());
                    consumed.insert(param.name());
                } else if !param.has_default() {
                    return Err(BindingError::MissingRequired(param.name().to_string()));
                }
            }
            ParamKind::VarPositional => {
                let rest = positional[next_positional..].to_vec();
                next_positional = positional.len();
                bound.insert(param.name().to_string(), Value::List(rest));
            }
            ParamKind::KeywordOnly => {
                if let Some(value) = keyword.get(param.name()) {
                    bound.insert(param.name().to_string(), value.clone());
                    consumed.insert(param.name());
                } else if !param.has_default() {
                    return Err(BindingError::MissingRequired(param.name().to_string()));
                }
            }
            ParamKind::VarKeyword => {
                let rest: IndexMap<String, Value> = keyword
                    .iter()
                    .filter(|(name, _)| !consumed.contains(name.as_str()))
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect();
                bound.insert(param.name().to_string(), Value::Map(rest));
            }
        }
    }

    if !has_var_keyword {
        if let Some(unknown) = keyword.keys().find(|name| !consumed.contains(name.as_str())) {
            return Err(BindingError::UnknownKeyword(unknown.clone()));
        }
    }

    Ok(BoundArgs { values: bound })
}
