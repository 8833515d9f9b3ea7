//! Runtime values carried through dispatch.
//!
//! Every argument, bound parameter, and candidate return travels as a
//! [`Value`]. The variant set is deliberately small: the primitives the
//! matcher can name, one ordered container, one string-keyed container,
//! and a type-erased callable so a candidate body can hand back another
//! callable.
//!
//! # Bool/Int policy
//!
//! `Bool` and `Int` are unrelated types. A `Bool` value never satisfies an
//! `int` constraint and vice versa — the distinct variants make the policy
//! structural rather than a special case in the matcher.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

/// Error type a callable body may return. Dispatch never inspects it; it is
/// passed through to the caller unchanged.
pub type CandidateError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A runtime value.
#[derive(Debug, Clone)]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit float.
    Float(f64),
    /// Boolean. Not an integer (see module docs).
    Bool(bool),
    /// UTF-8 string.
    Str(String),
    /// Ordered, heterogeneous sequence.
    List(Vec<Value>),
    /// String-keyed mapping, insertion-ordered.
    Map(IndexMap<String, Value>),
    /// The no-value value.
    Unit,
    /// A callable value.
    Fn(FnValue),
}

impl Value {
    /// The type token used in diagnostics and matched by simple constraints.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Unit => "unit",
            Value::Fn(_) => "fn",
        }
    }

    /// Build a list value from anything iterable over values.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a map value from key/value pairs, preserving insertion order.
    pub fn map<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Unit, Value::Unit) => true,
            (Value::Fn(a), Value::Fn(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    /// Renders the literal form used in the "arguments received" diagnostic
    /// line: strings single-quoted, lists bracketed, maps braced.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "'{s}'"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{key}': {value}")?;
                }
                write!(f, "}}")
            }
            Value::Unit => write!(f, "()"),
            Value::Fn(_) => write!(f, "<fn>"),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(i64::from(n))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

impl From<FnValue> for Value {
    fn from(f: FnValue) -> Self {
        Value::Fn(f)
    }
}

/// A type-erased callable value.
///
/// Two `FnValue`s compare equal iff they share the same allocation; there is
/// no structural equality for closures.
#[derive(Clone)]
pub struct FnValue {
    inner: Arc<dyn Fn(Vec<Value>) -> Result<Value, CandidateError> + Send + Sync>,
}

impl FnValue {
    /// Wrap a closure as a callable value.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Vec<Value>) -> Result<Value, CandidateError> + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Call the wrapped closure.
    pub fn invoke(&self, args: Vec<Value>) -> Result<Value, CandidateError> {
        (self.inner)(args)
    }
}

impl fmt::Debug for FnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValue").finish_non_exhaustive()
    }
}

impl PartialEq for FnValue {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
