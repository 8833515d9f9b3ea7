//! Type constraints and the runtime matcher.
//!
//! A constraint is either a simple type token, a parametrized container
//! (`list[int]`, `map[str]`, arbitrarily nested), or a user-supplied
//! [`CustomConstraint`]. Matching is structural: a value satisfies a simple
//! constraint iff its runtime tag equals the declared tag. There is no
//! subtype relation between tags — in particular `bool` never satisfies
//! `int` (see the policy note in [`crate::value`]).
//!
//! Container checks recurse per element and stop at the first failing
//! element; the resulting [`Mismatch`] carries the full index path so the
//! diagnostic can say `type of x[0] must be int; got str instead`.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// The simple type tokens a constraint can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    Int,
    Float,
    Bool,
    Str,
    List,
    Map,
    Unit,
    Fn,
}

impl TypeTag {
    /// The token as it appears in constraint and diagnostic text.
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Float => "float",
            TypeTag::Bool => "bool",
            TypeTag::Str => "str",
            TypeTag::List => "list",
            TypeTag::Map => "map",
            TypeTag::Unit => "unit",
            TypeTag::Fn => "fn",
        }
    }

    /// The indefinite form used when an outer container type rejects
    /// (`type of x must be a list; got str instead`).
    fn indefinite(self) -> String {
        format!("a {}", self.name())
    }

    fn matches(self, value: &Value) -> bool {
        self.name() == value.type_name()
    }
}

/// One step into a nested container, for diagnostic paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
    /// List element position.
    Index(usize),
    /// Map key.
    Key(String),
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Index(i) => write!(f, "[{i}]"),
            PathStep::Key(k) => write!(f, "['{k}']"),
        }
    }
}

/// Why a value failed a constraint: what was expected, what arrived, and
/// where inside the value (empty path = the value itself).
#[derive(Debug, Clone, PartialEq)]
pub struct Mismatch {
    pub expected: String,
    pub actual: &'static str,
    pub path: Vec<PathStep>,
}

impl Mismatch {
    fn at(expected: String, actual: &'static str) -> Self {
        Self {
            expected,
            actual,
            path: Vec::new(),
        }
    }

    fn nested(step: PathStep, mut inner: Mismatch) -> Self {
        inner.path.insert(0, step);
        inner
    }
}

/// Capability interface for user-defined constraint kinds: can this value
/// satisfy me? Implementations plug into the matcher without touching its
/// core loop.
pub trait CustomConstraint: Send + Sync {
    /// Whether `value` satisfies the constraint.
    fn accepts(&self, value: &Value) -> bool;

    /// Short description of what the constraint expects, for diagnostics
    /// and signature rendering.
    fn expected(&self) -> String;
}

/// A declared type constraint. Structurally immutable once attached to a
/// parameter.
#[derive(Clone)]
pub enum TypeConstraint {
    /// A bare type token. `List`/`Map` here accept any list/map.
    Simple(TypeTag),
    /// A container token with per-element constraints. For `List` the first
    /// parameter constrains every element; for `Map` the last parameter
    /// constrains every value (keys are always strings).
    Parametrized {
        container: TypeTag,
        params: Vec<TypeConstraint>,
    },
    /// A user-defined constraint kind.
    Custom(Arc<dyn CustomConstraint>),
}

impl TypeConstraint {
    /// `list[elem]`.
    pub fn list_of(elem: TypeConstraint) -> Self {
        TypeConstraint::Parametrized {
            container: TypeTag::List,
            params: vec![elem],
        }
    }

    /// `map[value]`.
    pub fn map_of(value: TypeConstraint) -> Self {
        TypeConstraint::Parametrized {
            container: TypeTag::Map,
            params: vec![value],
        }
    }

    /// Wrap a user-defined constraint.
    pub fn custom<C>(constraint: C) -> Self
    where
        C: CustomConstraint + 'static,
    {
        TypeConstraint::Custom(Arc::new(constraint))
    }

    /// Check `value` against this constraint.
    ///
    /// Containers recurse per element and report only the first failing
    /// element, with the full nested path in the returned [`Mismatch`].
    pub fn check(&self, value: &Value) -> Result<(), Mismatch> {
        match self {
            TypeConstraint::Simple(tag) => {
                if tag.matches(value) {
                    Ok(())
                } else {
                    Err(Mismatch::at(tag.name().to_string(), value.type_name()))
                }
            }
            TypeConstraint::Parametrized { container, params } => match (container, value) {
                (TypeTag::List, Value::List(items)) => {
                    let Some(elem) = params.first() else {
                        return Ok(());
                    };
                    for (i, item) in items.iter().enumerate() {
                        if let Err(inner) = elem.check(item) {
                            return Err(Mismatch::nested(PathStep::Index(i), inner));
                        }
                    }
                    Ok(())
                }
                (TypeTag::Map, Value::Map(entries)) => {
                    let Some(val) = params.last() else {
                        return Ok(());
                    };
                    for (key, entry) in entries {
                        if let Err(inner) = val.check(entry) {
                            return Err(Mismatch::nested(PathStep::Key(key.clone()), inner));
                        }
                    }
                    Ok(())
                }
                (tag, _) => {
                    if tag.matches(value) {
                        Ok(())
                    } else {
                        Err(Mismatch::at(tag.indefinite(), value.type_name()))
                    }
                }
            },
            TypeConstraint::Custom(custom) => {
                if custom.accepts(value) {
                    Ok(())
                } else {
                    Err(Mismatch::at(custom.expected(), value.type_name()))
                }
            }
        }
    }
}

impl fmt::Display for TypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeConstraint::Simple(tag) => write!(f, "{}", tag.name()),
            TypeConstraint::Parametrized { container, params } => {
                write!(f, "{}[", container.name())?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, "]")
            }
            TypeConstraint::Custom(custom) => write!(f, "{}", custom.expected()),
        }
    }
}

impl fmt::Debug for TypeConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeConstraint({self})")
    }
}

impl From<TypeTag> for TypeConstraint {
    fn from(tag: TypeTag) -> Self {
        TypeConstraint::Simple(tag)
    }
}
