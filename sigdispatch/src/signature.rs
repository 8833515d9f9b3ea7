//! Candidate signatures: validated parameter lists.
//!
//! A [`Signature`] is pure data, built once at registration time and never
//! mutated. Construction enforces the ordinary parameter-ordering rules so
//! that the binder can assume a well-formed declaration: unique names, kinds
//! in declaration order, at most one variadic of each flavor, and no
//! required positional parameter after a defaulted one.

use std::fmt;

use thiserror::Error;

use crate::constraint::TypeConstraint;

/// How a parameter can be filled at a call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Fillable only by position (`a, /`).
    PositionalOnly,
    /// Fillable by position or by name.
    PositionalOrKeyword,
    /// Absorbs excess positional arguments (`*args`).
    VarPositional,
    /// Fillable only by name (`*, a`).
    KeywordOnly,
    /// Absorbs unmatched keyword arguments (`**kwargs`).
    VarKeyword,
}

impl ParamKind {
    /// Declaration-order rank; a well-formed signature is non-decreasing.
    fn rank(self) -> u8 {
        match self {
            ParamKind::PositionalOnly => 0,
            ParamKind::PositionalOrKeyword => 1,
            ParamKind::VarPositional => 2,
            ParamKind::KeywordOnly => 3,
            ParamKind::VarKeyword => 4,
        }
    }

    /// Whether this kind absorbs a collection rather than a single value.
    pub fn is_variadic(self) -> bool {
        matches!(self, ParamKind::VarPositional | ParamKind::VarKeyword)
    }
}

/// One declared parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    kind: ParamKind,
    has_default: bool,
    constraint: Option<TypeConstraint>,
}

impl Parameter {
    /// A positional-or-keyword parameter, the common case.
    pub fn positional(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::PositionalOrKeyword)
    }

    /// A positional-only parameter.
    pub fn positional_only(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::PositionalOnly)
    }

    /// A keyword-only parameter.
    pub fn keyword_only(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::KeywordOnly)
    }

    /// A variadic-positional parameter (`*args`).
    pub fn var_positional(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::VarPositional)
    }

    /// A variadic-keyword parameter (`**kwargs`).
    pub fn var_keyword(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::VarKeyword)
    }

    /// A parameter of an explicit kind.
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            has_default: false,
            constraint: None,
        }
    }

    /// Mark the parameter as defaulted. Only the presence of a default is
    /// modeled; supplying the actual value is the candidate body's concern.
    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// Attach a type constraint. For variadic parameters the constraint
    /// applies per element.
    pub fn with_constraint(mut self, constraint: impl Into<TypeConstraint>) -> Self {
        self.constraint = Some(constraint.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn has_default(&self) -> bool {
        self.has_default
    }

    pub fn constraint(&self) -> Option<&TypeConstraint> {
        self.constraint.as_ref()
    }
}

/// Malformed parameter list at registration time. Fatal, never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("duplicate parameter name '{0}'")]
    DuplicateName(String),

    #[error("parameter '{0}' is out of declaration order")]
    OutOfOrder(String),

    #[error("second variadic-positional parameter '{0}'")]
    SecondVarPositional(String),

    #[error("second variadic-keyword parameter '{0}'")]
    SecondVarKeyword(String),

    #[error("variadic parameter '{0}' cannot have a default")]
    VariadicDefault(String),

    #[error("non-default parameter '{0}' follows a defaulted parameter")]
    NonDefaultAfterDefault(String),
}

/// A validated, ordered parameter list.
#[derive(Debug, Clone)]
pub struct Signature {
    params: Vec<Parameter>,
}

impl Signature {
    /// Validate and build a signature.
    pub fn new(params: Vec<Parameter>) -> Result<Self, SignatureError> {
        let mut last_rank = 0u8;
        let mut seen_var_positional = false;
        let mut seen_var_keyword = false;
        let mut seen_positional_default = false;

        for (i, param) in params.iter().enumerate() {
            if params[..i].iter().any(|p| p.name == param.name) {
                return Err(SignatureError::DuplicateName(param.name.clone()));
            }

            let rank = param.kind.rank();
            if rank < last_rank {
                return Err(SignatureError::OutOfOrder(param.name.clone()));
            }
            last_rank = rank;

            match param.kind {
                ParamKind::VarPositional => {
                    if seen_var_positional {
                        return Err(SignatureError::SecondVarPositional(param.name.clone()));
                    }
                    seen_var_positional = true;
                }
                ParamKind::VarKeyword => {
                    if seen_var_keyword {
                        return Err(SignatureError::SecondVarKeyword(param.name.clone()));
                    }
                    seen_var_keyword = true;
                }
                _ => {}
            }

            if param.kind.is_variadic() && param.has_default {
                return Err(SignatureError::VariadicDefault(param.name.clone()));
            }

            // Keyword-only parameters may freely mix defaults; the rule only
            // constrains the positional region.
            if matches!(
                param.kind,
                ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword
            ) {
                if param.has_default {
                    seen_positional_default = true;
                } else if seen_positional_default {
                    return Err(SignatureError::NonDefaultAfterDefault(param.name.clone()));
                }
            }
        }

        Ok(Self { params })
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    /// The variadic-positional parameter, if declared.
    pub fn var_positional(&self) -> Option<&Parameter> {
        self.params
            .iter()
            .find(|p| p.kind == ParamKind::VarPositional)
    }

    /// The variadic-keyword parameter, if declared.
    pub fn var_keyword(&self) -> Option<&Parameter> {
        self.params.iter().find(|p| p.kind == ParamKind::VarKeyword)
    }

    /// How many parameters can be filled positionally.
    pub fn positional_capacity(&self) -> usize {
        self.params
            .iter()
            .filter(|p| {
                matches!(
                    p.kind,
                    ParamKind::PositionalOnly | ParamKind::PositionalOrKeyword
                )
            })
            .count()
    }
}

impl fmt::Display for Signature {
    /// Renders the declaration-style form used in diagnostics:
    /// `(a, /, b: int = ..., *args, c, **kw)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last_positional_only = self
            .params
            .iter()
            .rposition(|p| p.kind == ParamKind::PositionalOnly);
        let mut star_emitted = self
            .params
            .iter()
            .any(|p| p.kind == ParamKind::VarPositional);

        let mut pieces = Vec::with_capacity(self.params.len() + 2);
        for (i, param) in self.params.iter().enumerate() {
            if param.kind == ParamKind::KeywordOnly && !star_emitted {
                pieces.push("*".to_string());
                star_emitted = true;
            }

            let prefix = match param.kind {
                ParamKind::VarPositional => "*",
                ParamKind::VarKeyword => "**",
                _ => "",
            };
            let mut piece = format!("{prefix}{}", param.name);
            if let Some(constraint) = &param.constraint {
                piece.push_str(&format!(": {constraint}"));
            }
            if param.has_default {
                piece.push_str(" = ...");
            }
            pieces.push(piece);

            if Some(i) == last_positional_only {
                pieces.push("/".to_string());
            }
        }

        write!(f, "({})", pieces.join(", "))
    }
}
