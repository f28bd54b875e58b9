//! Error values produced by the core.
//!
//! Every failure in lexing, parsing, constraint checking, resolution and
//! rendering is returned to the immediate caller. Nothing here logs or
//! panics; callers decide whether an error aborts a generation run.

use thiserror::Error;

/// A failed lookup of a type name by an [`Evaluator`](crate::Evaluator).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct EvaluationError {
    /// The name that could not be evaluated.
    pub name: String,
    pub message: String,
}

impl EvaluationError {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The error returned for a name the evaluator has never heard of.
    pub fn undefined(name: impl Into<String>) -> Self {
        let name = name.into();
        let message = format!("undefined: {}", name);
        Self { name, message }
    }
}

/// What went wrong while reading an annotation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// The lexer rejected the input; the message comes from the lexer.
    #[error("{0}")]
    Lex(String),

    #[error("second pointer declaration")]
    SecondPointer,

    #[error("pointer declaration must precede tags")]
    PointerAfterTags,

    #[error("duplicate tag {0:?}")]
    DuplicateTag(String),

    #[error("negation must precede tag values")]
    MisplacedNegation,

    #[error("unexpected '{0}'")]
    Unexpected(String),

    #[error("expected a close quote")]
    ExpectedCloseQuote,

    #[error("{0}")]
    Evaluation(#[from] EvaluationError),
}

/// The first error met while parsing an annotation.
///
/// `offset` is a byte offset relative to the start of the annotation text.
/// Callers that know where the text lives in a larger file shift it with
/// [`SyntaxError::with_base`] and translate it to a line and column
/// themselves.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub offset: usize,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Shift the offset by the position of the annotation in its file.
    pub fn with_base(mut self, base: usize) -> Self {
        self.offset = self.offset.saturating_add(base);
        self
    }
}

/// A type lacking a capability required by a [`Constraint`](crate::Constraint).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("{0} must be comparable (i.e. supports == and != operators)")]
    NotComparable(String),

    #[error("{0} must be numeric")]
    NotNumeric(String),

    #[error("{0} must be ordered (i.e. supports > and < operators)")]
    NotOrdered(String),
}

/// A template body that does not compile.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TemplateSyntaxError {
    pub message: String,
    /// 1-based line in the body, when known.
    pub line: Option<usize>,
}

/// Failure to pick a template for a type and tag value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{0} is unknown")]
    Unknown(String),

    #[error("{name} requires {expected} type parameters")]
    Arity { name: String, expected: usize },

    #[error("cannot implement {value} on {ty}: {source}")]
    Constraint {
        value: String,
        ty: String,
        #[source]
        source: ConstraintError,
    },

    #[error("template {name}: {source}")]
    Template {
        name: String,
        #[source]
        source: TemplateSyntaxError,
    },
}

/// Failure while rendering a compiled template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("{template}: {value} has no type parameters")]
    MissingTypeParameter { template: String, value: String },

    #[error("{template}: {message}")]
    Template { template: String, message: String },
}
