#![deny(
    unsafe_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]
//! Annotation comments for code generators.
//!
//! An annotation is a comment such as
//! `// +gen * slice:"Where,Select[int]"`. [`parse`] turns it into an
//! [`Annotation`], asking an [`Evaluator`] for every type parameter. A
//! [`TemplateSet`] then picks, for each tag value, the template whose
//! [`Constraint`]s the type satisfies.

mod constraint;
mod error;
pub mod lexer;
mod parser;
mod printer;
mod render;
mod tag;
mod template;
mod types;

pub use constraint::Constraint;
pub use error::{
    ConstraintError, EvaluationError, RenderError, ResolveError, SyntaxError, SyntaxErrorKind,
    TemplateSyntaxError,
};
pub use lexer::{Item, ItemKind, Lexer, lex};
pub use parser::parse;
pub use printer::{CommentPrinter, Printer, Punct, ToTokens};
pub use render::RenderableTemplate;
pub use tag::{Annotation, Tag, TagValue, WILDCARD};
pub use template::{Helper, Template, TemplateSet, TemplateSetBuilder};
pub use types::{Capabilities, Evaluator, Pointer, Type, TypeTable};
