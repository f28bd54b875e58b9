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
//! Annotation-driven code generation support.
//!
//! Re-exports the annotation language and template resolver from
//! `typegen-core`, and adds [`Package`] for collecting annotated types
//! from a set of source files.

mod config;
mod package;

pub use config::Config;
pub use package::{
    AnnotatedType, Comment, Declaration, Error, LoadOutcome, Package, SourceFile, find_annotation,
};
pub use typegen_core::*;
