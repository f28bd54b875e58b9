//! Collecting annotated types from parsed source files.
//!
//! The kit does not read or parse host-language sources itself. Callers
//! hand over each file's text and its declarations with their doc
//! comments; [`Package::load`] finds the annotations, parses them and
//! evaluates the annotated types.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};
use typegen_core::{EvaluationError, Evaluator, SyntaxError, Tag, Type, parse};

use crate::Config;

/// One comment line attached to a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    /// Byte offset of `text` in its file's source.
    pub offset: usize,
}

impl Comment {
    pub fn new(text: impl Into<String>, offset: usize) -> Self {
        Self {
            text: text.into(),
            offset,
        }
    }
}

/// A named type declaration and its doc comment lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub doc: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub source: String,
    pub declarations: Vec<Declaration>,
}

/// The first comment in `doc` carrying `directive`.
///
/// Leading slashes and spaces are ignored, and the directive must be
/// followed by a space or the end of the line: `+tested` does not carry
/// `+test`.
pub fn find_annotation<'d>(doc: &'d [Comment], directive: &str) -> Option<&'d Comment> {
    doc.iter().find(|comment| {
        comment
            .text
            .trim_start_matches(['/', ' '])
            .strip_prefix(directive)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
    })
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An annotation failed to parse.
    #[error("{}:{line}:{column}: {source}", path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
        #[source]
        source: SyntaxError,
    },

    /// An annotated declaration's type could not be evaluated.
    #[error("{}: {name}: {source}", path.display())]
    Evaluation {
        path: PathBuf,
        name: String,
        #[source]
        source: EvaluationError,
    },
}

/// A declaration whose annotation applied.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotatedType {
    pub ty: Type,
    pub tags: Vec<Tag>,
    /// Declared in a test file.
    pub test: bool,
}

impl AnnotatedType {
    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Package {
    pub types: Vec<AnnotatedType>,
}

/// Result of a load that did not abort.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct LoadOutcome {
    pub package: Package,
    /// The first evaluation failure skipped under
    /// [`Config::ignore_evaluation_errors`].
    pub evaluation_error: Option<Error>,
}

impl Package {
    /// Collect every declaration annotated with `directive`, in file and
    /// declaration order.
    ///
    /// A syntax error always aborts. An evaluation error aborts unless
    /// the config says to skip the declaration.
    pub fn load<E>(
        directive: &str,
        files: &[SourceFile],
        evaluator: &E,
        config: &Config,
    ) -> Result<LoadOutcome, Error>
    where
        E: Evaluator + ?Sized,
    {
        let mut package = Package::default();
        let mut evaluation_error = None;

        for file in files {
            if !config.accepts(&file.path) {
                debug!(path = %file.path.display(), "skipping file");
                continue;
            }
            let test = config.is_test_file(&file.path);

            for decl in &file.declarations {
                let Some(comment) = find_annotation(&decl.doc, directive) else {
                    continue;
                };

                let annotation = match parse(&comment.text, directive, evaluator) {
                    Ok(Some(annotation)) => annotation,
                    Ok(None) => continue,
                    Err(err) => return Err(syntax_error(file, err.with_base(comment.offset))),
                };

                let name = format!("{}{}", annotation.pointer, decl.name);
                let ty = match evaluator.evaluate(&name) {
                    Ok(ty) => ty,
                    Err(source) => {
                        let err = Error::Evaluation {
                            path: file.path.clone(),
                            name,
                            source,
                        };
                        if !config.ignore_evaluation_errors {
                            return Err(err);
                        }
                        warn!(error = %err, "skipping declaration");
                        evaluation_error.get_or_insert(err);
                        continue;
                    }
                };

                debug!(path = %file.path.display(), ty = %ty, tags = annotation.tags.len(), "found annotated type");
                package.types.push(AnnotatedType {
                    ty,
                    tags: annotation.tags,
                    test,
                });
            }
        }

        Ok(LoadOutcome {
            package,
            evaluation_error,
        })
    }

    pub fn get(&self, name: &str) -> Option<&AnnotatedType> {
        self.types.iter().find(|annotated| annotated.ty.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn syntax_error(file: &SourceFile, source: SyntaxError) -> Error {
    let (line, column) = line_column(&file.source, source.offset);
    Error::Syntax {
        path: file.path.clone(),
        line,
        column,
        source,
    }
}

/// 1-based line and byte column of `offset` in `source`.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
    let before = &source.as_bytes()[..offset.min(source.len())];
    let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
    let line_start = before
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |pos| pos + 1);
    (line, before.len() - line_start + 1)
}

impl SourceFile {
    pub fn new(path: impl AsRef<Path>, source: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            source: source.into(),
            declarations: Vec::new(),
        }
    }

    /// Declare `name` with the comment lines immediately above `anchor`,
    /// the first occurrence of that text in the source.
    ///
    /// A convenience for tests and simple line-based front ends; real
    /// front ends build [`Declaration`]s from their own syntax trees.
    pub fn declare(mut self, name: impl Into<String>, anchor: &str) -> Self {
        let doc = self
            .source
            .find(anchor)
            .map(|at| comments_above(&self.source, at))
            .unwrap_or_default();
        self.declarations.push(Declaration {
            name: name.into(),
            doc,
        });
        self
    }
}

fn comments_above(source: &str, at: usize) -> Vec<Comment> {
    let mut doc = Vec::new();
    let mut end = source[..at].rfind('\n').unwrap_or(0);

    while end > 0 {
        let start = source[..end].rfind('\n').map_or(0, |pos| pos + 1);
        let line = &source[start..end];
        let trimmed = line.trim_start();
        if !trimmed.starts_with("//") {
            break;
        }
        let offset = start + (line.len() - trimmed.len());
        doc.push(Comment::new(trimmed.trim_end(), offset));
        end = start.saturating_sub(1);
    }

    doc.reverse();
    doc
}
