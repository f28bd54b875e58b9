//! Recursive-descent parser for annotations.

use std::collections::HashSet;

use crate::lexer::{Item, ItemKind, Lexer, lex};
use crate::{Annotation, Evaluator, Pointer, SyntaxError, SyntaxErrorKind, Tag, TagValue, Type};

/// Two-token lookahead over the lexer.
///
/// Supports one token of backtracking, which the parser needs when a
/// type-parameter list may or may not follow a tag value.
struct Cursor<'a> {
    lexer: Lexer<'a>,
    token: [Item<'a>; 2],
    peek_count: usize,
    end: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lexer: lex(text),
            token: [Item::eof(0), Item::eof(0)],
            peek_count: 0,
            end: text.len(),
        }
    }

    fn pull(&mut self) -> Item<'a> {
        self.lexer
            .next_item()
            .unwrap_or_else(|| Item::eof(self.end))
    }

    fn next(&mut self) -> Item<'a> {
        if self.peek_count > 0 {
            self.peek_count -= 1;
        } else {
            self.token[0] = self.pull();
        }
        self.token[self.peek_count].clone()
    }

    /// Back the stream up one token.
    fn backup(&mut self) {
        self.peek_count += 1;
    }

    fn peek(&mut self) -> &Item<'a> {
        if self.peek_count == 0 {
            self.token[0] = self.pull();
            self.peek_count = 1;
        }
        &self.token[self.peek_count - 1]
    }
}

fn error(kind: SyntaxErrorKind, item: &Item<'_>) -> SyntaxError {
    SyntaxError::new(kind, item.offset)
}

fn unexpected(item: &Item<'_>) -> SyntaxError {
    error(SyntaxErrorKind::Unexpected(item.to_string()), item)
}

fn lex_error(item: &Item<'_>) -> SyntaxError {
    error(SyntaxErrorKind::Lex(item.text.to_string()), item)
}

struct Parser<'a, 'e, E: ?Sized> {
    cursor: Cursor<'a>,
    evaluator: &'e E,
}

/// Parse one annotation comment.
///
/// Returns `Ok(None)` when the comment carries a directive other than
/// `directive`: the line is simply not meant for this caller. Type
/// parameters are evaluated as they are met; an evaluation failure is
/// reported at the offending parameter.
///
/// ```
/// use typegen_core::{parse, Type, EvaluationError};
///
/// let eval = |name: &str| -> Result<Type, EvaluationError> { Ok(Type::named(name)) };
/// let annotation = parse(r#"// +gen * slice:"Where,Select[int]""#, "+gen", &eval)
///     .unwrap()
///     .unwrap();
///
/// assert!(annotation.pointer.is_set());
/// assert_eq!(annotation.tags[0].values[1].to_string(), "Select[int]");
/// ```
pub fn parse<E>(
    text: &str,
    directive: &str,
    evaluator: &E,
) -> Result<Option<Annotation>, SyntaxError>
where
    E: Evaluator + ?Sized,
{
    Parser {
        cursor: Cursor::new(text),
        evaluator,
    }
    .annotation(directive)
}

impl<E: Evaluator + ?Sized> Parser<'_, '_, E> {
    fn annotation(&mut self, directive: &str) -> Result<Option<Annotation>, SyntaxError> {
        let mut pointer = Pointer(false);
        let mut tags: Vec<Tag> = Vec::new();
        let mut seen = HashSet::new();
        let mut applicable = false;

        loop {
            let item = self.cursor.next();
            match item.kind {
                ItemKind::Eof => break,
                ItemKind::Error => return Err(lex_error(&item)),
                ItemKind::CommentPrefix => continue,
                ItemKind::Directive => {
                    if item.text != directive {
                        return Ok(None);
                    }
                    applicable = true;
                }
                ItemKind::Pointer => {
                    if pointer.is_set() {
                        return Err(error(SyntaxErrorKind::SecondPointer, &item));
                    }
                    if !tags.is_empty() {
                        return Err(error(SyntaxErrorKind::PointerAfterTags, &item));
                    }
                    pointer = Pointer(true);
                }
                ItemKind::TagName => {
                    let mut tag = Tag::new(item.text.as_ref());

                    if !seen.insert(tag.name.clone()) {
                        return Err(error(SyntaxErrorKind::DuplicateTag(tag.name), &item));
                    }

                    if self.cursor.peek().kind == ItemKind::ColonQuote {
                        self.cursor.next();
                        let (negated, values) = self.tag_values()?;
                        tag.negated = negated;
                        tag.values = values;
                    }

                    tags.push(tag);
                }
                _ => return Err(unexpected(&item)),
            }
        }

        Ok(applicable.then_some(Annotation { pointer, tags }))
    }

    fn tag_values(&mut self) -> Result<(bool, Vec<TagValue>), SyntaxError> {
        let mut negated = false;
        let mut values = Vec::new();

        loop {
            let item = self.cursor.next();
            match item.kind {
                ItemKind::Error => return Err(lex_error(&item)),
                ItemKind::Eof => return Err(error(SyntaxErrorKind::ExpectedCloseQuote, &item)),
                ItemKind::Minus => {
                    if !values.is_empty() {
                        return Err(error(SyntaxErrorKind::MisplacedNegation, &item));
                    }
                    negated = true;
                }
                ItemKind::TagValue => {
                    let mut value = TagValue::new(item.text.as_ref());
                    if self.cursor.peek().kind == ItemKind::TypeParameter {
                        value.type_parameters = self.type_parameters()?;
                    }
                    values.push(value);
                }
                ItemKind::CloseQuote => return Ok((negated, values)),
                _ => return Err(unexpected(&item)),
            }
        }
    }

    fn type_parameters(&mut self) -> Result<Vec<Type>, SyntaxError> {
        let mut types = Vec::new();

        loop {
            let item = self.cursor.next();
            if item.kind != ItemKind::TypeParameter {
                self.cursor.backup();
                return Ok(types);
            }

            let ty = self
                .evaluator
                .evaluate(&item.text)
                .map_err(|err| error(err.into(), &item))?;
            types.push(ty);
        }
    }
}
