//! Tokenizer for annotation comments.
//!
//! An annotation is read in four modes, each with its own `logos` token
//! set: the comment prefix and directive, the tag clauses, the quoted value
//! list, and a bracketed type-parameter list. The underlying lexer is
//! morphed between modes so spans stay relative to the start of the text.
//!
//! ```text
//! // +gen * slice:"-Where,Select[[]string, int]" stringer
//! ^^^ ^^^^ ^ ^^^^^^^^^^^^^^^ ^^^^^^^^^^^^^^^^^^^^ ^^^^^^^^
//! prefix   |  tag   values      type parameters    tag
//!   directive, pointer
//! ```
//!
//! Separators (whitespace, commas, brackets) are consumed here and never
//! reach the parser. The sequence ends with exactly one [`ItemKind::Eof`]
//! or [`ItemKind::Error`] item.

use core::fmt;
use std::borrow::Cow;

use logos::Logos;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Eof,
    /// The item text is a human-readable message.
    Error,
    CommentPrefix,
    Directive,
    Pointer,
    TagName,
    ColonQuote,
    TagValue,
    TypeParameter,
    Minus,
    CloseQuote,
}

/// One token of an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<'a> {
    pub kind: ItemKind,
    pub text: Cow<'a, str>,
    /// Byte offset into the annotation text.
    pub offset: usize,
}

impl<'a> Item<'a> {
    fn new(kind: ItemKind, text: &'a str, offset: usize) -> Self {
        Self {
            kind,
            text: Cow::Borrowed(text),
            offset,
        }
    }

    pub(crate) fn eof(offset: usize) -> Self {
        Self::new(ItemKind::Eof, "", offset)
    }

    fn error(message: String, offset: usize) -> Self {
        Self {
            kind: ItemKind::Error,
            text: Cow::Owned(message),
            offset,
        }
    }

    /// True for the item that ends the sequence.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, ItemKind::Eof | ItemKind::Error)
    }
}

impl fmt::Display for Item<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ItemKind::Eof => f.write_str("EOF"),
            _ => f.write_str(&self.text),
        }
    }
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum PrefixToken {
    #[regex(r"[/* \t]+")]
    CommentPrefix,

    #[regex(r"\+?[\p{L}_][\p{L}\p{N}_]*")]
    Directive,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseToken {
    #[regex(r"[ \t\r\n]+")]
    Space,

    #[token("*")]
    Star,

    /// Closes a block comment; only trailing whitespace may follow.
    #[regex(r"\*/[ \t\r\n]*")]
    CommentEnd,

    #[token(":\"")]
    ColonQuote,

    #[token(":")]
    Colon,

    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Ident,

    #[regex(r"[0-9][\p{L}\p{N}_]*")]
    LeadingDigit,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum ValueToken {
    #[regex(r"[ \t\r\n,]+")]
    Separator,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("\"")]
    CloseQuote,

    #[token("[")]
    OpenBracket,

    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Ident,

    #[regex(r"[0-9][\p{L}\p{N}_]*")]
    LeadingDigit,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum ParamToken {
    #[regex(r"[ \t\r\n,]+")]
    Separator,

    #[token("]")]
    CloseBracket,

    // `[]` and `*` prefixes make slice and pointer types: `[]*pkg.Foo`
    #[regex(r"(\[\]|\*)*[\p{L}_][\p{L}\p{N}_.]*")]
    Name,

    #[regex(r"(\[\]|\*)*[0-9][\p{L}\p{N}_.]*")]
    LeadingDigit,
}

/// The last significant thing seen while lexing tag clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clause {
    Space,
    Directive,
    Pointer,
    TagName,
    CloseQuote,
}

/// Where the value lexer stands relative to the last value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Value {
    Separated,
    /// Directly after an identifier; a type-parameter list may open.
    Open,
    /// Directly after `]` or `*`; only a separator or the quote may follow.
    Closed,
}

enum Mode<'a> {
    Prefix(logos::Lexer<'a, PrefixToken>),
    Clauses(logos::Lexer<'a, ClauseToken>),
    Values(logos::Lexer<'a, ValueToken>),
    Params(logos::Lexer<'a, ParamToken>),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Clauses,
    Values,
    Params,
}

/// Pull-based lexer over one annotation.
///
/// Single pass; once the terminal item has been returned the iterator is
/// exhausted.
pub struct Lexer<'a> {
    mode: Mode<'a>,
    clause: Clause,
    value: Value,
}

/// Start lexing `text`.
pub fn lex(text: &str) -> Lexer<'_> {
    Lexer {
        mode: Mode::Prefix(PrefixToken::lexer(text)),
        clause: Clause::Directive,
        value: Value::Separated,
    }
}

fn unexpected_char(slice: &str, offset: usize) -> Item<'static> {
    match slice.chars().next() {
        Some(c) => Item::error(format!("unexpected character {:?}", c), offset),
        None => Item::error("unexpected end of input".to_string(), offset),
    }
}

fn leading_digit(slice: &str, offset: usize) -> Item<'static> {
    Item::error(
        format!("identifier cannot begin with a digit: {:?}", slice),
        offset,
    )
}

type Step<'a> = (Option<Item<'a>>, Option<Target>);

fn prefix<'a>(lex: &mut logos::Lexer<'a, PrefixToken>) -> Step<'a> {
    match lex.next() {
        None => (Some(Item::eof(lex.source().len())), None),
        Some(Ok(PrefixToken::CommentPrefix)) => (
            Some(Item::new(ItemKind::CommentPrefix, lex.slice(), lex.span().start)),
            None,
        ),
        Some(Ok(PrefixToken::Directive)) => (
            Some(Item::new(ItemKind::Directive, lex.slice(), lex.span().start)),
            Some(Target::Clauses),
        ),
        Some(Err(())) => (
            Some(Item::error(
                "expected a directive".to_string(),
                lex.span().start,
            )),
            None,
        ),
    }
}

fn clauses<'a>(lex: &mut logos::Lexer<'a, ClauseToken>, last: &mut Clause) -> Step<'a> {
    let Some(token) = lex.next() else {
        return (Some(Item::eof(lex.source().len())), None);
    };
    let (slice, offset) = (lex.slice(), lex.span().start);

    match token {
        Ok(ClauseToken::Space) => {
            *last = Clause::Space;
            (None, None)
        }
        Ok(ClauseToken::CommentEnd) if lex.remainder().is_empty() => {
            (Some(Item::eof(offset)), None)
        }
        Ok(ClauseToken::CommentEnd) => (
            Some(Item::error(format!("unexpected {:?}", slice.trim_end()), offset)),
            None,
        ),
        Ok(ClauseToken::Star | ClauseToken::Ident) if *last != Clause::Space => (
            Some(Item::error(
                format!("expected a space before {:?}", slice),
                offset,
            )),
            None,
        ),
        Ok(ClauseToken::Star) => {
            *last = Clause::Pointer;
            (Some(Item::new(ItemKind::Pointer, slice, offset)), None)
        }
        Ok(ClauseToken::Ident) => {
            *last = Clause::TagName;
            (Some(Item::new(ItemKind::TagName, slice, offset)), None)
        }
        Ok(ClauseToken::ColonQuote) if *last == Clause::TagName => (
            Some(Item::new(ItemKind::ColonQuote, slice, offset)),
            Some(Target::Values),
        ),
        Ok(ClauseToken::ColonQuote) => (
            Some(Item::error(format!("unexpected {:?}", slice), offset)),
            None,
        ),
        Ok(ClauseToken::Colon) => (
            Some(Item::error("expected a quote after ':'".to_string(), offset)),
            None,
        ),
        Ok(ClauseToken::LeadingDigit) => (Some(leading_digit(slice, offset)), None),
        Err(()) => (Some(unexpected_char(slice, offset)), None),
    }
}

fn values<'a>(lex: &mut logos::Lexer<'a, ValueToken>, state: &mut Value) -> Step<'a> {
    let Some(token) = lex.next() else {
        // the parser reports the missing quote
        return (Some(Item::eof(lex.source().len())), None);
    };
    let (slice, offset) = (lex.slice(), lex.span().start);

    match token {
        Ok(ValueToken::Separator) => {
            *state = Value::Separated;
            (None, None)
        }
        Ok(ValueToken::Minus) => {
            *state = Value::Separated;
            (Some(Item::new(ItemKind::Minus, slice, offset)), None)
        }
        Ok(ValueToken::CloseQuote) => (
            Some(Item::new(ItemKind::CloseQuote, slice, offset)),
            Some(Target::Clauses),
        ),
        Ok(ValueToken::Star | ValueToken::Ident) if *state == Value::Closed => (
            Some(Item::error(
                format!("expected a separator before {:?}", slice),
                offset,
            )),
            None,
        ),
        Ok(ValueToken::Star) => {
            *state = Value::Closed;
            (Some(Item::new(ItemKind::TagValue, slice, offset)), None)
        }
        Ok(ValueToken::Ident) => {
            *state = Value::Open;
            (Some(Item::new(ItemKind::TagValue, slice, offset)), None)
        }
        Ok(ValueToken::OpenBracket) if *state == Value::Open => (None, Some(Target::Params)),
        Ok(ValueToken::OpenBracket) => (
            Some(Item::error("unexpected '['".to_string(), offset)),
            None,
        ),
        Ok(ValueToken::LeadingDigit) => (Some(leading_digit(slice, offset)), None),
        Err(()) => (Some(unexpected_char(slice, offset)), None),
    }
}

fn params<'a>(lex: &mut logos::Lexer<'a, ParamToken>) -> Step<'a> {
    let Some(token) = lex.next() else {
        return (
            Some(Item::error(
                "expected a close bracket".to_string(),
                lex.source().len(),
            )),
            None,
        );
    };
    let (slice, offset) = (lex.slice(), lex.span().start);

    match token {
        Ok(ParamToken::Separator) => (None, None),
        Ok(ParamToken::Name) => (Some(Item::new(ItemKind::TypeParameter, slice, offset)), None),
        Ok(ParamToken::CloseBracket) => (None, Some(Target::Values)),
        Ok(ParamToken::LeadingDigit) => (Some(leading_digit(slice, offset)), None),
        Err(()) if slice.starts_with('"') => (
            Some(Item::error("expected a close bracket".to_string(), offset)),
            None,
        ),
        Err(()) => (Some(unexpected_char(slice, offset)), None),
    }
}

impl<'a> Lexer<'a> {
    fn switch(&mut self, target: Target) {
        self.mode = match (core::mem::replace(&mut self.mode, Mode::Done), target) {
            (Mode::Prefix(lex), Target::Clauses) => {
                self.clause = Clause::Directive;
                Mode::Clauses(lex.morph())
            }
            (Mode::Values(lex), Target::Clauses) => {
                self.clause = Clause::CloseQuote;
                Mode::Clauses(lex.morph())
            }
            (Mode::Clauses(lex), Target::Values) => {
                self.value = Value::Separated;
                Mode::Values(lex.morph())
            }
            (Mode::Params(lex), Target::Values) => {
                self.value = Value::Closed;
                Mode::Values(lex.morph())
            }
            (Mode::Values(lex), Target::Params) => Mode::Params(lex.morph()),
            (mode, _) => mode,
        };
    }

    /// The next item, or `None` once the terminal item has been returned.
    pub fn next_item(&mut self) -> Option<Item<'a>> {
        loop {
            let (item, target) = match &mut self.mode {
                Mode::Prefix(lex) => prefix(lex),
                Mode::Clauses(lex) => clauses(lex, &mut self.clause),
                Mode::Values(lex) => values(lex, &mut self.value),
                Mode::Params(lex) => params(lex),
                Mode::Done => return None,
            };

            if let Some(target) = target {
                self.switch(target);
            }

            if let Some(item) = item {
                if item.is_terminal() {
                    self.mode = Mode::Done;
                }
                return Some(item);
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Item<'a>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.next_item()
    }
}

impl core::iter::FusedIterator for Lexer<'_> {}
