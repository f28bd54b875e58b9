//! Printing annotations back to comment text.
//!
//! `parse(&annotation.to_comment(d), d, ..)` gives back an equal
//! annotation whenever the evaluator maps each printed type name to the
//! same type.

use crate::{Annotation, Tag, TagValue, Type};

/// Punctuation of the annotation grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Punct {
    Comma,
    Colon,
    Quote,
    Minus,
    Star,
    OpenBracket,
    CloseBracket,
}

impl Punct {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Comma => ",",
            Self::Colon => ":",
            Self::Quote => "\"",
            Self::Minus => "-",
            Self::Star => "*",
            Self::OpenBracket => "[",
            Self::CloseBracket => "]",
        }
    }
}

/// Text output for [`ToTokens`] implementations.
pub trait Printer: Sized {
    fn buf_mut(&mut self) -> &mut String;

    fn into_string(self) -> String;

    fn punct(&mut self, p: Punct) {
        self.word(p.as_str());
    }

    fn word(&mut self, s: &str) {
        self.buf_mut().push_str(s);
    }

    fn space(&mut self) {
        self.buf_mut().push(' ');
    }

    fn write<T: ToTokens<Printer = Self> + ?Sized>(&mut self, value: &T) {
        value.write(self);
    }

    /// Write `items` with `sep` between them, never after the last.
    fn write_separated<'i, T, I>(&mut self, items: I, sep: Punct)
    where
        T: ToTokens<Printer = Self> + 'i,
        I: IntoIterator<Item = &'i T>,
    {
        for (idx, item) in items.into_iter().enumerate() {
            if idx > 0 {
                self.punct(sep);
            }
            self.write(item);
        }
    }
}

/// Builds a single annotation line.
#[derive(Debug, Default)]
pub struct CommentPrinter {
    buf: String,
}

impl Printer for CommentPrinter {
    fn buf_mut(&mut self) -> &mut String {
        &mut self.buf
    }

    fn into_string(self) -> String {
        self.buf
    }
}

/// Converts parsed values back to annotation text.
pub trait ToTokens {
    type Printer: Printer;

    fn write(&self, printer: &mut Self::Printer);

    fn to_string_formatted(&self) -> String
    where
        Self::Printer: Default,
    {
        let mut printer = Self::Printer::default();
        self.write(&mut printer);
        printer.into_string()
    }
}

impl ToTokens for Type {
    type Printer = CommentPrinter;

    fn write(&self, p: &mut Self::Printer) {
        if self.pointer.is_set() {
            p.punct(Punct::Star);
        }
        p.word(&self.name);
    }
}

impl ToTokens for TagValue {
    type Printer = CommentPrinter;

    fn write(&self, p: &mut Self::Printer) {
        p.word(&self.name);
        if !self.type_parameters.is_empty() {
            p.punct(Punct::OpenBracket);
            p.write_separated(&self.type_parameters, Punct::Comma);
            p.punct(Punct::CloseBracket);
        }
    }
}

impl ToTokens for Tag {
    type Printer = CommentPrinter;

    fn write(&self, p: &mut Self::Printer) {
        p.word(&self.name);
        if self.values.is_empty() && !self.negated {
            return;
        }
        p.punct(Punct::Colon);
        p.punct(Punct::Quote);
        if self.negated {
            p.punct(Punct::Minus);
        }
        p.write_separated(&self.values, Punct::Comma);
        p.punct(Punct::Quote);
    }
}

/// Writes the clauses only; see [`Annotation::to_comment`] for a full line.
impl ToTokens for Annotation {
    type Printer = CommentPrinter;

    fn write(&self, p: &mut Self::Printer) {
        let mut first = true;
        if self.pointer.is_set() {
            p.punct(Punct::Star);
            first = false;
        }
        for tag in &self.tags {
            if !first {
                p.space();
            }
            p.write(tag);
            first = false;
        }
    }
}

impl Annotation {
    /// Print as a line comment introduced by `directive`.
    pub fn to_comment(&self, directive: &str) -> String {
        let mut p = CommentPrinter::default();
        p.word("// ");
        p.word(directive);
        if self.pointer.is_set() || !self.tags.is_empty() {
            p.space();
            p.write(self);
        }
        p.into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EvaluationError, Pointer, parse};

    fn named(name: &str) -> Result<Type, EvaluationError> {
        match name.strip_prefix('*') {
            Some(bare) => Ok(Type::named(bare).with_pointer(true)),
            None => Ok(Type::named(name)),
        }
    }

    fn sample() -> Annotation {
        Annotation {
            pointer: Pointer(true),
            tags: vec![
                Tag::new("foo"),
                Tag::new("bar").with_values(vec![
                    TagValue::new("Select")
                        .with_type_parameters(vec![Type::named("int"), Type::named("Foo").with_pointer(true)]),
                    TagValue::new("Where"),
                ]),
                Tag::new("qux")
                    .negated(true)
                    .with_values(vec![TagValue::new("Sum")]),
            ],
        }
    }

    #[test]
    fn test_print_annotation() {
        insta::assert_snapshot!(
            sample().to_comment("+gen"),
            @r#"// +gen * foo bar:"Select[int,*Foo],Where" qux:"-Sum""#
        );
    }

    #[test]
    fn test_print_bare_directive() {
        assert_eq!(Annotation::default().to_comment("+gen"), "// +gen");
    }

    #[test]
    fn test_print_tag_value() {
        let value = TagValue::new("Select").with_type_parameters(vec![Type::named("[]int")]);
        assert_eq!(value.to_string_formatted(), "Select[[]int]");
    }

    #[test]
    fn test_print_negated_without_values() {
        assert_eq!(Tag::new("foo").negated(true).to_string_formatted(), r#"foo:"-""#);
    }

    #[test]
    fn test_print_then_parse() {
        let annotation = sample();
        let text = annotation.to_comment("+gen");
        let reparsed = parse(&text, "+gen", &named).unwrap();
        assert_eq!(reparsed, Some(annotation));
    }

    #[test]
    fn test_parse_then_print_then_parse() {
        let text = r#"// +gen   *  foo:"-Select[ *Foo , int ],  Where"  bar"#;
        let first = parse(text, "+gen", &named).unwrap().unwrap();
        let printed = first.to_comment("+gen");
        assert_eq!(printed, r#"// +gen * foo:"-Select[*Foo,int],Where" bar"#);
        assert_eq!(parse(&printed, "+gen", &named).unwrap(), Some(first));
    }
}
