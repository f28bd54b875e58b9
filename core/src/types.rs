//! Types as the core sees them, and the capability that produces them.

use core::fmt;
use std::collections::HashMap;

use crate::EvaluationError;

/// Marks a declaration referenced through a pointer.
///
/// Usable as a `bool`, and displays as `*` when set so it can be prefixed
/// to a type name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pointer(pub bool);

impl Pointer {
    #[inline]
    pub const fn is_set(self) -> bool {
        self.0
    }
}

impl From<bool> for Pointer {
    fn from(value: bool) -> Self {
        Self(value)
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 { f.write_str("*") } else { Ok(()) }
    }
}

/// What the host type system says a type supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "fuzz", derive(arbitrary::Arbitrary))]
pub struct Capabilities {
    /// Supports `==` and `!=`.
    pub comparable: bool,
    /// Supports arithmetic.
    pub numeric: bool,
    /// Supports `<` and `>`.
    pub ordered: bool,
}

impl Capabilities {
    pub const NONE: Self = Self {
        comparable: false,
        numeric: false,
        ordered: false,
    };

    pub const ALL: Self = Self {
        comparable: true,
        numeric: true,
        ordered: true,
    };

    /// True when every capability of `other` is also present here.
    pub fn contains(&self, other: &Capabilities) -> bool {
        (self.comparable || !other.comparable)
            && (self.numeric || !other.numeric)
            && (self.ordered || !other.ordered)
    }
}

/// An evaluated type.
///
/// Types are produced by an [`Evaluator`] and never change afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Type {
    pub name: String,
    pub pointer: Pointer,
    pub capabilities: Capabilities,
}

impl Type {
    pub fn new(name: impl Into<String>, capabilities: Capabilities) -> Self {
        Self {
            name: name.into(),
            pointer: Pointer(false),
            capabilities,
        }
    }

    /// A type with no capabilities at all.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, Capabilities::NONE)
    }

    pub fn with_pointer(mut self, pointer: impl Into<Pointer>) -> Self {
        self.pointer = pointer.into();
        self
    }

    #[inline]
    pub fn comparable(&self) -> bool {
        self.capabilities.comparable
    }

    #[inline]
    pub fn numeric(&self) -> bool {
        self.capabilities.numeric
    }

    #[inline]
    pub fn ordered(&self) -> bool {
        self.capabilities.ordered
    }

    /// An identifier-friendly rendering of the type.
    ///
    /// Brackets, braces and `*` are dropped, each remaining piece is
    /// title-cased, and a slice prefix `[]` becomes `Slice`:
    /// `[]map[Foo]Bar` gives `SliceMapFooBar`.
    pub fn long_name(&self) -> String {
        self.to_string()
            .replace("[]", "[Slice]")
            .split(['[', ']', '{', '}', '*'])
            .map(title)
            .collect()
    }
}

fn title(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pointer, self.name)
    }
}

/// Resolves a type name to a [`Type`].
///
/// The core has no opinion on how this happens: host-language type
/// checking, a lookup table, or anything else. The parser calls it once per
/// type parameter and waits for the answer.
pub trait Evaluator {
    fn evaluate(&self, name: &str) -> Result<Type, EvaluationError>;
}

impl<F> Evaluator for F
where
    F: Fn(&str) -> Result<Type, EvaluationError>,
{
    #[inline]
    fn evaluate(&self, name: &str) -> Result<Type, EvaluationError> {
        self(name)
    }
}

/// An [`Evaluator`] backed by a fixed table of known types.
///
/// A leading `*` on a looked-up name is treated as a pointer to the named
/// type.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: HashMap<String, Capabilities>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, capabilities: Capabilities) -> Self {
        self.insert(name, capabilities);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, capabilities: Capabilities) {
        self.types.insert(name.into(), capabilities);
    }
}

impl Evaluator for TypeTable {
    fn evaluate(&self, name: &str) -> Result<Type, EvaluationError> {
        let (pointer, bare) = match name.strip_prefix('*') {
            Some(bare) => (true, bare),
            None => (false, name),
        };
        self.types
            .get(bare)
            .map(|caps| Type::new(bare, *caps).with_pointer(pointer))
            .ok_or_else(|| EvaluationError::undefined(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Foo", "Foo"; "plain")]
    #[test_case("*Foo", "Foo"; "pointer")]
    #[test_case("map[Foo]Bar", "MapFooBar"; "map")]
    #[test_case("[]map[Foo]Bar", "SliceMapFooBar"; "slice of map")]
    #[test_case("[]map[Foo]struct{}", "SliceMapFooStruct"; "struct value")]
    fn test_long_name(input: &str, expected: &str) {
        let ty = Type::named(input);
        assert_eq!(ty.long_name(), expected);
    }

    #[test]
    fn test_pointer_display() {
        let ty = Type::named("Foo").with_pointer(true);
        assert_eq!(ty.to_string(), "*Foo");
        assert_eq!(Pointer(false).to_string(), "");
    }

    #[test]
    fn test_type_table_pointer_lookup() {
        let table = TypeTable::new().with("Foo", Capabilities::ALL);
        let ty = table.evaluate("*Foo").unwrap();
        assert!(ty.pointer.is_set());
        assert_eq!(ty.name, "Foo");
        assert!(ty.numeric());
    }

    #[test]
    fn test_type_table_unknown_name() {
        let table = TypeTable::new();
        let err = table.evaluate("nope").unwrap_err();
        assert_eq!(err.name, "nope");
        assert_eq!(err.to_string(), "undefined: nope");
    }

    #[test]
    fn test_closure_evaluator() {
        let eval = |name: &str| -> Result<Type, EvaluationError> { Ok(Type::named(name)) };
        assert_eq!(eval.evaluate("int").unwrap().name, "int");
    }

    #[test]
    fn test_capabilities_contains() {
        assert!(Capabilities::ALL.contains(&Capabilities::NONE));
        assert!(!Capabilities::NONE.contains(&Capabilities::ALL));
    }
}
