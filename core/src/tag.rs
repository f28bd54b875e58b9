//! The parsed form of an annotation.

use core::fmt;

use crate::{Pointer, TemplateSet, Type};

/// The value that asks for every applicable default template.
pub const WILDCARD: &str = "*";

/// One requested behavior within a tag, e.g. `Select[int]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TagValue {
    pub name: String,
    /// Evaluated type parameters, in the order they were written.
    pub type_parameters: Vec<Type>,
}

impl TagValue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_parameters: Vec::new(),
        }
    }

    pub fn with_type_parameters(mut self, type_parameters: Vec<Type>) -> Self {
        self.type_parameters = type_parameters;
        self
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.name == WILDCARD
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some((first, rest)) = self.type_parameters.split_first() {
            write!(f, "[{}", first)?;
            for ty in rest {
                write!(f, ",{}", ty)?;
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

/// A named request parsed from an annotation, with its values.
///
/// `negated` applies to the whole value list (`foo:"-bar,baz"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tag {
    pub name: String,
    pub values: Vec<TagValue>,
    pub negated: bool,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            negated: false,
        }
    }

    pub fn with_values(mut self, values: Vec<TagValue>) -> Self {
        self.values = values;
        self
    }

    pub fn negated(mut self, negated: bool) -> Self {
        self.negated = negated;
        self
    }

    /// True when no values were given, or when one of them is `*`.
    pub fn should_add_defaults(&self) -> bool {
        self.values.is_empty() || self.values.iter().any(TagValue::is_wildcard)
    }

    pub fn remove_stars(&mut self) {
        self.values.retain(|value| !value.is_wildcard());
    }

    /// Append the default values for `ty` if this tag asks for them, then
    /// drop any `*` marker.
    ///
    /// Defaults are every template in `templates` that applies to `ty` and
    /// takes no type parameters, in registration order. Once a tag has
    /// values and no `*`, calling this again changes nothing.
    pub fn add_defaults_if_needed(&mut self, ty: &Type, templates: &TemplateSet) {
        if self.should_add_defaults() {
            self.values.extend(templates.default_values(ty));
        }
        self.remove_stars();
    }
}

/// Everything one annotation line says about a declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Annotation {
    pub pointer: Pointer,
    pub tags: Vec<Tag>,
}

impl Annotation {
    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|tag| tag.name == name)
    }
}
