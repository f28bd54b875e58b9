//! Templates and the registry that resolves them.
//!
//! A [`TemplateSet`] is built once, before any resolution, and is
//! read-only afterwards. Order of registration matters: it breaks ties
//! between templates sharing a name and orders default tag values.

use std::collections::BTreeMap;

use crate::render::RenderableTemplate;
use crate::{Constraint, ResolveError, Tag, TagValue, Type};

/// A named helper, applied as a filter in template bodies:
/// `{{ TypeParameter | title }}`.
pub type Helper = fn(&str) -> String;

/// A named, constrained template body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Template {
    pub name: String,
    pub text: String,
    pub type_constraint: Constraint,
    /// One constraint per required type parameter; the length is the
    /// template's arity.
    pub type_parameter_constraints: Vec<Constraint>,
}

impl Template {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_type_constraint(mut self, constraint: Constraint) -> Self {
        self.type_constraint = constraint;
        self
    }

    pub fn with_type_parameter_constraints(mut self, constraints: Vec<Constraint>) -> Self {
        self.type_parameter_constraints = constraints;
        self
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.type_parameter_constraints.len()
    }

    /// Check that this template can be applied to `ty` for `value`.
    ///
    /// The type constraint is checked first, then the number of type
    /// parameters, then each parameter against its positional constraint.
    pub fn try_type_and_value(&self, ty: &Type, value: &TagValue) -> Result<(), ResolveError> {
        let cannot = |source| ResolveError::Constraint {
            value: value.to_string(),
            ty: ty.to_string(),
            source,
        };

        self.type_constraint.check(ty).map_err(cannot)?;

        if self.arity() != value.type_parameters.len() {
            return Err(ResolveError::Arity {
                name: value.name.clone(),
                expected: self.arity(),
            });
        }

        for (constraint, parameter) in self
            .type_parameter_constraints
            .iter()
            .zip(&value.type_parameters)
        {
            constraint.check(parameter).map_err(cannot)?;
        }

        Ok(())
    }

    fn compile(
        &self,
        name: String,
        helpers: &BTreeMap<String, Helper>,
    ) -> Result<RenderableTemplate, ResolveError> {
        RenderableTemplate::compile(name, &self.text, helpers).map_err(|source| {
            ResolveError::Template {
                name: self.name.clone(),
                source,
            }
        })
    }
}

/// The ordered pool of templates available to resolution.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: Vec<Template>,
    helpers: BTreeMap<String, Helper>,
}

/// Registration phase of a [`TemplateSet`].
#[derive(Debug, Default)]
#[must_use]
pub struct TemplateSetBuilder {
    set: TemplateSet,
}

impl TemplateSetBuilder {
    pub fn template(mut self, template: Template) -> Self {
        self.set.templates.push(template);
        self
    }

    pub fn templates(mut self, templates: impl IntoIterator<Item = Template>) -> Self {
        self.set.templates.extend(templates);
        self
    }

    /// Make `helper` available as the filter `name` in every template of
    /// the set.
    pub fn helper(mut self, name: impl Into<String>, helper: Helper) -> Self {
        self.set.helpers.insert(name.into(), helper);
        self
    }

    pub fn build(self) -> TemplateSet {
        self.set
    }
}

impl TemplateSet {
    pub fn builder() -> TemplateSetBuilder {
        TemplateSetBuilder::default()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn helper(&self, name: &str) -> Option<Helper> {
        self.helpers.get(name).copied()
    }

    /// Templates named `name`, in registration order.
    pub fn candidates<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Template> + 's {
        self.templates.iter().filter(move |tmpl| tmpl.name == name)
    }

    /// A value for every template that applies to `ty` without type
    /// parameters, in registration order.
    pub fn default_values(&self, ty: &Type) -> Vec<TagValue> {
        self.templates
            .iter()
            .filter(|tmpl| tmpl.arity() == 0 && tmpl.type_constraint.is_satisfied_by(ty))
            .map(|tmpl| TagValue::new(tmpl.name.as_str()))
            .collect()
    }

    /// Resolve a bare tag name against the set.
    ///
    /// Only the type constraint is considered. When no candidate applies,
    /// the first candidate's failure is returned.
    pub fn resolve_tag(&self, ty: &Type, tag: &Tag) -> Result<RenderableTemplate, ResolveError> {
        let mut first_error = None;

        for tmpl in self.candidates(&tag.name) {
            match tmpl.type_constraint.check(ty) {
                Ok(()) => return tmpl.compile(tag.name.clone(), &self.helpers),
                Err(source) => {
                    first_error.get_or_insert(ResolveError::Constraint {
                        value: tag.name.clone(),
                        ty: ty.to_string(),
                        source,
                    });
                }
            }
        }

        Err(first_error.unwrap_or_else(|| ResolveError::Unknown(tag.name.clone())))
    }

    /// Find the template implementing `value` for `ty`, and compile it.
    ///
    /// Candidates are tried in registration order and the first one whose
    /// constraints all hold wins. When none does, the first candidate's
    /// failure is returned; later candidates' diagnostics are dropped.
    pub fn resolve(&self, ty: &Type, value: &TagValue) -> Result<RenderableTemplate, ResolveError> {
        let mut first_error = None;

        for tmpl in self.candidates(&value.name) {
            match tmpl.try_type_and_value(ty, value) {
                Ok(()) => return tmpl.compile(value.to_string(), &self.helpers),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }

        Err(first_error.unwrap_or_else(|| ResolveError::Unknown(value.name.clone())))
    }
}

impl<'s> IntoIterator for &'s TemplateSet {
    type Item = &'s Template;
    type IntoIter = core::slice::Iter<'s, Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
