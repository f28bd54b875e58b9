//! Compiled template bodies.
//!
//! Bodies are `minijinja` templates rendered against the annotated type:
//!
//! | variable         | value                                   |
//! |------------------|-----------------------------------------|
//! | `Name`           | bare type name                          |
//! | `Type`           | type as written, pointer included       |
//! | `Pointer`        | `*` or the empty string                 |
//! | `LongName`       | [`Type::long_name`]                     |
//! | `TypeParameter`  | first type parameter of the tag value   |
//! | `TypeParameters` | every type parameter, as a list         |
//!
//! Helpers registered on the [`TemplateSet`](crate::TemplateSet) are
//! filters: `{{ TypeParameter | title }}`. Bodies are compiled when a
//! template is resolved, so a broken body is only reported for the
//! templates a run actually uses.

use std::collections::BTreeMap;

use minijinja::{AutoEscape, Environment, UndefinedBehavior, Value};

use crate::template::Helper;
use crate::{RenderError, TagValue, TemplateSyntaxError, Type};

const TYPE_PARAMETER: &str = "TypeParameter";

/// A resolved template, ready to render.
#[derive(Debug, Clone)]
pub struct RenderableTemplate {
    name: String,
    env: Environment<'static>,
    uses_type_parameter: bool,
}

impl RenderableTemplate {
    pub(crate) fn compile(
        name: String,
        body: &str,
        helpers: &BTreeMap<String, Helper>,
    ) -> Result<Self, TemplateSyntaxError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| AutoEscape::None);

        for (helper_name, &helper) in helpers {
            env.add_filter(helper_name.clone(), move |value: String| helper(&value));
        }

        env.add_template_owned(name.clone(), body.to_owned())
            .map_err(TemplateSyntaxError::from)?;
        let uses_type_parameter = env
            .get_template(&name)
            .map_err(TemplateSyntaxError::from)?
            .undeclared_variables(false)
            .contains(TYPE_PARAMETER);

        Ok(Self {
            name,
            env,
            uses_type_parameter,
        })
    }

    /// The value this template was resolved for, e.g. `Select[int]`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn render(&self, ty: &Type, value: &TagValue) -> Result<String, RenderError> {
        let parameters: Vec<String> = value.type_parameters.iter().map(Type::to_string).collect();

        if self.uses_type_parameter && parameters.is_empty() {
            return Err(RenderError::MissingTypeParameter {
                template: self.name.clone(),
                value: value.to_string(),
            });
        }

        let mut ctx = BTreeMap::new();
        ctx.insert("Name", Value::from(ty.name.as_str()));
        ctx.insert("Type", Value::from(ty.to_string()));
        ctx.insert("Pointer", Value::from(ty.pointer.to_string()));
        ctx.insert("LongName", Value::from(ty.long_name()));
        if let Some(first) = parameters.first() {
            ctx.insert(TYPE_PARAMETER, Value::from(first.as_str()));
        }
        ctx.insert("TypeParameters", Value::from(parameters));

        self.env
            .get_template(&self.name)
            .and_then(|tmpl| tmpl.render(ctx))
            .map_err(|err| RenderError::Template {
                template: self.name.clone(),
                message: err.to_string(),
            })
    }
}

impl From<minijinja::Error> for TemplateSyntaxError {
    fn from(err: minijinja::Error) -> Self {
        Self {
            message: err.to_string(),
            line: err.line(),
        }
    }
}
