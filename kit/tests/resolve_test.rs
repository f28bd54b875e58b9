//! Parsing, default expansion, resolution and rendering end to end.
use typegen::{
    Capabilities, Constraint, ResolveError, Template, TemplateSet, Type, TypeTable, parse,
};

fn types() -> TypeTable {
    TypeTable::new()
        .with("int", Capabilities::ALL)
        .with("string", Capabilities { numeric: false, ..Capabilities::ALL })
        .with("Thing", Capabilities { comparable: true, ..Capabilities::NONE })
}

fn title(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map(|c| c.to_uppercase().chain(chars).collect())
        .unwrap_or_default()
}

fn templates() -> TemplateSet {
    TemplateSet::builder()
        .helper("title", title)
        .template(Template::new("Where", "func (s {{ LongName }}Slice) Where()"))
        .template(
            Template::new("Count", "func (s {{ LongName }}Slice) Count()")
                .with_type_constraint(Constraint::comparable()),
        )
        .template(
            Template::new("Sum", "func (s {{ LongName }}Slice) Sum()")
                .with_type_constraint(Constraint::numeric()),
        )
        .template(
            Template::new("Select", "func (s {{ LongName }}Slice) Select{{ TypeParameter | title }}() []{{ TypeParameter }}")
                .with_type_parameter_constraints(vec![Constraint::ANY]),
        )
        .template(
            Template::new("Select", "unreachable")
                .with_type_parameter_constraints(vec![Constraint::ordered()]),
        )
        .build()
}

fn render(comment: &str, ty: &Type) -> Result<Vec<String>, ResolveError> {
    let annotation = parse(comment, "+gen", &types()).unwrap().unwrap();
    let templates = templates();
    let mut tag = annotation.tags.into_iter().next().unwrap();
    tag.add_defaults_if_needed(ty, &templates);

    tag.values
        .iter()
        .map(|value| {
            let tmpl = templates.resolve(ty, value)?;
            Ok(tmpl.render(ty, value).unwrap())
        })
        .collect()
}

#[test]
fn test_defaults_follow_type_capabilities() {
    let thing = Type::new("Thing", Capabilities { comparable: true, ..Capabilities::NONE });
    let out = render("// +gen slice", &thing).unwrap();
    insta::assert_snapshot!(out.join("\n"), @r"
    func (s ThingSlice) Where()
    func (s ThingSlice) Count()
    ");
}

#[test]
fn test_star_keeps_explicit_values_first() {
    let thing = Type::new("Thing", Capabilities::NONE).with_pointer(true);
    let out = render(r#"// +gen * slice:"Select[string],*""#, &thing).unwrap();
    insta::assert_snapshot!(out.join("\n"), @r"
    func (s ThingSlice) SelectString() []string
    func (s ThingSlice) Where()
    ");
}

#[test]
fn test_first_registered_template_wins() {
    let out = render(r#"// +gen slice:"Select[int]""#, &Type::named("Thing")).unwrap();
    assert_eq!(out, ["func (s ThingSlice) SelectInt() []int"]);
}

#[test]
fn test_constraint_failure_is_reported() {
    let err = render(r#"// +gen slice:"Sum""#, &Type::named("Thing")).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"cannot implement Sum on Thing: Thing must be numeric");
}

#[test]
fn test_unknown_value_is_reported() {
    let err = render(r#"// +gen slice:"Shuffle""#, &Type::named("Thing")).unwrap_err();
    assert_eq!(err, ResolveError::Unknown("Shuffle".into()));
}

#[test]
fn test_unknown_type_parameter() {
    let err = parse(r#"// +gen slice:"Select[Nope]""#, "+gen", &types()).unwrap_err();
    assert_eq!(err.to_string(), "undefined: Nope");
    assert_eq!(err.offset, 22);
}

#[test]
fn test_resolution_across_threads() {
    let templates = templates();
    let ty = Type::new("int", Capabilities::ALL);
    let value = typegen::TagValue::new("Sum");

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    templates
                        .resolve(&ty, &value)
                        .unwrap()
                        .render(&ty, &value)
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), "func (s IntSlice) Sum()");
        }
    });
}
