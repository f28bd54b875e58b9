//! Loading annotated types from source files.
use std::path::Path;

use typegen::{Capabilities, Config, Error, Package, SourceFile, TypeTable};

const THINGS: &str = r#"package things

// Thing is a thing.
// +gen * slice:"Where,Select[int]" stringer
type Thing struct{}

// Unannotated is left alone.
type Unannotated struct{}

// +gen
type Other int
"#;

fn types() -> TypeTable {
    TypeTable::new()
        .with("Thing", Capabilities { comparable: true, ..Capabilities::NONE })
        .with("Other", Capabilities::ALL)
        .with("int", Capabilities::ALL)
}

fn things(path: &str) -> SourceFile {
    SourceFile::new(path, THINGS)
        .declare("Thing", "type Thing")
        .declare("Unannotated", "type Unannotated")
        .declare("Other", "type Other")
}

#[test]
fn test_load() {
    let outcome = Package::load("+gen", &[things("things.go")], &types(), &Config::new()).unwrap();
    assert!(outcome.evaluation_error.is_none());

    let package = outcome.package;
    assert_eq!(package.types.len(), 2);

    let thing = package.get("Thing").unwrap();
    assert!(thing.ty.pointer.is_set());
    assert!(thing.ty.comparable());
    assert!(!thing.test);
    let slice = thing.tag("slice").unwrap();
    assert_eq!(slice.values[1].to_string(), "Select[int]");
    assert!(thing.tag("stringer").unwrap().values.is_empty());

    let other = package.get("Other").unwrap();
    assert!(!other.ty.pointer.is_set());
    assert!(other.tags.is_empty());
}

#[test]
fn test_other_directive_is_not_loaded() {
    let outcome = Package::load("+other", &[things("things.go")], &types(), &Config::new()).unwrap();
    assert!(outcome.package.is_empty());
}

#[test]
fn test_test_files_are_marked() {
    let outcome = Package::load(
        "+gen",
        &[things("things_test.go")],
        &types(),
        &Config::new(),
    )
    .unwrap();
    assert!(outcome.package.types.iter().all(|annotated| annotated.test));
}

#[test]
fn test_skipped_files() {
    fn only_go(path: &Path) -> bool {
        path.extension().is_some_and(|ext| ext == "go")
    }

    let files = [
        things("_ignored.go"),
        things(".hidden.go"),
        things("notes.txt"),
        things("kept.go"),
    ];
    let config = Config::new().with_filter(only_go);
    let outcome = Package::load("+gen", &files, &types(), &config).unwrap();
    assert_eq!(outcome.package.types.len(), 2);
}

#[test]
fn test_syntax_error_position() {
    let source = "package bad\n\n// +gen foof foof\ntype Bad int\n";
    let file = SourceFile::new("bad.go", source).declare("Bad", "type Bad");
    let err = Package::load("+gen", &[file], &types(), &Config::new()).unwrap_err();

    assert!(matches!(err, Error::Syntax { line: 3, column: 14, .. }));
    insta::assert_snapshot!(err.to_string(), @r#"bad.go:3:14: duplicate tag "foof""#);
}

#[test]
fn test_evaluation_error_aborts() {
    let source = "package missing\n\n// +gen\ntype Missing int\n";
    let files = [
        SourceFile::new("missing.go", source).declare("Missing", "type Missing"),
        things("things.go"),
    ];
    let err = Package::load("+gen", &files, &types(), &Config::new()).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"missing.go: Missing: undefined: Missing");
}

#[test]
fn test_evaluation_error_tolerated() {
    let source = "package missing\n\n// +gen *\ntype Missing int\n";
    let files = [
        SourceFile::new("missing.go", source).declare("Missing", "type Missing"),
        things("things.go"),
    ];
    let config = Config::new().with_ignore_evaluation_errors(true);
    let outcome = Package::load("+gen", &files, &types(), &config).unwrap();

    assert_eq!(outcome.package.types.len(), 2);
    match outcome.evaluation_error {
        Some(Error::Evaluation { name, .. }) => assert_eq!(name, "*Missing"),
        other => panic!("expected an evaluation error, got {other:?}"),
    }
}
