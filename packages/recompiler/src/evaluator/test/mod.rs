use crate::evaluator::{PartialEvaluator, ResolvedValue};
use crate::host::Esm2015ReflectionHost;
use crate::packages::{BundleProgram, EntryPointFormat, ParsedFile, SourceFile};
use crate::reflection::src::util::declarator_name;
use oxc_allocator::Allocator;
use oxc_ast::ast;

/// Finds the initializer of `var <name> = ...;` in the first file.
fn init_of<'a>(program: &'a BundleProgram<'a>, name: &str) -> &'a ast::Expression<'a> {
    let file = &program.files[0];
    for stmt in &file.program.body {
        if let ast::Statement::VariableDeclaration(var) = stmt {
            for declarator in &var.declarations {
                if declarator_name(declarator) == Some(name) {
                    if let Some(init) = &declarator.init {
                        return init;
                    }
                }
            }
        }
    }
    panic!("no initializer for {}", name);
}

fn parse<'a>(allocator: &'a Allocator, files: &'a [SourceFile]) -> BundleProgram<'a> {
    BundleProgram::parse(allocator, files, EntryPointFormat::Esm2015).unwrap()
}

fn evaluate<'a>(
    program: &'a BundleProgram<'a>,
    expr: &'a ast::Expression<'a>,
) -> Result<ResolvedValue<'a>, crate::diagnostics::FatalLinkerError> {
    let host = Esm2015ReflectionHost::new(program);
    let file: &ParsedFile<'a> = &program.files[0];
    PartialEvaluator::new(&host, false).evaluate(file, expr)
}

#[test]
fn folds_literals() {
    let files = vec![SourceFile::new(
        "/a.js",
        "var s = 'hi'; var n = 42; var b = true; var nl = null; var u = undefined; var neg = -7;",
    )];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);

    assert_eq!(
        evaluate(&program, init_of(&program, "s")).unwrap().as_str(),
        Some("hi")
    );
    assert_eq!(
        evaluate(&program, init_of(&program, "n"))
            .unwrap()
            .as_number(),
        Some(42.0)
    );
    assert_eq!(
        evaluate(&program, init_of(&program, "b"))
            .unwrap()
            .as_bool(),
        Some(true)
    );
    assert!(matches!(
        evaluate(&program, init_of(&program, "nl")).unwrap(),
        ResolvedValue::Null
    ));
    assert!(matches!(
        evaluate(&program, init_of(&program, "u")).unwrap(),
        ResolvedValue::Undefined
    ));
    assert_eq!(
        evaluate(&program, init_of(&program, "neg"))
            .unwrap()
            .as_number(),
        Some(-7.0)
    );
}

#[test]
fn folds_arrays_and_objects() {
    let files = vec![SourceFile::new(
        "/a.js",
        "var x = { selector: 'x-foo', flags: [1, 2, 3] };",
    )];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);

    let value = evaluate(&program, init_of(&program, "x")).unwrap();
    assert_eq!(
        value.get_property("selector").and_then(|v| v.as_str()),
        Some("x-foo")
    );
    let flags = value.get_property("flags").unwrap().as_array().unwrap();
    assert_eq!(flags.len(), 3);
}

#[test]
fn folds_references_to_local_constants() {
    let files = vec![SourceFile::new(
        "/a.js",
        "var SELECTOR = 'x-foo';\nvar x = { selector: SELECTOR };",
    )];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);

    let value = evaluate(&program, init_of(&program, "x")).unwrap();
    assert_eq!(
        value.get_property("selector").and_then(|v| v.as_str()),
        Some("x-foo")
    );
}

#[test]
fn class_references_resolve_to_declarations() {
    let files = vec![SourceFile::new(
        "/a.js",
        "class Foo {}\nvar x = [Foo];",
    )];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);

    let value = evaluate(&program, init_of(&program, "x")).unwrap();
    let array = value.as_array().unwrap();
    let reference = array[0].as_reference().unwrap();
    assert_eq!(reference.name, "Foo");
    assert!(reference.declaration.is_some());
    assert!(!reference.synthesized_by_forward_ref);
}

#[test]
fn unknown_calls_are_opaque_not_errors() {
    let files = vec![SourceFile::new("/a.js", "var x = makeProviders();")];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);

    let value = evaluate(&program, init_of(&program, "x")).unwrap();
    assert!(value.is_opaque());
}

#[test]
fn spread_elements_make_arrays_opaque() {
    let files = vec![SourceFile::new("/a.js", "var x = [1, ...rest];")];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);
    assert!(evaluate(&program, init_of(&program, "x")).unwrap().is_opaque());
}

#[test]
fn forward_ref_unwraps_to_a_marked_reference() {
    let files = vec![SourceFile::new(
        "/a.js",
        "import { forwardRef } from '@angular/core';\nclass Foo {}\nvar x = forwardRef(function () { return Foo; });",
    )];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);

    let value = evaluate(&program, init_of(&program, "x")).unwrap();
    let reference = value.as_reference().unwrap();
    assert_eq!(reference.name, "Foo");
    assert!(reference.synthesized_by_forward_ref);
}

#[test]
fn forward_ref_with_wrong_arity_is_fatal() {
    let files = vec![SourceFile::new(
        "/a.js",
        "import { forwardRef } from '@angular/core';\nclass Foo {}\nvar x = forwardRef(function () { return Foo; }, 'extra');",
    )];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);

    let error = evaluate(&program, init_of(&program, "x")).unwrap_err();
    assert_eq!(error.scope, crate::diagnostics::ErrorScope::Class);
    assert!(error.message.contains("exactly 1 argument"));
}

#[test]
fn forward_ref_with_non_function_argument_is_fatal() {
    let files = vec![SourceFile::new(
        "/a.js",
        "import { forwardRef } from '@angular/core';\nvar x = forwardRef(42);",
    )];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);
    assert!(evaluate(&program, init_of(&program, "x")).is_err());
}

#[test]
fn forward_ref_from_another_module_is_not_special() {
    let files = vec![SourceFile::new(
        "/a.js",
        "import { forwardRef } from 'not-the-core';\nvar x = forwardRef(42);",
    )];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);
    // Not the core helper, so it is just an unknown call.
    assert!(evaluate(&program, init_of(&program, "x")).unwrap().is_opaque());
}
