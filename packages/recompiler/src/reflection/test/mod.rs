use crate::packages::{BundleProgram, EntryPointFormat, SourceFile};
use crate::reflection::src::util::{
    declarator_name, require_call_specifier, returned_expression, unwrap_parens,
};
use oxc_allocator::Allocator;
use oxc_ast::ast;

fn first_init<'a>(program: &'a BundleProgram<'a>) -> &'a ast::Expression<'a> {
    let file = &program.files[0];
    for stmt in &file.program.body {
        if let ast::Statement::VariableDeclaration(var) = stmt {
            if let Some(init) = &var.declarations[0].init {
                return init;
            }
        }
    }
    panic!("fixture has no variable initializer");
}

fn parse<'a>(allocator: &'a Allocator, files: &'a [SourceFile]) -> BundleProgram<'a> {
    BundleProgram::parse(allocator, files, EntryPointFormat::CommonJs).unwrap()
}

#[test]
fn unwrap_parens_strips_nested_wrappers() {
    let files = vec![SourceFile::new("/a.js", "var x = ((42));")];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);
    let init = first_init(&program);
    assert!(matches!(
        unwrap_parens(init),
        ast::Expression::NumericLiteral(_)
    ));
}

#[test]
fn require_call_specifier_matches_only_single_string_argument() {
    let files = vec![SourceFile::new("/a.js", "var core = require('@angular/core');")];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);
    assert_eq!(
        require_call_specifier(first_init(&program)),
        Some("@angular/core")
    );

    let files = vec![SourceFile::new("/b.js", "var x = require(name);")];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);
    assert_eq!(require_call_specifier(first_init(&program)), None);
}

#[test]
fn returned_expression_handles_function_literals() {
    let files = vec![SourceFile::new(
        "/a.js",
        "var f = function () { return Foo; };",
    )];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);
    let returned = returned_expression(first_init(&program)).unwrap();
    assert!(matches!(
        unwrap_parens(returned),
        ast::Expression::Identifier(id) if id.name == "Foo"
    ));
}

#[test]
fn returned_expression_handles_expression_arrows() {
    let files = vec![SourceFile::new("/a.js", "var f = () => Foo;")];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);
    assert!(returned_expression(first_init(&program)).is_some());
}

#[test]
fn returned_expression_rejects_non_functions() {
    let files = vec![SourceFile::new("/a.js", "var f = 42;")];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);
    assert!(returned_expression(first_init(&program)).is_none());
}

#[test]
fn declarator_name_reads_plain_bindings() {
    let files = vec![SourceFile::new("/a.js", "var alpha = 1;")];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files);
    let file = &program.files[0];
    let ast::Statement::VariableDeclaration(var) = &file.program.body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(declarator_name(&var.declarations[0]), Some("alpha"));
}
