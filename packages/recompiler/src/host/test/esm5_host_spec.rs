use super::util::{parse, source};
use crate::host::Esm5ReflectionHost;
use crate::packages::EntryPointFormat;
use crate::reflection::ReflectionHost;
use oxc_allocator::Allocator;

const ALPHA: &str = r#"import { Component } from '@angular/core';
var AlphaComponent = /** @class */ (function () {
    function AlphaComponent() {
    }
    AlphaComponent.decorators = [
        { type: Component, args: [{ selector: 'x-foo', template: '<span></span>' }] }
    ];
    return AlphaComponent;
}());
export { AlphaComponent };
"#;

#[test]
fn recognizes_closure_wrapped_classes() {
    let files = vec![source("/index.js", ALPHA)];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files, EntryPointFormat::Esm5);
    let host = Esm5ReflectionHost::new(&program);
    let file = &program.files[0];

    let classes = host.classes_in_file(file);
    assert_eq!(classes.len(), 1);
    let class = &classes[0];
    assert_eq!(class.name, "AlphaComponent");
    assert!(class.is_closure_wrapped());
    assert!(class.iife_return_span.is_some());

    // The return statement sits inside the closure.
    let return_span = class.iife_return_span.unwrap();
    let return_text =
        &file.source[return_span.start as usize..return_span.end as usize];
    assert_eq!(return_text, "return AlphaComponent;");
}

#[test]
fn reads_decorators_from_the_closure_body() {
    let files = vec![source("/index.js", ALPHA)];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files, EntryPointFormat::Esm5);
    let host = Esm5ReflectionHost::new(&program);
    let file = &program.files[0];
    let classes = host.classes_in_file(file);

    let decorators = host.decorators_of_class(file, &classes[0]).unwrap();
    assert_eq!(decorators.len(), 1);
    assert_eq!(decorators[0].name, "Component");
    assert_eq!(
        decorators[0].import.as_ref().unwrap().from,
        "@angular/core"
    );
}

#[test]
fn helper_calls_prefer_the_closure_scope() {
    let files = vec![source(
        "/index.js",
        r#"import { Injectable } from '@angular/core';
var AlphaService = (function () {
    function AlphaService() {
    }
    AlphaService = __decorate([
        Injectable()
    ], AlphaService);
    return AlphaService;
}());
export { AlphaService };
"#,
    )];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files, EntryPointFormat::Esm5);
    let host = Esm5ReflectionHost::new(&program);
    let file = &program.files[0];
    let classes = host.classes_in_file(file);

    let calls = host.helper_calls_for_class(file, &classes[0], &["__decorate"]);
    assert_eq!(calls.len(), 1);

    let decorators = host.decorators_of_class(file, &classes[0]).unwrap();
    assert_eq!(decorators.len(), 1);
    assert_eq!(decorators[0].name, "Injectable");
}

#[test]
fn module_level_helper_calls_are_the_fallback() {
    let files = vec![source(
        "/index.js",
        r#"import { Injectable } from '@angular/core';
var AlphaService = (function () {
    function AlphaService() {
    }
    return AlphaService;
}());
AlphaService = __decorate([Injectable()], AlphaService);
export { AlphaService };
"#,
    )];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files, EntryPointFormat::Esm5);
    let host = Esm5ReflectionHost::new(&program);
    let file = &program.files[0];
    let classes = host.classes_in_file(file);

    let calls = host.helper_calls_for_class(file, &classes[0], &["__decorate"]);
    assert_eq!(calls.len(), 1);
}

#[test]
fn bare_constructor_functions_can_be_classes() {
    let files = vec![source(
        "/index.js",
        r#"import { Injectable } from '@angular/core';
function AlphaService() {
}
AlphaService.decorators = [{ type: Injectable, args: [] }];
export { AlphaService };
"#,
    )];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files, EntryPointFormat::Esm5);
    let host = Esm5ReflectionHost::new(&program);
    let file = &program.files[0];
    let classes = host.classes_in_file(file);
    assert_eq!(classes.len(), 1);
    assert!(!classes[0].is_closure_wrapped());

    let decorators = host.decorators_of_class(file, &classes[0]).unwrap();
    assert_eq!(decorators[0].name, "Injectable");
}

#[test]
fn esm_exports_still_resolve() {
    let files = vec![source("/index.js", ALPHA)];
    let allocator = Allocator::default();
    let program = parse(&allocator, &files, EntryPointFormat::Esm5);
    let host = Esm5ReflectionHost::new(&program);
    let exports = host.exports_of_module(&program.files[0]).unwrap();
    assert!(exports.contains_key("AlphaComponent"));
}
