use crate::analysis::src::util::{render_selectors, validate_template};
use crate::analysis::{ClassState, DecorationAnalyzer, DecoratorKind, NoopResourceLoader, ResourceLoader};
use crate::host::{DelegatingReflectionHost, Esm2015ReflectionHost};
use crate::logging::NullLogger;
use crate::packages::{BundleProgram, EntryPointFormat, SourceFile};
use oxc_allocator::Allocator;

struct FixedResourceLoader {
    url: &'static str,
    contents: &'static str,
}

impl ResourceLoader for FixedResourceLoader {
    fn load(&self, url: &str, _containing_file: &str) -> Result<String, String> {
        if url == self.url {
            Ok(self.contents.to_string())
        } else {
            Err(format!("unknown resource '{}'", url))
        }
    }
}

fn analyze_with<'a>(
    program: &'a BundleProgram<'a>,
    loader: &dyn ResourceLoader,
) -> Vec<crate::analysis::CompiledFile<'a>> {
    let host = DelegatingReflectionHost::new(
        program,
        Box::new(Esm2015ReflectionHost::new(program)),
    );
    let logger = NullLogger;
    let analyzer = DecorationAnalyzer::new(program, &host, loader, &logger, false);
    analyzer.analyze_program().unwrap()
}

#[test]
fn template_validation_accepts_sound_markup() {
    assert!(validate_template("<div>{{ title }}</div>").is_ok());
    assert!(validate_template("<br><input>").is_ok());
    assert!(validate_template("plain text").is_ok());
}

#[test]
fn template_validation_rejects_broken_markup() {
    assert!(validate_template("<div>{{ title </div>").is_err());
    assert!(validate_template("<div><span></div>").is_err());
    assert!(validate_template("<div>").is_err());
    assert!(validate_template("}} backwards {{x}}").is_err());
}

#[test]
fn selector_rendering_covers_elements_and_attributes() {
    assert_eq!(render_selectors("x-foo"), "[[\"x-foo\"]]");
    assert_eq!(render_selectors("[alpha]"), "[[\"\", \"alpha\", \"\"]]");
    assert_eq!(
        render_selectors("x-foo, [alpha]"),
        "[[\"x-foo\"], [\"\", \"alpha\", \"\"]]"
    );
}

#[test]
fn analyzes_a_component_through_to_compiled() {
    let files = vec![SourceFile::new(
        "/index.js",
        r#"import { Component } from '@angular/core';
export class AlphaComponent {
}
AlphaComponent.decorators = [
    { type: Component, args: [{ selector: 'x-foo', template: '<span>{{value}}</span>' }] }
];
"#,
    )];
    let allocator = Allocator::default();
    let program = BundleProgram::parse(&allocator, &files, EntryPointFormat::Esm2015).unwrap();
    let analyses = analyze_with(&program, &NoopResourceLoader);

    assert_eq!(analyses.len(), 1);
    let classes = &analyses[0].classes;
    assert_eq!(classes.len(), 1);
    let record = &classes[0];
    assert_eq!(record.state, ClassState::Compiled);
    assert_eq!(record.kind, DecoratorKind::Component);

    let results = record.compiled.as_ref().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].name, "ɵfac");
    assert_eq!(results[1].name, "ɵcmp");
    assert!(results[1].initializer.contains("ɵɵdefineComponent"));
    assert!(results[1].initializer.contains("selectors: [[\"x-foo\"]]"));
    assert!(results[1].initializer.contains("i0.ɵɵdefineComponent"));
    assert!(results[1]
        .type_desc
        .contains("ɵɵComponentDeclaration<AlphaComponent, \"x-foo\""));

    // The metadata assignment is queued for removal.
    assert_eq!(record.decorator_removals.len(), 1);
    // The generated import set names the core package.
    assert_eq!(analyses[0].imports.len(), 1);
    assert_eq!(analyses[0].imports[0].0, "@angular/core");
}

#[test]
fn unparsable_template_poisons_only_that_class() {
    let files = vec![SourceFile::new(
        "/index.js",
        r#"import { Component } from '@angular/core';
export class BrokenComponent {
}
BrokenComponent.decorators = [
    { type: Component, args: [{ selector: 'x-broken', template: '<div>{{oops' }] }
];
export class FineComponent {
}
FineComponent.decorators = [
    { type: Component, args: [{ selector: 'x-fine', template: '<b>ok</b>' }] }
];
"#,
    )];
    let allocator = Allocator::default();
    let program = BundleProgram::parse(&allocator, &files, EntryPointFormat::Esm2015).unwrap();
    let analyses = analyze_with(&program, &NoopResourceLoader);

    let classes = &analyses[0].classes;
    assert_eq!(classes.len(), 2);
    assert_eq!(classes[0].state, ClassState::Poisoned);
    assert!(classes[0].diagnostics[0].message.contains("unparsable"));
    assert_eq!(classes[1].state, ClassState::Compiled);
}

#[test]
fn component_without_any_template_is_poisoned() {
    let files = vec![SourceFile::new(
        "/index.js",
        r#"import { Component } from '@angular/core';
export class NoTemplate {
}
NoTemplate.decorators = [{ type: Component, args: [{ selector: 'x-no' }] }];
"#,
    )];
    let allocator = Allocator::default();
    let program = BundleProgram::parse(&allocator, &files, EntryPointFormat::Esm2015).unwrap();
    let analyses = analyze_with(&program, &NoopResourceLoader);
    let record = &analyses[0].classes[0];
    assert_eq!(record.state, ClassState::Poisoned);
    assert!(record.diagnostics[0].message.contains("neither a template"));
}

#[test]
fn external_templates_load_during_preanalysis() {
    let files = vec![SourceFile::new(
        "/index.js",
        r#"import { Component } from '@angular/core';
export class AlphaComponent {
}
AlphaComponent.decorators = [
    { type: Component, args: [{ selector: 'x-foo', templateUrl: './alpha.html' }] }
];
"#,
    )];
    let allocator = Allocator::default();
    let program = BundleProgram::parse(&allocator, &files, EntryPointFormat::Esm2015).unwrap();
    let loader = FixedResourceLoader {
        url: "./alpha.html",
        contents: "<p>external</p>",
    };
    let analyses = analyze_with(&program, &loader);
    let record = &analyses[0].classes[0];
    assert_eq!(record.state, ClassState::Compiled);
    let results = record.compiled.as_ref().unwrap();
    assert!(results[1].initializer.contains("external"));
}

#[test]
fn missing_external_template_is_a_class_scoped_failure() {
    let files = vec![SourceFile::new(
        "/index.js",
        r#"import { Component } from '@angular/core';
export class AlphaComponent {
}
AlphaComponent.decorators = [
    { type: Component, args: [{ selector: 'x-foo', templateUrl: './missing.html' }] }
];
export class BetaComponent {
}
BetaComponent.decorators = [
    { type: Component, args: [{ selector: 'x-beta', template: '<i>b</i>' }] }
];
"#,
    )];
    let allocator = Allocator::default();
    let program = BundleProgram::parse(&allocator, &files, EntryPointFormat::Esm2015).unwrap();
    let analyses = analyze_with(&program, &NoopResourceLoader);
    let classes = &analyses[0].classes;
    assert_eq!(classes[0].state, ClassState::Poisoned);
    assert_eq!(classes[1].state, ClassState::Compiled);
}

#[test]
fn injectable_and_pipe_compile_their_own_definitions() {
    let files = vec![SourceFile::new(
        "/index.js",
        r#"import { Injectable, Pipe } from '@angular/core';
export class AlphaService {
}
AlphaService.decorators = [{ type: Injectable, args: [{ providedIn: 'root' }] }];
export class UpperPipe {
}
UpperPipe.decorators = [{ type: Pipe, args: [{ name: 'upper', pure: false }] }];
"#,
    )];
    let allocator = Allocator::default();
    let program = BundleProgram::parse(&allocator, &files, EntryPointFormat::Esm2015).unwrap();
    let analyses = analyze_with(&program, &NoopResourceLoader);
    let classes = &analyses[0].classes;

    let service = &classes[0];
    let results = service.compiled.as_ref().unwrap();
    assert!(results[1].initializer.contains("ɵɵdefineInjectable"));
    assert!(results[1].initializer.contains("providedIn: 'root'"));

    let pipe = &classes[1];
    let results = pipe.compiled.as_ref().unwrap();
    assert!(results[1].initializer.contains("ɵɵdefinePipe"));
    assert!(results[1].initializer.contains("name: \"upper\""));
    assert!(results[1].initializer.contains("pure: false"));
}

#[test]
fn ctor_deps_render_injection_flags() {
    let files = vec![SourceFile::new(
        "/index.js",
        r#"import { Injectable, Optional } from '@angular/core';
export class DepService {
}
DepService.decorators = [{ type: Injectable, args: [] }];
export class AlphaService {
}
AlphaService.decorators = [{ type: Injectable, args: [] }];
AlphaService.ctorParameters = function () { return [
    { type: DepService, decorators: [{ type: Optional, args: [] }] }
]; };
"#,
    )];
    let allocator = Allocator::default();
    let program = BundleProgram::parse(&allocator, &files, EntryPointFormat::Esm2015).unwrap();
    let analyses = analyze_with(&program, &NoopResourceLoader);
    let alpha = &analyses[0].classes[1];
    let results = alpha.compiled.as_ref().unwrap();
    assert!(results[0].initializer.contains("ɵɵinject(DepService, 8)"));
}

#[test]
fn ngmodule_warns_about_unknown_declarations() {
    let files = vec![SourceFile::new(
        "/index.js",
        r#"import { NgModule } from '@angular/core';
export class Orphan {
}
export class AlphaModule {
}
AlphaModule.decorators = [
    { type: NgModule, args: [{ declarations: [Orphan] }] }
];
"#,
    )];
    let allocator = Allocator::default();
    let program = BundleProgram::parse(&allocator, &files, EntryPointFormat::Esm2015).unwrap();
    let analyses = analyze_with(&program, &NoopResourceLoader);
    let module = &analyses[0].classes[0];
    assert_eq!(module.state, ClassState::Compiled);
    assert!(module
        .diagnostics
        .iter()
        .any(|diag| diag.message.contains("Orphan")));
    let results = module.compiled.as_ref().unwrap();
    assert!(results[1].initializer.contains("declarations: [Orphan]"));
    assert!(results[2].initializer.contains("ɵɵdefineInjector"));
}

#[test]
fn forward_referenced_deps_move_the_factory_out_of_line() {
    let files = vec![SourceFile::new(
        "/index.js",
        r#"import { Injectable, forwardRef, Inject } from '@angular/core';
export class AlphaService {
}
AlphaService.decorators = [{ type: Injectable, args: [] }];
AlphaService.ctorParameters = function () { return [
    { type: undefined, decorators: [{ type: Inject, args: [forwardRef(function () { return BetaService; })] }] }
]; };
export class BetaService {
}
BetaService.decorators = [{ type: Injectable, args: [] }];
"#,
    )];
    let allocator = Allocator::default();
    let program = BundleProgram::parse(&allocator, &files, EntryPointFormat::Esm2015).unwrap();
    let analyses = analyze_with(&program, &NoopResourceLoader);
    let alpha = &analyses[0].classes[0];
    assert_eq!(alpha.state, ClassState::Compiled);
    assert!(alpha.uses_closure_ctor_helper);
    let results = alpha.compiled.as_ref().unwrap();
    assert!(results[0]
        .initializer
        .contains("forwardRef(function () { return BetaService; })"));
}

#[test]
fn misused_forward_ref_poisons_the_class() {
    let files = vec![SourceFile::new(
        "/index.js",
        r#"import { Injectable, forwardRef, Inject } from '@angular/core';
export class AlphaService {
}
AlphaService.decorators = [{ type: Injectable, args: [] }];
AlphaService.ctorParameters = function () { return [
    { type: undefined, decorators: [{ type: Inject, args: [forwardRef('oops', 'extra')] }] }
]; };
"#,
    )];
    let allocator = Allocator::default();
    let program = BundleProgram::parse(&allocator, &files, EntryPointFormat::Esm2015).unwrap();
    let analyses = analyze_with(&program, &NoopResourceLoader);
    let alpha = &analyses[0].classes[0];
    assert_eq!(alpha.state, ClassState::Poisoned);
    assert!(alpha.diagnostics[0].message.contains("deferred reference"));
}

#[test]
fn already_compiled_classes_are_skipped() {
    let files = vec![SourceFile::new(
        "/index.js",
        r#"import { Injectable } from '@angular/core';
export class AlphaService {
}
AlphaService.decorators = [{ type: Injectable, args: [] }];
AlphaService.ɵfac = function AlphaService_Factory(t) { return new (t || AlphaService)(); };
"#,
    )];
    let allocator = Allocator::default();
    let program = BundleProgram::parse(&allocator, &files, EntryPointFormat::Esm2015).unwrap();
    let analyses = analyze_with(&program, &NoopResourceLoader);
    assert!(analyses.is_empty());
}
