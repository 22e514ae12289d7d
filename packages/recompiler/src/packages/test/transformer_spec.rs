use crate::analysis::NoopResourceLoader;
use crate::logging::NullLogger;
use crate::packages::{
    transform_all, EntryPointBundle, EntryPointFormat, TransformResult, Transformer,
};

const ESM2015_FIXTURE: &str = r#"import { Component } from '@angular/core';
export class AlphaComponent {
}
AlphaComponent.decorators = [
    { type: Component, args: [{ selector: 'x-foo', template: '<span></span>' }] }
];
"#;

const ESM5_FIXTURE: &str = r#"import { Component } from '@angular/core';
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

const COMMONJS_FIXTURE: &str = r#"var core = require('@angular/core');
var AlphaComponent = (function () {
    function AlphaComponent() {
    }
    AlphaComponent.decorators = [
        { type: core.Component, args: [{ selector: 'x-foo', template: '<span></span>' }] }
    ];
    return AlphaComponent;
}());
exports.AlphaComponent = AlphaComponent;
"#;

const UMD_FIXTURE: &str = r#"(function (global, factory) {
    typeof exports === 'object' && typeof module !== 'undefined' ? factory(exports, require('@angular/core')) :
    typeof define === 'function' && define.amd ? define('alpha', ['exports', '@angular/core'], factory) :
    (global = global || self, factory(global.alpha = {}, global.ng.core));
}(this, (function (exports, core) { 'use strict';
    var AlphaComponent = (function () {
        function AlphaComponent() {
        }
        AlphaComponent.decorators = [
            { type: core.Component, args: [{ selector: 'x-foo', template: '<span></span>' }] }
        ];
        return AlphaComponent;
    }());
    exports.AlphaComponent = AlphaComponent;
})));
"#;

fn transform_single(format: EntryPointFormat, contents: &str) -> TransformResult {
    let logger = NullLogger;
    let loader = NoopResourceLoader;
    let transformer = Transformer::new(&logger, &loader);
    let bundle =
        EntryPointBundle::new(format, "/index.js").with_source("/index.js", contents);
    transformer.transform(&bundle)
}

fn success_contents(result: &TransformResult) -> &str {
    match result {
        TransformResult::Success { rendered_files, .. } => {
            assert_eq!(rendered_files.len(), 1, "expected exactly one rendered file");
            &rendered_files[0].contents
        }
        TransformResult::Failure { diagnostics } => {
            panic!("transform failed: {:?}", diagnostics)
        }
    }
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn esm2015_component_gains_exactly_one_definition() {
    let result = transform_single(EntryPointFormat::Esm2015, ESM2015_FIXTURE);
    let contents = success_contents(&result);

    assert_eq!(count(contents, "AlphaComponent.ɵcmp = "), 1);
    assert_eq!(count(contents, "AlphaComponent.ɵfac = "), 1);
    assert!(contents.contains("i0.ɵɵdefineComponent"));
    assert!(contents.contains("selectors: [[\"x-foo\"]]"));
    assert!(contents.contains("import * as i0 from '@angular/core';"));
    // Untouched code survives byte-for-byte.
    assert!(contents.contains("import { Component } from '@angular/core';"));
    assert!(contents.contains("export class AlphaComponent {\n}"));
    // The superseded metadata is gone.
    assert!(!contents.contains("AlphaComponent.decorators ="));
}

#[test]
fn esm5_definitions_land_inside_the_class_closure() {
    let result = transform_single(EntryPointFormat::Esm5, ESM5_FIXTURE);
    let contents = success_contents(&result);

    assert_eq!(count(contents, "AlphaComponent.ɵcmp = "), 1);
    let def_pos = contents.find("AlphaComponent.ɵcmp = ").unwrap();
    let return_pos = contents.find("return AlphaComponent;").unwrap();
    assert!(def_pos < return_pos, "definition must precede the closure return");
    assert!(contents.contains("function AlphaComponent()"));
    assert!(contents.contains("export { AlphaComponent };"));
}

#[test]
fn commonjs_imports_are_require_calls() {
    let result = transform_single(EntryPointFormat::CommonJs, COMMONJS_FIXTURE);
    let contents = success_contents(&result);

    assert_eq!(count(contents, "AlphaComponent.ɵcmp = "), 1);
    assert!(contents.contains("var i0 = require('@angular/core');"));
    assert!(contents.contains("exports.AlphaComponent = AlphaComponent;"));
    let def_pos = contents.find("AlphaComponent.ɵcmp = ").unwrap();
    let return_pos = contents.find("return AlphaComponent;").unwrap();
    assert!(def_pos < return_pos);
}

#[test]
fn umd_imports_rewrite_the_wrapper() {
    let result = transform_single(EntryPointFormat::Umd, UMD_FIXTURE);
    let contents = success_contents(&result);

    assert_eq!(count(contents, "AlphaComponent.ɵcmp = "), 1);
    // Factory signature gains the new parameter...
    assert!(contents.contains("function (exports, core, i0)"));
    // ...fed by every branch of the wrapper.
    assert_eq!(count(contents, "require('@angular/core')"), 2);
    assert!(contents.contains("['exports', '@angular/core', '@angular/core']"));
    assert!(contents.contains("global.ng.core, global.ng.core"));
}

#[test]
fn recompiling_own_output_is_a_no_op() {
    for (format, fixture) in [
        (EntryPointFormat::Esm2015, ESM2015_FIXTURE),
        (EntryPointFormat::Esm5, ESM5_FIXTURE),
        (EntryPointFormat::CommonJs, COMMONJS_FIXTURE),
        (EntryPointFormat::Umd, UMD_FIXTURE),
    ] {
        let first = transform_single(format, fixture);
        let contents = success_contents(&first).to_string();

        let second = transform_single(format, &contents);
        match second {
            TransformResult::Success {
                diagnostics,
                rendered_files,
            } => {
                assert!(
                    diagnostics.is_empty(),
                    "{}: second pass must be clean, got {:?}",
                    format,
                    diagnostics
                );
                assert!(
                    rendered_files.is_empty(),
                    "{}: second pass must not rewrite anything",
                    format
                );
            }
            TransformResult::Failure { diagnostics } => {
                panic!("{}: second pass failed: {:?}", format, diagnostics)
            }
        }
    }
}

#[test]
fn poisoned_class_does_not_block_its_sibling() {
    let result = transform_single(
        EntryPointFormat::Esm2015,
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
    );
    let TransformResult::Success {
        diagnostics,
        rendered_files,
    } = result
    else {
        panic!("expected success with diagnostics");
    };
    assert_eq!(rendered_files.len(), 1);
    assert!(diagnostics.iter().any(|diag| diag.is_error()));

    let contents = &rendered_files[0].contents;
    assert_eq!(count(contents, "FineComponent.ɵcmp = "), 1);
    assert_eq!(count(contents, "BrokenComponent.ɵcmp = "), 0);
    // The poisoned class keeps its original metadata.
    assert!(contents.contains("BrokenComponent.decorators ="));
}

#[test]
fn opaque_expressions_are_reemitted_unchanged() {
    let result = transform_single(
        EntryPointFormat::Esm2015,
        r#"import { Component } from '@angular/core';
import { makeProviders } from './providers';
export class AlphaComponent {
}
AlphaComponent.decorators = [
    { type: Component, args: [{ selector: 'x-foo', template: '<b></b>', providers: makeProviders('config') }] }
];
"#,
    );
    let contents = success_contents(&result);
    assert!(contents.contains("providers: makeProviders('config')"));
}

#[test]
fn declaration_files_stay_in_sync() {
    let logger = NullLogger;
    let loader = NoopResourceLoader;
    let transformer = Transformer::new(&logger, &loader);
    let bundle = EntryPointBundle::new(EntryPointFormat::Esm2015, "/index.js")
        .with_source("/index.js", ESM2015_FIXTURE)
        .with_dts(
            "/index.d.ts",
            "export declare class AlphaComponent {\n    value: string;\n}\n",
        );
    let result = transformer.transform(&bundle);

    let TransformResult::Success { rendered_files, .. } = result else {
        panic!("transform failed");
    };
    assert_eq!(rendered_files.len(), 2);
    let dts = rendered_files
        .iter()
        .find(|file| file.path == "/index.d.ts")
        .unwrap();
    assert!(dts
        .contents
        .contains("static ɵfac: i0.ɵɵFactoryDeclaration<AlphaComponent, never>;"));
    assert!(dts.contents.contains(
        "static ɵcmp: i0.ɵɵComponentDeclaration<AlphaComponent, \"x-foo\", never, {}, {}, never>;"
    ));
    assert!(dts
        .contents
        .contains("import * as i0 from '@angular/core';"));
    // The original member is untouched.
    assert!(dts.contents.contains("value: string;"));
}

#[test]
fn unchanged_declaration_files_are_not_rewritten() {
    let logger = NullLogger;
    let loader = NoopResourceLoader;
    let transformer = Transformer::new(&logger, &loader);
    let bundle = EntryPointBundle::new(EntryPointFormat::Esm2015, "/index.js")
        .with_source("/index.js", ESM2015_FIXTURE)
        .with_dts("/unrelated.d.ts", "export declare class Unrelated {\n}\n");
    let result = transformer.transform(&bundle);
    let TransformResult::Success { rendered_files, .. } = result else {
        panic!("transform failed");
    };
    assert_eq!(rendered_files.len(), 1);
    assert_eq!(rendered_files[0].path, "/index.js");
}

#[test]
fn broken_umd_wrapper_fails_the_whole_bundle() {
    let result = transform_single(
        EntryPointFormat::Umd,
        r#"(function (global, factory) {
    typeof exports === 'object' ? factory(exports) :
    factory(global.alpha = {});
}(this, (function (exports, core) {
    exports.answer = 42;
})));
"#,
    );
    let TransformResult::Failure { diagnostics } = result else {
        panic!("expected a bundle failure");
    };
    assert!(!diagnostics.is_empty());
}

#[test]
fn parse_errors_fail_the_bundle() {
    let result = transform_single(EntryPointFormat::Esm2015, "export class {{{");
    assert!(!result.is_success());
}

#[test]
fn rendered_files_carry_source_maps() {
    let result = transform_single(EntryPointFormat::Esm2015, ESM2015_FIXTURE);
    let TransformResult::Success { rendered_files, .. } = result else {
        panic!("transform failed");
    };
    let map = rendered_files[0].map.as_ref().unwrap();
    assert_eq!(map.version, 3);
    assert_eq!(map.sources, vec!["/index.js".to_string()]);
    assert!(!map.mappings.is_empty());
    assert!(rendered_files[0]
        .contents
        .contains("//# sourceMappingURL=index.js.map"));
}

#[test]
fn core_library_bundles_reference_helpers_without_imports() {
    let logger = NullLogger;
    let loader = NoopResourceLoader;
    let transformer = Transformer::new(&logger, &loader);
    // Inside the core package the decorators are local declarations.
    let bundle = EntryPointBundle::new(EntryPointFormat::Esm2015, "/index.js")
        .with_source(
            "/index.js",
            r#"export function Injectable() { return function () {}; }
export class ChangeDetectorRef {
}
ChangeDetectorRef.decorators = [{ type: Injectable, args: [] }];
"#,
        )
        .with_is_core(true);
    let result = transformer.transform(&bundle);
    let contents = success_contents(&result);

    assert!(contents.contains("ChangeDetectorRef.ɵprov = ɵɵdefineInjectable("));
    assert!(!contents.contains("import * as i0"));
    assert!(result.diagnostics().is_empty());
}

#[test]
fn bundles_transform_independently_in_parallel() {
    let logger = NullLogger;
    let loader = NoopResourceLoader;
    let transformer = Transformer::new(&logger, &loader);
    let bundles = vec![
        EntryPointBundle::new(EntryPointFormat::Esm2015, "/index.js")
            .with_source("/index.js", ESM2015_FIXTURE),
        EntryPointBundle::new(EntryPointFormat::CommonJs, "/index.js")
            .with_source("/index.js", COMMONJS_FIXTURE),
        EntryPointBundle::new(EntryPointFormat::Umd, "/index.js")
            .with_source("/index.js", UMD_FIXTURE),
    ];
    let results = transform_all(&transformer, &bundles);
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(TransformResult::is_success));
}
