//! Definition Compilation
//!
//! Turns a resolved `ClassRecord` into the static definition fields to add
//! to the class. Reference-bearing metadata (provider lists, injection
//! tokens, module member lists) is re-emitted verbatim from the original
//! source so that values the evaluator treated as opaque survive unchanged.

use super::api::{ClassRecord, CompileResult, CtorDep, DecoratorKind};
use super::util::{quote, render_selectors};
use crate::packages::ParsedFile;
use crate::reflection::src::util::source_text;
use crate::reflection::CORE_MODULE;
use crate::rendering::ImportManager;
use indexmap::IndexMap;
use oxc_span::GetSpan;

/// Generates the definition fields for one class. The record must be in the
/// `Resolved` state; the caller transitions it to `Compiled` with the result.
pub fn compile_class<'a>(
    record: &ClassRecord<'a>,
    file: &ParsedFile<'a>,
    imports: &mut ImportManager,
) -> Vec<CompileResult> {
    let name = record.symbol.name.as_str();
    let meta = record.meta.as_ref();

    let mut results = vec![compile_factory(record, file, imports)];

    match record.kind {
        DecoratorKind::Component => {
            let mut fields = vec![format!("type: {}", name)];
            if let Some(meta) = meta {
                if let Some(selector) = &meta.selector {
                    fields.push(format!("selectors: {}", render_selectors(selector)));
                }
                push_binding_fields(&mut fields, meta.inputs.clone(), meta.outputs.clone());
                if let Some(providers) = meta.providers {
                    fields.push(format!(
                        "providers: {}",
                        source_text(file.source, providers.span())
                    ));
                }
                if let Some(template) = &meta.template {
                    fields.push(format!("template: {}", quote(template.text())));
                }
                if !meta.styles.is_empty() {
                    let styles: Vec<String> =
                        meta.styles.iter().map(|style| quote(style)).collect();
                    fields.push(format!("styles: [{}]", styles.join(", ")));
                }
            }
            results.push(CompileResult {
                name: "ɵcmp".to_string(),
                initializer: format!(
                    "{}({{ {} }})",
                    imports.qualified(CORE_MODULE, "ɵɵdefineComponent"),
                    fields.join(", ")
                ),
                type_desc: format!(
                    "ɵɵComponentDeclaration<{}, {}, never, {{}}, {{}}, never>",
                    name,
                    meta.and_then(|meta| meta.selector.as_deref())
                        .map_or_else(|| "never".to_string(), quote)
                ),
            });
        }
        DecoratorKind::Directive => {
            let mut fields = vec![format!("type: {}", name)];
            if let Some(meta) = meta {
                if let Some(selector) = &meta.selector {
                    fields.push(format!("selectors: {}", render_selectors(selector)));
                }
                push_binding_fields(&mut fields, meta.inputs.clone(), meta.outputs.clone());
                if let Some(providers) = meta.providers {
                    fields.push(format!(
                        "providers: {}",
                        source_text(file.source, providers.span())
                    ));
                }
            }
            results.push(CompileResult {
                name: "ɵdir".to_string(),
                initializer: format!(
                    "{}({{ {} }})",
                    imports.qualified(CORE_MODULE, "ɵɵdefineDirective"),
                    fields.join(", ")
                ),
                type_desc: format!(
                    "ɵɵDirectiveDeclaration<{}, {}, never, {{}}, {{}}, never>",
                    name,
                    meta.and_then(|meta| meta.selector.as_deref())
                        .map_or_else(|| "never".to_string(), quote)
                ),
            });
        }
        DecoratorKind::Injectable => {
            let mut fields = vec![
                format!("token: {}", name),
                format!("factory: {}.ɵfac", name),
            ];
            if let Some(provided_in) = meta.and_then(|meta| meta.provided_in) {
                fields.push(format!(
                    "providedIn: {}",
                    source_text(file.source, provided_in.span())
                ));
            }
            results.push(CompileResult {
                name: "ɵprov".to_string(),
                initializer: format!(
                    "{}({{ {} }})",
                    imports.qualified(CORE_MODULE, "ɵɵdefineInjectable"),
                    fields.join(", ")
                ),
                type_desc: format!("ɵɵInjectableDeclaration<{}>", name),
            });
        }
        DecoratorKind::Pipe => {
            let pipe_name = meta
                .and_then(|meta| meta.pipe_name.as_deref())
                .unwrap_or(name);
            let pure = meta.map_or(true, |meta| meta.pure);
            results.push(CompileResult {
                name: "ɵpipe".to_string(),
                initializer: format!(
                    "{}({{ name: {}, type: {}, pure: {} }})",
                    imports.qualified(CORE_MODULE, "ɵɵdefinePipe"),
                    quote(pipe_name),
                    name,
                    pure
                ),
                type_desc: format!("ɵɵPipeDeclaration<{}, {}>", name, quote(pipe_name)),
            });
        }
        DecoratorKind::NgModule => {
            let mut mod_fields = vec![format!("type: {}", name)];
            let mut inj_fields = Vec::new();
            if let Some(meta) = meta {
                if let Some(declarations) = meta.declarations_expr {
                    mod_fields.push(format!(
                        "declarations: {}",
                        source_text(file.source, declarations.span())
                    ));
                }
                if let Some(imports_expr) = meta.imports_expr {
                    let text = source_text(file.source, imports_expr.span());
                    mod_fields.push(format!("imports: {}", text));
                    inj_fields.push(format!("imports: {}", text));
                }
                if let Some(exports_expr) = meta.exports_expr {
                    mod_fields.push(format!(
                        "exports: {}",
                        source_text(file.source, exports_expr.span())
                    ));
                }
                if let Some(providers) = meta.providers {
                    inj_fields.push(format!(
                        "providers: {}",
                        source_text(file.source, providers.span())
                    ));
                }
            }
            results.push(CompileResult {
                name: "ɵmod".to_string(),
                initializer: format!(
                    "{}({{ {} }})",
                    imports.qualified(CORE_MODULE, "ɵɵdefineNgModule"),
                    mod_fields.join(", ")
                ),
                type_desc: format!("ɵɵNgModuleDeclaration<{}, never, never, never>", name),
            });
            results.push(CompileResult {
                name: "ɵinj".to_string(),
                initializer: format!(
                    "{}({{ {} }})",
                    imports.qualified(CORE_MODULE, "ɵɵdefineInjector"),
                    inj_fields.join(", ")
                ),
                type_desc: format!("ɵɵInjectorDeclaration<{}>", name),
            });
        }
    }

    results
}

fn compile_factory<'a>(
    record: &ClassRecord<'a>,
    file: &ParsedFile<'a>,
    imports: &mut ImportManager,
) -> CompileResult {
    let name = record.symbol.name.as_str();
    let inject_fn = match record.kind {
        DecoratorKind::Injectable | DecoratorKind::NgModule => "ɵɵinject",
        _ => "ɵɵdirectiveInject",
    };

    let args = match record.meta.as_ref().and_then(|meta| meta.ctor_deps.as_ref()) {
        None => String::new(),
        Some(deps) => deps
            .iter()
            .map(|dep| render_dep(dep, file, imports, inject_fn))
            .collect::<Vec<_>>()
            .join(", "),
    };

    CompileResult {
        name: "ɵfac".to_string(),
        initializer: format!(
            "function {}_Factory(t) {{ return new (t || {})({}); }}",
            name, name, args
        ),
        type_desc: format!("ɵɵFactoryDeclaration<{}, never>", name),
    }
}

fn render_dep<'a>(
    dep: &CtorDep<'a>,
    file: &ParsedFile<'a>,
    imports: &mut ImportManager,
    inject_fn: &str,
) -> String {
    if let Some(attribute) = &dep.attribute {
        return format!(
            "{}({})",
            imports.qualified(CORE_MODULE, "ɵɵinjectAttribute"),
            quote(attribute)
        );
    }

    let token = match dep.token_expr {
        Some(expr) => source_text(file.source, expr.span()).to_string(),
        None => "undefined".to_string(),
    };

    // Flag bits understood by the runtime injector.
    let mut flags = 0;
    if dep.host {
        flags |= 1;
    }
    if dep.self_only {
        flags |= 2;
    }
    if dep.skip_self {
        flags |= 4;
    }
    if dep.optional {
        flags |= 8;
    }

    if flags != 0 {
        format!(
            "{}({}, {})",
            imports.qualified(CORE_MODULE, inject_fn),
            token,
            flags
        )
    } else {
        format!("{}({})", imports.qualified(CORE_MODULE, inject_fn), token)
    }
}

fn push_binding_fields(
    fields: &mut Vec<String>,
    inputs: IndexMap<String, String>,
    outputs: IndexMap<String, String>,
) {
    if !inputs.is_empty() {
        fields.push(format!("inputs: {}", render_binding_map(&inputs)));
    }
    if !outputs.is_empty() {
        fields.push(format!("outputs: {}", render_binding_map(&outputs)));
    }
}

fn render_binding_map(map: &IndexMap<String, String>) -> String {
    let entries: Vec<String> = map
        .iter()
        .map(|(field, public)| format!("{}: {}", field, quote(public)))
        .collect();
    format!("{{ {} }}", entries.join(", "))
}
