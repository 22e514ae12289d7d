//! Decoration Analyzer
//!
//! Walks every class of a bundle through the analysis state machine:
//! Detected -> Preanalyzed -> Analyzed -> Resolved -> Compiled, with
//! Poisoned as the absorbing error state. Classes within one file are
//! processed in declaration order; a poisoned class never blocks siblings.

use super::api::{
    ClassMetadata, ClassRecord, ClassState, CompiledFile, CtorDep, DecoratorKind, TemplateSource,
};
use super::compilation::compile_class;
use super::resource_loader::ResourceLoader;
use super::util::{object_property, validate_template};
use crate::diagnostics::{Diagnostic, ErrorCode, ErrorScope, FatalLinkerError, SourceSpan};
use crate::evaluator::{PartialEvaluator, ResolvedValue};
use crate::logging::Logger;
use crate::packages::{BundleProgram, ParsedFile};
use crate::reflection::src::util::unwrap_parens;
use crate::reflection::{ClassSymbol, Decorator, ReflectionHost, CORE_MODULE};
use crate::rendering::ImportManager;
use indexmap::IndexMap;
use oxc_ast::ast;
use oxc_span::Span;
use std::collections::HashMap;

pub struct DecorationAnalyzer<'e, 'a> {
    program: &'a BundleProgram<'a>,
    host: &'e dyn ReflectionHost<'a>,
    resource_loader: &'e dyn ResourceLoader,
    logger: &'e dyn Logger,
    is_core: bool,
}

impl<'e, 'a> DecorationAnalyzer<'e, 'a> {
    pub fn new(
        program: &'a BundleProgram<'a>,
        host: &'e dyn ReflectionHost<'a>,
        resource_loader: &'e dyn ResourceLoader,
        logger: &'e dyn Logger,
        is_core: bool,
    ) -> Self {
        Self {
            program,
            host,
            resource_loader,
            logger,
            is_core,
        }
    }

    /// Analyzes every file of the bundle. Only a bundle-scoped fatal error
    /// aborts the whole run; class- and file-scoped failures are folded into
    /// the per-file diagnostics.
    pub fn analyze_program(&self) -> Result<Vec<CompiledFile<'a>>, FatalLinkerError> {
        let evaluator = PartialEvaluator::new(self.host, self.is_core);
        let mut compiled = Vec::new();

        for file in &self.program.files {
            match self.analyze_file(&evaluator, file) {
                Ok(Some(compiled_file)) => compiled.push(compiled_file),
                Ok(None) => {}
                Err(error) => match error.scope {
                    ErrorScope::Bundle => return Err(error),
                    _ => compiled.push(CompiledFile {
                        file,
                        classes: Vec::new(),
                        diagnostics: vec![error.to_diagnostic()],
                        imports: Vec::new(),
                    }),
                },
            }
        }

        self.resolve_classes(&mut compiled);
        self.compile_classes(&mut compiled);
        Ok(compiled)
    }

    fn analyze_file(
        &self,
        evaluator: &PartialEvaluator<'e, 'a>,
        file: &'a ParsedFile<'a>,
    ) -> Result<Option<CompiledFile<'a>>, FatalLinkerError> {
        let classes = self.host.classes_in_file(file);
        if classes.is_empty() {
            return Ok(None);
        }

        let mut records = Vec::new();
        let mut diagnostics = Vec::new();

        for symbol in classes {
            if self.host.has_runtime_definitions(file, &symbol) {
                self.logger.debug(&format!(
                    "{}: class {} already carries definitions, skipping",
                    file.path, symbol.name
                ));
                continue;
            }

            let decorators = match self.host.decorators_of_class(file, &symbol) {
                Ok(decorators) => decorators,
                Err(error) => match error.scope {
                    ErrorScope::Class => {
                        diagnostics.push(error.to_diagnostic());
                        continue;
                    }
                    _ => return Err(error),
                },
            };

            let Some((kind, decorator)) = self.match_decorator(&decorators) else {
                continue;
            };

            let mut record = ClassRecord::detected(symbol, kind, decorator);
            self.preanalyze_class(evaluator, file, &mut record);
            if !record.is_poisoned() {
                self.analyze_class(evaluator, file, &mut record);
            }
            records.push(record);
        }

        if records.is_empty() && diagnostics.is_empty() {
            return Ok(None);
        }
        Ok(Some(CompiledFile {
            file,
            classes: records,
            diagnostics,
            imports: Vec::new(),
        }))
    }

    /// The first core-package decorator of a recognized kind wins.
    fn match_decorator(
        &self,
        decorators: &[Decorator<'a>],
    ) -> Option<(DecoratorKind, Decorator<'a>)> {
        decorators.iter().find_map(|decorator| {
            let kind = DecoratorKind::from_name(&decorator.name)?;
            if decorator.is_from_core(CORE_MODULE, self.is_core) {
                Some((kind, decorator.clone()))
            } else {
                None
            }
        })
    }

    /// Preanalysis loads the external resources a class depends on. Classes
    /// without external resources pass through untouched, so they are never
    /// blocked by siblings that have them.
    fn preanalyze_class(
        &self,
        evaluator: &PartialEvaluator<'e, 'a>,
        file: &'a ParsedFile<'a>,
        record: &mut ClassRecord<'a>,
    ) {
        if record.kind != DecoratorKind::Component {
            record.to_preanalyzed();
            return;
        }
        let Some(arg) = record.decorator.args.first().copied() else {
            record.to_preanalyzed();
            return;
        };
        let meta_value = match evaluator.evaluate(file, arg) {
            Ok(value) => value,
            Err(error) => {
                let span = record.decorator.span;
                record.poison(self.fatal_to_diagnostic(file, error, span));
                return;
            }
        };

        if let Some(url) = meta_value
            .get_property("templateUrl")
            .and_then(ResolvedValue::as_str)
        {
            match self.resource_loader.load(url, file.path) {
                Ok(text) => {
                    record.meta.get_or_insert_with(ClassMetadata::default).template =
                        Some(TemplateSource::External {
                            url: url.to_string(),
                            text,
                        });
                }
                Err(reason) => {
                    record.poison(
                        Diagnostic::error(
                            ErrorCode::ComponentResourceNotFound,
                            format!(
                                "could not load template '{}' for class {}: {}",
                                url, record.symbol.name, reason
                            ),
                        )
                        .with_span(self.span_of(file, record.decorator.span)),
                    );
                    return;
                }
            }
        }

        if let Some(urls) = meta_value
            .get_property("styleUrls")
            .and_then(|value| value.as_array().map(|urls| urls.to_vec()))
        {
            let mut styles = Vec::new();
            for url in urls.iter().filter_map(ResolvedValue::as_str) {
                match self.resource_loader.load(url, file.path) {
                    Ok(text) => styles.push(text),
                    Err(reason) => {
                        record.poison(
                            Diagnostic::error(
                                ErrorCode::ComponentResourceNotFound,
                                format!(
                                    "could not load style '{}' for class {}: {}",
                                    url, record.symbol.name, reason
                                ),
                            )
                            .with_span(self.span_of(file, record.decorator.span)),
                        );
                        return;
                    }
                }
            }
            record.meta.get_or_insert_with(ClassMetadata::default).styles = styles;
        }

        record.to_preanalyzed();
    }

    fn analyze_class(
        &self,
        evaluator: &PartialEvaluator<'e, 'a>,
        file: &'a ParsedFile<'a>,
        record: &mut ClassRecord<'a>,
    ) {
        let mut meta = record.meta.take().unwrap_or_default();
        // Pipes are pure unless the metadata says otherwise.
        meta.pure = true;

        if let Some(arg) = record.decorator.args.first().copied() {
            let value = match evaluator.evaluate(file, arg) {
                Ok(value) => value,
                Err(error) => {
                    let span = record.decorator.span;
                    record.poison(self.fatal_to_diagnostic(file, error, span));
                    return;
                }
            };
            let Some(object) = value.as_object() else {
                record.poison(
                    Diagnostic::error(
                        ErrorCode::DecoratorArgNotLiteral,
                        format!(
                            "the {:?} decorator argument of class {} must be an object literal",
                            record.kind, record.symbol.name
                        ),
                    )
                    .with_span(self.span_of(file, record.decorator.span)),
                );
                return;
            };

            meta.selector = object.get("selector").and_then(|v| v.as_str()).map(String::from);
            if meta.template.is_none() {
                if let Some(template) = object.get("template").and_then(|v| v.as_str()) {
                    meta.template = Some(TemplateSource::Inline(template.to_string()));
                }
            }
            if let Some(name) = object.get("name").and_then(|v| v.as_str()) {
                meta.pipe_name = Some(name.to_string());
            }
            if let Some(pure) = object.get("pure").and_then(|v| v.as_bool()) {
                meta.pure = pure;
            }
            if let Some(inputs) = object.get("inputs") {
                merge_binding_list(&mut meta.inputs, inputs);
            }
            if let Some(outputs) = object.get("outputs") {
                merge_binding_list(&mut meta.outputs, outputs);
            }
            if let Some(declarations) = object.get("declarations").and_then(|v| v.as_array()) {
                meta.declarations = declarations.to_vec();
            }

            meta.providers = object_property(arg, "providers");
            meta.provided_in = object_property(arg, "providedIn");
            meta.declarations_expr = object_property(arg, "declarations");
            meta.imports_expr = object_property(arg, "imports");
            meta.exports_expr = object_property(arg, "exports");
        }

        // Member decorators contribute inputs and outputs.
        for (field, decorators) in self.host.prop_decorators(file, &record.symbol) {
            for decorator in &decorators {
                if !decorator.is_from_core(CORE_MODULE, self.is_core) {
                    continue;
                }
                let public_name = decorator
                    .args
                    .first()
                    .and_then(|arg| string_literal(arg))
                    .unwrap_or_else(|| field.clone());
                match decorator.name.as_str() {
                    "Input" => {
                        meta.inputs.insert(field.clone(), public_name);
                    }
                    "Output" => {
                        meta.outputs.insert(field.clone(), public_name);
                    }
                    _ => {}
                }
            }
        }

        if let Err(error) = self.analyze_ctor_deps(evaluator, file, record, &mut meta) {
            let span = record.decorator.span;
            record.poison(self.fatal_to_diagnostic(file, error, span));
            return;
        }

        // Template validation decides between Analyzed and Poisoned.
        if record.kind == DecoratorKind::Component {
            match &meta.template {
                None => {
                    record.poison(
                        Diagnostic::error(
                            ErrorCode::ComponentMissingTemplate,
                            format!(
                                "component {} has neither a template nor a templateUrl",
                                record.symbol.name
                            ),
                        )
                        .with_span(self.span_of(file, record.decorator.span)),
                    );
                    return;
                }
                Some(template) => {
                    if let Err(reason) = validate_template(template.text()) {
                        record.poison(
                            Diagnostic::error(
                                ErrorCode::TemplateParseError,
                                format!(
                                    "template of component {} is unparsable: {}",
                                    record.symbol.name, reason
                                ),
                            )
                            .with_span(self.span_of(file, record.decorator.span)),
                        );
                        return;
                    }
                }
            }
        }

        record.to_analyzed(meta);
    }

    fn analyze_ctor_deps(
        &self,
        evaluator: &PartialEvaluator<'e, 'a>,
        file: &'a ParsedFile<'a>,
        record: &ClassRecord<'a>,
        meta: &mut ClassMetadata<'a>,
    ) -> Result<(), FatalLinkerError> {
        let Some(params) = self.host.ctor_parameters(file, &record.symbol) else {
            return Ok(());
        };

        let mut deps = Vec::with_capacity(params.len());
        for param in params {
            let mut dep = CtorDep {
                token_expr: param.token,
                token: None,
                optional: false,
                self_only: false,
                skip_self: false,
                host: false,
                attribute: None,
            };
            if let Some(token_expr) = param.token {
                dep.token = Some(evaluator.evaluate(file, token_expr)?);
            }
            for decorator in &param.decorators {
                if !decorator.is_from_core(CORE_MODULE, self.is_core) {
                    continue;
                }
                match decorator.name.as_str() {
                    "Inject" => {
                        if let Some(arg) = decorator.args.first().copied() {
                            dep.token_expr = Some(arg);
                            dep.token = Some(evaluator.evaluate(file, arg)?);
                        }
                    }
                    "Optional" => dep.optional = true,
                    "Self" => dep.self_only = true,
                    "SkipSelf" => dep.skip_self = true,
                    "Host" => dep.host = true,
                    "Attribute" => {
                        dep.attribute = decorator.args.first().and_then(|arg| string_literal(arg));
                    }
                    _ => {}
                }
            }
            deps.push(dep);
        }
        meta.ctor_deps = Some(deps);
        Ok(())
    }

    /// Whole-bundle reconciliation: forward-reference emission modes and
    /// same-bundle NgModule declaration lists.
    fn resolve_classes(&self, compiled: &mut [CompiledFile<'a>]) {
        let mut registry: HashMap<String, DecoratorKind> = HashMap::new();
        for compiled_file in compiled.iter() {
            for record in &compiled_file.classes {
                if record.state == ClassState::Analyzed {
                    registry.insert(record.symbol.name.clone(), record.kind);
                }
            }
        }

        for compiled_file in compiled.iter_mut() {
            for record in &mut compiled_file.classes {
                if record.state != ClassState::Analyzed {
                    continue;
                }

                let mut warnings = Vec::new();
                if let Some(meta) = &record.meta {
                    if let Some(deps) = &meta.ctor_deps {
                        record.uses_closure_ctor_helper = deps.iter().any(|dep| {
                            dep.token
                                .as_ref()
                                .and_then(ResolvedValue::as_reference)
                                .is_some_and(|reference| reference.synthesized_by_forward_ref)
                        });
                    }
                    if record.kind == DecoratorKind::NgModule {
                        for declaration in &meta.declarations {
                            let Some(reference) = declaration.as_reference() else {
                                continue;
                            };
                            // Imported declarations are compiled by their own
                            // package; only same-bundle names are checked.
                            if reference.import.is_none()
                                && !registry.contains_key(&reference.name)
                            {
                                warnings.push(Diagnostic::warning(
                                    ErrorCode::UnusedSymbol,
                                    format!(
                                        "NgModule {} declares {}, which is not a decorated class in this bundle",
                                        record.symbol.name, reference.name
                                    ),
                                ));
                            }
                        }
                    }
                }
                record.diagnostics.extend(warnings);
                record.to_resolved();
            }
        }
    }

    fn compile_classes(&self, compiled: &mut [CompiledFile<'a>]) {
        for compiled_file in compiled.iter_mut() {
            let mut imports = ImportManager::new(self.is_core);
            let mut count = 0;
            for record in &mut compiled_file.classes {
                if record.state != ClassState::Resolved {
                    continue;
                }
                record.decorator_removals =
                    self.metadata_assignment_spans(compiled_file.file, &record.symbol);
                let results = compile_class(record, compiled_file.file, &mut imports);
                record.to_compiled(results);
                count += 1;
            }
            compiled_file.imports = imports.finalize();
            if count > 0 {
                self.logger.debug(&format!(
                    "{}: compiled {} classes",
                    compiled_file.file.path, count
                ));
            }
        }
    }

    /// Spans of the whole-statement metadata assignments that become
    /// redundant once definitions are in place.
    fn metadata_assignment_spans(
        &self,
        file: &'a ParsedFile<'a>,
        symbol: &ClassSymbol<'a>,
    ) -> Vec<Span> {
        let scope = self.host.module_statements(file);
        ["decorators", "ctorParameters", "propDecorators"]
            .iter()
            .filter_map(|prop| {
                crate::host::src::utils::static_property_assignment(scope, symbol, prop)
                    .map(|(_, span)| span)
            })
            .collect()
    }

    fn span_of(&self, file: &ParsedFile<'a>, span: Span) -> SourceSpan {
        SourceSpan::from_offsets(
            file.path.to_string(),
            file.source,
            span.start as usize,
            span.end as usize,
        )
    }

    fn fatal_to_diagnostic(
        &self,
        file: &ParsedFile<'a>,
        error: FatalLinkerError,
        span: Span,
    ) -> Diagnostic {
        error.to_diagnostic().with_span(self.span_of(file, span))
    }
}

/// `["field: public", "field"]` binding lists from decorator metadata.
fn merge_binding_list<'a>(map: &mut IndexMap<String, String>, value: &ResolvedValue<'a>) {
    let Some(entries) = value.as_array() else {
        return;
    };
    for entry in entries.iter().filter_map(ResolvedValue::as_str) {
        match entry.split_once(':') {
            Some((field, public)) => {
                map.insert(field.trim().to_string(), public.trim().to_string());
            }
            None => {
                map.insert(entry.trim().to_string(), entry.trim().to_string());
            }
        }
    }
}

/// The value of a plain string-literal expression.
fn string_literal(expr: &ast::Expression<'_>) -> Option<String> {
    match unwrap_parens(expr) {
        ast::Expression::StringLiteral(lit) => Some(lit.value.to_string()),
        _ => None,
    }
}
