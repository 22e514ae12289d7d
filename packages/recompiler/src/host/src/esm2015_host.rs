//! ESM2015 Reflection Host
//!
//! Reflects bundles in the direct-class format: plain ESM imports/exports
//! and `class` declarations carrying static metadata. This host doubles as
//! the generic reflector the other formats delegate to for any code that is
//! not encoded in a format-specific way.

use super::utils::{
    class_has_runtime_definitions, ctor_params_from_helper_call, declaration_in_statements,
    direct_classes, esm_import_of_name, helper_call_member_name, is_external_specifier,
    module_export_name_str, parse_ctor_parameters, parse_decorator_objects,
    parse_helper_call_decorators, parse_prop_decorators, static_property_assignment, ExportsCache,
};
use crate::diagnostics::FatalLinkerError;
use crate::packages::{BundleModuleResolver, BundleProgram, ParsedFile};
use crate::reflection::src::util::{class_name, declarator_name};
use crate::reflection::{
    ClassSymbol, CtorParameter, Declaration, DeclarationNode, Decorator, ExportMap, Import,
    ReflectionHost,
};
use indexmap::IndexMap;
use oxc_ast::ast;
use smallvec::SmallVec;
use std::rc::Rc;

pub struct Esm2015ReflectionHost<'a> {
    resolver: BundleModuleResolver<'a, 'a>,
    exports: ExportsCache<'a>,
}

impl<'a> Esm2015ReflectionHost<'a> {
    pub fn new(program: &'a BundleProgram<'a>) -> Self {
        Self {
            resolver: BundleModuleResolver::new(program),
            exports: ExportsCache::new(),
        }
    }

    /// Resolves `specifier` to a bundle file, carrying the provenance that a
    /// declaration pulled through it must be annotated with.
    fn resolve_target(
        &self,
        specifier: &str,
        containing: &str,
    ) -> Option<(&'a ParsedFile<'a>, Option<String>)> {
        let target = self.resolver.resolve_file(specifier, containing)?;
        let via_module = if is_external_specifier(specifier) {
            Some(specifier.to_string())
        } else {
            None
        };
        Some((target, via_module))
    }

    fn compute_exports(&self, file: &'a ParsedFile<'a>) -> ExportMap<'a> {
        let mut map = ExportMap::new();
        for stmt in &file.program.body {
            match stmt {
                ast::Statement::ExportNamedDeclaration(export) => {
                    if !export.export_kind.is_value() {
                        continue;
                    }
                    if let Some(decl) = &export.declaration {
                        self.add_declared_exports(&mut map, decl, file);
                    }
                    for spec in &export.specifiers {
                        let local = module_export_name_str(&spec.local);
                        let exported = module_export_name_str(&spec.exported);
                        match &export.source {
                            Some(source) => {
                                let Some((target, via_module)) =
                                    self.resolve_target(source.value.as_str(), file.path)
                                else {
                                    continue;
                                };
                                let Some(target_map) = self.exports_of_module(target) else {
                                    continue;
                                };
                                if let Some(declaration) = target_map.get(local) {
                                    map.insert(
                                        exported.to_string(),
                                        declaration.clone().with_via_module(via_module),
                                    );
                                }
                            }
                            None => {
                                if let Some(declaration) = declaration_in_statements(
                                    &file.program.body,
                                    local,
                                    file.path,
                                ) {
                                    map.insert(exported.to_string(), declaration);
                                }
                            }
                        }
                    }
                }
                ast::Statement::ExportAllDeclaration(export) => {
                    if !export.export_kind.is_value() || export.exported.is_some() {
                        continue;
                    }
                    let Some((target, via_module)) =
                        self.resolve_target(export.source.value.as_str(), file.path)
                    else {
                        continue;
                    };
                    let Some(target_map) = self.exports_of_module(target) else {
                        continue;
                    };
                    for (name, declaration) in target_map.iter() {
                        map.insert(
                            name.clone(),
                            declaration.clone().with_via_module(via_module.clone()),
                        );
                    }
                }
                ast::Statement::ExportDefaultDeclaration(export) => {
                    match &export.declaration {
                        ast::ExportDefaultDeclarationKind::ClassDeclaration(class) => {
                            map.insert(
                                "default".to_string(),
                                Declaration::concrete(DeclarationNode::Class(class), file.path),
                            );
                        }
                        ast::ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                            map.insert(
                                "default".to_string(),
                                Declaration::concrete(DeclarationNode::Function(func), file.path),
                            );
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
        map
    }

    fn add_declared_exports(
        &self,
        map: &mut ExportMap<'a>,
        decl: &'a ast::Declaration<'a>,
        file: &'a ParsedFile<'a>,
    ) {
        match decl {
            ast::Declaration::ClassDeclaration(class) => {
                if let Some(name) = class_name(class) {
                    map.insert(
                        name.to_string(),
                        Declaration::concrete(DeclarationNode::Class(class), file.path),
                    );
                }
            }
            ast::Declaration::FunctionDeclaration(func) => {
                if let Some(name) = func.id.as_ref().map(|id| id.name.as_str()) {
                    map.insert(
                        name.to_string(),
                        Declaration::concrete(DeclarationNode::Function(func), file.path),
                    );
                }
            }
            ast::Declaration::VariableDeclaration(var) => {
                for declarator in &var.declarations {
                    if let Some(name) = declarator_name(declarator) {
                        map.insert(
                            name.to_string(),
                            Declaration::concrete(DeclarationNode::Variable(declarator), file.path),
                        );
                    }
                }
            }
            _ => {}
        }
    }
}

impl<'a> ReflectionHost<'a> for Esm2015ReflectionHost<'a> {
    fn module_statements(&self, file: &'a ParsedFile<'a>) -> &'a [ast::Statement<'a>] {
        &file.program.body
    }

    fn import_of_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        id: &ast::IdentifierReference<'a>,
    ) -> Option<Import> {
        esm_import_of_name(&file.program, id.name.as_str())
    }

    fn declaration_of_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        id: &ast::IdentifierReference<'a>,
    ) -> Option<Declaration<'a>> {
        if let Some(local) =
            declaration_in_statements(&file.program.body, id.name.as_str(), file.path)
        {
            return Some(local);
        }

        let import = self.import_of_identifier(file, id)?;
        if import.is_namespace() {
            // A namespace object has no single declaration site.
            return None;
        }
        let (target, via_module) = self.resolve_target(&import.from, file.path)?;
        let target_map = self.exports_of_module(target)?;
        let declaration = target_map.get(&import.name)?.clone();
        Some(declaration.with_via_module(via_module))
    }

    fn exports_of_module(&self, file: &'a ParsedFile<'a>) -> Option<Rc<ExportMap<'a>>> {
        self.exports
            .get_or_compute(file.path, || self.compute_exports(file))
    }

    fn classes_in_file(&self, file: &'a ParsedFile<'a>) -> Vec<ClassSymbol<'a>> {
        direct_classes(&file.program.body)
    }

    fn decorators_of_class(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
    ) -> Result<SmallVec<[Decorator<'a>; 2]>, FatalLinkerError> {
        if let Some((value, _)) =
            static_property_assignment(&file.program.body, class, "decorators")
        {
            return parse_decorator_objects(self, file, value);
        }

        let mut decorators = SmallVec::new();
        for call in self.helper_calls_for_class(file, class, &["__decorate"]) {
            if helper_call_member_name(call).is_some() {
                continue;
            }
            decorators.extend(parse_helper_call_decorators(self, file, call));
        }
        Ok(decorators)
    }

    fn ctor_parameters(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
    ) -> Option<Vec<CtorParameter<'a>>> {
        if let Some((value, _)) =
            static_property_assignment(&file.program.body, class, "ctorParameters")
        {
            return parse_ctor_parameters(self, file, value);
        }
        for call in self.helper_calls_for_class(file, class, &["__decorate"]) {
            if helper_call_member_name(call).is_some() {
                continue;
            }
            if let Some(params) = ctor_params_from_helper_call(self, file, call) {
                return Some(params);
            }
        }
        None
    }

    fn prop_decorators(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
    ) -> IndexMap<String, Vec<Decorator<'a>>> {
        let mut map = if let Some((value, _)) =
            static_property_assignment(&file.program.body, class, "propDecorators")
        {
            parse_prop_decorators(self, file, value)
        } else {
            IndexMap::new()
        };

        for call in self.helper_calls_for_class(file, class, &["__decorate"]) {
            if let Some(member) = helper_call_member_name(call) {
                let decorators = parse_helper_call_decorators(self, file, call);
                if !decorators.is_empty() {
                    map.entry(member.to_string())
                        .or_default()
                        .extend(decorators);
                }
            }
        }
        map
    }

    fn helper_calls_for_class(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
        names: &[&str],
    ) -> Vec<&'a ast::CallExpression<'a>> {
        super::utils::helper_calls_for_class(&file.program.body, class, names)
    }

    fn has_runtime_definitions(&self, file: &'a ParsedFile<'a>, class: &ClassSymbol<'a>) -> bool {
        class_has_runtime_definitions(&file.program.body, class)
    }
}
