//! UMD Reflection Host
//!
//! Reflects bundles in the wrapped-factory format. The module scope is the
//! body of the factory function inside the UMD wrapper; imports are the
//! factory's parameters, mapped back to module specifiers through the
//! wrapper's CommonJS branch. Everything inside the factory body follows the
//! CommonJS/ES5 encoding.

use super::commonjs_umd_utils::{
    fold_commonjs_exports, parse_umd_wrapper, require_import_of_name, UmdWrapper,
};
use super::utils::{
    class_has_runtime_definitions, closure_classes, ctor_params_from_helper_call,
    declaration_in_statements, helper_call_member_name, is_external_specifier,
    parse_ctor_parameters, parse_decorator_objects, parse_helper_call_decorators,
    parse_prop_decorators, static_property_assignment, ExportsCache,
};
use crate::diagnostics::FatalLinkerError;
use crate::packages::{BundleModuleResolver, BundleProgram, ParsedFile};
use crate::reflection::{
    ClassSymbol, CtorParameter, Declaration, DeclarationNode, Decorator, ExportMap, Import,
    KnownDeclaration, ReflectionHost,
};
use indexmap::IndexMap;
use oxc_ast::ast;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::rc::Rc;

pub struct UmdReflectionHost<'a> {
    resolver: BundleModuleResolver<'a, 'a>,
    wrappers: HashMap<&'a str, UmdWrapper<'a>>,
    exports: ExportsCache<'a>,
}

impl<'a> UmdReflectionHost<'a> {
    /// Parses the UMD wrapper of every bundle file up front. A file whose
    /// wrapper cannot be reconciled with the declared format fails the whole
    /// bundle; no meaningful reflection is possible for it.
    pub fn new(program: &'a BundleProgram<'a>) -> Result<Self, FatalLinkerError> {
        let mut wrappers = HashMap::new();
        for file in &program.files {
            wrappers.insert(file.path, parse_umd_wrapper(file)?);
        }
        Ok(Self {
            resolver: BundleModuleResolver::new(program),
            wrappers,
            exports: ExportsCache::new(),
        })
    }

    pub fn wrapper(&self, file: &ParsedFile<'a>) -> Option<&UmdWrapper<'a>> {
        self.wrappers.get(file.path)
    }
}

impl std::fmt::Debug for UmdReflectionHost<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UmdReflectionHost")
            .field("wrappers", &self.wrappers.len())
            .finish_non_exhaustive()
    }
}

impl<'a> ReflectionHost<'a> for UmdReflectionHost<'a> {
    fn module_statements(&self, file: &'a ParsedFile<'a>) -> &'a [ast::Statement<'a>] {
        match self.wrappers.get(file.path) {
            Some(wrapper) => wrapper.factory_statements(),
            None => &[],
        }
    }

    fn import_of_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        id: &ast::IdentifierReference<'a>,
    ) -> Option<Import> {
        let wrapper = self.wrappers.get(file.path)?;
        if let Some(import) = wrapper.import_of_name(id.name.as_str()) {
            return Some(import);
        }
        // Some UMD emitters still require() lazily inside the factory.
        require_import_of_name(wrapper.factory_statements(), id.name.as_str())
    }

    fn declaration_of_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        id: &ast::IdentifierReference<'a>,
    ) -> Option<Declaration<'a>> {
        let wrapper = self.wrappers.get(file.path)?;

        // Factory parameters bind imports; check them before local
        // declarations.
        if let Some(import) = self.import_of_identifier(file, id) {
            if import.is_namespace() {
                return None;
            }
            if let Some(target) = self.resolver.resolve_file(&import.from, file.path) {
                if let Some(declaration) = self
                    .exports_of_module(target)
                    .and_then(|map| map.get(&import.name).cloned())
                {
                    let via_module =
                        is_external_specifier(&import.from).then(|| import.from.clone());
                    return Some(declaration.with_via_module(via_module));
                }
            }
            return None;
        }

        // The wrapper's `global` parameter is a well-known object, not a
        // definition site in this bundle.
        if let Some(param) = wrapper
            .params
            .iter()
            .find(|param| param.name == id.name.as_str() && param.specifier.is_none())
        {
            if param.name != wrapper.exports_name {
                return Some(
                    Declaration::concrete(DeclarationNode::Parameter(param.param), file.path)
                        .with_known(KnownDeclaration::JsGlobalObject),
                );
            }
        }

        declaration_in_statements(wrapper.factory_statements(), id.name.as_str(), file.path)
    }

    fn exports_of_module(&self, file: &'a ParsedFile<'a>) -> Option<Rc<ExportMap<'a>>> {
        let wrapper = self.wrappers.get(file.path)?;
        self.exports.get_or_compute(file.path, || {
            fold_commonjs_exports(
                self,
                file,
                wrapper.factory_statements(),
                &self.resolver,
                wrapper.exports_name,
            )
        })
    }

    fn classes_in_file(&self, file: &'a ParsedFile<'a>) -> Vec<ClassSymbol<'a>> {
        closure_classes(self.module_statements(file))
    }

    fn decorators_of_class(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
    ) -> Result<SmallVec<[Decorator<'a>; 2]>, FatalLinkerError> {
        let scope = self.module_statements(file);
        if let Some((value, _)) = static_property_assignment(scope, class, "decorators") {
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
        let scope = self.module_statements(file);
        if let Some((value, _)) = static_property_assignment(scope, class, "ctorParameters") {
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
        let scope = self.module_statements(file);
        let mut map =
            if let Some((value, _)) = static_property_assignment(scope, class, "propDecorators") {
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
        super::utils::helper_calls_for_class(self.module_statements(file), class, names)
    }

    fn has_runtime_definitions(&self, file: &'a ParsedFile<'a>, class: &ClassSymbol<'a>) -> bool {
        class_has_runtime_definitions(self.module_statements(file), class)
    }
}
