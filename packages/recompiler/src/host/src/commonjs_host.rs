//! CommonJS Reflection Host
//!
//! Reflects bundles in the plain-exports-object format: `require(...)`
//! imports bound to variables, `exports.X = ...` property exports, wildcard
//! `__export`/`__exportStar` re-exports, and accessor-style
//! `Object.defineProperty(exports, ...)` re-exports. Classes use the ES5
//! closure encoding.

use super::commonjs_umd_utils::{fold_commonjs_exports, require_import_of_name};
use super::utils::{
    class_has_runtime_definitions, closure_classes, ctor_params_from_helper_call,
    declaration_in_statements, helper_call_member_name, parse_ctor_parameters,
    parse_decorator_objects, parse_helper_call_decorators, parse_prop_decorators,
    static_property_assignment, ExportsCache,
};
use crate::diagnostics::FatalLinkerError;
use crate::packages::{BundleModuleResolver, BundleProgram, ParsedFile};
use crate::reflection::{
    ClassSymbol, CtorParameter, Declaration, Decorator, ExportMap, Import, ReflectionHost,
};
use indexmap::IndexMap;
use oxc_ast::ast;
use smallvec::SmallVec;
use std::rc::Rc;

pub struct CommonJsReflectionHost<'a> {
    resolver: BundleModuleResolver<'a, 'a>,
    exports: ExportsCache<'a>,
}

impl<'a> CommonJsReflectionHost<'a> {
    pub fn new(program: &'a BundleProgram<'a>) -> Self {
        Self {
            resolver: BundleModuleResolver::new(program),
            exports: ExportsCache::new(),
        }
    }
}

impl<'a> ReflectionHost<'a> for CommonJsReflectionHost<'a> {
    fn module_statements(&self, file: &'a ParsedFile<'a>) -> &'a [ast::Statement<'a>] {
        &file.program.body
    }

    fn import_of_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        id: &ast::IdentifierReference<'a>,
    ) -> Option<Import> {
        require_import_of_name(&file.program.body, id.name.as_str())
    }

    fn declaration_of_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        id: &ast::IdentifierReference<'a>,
    ) -> Option<Declaration<'a>> {
        // Require bindings are syntactically local variables; the import
        // check must come first so they resolve to their real definition.
        if let Some(import) = self.import_of_identifier(file, id) {
            if import.is_namespace() {
                return None;
            }
            if let Some(target) = self.resolver.resolve_file(&import.from, file.path) {
                if let Some(declaration) = self
                    .exports_of_module(target)
                    .and_then(|map| map.get(&import.name).cloned())
                {
                    let via_module = super::utils::is_external_specifier(&import.from)
                        .then(|| import.from.clone());
                    return Some(declaration.with_via_module(via_module));
                }
            }
            return None;
        }
        declaration_in_statements(&file.program.body, id.name.as_str(), file.path)
    }

    fn exports_of_module(&self, file: &'a ParsedFile<'a>) -> Option<Rc<ExportMap<'a>>> {
        self.exports.get_or_compute(file.path, || {
            fold_commonjs_exports(self, file, &file.program.body, &self.resolver, "exports")
        })
    }

    fn classes_in_file(&self, file: &'a ParsedFile<'a>) -> Vec<ClassSymbol<'a>> {
        closure_classes(&file.program.body)
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
