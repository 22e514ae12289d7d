//! ESM5 Reflection Host
//!
//! ESM5 bundles keep ESM import/export statements; only the class encoding
//! differs from ESM2015: each class is compiled to a closure-wrapped
//! constructor-function pair. Module reflection therefore delegates to the
//! ESM2015 host, while class discovery recognizes the closure shape.

use super::esm2015_host::Esm2015ReflectionHost;
use super::utils::{
    class_has_runtime_definitions, closure_classes, ctor_params_from_helper_call,
    helper_call_member_name, parse_ctor_parameters, parse_decorator_objects,
    parse_helper_call_decorators, parse_prop_decorators, static_property_assignment,
};
use crate::diagnostics::FatalLinkerError;
use crate::packages::{BundleProgram, ParsedFile};
use crate::reflection::{
    ClassSymbol, CtorParameter, Declaration, Decorator, ExportMap, Import, ReflectionHost,
};
use indexmap::IndexMap;
use oxc_ast::ast;
use smallvec::SmallVec;
use std::rc::Rc;

pub struct Esm5ReflectionHost<'a> {
    base: Esm2015ReflectionHost<'a>,
}

impl<'a> Esm5ReflectionHost<'a> {
    pub fn new(program: &'a BundleProgram<'a>) -> Self {
        Self {
            base: Esm2015ReflectionHost::new(program),
        }
    }
}

impl<'a> ReflectionHost<'a> for Esm5ReflectionHost<'a> {
    fn module_statements(&self, file: &'a ParsedFile<'a>) -> &'a [ast::Statement<'a>] {
        self.base.module_statements(file)
    }

    fn import_of_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        id: &ast::IdentifierReference<'a>,
    ) -> Option<Import> {
        self.base.import_of_identifier(file, id)
    }

    fn declaration_of_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        id: &ast::IdentifierReference<'a>,
    ) -> Option<Declaration<'a>> {
        self.base.declaration_of_identifier(file, id)
    }

    fn exports_of_module(&self, file: &'a ParsedFile<'a>) -> Option<Rc<ExportMap<'a>>> {
        self.base.exports_of_module(file)
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
