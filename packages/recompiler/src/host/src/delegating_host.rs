//! Delegating Reflection Host
//!
//! Layers the generic (direct-class, ESM) reflector over a format-specific
//! one so that plain, non-format-encoded code is handled uniformly: every
//! lookup consults the generic reflector first and applies format-specific
//! logic only when the generic one finds nothing. Dispatch is closed — the
//! format host is chosen once per bundle — and the fallback is explicit
//! delegation rather than inheritance.

use super::esm2015_host::Esm2015ReflectionHost;
use crate::diagnostics::FatalLinkerError;
use crate::packages::{BundleProgram, ParsedFile};
use crate::reflection::{
    ClassSymbol, CtorParameter, Declaration, Decorator, ExportMap, Import, ReflectionHost,
};
use indexmap::IndexMap;
use oxc_ast::ast;
use smallvec::SmallVec;
use std::rc::Rc;

pub struct DelegatingReflectionHost<'a> {
    generic: Esm2015ReflectionHost<'a>,
    format: Box<dyn ReflectionHost<'a> + 'a>,
}

impl<'a> DelegatingReflectionHost<'a> {
    pub fn new(program: &'a BundleProgram<'a>, format: Box<dyn ReflectionHost<'a> + 'a>) -> Self {
        Self {
            generic: Esm2015ReflectionHost::new(program),
            format,
        }
    }
}

impl<'a> ReflectionHost<'a> for DelegatingReflectionHost<'a> {
    fn module_statements(&self, file: &'a ParsedFile<'a>) -> &'a [ast::Statement<'a>] {
        // The module scope is structural, not a lookup: only the format host
        // knows where it lives (e.g. inside a factory function).
        self.format.module_statements(file)
    }

    fn import_of_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        id: &ast::IdentifierReference<'a>,
    ) -> Option<Import> {
        self.generic
            .import_of_identifier(file, id)
            .or_else(|| self.format.import_of_identifier(file, id))
    }

    fn declaration_of_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        id: &ast::IdentifierReference<'a>,
    ) -> Option<Declaration<'a>> {
        self.generic
            .declaration_of_identifier(file, id)
            .or_else(|| self.format.declaration_of_identifier(file, id))
    }

    fn exports_of_module(&self, file: &'a ParsedFile<'a>) -> Option<Rc<ExportMap<'a>>> {
        match self.generic.exports_of_module(file) {
            Some(map) if !map.is_empty() => Some(map),
            _ => self.format.exports_of_module(file),
        }
    }

    fn classes_in_file(&self, file: &'a ParsedFile<'a>) -> Vec<ClassSymbol<'a>> {
        // Class and decorator encodings are what make a format a format; the
        // format host owns them outright.
        self.format.classes_in_file(file)
    }

    fn decorators_of_class(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
    ) -> Result<SmallVec<[Decorator<'a>; 2]>, FatalLinkerError> {
        self.format.decorators_of_class(file, class)
    }

    fn ctor_parameters(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
    ) -> Option<Vec<CtorParameter<'a>>> {
        self.format.ctor_parameters(file, class)
    }

    fn prop_decorators(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
    ) -> IndexMap<String, Vec<Decorator<'a>>> {
        self.format.prop_decorators(file, class)
    }

    fn helper_calls_for_class(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
        names: &[&str],
    ) -> Vec<&'a ast::CallExpression<'a>> {
        let calls = self.generic.helper_calls_for_class(file, class, names);
        if calls.is_empty() {
            self.format.helper_calls_for_class(file, class, names)
        } else {
            calls
        }
    }

    fn has_runtime_definitions(&self, file: &'a ParsedFile<'a>, class: &ClassSymbol<'a>) -> bool {
        self.format.has_runtime_definitions(file, class)
    }
}
