//! Shared reflection machinery for the format hosts.
//!
//! Compiled bundles are flat: everything of interest sits in the module
//! scope (the program body, or the factory body for wrapped-factory
//! modules). These helpers walk such a statement list and recognize the
//! class, metadata, and helper-call encodings the individual hosts share.

use crate::diagnostics::FatalLinkerError;
use crate::packages::ParsedFile;
use crate::reflection::src::util::{
    class_name, declarator_name, property_key_name, source_text, unwrap_parens,
};
use crate::reflection::{
    ClassNode, ClassSymbol, CtorParameter, Declaration, DeclarationNode, Decorator, Import,
    KnownDeclaration, ReflectionHost, RUNTIME_DEFINITION_FIELDS,
};
use crate::reflection::ExportMap;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use oxc_ast::ast;
use oxc_span::{GetSpan, Span};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

/// Per-bundle store of computed export maps, keyed by file path.
///
/// A map is computed at most once for the lifetime of the owning host; a
/// recompute can never silently diverge from the first computation. The
/// in-progress set breaks re-export cycles: a file reached again while its
/// own map is still being computed contributes nothing.
pub struct ExportsCache<'a> {
    maps: RefCell<HashMap<&'a str, Rc<ExportMap<'a>>>>,
    in_progress: RefCell<HashSet<&'a str>>,
}

impl<'a> Default for ExportsCache<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> ExportsCache<'a> {
    pub fn new() -> Self {
        Self {
            maps: RefCell::new(HashMap::new()),
            in_progress: RefCell::new(HashSet::new()),
        }
    }

    pub fn get_or_compute(
        &self,
        path: &'a str,
        compute: impl FnOnce() -> ExportMap<'a>,
    ) -> Option<Rc<ExportMap<'a>>> {
        if let Some(map) = self.maps.borrow().get(path) {
            return Some(Rc::clone(map));
        }
        {
            let mut in_progress = self.in_progress.borrow_mut();
            if !in_progress.insert(path) {
                return None;
            }
        }
        let map = Rc::new(compute());
        self.in_progress.borrow_mut().remove(path);
        self.maps.borrow_mut().insert(path, Rc::clone(&map));
        Some(map)
    }
}

/// `true` for specifiers naming another package (rather than a file within
/// this one).
pub fn is_external_specifier(specifier: &str) -> bool {
    !specifier.starts_with('.')
}

/// TypeScript emit helpers that carry decorator metadata.
pub static TS_HELPERS: Lazy<HashMap<&'static str, KnownDeclaration>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert("__decorate", KnownDeclaration::TsHelperDecorate);
    map.insert("__param", KnownDeclaration::TsHelperParam);
    map.insert("__metadata", KnownDeclaration::TsHelperMetadata);
    map
});

/// Normalizes a helper identifier: strips a `$N` duplication suffix, so that
/// `__decorate$1` matches `__decorate`.
pub fn normalize_helper_name(name: &str) -> &str {
    match name.rfind('$') {
        Some(idx) if name[idx + 1..].chars().all(|c| c.is_ascii_digit()) => &name[..idx],
        _ => name,
    }
}

/// The helper name of a call's callee: a plain identifier or the property of
/// a namespace access (`tslib_1.__decorate`).
pub fn callee_helper_name<'a>(callee: &'a ast::Expression<'a>) -> Option<&'a str> {
    match unwrap_parens(callee) {
        ast::Expression::Identifier(id) => Some(normalize_helper_name(id.name.as_str())),
        ast::Expression::StaticMemberExpression(member) => {
            Some(normalize_helper_name(member.property.name.as_str()))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// ESM import reflection
// ---------------------------------------------------------------------------

/// Finds the import binding a local name, scanning the file's ESM import
/// declarations.
pub fn esm_import_of_name(program: &ast::Program<'_>, name: &str) -> Option<Import> {
    for stmt in &program.body {
        let ast::Statement::ImportDeclaration(decl) = stmt else {
            continue;
        };
        let Some(specifiers) = &decl.specifiers else {
            continue;
        };
        for spec in specifiers {
            match spec {
                ast::ImportDeclarationSpecifier::ImportSpecifier(import) => {
                    if import.local.name == name {
                        return Some(Import::new(
                            decl.source.value.as_str(),
                            module_export_name_str(&import.imported),
                        ));
                    }
                }
                ast::ImportDeclarationSpecifier::ImportDefaultSpecifier(import) => {
                    if import.local.name == name {
                        return Some(Import::new(decl.source.value.as_str(), "default"));
                    }
                }
                ast::ImportDeclarationSpecifier::ImportNamespaceSpecifier(import) => {
                    if import.local.name == name {
                        return Some(Import::new(decl.source.value.as_str(), "*"));
                    }
                }
            }
        }
    }
    None
}

pub fn module_export_name_str<'a>(name: &'a ast::ModuleExportName<'a>) -> &'a str {
    crate::reflection::src::util::module_export_name(name)
}

// ---------------------------------------------------------------------------
// Local declarations
// ---------------------------------------------------------------------------

/// Finds the module-scope declaration binding `name`, tagging TypeScript emit
/// helpers that are declared locally.
pub fn declaration_in_statements<'a>(
    stmts: &'a [ast::Statement<'a>],
    name: &str,
    file_path: &'a str,
) -> Option<Declaration<'a>> {
    for stmt in stmts {
        match stmt {
            ast::Statement::ClassDeclaration(class) => {
                if class_name(class) == Some(name) {
                    return Some(tag_helper(
                        Declaration::concrete(DeclarationNode::Class(class), file_path),
                        name,
                    ));
                }
            }
            ast::Statement::FunctionDeclaration(func) => {
                if func.id.as_ref().is_some_and(|id| id.name == name) {
                    return Some(tag_helper(
                        Declaration::concrete(DeclarationNode::Function(func), file_path),
                        name,
                    ));
                }
            }
            ast::Statement::VariableDeclaration(var) => {
                for declarator in &var.declarations {
                    if declarator_name(declarator) == Some(name) {
                        return Some(tag_helper(
                            Declaration::concrete(DeclarationNode::Variable(declarator), file_path),
                            name,
                        ));
                    }
                }
            }
            ast::Statement::ExportNamedDeclaration(export) => {
                if let Some(decl) = &export.declaration {
                    if let Some(found) = declaration_in_declaration(decl, name, file_path) {
                        return Some(found);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

fn declaration_in_declaration<'a>(
    decl: &'a ast::Declaration<'a>,
    name: &str,
    file_path: &'a str,
) -> Option<Declaration<'a>> {
    match decl {
        ast::Declaration::ClassDeclaration(class) if class_name(class) == Some(name) => {
            Some(Declaration::concrete(DeclarationNode::Class(class), file_path))
        }
        ast::Declaration::FunctionDeclaration(func)
            if func.id.as_ref().is_some_and(|id| id.name == name) =>
        {
            Some(Declaration::concrete(DeclarationNode::Function(func), file_path))
        }
        ast::Declaration::VariableDeclaration(var) => var
            .declarations
            .iter()
            .find(|declarator| declarator_name(declarator) == Some(name))
            .map(|declarator| {
                Declaration::concrete(DeclarationNode::Variable(declarator), file_path)
            }),
        _ => None,
    }
}

fn tag_helper<'a>(declaration: Declaration<'a>, name: &str) -> Declaration<'a> {
    match TS_HELPERS.get(normalize_helper_name(name)) {
        Some(known) => declaration.with_known(*known),
        None => declaration,
    }
}

// ---------------------------------------------------------------------------
// Class recognition
// ---------------------------------------------------------------------------

/// Direct `class` declarations: plain, export-wrapped, or assigned to a
/// variable as a class expression.
pub fn direct_classes<'a>(stmts: &'a [ast::Statement<'a>]) -> Vec<ClassSymbol<'a>> {
    let mut classes = Vec::new();
    for stmt in stmts {
        match stmt {
            ast::Statement::ClassDeclaration(class) => {
                push_direct_class(&mut classes, class, class.span);
            }
            ast::Statement::ExportNamedDeclaration(export) => {
                if let Some(ast::Declaration::ClassDeclaration(class)) = &export.declaration {
                    push_direct_class(&mut classes, class, export.span);
                }
            }
            ast::Statement::VariableDeclaration(var) => {
                for declarator in &var.declarations {
                    let Some(name) = declarator_name(declarator) else {
                        continue;
                    };
                    if let Some(ast::Expression::ClassExpression(class)) =
                        declarator.init.as_ref().map(unwrap_parens)
                    {
                        classes.push(ClassSymbol {
                            name: name.to_string(),
                            declaration: ClassNode::Class(class),
                            implementation: ClassNode::Class(class),
                            statement_span: var.span,
                            iife_return_span: None,
                            closure_body: None,
                        });
                    }
                }
            }
            _ => {}
        }
    }
    classes
}

fn push_direct_class<'a>(
    classes: &mut Vec<ClassSymbol<'a>>,
    class: &'a ast::Class<'a>,
    statement_span: Span,
) {
    if let Some(name) = class_name(class) {
        classes.push(ClassSymbol {
            name: name.to_string(),
            declaration: ClassNode::Class(class),
            implementation: ClassNode::Class(class),
            statement_span,
            iife_return_span: None,
            closure_body: None,
        });
    }
}

/// ES5 closure-pair classes:
/// `var X = (function () { function X() {} ... return X; }());`
/// plus bare constructor functions that carry static metadata assignments.
pub fn closure_classes<'a>(stmts: &'a [ast::Statement<'a>]) -> Vec<ClassSymbol<'a>> {
    let mut classes = Vec::new();
    for stmt in stmts {
        match stmt {
            ast::Statement::VariableDeclaration(var) => {
                for declarator in &var.declarations {
                    if let Some(symbol) = closure_class_from_declarator(declarator, var.span) {
                        classes.push(symbol);
                    }
                }
            }
            ast::Statement::ExportNamedDeclaration(export) => {
                if let Some(ast::Declaration::VariableDeclaration(var)) = &export.declaration {
                    for declarator in &var.declarations {
                        if let Some(symbol) = closure_class_from_declarator(declarator, export.span)
                        {
                            classes.push(symbol);
                        }
                    }
                }
            }
            ast::Statement::FunctionDeclaration(func) => {
                if let Some(id) = &func.id {
                    classes.push(ClassSymbol {
                        name: id.name.to_string(),
                        declaration: ClassNode::Function(func),
                        implementation: ClassNode::Function(func),
                        statement_span: func.span,
                        iife_return_span: None,
                        closure_body: None,
                    });
                }
            }
            _ => {}
        }
    }
    classes
}

fn closure_class_from_declarator<'a>(
    declarator: &'a ast::VariableDeclarator<'a>,
    statement_span: Span,
) -> Option<ClassSymbol<'a>> {
    let name = declarator_name(declarator)?;
    let init = unwrap_parens(declarator.init.as_ref()?);

    let ast::Expression::CallExpression(call) = init else {
        return None;
    };
    let ast::Expression::FunctionExpression(wrapper) = unwrap_parens(&call.callee) else {
        return None;
    };
    let body = wrapper.body.as_ref()?;

    // The inner constructor function is whatever the closure returns.
    let mut returned: Option<&str> = None;
    let mut return_span: Option<Span> = None;
    for stmt in &body.statements {
        if let ast::Statement::ReturnStatement(ret) = stmt {
            if let Some(ast::Expression::Identifier(id)) = ret.argument.as_ref().map(unwrap_parens)
            {
                returned = Some(id.name.as_str());
                return_span = Some(ret.span);
            }
        }
    }
    let returned = returned?;

    let implementation = body.statements.iter().find_map(|stmt| {
        if let ast::Statement::FunctionDeclaration(func) = stmt {
            if func.id.as_ref().is_some_and(|id| id.name == returned) {
                return Some(ClassNode::Function(func));
            }
        }
        None
    })?;

    Some(ClassSymbol {
        name: name.to_string(),
        declaration: implementation,
        implementation,
        statement_span,
        iife_return_span: return_span,
        closure_body: Some(body),
    })
}

// ---------------------------------------------------------------------------
// Static metadata properties
// ---------------------------------------------------------------------------

/// Looks up a static property of the class: an assignment statement
/// (`X.prop = <value>;`) in the class's closure body or the module scope, or
/// a `static prop = <value>` member on an ES2015 class. Returns the value
/// expression and the span of the whole declaring statement (used when the
/// renderer strips the metadata).
pub fn static_property_assignment<'a>(
    scope: &'a [ast::Statement<'a>],
    class: &ClassSymbol<'a>,
    prop: &str,
) -> Option<(&'a ast::Expression<'a>, Span)> {
    if let Some(body) = class.closure_body {
        if let Some(found) = assignment_in_statements(&body.statements, &class.name, prop) {
            return Some(found);
        }
    }
    if let Some(found) = assignment_in_statements(scope, &class.name, prop) {
        return Some(found);
    }
    if let ClassNode::Class(class_node) = class.implementation {
        return class_static_member(class_node, prop);
    }
    None
}

fn assignment_in_statements<'a>(
    stmts: &'a [ast::Statement<'a>],
    class_name: &str,
    prop: &str,
) -> Option<(&'a ast::Expression<'a>, Span)> {
    // Last assignment wins, matching runtime property semantics.
    let mut found = None;
    for stmt in stmts {
        let ast::Statement::ExpressionStatement(expr_stmt) = stmt else {
            continue;
        };
        let ast::Expression::AssignmentExpression(assign) = unwrap_parens(&expr_stmt.expression)
        else {
            continue;
        };
        let ast::AssignmentTarget::StaticMemberExpression(target) = &assign.left else {
            continue;
        };
        let ast::Expression::Identifier(object) = unwrap_parens(&target.object) else {
            continue;
        };
        if object.name == class_name && target.property.name == prop {
            found = Some((&assign.right, expr_stmt.span));
        }
    }
    found
}

fn class_static_member<'a>(
    class: &'a ast::Class<'a>,
    prop: &str,
) -> Option<(&'a ast::Expression<'a>, Span)> {
    for element in &class.body.body {
        if let ast::ClassElement::PropertyDefinition(member) = element {
            if member.r#static && property_key_name(&member.key) == Some(prop) {
                if let Some(value) = &member.value {
                    return Some((value, member.span));
                }
            }
        }
    }
    None
}

/// `true` if the class already carries any recompiled definition field.
pub fn class_has_runtime_definitions<'a>(
    scope: &'a [ast::Statement<'a>],
    class: &ClassSymbol<'a>,
) -> bool {
    RUNTIME_DEFINITION_FIELDS
        .iter()
        .any(|field| static_property_assignment(scope, class, field).is_some())
}

// ---------------------------------------------------------------------------
// Helper calls
// ---------------------------------------------------------------------------

/// Finds invocations of the named runtime helpers that mention the class.
/// The closure body is the already-known-fast scope; the module-wide scan is
/// a fallback, not a widening: both yield the same calls for a given class.
pub fn helper_calls_for_class<'a>(
    scope: &'a [ast::Statement<'a>],
    class: &ClassSymbol<'a>,
    names: &[&str],
) -> Vec<&'a ast::CallExpression<'a>> {
    if let Some(body) = class.closure_body {
        let found = helper_calls_in_statements(&body.statements, class, names);
        if !found.is_empty() {
            return found;
        }
    }
    helper_calls_in_statements(scope, class, names)
}

fn helper_calls_in_statements<'a>(
    stmts: &'a [ast::Statement<'a>],
    class: &ClassSymbol<'a>,
    names: &[&str],
) -> Vec<&'a ast::CallExpression<'a>> {
    let mut calls = Vec::new();
    for stmt in stmts {
        let expr = match stmt {
            ast::Statement::ExpressionStatement(expr_stmt) => &expr_stmt.expression,
            ast::Statement::VariableDeclaration(var) => {
                for declarator in &var.declarations {
                    if let Some(init) = &declarator.init {
                        collect_helper_calls(init, class, names, &mut calls);
                    }
                }
                continue;
            }
            _ => continue,
        };
        collect_helper_calls(expr, class, names, &mut calls);
    }
    calls
}

fn collect_helper_calls<'a>(
    expr: &'a ast::Expression<'a>,
    class: &ClassSymbol<'a>,
    names: &[&str],
    calls: &mut Vec<&'a ast::CallExpression<'a>>,
) {
    match unwrap_parens(expr) {
        ast::Expression::AssignmentExpression(assign) => {
            collect_helper_calls(&assign.right, class, names, calls);
        }
        ast::Expression::SequenceExpression(sequence) => {
            for inner in &sequence.expressions {
                collect_helper_calls(inner, class, names, calls);
            }
        }
        ast::Expression::CallExpression(call) => {
            let matches_name = callee_helper_name(&call.callee)
                .is_some_and(|helper| names.contains(&helper));
            if matches_name && call_mentions_class(call, &class.name) {
                calls.push(call);
            }
        }
        _ => {}
    }
}

fn call_mentions_class<'a>(call: &'a ast::CallExpression<'a>, class_name: &str) -> bool {
    call.arguments.iter().any(|arg| match arg.as_expression() {
        Some(ast::Expression::Identifier(id)) => id.name == class_name,
        Some(ast::Expression::StaticMemberExpression(member)) => {
            matches!(unwrap_parens(&member.object), ast::Expression::Identifier(id) if id.name == class_name)
        }
        _ => false,
    })
}

// ---------------------------------------------------------------------------
// Decorator parsing
// ---------------------------------------------------------------------------

/// Resolves a decorator reference expression (`Component` or
/// `core.Component`) to its name and, when imported, its import record.
pub fn decorator_ref<'a>(
    host: &dyn ReflectionHost<'a>,
    file: &'a ParsedFile<'a>,
    expr: &'a ast::Expression<'a>,
) -> Option<(String, Option<Import>)> {
    match unwrap_parens(expr) {
        ast::Expression::Identifier(id) => {
            Some((id.name.to_string(), host.import_of_identifier(file, id)))
        }
        ast::Expression::StaticMemberExpression(member) => {
            let ast::Expression::Identifier(object) = unwrap_parens(&member.object) else {
                return None;
            };
            let name = member.property.name.to_string();
            match host.import_of_identifier(file, object) {
                Some(import) if import.is_namespace() => {
                    let from = import.from;
                    Some((name.clone(), Some(Import::new(from, name))))
                }
                _ => Some((name, None)),
            }
        }
        _ => None,
    }
}

/// Parses the `[{ type: SomeDecorator, args: [...] }, ...]` encoding of a
/// `decorators` or `propDecorators` value.
pub fn parse_decorator_objects<'a>(
    host: &dyn ReflectionHost<'a>,
    file: &'a ParsedFile<'a>,
    value: &'a ast::Expression<'a>,
) -> Result<SmallVec<[Decorator<'a>; 2]>, FatalLinkerError> {
    let value = unwrap_parens(value);
    let ast::Expression::ArrayExpression(array) = value else {
        return Err(FatalLinkerError::class(
            "decorator metadata is not an array literal",
            source_text(file.source, value.span()),
        ));
    };

    let mut decorators = SmallVec::new();
    for element in &array.elements {
        let Some(expr) = element.as_expression() else {
            continue;
        };
        let ast::Expression::ObjectExpression(object) = unwrap_parens(expr) else {
            return Err(FatalLinkerError::class(
                "decorator entry is not an object literal",
                source_text(file.source, expr.span()),
            ));
        };

        let mut type_expr = None;
        let mut args = Vec::new();
        for prop in &object.properties {
            let ast::ObjectPropertyKind::ObjectProperty(prop) = prop else {
                continue;
            };
            match property_key_name(&prop.key) {
                Some("type") => type_expr = Some(&prop.value),
                Some("args") => {
                    if let ast::Expression::ArrayExpression(array) = unwrap_parens(&prop.value) {
                        args = array
                            .elements
                            .iter()
                            .filter_map(|element| element.as_expression())
                            .collect();
                    }
                }
                _ => {}
            }
        }

        let Some(type_expr) = type_expr else {
            return Err(FatalLinkerError::class(
                "decorator entry has no `type` property",
                source_text(file.source, object.span),
            ));
        };
        let Some((name, import)) = decorator_ref(host, file, type_expr) else {
            return Err(FatalLinkerError::class(
                "decorator `type` is not a reference",
                source_text(file.source, type_expr.span()),
            ));
        };
        decorators.push(Decorator {
            name,
            import,
            args,
            span: object.span,
        });
    }
    Ok(decorators)
}

/// Parses decorators out of `__decorate([...], X)` helper calls: every array
/// entry that is a plain decorator invocation becomes a `Decorator`; the
/// `__metadata`/`__param` entries are injection metadata, not decorators.
pub fn parse_helper_call_decorators<'a>(
    host: &dyn ReflectionHost<'a>,
    file: &'a ParsedFile<'a>,
    call: &'a ast::CallExpression<'a>,
) -> SmallVec<[Decorator<'a>; 2]> {
    let mut decorators = SmallVec::new();
    let Some(array) = helper_call_decorator_array(call) else {
        return decorators;
    };
    for element in &array.elements {
        let Some(ast::Expression::CallExpression(entry)) =
            element.as_expression().map(unwrap_parens)
        else {
            continue;
        };
        if let Some(helper) = callee_helper_name(&entry.callee) {
            if TS_HELPERS.contains_key(helper) {
                continue;
            }
        }
        let Some((name, import)) = decorator_ref(host, file, &entry.callee) else {
            continue;
        };
        decorators.push(Decorator {
            name,
            import,
            args: entry
                .arguments
                .iter()
                .filter_map(|arg| arg.as_expression())
                .collect(),
            span: entry.span,
        });
    }
    decorators
}

pub fn helper_call_decorator_array<'a>(
    call: &'a ast::CallExpression<'a>,
) -> Option<&'a ast::ArrayExpression<'a>> {
    match call.arguments.first()?.as_expression().map(unwrap_parens)? {
        ast::Expression::ArrayExpression(array) => Some(array),
        _ => None,
    }
}

/// `true` when the helper call targets a prototype member rather than the
/// class itself: `__decorate([...], X.prototype, "prop", ...)`.
pub fn helper_call_member_name<'a>(call: &'a ast::CallExpression<'a>) -> Option<&'a str> {
    let target = call.arguments.get(1)?.as_expression()?;
    if !matches!(
        unwrap_parens(target),
        ast::Expression::StaticMemberExpression(member) if member.property.name == "prototype"
    ) {
        return None;
    }
    match call.arguments.get(2)?.as_expression()? {
        ast::Expression::StringLiteral(lit) => Some(lit.value.as_str()),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Constructor parameters
// ---------------------------------------------------------------------------

/// Parses a `ctorParameters` value: either an array literal or a function
/// returning one, with `{ type: T, decorators: [...] }` entries.
pub fn parse_ctor_parameters<'a>(
    host: &dyn ReflectionHost<'a>,
    file: &'a ParsedFile<'a>,
    value: &'a ast::Expression<'a>,
) -> Option<Vec<CtorParameter<'a>>> {
    let value = unwrap_parens(value);
    let array = match value {
        ast::Expression::ArrayExpression(array) => array,
        _ => {
            let returned = crate::reflection::src::util::returned_expression(value)?;
            match unwrap_parens(returned) {
                ast::Expression::ArrayExpression(array) => array,
                _ => return None,
            }
        }
    };

    let mut parameters = Vec::new();
    for element in &array.elements {
        let Some(expr) = element.as_expression() else {
            parameters.push(CtorParameter {
                name: None,
                token: None,
                decorators: Vec::new(),
            });
            continue;
        };
        match unwrap_parens(expr) {
            ast::Expression::ObjectExpression(object) => {
                let mut token = None;
                let mut decorators = Vec::new();
                for prop in &object.properties {
                    let ast::ObjectPropertyKind::ObjectProperty(prop) = prop else {
                        continue;
                    };
                    match property_key_name(&prop.key) {
                        Some("type") => token = Some(&prop.value),
                        Some("decorators") => {
                            if let Ok(parsed) = parse_decorator_objects(host, file, &prop.value) {
                                decorators = parsed.into_vec();
                            }
                        }
                        _ => {}
                    }
                }
                parameters.push(CtorParameter {
                    name: None,
                    token,
                    decorators,
                });
            }
            // `null` entries mark parameters without type metadata.
            _ => parameters.push(CtorParameter {
                name: None,
                token: None,
                decorators: Vec::new(),
            }),
        }
    }
    Some(parameters)
}

/// Reconstructs constructor parameters from the `__metadata` and `__param`
/// entries of a class-level `__decorate` call.
pub fn ctor_params_from_helper_call<'a>(
    host: &dyn ReflectionHost<'a>,
    file: &'a ParsedFile<'a>,
    call: &'a ast::CallExpression<'a>,
) -> Option<Vec<CtorParameter<'a>>> {
    let array = helper_call_decorator_array(call)?;
    let mut types: Vec<Option<&'a ast::Expression<'a>>> = Vec::new();
    let mut param_decorators: HashMap<usize, Vec<Decorator<'a>>> = HashMap::new();

    for element in &array.elements {
        let Some(ast::Expression::CallExpression(entry)) =
            element.as_expression().map(unwrap_parens)
        else {
            continue;
        };
        match callee_helper_name(&entry.callee) {
            Some("__metadata") => {
                let Some(ast::Expression::StringLiteral(key)) =
                    entry.arguments.first().and_then(|arg| arg.as_expression())
                else {
                    continue;
                };
                if key.value != "design:paramtypes" {
                    continue;
                }
                if let Some(ast::Expression::ArrayExpression(params)) = entry
                    .arguments
                    .get(1)
                    .and_then(|arg| arg.as_expression())
                    .map(unwrap_parens)
                {
                    types = params
                        .elements
                        .iter()
                        .map(|element| element.as_expression())
                        .collect();
                }
            }
            Some("__param") => {
                let Some(ast::Expression::NumericLiteral(index)) =
                    entry.arguments.first().and_then(|arg| arg.as_expression())
                else {
                    continue;
                };
                let Some(ast::Expression::CallExpression(decorator_call)) = entry
                    .arguments
                    .get(1)
                    .and_then(|arg| arg.as_expression())
                    .map(unwrap_parens)
                else {
                    continue;
                };
                if let Some((name, import)) = decorator_ref(host, file, &decorator_call.callee) {
                    param_decorators
                        .entry(index.value as usize)
                        .or_default()
                        .push(Decorator {
                            name,
                            import,
                            args: decorator_call
                                .arguments
                                .iter()
                                .filter_map(|arg| arg.as_expression())
                                .collect(),
                            span: decorator_call.span,
                        });
                }
            }
            _ => {}
        }
    }

    if types.is_empty() && param_decorators.is_empty() {
        return None;
    }
    let count = types
        .len()
        .max(param_decorators.keys().max().map_or(0, |max| max + 1));
    Some(
        (0..count)
            .map(|index| CtorParameter {
                name: None,
                token: types.get(index).copied().flatten(),
                decorators: param_decorators.remove(&index).unwrap_or_default(),
            })
            .collect(),
    )
}

/// Parses a `propDecorators` value:
/// `{ propName: [{ type: Input, args: [...] }], ... }`.
pub fn parse_prop_decorators<'a>(
    host: &dyn ReflectionHost<'a>,
    file: &'a ParsedFile<'a>,
    value: &'a ast::Expression<'a>,
) -> IndexMap<String, Vec<Decorator<'a>>> {
    let mut map = IndexMap::new();
    let ast::Expression::ObjectExpression(object) = unwrap_parens(value) else {
        return map;
    };
    for prop in &object.properties {
        let ast::ObjectPropertyKind::ObjectProperty(prop) = prop else {
            continue;
        };
        let Some(name) = property_key_name(&prop.key) else {
            continue;
        };
        if let Ok(decorators) = parse_decorator_objects(host, file, &prop.value) {
            map.insert(name.to_string(), decorators.into_vec());
        }
    }
    map
}
