//! Shared reflection logic for the CommonJS and UMD hosts.
//!
//! Both formats encode their module surface the same way once the module
//! scope has been located: `require(...)` (or factory parameters) for
//! imports, and three export shapes — direct `exports.X = ...` property
//! assignments, wildcard `__export`/`__exportStar` re-exports, and
//! accessor-style `Object.defineProperty(exports, "X", { get: ... })`
//! re-exports.

use super::utils::is_external_specifier;
use crate::diagnostics::FatalLinkerError;
use crate::packages::{BundleModuleResolver, ParsedFile};
use crate::reflection::src::util::{
    declarator_name, property_key_name, require_call_specifier, returned_expression, source_text,
    unwrap_parens,
};
use crate::reflection::{Declaration, DeclarationNode, ExportMap, Import, ReflectionHost};
use oxc_ast::ast;
use oxc_span::GetSpan;

/// One parameter of a UMD factory function, mapped back to the module it
/// binds.
#[derive(Debug, Clone)]
pub struct UmdParam<'a> {
    pub name: &'a str,
    pub param: &'a ast::FormalParameter<'a>,
    /// The module specifier the parameter binds, or `None` for the exports
    /// object slot.
    pub specifier: Option<String>,
}

/// The recognized pieces of one file's UMD wrapper.
pub struct UmdWrapper<'a> {
    pub factory_fn: &'a ast::Function<'a>,
    pub params: Vec<UmdParam<'a>>,
    /// Name of the factory parameter bound to the exports object.
    pub exports_name: &'a str,
    /// The factory invocation in the CommonJS branch of the wrapper.
    pub commonjs_call: &'a ast::CallExpression<'a>,
    /// Factory invocations in the remaining branches (global; AMD uses the
    /// `define` dependency array instead of a direct call).
    pub other_calls: Vec<&'a ast::CallExpression<'a>>,
    /// The AMD `define(...)` dependency array, when present.
    pub define_deps: Option<&'a ast::ArrayExpression<'a>>,
}

impl<'a> UmdWrapper<'a> {
    pub fn factory_statements(&self) -> &'a [ast::Statement<'a>] {
        match &self.factory_fn.body {
            Some(body) => &body.statements,
            None => &[],
        }
    }

    pub fn import_of_name(&self, name: &str) -> Option<Import> {
        self.params
            .iter()
            .find(|param| param.name == name)
            .and_then(|param| {
                param
                    .specifier
                    .as_ref()
                    .map(|specifier| Import::new(specifier.clone(), "*"))
            })
    }
}

/// Parses the UMD wrapper of a file:
/// ```text
/// (function (global, factory) {
///     typeof exports === 'object' ? factory(exports, require('dep')) :
///     typeof define === 'function' && define.amd ? define(['exports', 'dep'], factory) :
///     factory((global.lib = {}), global.dep);
/// }(this, (function (exports, dep) { ... })));
/// ```
/// The factory's parameters are mapped to module specifiers through the
/// CommonJS branch (falling back to the AMD dependency array). A wrapper
/// whose factory call does not match the factory's arity cannot be
/// reconciled with the declared format and fails the bundle.
pub fn parse_umd_wrapper<'a>(file: &'a ParsedFile<'a>) -> Result<UmdWrapper<'a>, FatalLinkerError> {
    let wrapper_stmt = file
        .program
        .body
        .iter()
        .find_map(|stmt| match stmt {
            ast::Statement::ExpressionStatement(expr_stmt) => {
                match unwrap_parens(&expr_stmt.expression) {
                    ast::Expression::CallExpression(call) => Some(call),
                    _ => None,
                }
            }
            _ => None,
        })
        .ok_or_else(|| {
            FatalLinkerError::bundle("file has no UMD wrapper call", file.path.to_string())
        })?;

    let ast::Expression::FunctionExpression(wrapper_fn) = unwrap_parens(&wrapper_stmt.callee)
    else {
        return Err(FatalLinkerError::bundle(
            "UMD wrapper callee is not a function expression",
            source_text(file.source, wrapper_stmt.callee.span()),
        ));
    };

    // The factory is passed to the wrapper as its last function argument.
    let factory_fn = wrapper_stmt
        .arguments
        .iter()
        .rev()
        .find_map(|arg| match arg.as_expression().map(unwrap_parens) {
            Some(ast::Expression::FunctionExpression(func)) => Some(&**func),
            _ => None,
        })
        .ok_or_else(|| {
            FatalLinkerError::bundle(
                "UMD wrapper call carries no factory function",
                source_text(file.source, wrapper_stmt.span),
            )
        })?;

    // The wrapper parameter that names the factory inside the wrapper body.
    let factory_param = wrapper_fn
        .params
        .items
        .iter()
        .filter_map(|param| match &param.pattern.kind {
            ast::BindingPatternKind::BindingIdentifier(id) => Some(id.name.as_str()),
            _ => None,
        })
        .last()
        .ok_or_else(|| {
            FatalLinkerError::bundle(
                "UMD wrapper function has no factory parameter",
                source_text(file.source, wrapper_fn.span),
            )
        })?;

    let wrapper_body = wrapper_fn.body.as_ref().ok_or_else(|| {
        FatalLinkerError::bundle(
            "UMD wrapper function has no body",
            source_text(file.source, wrapper_fn.span),
        )
    })?;

    let mut factory_calls = Vec::new();
    let mut define_deps = None;
    for stmt in &wrapper_body.statements {
        if let ast::Statement::ExpressionStatement(expr_stmt) = stmt {
            collect_factory_calls(
                &expr_stmt.expression,
                factory_param,
                &mut factory_calls,
                &mut define_deps,
            );
        }
    }

    // Pick the branch that requires its dependencies; it maps factory
    // parameters to module specifiers positionally.
    let commonjs_call = factory_calls
        .iter()
        .copied()
        .find(|call| {
            call.arguments
                .iter()
                .any(|arg| arg.as_expression().and_then(require_call_specifier).is_some())
        })
        .or_else(|| factory_calls.first().copied())
        .ok_or_else(|| {
            FatalLinkerError::bundle(
                "UMD wrapper never invokes its factory",
                source_text(file.source, wrapper_fn.span),
            )
        })?;

    if commonjs_call.arguments.len() != factory_fn.params.items.len() {
        return Err(FatalLinkerError::bundle(
            format!(
                "UMD factory expects {} parameters but is called with {} arguments",
                factory_fn.params.items.len(),
                commonjs_call.arguments.len()
            ),
            source_text(file.source, commonjs_call.span),
        ));
    }

    let mut params = Vec::new();
    let mut exports_name = "exports";
    for (index, param) in factory_fn.params.items.iter().enumerate() {
        let ast::BindingPatternKind::BindingIdentifier(id) = &param.pattern.kind else {
            continue;
        };
        let name = id.name.as_str();
        let arg = commonjs_call.arguments[index].as_expression().map(unwrap_parens);
        let specifier = match arg {
            Some(expr) => match require_call_specifier(expr) {
                Some(specifier) => Some(specifier.to_string()),
                None => {
                    // The exports slot: a bare `exports` identifier in the
                    // CommonJS branch or a `global.lib = {}` assignment in
                    // the global one.
                    exports_name = name;
                    None
                }
            },
            None => None,
        };
        params.push(UmdParam {
            name,
            param,
            specifier,
        });
    }

    let other_calls = factory_calls
        .into_iter()
        .filter(|call| !std::ptr::eq(*call, commonjs_call))
        .collect();

    Ok(UmdWrapper {
        factory_fn,
        params,
        exports_name,
        commonjs_call,
        other_calls,
        define_deps,
    })
}

fn collect_factory_calls<'a>(
    expr: &'a ast::Expression<'a>,
    factory_param: &str,
    calls: &mut Vec<&'a ast::CallExpression<'a>>,
    define_deps: &mut Option<&'a ast::ArrayExpression<'a>>,
) {
    match unwrap_parens(expr) {
        ast::Expression::ConditionalExpression(cond) => {
            collect_factory_calls(&cond.test, factory_param, calls, define_deps);
            collect_factory_calls(&cond.consequent, factory_param, calls, define_deps);
            collect_factory_calls(&cond.alternate, factory_param, calls, define_deps);
        }
        ast::Expression::LogicalExpression(logical) => {
            collect_factory_calls(&logical.left, factory_param, calls, define_deps);
            collect_factory_calls(&logical.right, factory_param, calls, define_deps);
        }
        ast::Expression::SequenceExpression(sequence) => {
            for inner in &sequence.expressions {
                collect_factory_calls(inner, factory_param, calls, define_deps);
            }
        }
        ast::Expression::CallExpression(call) => match unwrap_parens(&call.callee) {
            ast::Expression::Identifier(id) if id.name == factory_param => calls.push(call),
            ast::Expression::Identifier(id) if id.name == "define" => {
                for arg in &call.arguments {
                    if let Some(ast::Expression::ArrayExpression(array)) =
                        arg.as_expression().map(unwrap_parens)
                    {
                        *define_deps = Some(array);
                    }
                }
            }
            _ => {}
        },
        _ => {}
    }
}

/// A `var <local> = require('<specifier>')` binding, possibly narrowed to a
/// single member (`var X = require('m').X`).
#[derive(Debug, Clone)]
pub struct RequireBinding<'a> {
    pub local_name: &'a str,
    pub specifier: &'a str,
    pub member: Option<&'a str>,
}

/// Collects the require bindings of a statement list.
pub fn require_bindings<'a>(stmts: &'a [ast::Statement<'a>]) -> Vec<RequireBinding<'a>> {
    let mut bindings = Vec::new();
    for stmt in stmts {
        let ast::Statement::VariableDeclaration(var) = stmt else {
            continue;
        };
        for declarator in &var.declarations {
            let Some(local_name) = declarator_name(declarator) else {
                continue;
            };
            let Some(init) = declarator.init.as_ref().map(unwrap_parens) else {
                continue;
            };
            if let Some(specifier) = require_call_specifier(init) {
                bindings.push(RequireBinding {
                    local_name,
                    specifier,
                    member: None,
                });
            } else if let ast::Expression::StaticMemberExpression(member) = init {
                if let Some(specifier) = require_call_specifier(&member.object) {
                    bindings.push(RequireBinding {
                        local_name,
                        specifier,
                        member: Some(member.property.name.as_str()),
                    });
                }
            }
        }
    }
    bindings
}

/// The import (if any) a local name refers to within a require-based scope.
pub fn require_import_of_name(stmts: &[ast::Statement<'_>], name: &str) -> Option<Import> {
    require_bindings(stmts)
        .into_iter()
        .find(|binding| binding.local_name == name)
        .map(|binding| match binding.member {
            Some(member) => Import::new(binding.specifier, member),
            None => Import::new(binding.specifier, "*"),
        })
}

/// Folds every export of a CommonJS-style module scope into an export map.
/// Statements are processed in textual order, so a name produced by more
/// than one export shape resolves to the last occurrence, matching how the
/// host runtime would apply the duplicate property assignments.
pub fn fold_commonjs_exports<'a>(
    host: &dyn ReflectionHost<'a>,
    file: &'a ParsedFile<'a>,
    stmts: &'a [ast::Statement<'a>],
    resolver: &BundleModuleResolver<'a, 'a>,
    exports_name: &str,
) -> ExportMap<'a> {
    let mut map = ExportMap::new();

    for stmt in stmts {
        let ast::Statement::ExpressionStatement(expr_stmt) = stmt else {
            continue;
        };
        match unwrap_parens(&expr_stmt.expression) {
            ast::Expression::AssignmentExpression(assign) => {
                let ast::AssignmentTarget::StaticMemberExpression(target) = &assign.left else {
                    continue;
                };
                let ast::Expression::Identifier(object) = unwrap_parens(&target.object) else {
                    continue;
                };
                if object.name != exports_name {
                    continue;
                }
                let declaration =
                    declaration_of_exported_expression(host, file, resolver, &assign.right);
                map.insert(target.property.name.to_string(), declaration);
            }
            ast::Expression::CallExpression(call) => {
                if let Some((name, declaration)) =
                    accessor_export(host, file, resolver, call, exports_name)
                {
                    map.insert(name, declaration);
                } else if let Some((target, via_module)) =
                    wildcard_reexport_target(host, file, resolver, call)
                {
                    if let Some(target_map) = host.exports_of_module(target) {
                        for (name, declaration) in target_map.iter() {
                            map.insert(
                                name.clone(),
                                declaration.clone().with_via_module(via_module.clone()),
                            );
                        }
                    }
                }
            }
            _ => {}
        }
    }
    map
}

/// Resolves the right-hand side of an export assignment to a declaration.
/// Anything that cannot be traced back to a definition site becomes an
/// `Inline` declaration holding the expression itself.
fn declaration_of_exported_expression<'a>(
    host: &dyn ReflectionHost<'a>,
    file: &'a ParsedFile<'a>,
    resolver: &BundleModuleResolver<'a, 'a>,
    expr: &'a ast::Expression<'a>,
) -> Declaration<'a> {
    match unwrap_parens(expr) {
        ast::Expression::Identifier(id) => {
            if let Some(declaration) = host.declaration_of_identifier(file, id) {
                return declaration;
            }
            Declaration::inline(DeclarationNode::Expression(expr), expr, file.path)
        }
        ast::Expression::StaticMemberExpression(member) => {
            if let Some(declaration) =
                declaration_via_namespace_member(host, file, resolver, member)
            {
                return declaration;
            }
            Declaration::inline(DeclarationNode::Expression(expr), expr, file.path)
        }
        _ => Declaration::inline(DeclarationNode::Expression(expr), expr, file.path),
    }
}

/// Resolves `ns.X` where `ns` is a namespace import of another module.
fn declaration_via_namespace_member<'a>(
    host: &dyn ReflectionHost<'a>,
    file: &'a ParsedFile<'a>,
    resolver: &BundleModuleResolver<'a, 'a>,
    member: &'a ast::StaticMemberExpression<'a>,
) -> Option<Declaration<'a>> {
    let ast::Expression::Identifier(object) = unwrap_parens(&member.object) else {
        return None;
    };
    let import = host.import_of_identifier(file, object)?;
    if !import.is_namespace() {
        return None;
    }
    let target = resolver.resolve_file(&import.from, file.path)?;
    let target_map = host.exports_of_module(target)?;
    let declaration = target_map.get(member.property.name.as_str())?.clone();
    let via_module = is_external_specifier(&import.from).then(|| import.from.clone());
    Some(declaration.with_via_module(via_module))
}

/// Recognizes `Object.defineProperty(exports, "X", { get: ... })`.
fn accessor_export<'a>(
    host: &dyn ReflectionHost<'a>,
    file: &'a ParsedFile<'a>,
    resolver: &BundleModuleResolver<'a, 'a>,
    call: &'a ast::CallExpression<'a>,
    exports_name: &str,
) -> Option<(String, Declaration<'a>)> {
    let ast::Expression::StaticMemberExpression(callee) = unwrap_parens(&call.callee) else {
        return None;
    };
    let ast::Expression::Identifier(callee_object) = unwrap_parens(&callee.object) else {
        return None;
    };
    if callee_object.name != "Object" || callee.property.name != "defineProperty" {
        return None;
    }

    let mut args = call.arguments.iter().filter_map(|arg| arg.as_expression());
    let target = args.next().map(unwrap_parens)?;
    if !matches!(target, ast::Expression::Identifier(id) if id.name == exports_name) {
        return None;
    }
    let ast::Expression::StringLiteral(name) = args.next().map(unwrap_parens)? else {
        return None;
    };
    let ast::Expression::ObjectExpression(descriptor) = args.next().map(unwrap_parens)? else {
        return None;
    };

    let getter = descriptor.properties.iter().find_map(|prop| {
        let ast::ObjectPropertyKind::ObjectProperty(prop) = prop else {
            return None;
        };
        if property_key_name(&prop.key) == Some("get") {
            returned_expression(&prop.value)
        } else {
            None
        }
    })?;

    Some((
        name.value.to_string(),
        declaration_of_exported_expression(host, file, resolver, getter),
    ))
}

/// Recognizes the wildcard re-export helpers: `__export(require('./a'))` and
/// `__exportStar(require('./a'), exports)` (also reached through a helper
/// namespace such as `tslib_1.__exportStar`, or with a namespace argument in
/// factory-scoped modules).
fn wildcard_reexport_target<'a>(
    host: &dyn ReflectionHost<'a>,
    file: &'a ParsedFile<'a>,
    resolver: &BundleModuleResolver<'a, 'a>,
    call: &'a ast::CallExpression<'a>,
) -> Option<(&'a ParsedFile<'a>, Option<String>)> {
    let helper = super::utils::callee_helper_name(&call.callee)?;
    if helper != "__export" && helper != "__exportStar" {
        return None;
    }
    let source = call.arguments.first()?.as_expression().map(unwrap_parens)?;

    let specifier: String = if let Some(specifier) = require_call_specifier(source) {
        specifier.to_string()
    } else if let ast::Expression::Identifier(id) = source {
        let import = host.import_of_identifier(file, id)?;
        if !import.is_namespace() {
            return None;
        }
        import.from
    } else {
        return None;
    };

    let target = resolver.resolve_file(&specifier, file.path)?;
    let via_module = is_external_specifier(&specifier).then_some(specifier);
    Some((target, via_module))
}
