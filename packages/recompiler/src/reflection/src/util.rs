// Reflection utilities shared by the format hosts.

use oxc_ast::ast;
use oxc_span::Span;

/// Name of a class declaration, if it has one.
pub fn class_name<'a>(class: &'a ast::Class<'a>) -> Option<&'a str> {
    class.id.as_ref().map(|id| id.name.as_str())
}

/// Static name of a property key (identifier or string literal keys only).
pub fn property_key_name<'a>(key: &'a ast::PropertyKey<'a>) -> Option<&'a str> {
    match key {
        ast::PropertyKey::StaticIdentifier(id) => Some(id.name.as_str()),
        ast::PropertyKey::StringLiteral(lit) => Some(lit.value.as_str()),
        _ => None,
    }
}

/// The source text covered by `span`.
pub fn source_text<'a>(source: &'a str, span: Span) -> &'a str {
    &source[span.start as usize..span.end as usize]
}

/// Strips a parenthesized wrapper, which the parser preserves.
pub fn unwrap_parens<'a>(expr: &'a ast::Expression<'a>) -> &'a ast::Expression<'a> {
    let mut current = expr;
    while let ast::Expression::ParenthesizedExpression(paren) = current {
        current = &paren.expression;
    }
    current
}

/// The name bound by a variable declarator, for plain identifier patterns.
pub fn declarator_name<'a>(declarator: &'a ast::VariableDeclarator<'a>) -> Option<&'a str> {
    match &declarator.id.kind {
        ast::BindingPatternKind::BindingIdentifier(id) => Some(id.name.as_str()),
        _ => None,
    }
}

/// Matches `require('<specifier>')` and returns the specifier.
pub fn require_call_specifier<'a>(expr: &'a ast::Expression<'a>) -> Option<&'a str> {
    if let ast::Expression::CallExpression(call) = unwrap_parens(expr) {
        if let ast::Expression::Identifier(callee) = &call.callee {
            if callee.name == "require" && call.arguments.len() == 1 {
                if let Some(ast::Expression::StringLiteral(lit)) =
                    call.arguments[0].as_expression()
                {
                    return Some(lit.value.as_str());
                }
            }
        }
    }
    None
}

/// The exported name of a module export name node.
pub fn module_export_name<'a>(name: &'a ast::ModuleExportName<'a>) -> &'a str {
    match name {
        ast::ModuleExportName::IdentifierName(id) => id.name.as_str(),
        ast::ModuleExportName::IdentifierReference(id) => id.name.as_str(),
        ast::ModuleExportName::StringLiteral(lit) => lit.value.as_str(),
    }
}

/// Extracts the single returned expression of a function or arrow literal:
/// either an arrow with an expression body or a body whose sole meaningful
/// statement is `return <expr>;`.
pub fn returned_expression<'a>(expr: &'a ast::Expression<'a>) -> Option<&'a ast::Expression<'a>> {
    match unwrap_parens(expr) {
        ast::Expression::ArrowFunctionExpression(arrow) => {
            if arrow.expression {
                if let Some(ast::Statement::ExpressionStatement(stmt)) =
                    arrow.body.statements.first()
                {
                    return Some(&stmt.expression);
                }
                None
            } else {
                return_from_body(&arrow.body.statements)
            }
        }
        ast::Expression::FunctionExpression(func) => func
            .body
            .as_ref()
            .and_then(|body| return_from_body(&body.statements)),
        _ => None,
    }
}

fn return_from_body<'a>(
    statements: &'a [ast::Statement<'a>],
) -> Option<&'a ast::Expression<'a>> {
    for stmt in statements {
        if let ast::Statement::ReturnStatement(ret) = stmt {
            return ret.argument.as_ref();
        }
    }
    None
}
