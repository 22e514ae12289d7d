//! Partial Evaluator
//!
//! Folds decorator-argument expressions into plain values without executing
//! any code. Literals, references to local constants, and the well-known
//! deferred-reference helper are understood; everything else is preserved as
//! an opaque value and re-emitted unchanged.

use super::result::{ResolvedReference, ResolvedValue};
use crate::diagnostics::FatalLinkerError;
use crate::packages::ParsedFile;
use crate::reflection::src::util::{
    property_key_name, returned_expression, source_text, unwrap_parens,
};
use crate::reflection::{DeclarationNode, Import, ReflectionHost, CORE_MODULE};
use indexmap::IndexMap;
use oxc_ast::ast;
use oxc_span::GetSpan;

/// Recursion limit for constant folding; deeper chains become opaque.
const MAX_DEPTH: usize = 32;

pub struct PartialEvaluator<'e, 'a> {
    host: &'e dyn ReflectionHost<'a>,
    is_core: bool,
}

impl<'e, 'a> PartialEvaluator<'e, 'a> {
    pub fn new(host: &'e dyn ReflectionHost<'a>, is_core: bool) -> Self {
        Self { host, is_core }
    }

    pub fn evaluate(
        &self,
        file: &'a ParsedFile<'a>,
        expr: &'a ast::Expression<'a>,
    ) -> Result<ResolvedValue<'a>, FatalLinkerError> {
        self.evaluate_at(file, expr, 0)
    }

    fn evaluate_at(
        &self,
        file: &'a ParsedFile<'a>,
        expr: &'a ast::Expression<'a>,
        depth: usize,
    ) -> Result<ResolvedValue<'a>, FatalLinkerError> {
        if depth > MAX_DEPTH {
            return Ok(ResolvedValue::Opaque(expr));
        }

        match unwrap_parens(expr) {
            ast::Expression::StringLiteral(lit) => Ok(ResolvedValue::Str(lit.value.to_string())),
            ast::Expression::NumericLiteral(lit) => Ok(ResolvedValue::Num(lit.value)),
            ast::Expression::BooleanLiteral(lit) => Ok(ResolvedValue::Bool(lit.value)),
            ast::Expression::NullLiteral(_) => Ok(ResolvedValue::Null),
            ast::Expression::TemplateLiteral(template) if template.expressions.is_empty() => {
                match template.quasis.first() {
                    Some(quasi) => Ok(ResolvedValue::Str(
                        quasi
                            .value
                            .cooked
                            .as_ref()
                            .map(|cooked| cooked.to_string())
                            .unwrap_or_else(|| quasi.value.raw.to_string()),
                    )),
                    None => Ok(ResolvedValue::Str(String::new())),
                }
            }
            ast::Expression::UnaryExpression(unary) => {
                let value = self.evaluate_at(file, &unary.argument, depth + 1)?;
                match (unary.operator, value) {
                    (ast::UnaryOperator::UnaryNegation, ResolvedValue::Num(num)) => {
                        Ok(ResolvedValue::Num(-num))
                    }
                    (ast::UnaryOperator::UnaryPlus, ResolvedValue::Num(num)) => {
                        Ok(ResolvedValue::Num(num))
                    }
                    _ => Ok(ResolvedValue::Opaque(expr)),
                }
            }
            ast::Expression::ArrayExpression(array) => {
                let mut values = Vec::with_capacity(array.elements.len());
                for element in &array.elements {
                    let Some(inner) = element.as_expression() else {
                        // Spreads and elisions make the whole array opaque.
                        return Ok(ResolvedValue::Opaque(expr));
                    };
                    values.push(self.evaluate_at(file, inner, depth + 1)?);
                }
                Ok(ResolvedValue::Array(values))
            }
            ast::Expression::ObjectExpression(object) => {
                let mut map = IndexMap::new();
                for prop in &object.properties {
                    let ast::ObjectPropertyKind::ObjectProperty(prop) = prop else {
                        return Ok(ResolvedValue::Opaque(expr));
                    };
                    let Some(key) = property_key_name(&prop.key) else {
                        return Ok(ResolvedValue::Opaque(expr));
                    };
                    map.insert(key.to_string(), self.evaluate_at(file, &prop.value, depth + 1)?);
                }
                Ok(ResolvedValue::Object(map))
            }
            ast::Expression::Identifier(id) => self.evaluate_identifier(file, expr, id, depth),
            ast::Expression::StaticMemberExpression(member) => {
                self.evaluate_member(file, expr, member, depth)
            }
            ast::Expression::CallExpression(call) => self.evaluate_call(file, expr, call, depth),
            _ => Ok(ResolvedValue::Opaque(expr)),
        }
    }

    fn evaluate_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        expr: &'a ast::Expression<'a>,
        id: &'a ast::IdentifierReference<'a>,
        depth: usize,
    ) -> Result<ResolvedValue<'a>, FatalLinkerError> {
        if id.name == "undefined" {
            return Ok(ResolvedValue::Undefined);
        }

        if let Some(declaration) = self.host.declaration_of_identifier(file, id) {
            match declaration.node {
                DeclarationNode::Variable(declarator) => {
                    if let Some(init) = &declarator.init {
                        if is_literal_like(init) {
                            return self.evaluate_at(file, init, depth + 1);
                        }
                    }
                    return Ok(ResolvedValue::Reference(ResolvedReference {
                        name: id.name.to_string(),
                        declaration: Some(declaration),
                        import: None,
                        synthesized_by_forward_ref: false,
                    }));
                }
                _ => {
                    return Ok(ResolvedValue::Reference(ResolvedReference {
                        name: id.name.to_string(),
                        declaration: Some(declaration),
                        import: None,
                        synthesized_by_forward_ref: false,
                    }));
                }
            }
        }

        if let Some(import) = self.host.import_of_identifier(file, id) {
            return Ok(ResolvedValue::Reference(ResolvedReference {
                name: id.name.to_string(),
                declaration: None,
                import: Some(import),
                synthesized_by_forward_ref: false,
            }));
        }

        Ok(ResolvedValue::Opaque(expr))
    }

    fn evaluate_member(
        &self,
        file: &'a ParsedFile<'a>,
        expr: &'a ast::Expression<'a>,
        member: &'a ast::StaticMemberExpression<'a>,
        depth: usize,
    ) -> Result<ResolvedValue<'a>, FatalLinkerError> {
        // `ns.Symbol` where `ns` is a namespace import.
        if let ast::Expression::Identifier(object) = unwrap_parens(&member.object) {
            if let Some(import) = self.host.import_of_identifier(file, object) {
                if import.is_namespace() {
                    let name = member.property.name.to_string();
                    return Ok(ResolvedValue::Reference(ResolvedReference {
                        name: name.clone(),
                        declaration: None,
                        import: Some(Import::new(import.from, name)),
                        synthesized_by_forward_ref: false,
                    }));
                }
            }
        }

        // Property access into a foldable object.
        let object = self.evaluate_at(file, &member.object, depth + 1)?;
        match object.get_property(member.property.name.as_str()) {
            Some(value) => Ok(value.clone()),
            None => Ok(ResolvedValue::Opaque(expr)),
        }
    }

    fn evaluate_call(
        &self,
        file: &'a ParsedFile<'a>,
        expr: &'a ast::Expression<'a>,
        call: &'a ast::CallExpression<'a>,
        depth: usize,
    ) -> Result<ResolvedValue<'a>, FatalLinkerError> {
        if !self.is_forward_ref_callee(file, &call.callee) {
            return Ok(ResolvedValue::Opaque(expr));
        }

        // The deferred-reference helper has exactly one legal shape: a single
        // function-literal argument whose return expression is the deferred
        // value. Anything else is an ambiguous forward reference.
        if call.arguments.len() != 1 {
            return Err(FatalLinkerError::class(
                format!(
                    "deferred reference helper expects exactly 1 argument, got {}",
                    call.arguments.len()
                ),
                source_text(file.source, call.span),
            ));
        }
        let argument = call.arguments[0].as_expression().ok_or_else(|| {
            FatalLinkerError::class(
                "deferred reference argument is not an expression",
                source_text(file.source, call.span),
            )
        })?;
        let returned = returned_expression(argument).ok_or_else(|| {
            FatalLinkerError::class(
                "deferred reference argument must be a function returning a value",
                source_text(file.source, argument.span()),
            )
        })?;

        match self.evaluate_at(file, returned, depth + 1)? {
            ResolvedValue::Reference(mut reference) => {
                reference.synthesized_by_forward_ref = true;
                Ok(ResolvedValue::Reference(reference))
            }
            other => Ok(other),
        }
    }

    /// `true` if the callee resolves to the `forwardRef` helper of the core
    /// package.
    fn is_forward_ref_callee(
        &self,
        file: &'a ParsedFile<'a>,
        callee: &'a ast::Expression<'a>,
    ) -> bool {
        match unwrap_parens(callee) {
            ast::Expression::Identifier(id) => {
                match self.host.import_of_identifier(file, id) {
                    Some(import) => import.from == CORE_MODULE && import.name == "forwardRef",
                    None => self.is_core && id.name == "forwardRef",
                }
            }
            ast::Expression::StaticMemberExpression(member) => {
                if member.property.name != "forwardRef" {
                    return false;
                }
                let ast::Expression::Identifier(object) = unwrap_parens(&member.object) else {
                    return false;
                };
                match self.host.import_of_identifier(file, object) {
                    Some(import) => import.is_namespace() && import.from == CORE_MODULE,
                    None => self.is_core,
                }
            }
            _ => false,
        }
    }
}

/// Initializers the evaluator will fold through a local-constant reference.
fn is_literal_like(expr: &ast::Expression<'_>) -> bool {
    matches!(
        unwrap_parens(expr),
        ast::Expression::StringLiteral(_)
            | ast::Expression::NumericLiteral(_)
            | ast::Expression::BooleanLiteral(_)
            | ast::Expression::NullLiteral(_)
            | ast::Expression::ArrayExpression(_)
            | ast::Expression::ObjectExpression(_)
            | ast::Expression::TemplateLiteral(_)
    )
}
