// Result Types
//
// Result types for partial evaluation of decorator arguments.

use crate::reflection::{Declaration, Import};
use indexmap::IndexMap;
use oxc_ast::ast;

/// A reference to a declared value (usually a class) found while folding a
/// decorator argument.
#[derive(Debug, Clone)]
pub struct ResolvedReference<'a> {
    pub name: String,
    pub declaration: Option<Declaration<'a>>,
    pub import: Option<Import>,
    /// `true` when the reference was reached through the deferred-reference
    /// helper; such references must be emitted in closure form.
    pub synthesized_by_forward_ref: bool,
}

/// Resolved value from partial evaluation.
///
/// `Opaque` is a normal outcome, not an error: any expression shape the
/// evaluator does not fold is preserved verbatim and re-emitted unchanged.
#[derive(Debug, Clone)]
pub enum ResolvedValue<'a> {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
    Undefined,
    Array(Vec<ResolvedValue<'a>>),
    Object(IndexMap<String, ResolvedValue<'a>>),
    Reference(ResolvedReference<'a>),
    Opaque(&'a ast::Expression<'a>),
}

impl<'a> ResolvedValue<'a> {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ResolvedValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ResolvedValue::Num(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ResolvedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ResolvedValue<'a>]> {
        match self {
            ResolvedValue::Array(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, ResolvedValue<'a>>> {
        match self {
            ResolvedValue::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ResolvedReference<'a>> {
        match self {
            ResolvedValue::Reference(reference) => Some(reference),
            _ => None,
        }
    }

    pub fn get_property(&self, key: &str) -> Option<&ResolvedValue<'a>> {
        self.as_object().and_then(|map| map.get(key))
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self, ResolvedValue::Opaque(_))
    }
}
