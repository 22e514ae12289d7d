//! Reflection Model
//!
//! Format-independent view of declarations, imports, exports, and decorator
//! metadata found in a compiled bundle file. The format-specific reflection
//! hosts produce these types; the analyzer and renderers consume them without
//! knowing which module format they came from.

use crate::diagnostics::FatalLinkerError;
use crate::packages::ParsedFile;
use indexmap::IndexMap;
use oxc_ast::ast;
use oxc_span::{GetSpan, Span};
use smallvec::SmallVec;
use std::rc::Rc;

/// Static fields added by a previous recompilation run. A class that already
/// carries one of these is skipped, which is what makes the pipeline
/// idempotent.
pub const RUNTIME_DEFINITION_FIELDS: [&str; 7] =
    ["ɵfac", "ɵcmp", "ɵdir", "ɵprov", "ɵpipe", "ɵmod", "ɵinj"];

/// The framework core package: decorators and runtime helpers live here.
pub const CORE_MODULE: &str = "@angular/core";

/// Whether a declaration points at a real definition site or had to be
/// synthesized because the real site could not be located.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Concrete,
    Inline,
}

/// Well-known symbols that receive special treatment instead of a source
/// definition lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownDeclaration {
    /// The `global` parameter of a UMD wrapper.
    JsGlobalObject,
    TsHelperDecorate,
    TsHelperParam,
    TsHelperMetadata,
}

/// The syntactic construct a declaration resolves to.
#[derive(Debug, Clone, Copy)]
pub enum DeclarationNode<'a> {
    Class(&'a ast::Class<'a>),
    Function(&'a ast::Function<'a>),
    Variable(&'a ast::VariableDeclarator<'a>),
    /// A function parameter acting as a module binding (wrapped-factory
    /// modules bind their imports this way).
    Parameter(&'a ast::FormalParameter<'a>),
    Expression(&'a ast::Expression<'a>),
}

impl<'a> DeclarationNode<'a> {
    pub fn span(&self) -> Span {
        match self {
            DeclarationNode::Class(node) => node.span,
            DeclarationNode::Function(node) => node.span,
            DeclarationNode::Variable(node) => node.span,
            DeclarationNode::Parameter(node) => node.span,
            DeclarationNode::Expression(node) => node.span(),
        }
    }

    pub fn name(&self) -> Option<&'a str> {
        match self {
            DeclarationNode::Class(node) => node.id.as_ref().map(|id| id.name.as_str()),
            DeclarationNode::Function(node) => node.id.as_ref().map(|id| id.name.as_str()),
            DeclarationNode::Variable(node) => match &node.id.kind {
                ast::BindingPatternKind::BindingIdentifier(id) => Some(id.name.as_str()),
                _ => None,
            },
            DeclarationNode::Parameter(node) => match &node.pattern.kind {
                ast::BindingPatternKind::BindingIdentifier(id) => Some(id.name.as_str()),
                _ => None,
            },
            DeclarationNode::Expression(_) => None,
        }
    }
}

/// Identifies a semantic definition site, independent of module format.
#[derive(Debug, Clone)]
pub struct Declaration<'a> {
    pub kind: DeclarationKind,
    /// The canonical syntactic handle for this declaration.
    pub node: DeclarationNode<'a>,
    /// The expression actually holding the runtime value. Differs from `node`
    /// only for `Inline` declarations.
    pub implementation: Option<&'a ast::Expression<'a>>,
    /// Set only when the declaration was observed through a re-export that
    /// crosses the package boundary; preserves provenance for alias imports.
    pub via_module: Option<String>,
    pub known: Option<KnownDeclaration>,
    /// Path of the file that contains the definition.
    pub file_path: &'a str,
}

impl<'a> Declaration<'a> {
    pub fn concrete(node: DeclarationNode<'a>, file_path: &'a str) -> Self {
        Self {
            kind: DeclarationKind::Concrete,
            node,
            implementation: None,
            via_module: None,
            known: None,
            file_path,
        }
    }

    pub fn inline(
        node: DeclarationNode<'a>,
        implementation: &'a ast::Expression<'a>,
        file_path: &'a str,
    ) -> Self {
        Self {
            kind: DeclarationKind::Inline,
            node,
            implementation: Some(implementation),
            via_module: None,
            known: None,
            file_path,
        }
    }

    /// Non-destructively annotate the declaration with re-export provenance.
    /// `node` and `kind` are never changed after creation.
    pub fn with_via_module(mut self, via_module: Option<String>) -> Self {
        if self.via_module.is_none() {
            self.via_module = via_module;
        }
        self
    }

    pub fn with_known(mut self, known: KnownDeclaration) -> Self {
        self.known = Some(known);
        self
    }
}

/// A cross-module identifier reference, prior to resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The module specifier the value is imported from.
    pub from: String,
    /// The imported name; `"*"` for namespace imports.
    pub name: String,
}

impl Import {
    pub fn new(from: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            name: name.into(),
        }
    }

    pub fn is_namespace(&self) -> bool {
        self.name == "*"
    }
}

/// Per-file mapping of exported name to declaration. Insertion order is the
/// textual order in which exports were folded; duplicate names keep the last
/// textual occurrence.
pub type ExportMap<'a> = IndexMap<String, Declaration<'a>>;

/// The class construct itself: a `class` in ES2015 shapes, the inner
/// constructor function in closure-wrapped ES5 shapes.
#[derive(Debug, Clone, Copy)]
pub enum ClassNode<'a> {
    Class(&'a ast::Class<'a>),
    Function(&'a ast::Function<'a>),
}

impl<'a> ClassNode<'a> {
    pub fn span(&self) -> Span {
        match self {
            ClassNode::Class(node) => node.span,
            ClassNode::Function(node) => node.span,
        }
    }
}

/// A class found in a compiled file, with the outer declaration and inner
/// implementation separated (they differ for closure-wrapped classes).
#[derive(Debug, Clone)]
pub struct ClassSymbol<'a> {
    pub name: String,
    /// The declaration the rest of the module refers to.
    pub declaration: ClassNode<'a>,
    /// The construct holding the runtime shape of the class.
    pub implementation: ClassNode<'a>,
    /// Span of the whole statement that declares the class; render anchor for
    /// the direct-class formats.
    pub statement_span: Span,
    /// Span of the `return X;` statement of the class closure, when the class
    /// is closure-wrapped; render anchor for those formats.
    pub iife_return_span: Option<Span>,
    /// Body of the class closure, when present. Helper calls are searched
    /// here before falling back to a module-scope scan.
    pub closure_body: Option<&'a ast::FunctionBody<'a>>,
}

impl<'a> ClassSymbol<'a> {
    pub fn is_closure_wrapped(&self) -> bool {
        self.closure_body.is_some()
    }
}

/// Metadata extracted from one decorator applied to a class or member.
#[derive(Debug, Clone)]
pub struct Decorator<'a> {
    /// Name by which the decorator was invoked.
    pub name: String,
    /// The import the decorator identifier resolves to, if it is imported.
    pub import: Option<Import>,
    /// Argument expressions of the decorator invocation.
    pub args: Vec<&'a ast::Expression<'a>>,
    pub span: Span,
}

impl<'a> Decorator<'a> {
    /// `true` when the decorator comes from the framework core package (or
    /// the bundle being compiled *is* the core package).
    pub fn is_from_core(&self, core_module: &str, is_core: bool) -> bool {
        match &self.import {
            Some(import) => {
                import.from == core_module
                    || (is_core && import.from.starts_with('.'))
            }
            None => is_core,
        }
    }
}

/// A constructor parameter with its injection metadata.
#[derive(Debug, Clone)]
pub struct CtorParameter<'a> {
    pub name: Option<String>,
    /// The token expression to inject (usually a reference to a type).
    pub token: Option<&'a ast::Expression<'a>>,
    /// Parameter-level decorators (`Inject`, `Optional`, ...).
    pub decorators: Vec<Decorator<'a>>,
}

/// Format-aware lookups over a compiled bundle file.
///
/// One implementation exists per supported module format; a bundle selects
/// its implementation once, at construction time. Implementations are pure
/// lookups: the only internal mutation is memoization of per-file export
/// maps, which are computed once and never recomputed within a bundle.
pub trait ReflectionHost<'a> {
    /// The statements making up the module scope of the file. This is the
    /// program body for most formats and the factory function body for
    /// wrapped-factory modules.
    fn module_statements(&self, file: &'a ParsedFile<'a>) -> &'a [ast::Statement<'a>];

    /// Determine whether `id`, used somewhere in `file`, refers to a value
    /// imported from another module. Returns `None` (never an error) for
    /// locally defined identifiers.
    fn import_of_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        id: &ast::IdentifierReference<'a>,
    ) -> Option<Import>;

    /// Resolve an identifier to the declaration of the value it refers to.
    fn declaration_of_identifier(
        &self,
        file: &'a ParsedFile<'a>,
        id: &ast::IdentifierReference<'a>,
    ) -> Option<Declaration<'a>>;

    /// Compute (once, then cache) every name exported by `file`.
    fn exports_of_module(&self, file: &'a ParsedFile<'a>) -> Option<Rc<ExportMap<'a>>>;

    /// All classes declared in the module scope of `file`, in declaration
    /// order.
    fn classes_in_file(&self, file: &'a ParsedFile<'a>) -> Vec<ClassSymbol<'a>>;

    /// The decorators attached to `class` through this format's metadata
    /// encoding. An empty result is normal (undecorated class); an error
    /// means the metadata encoding itself is malformed.
    fn decorators_of_class(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
    ) -> Result<SmallVec<[Decorator<'a>; 2]>, FatalLinkerError>;

    /// Constructor parameter metadata (`ctorParameters` or `__param` helper
    /// output), if the class records any.
    fn ctor_parameters(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
    ) -> Option<Vec<CtorParameter<'a>>>;

    /// Member decorators keyed by property name (`propDecorators`).
    fn prop_decorators(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
    ) -> IndexMap<String, Vec<Decorator<'a>>>;

    /// Locate invocations of the named runtime helpers associated with
    /// `class`. The class's own wrapping construct is searched first; only if
    /// nothing is found there does the search widen to the module scope. Both
    /// paths yield identical results for a given input.
    fn helper_calls_for_class(
        &self,
        file: &'a ParsedFile<'a>,
        class: &ClassSymbol<'a>,
        names: &[&str],
    ) -> Vec<&'a ast::CallExpression<'a>>;

    /// `true` if the class already carries recompiled definition fields.
    fn has_runtime_definitions(&self, file: &'a ParsedFile<'a>, class: &ClassSymbol<'a>) -> bool;
}
