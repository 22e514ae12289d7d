//! Analysis API - Core types for the decorator analysis pipeline.
//!
//! Each recognized class is tracked by a `ClassRecord` that moves through a
//! closed set of states as the pipeline advances. `Poisoned` is an absorbing
//! error state reachable from any step; a poisoned class is excluded from
//! rendering but never blocks its siblings.

use crate::diagnostics::Diagnostic;
use crate::evaluator::ResolvedValue;
use crate::packages::ParsedFile;
use crate::reflection::{ClassSymbol, Decorator};
use indexmap::IndexMap;
use oxc_ast::ast;
use oxc_span::Span;

/// The decorator kinds the analyzer compiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecoratorKind {
    Component,
    Directive,
    Injectable,
    Pipe,
    NgModule,
}

impl DecoratorKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Component" => Some(DecoratorKind::Component),
            "Directive" => Some(DecoratorKind::Directive),
            "Injectable" => Some(DecoratorKind::Injectable),
            "Pipe" => Some(DecoratorKind::Pipe),
            "NgModule" => Some(DecoratorKind::NgModule),
            _ => None,
        }
    }
}

/// The state of a class during compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassState {
    /// A recognized decorator was found on the class.
    Detected,
    /// External resources (templates, styles) have been loaded.
    Preanalyzed,
    /// Metadata has been extracted; pending whole-bundle resolution.
    Analyzed,
    /// Cross-class references are reconciled; ready for compilation.
    Resolved,
    /// Definition fields have been generated (terminal).
    Compiled,
    /// Analysis failed with a class-scoped error (terminal, absorbing).
    Poisoned,
}

/// Where a component template came from.
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Inline(String),
    External { url: String, text: String },
}

impl TemplateSource {
    pub fn text(&self) -> &str {
        match self {
            TemplateSource::Inline(text) => text,
            TemplateSource::External { text, .. } => text,
        }
    }
}

/// One constructor dependency of a class.
#[derive(Debug, Clone)]
pub struct CtorDep<'a> {
    /// The token expression as written in the compiled file; re-emitted
    /// verbatim in the generated factory.
    pub token_expr: Option<&'a ast::Expression<'a>>,
    /// The folded token, used for forward-reference detection.
    pub token: Option<ResolvedValue<'a>>,
    pub optional: bool,
    pub self_only: bool,
    pub skip_self: bool,
    pub host: bool,
    /// Set for `@Attribute("name")` parameters.
    pub attribute: Option<String>,
}

/// Metadata extracted from one decorated class.
#[derive(Debug, Clone, Default)]
pub struct ClassMetadata<'a> {
    pub selector: Option<String>,
    pub template: Option<TemplateSource>,
    pub styles: Vec<String>,
    /// Member name to public binding name.
    pub inputs: IndexMap<String, String>,
    pub outputs: IndexMap<String, String>,
    /// Provider expressions are not folded; they are re-emitted verbatim.
    pub providers: Option<&'a ast::Expression<'a>>,
    pub provided_in: Option<&'a ast::Expression<'a>>,
    pub pipe_name: Option<String>,
    pub pure: bool,
    /// NgModule member lists; `declarations` is also folded for resolution.
    pub declarations: Vec<ResolvedValue<'a>>,
    pub declarations_expr: Option<&'a ast::Expression<'a>>,
    pub imports_expr: Option<&'a ast::Expression<'a>>,
    pub exports_expr: Option<&'a ast::Expression<'a>>,
    pub ctor_deps: Option<Vec<CtorDep<'a>>>,
}

/// A description of one static field to add to a class, including the type
/// for the paired declaration file.
#[derive(Debug, Clone)]
pub struct CompileResult {
    /// Name of the static field.
    pub name: String,
    /// The initialization expression text.
    pub initializer: String,
    /// The type to use in the .d.ts declaration.
    pub type_desc: String,
}

/// A class moving through the analysis pipeline.
#[derive(Debug)]
pub struct ClassRecord<'a> {
    pub symbol: ClassSymbol<'a>,
    pub kind: DecoratorKind,
    pub decorator: Decorator<'a>,
    pub state: ClassState,
    pub meta: Option<ClassMetadata<'a>>,
    /// Whether factory emission must go out of line, as a separate statement
    /// after the definitions (set when a constructor dependency is reached
    /// only through the deferred-reference helper).
    pub uses_closure_ctor_helper: bool,
    /// Statement spans of the metadata assignments the renderer strips.
    pub decorator_removals: Vec<Span>,
    pub compiled: Option<Vec<CompileResult>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> ClassRecord<'a> {
    pub fn detected(symbol: ClassSymbol<'a>, kind: DecoratorKind, decorator: Decorator<'a>) -> Self {
        Self {
            symbol,
            kind,
            decorator,
            state: ClassState::Detected,
            meta: None,
            uses_closure_ctor_helper: false,
            decorator_removals: Vec::new(),
            compiled: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn to_preanalyzed(&mut self) {
        self.assert_transition_legal(ClassState::Detected, ClassState::Preanalyzed);
        self.state = ClassState::Preanalyzed;
    }

    pub fn to_analyzed(&mut self, meta: ClassMetadata<'a>) {
        self.assert_transition_legal(ClassState::Preanalyzed, ClassState::Analyzed);
        self.meta = Some(meta);
        self.state = ClassState::Analyzed;
    }

    pub fn to_resolved(&mut self) {
        self.assert_transition_legal(ClassState::Analyzed, ClassState::Resolved);
        self.state = ClassState::Resolved;
    }

    pub fn to_compiled(&mut self, compiled: Vec<CompileResult>) {
        self.assert_transition_legal(ClassState::Resolved, ClassState::Compiled);
        self.compiled = Some(compiled);
        self.state = ClassState::Compiled;
    }

    /// Absorbing error state, reachable from any step.
    pub fn poison(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
        self.state = ClassState::Poisoned;
    }

    pub fn is_poisoned(&self) -> bool {
        self.state == ClassState::Poisoned
    }

    fn assert_transition_legal(&self, allowed_state: ClassState, transition_to: ClassState) {
        if self.state != allowed_state {
            panic!(
                "Assertion failure: cannot transition from {:?} to {:?}.",
                self.state, transition_to
            );
        }
    }
}

/// A source file together with the classes analyzed in it, in declaration
/// order, and any non-fatal diagnostics collected along the way.
pub struct CompiledFile<'a> {
    pub file: &'a ParsedFile<'a>,
    pub classes: Vec<ClassRecord<'a>>,
    pub diagnostics: Vec<Diagnostic>,
    /// New imports the rendered file needs: (module specifier, local prefix).
    pub imports: Vec<(String, String)>,
}
