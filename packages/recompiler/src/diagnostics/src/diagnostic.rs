// Diagnostics
//
// Diagnostic value types surfaced to the caller of a bundle transform.

use std::fmt;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticCategory {
    Error,
    Warning,
}

/// Stable error codes for recompilation diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    DecoratorArgNotLiteral = 1001,
    DecoratorArityWrong = 1002,
    ValueHasWrongType = 1010,
    ComponentMissingTemplate = 2001,
    TemplateParseError = 2002,
    ComponentResourceNotFound = 2008,
    SymbolNotExported = 3001,
    UnresolvedImport = 3002,
    ParseFailure = 5001,
    FormatNotRecognized = 5002,
    DeprecatedShape = 6001,
    UnusedSymbol = 6002,
}

/// Position of a diagnostic in an input file.
///
/// `start`/`end` are 0-based character offsets; `line`/`col` are 0-based and
/// derived from `start` at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpan {
    pub file: String,
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

impl SourceSpan {
    /// Build a span from character offsets, computing line/col from the file text.
    pub fn from_offsets(file: impl Into<String>, source: &str, start: usize, end: usize) -> Self {
        let mut line = 0;
        let mut line_start = 0;
        for (idx, byte) in source.as_bytes().iter().enumerate() {
            if idx >= start {
                break;
            }
            if *byte == b'\n' {
                line += 1;
                line_start = idx + 1;
            }
        }
        Self {
            file: file.into(),
            start,
            end,
            line,
            col: start - line_start,
        }
    }
}

/// A single problem (or note) found while transforming a bundle.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: ErrorCode,
    pub message: String,
    pub span: Option<SourceSpan>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Error,
            code,
            message: message.into(),
            span: None,
        }
    }

    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category: DiagnosticCategory::Warning,
            code,
            message: message.into(),
            span: None,
        }
    }

    pub fn with_span(mut self, span: SourceSpan) -> Self {
        self.span = Some(span);
        self
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let category = match self.category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
        };
        match &self.span {
            Some(span) => write!(
                f,
                "{}:{}:{} - {} NG{:04}: {}",
                span.file,
                span.line + 1,
                span.col + 1,
                category,
                self.code as u32,
                self.message
            ),
            None => write!(f, "{} NG{:04}: {}", category, self.code as u32, self.message),
        }
    }
}

/// Returns `true` if any diagnostic in the collection is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.is_error())
}
