//! Linker Errors
//!
//! A `FatalLinkerError` reports a violated structural assumption about the
//! module format. It aborts the smallest enclosing unit that can safely be
//! discarded: one class, one file, or (rarely) the whole bundle.

use super::diagnostic::{Diagnostic, ErrorCode};
use thiserror::Error;

/// The unit that must be discarded when a fatal error is raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorScope {
    Class,
    File,
    Bundle,
}

/// An unrecoverable error hit while reflecting or analyzing a compiled file.
#[derive(Debug, Clone, Error)]
#[error("Fatal linker error: {message} (node: {node_snippet})")]
pub struct FatalLinkerError {
    pub scope: ErrorScope,
    pub message: String,
    /// Source text of the offending construct, for error reporting.
    pub node_snippet: String,
}

impl FatalLinkerError {
    pub fn new(scope: ErrorScope, message: impl Into<String>, node_snippet: impl Into<String>) -> Self {
        Self {
            scope,
            message: message.into(),
            node_snippet: truncate_snippet(node_snippet.into()),
        }
    }

    pub fn class(message: impl Into<String>, node_snippet: impl Into<String>) -> Self {
        Self::new(ErrorScope::Class, message, node_snippet)
    }

    pub fn file(message: impl Into<String>, node_snippet: impl Into<String>) -> Self {
        Self::new(ErrorScope::File, message, node_snippet)
    }

    pub fn bundle(message: impl Into<String>, node_snippet: impl Into<String>) -> Self {
        Self::new(ErrorScope::Bundle, message, node_snippet)
    }

    /// Convert into an `Error` diagnostic for the result envelope.
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(ErrorCode::FormatNotRecognized, self.to_string())
    }
}

fn truncate_snippet(snippet: String) -> String {
    const MAX: usize = 100;
    if snippet.len() <= MAX {
        return snippet;
    }
    let mut cut = MAX;
    while !snippet.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &snippet[..cut])
}
