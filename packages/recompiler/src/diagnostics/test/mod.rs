use crate::diagnostics::{
    has_errors, Diagnostic, DiagnosticCategory, ErrorCode, FatalLinkerError, SourceSpan,
};

#[test]
fn span_from_offsets_computes_line_and_col() {
    let source = "line one\nline two\nline three\n";
    let span = SourceSpan::from_offsets("/a.js", source, 14, 17);
    assert_eq!(span.line, 1);
    assert_eq!(span.col, 5);
}

#[test]
fn span_on_first_line() {
    let span = SourceSpan::from_offsets("/a.js", "var x = 1;", 4, 5);
    assert_eq!(span.line, 0);
    assert_eq!(span.col, 4);
}

#[test]
fn diagnostic_display_includes_code_and_position() {
    let diag = Diagnostic::error(ErrorCode::TemplateParseError, "unterminated interpolation")
        .with_span(SourceSpan::from_offsets("/lib/a.js", "abc\ndef", 4, 5));
    let rendered = diag.to_string();
    assert_eq!(rendered, "/lib/a.js:2:1 - error NG2002: unterminated interpolation");
}

#[test]
fn diagnostic_display_without_span() {
    let diag = Diagnostic::warning(ErrorCode::DeprecatedShape, "deprecated export shape");
    assert_eq!(diag.to_string(), "warning NG6001: deprecated export shape");
    assert_eq!(diag.category, DiagnosticCategory::Warning);
}

#[test]
fn has_errors_ignores_warnings() {
    let warnings = vec![Diagnostic::warning(ErrorCode::UnusedSymbol, "unused")];
    assert!(!has_errors(&warnings));
    let mixed = vec![
        Diagnostic::warning(ErrorCode::UnusedSymbol, "unused"),
        Diagnostic::error(ErrorCode::ParseFailure, "bad"),
    ];
    assert!(has_errors(&mixed));
}

#[test]
fn fatal_error_truncates_long_snippets() {
    let snippet = "x".repeat(500);
    let err = FatalLinkerError::class("bad shape", snippet);
    assert!(err.node_snippet.len() < 110);
    assert!(err.node_snippet.ends_with("..."));
}
