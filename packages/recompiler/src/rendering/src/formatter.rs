// Rendering Formatter
//
// Format-specific edit generation. One implementation exists per module
// format; the renderer drives whichever one matches the bundle. Formatters
// only append to the edit set; everything they do not touch stays
// byte-for-byte identical in the output.

use super::magic_string::MagicString;
use crate::analysis::ClassRecord;
use crate::packages::ParsedFile;
use oxc_span::Span;

pub trait RenderingFormatter {
    /// Emit import statements (or their format's equivalent) for the
    /// `(module specifier, local prefix)` pairs the generated code needs.
    fn add_imports(
        &self,
        out: &mut MagicString<'_>,
        imports: &[(String, String)],
        file: &ParsedFile<'_>,
    );

    /// Add the generated definition assignments for a class, at the position
    /// idiomatic for the format.
    fn add_definitions(
        &self,
        out: &mut MagicString<'_>,
        file: &ParsedFile<'_>,
        class: &ClassRecord<'_>,
        definitions: &str,
    );

    /// Add statements that must follow the class's enclosing statement
    /// (out-of-line constructor helpers).
    fn add_adjacent_statements(
        &self,
        out: &mut MagicString<'_>,
        file: &ParsedFile<'_>,
        class: &ClassRecord<'_>,
        statements: &str,
    );

    /// Strip the now-redundant metadata assignments.
    fn remove_decorators(&self, out: &mut MagicString<'_>, spans: &[Span]) {
        for span in spans {
            out.remove(span.start as usize, span.end as usize);
        }
    }
}

/// Leading whitespace of the line `offset` sits on; keeps inserted
/// statements aligned with their surroundings.
pub(crate) fn line_indentation(source: &str, offset: usize) -> &str {
    let line_start = source[..offset].rfind('\n').map_or(0, |idx| idx + 1);
    let line = &source[line_start..];
    let indent_len = line
        .char_indices()
        .find(|(_, ch)| !matches!(ch, ' ' | '\t'))
        .map_or(line.len(), |(idx, _)| idx);
    &line[..indent_len]
}

/// Position just after the last top-level import declaration, where new
/// imports slot in naturally; falls back to the very top of the file.
pub(crate) fn end_of_imports(file: &ParsedFile<'_>) -> usize {
    use oxc_ast::ast;
    let mut end = 0;
    for stmt in &file.program.body {
        if let ast::Statement::ImportDeclaration(decl) = stmt {
            end = decl.span.end as usize;
        }
    }
    end
}
