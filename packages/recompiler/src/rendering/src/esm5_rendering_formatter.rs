// ESM5 Rendering Formatter
//
// ESM5 bundles keep ESM import statements, so import emission is shared
// with the direct-class formatter. Definitions, however, must live inside
// the class closure, immediately before its `return X;`, so that they are
// evaluated while the constructor function is still being set up.

use super::esm_rendering_formatter::EsmRenderingFormatter;
use super::formatter::{line_indentation, RenderingFormatter};
use super::magic_string::MagicString;
use crate::analysis::ClassRecord;
use crate::packages::ParsedFile;

pub struct Esm5RenderingFormatter {
    esm: EsmRenderingFormatter,
}

impl Esm5RenderingFormatter {
    pub fn new() -> Self {
        Self {
            esm: EsmRenderingFormatter,
        }
    }
}

impl Default for Esm5RenderingFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderingFormatter for Esm5RenderingFormatter {
    fn add_imports(
        &self,
        out: &mut MagicString<'_>,
        imports: &[(String, String)],
        file: &ParsedFile<'_>,
    ) {
        self.esm.add_imports(out, imports, file);
    }

    fn add_definitions(
        &self,
        out: &mut MagicString<'_>,
        file: &ParsedFile<'_>,
        class: &ClassRecord<'_>,
        definitions: &str,
    ) {
        insert_before_iife_return(out, file, class, definitions);
    }

    fn add_adjacent_statements(
        &self,
        out: &mut MagicString<'_>,
        _file: &ParsedFile<'_>,
        class: &ClassRecord<'_>,
        statements: &str,
    ) {
        let pos = class.symbol.statement_span.end as usize;
        out.insert(pos, format!("\n{}", statements), Some(&class.symbol.name));
    }
}

/// Inserts `text` on its own lines just before the `return X;` that closes
/// the class closure, matching the return statement's indentation. Classes
/// without a closure (bare constructor functions) fall back to insertion
/// after the declaring statement.
pub(crate) fn insert_before_iife_return(
    out: &mut MagicString<'_>,
    file: &ParsedFile<'_>,
    class: &ClassRecord<'_>,
    text: &str,
) {
    match class.symbol.iife_return_span {
        Some(return_span) => {
            let pos = return_span.start as usize;
            let indent = line_indentation(file.source, pos);
            let mut block = String::new();
            for line in text.lines() {
                block.push_str(line);
                block.push('\n');
                block.push_str(indent);
            }
            out.insert(pos, block, Some(&class.symbol.name));
        }
        None => {
            let pos = class.symbol.statement_span.end as usize;
            out.insert(pos, format!("\n{}", text), Some(&class.symbol.name));
        }
    }
}
