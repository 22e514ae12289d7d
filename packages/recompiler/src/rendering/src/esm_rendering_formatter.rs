// ESM Rendering Formatter
//
// Direct-class format: definitions are inserted immediately after the
// statement that declares the class; imports become namespace import
// statements after the existing import block.

use super::formatter::{end_of_imports, RenderingFormatter};
use super::magic_string::MagicString;
use crate::analysis::ClassRecord;
use crate::packages::ParsedFile;

pub struct EsmRenderingFormatter;

impl RenderingFormatter for EsmRenderingFormatter {
    fn add_imports(
        &self,
        out: &mut MagicString<'_>,
        imports: &[(String, String)],
        file: &ParsedFile<'_>,
    ) {
        if imports.is_empty() {
            return;
        }
        let pos = end_of_imports(file);
        let mut text = String::new();
        for (module, prefix) in imports {
            if pos == 0 {
                text.push_str(&format!("import * as {} from '{}';\n", prefix, module));
            } else {
                text.push_str(&format!("\nimport * as {} from '{}';", prefix, module));
            }
        }
        out.insert(pos, text, None);
    }

    fn add_definitions(
        &self,
        out: &mut MagicString<'_>,
        _file: &ParsedFile<'_>,
        class: &ClassRecord<'_>,
        definitions: &str,
    ) {
        let pos = class.symbol.statement_span.end as usize;
        out.insert(
            pos,
            format!("\n{}", definitions),
            Some(&class.symbol.name),
        );
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
