// CommonJS Rendering Formatter
//
// Plain-exports-object format: imports become `var iN = require('...');`
// statements after the existing require block; definitions use the ES5
// closure placement.

use super::esm5_rendering_formatter::insert_before_iife_return;
use super::formatter::RenderingFormatter;
use super::magic_string::MagicString;
use crate::analysis::ClassRecord;
use crate::packages::ParsedFile;
use crate::reflection::src::util::{require_call_specifier, unwrap_parens};
use oxc_ast::ast;

pub struct CommonJsRenderingFormatter;

impl CommonJsRenderingFormatter {
    /// Position just after the last top-level `require(...)` binding, or the
    /// top of the file when there is none.
    fn end_of_requires(file: &ParsedFile<'_>) -> usize {
        let mut end = 0;
        for stmt in &file.program.body {
            let ast::Statement::VariableDeclaration(var) = stmt else {
                continue;
            };
            let is_require = var.declarations.iter().any(|declarator| {
                declarator
                    .init
                    .as_ref()
                    .map(unwrap_parens)
                    .and_then(require_call_specifier)
                    .is_some()
            });
            if is_require {
                end = var.span.end as usize;
            }
        }
        end
    }
}

impl RenderingFormatter for CommonJsRenderingFormatter {
    fn add_imports(
        &self,
        out: &mut MagicString<'_>,
        imports: &[(String, String)],
        file: &ParsedFile<'_>,
    ) {
        if imports.is_empty() {
            return;
        }
        let pos = Self::end_of_requires(file);
        let mut text = String::new();
        for (module, prefix) in imports {
            if pos == 0 {
                text.push_str(&format!("var {} = require('{}');\n", prefix, module));
            } else {
                text.push_str(&format!("\nvar {} = require('{}');", prefix, module));
            }
        }
        out.insert(pos, text, None);
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
