// UMD Rendering Formatter
//
// Wrapped-factory format: definitions use the ES5 closure placement inside
// the factory body. A new import means rewriting the wrapper itself: the
// factory function gains a parameter, the CommonJS branch gains a
// `require(...)` argument, the AMD dependency array gains the specifier,
// and the global branch gains a `global.*` argument.

use super::esm5_rendering_formatter::insert_before_iife_return;
use super::formatter::RenderingFormatter;
use super::magic_string::MagicString;
use crate::analysis::ClassRecord;
use crate::host::src::commonjs_umd_utils::parse_umd_wrapper;
use crate::packages::ParsedFile;

pub struct UmdRenderingFormatter;

impl RenderingFormatter for UmdRenderingFormatter {
    fn add_imports(
        &self,
        out: &mut MagicString<'_>,
        imports: &[(String, String)],
        file: &ParsedFile<'_>,
    ) {
        if imports.is_empty() {
            return;
        }
        // The wrapper was validated when the reflection host was built, so
        // re-deriving it here cannot fail for a file that reached rendering.
        let Ok(wrapper) = parse_umd_wrapper(file) else {
            return;
        };

        for (module, prefix) in imports {
            // Factory parameter, appended after the last existing one.
            match wrapper.factory_fn.params.items.last() {
                Some(last) => {
                    out.insert(last.span.end as usize, format!(", {}", prefix), None);
                }
                None => {
                    let params_span = wrapper.factory_fn.params.span;
                    out.insert(
                        (params_span.end as usize).saturating_sub(1),
                        prefix.clone(),
                        None,
                    );
                }
            }

            // CommonJS branch argument.
            let cjs_pos = (wrapper.commonjs_call.span.end as usize).saturating_sub(1);
            let cjs_text = if wrapper.commonjs_call.arguments.is_empty() {
                format!("require('{}')", module)
            } else {
                format!(", require('{}')", module)
            };
            out.insert(cjs_pos, cjs_text, None);

            // AMD dependency array entry.
            if let Some(deps) = wrapper.define_deps {
                let deps_pos = (deps.span.end as usize).saturating_sub(1);
                let deps_text = if deps.elements.is_empty() {
                    format!("'{}'", module)
                } else {
                    format!(", '{}'", module)
                };
                out.insert(deps_pos, deps_text, None);
            }

            // Global branch argument.
            for call in &wrapper.other_calls {
                let pos = (call.span.end as usize).saturating_sub(1);
                let text = if call.arguments.is_empty() {
                    global_path(module)
                } else {
                    format!(", {}", global_path(module))
                };
                out.insert(pos, text, None);
            }
        }
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

/// The global-namespace expression a module specifier is published under in
/// the wrapper's global branch, e.g. `@angular/core` -> `global.ng.core`.
fn global_path(module: &str) -> String {
    let dotted = match module.strip_prefix("@angular/") {
        Some(rest) => format!("ng.{}", rest.replace('/', ".")),
        None => module
            .trim_start_matches('@')
            .replace(['/', '-'], "."),
    };
    format!("global.{}", dotted)
}
