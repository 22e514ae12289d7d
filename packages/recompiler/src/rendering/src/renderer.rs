//! Renderer
//!
//! Drives the format-specific formatter across every analyzed file of a
//! bundle and assembles the final outputs. A file whose analysis produced
//! no edits yields no `RenderedFile` at all, so untouched files are never
//! rewritten.

use super::formatter::RenderingFormatter;
use super::magic_string::MagicString;
use crate::analysis::{ClassRecord, ClassState, CompiledFile};
use crate::logging::Logger;
use crate::sourcemaps::SourceMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// A rewritten file, ready to be persisted by the caller's file writer.
#[derive(Debug)]
pub struct RenderedFile {
    pub path: String,
    pub contents: String,
    pub map: Option<SourceMap>,
}

static SOURCE_MAPPING_URL: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?m)^//# sourceMappingURL=.*$").ok());

pub struct Renderer<'e> {
    formatter: &'e dyn RenderingFormatter,
    logger: &'e dyn Logger,
}

impl<'e> Renderer<'e> {
    pub fn new(formatter: &'e dyn RenderingFormatter, logger: &'e dyn Logger) -> Self {
        Self { formatter, logger }
    }

    pub fn render_program(&self, analyses: &[CompiledFile<'_>]) -> Vec<RenderedFile> {
        let mut rendered = Vec::new();
        for compiled_file in analyses {
            if let Some(file) = self.render_file(compiled_file) {
                rendered.push(file);
            }
        }
        rendered
    }

    fn render_file(&self, compiled_file: &CompiledFile<'_>) -> Option<RenderedFile> {
        let file = compiled_file.file;
        let mut out = MagicString::new(file.source);

        self.formatter
            .add_imports(&mut out, &compiled_file.imports, file);

        for class in &compiled_file.classes {
            if class.state != ClassState::Compiled {
                continue;
            }
            let Some(results) = &class.compiled else {
                continue;
            };

            let mut definition_lines = Vec::new();
            let mut adjacent_lines = Vec::new();
            for result in results {
                let line = format!(
                    "{}.{} = {};",
                    class.symbol.name, result.name, result.initializer
                );
                if result.name == "ɵfac" && class.uses_closure_ctor_helper {
                    adjacent_lines.push(line);
                } else {
                    definition_lines.push(line);
                }
            }

            if !definition_lines.is_empty() {
                self.formatter
                    .add_definitions(&mut out, file, class, &definition_lines.join("\n"));
            }
            if !adjacent_lines.is_empty() {
                self.formatter.add_adjacent_statements(
                    &mut out,
                    file,
                    class,
                    &adjacent_lines.join("\n"),
                );
            }
            self.formatter
                .remove_decorators(&mut out, &class.decorator_removals);
        }

        if !out.has_changed() {
            self.logger
                .debug(&format!("{}: no changes needed", file.path));
            return None;
        }

        let map_path = format!("{}.map", file.path);
        let (contents, mut map) = out.generate(file.path, file.path);
        map.file = file.path.to_string();
        let contents = update_source_mapping_url(&contents, &map_path);

        Some(RenderedFile {
            path: file.path.to_string(),
            contents,
            map: Some(map),
        })
    }
}

/// Points the file's `sourceMappingURL` comment at the new map, replacing
/// any existing one (stale maps are worse than no maps).
pub(crate) fn update_source_mapping_url(contents: &str, map_path: &str) -> String {
    let base_name = map_path.rsplit('/').next().unwrap_or(map_path);
    let comment = format!("//# sourceMappingURL={}", base_name);
    if let Some(re) = SOURCE_MAPPING_URL.as_ref() {
        if re.is_match(contents) {
            return re.replace(contents, comment.as_str()).into_owned();
        }
    }
    let mut updated = contents.to_string();
    if !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(&comment);
    updated.push('\n');
    updated
}

/// Per-class rendering helper shared with the declaration-file renderer:
/// whether the record produced output worth writing.
pub(crate) fn has_compiled_classes(compiled_file: &CompiledFile<'_>) -> bool {
    compiled_file
        .classes
        .iter()
        .any(|class: &ClassRecord<'_>| class.state == ClassState::Compiled)
}
