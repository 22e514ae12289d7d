//! Declaration-File Renderer
//!
//! The narrower, parallel pipeline over type-declaration files: for every
//! class whose code counterpart was compiled, the matching `.d.ts` class
//! gains the static definition-field signatures, with any newly referenced
//! types imported through the same import-management scheme the code
//! renderer uses. Declaration files untouched by analysis produce no
//! output.

use super::formatter::end_of_imports;
use super::import_manager::ImportManager;
use super::magic_string::MagicString;
use super::renderer::{has_compiled_classes, RenderedFile};
use crate::analysis::{ClassRecord, ClassState, CompiledFile};
use crate::host::src::utils::direct_classes;
use crate::logging::Logger;
use crate::packages::BundleProgram;
use crate::reflection::{ClassNode, CORE_MODULE};
use std::collections::HashMap;

pub struct DtsRenderer<'e> {
    logger: &'e dyn Logger,
    is_core: bool,
}

impl<'e> DtsRenderer<'e> {
    pub fn new(logger: &'e dyn Logger, is_core: bool) -> Self {
        Self { logger, is_core }
    }

    pub fn render_dts(
        &self,
        dts: &BundleProgram<'_>,
        analyses: &[CompiledFile<'_>],
    ) -> Vec<RenderedFile> {
        let mut by_name: HashMap<&str, &ClassRecord<'_>> = HashMap::new();
        for compiled_file in analyses {
            if !has_compiled_classes(compiled_file) {
                continue;
            }
            for class in &compiled_file.classes {
                if class.state == ClassState::Compiled {
                    by_name.insert(class.symbol.name.as_str(), class);
                }
            }
        }
        if by_name.is_empty() {
            return Vec::new();
        }

        let mut rendered = Vec::new();
        for file in &dts.files {
            let mut out = MagicString::new(file.source);
            let mut imports = ImportManager::new(self.is_core);

            for symbol in direct_classes(&file.program.body) {
                let Some(record) = by_name.get(symbol.name.as_str()) else {
                    continue;
                };
                let Some(results) = &record.compiled else {
                    continue;
                };
                let ClassNode::Class(class) = symbol.implementation else {
                    continue;
                };

                let mut members = String::new();
                for result in results {
                    let type_text = match imports.prefix_for(CORE_MODULE) {
                        Some(prefix) => format!("{}.{}", prefix, result.type_desc),
                        None => result.type_desc.clone(),
                    };
                    members.push_str(&format!("    static {}: {};\n", result.name, type_text));
                }

                // Splice the members in just before the class body closes.
                let pos = (class.body.span.end as usize).saturating_sub(1);
                out.insert(pos, members, Some(&symbol.name));
            }

            if !out.has_changed() {
                continue;
            }

            let import_pos = end_of_imports(file);
            let mut import_text = String::new();
            for (module, prefix) in imports.finalize() {
                if import_pos == 0 {
                    import_text.push_str(&format!("import * as {} from '{}';\n", prefix, module));
                } else {
                    import_text.push_str(&format!("\nimport * as {} from '{}';", prefix, module));
                }
            }
            if !import_text.is_empty() {
                out.insert(import_pos, import_text, None);
            }

            self.logger
                .debug(&format!("{}: updating type declarations", file.path));
            // Declaration files carry no source maps of their own.
            let (contents, _) = out.generate(file.path, file.path);
            rendered.push(RenderedFile {
                path: file.path.to_string(),
                contents,
                map: None,
            });
        }
        rendered
    }
}
