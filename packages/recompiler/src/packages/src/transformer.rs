//! Transformer
//!
//! The per-bundle driver: parses the bundle, selects the format reflector,
//! layers the generic reflector over it, analyzes every class, and renders
//! code and declaration files. The outcome is a single success/failure
//! envelope; a failed bundle produces no rendered files at all.

use super::bundle::{BundleProgram, EntryPointBundle};
use super::entry_point::EntryPointFormat;
use crate::analysis::{DecorationAnalyzer, ResourceLoader};
use crate::diagnostics::Diagnostic;
use crate::host::{
    CommonJsReflectionHost, DelegatingReflectionHost, Esm2015ReflectionHost, Esm5ReflectionHost,
    UmdReflectionHost,
};
use crate::logging::Logger;
use crate::reflection::ReflectionHost;
use crate::rendering::{
    CommonJsRenderingFormatter, DtsRenderer, Esm5RenderingFormatter, EsmRenderingFormatter,
    Renderer, RenderingFormatter, UmdRenderingFormatter,
};
use oxc_allocator::Allocator;
use rayon::prelude::*;

pub use crate::rendering::RenderedFile;

/// The envelope handed back to the caller for one bundle.
#[derive(Debug)]
pub enum TransformResult {
    Success {
        diagnostics: Vec<Diagnostic>,
        rendered_files: Vec<RenderedFile>,
    },
    Failure {
        diagnostics: Vec<Diagnostic>,
    },
}

impl TransformResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TransformResult::Success { .. })
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            TransformResult::Success { diagnostics, .. } => diagnostics,
            TransformResult::Failure { diagnostics } => diagnostics,
        }
    }
}

pub struct Transformer<'t> {
    logger: &'t dyn Logger,
    resource_loader: &'t dyn ResourceLoader,
}

impl<'t> Transformer<'t> {
    pub fn new(logger: &'t dyn Logger, resource_loader: &'t dyn ResourceLoader) -> Self {
        Self {
            logger,
            resource_loader,
        }
    }

    /// Transforms one bundle synchronously to completion. All state created
    /// here (allocator, parsed programs, reflection caches) is owned by this
    /// call and dropped with it; nothing is shared with other bundles.
    pub fn transform(&self, bundle: &EntryPointBundle) -> TransformResult {
        self.logger.info(&format!(
            "recompiling {} ({}, {} files)",
            bundle.entry_path,
            bundle.format,
            bundle.src_files.len()
        ));

        let allocator = Allocator::default();
        let program = match BundleProgram::parse(&allocator, &bundle.src_files, bundle.format) {
            Ok(program) => program,
            Err(diagnostics) => return TransformResult::Failure { diagnostics },
        };

        let format_host: Box<dyn ReflectionHost<'_> + '_> = match bundle.format {
            EntryPointFormat::Esm2015 => Box::new(Esm2015ReflectionHost::new(&program)),
            EntryPointFormat::Esm5 => Box::new(Esm5ReflectionHost::new(&program)),
            EntryPointFormat::CommonJs => Box::new(CommonJsReflectionHost::new(&program)),
            EntryPointFormat::Umd => match UmdReflectionHost::new(&program) {
                Ok(host) => Box::new(host),
                Err(error) => {
                    self.logger.error(&error.to_string());
                    return TransformResult::Failure {
                        diagnostics: vec![error.to_diagnostic()],
                    };
                }
            },
        };
        let host = DelegatingReflectionHost::new(&program, format_host);

        let analyzer = DecorationAnalyzer::new(
            &program,
            &host,
            self.resource_loader,
            self.logger,
            bundle.is_core,
        );
        let analyses = match analyzer.analyze_program() {
            Ok(analyses) => analyses,
            Err(error) => {
                self.logger.error(&error.to_string());
                return TransformResult::Failure {
                    diagnostics: vec![error.to_diagnostic()],
                };
            }
        };

        let mut diagnostics = Vec::new();
        for compiled_file in &analyses {
            diagnostics.extend(compiled_file.diagnostics.iter().cloned());
            for class in &compiled_file.classes {
                diagnostics.extend(class.diagnostics.iter().cloned());
            }
        }

        let formatter: Box<dyn RenderingFormatter> = match bundle.format {
            EntryPointFormat::Esm2015 => Box::new(EsmRenderingFormatter),
            EntryPointFormat::Esm5 => Box::new(Esm5RenderingFormatter::new()),
            EntryPointFormat::CommonJs => Box::new(CommonJsRenderingFormatter),
            EntryPointFormat::Umd => Box::new(UmdRenderingFormatter),
        };
        let renderer = Renderer::new(formatter.as_ref(), self.logger);
        let mut rendered_files = renderer.render_program(&analyses);

        if !bundle.dts_files.is_empty() {
            let dts_program = match BundleProgram::parse_dts(&allocator, &bundle.dts_files) {
                Ok(program) => program,
                Err(mut parse_diagnostics) => {
                    diagnostics.append(&mut parse_diagnostics);
                    return TransformResult::Failure { diagnostics };
                }
            };
            let dts_renderer = DtsRenderer::new(self.logger, bundle.is_core);
            rendered_files.extend(dts_renderer.render_dts(&dts_program, &analyses));
        }

        self.logger.debug(&format!(
            "{}: {} files rendered, {} diagnostics",
            bundle.entry_path,
            rendered_files.len(),
            diagnostics.len()
        ));
        TransformResult::Success {
            diagnostics,
            rendered_files,
        }
    }
}

/// Processes independent bundles in parallel, one logical worker per bundle.
/// Bundles share nothing: each `transform` call owns its allocator, programs,
/// and caches outright.
pub fn transform_all(
    transformer: &Transformer<'_>,
    bundles: &[EntryPointBundle],
) -> Vec<TransformResult> {
    bundles
        .par_iter()
        .map(|bundle| transformer.transform(bundle))
        .collect()
}
