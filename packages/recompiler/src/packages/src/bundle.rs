//! Entry Point Bundle
//!
//! One package in one format, together with its parsed programs. A bundle is
//! created once per (package, format) task and owns every cache used while
//! transforming it; bundles are never shared between concurrent workers.

use super::entry_point::EntryPointFormat;
use crate::diagnostics::{Diagnostic, ErrorCode, SourceSpan};
use oxc_allocator::Allocator;
use oxc_ast::ast;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// An in-memory file handed to the recompiler. The core never touches disk;
/// reading inputs and persisting outputs belong to the caller.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: String,
    pub contents: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// The descriptor for one recompilation task.
#[derive(Debug, Clone)]
pub struct EntryPointBundle {
    pub format: EntryPointFormat,
    /// `true` when the bundle being compiled is the framework core package
    /// itself; definition helpers are then referenced without an import.
    pub is_core: bool,
    /// Path of the entry file within `src_files`.
    pub entry_path: String,
    pub src_files: Vec<SourceFile>,
    /// Paired type-declaration files, when the package ships them.
    pub dts_files: Vec<SourceFile>,
}

impl EntryPointBundle {
    pub fn new(format: EntryPointFormat, entry_path: impl Into<String>) -> Self {
        Self {
            format,
            is_core: false,
            entry_path: entry_path.into(),
            src_files: Vec::new(),
            dts_files: Vec::new(),
        }
    }

    pub fn with_source(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.src_files.push(SourceFile::new(path, contents));
        self
    }

    pub fn with_dts(mut self, path: impl Into<String>, contents: impl Into<String>) -> Self {
        self.dts_files.push(SourceFile::new(path, contents));
        self
    }

    pub fn with_is_core(mut self, is_core: bool) -> Self {
        self.is_core = is_core;
        self
    }
}

/// A parsed bundle file. The program borrows from the bundle's allocator and
/// from the file contents owned by the `EntryPointBundle`.
pub struct ParsedFile<'a> {
    pub path: &'a str,
    pub source: &'a str,
    pub program: ast::Program<'a>,
}

/// All files of one bundle side (code or declarations), parsed.
pub struct BundleProgram<'a> {
    pub files: Vec<ParsedFile<'a>>,
}

impl<'a> BundleProgram<'a> {
    /// Parse every file with the source type implied by the bundle format.
    /// Parse failures abort the bundle: nothing useful can be reflected from
    /// a file the parser rejected.
    pub fn parse(
        allocator: &'a Allocator,
        files: &'a [SourceFile],
        format: EntryPointFormat,
    ) -> Result<Self, Vec<Diagnostic>> {
        let source_type = if format.is_esm() {
            SourceType::mjs()
        } else {
            SourceType::default()
        };
        Self::parse_with_source_type(allocator, files, |_| source_type)
    }

    /// Parse type-declaration files (TypeScript syntax).
    pub fn parse_dts(
        allocator: &'a Allocator,
        files: &'a [SourceFile],
    ) -> Result<Self, Vec<Diagnostic>> {
        Self::parse_with_source_type(allocator, files, |file| {
            SourceType::from_path(&file.path).unwrap_or_else(|_| SourceType::ts())
        })
    }

    fn parse_with_source_type(
        allocator: &'a Allocator,
        files: &'a [SourceFile],
        source_type_of: impl Fn(&SourceFile) -> SourceType,
    ) -> Result<Self, Vec<Diagnostic>> {
        let mut parsed = Vec::with_capacity(files.len());
        let mut diagnostics = Vec::new();

        for file in files {
            let source_type = source_type_of(file);
            let ret = Parser::new(allocator, &file.contents, source_type).parse();
            if !ret.errors.is_empty() {
                for error in &ret.errors {
                    diagnostics.push(
                        Diagnostic::error(
                            ErrorCode::ParseFailure,
                            format!("{}: {}", file.path, error),
                        )
                        .with_span(SourceSpan::from_offsets(
                            file.path.clone(),
                            &file.contents,
                            0,
                            0,
                        )),
                    );
                }
                continue;
            }
            parsed.push(ParsedFile {
                path: &file.path,
                source: &file.contents,
                program: ret.program,
            });
        }

        if diagnostics.is_empty() {
            Ok(Self { files: parsed })
        } else {
            Err(diagnostics)
        }
    }

    pub fn file_by_path(&self, path: &str) -> Option<&ParsedFile<'a>> {
        self.files.iter().find(|file| file.path == path)
    }
}
