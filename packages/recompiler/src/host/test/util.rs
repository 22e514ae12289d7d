// Shared fixtures for the host specs.

use crate::packages::{BundleProgram, EntryPointFormat, SourceFile};
use oxc_allocator::Allocator;

pub fn source(path: &str, contents: &str) -> SourceFile {
    SourceFile::new(path, contents)
}

pub fn parse<'a>(
    allocator: &'a Allocator,
    files: &'a [SourceFile],
    format: EntryPointFormat,
) -> BundleProgram<'a> {
    match BundleProgram::parse(allocator, files, format) {
        Ok(program) => program,
        Err(diagnostics) => panic!("fixture failed to parse: {:?}", diagnostics),
    }
}
