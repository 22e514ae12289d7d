// Entry Point Format
//
// The module-emission shapes a compiled package can be published in.

use std::fmt;

/// One of the supported module formats of a compiled entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryPointFormat {
    /// Direct `class` declarations with ESM imports/exports.
    Esm2015,
    /// ESM imports/exports, classes compiled to closure-wrapped
    /// constructor-function pairs.
    Esm5,
    /// `require(...)` / `exports.X = ...` modules.
    CommonJs,
    /// The UMD wrapper around a CommonJS-style factory function.
    Umd,
}

impl EntryPointFormat {
    /// `true` for formats using ESM import/export statements.
    pub fn is_esm(&self) -> bool {
        matches!(self, EntryPointFormat::Esm2015 | EntryPointFormat::Esm5)
    }
}

impl fmt::Display for EntryPointFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryPointFormat::Esm2015 => "esm2015",
            EntryPointFormat::Esm5 => "esm5",
            EntryPointFormat::CommonJs => "commonjs",
            EntryPointFormat::Umd => "umd",
        };
        write!(f, "{}", name)
    }
}
