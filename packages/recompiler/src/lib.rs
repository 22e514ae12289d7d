#![deny(clippy::all)]

/**
 * Angular Recompiler - Rust Implementation
 *
 * Rewrites already-compiled, decorator-annotated JavaScript bundles in place
 * with runtime definition fields, keeping the original module format and the
 * paired .d.ts files in sync.
 */
pub mod analysis;
pub mod diagnostics;
pub mod evaluator;
pub mod host;
pub mod logging;
pub mod packages;
pub mod reflection;
pub mod rendering;
pub mod sourcemaps;

/// Crate version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
