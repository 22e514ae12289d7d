pub mod src;

pub use src::diagnostic::{has_errors, Diagnostic, DiagnosticCategory, ErrorCode, SourceSpan};
pub use src::error::{ErrorScope, FatalLinkerError};

#[cfg(test)]
mod test;
