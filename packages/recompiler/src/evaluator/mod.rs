pub mod src;

pub use src::interpreter::PartialEvaluator;
pub use src::result::{ResolvedReference, ResolvedValue};

#[cfg(test)]
mod test;
