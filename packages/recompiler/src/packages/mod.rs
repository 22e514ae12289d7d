pub mod src;

pub use src::bundle::{BundleProgram, EntryPointBundle, ParsedFile, SourceFile};
pub use src::entry_point::EntryPointFormat;
pub use src::module_resolver::{BundleModuleResolver, ModuleResolver};
pub use src::transformer::{transform_all, RenderedFile, TransformResult, Transformer};

#[cfg(test)]
mod test;
