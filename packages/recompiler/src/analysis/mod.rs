pub mod src;

pub use src::api::{
    ClassMetadata, ClassRecord, ClassState, CompileResult, CompiledFile, CtorDep, DecoratorKind,
    TemplateSource,
};
pub use src::decoration_analyzer::DecorationAnalyzer;
pub use src::resource_loader::{NoopResourceLoader, ResourceLoader};

#[cfg(test)]
mod test;
