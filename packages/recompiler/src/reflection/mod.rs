pub mod src;

pub use src::host::{
    ClassNode, ClassSymbol, CtorParameter, Declaration, DeclarationKind, DeclarationNode,
    Decorator, ExportMap, Import, KnownDeclaration, ReflectionHost, CORE_MODULE,
    RUNTIME_DEFINITION_FIELDS,
};
pub use src::util::{class_name, property_key_name, source_text};

#[cfg(test)]
mod test;
