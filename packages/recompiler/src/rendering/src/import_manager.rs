// Import Manager
//
// Allocates local namespace prefixes for modules referenced by generated
// code. One manager serves one output file; the renderer and the
// declaration-file renderer both use it so that generated references and
// generated imports always agree.

use crate::reflection::CORE_MODULE;
use indexmap::IndexMap;

pub struct ImportManager {
    /// Core-library bundles reference core helpers bare instead of importing
    /// the package they are part of.
    is_core: bool,
    prefixes: IndexMap<String, String>,
    next_index: usize,
}

impl ImportManager {
    pub fn new(is_core: bool) -> Self {
        Self {
            is_core,
            prefixes: IndexMap::new(),
            next_index: 0,
        }
    }

    /// The local prefix for a module, allocating one on first use. `None`
    /// means references to the module are emitted without qualification.
    pub fn prefix_for(&mut self, module: &str) -> Option<String> {
        if self.is_core && module == CORE_MODULE {
            return None;
        }
        if let Some(prefix) = self.prefixes.get(module) {
            return Some(prefix.clone());
        }
        let prefix = format!("i{}", self.next_index);
        self.next_index += 1;
        self.prefixes.insert(module.to_string(), prefix.clone());
        Some(prefix)
    }

    /// A reference to `symbol` exported by `module`, qualified as needed.
    pub fn qualified(&mut self, module: &str, symbol: &str) -> String {
        match self.prefix_for(module) {
            Some(prefix) => format!("{}.{}", prefix, symbol),
            None => symbol.to_string(),
        }
    }

    /// The `(module, prefix)` pairs the formatter must emit imports for.
    pub fn finalize(&self) -> Vec<(String, String)> {
        self.prefixes
            .iter()
            .map(|(module, prefix)| (module.clone(), prefix.clone()))
            .collect()
    }
}
