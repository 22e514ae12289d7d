// Module Resolver
//
// Resolves import specifiers to bundle files. Unresolved specifiers are not
// errors at this level; they only become fatal if rendering later needs the
// unresolved symbol.

use super::bundle::{BundleProgram, ParsedFile};

/// Collaborator interface: `(specifier, containing file)` to resolved path.
pub trait ModuleResolver {
    fn resolve(&self, specifier: &str, containing_path: &str) -> Option<String>;
}

/// Resolves specifiers against the in-memory file set of one bundle.
///
/// Relative specifiers are resolved against the containing file's directory,
/// trying the exact path and the usual `.js`/`.mjs`/`/index.js` suffixes.
/// Bare specifiers name sibling packages; they resolve only when the caller
/// chose to include that package's files in the bundle file set, and a
/// declaration reached through one keeps the specifier as its provenance.
pub struct BundleModuleResolver<'a, 'b> {
    program: &'b BundleProgram<'a>,
}

impl<'a, 'b> BundleModuleResolver<'a, 'b> {
    pub fn new(program: &'b BundleProgram<'a>) -> Self {
        Self { program }
    }

    pub fn resolve_file(&self, specifier: &str, containing_path: &str) -> Option<&'b ParsedFile<'a>> {
        let resolved = self.resolve(specifier, containing_path)?;
        self.program.file_by_path(&resolved)
    }
}

impl<'a, 'b> ModuleResolver for BundleModuleResolver<'a, 'b> {
    fn resolve(&self, specifier: &str, containing_path: &str) -> Option<String> {
        let joined = if specifier.starts_with('.') {
            let base = match containing_path.rfind('/') {
                Some(idx) => &containing_path[..idx],
                None => "",
            };
            join_and_normalize(base, specifier)
        } else {
            specifier.to_string()
        };

        let candidates = [
            joined.clone(),
            format!("{}.js", joined),
            format!("{}.mjs", joined),
            format!("{}/index.js", joined),
        ];
        candidates
            .into_iter()
            .find(|candidate| self.program.file_by_path(candidate).is_some())
    }
}

/// Joins a relative specifier onto a base directory and folds `.`/`..`
/// segments. Purely lexical; the bundle file set is the universe.
fn join_and_normalize(base: &str, specifier: &str) -> String {
    let mut segments: Vec<&str> = if base.is_empty() {
        Vec::new()
    } else {
        base.split('/').collect()
    };

    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
