// Resource Loader
//
// Collaborator boundary for external template and style resources. All
// resource loads happen during the Preanalyze step, before any class is
// analyzed; a failed load poisons only the class that needed the resource.

/// Loads the text of an external template or style resource.
///
/// Implementations must be shareable across parallel bundle workers.
pub trait ResourceLoader: Send + Sync {
    /// Resolve and load `url` relative to `containing_file`, returning the
    /// resource text or a human-readable failure reason.
    fn load(&self, url: &str, containing_file: &str) -> Result<String, String>;
}

/// A loader for bundles known not to reference external resources.
pub struct NoopResourceLoader;

impl ResourceLoader for NoopResourceLoader {
    fn load(&self, url: &str, _containing_file: &str) -> Result<String, String> {
        Err(format!("no resource loader available to load '{}'", url))
    }
}
