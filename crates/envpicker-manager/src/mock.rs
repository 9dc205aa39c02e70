use crate::manager::EnvManager;
use crate::registry::EnvRegistry;
use crate::ManagerError;
use envpicker_store::EnvironmentEntry;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Dependencies reported when none are configured.
pub const MOCK_DEPENDENCIES: &[&str] = &["python=3.11.4", "pip=24.0", "numpy==1.26.4"];

/// In-memory manager with scripted answers. Talks to no external tool.
#[derive(Debug)]
pub struct MockManager {
    registry: EnvRegistry,
    name: &'static str,
    available: bool,
    environments: Vec<PathBuf>,
    dependencies: Vec<String>,
    exports: AtomicUsize,
}

impl MockManager {
    pub fn new(registry: EnvRegistry) -> Self {
        Self {
            registry,
            name: "mock",
            available: true,
            environments: Vec::new(),
            dependencies: MOCK_DEPENDENCIES.iter().map(|d| (*d).to_owned()).collect(),
            exports: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    #[must_use]
    pub fn with_available(mut self, available: bool) -> Self {
        self.available = available;
        self
    }

    #[must_use]
    pub fn with_environments(mut self, environments: Vec<PathBuf>) -> Self {
        self.environments = environments;
        self
    }

    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// How many times dependencies have been requested.
    pub fn export_count(&self) -> usize {
        self.exports.load(Ordering::SeqCst)
    }
}

impl EnvManager for MockManager {
    fn name(&self) -> &str {
        self.name
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn registry(&self) -> &EnvRegistry {
        &self.registry
    }

    fn environment_paths(&self) -> Result<Vec<PathBuf>, ManagerError> {
        Ok(self.environments.clone())
    }

    fn get_dependencies(&self, entry: &EnvironmentEntry) -> Result<Vec<String>, ManagerError> {
        self.exports.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("mock export for '{}'", entry.name);
        Ok(self.dependencies.clone())
    }
}
