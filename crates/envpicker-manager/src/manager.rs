use crate::registry::EnvRegistry;
use crate::ManagerError;
use envpicker_store::{EnvManifest, EnvironmentEntry, FullEnvironmentEntry};
use std::path::{Path, PathBuf};

/// An environment tool (conda, venv, ...) that can enumerate environments and
/// report what is installed in them.
///
/// Implementors supply discovery and dependency listing. Registration itself
/// lives on [`EnvManagerExt`], which every manager gets and none can override.
pub trait EnvManager: Send + Sync {
    /// Short identifier used in preference lists.
    fn name(&self) -> &str;

    /// Whether the underlying tool can be used on this machine. Never errors.
    fn is_available(&self) -> bool;

    fn registry(&self) -> &EnvRegistry;

    /// Environment directories this tool knows about.
    fn environment_paths(&self) -> Result<Vec<PathBuf>, ManagerError>;

    /// Dependency specifiers installed in `entry`'s environment.
    fn get_dependencies(&self, entry: &EnvironmentEntry) -> Result<Vec<String>, ManagerError>;

    /// Register every discovered environment not yet in the registry.
    ///
    /// Environments that fail to register are logged and skipped. Returns the
    /// newly registered entries.
    fn register_all(&self) -> Result<Vec<FullEnvironmentEntry>, ManagerError> {
        let registry = self.registry();
        registry.in_scope(|| -> Result<Vec<FullEnvironmentEntry>, ManagerError> {
            let mut registered = Vec::new();
            for path in self.environment_paths()? {
                if registry.find_entry(&path)?.is_some() {
                    tracing::debug!("{} already registered", path.display());
                    continue;
                }
                match registry.register(self, &path, None, None, false) {
                    Ok(full) => registered.push(full),
                    Err(e) => tracing::warn!("skipping {}: {e}", path.display()),
                }
            }
            tracing::info!(
                "{}: registered {} new environment(s)",
                self.name(),
                registered.len()
            );
            Ok(registered)
        })
    }
}

/// Registration operations shared by every [`EnvManager`].
pub trait EnvManagerExt: EnvManager {
    /// See [`EnvRegistry::register`].
    fn register(
        &self,
        path: &Path,
        executable: Option<&Path>,
        name: Option<&str>,
        force: bool,
    ) -> Result<FullEnvironmentEntry, ManagerError> {
        self.registry().register(self, path, executable, name, force)
    }

    /// See [`EnvRegistry::add`].
    fn add(
        &self,
        path: &Path,
        executable: &Path,
        name: Option<&str>,
        force: bool,
    ) -> Result<FullEnvironmentEntry, ManagerError> {
        self.registry().add(self, path, executable, name, force)
    }

    fn materialize_manifest(&self, entry: &EnvironmentEntry) -> Result<EnvManifest, ManagerError> {
        self.registry().materialize_manifest(self, entry)
    }

    fn ensure_manifest(&self, entry: &EnvironmentEntry) -> Result<EnvManifest, ManagerError> {
        self.registry().ensure_manifest(self, entry)
    }

    fn lookup_by_path(&self, path: &Path) -> Result<Option<FullEnvironmentEntry>, ManagerError> {
        self.registry().lookup_by_path(self, path)
    }

    fn entries(&self) -> Result<Vec<EnvironmentEntry>, ManagerError> {
        self.registry().entries()
    }
}

impl<T: EnvManager + ?Sized> EnvManagerExt for T {}
