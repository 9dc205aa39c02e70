use crate::manager::EnvManager;
use crate::process::capture_stdout;
use crate::ManagerError;
use envpicker_schema::normalize_path;
use envpicker_store::{
    resolve_root, EnvManifest, EnvironmentEntry, FullEnvironmentEntry, ManifestStore,
    RegistryLayout, RegistryStore, StoreError,
};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, Dispatch};

/// Conventional interpreter location inside an environment directory.
pub fn default_executable(env_path: &Path) -> Result<PathBuf, ManagerError> {
    if cfg!(windows) {
        Ok(env_path.join("python.exe"))
    } else if cfg!(unix) {
        Ok(env_path.join("bin").join("python"))
    } else {
        Err(ManagerError::UnsupportedPlatform(
            std::env::consts::OS.to_owned(),
        ))
    }
}

fn default_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |n| n.to_string_lossy().into_owned(),
    )
}

/// The interpreter must start and answer `--version`.
fn check_executable(executable: &Path) -> Result<(), ManagerError> {
    let mut command = Command::new(executable);
    command.arg("--version");
    let output = capture_stdout(command).map_err(|e| ManagerError::InvalidExecutable {
        path: executable.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!("{} reports {}", executable.display(), output.trim());
    Ok(())
}

/// Shared registration state: the root directory, the entry list, the
/// manifests, and the log sink every operation reports to.
///
/// Every manager built against the same registry reads and writes the same
/// files. Saves are whole-file replacements with no locking, so concurrent
/// writers on one root can lose updates.
#[derive(Debug, Clone)]
pub struct EnvRegistry {
    layout: RegistryLayout,
    store: RegistryStore,
    manifests: ManifestStore,
    dispatch: Dispatch,
}

impl EnvRegistry {
    /// Open the registry at `root`, or at the configured default location.
    pub fn open(root: Option<&Path>) -> Result<Self, ManagerError> {
        let root = resolve_root(root)?;
        Self::at(root)
    }

    /// Open (creating if needed) the registry rooted at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Result<Self, ManagerError> {
        let layout = RegistryLayout::new(root);
        layout.initialize()?;
        Ok(Self {
            store: RegistryStore::new(&layout),
            manifests: ManifestStore::new(layout.clone()),
            layout,
            dispatch: Dispatch::none(),
        })
    }

    /// Route this registry's log output to `dispatch` instead of discarding it.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self.in_scope(|| debug!("registry root: {}", self.root().display()));
        self
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn manifests(&self) -> &ManifestStore {
        &self.manifests
    }

    /// Run `f` with this registry's log sink installed.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    pub fn entries(&self) -> Result<Vec<EnvironmentEntry>, ManagerError> {
        self.in_scope(|| -> Result<Vec<EnvironmentEntry>, ManagerError> {
            Ok(self.store.load()?)
        })
    }

    /// Stored entry for `path` without touching its manifest.
    pub fn find_entry(&self, path: &Path) -> Result<Option<EnvironmentEntry>, ManagerError> {
        self.in_scope(|| -> Result<Option<EnvironmentEntry>, ManagerError> {
            let path = normalize_path(path)?;
            Ok(self.store.find_by_path(&path)?)
        })
    }

    /// Validate the environment directory and interpreter, then `add` it.
    pub fn register<M: EnvManager + ?Sized>(
        &self,
        manager: &M,
        path: &Path,
        executable: Option<&Path>,
        name: Option<&str>,
        force: bool,
    ) -> Result<FullEnvironmentEntry, ManagerError> {
        self.in_scope(|| -> Result<FullEnvironmentEntry, ManagerError> {
            info!("registering {} with {}", path.display(), manager.name());
            if !path.is_dir() {
                return Err(StoreError::PathNotFound(path.to_path_buf()).into());
            }
            let path = normalize_path(path)?;
            // Probe the same file `add` will store, not a PATH lookup of a bare name.
            let executable = match executable {
                Some(exe) => normalize_path(exe)?,
                None => default_executable(&path)?,
            };
            check_executable(&executable)?;
            self.add(manager, &path, &executable, name, force)
        })
    }

    /// Record an entry without probing the interpreter, then write its manifest.
    ///
    /// A path already present is `AlreadyRegistered` unless `force`, in which
    /// case the entry is replaced where it stands.
    pub fn add<M: EnvManager + ?Sized>(
        &self,
        manager: &M,
        path: &Path,
        executable: &Path,
        name: Option<&str>,
        force: bool,
    ) -> Result<FullEnvironmentEntry, ManagerError> {
        self.in_scope(|| -> Result<FullEnvironmentEntry, ManagerError> {
            let path = normalize_path(path)?;
            let executable = normalize_path(executable)?;
            let name = name.map_or_else(|| default_name(&path), ToOwned::to_owned);
            let entry = EnvironmentEntry::for_path(path.clone(), executable, name);

            let mut entries = self.store.load()?;
            match entries.iter().position(|e| e.path == path) {
                Some(_) if !force => return Err(ManagerError::AlreadyRegistered(path)),
                Some(idx) => {
                    debug!("replacing existing entry for {}", path.display());
                    entries[idx] = entry.clone();
                }
                None => entries.push(entry.clone()),
            }
            self.store.save(&entries)?;
            info!("registered '{}' ({})", entry.name, entry.hash);

            let manifest = self.materialize_manifest(manager, &entry)?;
            Ok(FullEnvironmentEntry::new(entry, Some(manifest)))
        })
    }

    /// Ask `manager` for the dependency list and overwrite the manifest file.
    pub fn materialize_manifest<M: EnvManager + ?Sized>(
        &self,
        manager: &M,
        entry: &EnvironmentEntry,
    ) -> Result<EnvManifest, ManagerError> {
        self.in_scope(|| -> Result<EnvManifest, ManagerError> {
            debug!("materializing manifest for '{}'", entry.name);
            let dependencies = manager.get_dependencies(entry)?;
            let manifest = EnvManifest {
                name: entry.name.clone(),
                dependencies,
            };
            self.manifests.write(&entry.hash, &manifest)?;
            Ok(manifest)
        })
    }

    /// Stored manifest for `entry`, materializing it first if the file is gone.
    pub fn ensure_manifest<M: EnvManager + ?Sized>(
        &self,
        manager: &M,
        entry: &EnvironmentEntry,
    ) -> Result<EnvManifest, ManagerError> {
        self.in_scope(|| -> Result<EnvManifest, ManagerError> {
            match self.manifests.read(&entry.hash)? {
                Some(manifest) => Ok(manifest),
                None => {
                    debug!("manifest for '{}' missing, recreating", entry.name);
                    self.materialize_manifest(manager, entry)
                }
            }
        })
    }

    pub fn lookup_by_path<M: EnvManager + ?Sized>(
        &self,
        manager: &M,
        path: &Path,
    ) -> Result<Option<FullEnvironmentEntry>, ManagerError> {
        self.in_scope(|| -> Result<Option<FullEnvironmentEntry>, ManagerError> {
            let Some(entry) = self.find_entry(path)? else {
                return Ok(None);
            };
            let manifest = self.ensure_manifest(manager, &entry)?;
            Ok(Some(FullEnvironmentEntry::new(entry, Some(manifest))))
        })
    }
}
