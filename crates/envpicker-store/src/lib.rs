//! Registry storage for envpicker.
//!
//! This crate provides the persistence layer: `RegistryLayout` for the root
//! directory structure, `YamlDocument` as the key-value file underneath the
//! registry, `RegistryStore` for the validated entry list, `ManifestStore` for
//! the per-environment dependency manifests, and `resolve_root` for picking
//! the root directory from arguments and the environment.

pub mod config;
pub mod document;
pub mod entry;
pub mod layout;
pub mod manifest;
pub mod registry;

pub use config::{resolve_root, DEFAULT_DIR_NAME, ROOT_ENV_VAR};
pub use document::YamlDocument;
pub use entry::{validate_entry, EnvManifest, EnvironmentEntry, FullEnvironmentEntry};
pub use layout::{RegistryLayout, MANIFEST_EXTENSION, REGISTRY_FILE};
pub use manifest::ManifestStore;
pub use registry::{RegistryStore, ENVIRONMENTS_KEY};

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Fsync a directory so that a preceding `rename()` survives a crash.
pub(crate) fn fsync_dir(dir: &Path) -> Result<(), std::io::Error> {
    let f = std::fs::File::open(dir)?;
    f.sync_all()
}

/// Replace `dest` with `content` via a synced temp file in the same directory.
pub(crate) fn write_atomic(dest: &Path, content: &[u8]) -> Result<(), StoreError> {
    let dir = dest
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.as_file().sync_all()?;
    tmp.persist(dest).map_err(|e| StoreError::Io(e.error))?;
    fsync_dir(dir)?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("document '{path}' is not a mapping")]
    CorruptDocument { path: PathBuf },
    #[error("environment path does not exist or is not a directory: {0}")]
    PathNotFound(PathBuf),
    #[error("python executable does not exist: {0}")]
    ExecutableNotFound(PathBuf),
    #[error("environment name cannot be empty")]
    EmptyName,
    #[error("environment hash cannot be empty")]
    EmptyHash,
    #[error("registry root is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display_path_not_found() {
        let e = StoreError::PathNotFound(PathBuf::from("/no/such/env"));
        assert!(e.to_string().contains("/no/such/env"));
    }

    #[test]
    fn store_error_display_executable_not_found() {
        let e = StoreError::ExecutableNotFound(PathBuf::from("/env/bin/python"));
        assert!(e.to_string().contains("/env/bin/python"));
    }

    #[test]
    fn store_error_display_not_a_directory() {
        let e = StoreError::NotADirectory(PathBuf::from("/tmp/file"));
        assert!(e.to_string().contains("not a directory"));
    }

    #[test]
    fn write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("doc.yml");
        write_atomic(&dest, b"first").unwrap();
        write_atomic(&dest, b"second").unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "second");
        let leftovers = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1, "temp files must not be left behind");
    }
}
