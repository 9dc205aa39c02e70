use crate::StoreError;
use std::fs;
use std::path::{Path, PathBuf};

pub const REGISTRY_FILE: &str = "registry.yml";
pub const MANIFEST_EXTENSION: &str = "yaml";

/// Directory layout of a registry root.
///
/// ```text
/// <root>/registry.yml      entry list
/// <root>/<hash>.yaml       one dependency manifest per entry
/// ```
#[derive(Debug, Clone)]
pub struct RegistryLayout {
    root: PathBuf,
}

impl RegistryLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[inline]
    pub fn registry_file(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    #[inline]
    pub fn manifest_path(&self, hash: &str) -> PathBuf {
        self.root.join(format!("{hash}.{MANIFEST_EXTENSION}"))
    }

    /// Create the root if needed. A root that exists but is not a directory is an error.
    pub fn initialize(&self) -> Result<(), StoreError> {
        if self.root.exists() && !self.root.is_dir() {
            return Err(StoreError::NotADirectory(self.root.clone()));
        }
        fs::create_dir_all(&self.root)?;
        Ok(())
    }
}
