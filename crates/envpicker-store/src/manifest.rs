use crate::entry::EnvManifest;
use crate::layout::RegistryLayout;
use crate::{write_atomic, StoreError};
use std::fs;
use std::path::PathBuf;

/// Per-environment dependency manifests, one YAML file per identity hash.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    layout: RegistryLayout,
}

impl ManifestStore {
    pub fn new(layout: RegistryLayout) -> Self {
        Self { layout }
    }

    pub fn path_for(&self, hash: &str) -> PathBuf {
        self.layout.manifest_path(hash)
    }

    pub fn exists(&self, hash: &str) -> bool {
        self.path_for(hash).is_file()
    }

    pub fn read(&self, hash: &str) -> Result<Option<EnvManifest>, StoreError> {
        let path = self.path_for(hash);
        if !path.is_file() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_yaml::from_str(&content)?))
    }

    /// Always overwrites.
    pub fn write(&self, hash: &str, manifest: &EnvManifest) -> Result<(), StoreError> {
        let path = self.path_for(hash);
        let content = serde_yaml::to_string(manifest)?;
        write_atomic(&path, content.as_bytes())?;
        tracing::debug!(
            "wrote manifest for '{}' ({} dependencies) to {}",
            manifest.name,
            manifest.dependencies.len(),
            path.display()
        );
        Ok(())
    }
}
