use crate::document::YamlDocument;
use crate::entry::{validate_entry, EnvironmentEntry};
use crate::layout::RegistryLayout;
use crate::StoreError;
use std::path::Path;

/// Key under which the entry list lives in `registry.yml`.
pub const ENVIRONMENTS_KEY: &str = "environments";

/// The persisted list of registered environments.
///
/// `save` replaces the whole list. There is no locking: two processes doing
/// load-modify-save on the same root can lose each other's update.
#[derive(Debug, Clone)]
pub struct RegistryStore {
    document: YamlDocument,
}

impl RegistryStore {
    pub fn new(layout: &RegistryLayout) -> Self {
        Self {
            document: YamlDocument::new(layout.registry_file()),
        }
    }

    pub fn load(&self) -> Result<Vec<EnvironmentEntry>, StoreError> {
        Ok(self
            .document
            .get::<Vec<EnvironmentEntry>>(ENVIRONMENTS_KEY)?
            .unwrap_or_default())
    }

    /// Validate every entry, then persist the list. One bad entry aborts the
    /// write and leaves the previous file in place.
    pub fn save(&self, entries: &[EnvironmentEntry]) -> Result<(), StoreError> {
        for entry in entries {
            validate_entry(entry)?;
        }
        tracing::debug!(
            "writing {} entries to {}",
            entries.len(),
            self.document.path().display()
        );
        self.document.set(ENVIRONMENTS_KEY, entries)
    }

    /// Exact match on the stored path; `path` must be normalized by the caller.
    pub fn find_by_path(&self, path: &Path) -> Result<Option<EnvironmentEntry>, StoreError> {
        Ok(self.load()?.into_iter().find(|e| e.path == path))
    }
}
