use crate::StoreError;
use envpicker_schema::{compute_identity, EnvHash};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::path::PathBuf;

/// One registered environment, as stored in `registry.yml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvironmentEntry {
    pub hash: EnvHash,
    pub path: PathBuf,
    pub name: String,
    pub py_executable: PathBuf,
}

impl EnvironmentEntry {
    /// Build an entry whose hash is derived from `path`.
    ///
    /// `path` must already be normalized; see [`envpicker_schema::normalize_path`].
    pub fn for_path(path: PathBuf, py_executable: PathBuf, name: impl Into<String>) -> Self {
        Self {
            hash: compute_identity(&path),
            path,
            name: name.into(),
            py_executable,
        }
    }
}

/// Dependency manifest of one environment, stored as `<hash>.yaml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnvManifest {
    pub name: String,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

/// A registry entry together with its manifest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FullEnvironmentEntry {
    #[serde(flatten)]
    pub entry: EnvironmentEntry,
    #[serde(default)]
    pub envdata: Option<EnvManifest>,
}

impl FullEnvironmentEntry {
    pub fn new(entry: EnvironmentEntry, envdata: Option<EnvManifest>) -> Self {
        Self { entry, envdata }
    }

    pub fn dependencies(&self) -> &[String] {
        self.envdata
            .as_ref()
            .map_or(&[][..], |m| m.dependencies.as_slice())
    }

    pub fn into_entry(self) -> EnvironmentEntry {
        self.entry
    }
}

impl Deref for FullEnvironmentEntry {
    type Target = EnvironmentEntry;
    fn deref(&self) -> &EnvironmentEntry {
        &self.entry
    }
}

/// Check that an entry points at something real before it is persisted.
pub fn validate_entry(entry: &EnvironmentEntry) -> Result<(), StoreError> {
    if !entry.path.is_dir() {
        return Err(StoreError::PathNotFound(entry.path.clone()));
    }
    if !entry.py_executable.is_file() {
        return Err(StoreError::ExecutableNotFound(entry.py_executable.clone()));
    }
    if entry.name.is_empty() {
        return Err(StoreError::EmptyName);
    }
    if entry.hash.is_empty() {
        return Err(StoreError::EmptyHash);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn real_entry(dir: &std::path::Path) -> EnvironmentEntry {
        let env = dir.join("env");
        fs::create_dir_all(env.join("bin")).unwrap();
        let exe = env.join("bin").join("python");
        fs::write(&exe, "").unwrap();
        EnvironmentEntry::for_path(env, exe, "env")
    }

    #[test]
    fn for_path_derives_hash() {
        let e = EnvironmentEntry::for_path(
            PathBuf::from("/opt/envs/a"),
            PathBuf::from("/opt/envs/a/bin/python"),
            "a",
        );
        assert_eq!(e.hash, compute_identity(&e.path));
    }

    #[test]
    fn valid_entry_passes() {
        let dir = tempfile::tempdir().unwrap();
        validate_entry(&real_entry(dir.path())).unwrap();
    }

    #[test]
    fn missing_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = real_entry(dir.path());
        e.path = dir.path().join("gone");
        assert!(matches!(validate_entry(&e), Err(StoreError::PathNotFound(_))));
    }

    #[test]
    fn file_as_path_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = real_entry(dir.path());
        e.path = e.py_executable.clone();
        assert!(matches!(validate_entry(&e), Err(StoreError::PathNotFound(_))));
    }

    #[test]
    fn missing_executable_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = real_entry(dir.path());
        e.py_executable = e.path.join("bin").join("python3.99");
        assert!(matches!(
            validate_entry(&e),
            Err(StoreError::ExecutableNotFound(_))
        ));
    }

    #[test]
    fn empty_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = real_entry(dir.path());
        e.name.clear();
        assert!(matches!(validate_entry(&e), Err(StoreError::EmptyName)));
    }

    #[test]
    fn empty_hash_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut e = real_entry(dir.path());
        e.hash = EnvHash::default();
        assert!(matches!(validate_entry(&e), Err(StoreError::EmptyHash)));
    }

    #[test]
    fn registry_field_names_are_stable() {
        let e = EnvironmentEntry {
            hash: "h".into(),
            path: PathBuf::from("/p"),
            name: "n".to_owned(),
            py_executable: PathBuf::from("/p/bin/python"),
        };
        let yaml = serde_yaml::to_string(&e).unwrap();
        for key in ["hash:", "path:", "name:", "py_executable:"] {
            assert!(yaml.contains(key), "missing {key} in {yaml}");
        }
    }

    #[test]
    fn full_entry_flattens_and_reads_envdata() {
        let yaml = "hash: h\npath: /p\nname: n\npy_executable: /p/bin/python\nenvdata:\n  name: test\n  dependencies:\n    - numpy\n";
        let full: FullEnvironmentEntry = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(full.name, "n");
        assert_eq!(full.envdata.as_ref().unwrap().name, "test");
        assert_eq!(full.dependencies(), ["numpy"]);
    }

    #[test]
    fn manifest_without_dependencies_defaults_empty() {
        let m: EnvManifest = serde_yaml::from_str("name: bare\n").unwrap();
        assert!(m.dependencies.is_empty());
    }
}
