use crate::{write_atomic, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// A YAML mapping on disk, read and written one key at a time.
///
/// Every `set` rewrites the whole file through a temp file and rename, so a
/// reader sees either the old document or the new one. Keys this crate does
/// not know about are carried over untouched.
#[derive(Debug, Clone)]
pub struct YamlDocument {
    path: PathBuf,
}

impl YamlDocument {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_mapping(&self) -> Result<Mapping, StoreError> {
        if !self.path.exists() {
            return Ok(Mapping::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Mapping::new());
        }
        match serde_yaml::from_str::<Value>(&content)? {
            Value::Mapping(mapping) => Ok(mapping),
            Value::Null => Ok(Mapping::new()),
            _ => Err(StoreError::CorruptDocument {
                path: self.path.clone(),
            }),
        }
    }

    /// `None` when the file, the key, or the key's value is absent.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let mapping = self.read_mapping()?;
        match mapping.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_yaml::from_value(value.clone())?)),
        }
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let mut mapping = self.read_mapping()?;
        mapping.insert(Value::from(key), serde_yaml::to_value(value)?);
        let content = serde_yaml::to_string(&mapping)?;
        write_atomic(&self.path, content.as_bytes())
    }
}
