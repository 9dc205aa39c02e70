use crate::StoreError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable naming the registry root.
pub const ROOT_ENV_VAR: &str = "ENV_MANAGER_PATH";
/// Directory under `$HOME` used when nothing else is configured.
pub const DEFAULT_DIR_NAME: &str = ".env_manager";

/// Pick the registry root: `explicit`, then `$ENV_MANAGER_PATH`, then
/// `$HOME/.env_manager`. Empty values count as unset.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf, StoreError> {
    resolve_root_from(
        explicit,
        std::env::var_os(ROOT_ENV_VAR),
        std::env::var_os("HOME"),
    )
}

fn resolve_root_from(
    explicit: Option<&Path>,
    env_root: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf, StoreError> {
    if let Some(path) = explicit.filter(|p| !p.as_os_str().is_empty()) {
        return Ok(path.to_path_buf());
    }
    if let Some(root) = env_root.filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(root));
    }
    match home.filter(|v| !v.is_empty()) {
        Some(home) => Ok(PathBuf::from(home).join(DEFAULT_DIR_NAME)),
        None => Err(StoreError::Config(format!(
            "HOME not set; pass a root directory or set {ROOT_ENV_VAR}"
        ))),
    }
}
