use crate::manager::EnvManager;
use crate::process::{capture_stdout, probe};
use crate::registry::EnvRegistry;
use crate::ManagerError;
use envpicker_store::EnvironmentEntry;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Directory holding virtual environments, as used by virtualenvwrapper.
pub const SEARCH_DIR_ENV_VAR: &str = "WORKON_HOME";
/// Marker file every venv root contains.
pub const VENV_MARKER: &str = "pyvenv.cfg";

/// Keep requirement lines from `pip freeze` output.
///
/// Blank lines, comments, and option lines (`-e`, `--index-url`, ...) are dropped.
pub fn parse_freeze_output(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .map(ToOwned::to_owned)
        .collect()
}

fn default_search_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(SEARCH_DIR_ENV_VAR).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(".virtualenvs"))
}

fn scan_venvs(dir: &Path) -> Result<Vec<PathBuf>, ManagerError> {
    if !dir.is_dir() {
        tracing::debug!("venv search dir {} does not exist", dir.display());
        return Ok(Vec::new());
    }
    let mut found = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.join(VENV_MARKER).is_file() {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Standard-library `venv` environments, listed from a search directory and
/// inspected with `pip freeze`.
#[derive(Debug, Clone)]
pub struct VenvManager {
    registry: EnvRegistry,
    search_dir: Option<PathBuf>,
    python: PathBuf,
}

impl VenvManager {
    pub fn new(registry: EnvRegistry) -> Self {
        Self {
            registry,
            search_dir: default_search_dir(),
            python: PathBuf::from("python3"),
        }
    }

    #[must_use]
    pub fn with_search_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(dir.into());
        self
    }

    /// Interpreter used for the availability probe.
    #[must_use]
    pub fn with_python(mut self, python: impl Into<PathBuf>) -> Self {
        self.python = python.into();
        self
    }

    pub fn search_dir(&self) -> Option<&Path> {
        self.search_dir.as_deref()
    }
}

impl EnvManager for VenvManager {
    fn name(&self) -> &str {
        "venv"
    }

    fn is_available(&self) -> bool {
        let mut command = Command::new(&self.python);
        command.args(["-m", "venv", "--help"]);
        probe(command)
    }

    fn registry(&self) -> &EnvRegistry {
        &self.registry
    }

    fn environment_paths(&self) -> Result<Vec<PathBuf>, ManagerError> {
        match &self.search_dir {
            Some(dir) => scan_venvs(dir),
            None => Ok(Vec::new()),
        }
    }

    fn get_dependencies(&self, entry: &EnvironmentEntry) -> Result<Vec<String>, ManagerError> {
        let mut command = Command::new(&entry.py_executable);
        command.args(["-m", "pip", "freeze"]);
        Ok(parse_freeze_output(&capture_stdout(command)?))
    }
}
