//! Environment managers and registration for envpicker.
//!
//! This crate implements the orchestration layer: the pluggable `EnvManager`
//! trait with conda, mamba, venv and mock backends, the shared `EnvRegistry`
//! that validates, hashes, deduplicates and persists registrations, and
//! `select_manager` for picking the first available backend from a
//! preference list.

pub mod conda;
pub mod manager;
pub mod mock;
pub mod process;
pub mod registry;
pub mod resolver;
pub mod venv;

pub use conda::{parse_env_export, CondaInfo, CondaManager};
pub use manager::{EnvManager, EnvManagerExt};
pub use mock::MockManager;
pub use registry::{default_executable, EnvRegistry};
pub use resolver::{
    build_manager, first_available, select_manager, DEFAULT_PREFERENCES, KNOWN_MANAGERS,
};
pub use venv::{parse_freeze_output, VenvManager};

use envpicker_schema::SchemaError;
use envpicker_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("constraint error: {0}")]
    Schema(#[from] SchemaError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("environment is already registered: {0}")]
    AlreadyRegistered(PathBuf),
    #[error("python executable '{path}' is not valid: {reason}")]
    InvalidExecutable { path: PathBuf, reason: String },
    #[error("no default python location on platform '{0}'")]
    UnsupportedPlatform(String),
    #[error("no environment manager available (tried: {})", .0.join(", "))]
    NoManagerAvailable(Vec<String>),
    #[error("'{tool}' failed: {reason}")]
    ToolFailed { tool: String, reason: String },
    #[error("unreadable tool output: {0}")]
    InvalidExport(String),
}
