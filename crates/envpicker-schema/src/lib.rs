//! Version constraints, dependency specifiers, and environment identity for envpicker.
//!
//! This crate holds the pure, I/O-free pieces: PEP 440 versions (re-exported
//! from `pep440_rs`), constraint parsing and matching (`parse_constraint`,
//! `matches_constraint`), the structural dependency-entry check
//! (`is_dependency_specifier`), and path-derived identity hashing
//! (`compute_identity`).

pub mod constraint;
pub mod identity;
pub mod specifier;
pub mod types;
pub mod version;

pub use constraint::{
    matches_constraint, package_name, parse_constraint, same_package, BoundSet, VersionConstraint,
};
pub use identity::{compute_identity, normalize_path, IDENTITY_HEX_LEN};
pub use specifier::{is_dependency_specifier, is_dependency_value};
pub use types::EnvHash;
pub use version::{parse_version, Version};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed constraint '{entry}': {reason}")]
    MalformedConstraint { entry: String, reason: String },
    #[error("invalid version: '{0}'")]
    InvalidVersion(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_names_entry_and_reason() {
        let e = SchemaError::MalformedConstraint {
            entry: "numpy>=".to_owned(),
            reason: "clause '>=' has no version".to_owned(),
        };
        let msg = e.to_string();
        assert!(msg.contains("numpy>="));
        assert!(msg.contains("has no version"));
    }

    #[test]
    fn invalid_version_display() {
        let e = SchemaError::InvalidVersion("x.y".to_owned());
        assert!(e.to_string().contains("x.y"));
    }
}
