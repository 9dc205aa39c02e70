//! PEP 440 versions.
//!
//! Parsing and ordering come from `pep440_rs`; this module only maps its
//! parse errors onto [`SchemaError`] so callers see the text they passed in.

use crate::SchemaError;
use std::str::FromStr;

pub use pep440_rs::Version;

/// Parse `text` as a PEP 440 version. Surrounding whitespace is ignored.
pub fn parse_version(text: &str) -> Result<Version, SchemaError> {
    Version::from_str(text.trim()).map_err(|_| SchemaError::InvalidVersion(text.to_owned()))
}
