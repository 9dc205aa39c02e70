//! Newtype wrapper for the registry identity hash.
//!
//! Serializes as a plain string so registry documents stay tool-agnostic.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Hex digest identifying a registered environment, derived from its normalized path.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvHash(String);

impl EnvHash {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for EnvHash {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnvHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EnvHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for EnvHash {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EnvHash {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<String> for EnvHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EnvHash {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_hash_display_and_as_ref() {
        let h = EnvHash::new("abc123");
        assert_eq!(h.to_string(), "abc123");
        assert_eq!(h.as_str(), "abc123");
        assert_eq!(AsRef::<str>::as_ref(&h), "abc123");
    }

    #[test]
    fn env_hash_serializes_as_plain_string() {
        let h = EnvHash::new("deadbeef");
        let json = serde_json::to_string(&h).unwrap();
        assert_eq!(json, "\"deadbeef\"");
        let back: EnvHash = serde_json::from_str(&json).unwrap();
        assert_eq!(back, h);
    }

    #[test]
    fn default_hash_is_empty() {
        assert!(EnvHash::default().is_empty());
    }
}
