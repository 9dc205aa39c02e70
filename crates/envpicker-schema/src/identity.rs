use crate::types::EnvHash;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Length of an identity hash in hex characters (128 bits).
pub const IDENTITY_HEX_LEN: usize = 32;

/// Compute the registry identity of an environment from its path.
///
/// The digest covers the raw bytes of the path exactly as given. Two spellings
/// of the same location hash differently, so callers must pass the output of
/// [`normalize_path`] wherever identities are compared.
pub fn compute_identity(path: &Path) -> EnvHash {
    let hex = blake3::hash(path.as_os_str().as_encoded_bytes()).to_hex();
    EnvHash::new(&hex[..IDENTITY_HEX_LEN])
}

/// Make `path` absolute and resolve `.` and `..` lexically.
///
/// Symlinks are left alone; two links to one directory stay two environments.
pub fn normalize_path(path: &Path) -> io::Result<PathBuf> {
    let absolute = std::path::absolute(path)?;
    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_deterministic() {
        let a = compute_identity(Path::new("/opt/envs/py311"));
        let b = compute_identity(Path::new("/opt/envs/py311"));
        assert_eq!(a, b);
    }

    #[test]
    fn identity_is_128_bit_hex() {
        let h = compute_identity(Path::new("test_path"));
        assert_eq!(h.len(), IDENTITY_HEX_LEN);
        assert!(h.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase()));
    }

    #[test]
    fn identity_is_prefix_of_blake3_digest() {
        let full = blake3::hash(b"test_path").to_hex().to_string();
        assert!(full.starts_with(compute_identity(Path::new("test_path")).as_str()));
    }

    #[test]
    fn different_paths_produce_different_ids() {
        let a = compute_identity(Path::new("/opt/envs/a"));
        let b = compute_identity(Path::new("/opt/envs/b"));
        assert_ne!(a, b);
    }

    #[test]
    fn unnormalized_spelling_diverges() {
        let a = compute_identity(Path::new("/opt/envs/a"));
        let b = compute_identity(Path::new("/opt/envs/./a"));
        assert_ne!(a, b);
    }

    #[cfg(unix)]
    #[test]
    fn normalize_resolves_dots() {
        let p = normalize_path(Path::new("/opt/envs/./x/../py311")).unwrap();
        assert_eq!(p, PathBuf::from("/opt/envs/py311"));
    }

    #[cfg(unix)]
    #[test]
    fn normalize_stops_at_root() {
        let p = normalize_path(Path::new("/../../opt")).unwrap();
        assert_eq!(p, PathBuf::from("/opt"));
    }

    #[test]
    fn normalize_makes_relative_paths_absolute() {
        let p = normalize_path(Path::new("some/env")).unwrap();
        assert!(p.is_absolute());
        assert!(p.ends_with("some/env"));
    }

    #[test]
    fn normalized_spellings_share_identity() {
        let dir = tempfile::tempdir().unwrap();
        let plain = normalize_path(&dir.path().join("env")).unwrap();
        let dotted = normalize_path(&dir.path().join("x").join("..").join(".").join("env")).unwrap();
        assert_eq!(compute_identity(&plain), compute_identity(&dotted));
    }
}
