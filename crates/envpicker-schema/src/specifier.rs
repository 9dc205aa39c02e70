//! Structural check for `name<op>version` dependency entries.
//!
//! This is a sieve, not a parser: `package=*` passes even though `*` is not a
//! version. Use [`crate::parse_constraint`] when the bounds matter.

use serde_yaml::Value;

/// True when `entry` looks like `name<op>version`.
///
/// Whitespace anywhere rejects the entry. `>`, `<` and `!` count as `=`, and
/// `==` collapses to one separator; the result must split into a non-empty
/// name and a non-empty version.
pub fn is_dependency_specifier(entry: &str) -> bool {
    if entry.chars().any(char::is_whitespace) {
        return false;
    }
    let normalized = entry.replace(&['>', '<', '!'][..], "=").replace("==", "=");
    match normalized.split_once('=') {
        Some((name, version)) => !name.is_empty() && !version.is_empty(),
        None => false,
    }
}

/// Same check over a YAML value; anything other than a string is rejected.
pub fn is_dependency_value(value: &Value) -> bool {
    value.as_str().is_some_and(is_dependency_specifier)
}
