//! Package version constraints such as `numpy>=1.1,<2.0`.
//!
//! A constraint is a package name followed by comma-separated clauses using
//! `==`, `=`, `>=`, `<=`, `>` or `<`. The clauses are folded into a single
//! lower and upper bound. When two clauses bound the same side, the more
//! restrictive one is kept: the higher lower bound, the lower upper bound,
//! and the exclusive bound when both name the same version.
//!
//! Each kept bound is tested with PEP 440 specifier semantics, so local
//! labels are ignored by `==1.15` and `<2.0` excludes `2.0rc1`.

use crate::version::{parse_version, Version};
use crate::SchemaError;
use pep440_rs::VersionSpecifier;
use std::str::FromStr;

/// Characters that start a comparison operator. Everything before the first
/// one is the package name.
const OPERATOR_CHARS: &[char] = &['<', '>', '=', '!', '~'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompareOp {
    Eq,
    Ge,
    Gt,
    Le,
    Lt,
}

impl CompareOp {
    fn as_pep440(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Ge => ">=",
            Self::Gt => ">",
            Self::Le => "<=",
            Self::Lt => "<",
        }
    }
}

/// Longest operators first so `>=` is not read as `>` followed by `=1.0`.
const OPERATORS: &[(&str, CompareOp)] = &[
    ("==", CompareOp::Eq),
    (">=", CompareOp::Ge),
    ("<=", CompareOp::Le),
    (">", CompareOp::Gt),
    ("<", CompareOp::Lt),
    ("=", CompareOp::Eq),
];

#[derive(Debug, Clone, PartialEq, Eq)]
struct Bound {
    text: String,
    inclusive: bool,
    specifier: VersionSpecifier,
}

impl Bound {
    fn version(&self) -> &Version {
        self.specifier.version()
    }
}

/// Lower and upper bounds of a specifier, without a package name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundSet {
    lower: Option<Bound>,
    upper: Option<Bound>,
}

impl BoundSet {
    /// Parse a bare specifier such as `>=1.1,<2.0`.
    pub fn parse(specifier: &str) -> Result<Self, SchemaError> {
        parse_bounds(specifier, specifier)
    }

    pub fn contains(&self, version: &Version) -> bool {
        [&self.lower, &self.upper]
            .into_iter()
            .flatten()
            .all(|b| b.specifier.contains(version))
    }

    fn narrow_lower(&mut self, new: Bound) {
        let replace = match &self.lower {
            None => true,
            Some(cur) => {
                new.version() > cur.version()
                    || (new.version() == cur.version() && !new.inclusive)
            }
        };
        if replace {
            self.lower = Some(new);
        }
    }

    fn narrow_upper(&mut self, new: Bound) {
        let replace = match &self.upper {
            None => true,
            Some(cur) => {
                new.version() < cur.version()
                    || (new.version() == cur.version() && !new.inclusive)
            }
        };
        if replace {
            self.upper = Some(new);
        }
    }
}

fn malformed(entry: &str, reason: impl Into<String>) -> SchemaError {
    SchemaError::MalformedConstraint {
        entry: entry.to_owned(),
        reason: reason.into(),
    }
}

fn split_operator(clause: &str) -> Option<(CompareOp, &str)> {
    OPERATORS
        .iter()
        .find_map(|(token, op)| clause.strip_prefix(token).map(|rest| (*op, rest)))
}

fn parse_bounds(specifier: &str, entry: &str) -> Result<BoundSet, SchemaError> {
    if specifier.trim().is_empty() {
        return Err(malformed(entry, "no version specifier"));
    }

    let mut bounds = BoundSet::default();
    for clause in specifier.split(',') {
        let clause = clause.trim();
        if clause.is_empty() {
            return Err(malformed(entry, "empty clause"));
        }
        let (op, version_text) = split_operator(clause)
            .ok_or_else(|| malformed(entry, format!("unsupported operator in '{clause}'")))?;
        let version_text = version_text.trim();
        if version_text.is_empty() {
            return Err(malformed(entry, format!("clause '{clause}' has no version")));
        }
        let not_a_version =
            || malformed(entry, format!("'{version_text}' is not a valid version"));
        parse_version(version_text).map_err(|_| not_a_version())?;
        let specifier = VersionSpecifier::from_str(&format!("{}{version_text}", op.as_pep440()))
            .map_err(|_| not_a_version())?;
        let bound = |inclusive| Bound {
            text: version_text.to_owned(),
            inclusive,
            specifier: specifier.clone(),
        };

        match op {
            CompareOp::Eq => {
                bounds.narrow_lower(bound(true));
                bounds.narrow_upper(bound(true));
            }
            CompareOp::Ge => bounds.narrow_lower(bound(true)),
            CompareOp::Gt => bounds.narrow_lower(bound(false)),
            CompareOp::Le => bounds.narrow_upper(bound(true)),
            CompareOp::Lt => bounds.narrow_upper(bound(false)),
        }
    }
    Ok(bounds)
}

/// Split `entry` at its first operator character into `(name, specifier)`.
fn split_entry(entry: &str) -> Result<(&str, &str), SchemaError> {
    let idx = entry
        .find(OPERATOR_CHARS)
        .ok_or_else(|| malformed(entry, "no comparison operator"))?;
    Ok((entry[..idx].trim(), &entry[idx..]))
}

/// The package name of a dependency entry, if it has an operator at all.
pub fn package_name(entry: &str) -> Option<&str> {
    split_entry(entry.trim())
        .ok()
        .map(|(name, _)| name)
        .filter(|name| !name.is_empty())
}

/// Compare package names the way Python packaging does: case-insensitive,
/// with `-`, `_` and `.` interchangeable.
pub fn same_package(a: &str, b: &str) -> bool {
    let canon = |s: &str| -> String {
        s.chars()
            .map(|c| match c {
                '_' | '.' => '-',
                other => other.to_ascii_lowercase(),
            })
            .collect()
    };
    canon(a) == canon(b)
}

/// A package name plus its folded version bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    package: String,
    bounds: BoundSet,
    original_text: String,
}

impl VersionConstraint {
    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn lower_bound(&self) -> Option<&str> {
        self.bounds.lower.as_ref().map(|b| b.text.as_str())
    }

    pub fn upper_bound(&self) -> Option<&str> {
        self.bounds.upper.as_ref().map(|b| b.text.as_str())
    }

    /// False when there is no lower bound.
    pub fn lower_inclusive(&self) -> bool {
        self.bounds.lower.as_ref().is_some_and(|b| b.inclusive)
    }

    /// False when there is no upper bound.
    pub fn upper_inclusive(&self) -> bool {
        self.bounds.upper.as_ref().is_some_and(|b| b.inclusive)
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// The text after the package name, e.g. `>=1,<2`.
    pub fn specifier(&self) -> &str {
        self.original_text
            .find(OPERATOR_CHARS)
            .map_or("", |idx| &self.original_text[idx..])
    }

    pub fn bounds(&self) -> &BoundSet {
        &self.bounds
    }

    /// The exact version when both bounds pin the same release.
    pub fn pinned_version(&self) -> Option<&str> {
        match (&self.bounds.lower, &self.bounds.upper) {
            (Some(lo), Some(hi))
                if lo.inclusive && hi.inclusive && lo.version() == hi.version() =>
            {
                Some(lo.text.as_str())
            }
            _ => None,
        }
    }

    pub fn satisfied_by(&self, version: &Version) -> bool {
        self.bounds.contains(version)
    }

    pub fn matches(&self, version: &str) -> Result<bool, SchemaError> {
        Ok(self.satisfied_by(&parse_version(version)?))
    }
}

impl std::fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.original_text)
    }
}

/// Parse `name<op>version[,<op>version...]` into a [`VersionConstraint`].
pub fn parse_constraint(entry: &str) -> Result<VersionConstraint, SchemaError> {
    let entry = entry.trim();
    let (package, specifier) = split_entry(entry)?;
    if package.is_empty() {
        return Err(malformed(entry, "missing package name"));
    }
    let bounds = parse_bounds(specifier, entry)?;
    Ok(VersionConstraint {
        package: package.to_owned(),
        bounds,
        original_text: entry.to_owned(),
    })
}

/// Test `version` against `entry`, which may be a full constraint
/// (`numpy>=1.1`) or a bare specifier (`>=1.1`).
///
/// The entry is parsed before the version, so a broken constraint is always
/// reported as such.
pub fn matches_constraint(entry: &str, version: &str) -> Result<bool, SchemaError> {
    let entry = entry.trim();
    let (_, specifier) = split_entry(entry)?;
    let bounds = parse_bounds(specifier, entry)?;
    let version = parse_version(version)?;
    Ok(bounds.contains(&version))
}
