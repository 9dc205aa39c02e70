use super::{colorize_verdict, json_pretty, pick_manager, EXIT_FAILURE, EXIT_SUCCESS};
use envpicker_manager::{EnvManagerExt, EnvRegistry, ManagerError};
use envpicker_schema::{package_name, parse_constraint, same_package};
use std::path::Path;

/// Pinned version of `package` among manifest dependency entries.
///
/// Entries that do not pin an exact version (ranges, bare names) are skipped.
pub fn installed_version(dependencies: &[String], package: &str) -> Option<String> {
    dependencies
        .iter()
        .filter(|dep| package_name(dep).is_some_and(|name| same_package(name, package)))
        .find_map(|dep| {
            parse_constraint(dep)
                .ok()
                .and_then(|c| c.pinned_version().map(ToOwned::to_owned))
        })
}

pub fn run(
    registry: &EnvRegistry,
    preferences: Option<&[&str]>,
    path: &Path,
    constraint: &str,
    json: bool,
) -> Result<u8, String> {
    let constraint =
        parse_constraint(constraint).map_err(|e| ManagerError::from(e).to_string())?;
    let manager = pick_manager(registry, preferences)?;
    let full = manager
        .lookup_by_path(path)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("no environment registered at {}", path.display()))?;

    let installed = installed_version(full.dependencies(), constraint.package());
    let satisfied = match &installed {
        Some(version) => constraint
            .matches(version)
            .map_err(|e| ManagerError::from(e).to_string())?,
        None => false,
    };

    if json {
        let payload = serde_json::json!({
            "environment": full.name,
            "package": constraint.package(),
            "constraint": constraint.original_text(),
            "installed": installed,
            "satisfied": satisfied,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        match &installed {
            Some(version) => println!(
                "{} {version} in '{}': {}",
                constraint.package(),
                full.name,
                colorize_verdict(satisfied)
            ),
            None => println!(
                "{} is not installed in '{}'",
                constraint.package(),
                full.name
            ),
        }
    }
    Ok(if satisfied { EXIT_SUCCESS } else { EXIT_FAILURE })
}
