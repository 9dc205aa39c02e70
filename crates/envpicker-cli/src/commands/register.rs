use super::{json_pretty, pick_manager, EXIT_SUCCESS};
use envpicker_manager::{EnvManagerExt, EnvRegistry};
use std::path::Path;

pub fn run(
    registry: &EnvRegistry,
    preferences: Option<&[&str]>,
    path: &Path,
    python: Option<&Path>,
    name: Option<&str>,
    force: bool,
    json: bool,
) -> Result<u8, String> {
    let manager = pick_manager(registry, preferences)?;
    let full = manager
        .register(path, python, name, force)
        .map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&full)?);
    } else {
        println!(
            "registered '{}' ({}) with {}",
            full.name,
            full.hash,
            manager.name()
        );
        println!("  path:         {}", full.path.display());
        println!("  python:       {}", full.py_executable.display());
        println!("  dependencies: {}", full.dependencies().len());
    }
    Ok(EXIT_SUCCESS)
}
