use super::{json_pretty, pick_manager, EXIT_SUCCESS};
use envpicker_manager::{EnvManagerExt, EnvRegistry};
use std::path::Path;

pub fn run(
    registry: &EnvRegistry,
    preferences: Option<&[&str]>,
    path: &Path,
    json: bool,
) -> Result<u8, String> {
    let manager = pick_manager(registry, preferences)?;
    let full = manager
        .lookup_by_path(path)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("no environment registered at {}", path.display()))?;
    if json {
        println!("{}", json_pretty(&full)?);
    } else {
        println!("name:          {}", full.name);
        println!("hash:          {}", full.hash);
        println!("path:          {}", full.path.display());
        println!("py_executable: {}", full.py_executable.display());
        let deps = full.dependencies();
        println!("dependencies:  {}", deps.len());
        for dep in deps {
            println!("  {dep}");
        }
    }
    Ok(EXIT_SUCCESS)
}
