use super::{json_pretty, EXIT_SUCCESS};
use envpicker_manager::EnvRegistry;

pub fn run(registry: &EnvRegistry, json: bool) -> Result<u8, String> {
    let entries = registry.entries().map_err(|e| e.to_string())?;
    if json {
        println!("{}", json_pretty(&entries)?);
    } else if entries.is_empty() {
        println!("no environments registered");
    } else {
        println!("{:<14} {:<20} PATH", "HASH", "NAME");
        for entry in &entries {
            let short = entry.hash.get(..12).unwrap_or(entry.hash.as_str());
            println!("{short:<14} {:<20} {}", entry.name, entry.path.display());
        }
    }
    Ok(EXIT_SUCCESS)
}
