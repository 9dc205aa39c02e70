use super::{json_pretty, pick_manager, spin_fail, spin_ok, spinner, EXIT_SUCCESS};
use envpicker_manager::EnvRegistry;

pub fn run(
    registry: &EnvRegistry,
    preferences: Option<&[&str]>,
    json: bool,
) -> Result<u8, String> {
    let manager = pick_manager(registry, preferences)?;
    let pb = (!json).then(|| spinner(&format!("scanning {} environments...", manager.name())));

    let registered = match manager.register_all() {
        Ok(registered) => registered,
        Err(e) => {
            if let Some(pb) = &pb {
                spin_fail(pb, "scan failed");
            }
            return Err(e.to_string());
        }
    };

    if let Some(pb) = &pb {
        spin_ok(
            pb,
            &format!("registered {} new environment(s)", registered.len()),
        );
    }
    if json {
        println!("{}", json_pretty(&registered)?);
    } else {
        for full in &registered {
            println!("  {:<20} {}", full.name, full.path.display());
        }
    }
    Ok(EXIT_SUCCESS)
}
