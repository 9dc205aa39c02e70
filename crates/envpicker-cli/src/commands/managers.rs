use super::{colorize_availability, json_pretty, EXIT_SUCCESS};
use envpicker_manager::{build_manager, EnvRegistry, DEFAULT_PREFERENCES, KNOWN_MANAGERS};

#[derive(Debug, serde::Serialize)]
struct ManagerStatus {
    name: &'static str,
    available: bool,
    preferred: bool,
}

/// Probe every known backend. With `--manager` the listed names are the
/// preferred ones; otherwise the default order is.
pub fn run(
    registry: &EnvRegistry,
    preferences: Option<&[&str]>,
    json: bool,
) -> Result<u8, String> {
    let preferred = preferences.unwrap_or(DEFAULT_PREFERENCES);
    let statuses: Vec<ManagerStatus> = KNOWN_MANAGERS
        .iter()
        .filter_map(|name| {
            let manager = build_manager(name, registry)?;
            Some(ManagerStatus {
                name: *name,
                available: manager.is_available(),
                preferred: preferred.contains(name),
            })
        })
        .collect();

    if json {
        println!("{}", json_pretty(&statuses)?);
    } else {
        println!("{:<8} {:<12} PREFERRED", "NAME", "STATUS");
        for status in &statuses {
            println!(
                "{:<8} {:<12} {}",
                status.name,
                colorize_availability(status.available),
                if status.preferred { "yes" } else { "" }
            );
        }
    }
    Ok(EXIT_SUCCESS)
}
