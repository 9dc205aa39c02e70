use super::{colorize_verdict, json_pretty, EXIT_FAILURE, EXIT_SUCCESS};
use envpicker_manager::ManagerError;
use envpicker_schema::matches_constraint;

pub fn run(constraint: &str, version: &str, json: bool) -> Result<u8, String> {
    let satisfied = matches_constraint(constraint, version)
        .map_err(|e| ManagerError::from(e).to_string())?;
    if json {
        let payload = serde_json::json!({
            "constraint": constraint,
            "version": version,
            "satisfied": satisfied,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("{version} against {constraint}: {}", colorize_verdict(satisfied));
    }
    Ok(if satisfied { EXIT_SUCCESS } else { EXIT_FAILURE })
}
