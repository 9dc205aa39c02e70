pub mod check;
pub mod completions;
pub mod inspect;
pub mod list;
pub mod managers;
pub mod matches;
pub mod register;
pub mod register_all;

use envpicker_manager::{select_manager, EnvManager, EnvRegistry};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_CONSTRAINT_ERROR: u8 = 2;
pub const EXIT_STORE_ERROR: u8 = 3;

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

pub fn colorize_availability(available: bool) -> String {
    use console::Style;
    if available {
        Style::new().green().apply_to("available").to_string()
    } else {
        Style::new().dim().apply_to("unavailable").to_string()
    }
}

pub fn colorize_verdict(satisfied: bool) -> String {
    use console::Style;
    if satisfied {
        Style::new().green().bold().apply_to("satisfied").to_string()
    } else {
        Style::new().red().bold().apply_to("not satisfied").to_string()
    }
}

pub fn pick_manager(
    registry: &EnvRegistry,
    preferences: Option<&[&str]>,
) -> Result<Box<dyn EnvManager>, String> {
    select_manager(preferences, registry).map_err(|e| e.to_string())
}
