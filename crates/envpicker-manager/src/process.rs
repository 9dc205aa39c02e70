//! Blocking invocation of external environment tools.
//!
//! Nothing here applies a timeout; a hung tool blocks the caller.

use crate::ManagerError;
use std::process::{Command, Stdio};

fn describe(command: &Command) -> String {
    command.get_program().to_string_lossy().into_owned()
}

/// Run `command` and return its stdout. Spawn failures, non-zero exits and
/// non-UTF-8 output are all `ToolFailed`.
pub fn capture_stdout(mut command: Command) -> Result<String, ManagerError> {
    let tool = describe(&command);
    tracing::debug!(
        "running {tool} {:?}",
        command.get_args().collect::<Vec<_>>()
    );
    let output = command.output().map_err(|e| ManagerError::ToolFailed {
        tool: tool.clone(),
        reason: e.to_string(),
    })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ManagerError::ToolFailed {
            tool,
            reason: format!("{}: {}", output.status, stderr.trim()),
        });
    }
    String::from_utf8(output.stdout).map_err(|e| ManagerError::ToolFailed {
        tool,
        reason: format!("non-UTF-8 output: {e}"),
    })
}

/// True when `command` starts and exits successfully. Every failure is `false`.
pub fn probe(mut command: Command) -> bool {
    let tool = describe(&command);
    let ok = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok_and(|s| s.success());
    tracing::debug!("probe {tool}: {}", if ok { "available" } else { "unavailable" });
    ok
}
