pub mod commands;
pub mod data;
pub mod habit;
pub mod init;
pub mod settings;
pub mod status;
pub mod task;
pub mod timer;

pub use commands::*;

use tracing::debug;

use crate::error::LifeorgError;
use crate::output;

/// Report the outcome of a command and turn it into an exit code.
pub fn finish(result: Result<i32, LifeorgError>, json_output: bool) -> i32 {
    match result {
        Ok(code) => code,
        Err(e) => {
            debug!(code = e.code.as_str(), "command failed: {}", e.message);
            if json_output {
                output::json::print(&output::json::error(&e));
            } else {
                eprintln!("Error: {}", e.message);
            }
            1
        }
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), LifeorgError> {
    if value.trim().is_empty() {
        return Err(LifeorgError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}
