//! Command execution.
//!
//! Opens the event log, validates arguments, runs the cleanup, and turns
//! fatal errors into a logged message plus recovery suggestions.

mod cleanup;

use crate::cli::{Args, OutputManager};
use crate::config::CleanupConfig;
use crate::error::{CleanupError, Result};
use crate::logging::EventLog;

use cleanup::execute_cleanup;

/// Execute the cleanup command based on parsed arguments
pub async fn execute_command(args: Args) -> Result<i32> {
    let output = OutputManager::new();
    let config = CleanupConfig::from(&args);
    let log = EventLog::open(&config.log_file)?;

    if let Err(validation_error) = args.validate() {
        log.error(&validation_error.to_string());
        return Ok(CleanupError::from(validation_error).exit_code());
    }

    match execute_cleanup(&config, &log).await {
        Ok(_) => Ok(0),
        Err(e) => {
            log.error(&e.to_string());

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&suggestion);
                }
            }

            Ok(e.exit_code())
        }
    }
}
