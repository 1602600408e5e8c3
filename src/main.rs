//! b2_cleanup - cancel unfinished Backblaze B2 large file uploads.
//!
//! Lists the unfinished large files of a bucket and cancels them, or only
//! reports them with `--dry-run`.

use b2_cleanup::cli;
use b2_cleanup::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            process::exit(exit_code);
        }
        Err(e) => {
            let output = OutputManager::new();
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&suggestion);
                }
            }

            process::exit(e.exit_code());
        }
    }
}
