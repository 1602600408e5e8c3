//! Command line interface for b2_cleanup.
//!
//! Parses arguments, runs the cleanup command, and maps the outcome to an
//! exit code.

mod args;
mod commands;
mod output;

pub use args::Args;
pub use commands::execute_command;
pub use output::OutputManager;

use crate::error::Result;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    let args = Args::parse_args();
    execute_command(args).await
}
