//! Command line argument parsing and validation.

use crate::config::{CleanupConfig, DEFAULT_LOG_FILE};
use crate::error::CliError;
use clap::Parser;
use std::path::PathBuf;

/// Clean up unfinished B2 large file uploads
#[derive(Parser, Debug)]
#[command(
    name = "b2_cleanup",
    version,
    about = "Clean up unfinished B2 large file uploads in the specified bucket",
    long_about = "Clean up unfinished B2 large file uploads in the specified bucket.

If no bucket is specified, you'll be prompted to select one from your available buckets.

Credentials are taken from --key-id/--key, then from B2_APPLICATION_KEY_ID and
B2_APPLICATION_KEY, then from `b2 account get`.

Usage:
  b2_cleanup my-bucket --dry-run
  b2_cleanup my-bucket --non-interactive
  b2_cleanup"
)]
pub struct Args {
    /// Bucket to clean up
    #[arg(index = 1, value_name = "BUCKET")]
    pub bucket: Option<String>,

    /// List only, don't delete anything
    #[arg(long)]
    pub dry_run: bool,

    /// B2 application key ID (overrides env vars)
    #[arg(long, value_name = "KEY_ID", requires = "key")]
    pub key_id: Option<String>,

    /// B2 application key (overrides env vars)
    #[arg(long, value_name = "KEY", requires = "key_id")]
    pub key: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub non_interactive: bool,

    /// Path to the log file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        let reason = match &self.bucket {
            Some(bucket) if bucket.trim().is_empty() => "Bucket name must not be empty",
            None if self.non_interactive => "A bucket name is required with --non-interactive",
            _ => return Ok(()),
        };
        Err(CliError::InvalidArguments {
            reason: reason.to_string(),
        })
    }
}

impl From<&Args> for CleanupConfig {
    fn from(args: &Args) -> Self {
        Self {
            bucket: args.bucket.clone(),
            dry_run: args.dry_run,
            interactive: !args.non_interactive,
            override_key_id: args.key_id.clone(),
            override_key: args.key.clone(),
            log_file: args.log_file.clone(),
            ..Self::default()
        }
    }
}
