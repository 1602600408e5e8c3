//! Cleanup command implementation.
//!
//! Establishes the session and runs the workflow against the requested
//! bucket, or against one picked from the account's bucket list.

use crate::b2::B2Client;
use crate::config::CleanupConfig;
use crate::error::{CliError, Result};
use crate::logging::EventLog;
use crate::prompt::TerminalPrompter;
use crate::session::{CredentialChain, Session};
use crate::workflow::{CleanupReport, CleanupWorkflow};

/// Execute cleanup command
pub(super) async fn execute_cleanup(config: &CleanupConfig, log: &EventLog) -> Result<CleanupReport> {
    if config.dry_run {
        log.info("💡 Dry run: no uploads will be canceled");
    }

    let authorizer = B2Client::new(&config.realm)?;
    let credentials =
        CredentialChain::standard(config.override_key_id.clone(), config.override_key.clone());
    let session = Session::establish(&authorizer, &credentials, log).await?;

    let prompter = TerminalPrompter::new();
    let workflow = CleanupWorkflow::new(&session, &prompter, log, config);

    match &config.bucket {
        Some(bucket) => workflow.resolve_and_clean(bucket, config.interactive).await,
        None if config.interactive => workflow.select_and_clean().await,
        None => Err(CliError::MissingArgument {
            argument: "BUCKET".to_string(),
        }
        .into()),
    }
}
