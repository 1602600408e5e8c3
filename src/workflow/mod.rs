//! Bucket resolution and cleanup of unfinished large files.
//!
//! A requested name is looked up exactly. When that fails and prompts are
//! allowed, close matches from the session's bucket list are offered once;
//! an accepted correction gets a single direct lookup and never a second
//! round of suggestions. Once a bucket is resolved, each unfinished upload
//! is either reported (dry run) or canceled, in the order the service
//! returned them.

mod resolve;
pub mod similarity;

pub use resolve::{ResolutionAttempt, ResolutionMode, not_accessible};

use crate::b2::{Bucket, StorageApi, UnfinishedUpload};
use crate::config::{CleanupConfig, SuggestionConfig};
use crate::error::{CleanupError, RemoteError, Result};
use crate::logging::EventLog;
use crate::prompt::{Prompter, parse_selection};
use crate::session::Session;

/// What happened to one unfinished upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadAction {
    /// Dry run: reported only
    WouldCancel,
    /// Cancel call succeeded
    Canceled,
}

/// One processed upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// The upload as listed by the service
    pub upload: UnfinishedUpload,
    /// Action taken
    pub action: UploadAction,
}

/// Result of cleaning one bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupReport {
    /// Resolved bucket name
    pub bucket: String,
    /// Outcomes in service order
    pub outcomes: Vec<UploadOutcome>,
}

impl CleanupReport {
    /// No unfinished uploads were found
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Number of uploads with the given action
    pub fn count(&self, action: UploadAction) -> usize {
        self.outcomes.iter().filter(|o| o.action == action).count()
    }
}

/// Resolution and cleanup against one session
pub struct CleanupWorkflow<'a, S, P> {
    session: &'a Session<S>,
    prompter: &'a P,
    log: &'a EventLog,
    dry_run: bool,
    suggestions: SuggestionConfig,
}

impl<'a, S: StorageApi, P: Prompter> CleanupWorkflow<'a, S, P> {
    /// Create a workflow using the run's dry-run and suggestion settings
    pub fn new(
        session: &'a Session<S>,
        prompter: &'a P,
        log: &'a EventLog,
        config: &CleanupConfig,
    ) -> Self {
        Self {
            session,
            prompter,
            log,
            dry_run: config.dry_run,
            suggestions: config.suggestions,
        }
    }

    /// Resolve `name` to a bucket, then clean it
    pub async fn resolve_and_clean(&self, name: &str, interactive: bool) -> Result<CleanupReport> {
        let bucket = self
            .resolve(name, ResolutionMode::from_interactive(interactive))
            .await?;
        self.clean(&bucket).await
    }

    /// Let the operator pick a bucket from the session's list, then clean it
    pub async fn select_and_clean(&self) -> Result<CleanupReport> {
        let names = self.session.bucket_names();
        if names.is_empty() {
            return Err(CleanupError::BucketResolutionFailed {
                message: "No buckets available to clean up.".to_string(),
                suggestions: Vec::new(),
            });
        }

        self.log.info("Please select a bucket to clean up:");
        self.prompter.show_choices(names);
        let answer = self
            .prompter
            .ask("Enter the number of the bucket to clean up: ")?;

        let index = parse_selection(&answer, names.len()).ok_or(CleanupError::OperationCanceled)?;
        self.resolve_and_clean(&names[index], false).await
    }

    /// Map `name` to an accessible bucket
    pub async fn resolve(&self, name: &str, mode: ResolutionMode) -> Result<Bucket> {
        let error = match self.session.api().get_bucket_by_name(name).await {
            Ok(bucket) => return Ok(bucket),
            Err(e) => e,
        };

        match mode {
            ResolutionMode::Direct => Err(self.unresolved(name, &error)),
            ResolutionMode::Suggest => {
                self.report_lookup_failure(name, &error);

                let attempt =
                    ResolutionAttempt::new(name, self.session.bucket_names(), &self.suggestions);
                let chosen = attempt.choose(self.prompter, self.log)?;

                // the corrected name gets exactly one direct lookup
                self.session
                    .api()
                    .get_bucket_by_name(&chosen)
                    .await
                    .map_err(|e| self.unresolved(&chosen, &e))
            }
        }
    }

    /// Report or cancel every unfinished upload in `bucket`
    ///
    /// A failed cancel aborts the remaining uploads.
    pub async fn clean(&self, bucket: &Bucket) -> Result<CleanupReport> {
        let uploads = self.session.api().list_unfinished_large_files(bucket).await?;
        let mut report = CleanupReport {
            bucket: bucket.name.clone(),
            outcomes: Vec::with_capacity(uploads.len()),
        };

        if uploads.is_empty() {
            self.log.success("No unfinished large files found.");
            return Ok(report);
        }

        self.log
            .info(&format!("🗃️ Found {} unfinished uploads", uploads.len()));

        for upload in uploads {
            let action = if self.dry_run {
                self.log.info(&format!(
                    "💡 Dry run: would cancel {} ({})",
                    upload.file_id, upload.file_name
                ));
                UploadAction::WouldCancel
            } else {
                self.log.info(&format!(
                    "🗑️ Cancelling {} ({})",
                    upload.file_id, upload.file_name
                ));
                self.session.api().cancel_large_file(&upload.file_id).await?;
                UploadAction::Canceled
            };
            report.outcomes.push(UploadOutcome { upload, action });
        }

        if self.dry_run {
            self.log.success(&format!(
                "Dry run complete: {} unfinished uploads would be canceled",
                report.count(UploadAction::WouldCancel)
            ));
        } else {
            self.log.success(&format!(
                "Canceled {} unfinished uploads",
                report.count(UploadAction::Canceled)
            ));
        }

        Ok(report)
    }

    fn report_lookup_failure(&self, name: &str, error: &RemoteError) {
        self.log.error(&format!(
            "Bucket '{name}' not found or not accessible: {error}"
        ));
    }

    fn unresolved(&self, name: &str, error: &RemoteError) -> CleanupError {
        self.report_lookup_failure(name, error);
        not_accessible(name)
    }
}
