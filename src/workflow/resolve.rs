//! One round of bucket name correction.

use crate::config::SuggestionConfig;
use crate::error::{CleanupError, Result};
use crate::logging::EventLog;
use crate::prompt::{Prompter, parse_selection};

use super::similarity::close_matches;

/// How a failed exact lookup is handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionMode {
    /// Offer close matches and let the operator pick one
    Suggest,
    /// Fail without computing suggestions
    Direct,
}

impl ResolutionMode {
    /// `Suggest` when prompts are allowed
    pub fn from_interactive(interactive: bool) -> Self {
        if interactive {
            ResolutionMode::Suggest
        } else {
            ResolutionMode::Direct
        }
    }
}

/// Requested name and its ranked candidates
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionAttempt {
    /// Name that failed the exact lookup
    pub requested: String,
    /// At most `max_candidates` names, best first
    pub candidates: Vec<String>,
}

impl ResolutionAttempt {
    /// Rank `bucket_names` against `requested`
    pub fn new(requested: &str, bucket_names: &[String], config: &SuggestionConfig) -> Self {
        Self {
            requested: requested.to_string(),
            candidates: close_matches(requested, bucket_names, config.max_candidates, config.cutoff),
        }
    }

    /// Put the candidates to the operator and return the accepted name
    ///
    /// A single candidate is a yes/no question whose rejection keeps the
    /// suggestion in the error message. Several candidates form a numbered
    /// menu whose rejection is [`CleanupError::OperationCanceled`].
    pub fn choose<P: Prompter>(&self, prompter: &P, log: &EventLog) -> Result<String> {
        let chosen = match self.candidates.as_slice() {
            [] => return Err(not_accessible(&self.requested)),
            [only] => {
                if !prompter.confirm(&format!("Use '{only}' instead?"))? {
                    return Err(CleanupError::BucketResolutionFailed {
                        message: format!(
                            "Cannot access bucket '{}'. Did you mean '{only}'? Please check the name and your permissions.",
                            self.requested
                        ),
                        suggestions: self.candidates.clone(),
                    });
                }
                only.clone()
            }
            many => {
                log.warn(&format!(
                    "Bucket '{}' not found. Did you mean one of these?",
                    self.requested
                ));
                prompter.show_choices(many);
                let answer = prompter.ask("Enter number to use, or any other key to cancel: ")?;
                match parse_selection(&answer, many.len()) {
                    Some(index) => many[index].clone(),
                    None => return Err(CleanupError::OperationCanceled),
                }
            }
        };

        log.success(&format!("Using bucket '{chosen}' instead"));
        Ok(chosen)
    }
}

/// Plain resolution failure, without suggestions
pub fn not_accessible(name: &str) -> CleanupError {
    CleanupError::BucketResolutionFailed {
        message: format!(
            "Cannot access bucket '{name}'. Please check the name and your permissions."
        ),
        suggestions: Vec::new(),
    }
}
