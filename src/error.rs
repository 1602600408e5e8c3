//! Error types for b2_cleanup operations.
//!
//! This module defines all error types with actionable error messages and recovery suggestions.

use crate::session::CredentialSource;
use thiserror::Error;

/// Result type alias for b2_cleanup operations
pub type Result<T> = std::result::Result<T, CleanupError>;

/// Main error type for all b2_cleanup operations
#[derive(Error, Debug)]
pub enum CleanupError {
    /// No credential source succeeded, or the service rejected the credentials
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    /// The requested bucket could not be mapped to an accessible bucket
    #[error("{message}")]
    BucketResolutionFailed {
        /// User-facing message, worded by the resolution path taken
        message: String,
        /// Candidate names offered to the operator, best first
        suggestions: Vec<String>,
    },

    /// The operator declined or made an invalid selection
    #[error("Operation canceled.")]
    OperationCanceled,

    /// Any other failure surfaced by the storage service
    #[error("Remote service error: {0}")]
    Remote(#[from] RemoteError),

    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures while obtaining or validating account credentials
#[derive(Error, Debug)]
pub enum AuthorizationError {
    /// The credential tool executable is not installed
    #[error("B2 CLI not found. Please install it or provide credentials manually.")]
    CredentialToolMissing {
        /// Program that was looked up
        program: String,
    },

    /// The credential tool ran but did not yield usable credentials
    #[error("Could not authorize with Backblaze B2: {reason}")]
    CredentialToolFailure {
        /// Reason for the error
        reason: String,
    },

    /// The storage service refused the credentials
    #[error("Could not authorize with Backblaze B2 using {origin}: {source}")]
    Rejected {
        /// Where the refused credentials came from
        origin: CredentialSource,
        /// Service response
        #[source]
        source: RemoteError,
    },

    /// Every provider in the chain passed without producing credentials
    #[error("No B2 credentials available")]
    NoCredentials,
}

/// Errors returned by the storage service client
#[derive(Error, Debug)]
pub enum RemoteError {
    /// The service answered with an error body
    #[error("{operation} failed with {status} ({code}): {message}")]
    Api {
        /// B2 API operation name
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// B2 error code
        code: String,
        /// B2 error message
        message: String,
    },

    /// Bucket lookup by name returned nothing
    #[error("Bucket '{name}' does not exist")]
    BucketNotFound {
        /// Requested bucket name
        name: String,
    },

    /// The request never produced a usable response
    #[error("{operation} request failed: {source}")]
    Transport {
        /// B2 API operation name
        operation: &'static str,
        /// Underlying HTTP error
        #[source]
        source: reqwest::Error,
    },

    /// A realm or apiUrl could not be turned into an endpoint
    #[error("Invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Missing required argument
    #[error("Missing required argument: {argument}")]
    MissingArgument {
        /// Argument name
        argument: String,
    },
}

impl CleanupError {
    /// Get actionable recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<String> {
        match self {
            CleanupError::Authorization(AuthorizationError::CredentialToolMissing { program }) => {
                vec![
                    format!("Install the B2 command line tool so that '{program}' is on PATH"),
                    "Or pass --key-id and --key".to_string(),
                    "Or export B2_APPLICATION_KEY_ID and B2_APPLICATION_KEY".to_string(),
                ]
            }
            CleanupError::Authorization(AuthorizationError::CredentialToolFailure { .. }) => vec![
                "Check that `b2 account get` prints your account details".to_string(),
                "Log in again with `b2 account authorize`".to_string(),
            ],
            CleanupError::Authorization(AuthorizationError::Rejected { origin, .. }) => vec![
                format!("Verify the application key supplied via {origin}"),
                "Make sure the key has not been deleted or expired".to_string(),
            ],
            CleanupError::BucketResolutionFailed { suggestions, .. } if !suggestions.is_empty() => {
                suggestions
                    .iter()
                    .map(|name| format!("Retry with: b2_cleanup {name}"))
                    .collect()
            }
            CleanupError::BucketResolutionFailed { .. } => vec![
                "Check the bucket name for typos".to_string(),
                "Confirm the application key is allowed to access the bucket".to_string(),
            ],
            CleanupError::Remote(RemoteError::Transport { .. }) => {
                vec!["Check your network connection and try again".to_string()]
            }
            CleanupError::OperationCanceled => Vec::new(),
            _ => vec!["Check the error message above for specific details".to_string()],
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl RemoteError {
    /// Whether the service answered that the caller lacks permission
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, RemoteError::Api { status: 401, .. })
    }
}
