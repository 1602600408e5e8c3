//! # b2_cleanup
//!
//! Removes stale, unfinished large file uploads from Backblaze B2 buckets.
//!
//! Unfinished large files keep their uploaded parts, and the storage they
//! occupy is billed until the upload is finished or canceled. This crate
//! finds them and cancels them.
//!
//! ## Features
//!
//! - **Credential chain**: command line override, then environment
//!   variables, then `b2 account get`
//! - **Bucket name correction**: close matches from the account's bucket
//!   list are offered when a name does not resolve
//! - **Dry run**: report what would be canceled without touching anything
//! - **Dual logging**: every event goes to the terminal and a log file
//!
//! ## Usage
//!
//! ```bash
//! b2_cleanup my-bucket --dry-run     # list unfinished uploads
//! b2_cleanup my-bucket               # cancel them
//! b2_cleanup                         # pick a bucket interactively
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod b2;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod prompt;
pub mod session;
pub mod workflow;

pub use b2::{Authorizer, B2Client, Bucket, StorageApi, UnfinishedUpload};
pub use cli::Args;
pub use config::{CleanupConfig, SuggestionConfig};
pub use error::{AuthorizationError, CleanupError, CliError, RemoteError, Result};
pub use logging::EventLog;
pub use prompt::{Prompter, TerminalPrompter};
pub use session::{CredentialChain, CredentialProvider, CredentialSource, Credentials, Session};
pub use workflow::{CleanupReport, CleanupWorkflow, UploadAction, UploadOutcome};
