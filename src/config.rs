//! Configuration constants and the per-run cleanup configuration.

use std::path::PathBuf;

/// Realm used for account authorization
pub const PRODUCTION_REALM: &str = "https://api.backblazeb2.com";

/// Environment variable holding the application key ID
pub const ENV_KEY_ID: &str = "B2_APPLICATION_KEY_ID";

/// Environment variable holding the application key
pub const ENV_KEY: &str = "B2_APPLICATION_KEY";

/// Credential tool consulted when no other source is configured
pub const CREDENTIAL_TOOL: &str = "b2";

/// Arguments passed to the credential tool
pub const CREDENTIAL_TOOL_ARGS: [&str; 2] = ["account", "get"];

/// Log file written when `--log-file` is not given
pub const DEFAULT_LOG_FILE: &str = "b2_cleanup.log";

/// Minimum similarity for a bucket name to be suggested
pub const SIMILARITY_CUTOFF: f64 = 0.6;

/// Maximum number of suggested bucket names
pub const MAX_SUGGESTIONS: usize = 3;

/// Page size for `b2_list_unfinished_large_files`
pub const UNFINISHED_PAGE_SIZE: u32 = 100;

/// Fuzzy-match settings for bucket name suggestions
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SuggestionConfig {
    /// Minimum similarity ratio, in `0.0..=1.0`
    pub cutoff: f64,
    /// Maximum number of candidates offered
    pub max_candidates: usize,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            cutoff: SIMILARITY_CUTOFF,
            max_candidates: MAX_SUGGESTIONS,
        }
    }
}

/// Configuration for one cleanup run
#[derive(Debug, Clone)]
pub struct CleanupConfig {
    /// Bucket requested on the command line
    pub bucket: Option<String>,
    /// Report uploads without canceling them
    pub dry_run: bool,
    /// Allow prompts for bucket selection and correction
    pub interactive: bool,
    /// Key ID given on the command line
    pub override_key_id: Option<String>,
    /// Application key given on the command line
    pub override_key: Option<String>,
    /// Event log destination
    pub log_file: PathBuf,
    /// Realm URL for account authorization
    pub realm: String,
    /// Suggestion tuning
    pub suggestions: SuggestionConfig,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            bucket: None,
            dry_run: false,
            interactive: true,
            override_key_id: None,
            override_key: None,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            realm: PRODUCTION_REALM.to_string(),
            suggestions: SuggestionConfig::default(),
        }
    }
}
