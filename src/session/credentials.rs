//! Credential sources tried in priority order.

use crate::config::{CREDENTIAL_TOOL, CREDENTIAL_TOOL_ARGS, ENV_KEY, ENV_KEY_ID};
use crate::error::AuthorizationError;
use crate::logging::EventLog;
use serde::Deserialize;
use std::fmt;
use std::process::Command;

/// Where a set of credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// `--key-id` and `--key`
    CommandLine,
    /// `B2_APPLICATION_KEY_ID` and `B2_APPLICATION_KEY`
    Environment,
    /// Output of the local credential tool
    CredentialTool,
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialSource::CommandLine => write!(f, "command line override"),
            CredentialSource::Environment => write!(f, "environment variables"),
            CredentialSource::CredentialTool => write!(f, "B2 CLI"),
        }
    }
}

/// Application key pair
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Application key ID
    pub key_id: String,
    /// Application key
    pub key: String,
    /// Origin of the pair
    pub source: CredentialSource,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("key", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

/// One way of obtaining credentials.
///
/// `Ok(None)` passes to the next provider; an error ends the search.
pub trait CredentialProvider {
    /// Source this provider reads from
    fn source(&self) -> CredentialSource;

    /// Produce credentials if this source has them
    fn provide(&self, log: &EventLog) -> Result<Option<Credentials>, AuthorizationError>;
}

/// Ordered providers, first hit wins
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
}

impl CredentialChain {
    /// Chain over arbitrary providers
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>) -> Self {
        Self { providers }
    }

    /// Command line override, then environment, then the B2 CLI
    pub fn standard(override_key_id: Option<String>, override_key: Option<String>) -> Self {
        Self::new(vec![
            Box::new(OverrideCredentials::new(override_key_id, override_key)),
            Box::new(EnvCredentials::new()),
            Box::new(CredentialTool::new()),
        ])
    }

    /// Sources in the order they are tried
    pub fn sources(&self) -> Vec<CredentialSource> {
        self.providers.iter().map(|p| p.source()).collect()
    }

    /// Ask each provider in turn, stopping at the first that answers
    pub fn resolve(&self, log: &EventLog) -> Result<Credentials, AuthorizationError> {
        for provider in &self.providers {
            if let Some(credentials) = provider.provide(log)? {
                return Ok(credentials);
            }
        }
        Err(AuthorizationError::NoCredentials)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Credentials passed explicitly by the caller
#[derive(Debug, Clone, Default)]
pub struct OverrideCredentials {
    key_id: Option<String>,
    key: Option<String>,
}

impl OverrideCredentials {
    /// Wrap the optional key ID and key given on the command line
    pub fn new(key_id: Option<String>, key: Option<String>) -> Self {
        Self {
            key_id: non_empty(key_id),
            key: non_empty(key),
        }
    }
}

impl CredentialProvider for OverrideCredentials {
    fn source(&self) -> CredentialSource {
        CredentialSource::CommandLine
    }

    fn provide(&self, log: &EventLog) -> Result<Option<Credentials>, AuthorizationError> {
        match (&self.key_id, &self.key) {
            (Some(key_id), Some(key)) => {
                log.info("🔐 Using credentials from CLI override.");
                Ok(Some(Credentials {
                    key_id: key_id.clone(),
                    key: key.clone(),
                    source: self.source(),
                }))
            }
            (None, None) => Ok(None),
            _ => {
                log.warn("Ignoring CLI override: both a key ID and a key are required");
                Ok(None)
            }
        }
    }
}

type EnvLookup = Box<dyn Fn(&str) -> Option<String>>;

/// Credentials from `B2_APPLICATION_KEY_ID` and `B2_APPLICATION_KEY`
pub struct EnvCredentials {
    lookup: EnvLookup,
}

impl EnvCredentials {
    /// Read from the process environment
    pub fn new() -> Self {
        Self::with_lookup(|name| std::env::var(name).ok())
    }

    /// Read through `lookup` instead of the process environment
    pub fn with_lookup(lookup: impl Fn(&str) -> Option<String> + 'static) -> Self {
        Self {
            lookup: Box::new(lookup),
        }
    }
}

impl Default for EnvCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for EnvCredentials {
    fn source(&self) -> CredentialSource {
        CredentialSource::Environment
    }

    fn provide(&self, log: &EventLog) -> Result<Option<Credentials>, AuthorizationError> {
        let key_id = non_empty((self.lookup)(ENV_KEY_ID));
        let key = non_empty((self.lookup)(ENV_KEY));

        match (key_id, key) {
            (Some(key_id), Some(key)) => {
                log.info("🔐 Using credentials from environment variables.");
                Ok(Some(Credentials {
                    key_id,
                    key,
                    source: self.source(),
                }))
            }
            _ => Ok(None),
        }
    }
}

/// Credentials printed by the B2 command line tool
#[derive(Debug, Clone)]
pub struct CredentialTool {
    program: String,
    args: Vec<String>,
}

impl CredentialTool {
    /// `b2 account get`
    pub fn new() -> Self {
        Self::with_command(CREDENTIAL_TOOL, CREDENTIAL_TOOL_ARGS)
    }

    /// Run `program` with `args` instead
    pub fn with_command<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn missing(&self, log: &EventLog) -> AuthorizationError {
        log.error(&format!(
            "Command '{}' not found. Please install the B2 CLI or provide credentials.",
            self.program
        ));
        AuthorizationError::CredentialToolMissing {
            program: self.program.clone(),
        }
    }
}

impl Default for CredentialTool {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialProvider for CredentialTool {
    fn source(&self) -> CredentialSource {
        CredentialSource::CredentialTool
    }

    fn provide(&self, log: &EventLog) -> Result<Option<Credentials>, AuthorizationError> {
        let command_line = self.command_line();
        log.info(&format!("🔍 Trying to load credentials via `{command_line}`..."));

        let executable = which::which(&self.program).map_err(|_| self.missing(log))?;

        let output = Command::new(executable)
            .args(&self.args)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    self.missing(log)
                } else {
                    tool_failure(log, format!("could not run `{command_line}`: {e}"))
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(tool_failure(
                log,
                format!("`{command_line}` exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let (key_id, key) = parse_account_output(&stdout).map_err(|reason| tool_failure(log, reason))?;

        Ok(Some(Credentials {
            key_id,
            key,
            source: self.source(),
        }))
    }
}

fn tool_failure(log: &EventLog, reason: String) -> AuthorizationError {
    log.error(&format!(
        "Failed to get B2 credentials from CLI or environment: {reason}"
    ));
    AuthorizationError::CredentialToolFailure { reason }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountInfo {
    application_key_id: String,
    application_key: String,
}

/// Extract the key ID and key from `b2 account get` JSON output
pub fn parse_account_output(stdout: &str) -> Result<(String, String), String> {
    let info: AccountInfo = serde_json::from_str(stdout)
        .map_err(|e| format!("unexpected output from B2 CLI: {e}"))?;

    if info.application_key_id.is_empty() {
        return Err("B2 CLI output has an empty applicationKeyId".to_string());
    }
    if info.application_key.is_empty() {
        return Err("B2 CLI output has an empty applicationKey".to_string());
    }

    Ok((info.application_key_id, info.application_key))
}
