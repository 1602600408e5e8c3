//! Authorized access to one B2 account.
//!
//! A [`Session`] is built once per run: credentials are resolved through a
//! [`CredentialChain`], the account is authorized, and the visible bucket
//! names are fetched once for later suggestions.

mod credentials;

pub use credentials::{
    CredentialChain, CredentialProvider, CredentialSource, CredentialTool, Credentials,
    EnvCredentials, OverrideCredentials, parse_account_output,
};

use crate::b2::{Authorizer, StorageApi};
use crate::error::{AuthorizationError, Result};
use crate::logging::EventLog;

/// Authorized account handle plus a snapshot of its bucket names
#[derive(Debug)]
pub struct Session<S> {
    api: S,
    bucket_names: Vec<String>,
}

impl<S: StorageApi> Session<S> {
    /// Resolve credentials, authorize, and fetch the bucket list
    ///
    /// Authorization failures are fatal: a 401 is `Rejected`, anything else
    /// surfaces as the remote error. A failed bucket listing only leaves the
    /// list empty.
    pub async fn establish<A>(
        authorizer: &A,
        credentials: &CredentialChain,
        log: &EventLog,
    ) -> Result<Self>
    where
        A: Authorizer<Api = S>,
    {
        let credentials = credentials.resolve(log)?;

        let api = match authorizer
            .authorize_account(&credentials.key_id, &credentials.key)
            .await
        {
            Ok(api) => api,
            Err(source) if source.is_unauthorized() => {
                log.error(&format!(
                    "Backblaze B2 rejected the application key from {}: {source}",
                    credentials.source
                ));
                return Err(AuthorizationError::Rejected {
                    origin: credentials.source,
                    source,
                }
                .into());
            }
            Err(source) => {
                log.error(&format!("Could not authorize with Backblaze B2: {source}"));
                return Err(source.into());
            }
        };

        log.success(&format!(
            "Authorized with {} credentials.",
            credentials.source
        ));

        let bucket_names = fetch_bucket_names(&api, log).await;
        Ok(Self::new(api, bucket_names))
    }

    /// Assemble a session from an already authorized handle
    pub fn new(api: S, bucket_names: Vec<String>) -> Self {
        Self { api, bucket_names }
    }

    /// Authorized storage handle
    pub fn api(&self) -> &S {
        &self.api
    }

    /// Bucket names visible when the session was established
    pub fn bucket_names(&self) -> &[String] {
        &self.bucket_names
    }
}

async fn fetch_bucket_names<S: StorageApi>(api: &S, log: &EventLog) -> Vec<String> {
    log.info("🔍 Fetching available buckets...");
    match api.list_buckets().await {
        Ok(buckets) => {
            let names: Vec<String> = buckets.into_iter().map(|b| b.name).collect();
            log.success(&format!("Found {} available buckets", names.len()));
            names
        }
        Err(e) => {
            log.warn(&format!("Could not fetch bucket list: {e}"));
            Vec::new()
        }
    }
}
