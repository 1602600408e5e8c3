//! Backblaze B2 storage service collaborator.
//!
//! The session and workflow only see the [`Authorizer`] and [`StorageApi`]
//! traits. [`B2Client`] implements them over the B2 native HTTP API.

mod client;
mod wire;

pub use client::{AuthorizedB2, B2Client};

use crate::error::RemoteError;

/// A bucket the account can address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Service-assigned bucket ID
    pub id: String,
    /// Bucket name
    pub name: String,
}

/// A large file upload that was started but never finished or canceled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnfinishedUpload {
    /// Large file ID used to cancel the upload
    pub file_id: String,
    /// Name the file would have had
    pub file_name: String,
}

/// Turns an application key into an authorized storage handle.
#[allow(async_fn_in_trait)]
pub trait Authorizer {
    /// Authorized handle type
    type Api: StorageApi;

    /// Authorize the account with the given key
    async fn authorize_account(&self, key_id: &str, key: &str) -> Result<Self::Api, RemoteError>;
}

/// Operations the cleanup consumes from an authorized account.
#[allow(async_fn_in_trait)]
pub trait StorageApi {
    /// Every bucket visible to the account
    async fn list_buckets(&self) -> Result<Vec<Bucket>, RemoteError>;

    /// Exact-name lookup
    async fn get_bucket_by_name(&self, name: &str) -> Result<Bucket, RemoteError>;

    /// All unfinished large files in `bucket`, in service order
    async fn list_unfinished_large_files(
        &self,
        bucket: &Bucket,
    ) -> Result<Vec<UnfinishedUpload>, RemoteError>;

    /// Cancel one unfinished large file, freeing its uploaded parts
    async fn cancel_large_file(&self, file_id: &str) -> Result<(), RemoteError>;
}
