//! Request and response bodies of the B2 native API (v2).

use serde::{Deserialize, Serialize};

/// `b2_authorize_account` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct AuthorizeAccountResponse {
    pub account_id: String,
    pub authorization_token: String,
    pub api_url: String,
}

/// `b2_list_buckets` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListBucketsRequest<'a> {
    pub account_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ListBucketsResponse {
    pub buckets: Vec<BucketEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct BucketEntry {
    pub bucket_id: String,
    pub bucket_name: String,
}

/// `b2_list_unfinished_large_files` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListUnfinishedRequest<'a> {
    pub bucket_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_file_id: Option<&'a str>,
    pub max_file_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct ListUnfinishedResponse {
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub next_file_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct FileEntry {
    pub file_id: String,
    pub file_name: String,
}

/// `b2_cancel_large_file` request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CancelLargeFileRequest<'a> {
    pub file_id: &'a str,
}

/// `b2_cancel_large_file` response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CancelLargeFileResponse {
    pub file_id: String,
}

/// Error body returned with any non-2xx status
#[derive(Debug, Deserialize)]
pub(super) struct ApiErrorBody {
    pub status: u16,
    pub code: String,
    pub message: String,
}
