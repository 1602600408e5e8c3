//! reqwest client for the B2 native API.

use super::wire::{
    ApiErrorBody, AuthorizeAccountResponse, CancelLargeFileRequest, CancelLargeFileResponse,
    ListBucketsRequest, ListBucketsResponse, ListUnfinishedRequest, ListUnfinishedResponse,
};
use super::{Authorizer, Bucket, StorageApi, UnfinishedUpload};
use crate::config::UNFINISHED_PAGE_SIZE;
use crate::error::RemoteError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

const API_VERSION_PATH: &str = "b2api/v2/";

/// Unauthorized client bound to a realm
#[derive(Debug, Clone)]
pub struct B2Client {
    http: reqwest::Client,
    realm: Url,
}

impl B2Client {
    /// Create a client for the realm at `realm_url`
    pub fn new(realm_url: &str) -> Result<Self, RemoteError> {
        let realm = Url::parse(realm_url)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("b2_cleanup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| RemoteError::Transport {
                operation: "client_init",
                source,
            })?;

        Ok(Self { http, realm })
    }
}

impl Authorizer for B2Client {
    type Api = AuthorizedB2;

    async fn authorize_account(&self, key_id: &str, key: &str) -> Result<AuthorizedB2, RemoteError> {
        const OPERATION: &str = "b2_authorize_account";

        let url = endpoint(&self.realm, OPERATION)?;
        log::debug!("GET {url}");

        let response = self
            .http
            .get(url)
            .basic_auth(key_id, Some(key))
            .send()
            .await
            .map_err(|source| RemoteError::Transport {
                operation: OPERATION,
                source,
            })?;

        let auth: AuthorizeAccountResponse = decode(OPERATION, response).await?;
        log::debug!("Authorized account {} against {}", auth.account_id, auth.api_url);

        Ok(AuthorizedB2 {
            http: self.http.clone(),
            api_url: Url::parse(&auth.api_url)?,
            account_id: auth.account_id,
            token: auth.authorization_token,
        })
    }
}

/// Handle to an authorized account
#[derive(Clone)]
pub struct AuthorizedB2 {
    http: reqwest::Client,
    api_url: Url,
    account_id: String,
    token: String,
}

impl std::fmt::Debug for AuthorizedB2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedB2")
            .field("api_url", &self.api_url.as_str())
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}

impl AuthorizedB2 {
    async fn call<Req, Resp>(&self, operation: &'static str, body: &Req) -> Result<Resp, RemoteError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = endpoint(&self.api_url, operation)?;
        log::debug!("POST {url}");

        let response = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, &self.token)
            .json(body)
            .send()
            .await
            .map_err(|source| RemoteError::Transport { operation, source })?;

        decode(operation, response).await
    }
}

impl StorageApi for AuthorizedB2 {
    async fn list_buckets(&self) -> Result<Vec<Bucket>, RemoteError> {
        let request = ListBucketsRequest {
            account_id: &self.account_id,
            bucket_name: None,
        };
        let response: ListBucketsResponse = self.call("b2_list_buckets", &request).await?;
        Ok(response.buckets.into_iter().map(Into::into).collect())
    }

    async fn get_bucket_by_name(&self, name: &str) -> Result<Bucket, RemoteError> {
        let request = ListBucketsRequest {
            account_id: &self.account_id,
            bucket_name: Some(name),
        };
        let response: ListBucketsResponse = self.call("b2_list_buckets", &request).await?;

        response
            .buckets
            .into_iter()
            .find(|entry| entry.bucket_name == name)
            .map(Into::into)
            .ok_or_else(|| RemoteError::BucketNotFound {
                name: name.to_string(),
            })
    }

    async fn list_unfinished_large_files(
        &self,
        bucket: &Bucket,
    ) -> Result<Vec<UnfinishedUpload>, RemoteError> {
        let mut uploads = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let request = ListUnfinishedRequest {
                bucket_id: &bucket.id,
                start_file_id: cursor.as_deref(),
                max_file_count: UNFINISHED_PAGE_SIZE,
            };
            let page: ListUnfinishedResponse =
                self.call("b2_list_unfinished_large_files", &request).await?;

            cursor = absorb_page(&mut uploads, page);
            if cursor.is_none() {
                break;
            }
        }

        Ok(uploads)
    }

    async fn cancel_large_file(&self, file_id: &str) -> Result<(), RemoteError> {
        let response: CancelLargeFileResponse = self
            .call("b2_cancel_large_file", &CancelLargeFileRequest { file_id })
            .await?;
        log::debug!("Canceled large file {}", response.file_id);
        Ok(())
    }
}

impl From<super::wire::BucketEntry> for Bucket {
    fn from(entry: super::wire::BucketEntry) -> Self {
        Self {
            id: entry.bucket_id,
            name: entry.bucket_name,
        }
    }
}

fn endpoint(base: &Url, operation: &str) -> Result<Url, RemoteError> {
    Ok(base.join(API_VERSION_PATH)?.join(operation)?)
}

/// Append a page of unfinished uploads and return the cursor for the next one
fn absorb_page(uploads: &mut Vec<UnfinishedUpload>, page: ListUnfinishedResponse) -> Option<String> {
    uploads.extend(page.files.into_iter().map(|file| UnfinishedUpload {
        file_id: file.file_id,
        file_name: file.file_name,
    }));
    page.next_file_id
}

async fn decode<T: DeserializeOwned>(
    operation: &'static str,
    response: reqwest::Response,
) -> Result<T, RemoteError> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|source| RemoteError::Transport { operation, source })?;

    decode_body(operation, status, &body)
}

/// Map a status and body to the expected payload or an API error
///
/// Error bodies that are not B2 JSON keep the raw text as the message.
fn decode_body<T: DeserializeOwned>(
    operation: &'static str,
    status: u16,
    body: &str,
) -> Result<T, RemoteError> {
    if !(200..300).contains(&status) {
        let err: ApiErrorBody = serde_json::from_str(body).unwrap_or_else(|_| ApiErrorBody {
            status,
            code: "unknown".to_string(),
            message: body.trim().to_string(),
        });
        return Err(RemoteError::Api {
            operation,
            status: err.status,
            code: err.code,
            message: err.message,
        });
    }

    serde_json::from_str(body).map_err(|e| RemoteError::Api {
        operation,
        status,
        code: "invalid_response".to_string(),
        message: e.to_string(),
    })
}
