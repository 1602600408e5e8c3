//! Shared test doubles for b2_cleanup integration tests.
//!
//! `FakeStorage` stands in for an authorized B2 account, `FakeAuthorizer`
//! for the authorization endpoint, and `ScriptedPrompter` for the operator.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use b2_cleanup::{
    Authorizer, Bucket, CleanupConfig, Prompter, RemoteError, Session, StorageApi,
    UnfinishedUpload,
};

/// Calls observed by a `FakeStorage` and its clones.
#[derive(Debug, Default)]
pub struct StorageCalls {
    pub list_buckets: usize,
    pub lookups: Vec<String>,
    pub listings: Vec<String>,
    pub cancels: Vec<String>,
}

/// In-memory account with a fixed set of buckets and unfinished uploads.
#[derive(Debug, Clone, Default)]
pub struct FakeStorage {
    buckets: Vec<Bucket>,
    inaccessible: HashSet<String>,
    uploads: HashMap<String, Vec<UnfinishedUpload>>,
    list_fails: bool,
    cancel_fails_for: Option<String>,
    pub calls: Rc<RefCell<StorageCalls>>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bucket that is both listed and accessible.
    pub fn with_bucket(mut self, name: &str) -> Self {
        self.buckets.push(Bucket {
            id: format!("id-{name}"),
            name: name.to_string(),
        });
        self
    }

    /// Add a bucket that is listed but refuses direct lookup.
    pub fn with_inaccessible_bucket(mut self, name: &str) -> Self {
        self = self.with_bucket(name);
        self.inaccessible.insert(name.to_string());
        self
    }

    /// Give `bucket` unfinished uploads named `<file_id>.bin`.
    pub fn with_uploads(mut self, bucket: &str, file_ids: &[&str]) -> Self {
        let uploads = file_ids
            .iter()
            .map(|id| UnfinishedUpload {
                file_id: id.to_string(),
                file_name: format!("{id}.bin"),
            })
            .collect();
        self.uploads.insert(format!("id-{bucket}"), uploads);
        self
    }

    pub fn failing_bucket_list(mut self) -> Self {
        self.list_fails = true;
        self
    }

    pub fn failing_cancel_for(mut self, file_id: &str) -> Self {
        self.cancel_fails_for = Some(file_id.to_string());
        self
    }

    pub fn bucket_names(&self) -> Vec<String> {
        self.buckets.iter().map(|b| b.name.clone()).collect()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.calls.borrow().lookups.clone()
    }

    pub fn cancels(&self) -> Vec<String> {
        self.calls.borrow().cancels.clone()
    }

    pub fn list_bucket_calls(&self) -> usize {
        self.calls.borrow().list_buckets
    }

    /// Session over this account with its bucket names pre-fetched.
    pub fn session(&self) -> Session<FakeStorage> {
        Session::new(self.clone(), self.bucket_names())
    }
}

fn api_error(operation: &'static str, status: u16, code: &str) -> RemoteError {
    RemoteError::Api {
        operation,
        status,
        code: code.to_string(),
        message: format!("{operation} refused"),
    }
}

impl StorageApi for FakeStorage {
    async fn list_buckets(&self) -> Result<Vec<Bucket>, RemoteError> {
        self.calls.borrow_mut().list_buckets += 1;
        if self.list_fails {
            return Err(api_error("b2_list_buckets", 401, "unauthorized"));
        }
        Ok(self.buckets.clone())
    }

    async fn get_bucket_by_name(&self, name: &str) -> Result<Bucket, RemoteError> {
        self.calls.borrow_mut().lookups.push(name.to_string());
        if self.inaccessible.contains(name) {
            return Err(api_error("b2_list_buckets", 401, "unauthorized"));
        }
        self.buckets
            .iter()
            .find(|b| b.name == name)
            .cloned()
            .ok_or_else(|| RemoteError::BucketNotFound {
                name: name.to_string(),
            })
    }

    async fn list_unfinished_large_files(
        &self,
        bucket: &Bucket,
    ) -> Result<Vec<UnfinishedUpload>, RemoteError> {
        self.calls.borrow_mut().listings.push(bucket.name.clone());
        Ok(self.uploads.get(&bucket.id).cloned().unwrap_or_default())
    }

    async fn cancel_large_file(&self, file_id: &str) -> Result<(), RemoteError> {
        self.calls.borrow_mut().cancels.push(file_id.to_string());
        if self.cancel_fails_for.as_deref() == Some(file_id) {
            return Err(api_error("b2_cancel_large_file", 500, "internal_error"));
        }
        Ok(())
    }
}

/// Authorization endpoint that accepts one key pair.
#[derive(Debug, Clone)]
pub struct FakeAuthorizer {
    storage: FakeStorage,
    accepted: Option<(String, String)>,
    failure_status: Option<u16>,
    pub attempts: Rc<RefCell<Vec<(String, String)>>>,
}

impl FakeAuthorizer {
    /// Accept any key pair.
    pub fn accepting(storage: FakeStorage) -> Self {
        Self {
            storage,
            accepted: None,
            failure_status: None,
            attempts: Rc::default(),
        }
    }

    /// Answer every attempt with `status`
    pub fn failing_with(storage: FakeStorage, status: u16) -> Self {
        Self {
            failure_status: Some(status),
            ..Self::accepting(storage)
        }
    }

    /// Accept only `key_id`/`key`.
    pub fn accepting_only(storage: FakeStorage, key_id: &str, key: &str) -> Self {
        Self {
            storage,
            accepted: Some((key_id.to_string(), key.to_string())),
            failure_status: None,
            attempts: Rc::default(),
        }
    }

    pub fn attempts(&self) -> Vec<(String, String)> {
        self.attempts.borrow().clone()
    }
}

impl Authorizer for FakeAuthorizer {
    type Api = FakeStorage;

    async fn authorize_account(&self, key_id: &str, key: &str) -> Result<FakeStorage, RemoteError> {
        self.attempts
            .borrow_mut()
            .push((key_id.to_string(), key.to_string()));

        if let Some(status) = self.failure_status {
            return Err(api_error("b2_authorize_account", status, "service_unavailable"));
        }

        match &self.accepted {
            Some((id, secret)) if id != key_id || secret != key => {
                Err(api_error("b2_authorize_account", 401, "unauthorized"))
            }
            _ => Ok(self.storage.clone()),
        }
    }
}

/// Operator that answers from a script; an exhausted script reads as empty input.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<String>>,
    pub questions: RefCell<Vec<String>>,
    pub menus: RefCell<Vec<Vec<String>>>,
}

impl ScriptedPrompter {
    pub fn answering(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
            ..Self::default()
        }
    }

    pub fn silent() -> Self {
        Self::default()
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.borrow().clone()
    }

    pub fn menus(&self) -> Vec<Vec<String>> {
        self.menus.borrow().clone()
    }
}

impl Prompter for ScriptedPrompter {
    fn show_choices(&self, items: &[String]) {
        self.menus.borrow_mut().push(items.to_vec());
    }

    fn ask(&self, prompt: &str) -> std::io::Result<String> {
        self.questions.borrow_mut().push(prompt.to_string());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or_default())
    }
}

pub fn config(dry_run: bool) -> CleanupConfig {
    CleanupConfig {
        dry_run,
        ..CleanupConfig::default()
    }
}
