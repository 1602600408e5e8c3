mod common;

use std::cell::RefCell;
use std::rc::Rc;

use b2_cleanup::logging::Level;
use b2_cleanup::session::{CredentialTool, EnvCredentials, OverrideCredentials};
use b2_cleanup::{
    AuthorizationError, CleanupError, CredentialChain, CredentialProvider, CredentialSource,
    Credentials, EventLog, RemoteError, Session,
};
use common::{FakeAuthorizer, FakeStorage};

/// Provider that records when it was asked
struct RecordingProvider {
    source: CredentialSource,
    answer: Option<(&'static str, &'static str)>,
    asked: Rc<RefCell<Vec<CredentialSource>>>,
}

impl CredentialProvider for RecordingProvider {
    fn source(&self) -> CredentialSource {
        self.source
    }

    fn provide(&self, _log: &EventLog) -> Result<Option<Credentials>, AuthorizationError> {
        self.asked.borrow_mut().push(self.source);
        Ok(self.answer.map(|(key_id, key)| Credentials {
            key_id: key_id.to_string(),
            key: key.to_string(),
            source: self.source,
        }))
    }
}

fn recording_chain(
    answers: [Option<(&'static str, &'static str)>; 3],
) -> (CredentialChain, Rc<RefCell<Vec<CredentialSource>>>) {
    let asked = Rc::new(RefCell::new(Vec::new()));
    let sources = [
        CredentialSource::CommandLine,
        CredentialSource::Environment,
        CredentialSource::CredentialTool,
    ];
    let providers = sources
        .into_iter()
        .zip(answers)
        .map(|(source, answer)| {
            Box::new(RecordingProvider {
                source,
                answer,
                asked: Rc::clone(&asked),
            }) as Box<dyn CredentialProvider>
        })
        .collect();
    (CredentialChain::new(providers), asked)
}

#[test]
fn test_command_line_wins_over_everything() {
    let (chain, asked) = recording_chain([
        Some(("cli-id", "cli-key")),
        Some(("env-id", "env-key")),
        Some(("tool-id", "tool-key")),
    ]);
    let log = EventLog::capturing();

    let credentials = chain.resolve(&log).unwrap();

    assert_eq!(credentials.key_id, "cli-id");
    assert_eq!(credentials.source, CredentialSource::CommandLine);
    assert_eq!(*asked.borrow(), vec![CredentialSource::CommandLine]);
}

#[test]
fn test_environment_wins_over_tool() {
    let (chain, asked) = recording_chain([
        None,
        Some(("env-id", "env-key")),
        Some(("tool-id", "tool-key")),
    ]);
    let log = EventLog::capturing();

    let credentials = chain.resolve(&log).unwrap();

    assert_eq!(credentials.source, CredentialSource::Environment);
    assert_eq!(
        *asked.borrow(),
        vec![CredentialSource::CommandLine, CredentialSource::Environment]
    );
}

#[test]
fn test_tool_is_last_resort() {
    let (chain, asked) = recording_chain([None, None, Some(("tool-id", "tool-key"))]);
    let log = EventLog::capturing();

    let credentials = chain.resolve(&log).unwrap();

    assert_eq!(credentials.source, CredentialSource::CredentialTool);
    assert_eq!(asked.borrow().len(), 3);
}

#[test]
fn test_no_source_answers() {
    let (chain, _) = recording_chain([None, None, None]);
    let log = EventLog::capturing();

    let err = chain.resolve(&log).unwrap_err();

    assert!(matches!(err, AuthorizationError::NoCredentials));
}

#[test]
fn test_real_providers_in_priority_order() {
    let env = || {
        EnvCredentials::with_lookup(|name| match name {
            "B2_APPLICATION_KEY_ID" => Some("env-id".to_string()),
            "B2_APPLICATION_KEY" => Some("env-key".to_string()),
            _ => None,
        })
    };
    let unreachable_tool = || CredentialTool::with_command("b2-cleanup-no-such-tool", ["account", "get"]);
    let log = EventLog::capturing();

    let with_override = CredentialChain::new(vec![
        Box::new(OverrideCredentials::new(
            Some("cli-id".to_string()),
            Some("cli-key".to_string()),
        )),
        Box::new(env()),
        Box::new(unreachable_tool()),
    ]);
    assert_eq!(with_override.resolve(&log).unwrap().key_id, "cli-id");

    let without_override = CredentialChain::new(vec![
        Box::new(OverrideCredentials::new(None, None)),
        Box::new(env()),
        Box::new(unreachable_tool()),
    ]);
    let credentials = without_override.resolve(&log).unwrap();
    assert_eq!(credentials.key_id, "env-id");
    assert_eq!(credentials.key, "env-key");
}

#[test]
fn test_missing_tool_reports_distinct_error() {
    let chain = CredentialChain::new(vec![
        Box::new(OverrideCredentials::new(None, None)),
        Box::new(EnvCredentials::with_lookup(|_| None)),
        Box::new(CredentialTool::with_command(
            "b2-cleanup-no-such-tool",
            ["account", "get"],
        )),
    ]);
    let log = EventLog::capturing();

    let err = chain.resolve(&log).unwrap_err();

    assert!(matches!(err, AuthorizationError::CredentialToolMissing { .. }));
    let err = CleanupError::from(err);
    assert_eq!(
        err.to_string(),
        "B2 CLI not found. Please install it or provide credentials manually."
    );
    assert!(log.records().iter().any(|r| r.level == Level::Error));
}

#[cfg(unix)]
#[test]
fn test_tool_output_is_parsed() {
    let tool = CredentialTool::with_command(
        "sh",
        [
            "-c",
            r#"echo '{"applicationKeyId": "tool-id", "applicationKey": "tool-key"}'"#,
        ],
    );
    let log = EventLog::capturing();

    let credentials = tool.provide(&log).unwrap().unwrap();

    assert_eq!(credentials.key_id, "tool-id");
    assert_eq!(credentials.key, "tool-key");
    assert_eq!(credentials.source, CredentialSource::CredentialTool);
}

#[cfg(unix)]
#[test]
fn test_tool_failure_is_not_missing() {
    let tool = CredentialTool::with_command("sh", ["-c", "echo 'not logged in' >&2; exit 1"]);
    let log = EventLog::capturing();

    let err = tool.provide(&log).unwrap_err();

    assert!(matches!(
        err,
        AuthorizationError::CredentialToolFailure { ref reason } if reason.contains("not logged in")
    ));
}

#[tokio::test]
async fn test_establish_fetches_bucket_names() {
    let storage = FakeStorage::new().with_bucket("alpha").with_bucket("beta");
    let authorizer = FakeAuthorizer::accepting(storage.clone());
    let (chain, _) = recording_chain([None, Some(("env-id", "env-key")), None]);
    let log = EventLog::capturing();

    let session = Session::establish(&authorizer, &chain, &log).await.unwrap();

    assert_eq!(session.bucket_names(), ["alpha", "beta"]);
    assert_eq!(storage.list_bucket_calls(), 1);
    assert_eq!(
        authorizer.attempts(),
        vec![("env-id".to_string(), "env-key".to_string())]
    );
    assert!(
        log.records()
            .iter()
            .any(|r| r.message == "Authorized with environment variables credentials.")
    );
}

#[tokio::test]
async fn test_rejected_credentials_do_not_fall_through() {
    let storage = FakeStorage::new().with_bucket("alpha");
    let authorizer = FakeAuthorizer::accepting_only(storage.clone(), "tool-id", "tool-key");
    let (chain, asked) = recording_chain([
        None,
        Some(("env-id", "wrong-key")),
        Some(("tool-id", "tool-key")),
    ]);
    let log = EventLog::capturing();

    let err = Session::establish(&authorizer, &chain, &log).await.unwrap_err();

    assert!(matches!(
        err,
        CleanupError::Authorization(AuthorizationError::Rejected {
            origin: CredentialSource::Environment,
            ..
        })
    ));
    assert_eq!(authorizer.attempts().len(), 1);
    assert_eq!(asked.borrow().len(), 2);
    assert_eq!(storage.list_bucket_calls(), 0);
}

#[tokio::test]
async fn test_bucket_list_failure_is_a_warning() {
    let storage = FakeStorage::new().with_bucket("alpha").failing_bucket_list();
    let authorizer = FakeAuthorizer::accepting(storage);
    let (chain, _) = recording_chain([Some(("cli-id", "cli-key")), None, None]);
    let log = EventLog::capturing();

    let session = Session::establish(&authorizer, &chain, &log).await.unwrap();

    assert!(session.bucket_names().is_empty());
    assert!(log.records().iter().any(|r| r.level == Level::Warning));
    assert!(!log.records().iter().any(|r| r.level == Level::Error));
}

#[tokio::test]
async fn test_service_failure_is_not_a_rejection() {
    let storage = FakeStorage::new().with_bucket("alpha");
    let authorizer = FakeAuthorizer::failing_with(storage.clone(), 503);
    let (chain, _) = recording_chain([None, Some(("env-id", "env-key")), None]);
    let log = EventLog::capturing();

    let err = Session::establish(&authorizer, &chain, &log).await.unwrap_err();

    assert!(matches!(
        err,
        CleanupError::Remote(RemoteError::Api { status: 503, .. })
    ));
    assert!(
        !err.recovery_suggestions()
            .iter()
            .any(|s| s.contains("Verify the application key"))
    );
    assert_eq!(storage.list_bucket_calls(), 0);
}

#[tokio::test]
async fn test_unauthorized_is_a_rejection_with_key_hint() {
    let storage = FakeStorage::new();
    let authorizer = FakeAuthorizer::failing_with(storage, 401);
    let (chain, _) = recording_chain([Some(("cli-id", "cli-key")), None, None]);
    let log = EventLog::capturing();

    let err = Session::establish(&authorizer, &chain, &log).await.unwrap_err();

    assert!(matches!(
        err,
        CleanupError::Authorization(AuthorizationError::Rejected {
            origin: CredentialSource::CommandLine,
            ..
        })
    ));
    assert_eq!(
        err.recovery_suggestions()[0],
        "Verify the application key supplied via command line override"
    );
}
