//! Notification orchestration.
//!
//! Drives one notification run end to end: decide whether to skip, render
//! the message once, post it to every configured room in order, and
//! aggregate the per-room outcomes. A run never fails the invoking
//! pipeline; everything it has to say is said through log lines and the
//! returned report.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Settings;
use crate::credentials::CredentialStore;
use crate::delivery::{DeliveryClient, DeliveryError};
use crate::message::{Message, MessageFormat};
use crate::template;

/// Marker substituted with the pipeline result label on post-run triggers
const BUILD_RESULT_VAR: &str = "${BUILD_RESULT}";

/// The one HTTP status treated as a successful post
const EXPECTED_STATUS: u16 = 200;

/// Terminal pipeline result labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PipelineResult {
    Success,
    Failure,
    Aborted,
    Unstable,
}

impl PipelineResult {
    /// The label as the pipeline spells it
    pub fn label(&self) -> &'static str {
        match self {
            PipelineResult::Success => "SUCCESS",
            PipelineResult::Failure => "FAILURE",
            PipelineResult::Aborted => "ABORTED",
            PipelineResult::Unstable => "UNSTABLE",
        }
    }
}

/// How the step was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Mid-pipeline build step; result filters do not apply
    Step,
    /// After the pipeline finished with the given result
    PostRun { result: PipelineResult },
}

/// Why a run ended without any delivery attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Notifications are disabled in configuration
    Disabled,
    /// A skip flag matched the pipeline result
    ResultFilter(PipelineResult),
    /// No message template is configured
    NoMessage,
    /// No rooms are configured
    NoRooms,
}

/// What happened for one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeDetail {
    /// The exchange completed with this status
    HttpStatus(u16),
    /// The API server never produced a response
    TransportFailure,
    /// No usable bearer token for this attempt
    AuthFailure,
    /// Unclassified failure during the attempt
    InternalFailure,
}

/// Per-room delivery record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub room_id: String,
    pub succeeded: bool,
    pub detail: OutcomeDetail,
}

/// Aggregate result of one notification run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Set when the run ended before any delivery attempt
    pub skip: Option<SkipReason>,
    /// One record per attempted room, in send order
    pub outcomes: Vec<RunOutcome>,
}

impl RunReport {
    fn skipped(reason: SkipReason) -> Self {
        RunReport {
            skip: Some(reason),
            outcomes: Vec::new(),
        }
    }

    /// True iff every attempted delivery succeeded (vacuously for skips)
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.succeeded)
    }
}

/// Single-use notification orchestrator.
///
/// Construct one per invocation from the job settings, a credential store
/// capability, a delivery client, and the pipeline's environment
/// snapshot; `run` consumes it.
pub struct Notifier {
    settings: Settings,
    store: Arc<dyn CredentialStore>,
    client: DeliveryClient,
    env: HashMap<String, String>,
}

impl Notifier {
    pub fn new(
        settings: Settings,
        store: Arc<dyn CredentialStore>,
        client: DeliveryClient,
        env: HashMap<String, String>,
    ) -> Self {
        Self {
            settings,
            store,
            client,
            env,
        }
    }

    /// Run the notification step.
    ///
    /// Infallible by design: skips and per-room failures are folded into
    /// the report, and the step counts as complete either way. Rooms are
    /// notified strictly one at a time, in configured order, and a failed
    /// room never aborts the rest.
    pub async fn run(self, trigger: Trigger) -> RunReport {
        if self.settings.disable {
            info!("notifications are disabled, skipping");
            return RunReport::skipped(SkipReason::Disabled);
        }

        let mut content = self.settings.message.clone();

        if let Trigger::PostRun { result } = trigger {
            content = content.replace(BUILD_RESULT_VAR, result.label());
            if let Some(reason) = self.result_filter(result) {
                return RunReport::skipped(reason);
            }
        }

        if content.is_empty() {
            info!("skipping notifications because no message was defined");
            return RunReport::skipped(SkipReason::NoMessage);
        }

        if self.settings.rooms.is_empty() {
            info!("skipping notifications because no rooms were defined");
            return RunReport::skipped(SkipReason::NoRooms);
        }

        let format = self.settings.message_type;
        let rendered = template::render(&content, |name| self.env.get(name).cloned());

        let mut outcomes = Vec::with_capacity(self.settings.rooms.len());
        for room in &self.settings.rooms {
            info!("sending message to room: {}", room.id);
            outcomes.push(self.notify_room(&room.id, &rendered, format).await);
        }

        if outcomes.iter().all(|outcome| outcome.succeeded) {
            info!("messages posted successfully");
        } else {
            warn!("issues occurred posting messages");
        }

        RunReport {
            skip: None,
            outcomes,
        }
    }

    /// The skip flag matching the pipeline result, if it is set
    fn result_filter(&self, result: PipelineResult) -> Option<SkipReason> {
        let skip = &self.settings.skip;
        let matched = match result {
            PipelineResult::Success => skip.on_success,
            PipelineResult::Failure => skip.on_failure,
            PipelineResult::Aborted => skip.on_aborted,
            PipelineResult::Unstable => skip.on_unstable,
        };
        if matched {
            info!(
                "skipping notifications because the pipeline result is {}",
                result.label()
            );
            Some(SkipReason::ResultFilter(result))
        } else {
            None
        }
    }

    /// One delivery attempt; every failure kind folds into the outcome.
    ///
    /// The credential is resolved freshly for every attempt; nothing is
    /// cached across rooms.
    async fn notify_room(&self, room_id: &str, body: &str, format: MessageFormat) -> RunOutcome {
        let token = match self
            .store
            .resolve_token(&self.settings.credential_id)
            .await
        {
            Ok(token) => token,
            Err(error) => {
                warn!("could not post message: {error}; was the right credential selected?");
                return RunOutcome {
                    room_id: room_id.to_string(),
                    succeeded: false,
                    detail: OutcomeDetail::AuthFailure,
                };
            }
        };

        let message = Message::build(room_id, body, format);
        match self.client.send(&message, &token).await {
            Ok(status) => {
                if status != EXPECTED_STATUS {
                    warn!("could not post message, response code: {status}");
                }
                RunOutcome {
                    room_id: room_id.to_string(),
                    succeeded: status == EXPECTED_STATUS,
                    detail: OutcomeDetail::HttpStatus(status),
                }
            }
            Err(DeliveryError::Transport(_)) => {
                warn!(
                    "could not post message because the API server did not provide a response; \
                     this is likely intermittent"
                );
                RunOutcome {
                    room_id: room_id.to_string(),
                    succeeded: false,
                    detail: OutcomeDetail::TransportFailure,
                }
            }
            Err(DeliveryError::Internal(error)) => {
                warn!("could not post message because of an unknown issue: {error:#}");
                RunOutcome {
                    room_id: room_id.to_string(),
                    succeeded: false,
                    detail: OutcomeDetail::InternalFailure,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use wiremock::matchers::{body_string_contains, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::{NotifyError, NotifyResult};
    use crate::room::RoomTarget;

    const ROOM_1: &str = "0b48c8cc-93e2-4026-a140-a568c2457b45";
    const ROOM_2: &str = "5e9ad54c-01f4-4e2c-a06e-8b78c0ebc87e";
    const ROOM_3: &str = "9f3f7ab2-6d66-41f2-9e4b-55d2c53b30a1";

    /// Hands out a fixed token and counts resolutions
    struct CountingStore {
        token: String,
        calls: AtomicUsize,
    }

    impl CountingStore {
        fn new(token: &str) -> Self {
            Self {
                token: token.to_string(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CredentialStore for CountingStore {
        async fn resolve_token(&self, credential_id: &str) -> NotifyResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if credential_id == "spark-bot" {
                Ok(self.token.clone())
            } else {
                Err(NotifyError::auth(format!(
                    "no credential found for id '{credential_id}'"
                )))
            }
        }
    }

    /// Rejects everything, the way a store holding the wrong kind would
    struct WrongKindStore;

    #[async_trait]
    impl CredentialStore for WrongKindStore {
        async fn resolve_token(&self, _credential_id: &str) -> NotifyResult<String> {
            Err(NotifyError::auth(
                "invalid credential kind, only a bearer token can be used",
            ))
        }
    }

    fn settings(rooms: &[&str]) -> Settings {
        Settings {
            message: "hello rooms".to_string(),
            credential_id: "spark-bot".to_string(),
            rooms: rooms
                .iter()
                .map(|id| RoomTarget {
                    name: "room".to_string(),
                    id: id.to_string(),
                })
                .collect(),
            ..Settings::default()
        }
    }

    fn notifier_for(settings: Settings, store: Arc<dyn CredentialStore>, url: &str) -> Notifier {
        Notifier::new(
            settings,
            store,
            DeliveryClient::new(url),
            HashMap::new(),
        )
    }

    #[tokio::test]
    async fn test_disabled_run_makes_no_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let mut config = settings(&[ROOM_1]);
        config.disable = true;
        let store = Arc::new(CountingStore::new("token-123"));
        let report = notifier_for(config, store.clone(), &server.uri())
            .run(Trigger::Step)
            .await;

        assert_eq!(report.skip, Some(SkipReason::Disabled));
        assert!(report.all_succeeded());
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_message_skips() {
        let mut config = settings(&[ROOM_1]);
        config.message = String::new();
        let store = Arc::new(CountingStore::new("token-123"));
        let report = notifier_for(config, store, "http://127.0.0.1:9")
            .run(Trigger::Step)
            .await;

        assert_eq!(report.skip, Some(SkipReason::NoMessage));
        assert!(report.outcomes.is_empty());
    }

    #[tokio::test]
    async fn test_empty_room_list_skips_with_success() {
        let config = settings(&[]);
        let store = Arc::new(CountingStore::new("token-123"));
        let report = notifier_for(config, store, "http://127.0.0.1:9")
            .run(Trigger::Step)
            .await;

        assert_eq!(report.skip, Some(SkipReason::NoRooms));
        assert!(report.all_succeeded());
    }

    #[tokio::test]
    async fn test_skip_flag_matching_result_skips() {
        let mut config = settings(&[ROOM_1]);
        config.skip.on_failure = true;
        let store = Arc::new(CountingStore::new("token-123"));
        let report = notifier_for(config, store.clone(), "http://127.0.0.1:9")
            .run(Trigger::PostRun {
                result: PipelineResult::Failure,
            })
            .await;

        assert_eq!(
            report.skip,
            Some(SkipReason::ResultFilter(PipelineResult::Failure))
        );
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_skip_flag_for_other_result_does_not_skip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = settings(&[ROOM_1]);
        config.skip.on_failure = true;
        let store = Arc::new(CountingStore::new("token-123"));
        let report = notifier_for(config, store, &server.uri())
            .run(Trigger::PostRun {
                result: PipelineResult::Success,
            })
            .await;

        assert_eq!(report.skip, None);
        assert!(report.all_succeeded());
    }

    #[tokio::test]
    async fn test_build_result_substituted_before_rendering() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("build 42 ended with SUCCESS"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = settings(&[ROOM_1]);
        config.message = "build ${BUILD_NUMBER} ended with ${BUILD_RESULT}".to_string();
        let store = Arc::new(CountingStore::new("token-123"));
        let env = HashMap::from([("BUILD_NUMBER".to_string(), "42".to_string())]);
        let notifier = Notifier::new(
            config,
            store,
            DeliveryClient::new(server.uri()),
            env,
        );
        let report = notifier
            .run(Trigger::PostRun {
                result: PipelineResult::Success,
            })
            .await;

        assert!(report.all_succeeded());
    }

    #[tokio::test]
    async fn test_step_trigger_leaves_result_marker_for_env_rendering() {
        let server = MockServer::start().await;
        // Without a post-run result the marker falls through to the
        // environment lookup and resolves to empty
        Mock::given(method("POST"))
            .and(body_string_contains("result: ."))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = settings(&[ROOM_1]);
        config.message = "result: ${BUILD_RESULT}.".to_string();
        let store = Arc::new(CountingStore::new("token-123"));
        let report = notifier_for(config, store, &server.uri())
            .run(Trigger::Step)
            .await;

        assert!(report.all_succeeded());
    }

    #[tokio::test]
    async fn test_failed_room_does_not_abort_the_rest() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains(ROOM_2))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains(ROOM_1))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains(ROOM_3))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = settings(&[ROOM_1, ROOM_2, ROOM_3]);
        let store = Arc::new(CountingStore::new("token-123"));
        let report = notifier_for(config, store.clone(), &server.uri())
            .run(Trigger::Step)
            .await;

        assert_eq!(report.outcomes.len(), 3);
        assert!(!report.all_succeeded());
        assert_eq!(report.outcomes[0].detail, OutcomeDetail::HttpStatus(200));
        assert_eq!(report.outcomes[1].detail, OutcomeDetail::HttpStatus(503));
        assert!(!report.outcomes[1].succeeded);
        assert_eq!(report.outcomes[2].detail, OutcomeDetail::HttpStatus(200));
        // One fresh resolution per attempt
        assert_eq!(store.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_credential_failure_never_reaches_the_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = settings(&[ROOM_1, ROOM_2]);
        let report = notifier_for(config, Arc::new(WrongKindStore), &server.uri())
            .run(Trigger::Step)
            .await;

        assert_eq!(report.outcomes.len(), 2);
        assert!(!report.all_succeeded());
        assert!(
            report
                .outcomes
                .iter()
                .all(|outcome| outcome.detail == OutcomeDetail::AuthFailure)
        );
    }

    #[tokio::test]
    async fn test_transport_failure_is_classified() {
        let config = settings(&[ROOM_1]);
        let store = Arc::new(CountingStore::new("token-123"));
        let report = notifier_for(config, store, "http://127.0.0.1:9")
            .run(Trigger::Step)
            .await;

        assert_eq!(report.outcomes.len(), 1);
        assert_eq!(report.outcomes[0].detail, OutcomeDetail::TransportFailure);
    }

    #[tokio::test]
    async fn test_unvalidated_room_id_is_still_attempted() {
        // Room-id validation is advisory and never re-runs before a send
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let config = settings(&["not-a-valid-room-id"]);
        let store = Arc::new(CountingStore::new("token-123"));
        let report = notifier_for(config, store, &server.uri())
            .run(Trigger::Step)
            .await;

        assert!(report.all_succeeded());
    }

    #[tokio::test]
    async fn test_duplicate_rooms_are_notified_twice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&server)
            .await;

        let config = settings(&[ROOM_1, ROOM_1]);
        let store = Arc::new(CountingStore::new("token-123"));
        let report = notifier_for(config, store, &server.uri())
            .run(Trigger::Step)
            .await;

        assert_eq!(report.outcomes.len(), 2);
        assert!(report.all_succeeded());
    }
}
