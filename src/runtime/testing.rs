//! Mock implementations for testing
//!
//! These mocks enable runtime testing without a rendering surface. Tests
//! run on a paused tokio clock so timer behavior is deterministic.

use super::traits::*;
use super::{spawn_session, SessionHandle, SessionUpdate};
use crate::config::SessionConfig;
use crate::route::Route;
use crate::settings::AudioSettings;
use crate::state_machine::{SessionContext, SessionState, UpdateReason};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Recording Sink
// ============================================================================

/// Sink that keeps every published update
#[derive(Default)]
pub struct RecordingSink {
    updates: Mutex<Vec<SessionUpdate>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<SessionUpdate> {
        self.updates.lock().unwrap().clone()
    }

    pub fn reasons(&self) -> Vec<UpdateReason> {
        self.updates
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.reason)
            .collect()
    }

    pub fn count(&self, reason: UpdateReason) -> usize {
        self.reasons().into_iter().filter(|r| *r == reason).count()
    }

    /// State from the most recent update
    pub fn latest(&self) -> Option<SessionState> {
        self.updates.lock().unwrap().last().map(|u| u.state.clone())
    }
}

#[async_trait]
impl UpdateSink for RecordingSink {
    async fn publish(&self, update: SessionUpdate) {
        self.updates.lock().unwrap().push(update);
    }
}

// ============================================================================
// Test Session
// ============================================================================

/// A running session wired to a recording sink
pub struct TestSession {
    pub handle: SessionHandle,
    pub sink: Arc<RecordingSink>,
    pub task: tokio::task::JoinHandle<()>,
}

pub struct TestSessionBuilder {
    route: Route,
    config: SessionConfig,
}

impl TestSession {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> TestSessionBuilder {
        TestSessionBuilder {
            route: Route::demo(),
            config: SessionConfig::default(),
        }
    }

    /// Let the session drain its queue. Costs one millisecond of
    /// (paused) clock time.
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    pub fn state(&self) -> SessionState {
        self.sink.latest().expect("session published nothing yet")
    }

    pub fn index(&self) -> usize {
        self.state().current_index()
    }

    pub fn message(&self) -> String {
        self.state().last_assistant_message().to_string()
    }
}

impl TestSessionBuilder {
    pub fn route(mut self, route: Route) -> Self {
        self.route = route;
        self
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> TestSession {
        let context = SessionContext::new("test-session", &self.config);
        let state = SessionState::new(
            self.route,
            AudioSettings {
                language: self.config.language,
                ..AudioSettings::default()
            },
        );
        let sink = Arc::new(RecordingSink::new());
        let (handle, task) = spawn_session(context, state, sink.clone());
        TestSession { handle, sink, task }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::SessionError;
    use crate::settings::{Language, VoiceType};
    use crate::state_machine::state::{
        CANCELLED_MESSAGE, REROUTE_COMPLETED_MESSAGE, REROUTE_STARTED_MESSAGE,
        SETTINGS_SAVED_MESSAGE,
    };
    use crate::state_machine::TransitionError;

    const INTERVAL: Duration = Duration::from_secs(15);

    #[tokio::test(start_paused = true)]
    async fn test_session_publishes_start() {
        let session = TestSession::new().build();
        session.settle().await;
        assert_eq!(session.sink.reasons(), vec![UpdateReason::Started]);
        assert_eq!(session.index(), 0);
        assert!(session.message().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_auto_advance_until_destination() {
        let session = TestSession::new().build();
        session.settle().await;

        tokio::time::sleep(INTERVAL).await;
        assert_eq!(session.index(), 1);

        tokio::time::sleep(INTERVAL * 3).await;
        assert_eq!(session.index(), 4);
        assert!(session.state().is_arrived());

        // Nothing more happens at the destination
        tokio::time::sleep(INTERVAL * 4).await;
        assert_eq!(session.index(), 4);
        assert_eq!(session.sink.count(UpdateReason::StepAdvanced), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_advance_restarts_wait() {
        let session = TestSession::new().build();
        session.settle().await;

        tokio::time::sleep(Duration::from_secs(10)).await;
        session.handle.advance().await.unwrap();
        session.settle().await;
        assert_eq!(session.index(), 1);

        // The timer armed at startup would have fired at 15s
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(session.index(), 1);

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(session.index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_resets_and_restarts_wait() {
        let session = TestSession::new().build();
        session.settle().await;

        tokio::time::sleep(Duration::from_secs(31)).await;
        assert_eq!(session.index(), 2);

        session.handle.cancel().await.unwrap();
        session.settle().await;
        assert_eq!(session.index(), 0);
        assert_eq!(session.message(), CANCELLED_MESSAGE);

        // The timer for step 2 would have fired at 45s
        tokio::time::sleep(Duration::from_secs(14)).await;
        assert_eq!(session.index(), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(session.index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_reroute_both_complete() {
        let session = TestSession::new().build();
        session.settle().await;

        session.handle.start_reroute().await.unwrap();
        session.settle().await;
        assert_eq!(session.message(), REROUTE_STARTED_MESSAGE);

        tokio::time::sleep(Duration::from_millis(500)).await;
        session.handle.start_reroute().await.unwrap();
        session.settle().await;
        assert_eq!(session.sink.count(UpdateReason::RerouteStarted), 2);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(session.sink.count(UpdateReason::RerouteCompleted), 1);
        assert_eq!(session.message(), REROUTE_COMPLETED_MESSAGE);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(session.sink.count(UpdateReason::RerouteCompleted), 2);
        assert_eq!(session.message(), REROUTE_COMPLETED_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reroute_completion_overwrites_cancel() {
        let session = TestSession::new().build();
        session.settle().await;

        session.handle.advance().await.unwrap();
        session.handle.start_reroute().await.unwrap();
        session.handle.cancel().await.unwrap();
        session.settle().await;
        assert_eq!(session.message(), CANCELLED_MESSAGE);

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(session.message(), REROUTE_COMPLETED_MESSAGE);
        assert_eq!(session.index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_questions_through_handle() {
        let session = TestSession::new().build();
        session.settle().await;

        session.handle.submit_question("Where am I?").await.unwrap();
        session.settle().await;
        assert_eq!(
            session.message(),
            "You're currently on Main Street, heading to Community Center."
        );

        session
            .handle
            .submit_question("speak french")
            .await
            .unwrap();
        session.settle().await;
        assert_eq!(session.state().language(), Language::French);

        let err = session.handle.submit_question("  ").await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Rejected(TransitionError::EmptyQuestion)
        ));
        session.settle().await;
        assert_eq!(session.sink.count(UpdateReason::AssistantReplied), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_question_reroute_runs_timer() {
        let session = TestSession::new().build();
        session.settle().await;

        session
            .handle
            .submit_question("is there an alternative?")
            .await
            .unwrap();
        session.settle().await;
        assert_eq!(session.message(), REROUTE_STARTED_MESSAGE);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(session.message(), REROUTE_COMPLETED_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_settings_update() {
        let session = TestSession::new().build();
        session.settle().await;

        session
            .handle
            .update_audio_settings(AudioSettings {
                volume: 55,
                voice_type: VoiceType::Energetic,
                speech_rate: 1.5,
                language: Language::Spanish,
            })
            .await
            .unwrap();
        session.settle().await;

        let state = session.state();
        assert_eq!(state.audio_settings().volume, 55);
        assert_eq!(state.audio_settings().voice_type, VoiceType::Energetic);
        assert_eq!(state.language(), Language::Spanish);
        assert_eq!(state.last_assistant_message(), SETTINGS_SAVED_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_intervals() {
        let config = SessionConfig {
            advance_interval: Duration::from_secs(5),
            reroute_delay: Duration::from_millis(100),
            ..SessionConfig::default()
        };
        let session = TestSession::new().config(config).build();
        session.settle().await;

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(session.index(), 1);

        session.handle.start_reroute().await.unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(session.message(), REROUTE_COMPLETED_MESSAGE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_runtime() {
        let session = TestSession::new().build();
        session.settle().await;

        session.handle.shutdown();
        tokio::time::timeout(Duration::from_secs(1), session.task)
            .await
            .expect("runtime did not stop")
            .unwrap();

        let err = session.handle.advance().await.unwrap_err();
        assert!(matches!(err, SessionError::Closed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_handle_ends_session() {
        let TestSession { handle, sink, task } = TestSession::new().build();
        tokio::time::sleep(Duration::from_millis(1)).await;

        drop(handle);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .expect("runtime did not stop")
            .unwrap();

        // The pending advance timer never lands
        tokio::time::sleep(INTERVAL * 2).await;
        assert_eq!(sink.count(UpdateReason::StepAdvanced), 0);
    }
}
