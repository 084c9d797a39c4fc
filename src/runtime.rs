//! Runtime for executing navigation sessions
//!
//! One task owns the session state, feeds events through the pure
//! transition function and carries out the resulting effects.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::SessionRuntime;
pub use traits::*;

use crate::settings::AudioSettings;
use crate::state_machine::{Event, SessionContext, SessionState, TransitionError, UpdateReason};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Snapshot published after every state change
#[derive(Debug, Clone)]
pub struct SessionUpdate {
    pub reason: UpdateReason,
    pub state: SessionState,
}

/// Errors returned to callers of a [`SessionHandle`]
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Navigation session has ended")]
    Closed,
    #[error(transparent)]
    Rejected(#[from] TransitionError),
}

/// Handle to interact with a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    event_tx: mpsc::Sender<Event>,
    shutdown: CancellationToken,
}

impl SessionHandle {
    /// Send a raw event to the session
    pub async fn send(&self, event: Event) -> Result<(), SessionError> {
        self.event_tx
            .send(event)
            .await
            .map_err(|_| SessionError::Closed)
    }

    pub async fn advance(&self) -> Result<(), SessionError> {
        self.send(Event::UserAdvance).await
    }

    pub async fn cancel(&self) -> Result<(), SessionError> {
        self.send(Event::UserCancel).await
    }

    pub async fn start_reroute(&self) -> Result<(), SessionError> {
        self.send(Event::UserReroute).await
    }

    pub async fn update_audio_settings(&self, settings: AudioSettings) -> Result<(), SessionError> {
        self.send(Event::UserSettings { settings }).await
    }

    /// Ask the assistant. Blank questions are rejected here and never
    /// reach the session.
    pub async fn submit_question(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TransitionError::EmptyQuestion.into());
        }
        self.send(Event::UserQuestion { text }).await
    }

    /// Stop the session; pending timers are dropped
    pub fn shutdown(&self) {
        self.shutdown.cancel();
    }
}

/// Start a session on the current tokio runtime
pub fn spawn_session<U>(
    context: SessionContext,
    initial_state: SessionState,
    sink: U,
) -> (SessionHandle, JoinHandle<()>)
where
    U: UpdateSink + 'static,
{
    let (event_tx, event_rx) = mpsc::channel(32);
    let shutdown = CancellationToken::new();

    let runtime = SessionRuntime::new(
        context,
        initial_state,
        sink,
        event_rx,
        event_tx.downgrade(),
        shutdown.clone(),
    );
    let task = tokio::spawn(runtime.run());

    (SessionHandle { event_tx, shutdown }, task)
}
