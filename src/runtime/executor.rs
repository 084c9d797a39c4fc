//! Navigation session runtime executor

use super::traits::UpdateSink;
use super::SessionUpdate;

use crate::state_machine::transition::rearm_advance;
use crate::state_machine::{transition, Effect, Event, SessionContext, SessionState, UpdateReason};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Generic session runtime that can publish to any sink
pub struct SessionRuntime<U>
where
    U: UpdateSink + 'static,
{
    context: SessionContext,
    state: SessionState,
    sink: U,
    event_rx: mpsc::Receiver<Event>,
    /// Timers post back through this; weak so they don't keep the session
    /// alive once every handle is gone
    timer_tx: mpsc::WeakSender<Event>,
    /// Token for the pending auto-advance timer
    advance_timer: Option<CancellationToken>,
    shutdown: CancellationToken,
}

impl<U> SessionRuntime<U>
where
    U: UpdateSink + 'static,
{
    pub fn new(
        context: SessionContext,
        state: SessionState,
        sink: U,
        event_rx: mpsc::Receiver<Event>,
        timer_tx: mpsc::WeakSender<Event>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            context,
            state,
            sink,
            event_rx,
            timer_tx,
            advance_timer: None,
            shutdown,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(
            session_id = %self.context.session_id,
            steps = self.state.route().len(),
            destination = %self.context.destination,
            "Starting navigation session"
        );

        let rearm = rearm_advance(&self.state, &self.context);
        self.execute_effect(rearm).await;
        self.execute_effect(Effect::notify(UpdateReason::Started))
            .await;

        // Process events in a loop until shut down or every handle is dropped
        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => break,
                event = self.event_rx.recv() => match event {
                    Some(event) => self.process_event(event).await,
                    None => break,
                },
            }
        }

        self.cancel_advance_timer();
        tracing::info!(session_id = %self.context.session_id, "Navigation session stopped");
    }

    async fn process_event(&mut self, event: Event) {
        let kind = event.kind();

        // Pure state transition
        let result = match transition(&self.state, &self.context, event) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(
                    session_id = %self.context.session_id,
                    event = kind,
                    error = %e,
                    "Rejected event"
                );
                return;
            }
        };

        self.state = result.new_state;
        tracing::debug!(
            session_id = %self.context.session_id,
            event = kind,
            index = self.state.current_index(),
            effects = result.effects.len(),
            "Processed event"
        );

        for effect in result.effects {
            self.execute_effect(effect).await;
        }
    }

    async fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleAdvance { index, delay } => {
                self.cancel_advance_timer();
                let token = CancellationToken::new();
                self.advance_timer = Some(token.clone());
                spawn_timer(
                    self.timer_tx.clone(),
                    delay,
                    Event::AdvanceTimeout { index },
                    Some(token),
                );
            }

            Effect::CancelAdvance => self.cancel_advance_timer(),

            Effect::ScheduleRerouteCompletion { reroute_id, delay } => {
                tracing::info!(
                    session_id = %self.context.session_id,
                    reroute_id,
                    "Calculating alternative route"
                );
                spawn_timer(
                    self.timer_tx.clone(),
                    delay,
                    Event::RerouteTimeout { reroute_id },
                    None,
                );
            }

            Effect::NotifyClient { reason } => {
                self.sink
                    .publish(SessionUpdate {
                        reason,
                        state: self.state.clone(),
                    })
                    .await;
            }
        }
    }

    fn cancel_advance_timer(&mut self) {
        if let Some(token) = self.advance_timer.take() {
            token.cancel();
        }
    }
}

/// Post `event` back to the session after `delay`, unless `cancel` fires
/// first or the session is gone by then
fn spawn_timer(
    timer_tx: mpsc::WeakSender<Event>,
    delay: Duration,
    event: Event,
    cancel: Option<CancellationToken>,
) {
    tokio::spawn(async move {
        match cancel {
            Some(token) => {
                tokio::select! {
                    () = token.cancelled() => return,
                    () = tokio::time::sleep(delay) => {}
                }
            }
            None => tokio::time::sleep(delay).await,
        }

        if let Some(tx) = timer_tx.upgrade() {
            if tx.send(event).await.is_err() {
                tracing::debug!("Session closed before timer fired");
            }
        }
    });
}
