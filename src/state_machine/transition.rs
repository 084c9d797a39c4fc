//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same
//! new state and effects. Timers and publishing happen in the runtime.

use super::effect::UpdateReason;
use super::{Effect, Event, SessionContext, SessionState};
use crate::assistant::{self, Reply};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: SessionState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: SessionState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Question is empty")]
    EmptyQuestion,
}

/// Pure transition function
pub fn transition(
    state: &SessionState,
    context: &SessionContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match event {
        // ============================================================
        // Step progression
        // ============================================================
        Event::UserAdvance => Ok(advance(state, context)),

        // Only the timer armed for the current position may advance it
        Event::AdvanceTimeout { index } if index == state.current_index() => {
            Ok(advance(state, context))
        }

        Event::AdvanceTimeout { index } => {
            tracing::debug!(
                timer_index = index,
                current_index = state.current_index(),
                "Ignoring stale advance timer"
            );
            Ok(TransitionResult::new(state.clone()))
        }

        // ============================================================
        // Cancellation
        // ============================================================
        Event::UserCancel => {
            let mut next = state.clone();
            next.cancel();
            let rearm = rearm_advance(&next, context);
            Ok(TransitionResult::new(next)
                .with_effect(rearm)
                .with_effect(Effect::notify(UpdateReason::Cancelled)))
        }

        // ============================================================
        // Rerouting
        // ============================================================
        Event::UserReroute => {
            let mut next = state.clone();
            let reroute_id = next.start_reroute();
            Ok(TransitionResult::new(next).with_effects([
                Effect::ScheduleRerouteCompletion {
                    reroute_id,
                    delay: context.reroute_delay,
                },
                Effect::notify(UpdateReason::RerouteStarted),
            ]))
        }

        // Every completion lands, even after a cancel or a newer reroute
        Event::RerouteTimeout { reroute_id } => {
            tracing::debug!(reroute_id, "Reroute completed");
            let mut next = state.clone();
            next.complete_reroute();
            Ok(TransitionResult::new(next)
                .with_effect(Effect::notify(UpdateReason::RerouteCompleted)))
        }

        // ============================================================
        // Settings
        // ============================================================
        Event::UserSettings { settings } => {
            let mut next = state.clone();
            next.update_audio_settings(settings);
            Ok(TransitionResult::new(next)
                .with_effect(Effect::notify(UpdateReason::SettingsUpdated)))
        }

        // ============================================================
        // Assistant
        // ============================================================
        Event::UserQuestion { text } => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyQuestion);
            }

            let answer = assistant::respond(&text, state, context);
            tracing::debug!(rule = answer.rule, "Assistant rule matched");

            match answer.reply {
                Reply::Reroute => transition(state, context, Event::UserReroute),
                Reply::Cancel => transition(state, context, Event::UserCancel),
                Reply::ChangeLanguage {
                    language,
                    confirmation,
                } => {
                    let mut next = state.clone();
                    next.set_language(language);
                    next.say(confirmation);
                    Ok(TransitionResult::new(next)
                        .with_effect(Effect::notify(UpdateReason::AssistantReplied)))
                }
                Reply::Say(message) => {
                    let mut next = state.clone();
                    next.say(message);
                    Ok(TransitionResult::new(next)
                        .with_effect(Effect::notify(UpdateReason::AssistantReplied)))
                }
            }
        }
    }
}

/// Timer effect for the state's current position: a fresh wait while
/// steps remain, otherwise nothing pending
pub(crate) fn rearm_advance(state: &SessionState, context: &SessionContext) -> Effect {
    if state.is_arrived() {
        Effect::CancelAdvance
    } else {
        Effect::ScheduleAdvance {
            index: state.current_index(),
            delay: context.advance_interval,
        }
    }
}

fn advance(state: &SessionState, context: &SessionContext) -> TransitionResult {
    let mut next = state.clone();
    if !next.advance() {
        // Already at the destination
        return TransitionResult::new(next);
    }
    let rearm = rearm_advance(&next, context);
    TransitionResult::new(next)
        .with_effect(rearm)
        .with_effect(Effect::notify(UpdateReason::StepAdvanced))
}
