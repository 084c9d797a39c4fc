//! Effects produced by state transitions

use serde::Serialize;
use std::time::Duration;

/// What changed, so a renderer can decide what to announce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateReason {
    Started,
    StepAdvanced,
    Cancelled,
    RerouteStarted,
    RerouteCompleted,
    SettingsUpdated,
    AssistantReplied,
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Arm the auto-advance timer for `index`, replacing any pending one
    ScheduleAdvance { index: usize, delay: Duration },

    /// Drop the pending auto-advance timer, if any
    CancelAdvance,

    /// Start an independent reroute-completion timer. Never cancelled.
    ScheduleRerouteCompletion { reroute_id: u64, delay: Duration },

    /// Publish the new state to observers
    NotifyClient { reason: UpdateReason },
}

impl Effect {
    pub fn notify(reason: UpdateReason) -> Self {
        Effect::NotifyClient { reason }
    }
}
