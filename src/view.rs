//! Read-only snapshot of a session for rendering surfaces

use crate::route::NavigationStep;
use crate::state_machine::state::UPCOMING_STEP_COUNT;
use crate::state_machine::{SessionContext, SessionState};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt;

/// One step as a renderer shows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub marker: &'static str,
    pub instruction: String,
    pub street: String,
    pub distance: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lane_guidance: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_description: Option<String>,
}

impl From<&NavigationStep> for StepView {
    fn from(step: &NavigationStep) -> Self {
        let non_empty = |text: &str| (!text.trim().is_empty()).then(|| text.to_string());
        Self {
            marker: step.arrow.marker(),
            instruction: step.instruction.clone(),
            street: step.street.clone(),
            distance: step.distance.clone(),
            lane_guidance: non_empty(&step.lane_guidance),
            path_description: non_empty(&step.path_description),
        }
    }
}

/// Everything the navigation screen displays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub current: StepView,
    pub upcoming: Vec<StepView>,
    pub minutes_remaining: usize,
    /// Arrival clock time, `HH:MM`
    pub eta: String,
    pub destination: String,
    pub route_type: &'static str,
    pub language: String,
    pub volume: String,
    pub voice: &'static str,
    pub speech_rate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_message: Option<String>,
    pub arrived: bool,
}

impl SessionView {
    pub fn capture<Tz>(state: &SessionState, context: &SessionContext, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let settings = state.audio_settings();
        let message = state.last_assistant_message();
        Self {
            current: StepView::from(state.current_step()),
            upcoming: state
                .upcoming_steps(UPCOMING_STEP_COUNT)
                .iter()
                .map(StepView::from)
                .collect(),
            minutes_remaining: state.estimated_minutes_remaining(),
            eta: state.eta_clock(now),
            destination: context.destination.clone(),
            route_type: context.preferences.route_type_label(),
            language: settings.language.to_string(),
            volume: settings.volume_label(),
            voice: settings.voice_type.label(),
            speech_rate: settings.speech_rate_label(),
            assistant_message: (!message.is_empty()).then(|| message.to_string()),
            arrived: state.is_arrived(),
        }
    }
}

impl fmt::Display for SessionView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = &self.current;
        writeln!(f, "{}  {}", current.marker, current.instruction)?;
        writeln!(f, "   {} · {}", current.street, current.distance)?;
        if let Some(lanes) = &current.lane_guidance {
            writeln!(f, "   Lane Guidance: {lanes}")?;
        }
        if let Some(path) = &current.path_description {
            writeln!(f, "   Path Description: {path}")?;
        }

        if !self.upcoming.is_empty() {
            writeln!(f, "Coming Up")?;
            for step in &self.upcoming {
                writeln!(
                    f,
                    "   {} {} ({} · {})",
                    step.marker, step.instruction, step.street, step.distance
                )?;
            }
        }

        writeln!(
            f,
            "ETA {} · {} min left · {} · {}",
            self.eta, self.minutes_remaining, self.destination, self.route_type
        )?;
        writeln!(
            f,
            "Voice: {} {} at {}, volume {}",
            self.language, self.voice, self.speech_rate, self.volume
        )?;
        if let Some(message) = &self.assistant_message {
            writeln!(f, "Assistant: {message}")?;
        }
        Ok(())
    }
}
