//! Navigation session state types

use crate::config::SessionConfig;
use crate::route::{NavigationStep, Route, RoutePreferences};
use crate::settings::{AudioSettings, Language};
use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::fmt::Display;
use std::time::Duration;

pub const CANCELLED_MESSAGE: &str = "Navigation cancelled. You can start a new route anytime.";
pub const REROUTE_STARTED_MESSAGE: &str = "Calculating alternative route...";
pub const REROUTE_COMPLETED_MESSAGE: &str =
    "Alternative route found. Updated directions will prioritize accessible paths.";
pub const SETTINGS_SAVED_MESSAGE: &str = "Audio settings updated successfully!";

/// Minutes each remaining step is assumed to take
const MINUTES_PER_STEP: usize = 2;

/// Default number of steps shown in the "coming up" list
pub const UPCOMING_STEP_COUNT: usize = 2;

// ============================================================================
// Session State
// ============================================================================

/// Where the user is in the route and what they prefer.
///
/// Fields are private: the only way to change a session is through the
/// named operations below, which the transition function drives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    route: Route,
    current_index: usize,
    audio_settings: AudioSettings,
    /// Empty when nothing has been said yet
    last_assistant_message: String,
    /// Number of reroutes requested so far; doubles as the next reroute id
    reroutes_started: u64,
}

impl SessionState {
    pub fn new(route: Route, audio_settings: AudioSettings) -> Self {
        Self {
            route,
            current_index: 0,
            audio_settings: audio_settings.clamped(),
            last_assistant_message: String::new(),
            reroutes_started: 0,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn steps(&self) -> &[NavigationStep] {
        self.route.steps()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn audio_settings(&self) -> &AudioSettings {
        &self.audio_settings
    }

    pub fn language(&self) -> Language {
        self.audio_settings.language
    }

    pub fn last_assistant_message(&self) -> &str {
        &self.last_assistant_message
    }

    pub fn current_step(&self) -> &NavigationStep {
        // current_index never leaves 0..route.len() and the route is non-empty
        &self.route.steps()[self.current_index]
    }

    /// Up to `count` steps strictly after the current one, never wrapping
    pub fn upcoming_steps(&self, count: usize) -> &[NavigationStep] {
        let start = self.current_index + 1;
        let end = start.saturating_add(count).min(self.route.len());
        self.route.steps().get(start..end).unwrap_or_default()
    }

    pub fn is_arrived(&self) -> bool {
        self.current_index == self.route.last_index()
    }

    /// Two minutes per remaining step (current included), never below one
    pub fn estimated_minutes_remaining(&self) -> usize {
        ((self.route.len() - self.current_index) * MINUTES_PER_STEP).max(1)
    }

    /// Wall-clock arrival time as `HH:MM`
    pub fn eta_clock<Tz>(&self, now: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let minutes = i64::try_from(self.estimated_minutes_remaining()).unwrap_or(i64::MAX);
        let arrival = now.clone() + chrono::Duration::minutes(minutes);
        arrival.format("%H:%M").to_string()
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Move to the next step. Returns false (and changes nothing) at the
    /// last step.
    pub fn advance(&mut self) -> bool {
        if self.current_index < self.route.last_index() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    pub fn cancel(&mut self) {
        self.current_index = 0;
        self.last_assistant_message = CANCELLED_MESSAGE.to_string();
    }

    /// Post the in-progress notice and hand out an id for the completion
    /// timer
    pub fn start_reroute(&mut self) -> u64 {
        self.reroutes_started += 1;
        self.last_assistant_message = REROUTE_STARTED_MESSAGE.to_string();
        self.reroutes_started
    }

    pub fn complete_reroute(&mut self) {
        self.last_assistant_message = REROUTE_COMPLETED_MESSAGE.to_string();
    }

    pub fn update_audio_settings(&mut self, next: AudioSettings) {
        self.audio_settings = next.clamped();
        self.last_assistant_message = SETTINGS_SAVED_MESSAGE.to_string();
    }

    pub(crate) fn set_language(&mut self, language: Language) {
        self.audio_settings.language = language;
    }

    pub(crate) fn say(&mut self, message: impl Into<String>) {
        self.last_assistant_message = message.into();
    }
}

// ============================================================================
// Session Context
// ============================================================================

/// Immutable configuration for one session
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub session_id: String,
    pub destination: String,
    pub preferences: RoutePreferences,
    /// Wait before auto-advancing from the current step
    pub advance_interval: Duration,
    /// Wait before a reroute reports completion
    pub reroute_delay: Duration,
}

impl SessionContext {
    pub fn new(session_id: impl Into<String>, config: &SessionConfig) -> Self {
        Self {
            session_id: session_id.into(),
            destination: config.destination.clone(),
            preferences: RoutePreferences {
                prefer_accessible_paths: config.prefer_accessible_paths,
                ..RoutePreferences::default()
            },
            advance_interval: config.advance_interval,
            reroute_delay: config.reroute_delay,
        }
    }

    /// Context with a fresh random session id
    pub fn generate(config: &SessionConfig) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), config)
    }
}
