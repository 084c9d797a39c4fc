//! Events that can occur during a navigation session

use crate::settings::AudioSettings;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    // User events
    UserAdvance,
    UserCancel,
    UserReroute,
    UserSettings {
        settings: AudioSettings,
    },
    UserQuestion {
        text: String,
    },

    // Timer events
    /// The auto-advance timer armed for `index` elapsed
    AdvanceTimeout {
        index: usize,
    },
    /// A reroute started earlier finished calculating
    RerouteTimeout {
        reroute_id: u64,
    },
}

impl Event {
    pub fn question(text: impl Into<String>) -> Self {
        Event::UserQuestion { text: text.into() }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Event::UserAdvance => "user_advance",
            Event::UserCancel => "user_cancel",
            Event::UserReroute => "user_reroute",
            Event::UserSettings { .. } => "user_settings",
            Event::UserQuestion { .. } => "user_question",
            Event::AdvanceTimeout { .. } => "advance_timeout",
            Event::RerouteTimeout { .. } => "reroute_timeout",
        }
    }
}
