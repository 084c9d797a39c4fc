//! Rule-based navigation assistant
//!
//! Maps a typed question to a canned reply by testing the lower-cased text
//! against an ordered table of keyword rules. The first rule whose keywords
//! appear anywhere in the question fires; later rules are not consulted.

use crate::settings::Language;
use crate::state_machine::{SessionContext, SessionState};

pub const LANGUAGE_OPTIONS_REPLY: &str =
    "Available languages: English, Spanish, French. Just say \"change to Spanish\" for example.";
pub const HELP_REPLY: &str = "I can help with: changing language, rerouting, estimated arrival time, current location, or canceling navigation.";
pub const FALLBACK_REPLY: &str =
    "I can help with navigation, language settings, rerouting, or time estimates. What would you like to know?";

/// What the assistant wants to happen in response to a question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Show text, change nothing else
    Say(String),
    /// Switch the spoken language and confirm in that language
    ChangeLanguage {
        language: Language,
        confirmation: &'static str,
    },
    /// Start a reroute; the reroute supplies its own messages
    Reroute,
    /// Cancel navigation; the cancellation supplies its own message
    Cancel,
}

/// A reply together with the rule that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub rule: &'static str,
    pub reply: Reply,
}

struct Rule {
    name: &'static str,
    keywords: &'static [&'static str],
    respond: fn(&str, &SessionState, &SessionContext) -> Reply,
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|keyword| lowered.contains(keyword))
    }
}

/// Evaluated top to bottom; order is significant
const RULES: &[Rule] = &[
    Rule {
        name: "language",
        keywords: &["language", "speak"],
        respond: language_reply,
    },
    Rule {
        name: "reroute",
        keywords: &["reroute", "alternative"],
        respond: |_, _, _| Reply::Reroute,
    },
    Rule {
        name: "cancel",
        keywords: &["cancel", "stop"],
        respond: |_, _, _| Reply::Cancel,
    },
    Rule {
        name: "eta",
        keywords: &["eta", "time", "arrive"],
        respond: |_, state, _| {
            Reply::Say(format!(
                "You should arrive in approximately {} minutes.",
                state.estimated_minutes_remaining()
            ))
        },
    },
    Rule {
        name: "location",
        keywords: &["where", "location"],
        respond: |_, state, ctx| {
            Reply::Say(format!(
                "You're currently on {}, heading to {}.",
                state.current_step().street,
                ctx.destination
            ))
        },
    },
    Rule {
        name: "help",
        keywords: &["help", "commands"],
        respond: |_, _, _| Reply::Say(HELP_REPLY.to_string()),
    },
    // A bare language name ("change to Spanish") only switches when no
    // other rule claimed the question
    Rule {
        name: "language_name",
        keywords: &["spanish", "french", "english"],
        respond: language_reply,
    },
];

fn language_reply(lowered: &str, _state: &SessionState, _ctx: &SessionContext) -> Reply {
    if lowered.contains("spanish") {
        Reply::ChangeLanguage {
            language: Language::Spanish,
            confirmation: "Language changed to Spanish. ¡Continuemos con la navegación!",
        }
    } else if lowered.contains("french") {
        Reply::ChangeLanguage {
            language: Language::French,
            confirmation: "Language changed to French. Continuons la navigation!",
        }
    } else if lowered.contains("english") {
        Reply::ChangeLanguage {
            language: Language::English,
            confirmation: "Language changed to English. Continuing navigation.",
        }
    } else {
        Reply::Say(LANGUAGE_OPTIONS_REPLY.to_string())
    }
}

/// Answer a question. Never fails: unmatched input gets the fallback reply.
pub fn respond(question: &str, state: &SessionState, context: &SessionContext) -> Answer {
    let lowered = question.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map_or_else(
            || Answer {
                rule: "fallback",
                reply: Reply::Say(FALLBACK_REPLY.to_string()),
            },
            |rule| Answer {
                rule: rule.name,
                reply: (rule.respond)(&lowered, state, context),
            },
        )
}
