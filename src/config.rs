//! Session configuration from the environment

use crate::route::Route;
use crate::settings::Language;
use std::time::Duration;
use thiserror::Error;

pub const ADVANCE_SECS_VAR: &str = "WAYFINDER_ADVANCE_SECS";
pub const REROUTE_MS_VAR: &str = "WAYFINDER_REROUTE_MS";
pub const DESTINATION_VAR: &str = "WAYFINDER_DESTINATION";
pub const LANGUAGE_VAR: &str = "WAYFINDER_LANGUAGE";
pub const ACCESSIBLE_VAR: &str = "WAYFINDER_ACCESSIBLE";

const DEFAULT_ADVANCE_INTERVAL: Duration = Duration::from_secs(15);
const DEFAULT_REROUTE_DELAY: Duration = Duration::from_millis(2000);
const DEFAULT_DESTINATION: &str = "Community Center";

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

/// Tunables for a navigation session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub advance_interval: Duration,
    pub reroute_delay: Duration,
    pub destination: String,
    pub language: Language,
    pub prefer_accessible_paths: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            advance_interval: DEFAULT_ADVANCE_INTERVAL,
            reroute_delay: DEFAULT_REROUTE_DELAY,
            destination: DEFAULT_DESTINATION.to_string(),
            language: Language::default(),
            prefer_accessible_paths: true,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source; unset variables keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ADVANCE_SECS_VAR) {
            let secs = parse_positive(ADVANCE_SECS_VAR, &value)?;
            config.advance_interval = Duration::from_secs(secs);
        }
        if let Some(value) = lookup(REROUTE_MS_VAR) {
            let millis = parse_positive(REROUTE_MS_VAR, &value)?;
            config.reroute_delay = Duration::from_millis(millis);
        }
        if let Some(value) = lookup(DESTINATION_VAR) {
            if value.trim().is_empty() {
                return Err(ConfigError {
                    var: DESTINATION_VAR,
                    value,
                    reason: "must not be blank".to_string(),
                });
            }
            config.destination = value.trim().to_string();
        }
        if let Some(value) = lookup(LANGUAGE_VAR) {
            config.language = value.parse().map_err(|e: crate::settings::SettingsError| {
                ConfigError {
                    var: LANGUAGE_VAR,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }
        if let Some(value) = lookup(ACCESSIBLE_VAR) {
            config.prefer_accessible_paths = parse_bool(ACCESSIBLE_VAR, &value)?;
        }

        Ok(config)
    }

    /// The configured destination must name the route's terminal street,
    /// otherwise the assistant would announce a place the route never reaches
    pub fn check_route(&self, route: &Route) -> Result<(), ConfigError> {
        if self.destination == route.destination() {
            return Ok(());
        }
        Err(ConfigError {
            var: DESTINATION_VAR,
            value: self.destination.clone(),
            reason: format!("route ends at {:?}", route.destination()),
        })
    }
}

fn parse_positive(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        Ok(_) => Err(ConfigError {
            var,
            value: value.to_string(),
            reason: "must be greater than zero".to_string(),
        }),
        Err(e) => Err(ConfigError {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError {
            var,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
