//! Synthetic speech preferences

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const MIN_SPEECH_RATE: f32 = 0.5;
pub const MAX_SPEECH_RATE: f32 = 2.0;
pub const MAX_VOLUME: u8 = 100;

/// Errors parsing settings input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("unsupported language: {0} (expected English, Spanish or French)")]
    UnknownLanguage(String),
    #[error("unsupported voice type: {0} (expected standard, calm or energetic)")]
    UnknownVoice(String),
    #[error("invalid value for {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("unknown setting: {0}")]
    UnknownField(String),
    #[error("expected key=value, got {0}")]
    Malformed(String),
}

/// Spoken language of the guidance voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::English, Language::Spanish, Language::French];

    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Spanish",
            Language::French => "French",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SettingsError::UnknownLanguage(s.to_string()))
    }
}

/// Character of the guidance voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoiceType {
    #[default]
    Standard,
    Calm,
    Energetic,
}

impl VoiceType {
    pub fn label(self) -> &'static str {
        match self {
            VoiceType::Standard => "Standard",
            VoiceType::Calm => "Calm",
            VoiceType::Energetic => "Energetic",
        }
    }
}

impl FromStr for VoiceType {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(VoiceType::Standard),
            "calm" => Ok(VoiceType::Calm),
            "energetic" => Ok(VoiceType::Energetic),
            _ => Err(SettingsError::UnknownVoice(s.to_string())),
        }
    }
}

/// Audio preference bundle; every field is always present
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AudioSettings {
    /// 0..=100
    pub volume: u8,
    pub voice_type: VoiceType,
    /// 0.5..=2.0, shown with one decimal
    pub speech_rate: f32,
    pub language: Language,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 80,
            voice_type: VoiceType::Standard,
            speech_rate: 1.0,
            language: Language::English,
        }
    }
}

impl AudioSettings {
    /// Copy with volume and speech rate pulled back into range
    #[must_use]
    pub fn clamped(self) -> Self {
        let speech_rate = if self.speech_rate.is_nan() {
            Self::default().speech_rate
        } else {
            self.speech_rate.clamp(MIN_SPEECH_RATE, MAX_SPEECH_RATE)
        };
        Self {
            volume: self.volume.min(MAX_VOLUME),
            speech_rate,
            ..self
        }
    }

    pub fn volume_label(&self) -> String {
        format!("{}%", self.volume)
    }

    pub fn speech_rate_label(&self) -> String {
        format!("{:.1}x", self.speech_rate)
    }

    /// Apply `key=value` pairs (volume, rate, voice, language) on top of
    /// these settings. Numbers out of range are clamped, not rejected.
    pub fn apply_pairs(self, input: &str) -> Result<Self, SettingsError> {
        let mut next = self;
        for pair in input.split_whitespace() {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| SettingsError::Malformed(pair.to_string()))?;
            match key.to_ascii_lowercase().as_str() {
                "volume" => {
                    let volume: i64 = value.parse().map_err(|_| SettingsError::InvalidNumber {
                        field: "volume",
                        value: value.to_string(),
                    })?;
                    next.volume = u8::try_from(volume.clamp(0, i64::from(MAX_VOLUME)))
                        .unwrap_or(MAX_VOLUME);
                }
                "rate" | "speech_rate" => {
                    next.speech_rate = value.parse().map_err(|_| SettingsError::InvalidNumber {
                        field: "speech_rate",
                        value: value.to_string(),
                    })?;
                }
                "voice" | "voice_type" => next.voice_type = value.parse()?,
                "language" | "lang" => next.language = value.parse()?,
                other => return Err(SettingsError::UnknownField(other.to_string())),
            }
        }
        Ok(next.clamped())
    }
}
