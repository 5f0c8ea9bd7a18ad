//! Core vocabulary: moods, contexts and the messages authored for them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// The user's self-reported emotional state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Good,
    Okay,
    Bad,
    Awful,
}

impl Mood {
    pub const ALL: [Mood; 4] = [Mood::Good, Mood::Okay, Mood::Bad, Mood::Awful];

    /// Wire name, as stored under `currentMood`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Good => "good",
            Mood::Okay => "okay",
            Mood::Bad => "bad",
            Mood::Awful => "awful",
        }
    }

    /// Capitalized name used by the audio asset naming convention.
    pub fn capitalized(&self) -> &'static str {
        match self {
            Mood::Good => "Good",
            Mood::Okay => "Okay",
            Mood::Bad => "Bad",
            Mood::Awful => "Awful",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Mood::Good),
            "okay" => Ok(Mood::Okay),
            "bad" => Ok(Mood::Bad),
            "awful" => Ok(Mood::Awful),
            other => Err(ParseError::UnknownMood(other.to_string())),
        }
    }
}

/// The user's situational state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Context {
    Safe,
    Moving,
    Focussed,
}

impl Context {
    pub const ALL: [Context; 3] = [Context::Safe, Context::Moving, Context::Focussed];

    /// The older two-valued context set.
    pub const LEGACY: [Context; 2] = [Context::Safe, Context::Moving];

    pub fn as_str(&self) -> &'static str {
        match self {
            Context::Safe => "safe",
            Context::Moving => "moving",
            Context::Focussed => "focussed",
        }
    }

    /// Name of this context in pre-rendered audio file names.
    pub fn audio_name(&self) -> &'static str {
        match self {
            Context::Safe => "Still",
            Context::Moving => "Move",
            Context::Focussed => "Focussed",
        }
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Context {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "safe" => Ok(Context::Safe),
            "moving" => Ok(Context::Moving),
            "focussed" => Ok(Context::Focussed),
            other => Err(ParseError::UnknownContext(other.to_string())),
        }
    }
}

/// What kind of micro-habit a message asks for.
///
/// Older content spells the third variant `REPEAT` or `REPEAT/RECITE`;
/// all spellings collapse into [`ActionType::Recite`] when the library is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    #[serde(rename = "ACTION")]
    Action,
    #[serde(rename = "VISUALIZE")]
    Visualize,
    #[serde(rename = "RECITE", alias = "REPEAT", alias = "REPEAT/RECITE")]
    Recite,
}

impl ActionType {
    /// Parse any known spelling, case-insensitively.
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "ACTION" => Some(ActionType::Action),
            "VISUALIZE" | "VISUALISE" => Some(ActionType::Visualize),
            "RECITE" | "REPEAT" | "REPEAT/RECITE" => Some(ActionType::Recite),
            _ => None,
        }
    }

    /// Label shown on the message tag.
    pub fn label(&self) -> &'static str {
        match self {
            ActionType::Action => "ACTION",
            ActionType::Visualize => "VISUALIZE",
            ActionType::Recite => "REPEAT/RECITE",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Gentle,
    Moderate,
    Strong,
}

/// A single pre-authored micro-habit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMessage {
    pub action_type: ActionType,
    pub message: String,
    /// Suggested seconds to keep the message on screen.
    pub display_time: u32,
    /// 1-based position inside its (mood, context) bucket; selects the
    /// matching pre-rendered narration file.
    pub audio_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
}
