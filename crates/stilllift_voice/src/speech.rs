//! Speech synthesis capability provided by the host.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UtteranceId(pub u64);

impl fmt::Display for UtteranceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "utterance#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub id: UtteranceId,
    pub text: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// `None` uses the engine's default voice.
    pub voice: Option<Voice>,
}

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech synthesis not available")]
    Unavailable,
    #[error("speech engine error: {0}")]
    Engine(String),
}

/// Error codes a speech engine reports for an utterance after it was queued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechErrorKind {
    Interrupted,
    Canceled,
    NotAllowed,
    Other(String),
}

impl SpeechErrorKind {
    pub fn from_code(code: &str) -> Self {
        match code {
            "interrupted" => Self::Interrupted,
            "canceled" => Self::Canceled,
            "not-allowed" => Self::NotAllowed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Errors that follow from stopping or from autoplay policy, not from a fault.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::Interrupted | Self::Canceled | Self::NotAllowed)
    }
}

impl fmt::Display for SpeechErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interrupted => f.write_str("interrupted"),
            Self::Canceled => f.write_str("canceled"),
            Self::NotAllowed => f.write_str("not-allowed"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

pub trait SpeechSynthesizer: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    fn voices(&self) -> Vec<Voice>;

    /// Queue an utterance. Completion and errors are reported back to the
    /// narrator through `on_speech_end` / `on_speech_error`.
    fn speak(&self, utterance: Utterance) -> Result<(), SpeechError>;

    /// Drop the current and all queued utterances.
    fn cancel(&self);
}

/// First engine voice whose name contains any of the hints.
pub fn choose_voice(voices: &[Voice], hints: &[String]) -> Option<Voice> {
    if hints.is_empty() {
        return None;
    }
    voices
        .iter()
        .find(|v| hints.iter().any(|h| v.name.contains(h.as_str())))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choose_voice_walks_engine_order() {
        let voices = vec![
            Voice::new("Microsoft Zira", "en-US"),
            Voice::new("Samantha", "en-US"),
        ];
        let hints = vec!["Samantha".to_string(), "Zira".to_string()];
        assert_eq!(choose_voice(&voices, &hints).unwrap().name, "Microsoft Zira");
        assert!(choose_voice(&voices, &["Daniel".to_string()]).is_none());
        assert!(choose_voice(&voices, &[]).is_none());
    }

    #[test]
    fn test_error_codes() {
        assert!(SpeechErrorKind::from_code("interrupted").is_benign());
        assert!(SpeechErrorKind::from_code("not-allowed").is_benign());
        let other = SpeechErrorKind::from_code("synthesis-failed");
        assert!(!other.is_benign());
        assert_eq!(other.to_string(), "synthesis-failed");
    }
}
