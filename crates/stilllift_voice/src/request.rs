use stilllift_core::{Context, Mood, SelectedMessage};

/// Why a narration is playing. Lets callers stop only their own kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioIntent {
    Homepage,
    Task,
    Other,
}

/// Per-request speech overrides. Unset fields use the narrator's defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceOptions {
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
    /// Substrings of preferred voice names. Empty means the narrator's hints.
    pub voice_hints: Vec<String>,
}

/// Everything needed to narrate one message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NarrationRequest {
    pub title: Option<String>,
    pub message: String,
    pub mood: Option<Mood>,
    pub context: Option<Context>,
    /// 1-based position of the message in its bucket.
    pub audio_index: Option<u32>,
    /// Skip the index-1 fallback for multi-file buckets.
    pub prefer_exact_index: bool,
    pub is_homepage: bool,
    pub intent: Option<AudioIntent>,
    pub voice: VoiceOptions,
}

impl NarrationRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Narrate a selected message with its bucket's structured asset names.
    pub fn for_selection(selected: &SelectedMessage) -> Self {
        Self {
            title: selected.title.clone(),
            message: selected.message.clone(),
            mood: selected.mood,
            context: selected.context,
            audio_index: selected.audio_index,
            ..Default::default()
        }
    }

    /// Ambient narration for the landing screen.
    pub fn homepage(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_homepage: true,
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_mood_context(mut self, mood: Mood, context: Context) -> Self {
        self.mood = Some(mood);
        self.context = Some(context);
        self
    }

    pub fn with_audio_index(mut self, index: u32) -> Self {
        self.audio_index = Some(index);
        self
    }

    pub fn exact_index(mut self) -> Self {
        self.prefer_exact_index = true;
        self
    }

    pub fn with_intent(mut self, intent: AudioIntent) -> Self {
        self.intent = Some(intent);
        self
    }

    pub fn with_voice(mut self, voice: VoiceOptions) -> Self {
        self.voice = voice;
        self
    }

    pub(crate) fn resolved_intent(&self) -> AudioIntent {
        self.intent.unwrap_or(if self.is_homepage {
            AudioIntent::Homepage
        } else {
            AudioIntent::Task
        })
    }

    /// Title that actually counts: present and not blank.
    pub(crate) fn spoken_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }

    /// Text handed to speech synthesis when no file plays.
    pub fn speech_text(&self) -> String {
        match self.spoken_title() {
            Some(title) => format!("{}. {}", title, self.message),
            None => self.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_defaults() {
        assert_eq!(NarrationRequest::new("x").resolved_intent(), AudioIntent::Task);
        assert_eq!(NarrationRequest::homepage("x").resolved_intent(), AudioIntent::Homepage);
        assert_eq!(
            NarrationRequest::homepage("x")
                .with_intent(AudioIntent::Other)
                .resolved_intent(),
            AudioIntent::Other
        );
    }

    #[test]
    fn test_speech_text_ignores_blank_title() {
        assert_eq!(NarrationRequest::new("Breathe").with_title("  ").speech_text(), "Breathe");
        assert_eq!(
            NarrationRequest::new("Breathe").with_title("Be Gentle").speech_text(),
            "Be Gentle. Breathe"
        );
    }
}
