//! The user's current pick: a snapshot of one content message together with
//! the mood and context it was chosen for.

use crate::library::ContentLibrary;
use crate::model::{ActionType, ContentMessage, Context, Mood};
use crate::presentation::{accent_color, AnimationSpeed, PresentationMetadata, RevealType};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Snapshot persisted under `selectedMessage`.
///
/// Older sessions stored card-shaped objects (`title`, `message`, `tag`), so
/// everything except the text is optional when reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub message: String,
    #[serde(default, alias = "tag", skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
}

impl SelectedMessage {
    pub fn from_content(mood: Mood, context: Context, content: &ContentMessage) -> Self {
        Self {
            title: None,
            message: content.message.clone(),
            action_type: Some(content.action_type),
            display_time: Some(content.display_time),
            audio_index: Some(content.audio_index),
            mood: Some(mood),
            context: Some(context),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// A snapshot with no text cannot be shown and counts as absent.
    pub fn is_displayable(&self) -> bool {
        !self.message.trim().is_empty()
    }

    /// Recompute presentation. Snapshots missing mood or context get the
    /// treasure chest at the `rich` pace.
    pub fn derive_presentation(&self) -> PresentationMetadata {
        match (self.mood, self.context) {
            (Some(mood), Some(context)) => PresentationMetadata::derive(mood, context, self.action_type),
            _ => PresentationMetadata {
                reveal_type: RevealType::TreasureChest,
                accent_color: accent_color(self.action_type),
                animation_speed: AnimationSpeed::Rich,
            },
        }
    }
}

/// Pick a fresh message for the pair. Calling again is "try another".
pub fn pick(library: &ContentLibrary, mood: Mood, context: Context) -> Option<SelectedMessage> {
    pick_with(library, mood, context, &mut rand::thread_rng())
}

pub fn pick_with<R: Rng + ?Sized>(
    library: &ContentLibrary,
    mood: Mood,
    context: Context,
    rng: &mut R,
) -> Option<SelectedMessage> {
    let chosen = library.random_message_with(mood, context, rng);
    if chosen.is_none() {
        tracing::warn!("No content for {}-{}; nothing to show", mood, context);
    }
    chosen.map(|content| SelectedMessage::from_content(mood, context, content))
}
