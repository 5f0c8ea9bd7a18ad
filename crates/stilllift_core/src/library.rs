//! The Content Library: an immutable table of micro-habit messages keyed by
//! (mood, context).
//!
//! The canonical table is authored as JSON and compiled into the crate. It is
//! parsed once on first use and never mutated afterwards. Every query is
//! infallible: an absent pair is simply an empty bucket.

use crate::error::ContentError;
use crate::model::{ContentMessage, Context, Intensity, Mood};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

const EMBEDDED_LIBRARY: &str = include_str!("../content/library.json");

static EMBEDDED: LazyLock<ContentLibrary> = LazyLock::new(|| {
    ContentLibrary::from_json(EMBEDDED_LIBRARY).unwrap_or_else(|e| {
        tracing::error!("Embedded content library failed to parse: {}", e);
        ContentLibrary::default()
    })
});

/// The library compiled into this crate.
pub fn embedded() -> &'static ContentLibrary {
    &EMBEDDED
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentLibrary {
    buckets: BTreeMap<Mood, BTreeMap<Context, Vec<ContentMessage>>>,
}

impl ContentLibrary {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load an alternative library from a JSON file on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Build a library from explicit buckets. Mostly useful in tests.
    pub fn from_buckets(
        buckets: impl IntoIterator<Item = ((Mood, Context), Vec<ContentMessage>)>,
    ) -> Self {
        let mut library = Self::default();
        for ((mood, context), messages) in buckets {
            library
                .buckets
                .entry(mood)
                .or_default()
                .insert(context, messages);
        }
        library
    }

    /// Every message for the pair, in authored order. Empty if the pair is absent.
    pub fn all_messages(&self, mood: Mood, context: Context) -> &[ContentMessage] {
        self.buckets
            .get(&mood)
            .and_then(|contexts| contexts.get(&context))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// A uniformly chosen message, or `None` for an empty bucket.
    pub fn random_message(&self, mood: Mood, context: Context) -> Option<&ContentMessage> {
        self.random_message_with(mood, context, &mut rand::thread_rng())
    }

    pub fn random_message_with<R: Rng + ?Sized>(
        &self,
        mood: Mood,
        context: Context,
        rng: &mut R,
    ) -> Option<&ContentMessage> {
        self.all_messages(mood, context).choose(rng)
    }

    /// Up to `count` distinct messages in uniformly shuffled order.
    pub fn random_messages(&self, mood: Mood, context: Context, count: usize) -> Vec<&ContentMessage> {
        self.random_messages_with(mood, context, count, &mut rand::thread_rng())
    }

    pub fn random_messages_with<R: Rng + ?Sized>(
        &self,
        mood: Mood,
        context: Context,
        count: usize,
        rng: &mut R,
    ) -> Vec<&ContentMessage> {
        let mut shuffled: Vec<&ContentMessage> = self.all_messages(mood, context).iter().collect();
        shuffled.shuffle(rng);
        shuffled.truncate(count);
        shuffled
    }

    /// Positional lookup by 1-based audio index.
    pub fn message_at(&self, mood: Mood, context: Context, audio_index: u32) -> Option<&ContentMessage> {
        let position = usize::try_from(audio_index).ok()?.checked_sub(1)?;
        self.all_messages(mood, context).get(position)
    }

    pub fn messages_by_category(&self, mood: Mood, context: Context, category: &str) -> Vec<&ContentMessage> {
        self.all_messages(mood, context)
            .iter()
            .filter(|m| m.category.as_deref() == Some(category))
            .collect()
    }

    pub fn messages_by_intensity(
        &self,
        mood: Mood,
        context: Context,
        intensity: Intensity,
    ) -> Vec<&ContentMessage> {
        self.all_messages(mood, context)
            .iter()
            .filter(|m| m.intensity == Some(intensity))
            .collect()
    }

    /// Total number of messages across all buckets.
    pub fn len(&self) -> usize {
        self.buckets
            .values()
            .flat_map(|contexts| contexts.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check the authoring invariants: every pair populated, every message
    /// well-formed, every audio index equal to its position.
    pub fn validate(&self) -> ValidationReport {
        let mut errors = Vec::new();

        for mood in Mood::ALL {
            let Some(contexts) = self.buckets.get(&mood) else {
                errors.push(format!("Missing content for mood: {}", mood));
                continue;
            };

            for context in Context::ALL {
                let Some(messages) = contexts.get(&context) else {
                    errors.push(format!(
                        "Missing content for mood-context combination: {}-{}",
                        mood, context
                    ));
                    continue;
                };

                if messages.is_empty() {
                    errors.push(format!(
                        "Empty content array for mood-context combination: {}-{}",
                        mood, context
                    ));
                    continue;
                }

                for (position, message) in messages.iter().enumerate() {
                    if message.message.trim().is_empty() || message.display_time == 0 {
                        errors.push(format!(
                            "Invalid message structure at {}-{}[{}]: empty message or zero display time",
                            mood, context, position
                        ));
                    }
                    let expected = position as u32 + 1;
                    if message.audio_index != expected {
                        errors.push(format!(
                            "Audio index mismatch at {}-{}[{}]: expected {}, found {}",
                            mood, context, position, expected, message.audio_index
                        ));
                    }
                }
            }
        }

        ValidationReport { errors }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ActionType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn msg(text: &str, audio_index: u32) -> ContentMessage {
        ContentMessage {
            action_type: ActionType::Action,
            message: text.to_string(),
            display_time: 60,
            audio_index,
            category: None,
            intensity: None,
        }
    }

    #[test]
    fn test_embedded_library_is_valid() {
        let report = embedded().validate();
        assert!(report.is_valid(), "errors: {:?}", report.errors);
        assert_eq!(embedded().len(), 180);
    }

    #[test]
    fn test_absent_pair_is_empty_not_error() {
        let library = ContentLibrary::from_buckets([((Mood::Good, Context::Safe), vec![msg("a", 1)])]);
        assert!(library.all_messages(Mood::Awful, Context::Moving).is_empty());
        assert!(library.random_message(Mood::Awful, Context::Moving).is_none());
        assert!(library.random_messages(Mood::Awful, Context::Moving, 3).is_empty());
    }

    #[test]
    fn test_message_at_is_one_based() {
        let library = embedded();
        let first = library.message_at(Mood::Good, Context::Safe, 1).unwrap();
        assert_eq!(first.message, "Do a mindful body scan");
        assert!(library.message_at(Mood::Good, Context::Safe, 0).is_none());
        assert!(library.message_at(Mood::Good, Context::Safe, 99).is_none());
    }

    #[test]
    fn test_random_messages_caps_at_available() {
        let library = ContentLibrary::from_buckets([(
            (Mood::Bad, Context::Safe),
            vec![msg("a", 1), msg("b", 2)],
        )]);
        let mut rng = StdRng::seed_from_u64(7);
        let picked = library.random_messages_with(Mood::Bad, Context::Safe, 5, &mut rng);
        assert_eq!(picked.len(), 2);
        assert_ne!(picked[0].message, picked[1].message);
    }

    #[test]
    fn test_validate_reports_gaps_and_index_drift() {
        let library = ContentLibrary::from_buckets([
            ((Mood::Good, Context::Safe), vec![msg("a", 1), msg("b", 5)]),
            ((Mood::Good, Context::Moving), vec![]),
        ]);
        let report = library.validate();
        assert!(!report.is_valid());
        assert!(report.errors.iter().any(|e| e.contains("Audio index mismatch at good-safe[1]")));
        assert!(report.errors.iter().any(|e| e.contains("Empty content array for mood-context combination: good-moving")));
        assert!(report.errors.iter().any(|e| e.contains("good-focussed")));
        assert!(report.errors.iter().any(|e| e == "Missing content for mood: okay"));
    }

    #[test]
    fn test_filters_by_category_and_intensity() {
        let library = embedded();
        let breathing = library.messages_by_category(Mood::Good, Context::Safe, "mindfulness");
        assert!(breathing.iter().all(|m| m.category.as_deref() == Some("mindfulness")));
        assert!(!breathing.is_empty());
        let gentle = library.messages_by_intensity(Mood::Good, Context::Safe, Intensity::Gentle);
        assert!(gentle.iter().all(|m| m.intensity == Some(Intensity::Gentle)));
    }

    #[test]
    fn test_malformed_json_is_content_error() {
        let err = ContentLibrary::from_json("{\"good\": 3}").unwrap_err();
        assert!(matches!(err, ContentError::Malformed(_)));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = ContentLibrary::load("/nonexistent/library.json").unwrap_err();
        assert!(matches!(err, ContentError::Io { .. }));
    }
}
