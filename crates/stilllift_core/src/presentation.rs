//! Presentation rules: which reveal animation, tag color and pacing a
//! (mood, context, action) triple gets.
//!
//! These tables are content decisions. Every function here is pure so the
//! audio/visual pairing stays stable across re-renders.

use crate::model::{ActionType, Context, Mood};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag color shown next to the action label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagColor {
    Purple,
    Green,
    Blue,
}

impl TagColor {
    pub fn hex(&self) -> &'static str {
        match self {
            TagColor::Purple => "#8B5CF6",
            TagColor::Green => "#10B981",
            TagColor::Blue => "#3B82F6",
        }
    }
}

/// Decorative animation that discloses the selected message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealType {
    TreasureChest,
    BalloonPop,
    Envelope,
    Bandage,
    /// Shared by every mood once the user is moving or focussed.
    PlayingCard,
}

impl RevealType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevealType::TreasureChest => "treasure-chest",
            RevealType::BalloonPop => "balloon-pop",
            RevealType::Envelope => "envelope",
            RevealType::Bandage => "bandage",
            RevealType::PlayingCard => "playing-card",
        }
    }
}

impl fmt::Display for RevealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pacing tier for the reveal animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Instant,
    Quick,
    Gentle,
    Rich,
}

impl AnimationSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationSpeed::Instant => "instant",
            AnimationSpeed::Quick => "quick",
            AnimationSpeed::Gentle => "gentle",
            AnimationSpeed::Rich => "rich",
        }
    }
}

impl fmt::Display for AnimationSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn accent_color(action_type: Option<ActionType>) -> TagColor {
    match action_type {
        Some(ActionType::Visualize) => TagColor::Purple,
        Some(ActionType::Recite) => TagColor::Green,
        Some(ActionType::Action) | None => TagColor::Blue,
    }
}

pub fn reveal_type(mood: Mood, context: Context) -> RevealType {
    match context {
        Context::Moving | Context::Focussed => RevealType::PlayingCard,
        Context::Safe => match mood {
            Mood::Good => RevealType::TreasureChest,
            Mood::Okay => RevealType::BalloonPop,
            Mood::Bad => RevealType::Envelope,
            Mood::Awful => RevealType::Bandage,
        },
    }
}

pub fn animation_speed(mood: Mood, context: Context) -> AnimationSpeed {
    use AnimationSpeed::*;
    match (mood, context) {
        (Mood::Good, Context::Safe) => Rich,
        (Mood::Good, Context::Moving) => Quick,
        (Mood::Good, Context::Focussed) => Instant,
        (Mood::Okay, Context::Safe) => Gentle,
        (Mood::Okay, Context::Moving) => Quick,
        (Mood::Okay, Context::Focussed) => Instant,
        (Mood::Bad, Context::Safe) => Gentle,
        (Mood::Bad, Context::Moving) => Gentle,
        (Mood::Bad, Context::Focussed) => Instant,
        (Mood::Awful, Context::Safe) => Gentle,
        (Mood::Awful, Context::Moving) => Instant,
        (Mood::Awful, Context::Focussed) => Instant,
    }
}

pub fn mood_glyph(mood: Mood) -> &'static str {
    match mood {
        Mood::Good => "😊",
        Mood::Okay => "😐",
        Mood::Bad => "😔",
        Mood::Awful => "😢",
    }
}

pub fn context_glyph(context: Context) -> &'static str {
    match context {
        Context::Safe => "🏡",
        Context::Moving => "🚶",
        Context::Focussed => "🎯",
    }
}

const FALLBACK_GLYPH: &str = "✨";

/// Everything the renderer needs to stage a reveal. Always recomputed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationMetadata {
    pub reveal_type: RevealType,
    pub accent_color: TagColor,
    pub animation_speed: AnimationSpeed,
}

impl PresentationMetadata {
    pub fn derive(mood: Mood, context: Context, action_type: Option<ActionType>) -> Self {
        Self {
            reveal_type: reveal_type(mood, context),
            accent_color: accent_color(action_type),
            animation_speed: animation_speed(mood, context),
        }
    }

    /// Derive from unvalidated strings, falling back to the treasure chest,
    /// the `rich` pace and the blue tag for anything unrecognized.
    pub fn from_raw(mood: &str, context: &str, action_type: &str) -> Self {
        let action = ActionType::parse_lenient(action_type);
        match (mood.parse::<Mood>(), context.parse::<Context>()) {
            (Ok(mood), Ok(context)) => Self::derive(mood, context, action),
            (_, Ok(Context::Moving | Context::Focussed)) => Self {
                reveal_type: RevealType::PlayingCard,
                accent_color: accent_color(action),
                animation_speed: AnimationSpeed::Rich,
            },
            _ => Self {
                reveal_type: RevealType::TreasureChest,
                accent_color: accent_color(action),
                animation_speed: AnimationSpeed::Rich,
            },
        }
    }
}

/// Glyph for a raw mood string, with a stable fallback.
pub fn glyph_for_raw_mood(mood: &str) -> &'static str {
    mood.parse::<Mood>().map(mood_glyph).unwrap_or(FALLBACK_GLYPH)
}

/// Glyph for a raw context string, with a stable fallback.
pub fn glyph_for_raw_context(context: &str) -> &'static str {
    context
        .parse::<Context>()
        .map(context_glyph)
        .unwrap_or(FALLBACK_GLYPH)
}
