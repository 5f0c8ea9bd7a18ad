//! # StillLift voice
//!
//! Narration of a selected message. A narration first looks for a
//! pre-rendered recording, trying candidate asset names in priority order,
//! and falls back to speech synthesis when none plays.
//!
//! The host supplies the actual outputs through two seams:
//!
//! - [`AudioPlayer`]: starts a file and hands back a [`PlaybackHandle`]
//! - [`SpeechSynthesizer`]: speaks text and reports completion/errors back
//!
//! [`Narrator`] owns whatever is currently audible and guarantees that at
//! most one narration is active at a time.

mod candidates;
mod narrator;
mod player;
mod request;
mod speech;

pub use candidates::{candidate_sources, slugify, suggested_slug, AssetLayout};
pub use narrator::{
    ActiveNarration, NarrationOutcome, Narrator, NarratorSettings, Severity, StopHandlerGuard,
};
pub use player::{AudioPlayer, FsAssetPlayer, FsPlayback, PlaybackError, PlaybackHandle};
pub use request::{AudioIntent, NarrationRequest, VoiceOptions};
pub use speech::{
    choose_voice, SpeechError, SpeechErrorKind, SpeechSynthesizer, Utterance, UtteranceId, Voice,
};
