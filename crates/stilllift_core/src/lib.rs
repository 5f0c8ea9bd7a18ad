//! # StillLift core
//!
//! Maps a user's mood and situational context to a pre-authored micro-habit
//! and to the presentation it should be revealed with.
//!
//! - [`library`]: the immutable Content Library and its read-only queries
//! - [`presentation`]: the pure reveal/color/pace rule tables
//! - [`selection`]: the snapshot of the message the user ended up with

pub mod config;
mod error;
pub mod library;
pub mod model;
pub mod presentation;
pub mod selection;

pub use config::{AudioConfig, ContentConfig, SessionConfig, StillLiftConfig};
pub use error::{ContentError, ParseError};
pub use library::{embedded, ContentLibrary, ValidationReport};
pub use model::{ActionType, ContentMessage, Context, Intensity, Mood};
pub use presentation::{
    accent_color, animation_speed, context_glyph, mood_glyph, reveal_type, AnimationSpeed,
    PresentationMetadata, RevealType, TagColor,
};
pub use selection::{pick, pick_with, SelectedMessage};
