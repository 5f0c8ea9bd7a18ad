//! # StillLift session
//!
//! Everything that outlives a single view: the user's display preferences
//! and the mood/context/message chosen so far. Both live in a
//! [`KeyValueStore`] under fixed string keys.

mod preferences;
mod session;
mod store;

pub use preferences::{Preferences, ScreenMarker, ThemeMarker};
pub use session::{SessionState, Step};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};

/// Storage keys. Values are plain strings; `selectedMessage` holds JSON.
pub mod keys {
    pub const THEME: &str = "theme";
    pub const AUDIO: &str = "audio";
    pub const SCREENLESS: &str = "screenless";
    pub const CURRENT_MOOD: &str = "currentMood";
    pub const CURRENT_CONTEXT: &str = "currentContext";
    pub const SELECTED_MESSAGE: &str = "selectedMessage";
}
