use crate::keys;
use crate::store::KeyValueStore;
use std::sync::Arc;

/// Marker for the theme, as the host's root element class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeMarker {
    Dark,
    Light,
}

impl ThemeMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMarker::Dark => "dark-mode",
            ThemeMarker::Light => "light-mode",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenMarker {
    Screenless,
    Normal,
}

impl ScreenMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenMarker::Screenless => "screenless-mode",
            ScreenMarker::Normal => "normal-mode",
        }
    }
}

/// Theme, read-aloud and screenless toggles.
///
/// Only the exact stored values `dark` / `enabled` switch a preference on;
/// anything else (including absence) reads as off. Toggles flip in memory
/// first; a failed write is logged and the in-memory state stands.
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
    dark_mode: bool,
    audio_enabled: bool,
    screenless: bool,
}

impl Preferences {
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let dark_mode = store.get(keys::THEME).as_deref() == Some("dark");
        let audio_enabled = store.get(keys::AUDIO).as_deref() == Some("enabled");
        let screenless = store.get(keys::SCREENLESS).as_deref() == Some("enabled");
        Self {
            store,
            dark_mode,
            audio_enabled,
            screenless,
        }
    }

    pub fn is_dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn audio_enabled(&self) -> bool {
        self.audio_enabled
    }

    pub fn screenless(&self) -> bool {
        self.screenless
    }

    pub fn theme_marker(&self) -> ThemeMarker {
        if self.dark_mode {
            ThemeMarker::Dark
        } else {
            ThemeMarker::Light
        }
    }

    pub fn screen_marker(&self) -> ScreenMarker {
        if self.screenless {
            ScreenMarker::Screenless
        } else {
            ScreenMarker::Normal
        }
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.write(keys::THEME, if self.dark_mode { "dark" } else { "light" });
        self.dark_mode
    }

    pub fn toggle_read_aloud(&mut self) -> bool {
        self.audio_enabled = !self.audio_enabled;
        self.write(keys::AUDIO, enabled(self.audio_enabled));
        self.audio_enabled
    }

    pub fn toggle_screenless(&mut self) -> bool {
        self.screenless = !self.screenless;
        self.write(keys::SCREENLESS, enabled(self.screenless));
        self.screenless
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!("Failed to save preference {}={}: {}", key, value, e);
        }
    }
}

fn enabled(on: bool) -> &'static str {
    if on {
        "enabled"
    } else {
        "disabled"
    }
}
