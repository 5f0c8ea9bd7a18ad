use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StillLiftConfig {
    pub content: ContentConfig,
    pub audio: AudioConfig,
    pub session: SessionConfig,
}

impl StillLiftConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: StillLiftConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Try to load from path; if file doesn't exist, return defaults with env overrides.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Config file not found or invalid ({}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("STILLLIFT_LIBRARY") {
            self.content.library_path = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("STILLLIFT_ASSET_ROOT") {
            self.audio.asset_root = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("STILLLIFT_STORE") {
            self.session.store_path = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("STILLLIFT_VOICE_HINTS") {
            self.audio.voice_hints = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }
        if let Ok(v) = std::env::var("STILLLIFT_TTS_RATE") {
            if let Ok(n) = v.parse() {
                self.audio.rate = n;
            }
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Alternative library JSON. `None` uses the library compiled into the crate.
    pub library_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Directory that asset URLs such as `/Audio/x.mp3` resolve against.
    pub asset_root: PathBuf,
    /// Directory holding structured and slug-named files.
    pub primary_dir: String,
    /// Lower-case twin of `primary_dir`, tried for slug names only.
    pub secondary_dir: String,
    /// Extensions in the order they are attempted.
    pub extensions: Vec<String>,
    pub homepage_asset: String,
    pub slug_max_len: usize,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    /// Substrings of preferred speech voice names, most preferred first.
    pub voice_hints: Vec<String>,
    /// How long speech errors stay suppressed after an intentional stop.
    pub suppress_window_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("public"),
            primary_dir: "/Audio".to_string(),
            secondary_dir: "/audio".to_string(),
            extensions: default_extensions(),
            homepage_asset: "/Audio/homepage audio.mp3".to_string(),
            slug_max_len: 120,
            rate: 0.95,
            pitch: 1.0,
            volume: 0.9,
            voice_hints: vec![],
            suppress_window_ms: 1000,
        }
    }
}

fn default_extensions() -> Vec<String> {
    ["mp3", "m4a", "ogg", "wav"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// JSON file backing the key-value store.
    pub store_path: PathBuf,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("stilllift-session.json"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = StillLiftConfig::default();
        assert_eq!(cfg.audio.extensions, vec!["mp3", "m4a", "ogg", "wav"]);
        assert_eq!(cfg.audio.slug_max_len, 120);
        assert_eq!(cfg.audio.homepage_asset, "/Audio/homepage audio.mp3");
        assert!((cfg.audio.rate - 0.95).abs() < f32::EPSILON);
        assert!(cfg.content.library_path.is_none());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let toml_str = r#"
[audio]
asset_root = "/srv/stilllift"
voice_hints = ["Samantha", "Google UK English Female"]
"#;
        let cfg: StillLiftConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.audio.asset_root, PathBuf::from("/srv/stilllift"));
        assert_eq!(cfg.audio.voice_hints.len(), 2);
        // Defaults for unspecified fields
        assert_eq!(cfg.audio.suppress_window_ms, 1000);
        assert_eq!(cfg.session.store_path, PathBuf::from("stilllift-session.json"));
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[content]
library_path = "content/alt.json"

[audio]
asset_root = "www"
primary_dir = "/Sounds"
secondary_dir = "/sounds"
extensions = ["ogg", "mp3"]
homepage_asset = "/Sounds/welcome.ogg"
slug_max_len = 80
rate = 0.9
pitch = 1.1
volume = 0.8
voice_hints = ["Zira"]
suppress_window_ms = 250

[session]
store_path = "data/session.json"
"#;
        let cfg: StillLiftConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.content.library_path, Some(PathBuf::from("content/alt.json")));
        assert_eq!(cfg.audio.extensions, vec!["ogg", "mp3"]);
        assert_eq!(cfg.audio.slug_max_len, 80);
        assert_eq!(cfg.audio.suppress_window_ms, 250);
        assert_eq!(cfg.session.store_path, PathBuf::from("data/session.json"));
    }

    #[test]
    fn test_env_overrides_and_defaults() {
        // Part 1: env overrides
        std::env::set_var("STILLLIFT_VOICE_HINTS", "Samantha, Zira,");
        std::env::set_var("STILLLIFT_TTS_RATE", "0.8");

        let mut cfg = StillLiftConfig::default();
        cfg.apply_env_overrides();

        assert_eq!(cfg.audio.voice_hints, vec!["Samantha", "Zira"]);
        assert!((cfg.audio.rate - 0.8).abs() < f32::EPSILON);

        std::env::remove_var("STILLLIFT_VOICE_HINTS");
        std::env::remove_var("STILLLIFT_TTS_RATE");

        // Part 2: nonexistent path returns defaults (no env interference)
        let cfg = StillLiftConfig::load_or_default("/nonexistent/path.toml");
        assert!((cfg.audio.rate - 0.95).abs() < f32::EPSILON);
    }
}
