//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and
//! `Clone` so they can be round-tripped through TOML files and shared
//! across tasks.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// GenAiConfig
// ---------------------------------------------------------------------------

/// Connection settings for the generative text and image services.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenAiConfig {
    /// Base URL of the API endpoint.
    pub base_url: String,
    /// API key — `None` reads the `GEMINI_API_KEY` environment variable
    /// at startup instead.
    pub api_key: Option<String>,
    /// Model identifier for explanation text.
    pub text_model: String,
    /// Model identifier for slide illustrations.
    pub image_model: String,
    /// MIME type requested for generated images.
    pub image_mime: String,
    /// Maximum seconds to wait for a service response before timing out.
    pub timeout_secs: u64,
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            api_key: None,
            text_model: "gemini-2.5-flash".into(),
            image_model: "imagen-3.0-generate-002".into(),
            image_mime: "image/jpeg".into(),
            timeout_secs: 60,
        }
    }
}

// ---------------------------------------------------------------------------
// PacingConfig
// ---------------------------------------------------------------------------

/// Delay between successive image requests and the optional per-slide
/// dwell time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    /// Fixed wait between image-generation calls, to respect the image
    /// service's rate limits.
    pub image_request_delay_ms: u64,
    /// Seconds each slide is held after it appears, on top of the
    /// request delay.  `None` disables dwelling.
    pub slide_dwell_secs: Option<u64>,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            image_request_delay_ms: 1_500,
            slide_dwell_secs: None,
        }
    }
}

// ---------------------------------------------------------------------------
// NarrationConfig
// ---------------------------------------------------------------------------

/// Text-to-speech settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrationConfig {
    /// Whether narration is on when the application starts.
    pub start_enabled: bool,
    /// External TTS command invoked with the utterance as its final
    /// argument.
    pub tts_command: String,
    /// Extra arguments placed before the utterance.
    pub tts_args: Vec<String>,
    /// Voice name passed to the TTS command, if any.
    pub voice: Option<String>,
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            start_enabled: false,
            tts_command: "espeak".into(),
            tts_args: Vec::new(),
            voice: None,
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Terminal front-end settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Directory slide images are written into (cleared per run).
    pub output_dir: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("slides"),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Generative service connection settings.
    pub genai: GenAiConfig,
    /// Request pacing and slide dwell.
    pub pacing: PacingConfig,
    /// Text-to-speech narration.
    pub narration: NarrationConfig,
    /// Front-end settings.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist
    /// yet (first-run scenario) so callers never need to special-case a
    /// missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// The API key to use: explicit config wins, then the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.genai.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.genai.base_url, loaded.genai.base_url);
        assert_eq!(original.genai.text_model, loaded.genai.text_model);
        assert_eq!(original.genai.image_model, loaded.genai.image_model);
        assert_eq!(original.genai.timeout_secs, loaded.genai.timeout_secs);
        assert_eq!(
            original.pacing.image_request_delay_ms,
            loaded.pacing.image_request_delay_ms
        );
        assert_eq!(
            original.pacing.slide_dwell_secs,
            loaded.pacing.slide_dwell_secs
        );
        assert_eq!(original.narration.tts_command, loaded.narration.tts_command);
        assert_eq!(original.narration.start_enabled, loaded.narration.start_enabled);
        assert_eq!(original.ui.output_dir, loaded.ui.output_dir);
    }

    /// `load_from` on a non-existent path must return `Default` without
    /// error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.genai.text_model, default.genai.text_model);
        assert_eq!(
            config.pacing.image_request_delay_ms,
            default.pacing.image_request_delay_ms
        );
    }

    /// Verify default values.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.genai.base_url, "https://generativelanguage.googleapis.com");
        assert!(cfg.genai.api_key.is_none());
        assert_eq!(cfg.genai.image_mime, "image/jpeg");
        assert_eq!(cfg.pacing.image_request_delay_ms, 1_500);
        assert_eq!(cfg.pacing.slide_dwell_secs, None);
        assert!(!cfg.narration.start_enabled);
        assert_eq!(cfg.narration.tts_command, "espeak");
        assert_eq!(cfg.ui.output_dir, PathBuf::from("slides"));
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.genai.api_key = Some("test-key".into());
        cfg.genai.text_model = "some-other-model".into();
        cfg.pacing.image_request_delay_ms = 500;
        cfg.pacing.slide_dwell_secs = Some(3);
        cfg.narration.start_enabled = true;
        cfg.narration.voice = Some("en-us+f3".into());
        cfg.ui.output_dir = PathBuf::from("/tmp/out");

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.genai.api_key, Some("test-key".into()));
        assert_eq!(loaded.genai.text_model, "some-other-model");
        assert_eq!(loaded.pacing.image_request_delay_ms, 500);
        assert_eq!(loaded.pacing.slide_dwell_secs, Some(3));
        assert!(loaded.narration.start_enabled);
        assert_eq!(loaded.narration.voice, Some("en-us+f3".into()));
        assert_eq!(loaded.ui.output_dir, PathBuf::from("/tmp/out"));
    }

    /// Config key takes precedence over the environment variable.
    #[test]
    fn resolve_api_key_prefers_config() {
        let mut cfg = AppConfig::default();
        cfg.genai.api_key = Some("from-config".into());
        assert_eq!(cfg.resolve_api_key(), Some("from-config".into()));
    }

    #[test]
    fn resolve_api_key_ignores_empty_config_key() {
        let mut cfg = AppConfig::default();
        cfg.genai.api_key = Some(String::new());
        // Falls through to the environment; either way it must not be
        // the empty string.
        assert_ne!(cfg.resolve_api_key(), Some(String::new()));
    }
}
