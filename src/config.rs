//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable holding the Gemini API key.
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// API key configuration.
    #[serde(default)]
    pub keys: KeysConfig,

    /// Default run settings, used when the matching CLI flag is absent.
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// API key configuration.
#[derive(Debug, Default, Deserialize)]
pub struct KeysConfig {
    /// Gemini API key.
    pub gemini: Option<String>,
}

/// Default run settings from the config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default model name or alias.
    pub model: String,
    /// Default aspect ratio.
    pub aspect_ratio: String,
    /// Default image size tier.
    pub size: String,
    /// Directory the `<id>.jpg` files are written to.
    pub output_dir: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            model: "nano-banana-pro".to_string(),
            aspect_ratio: "16:9".to_string(),
            size: "2K".to_string(),
            output_dir: "public/images/topics".to_string(),
        }
    }
}

/// Settings for one batch run after CLI flags and config defaults are merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    /// Model name or alias, not yet resolved.
    pub model: String,
    /// Aspect ratio sent in the image config.
    pub aspect_ratio: String,
    /// Image size tier sent in the image config.
    pub size: String,
    /// Output directory. Must already exist.
    pub output_dir: PathBuf,
}

impl Config {
    /// Load configuration from the given path, or return defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
    }

    /// Get the Gemini API key, preferring the environment variable.
    #[must_use]
    pub fn gemini_key(&self) -> Option<String> {
        std::env::var(GEMINI_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| self.keys.gemini.clone())
    }

    /// Merge explicit CLI values over the configured defaults.
    #[must_use]
    pub fn run_settings(
        &self,
        model: Option<&str>,
        aspect_ratio: Option<&str>,
        size: Option<&str>,
        output_dir: Option<&str>,
    ) -> RunSettings {
        let d = &self.defaults;
        RunSettings {
            model: model.unwrap_or(&d.model).to_string(),
            aspect_ratio: aspect_ratio.unwrap_or(&d.aspect_ratio).to_string(),
            size: size.unwrap_or(&d.size).to_string(),
            output_dir: PathBuf::from(output_dir.unwrap_or(&d.output_dir)),
        }
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `TOPIC_IMAGES_CONFIG` environment variable
/// 3. `~/.config/topic-images/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("TOPIC_IMAGES_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/topic-images/config.toml")
    } else {
        PathBuf::from("topic-images.toml")
    }
}
