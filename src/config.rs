//! Configuration file loading with environment variable overrides.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Default EchoMimic endpoint.
pub const DEFAULT_ECHOMIMIC_URL: &str = "http://localhost:8000/a2v";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

const ENV_URL: &str = "ECHOMIMIC_URL";
const ENV_SILENT: &str = "ECHOMIMIC_WAV_SILENT";
const ENV_TALKING: &str = "ECHOMIMIC_WAV_TALKING";
const ENV_TIMEOUT: &str = "ECHOMIMIC_TIMEOUT_SECS";

/// Top-level configuration file.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// EchoMimic backend settings.
    #[serde(default)]
    pub echomimic: EchoMimicSection,
}

/// `[echomimic]` section of the config file. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct EchoMimicSection {
    /// Endpoint URL.
    pub url: Option<String>,
    /// Silent-audio reference substituted when no audio is given.
    pub silent_audio: Option<String>,
    /// Talking-audio reference.
    pub talking_audio: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Resolved settings for the EchoMimic adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EchoMimicSettings {
    /// Endpoint URL the request is POSTed to.
    pub url: String,
    /// Audio reference used when the caller supplies none.
    pub silent_audio: String,
    /// Sample talking-audio reference. Held but not used by `generate`.
    pub talking_audio: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for EchoMimicSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_ECHOMIMIC_URL.to_string(),
            silent_audio: String::new(),
            talking_audio: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl EchoMimicSettings {
    /// Built-in defaults overridden by the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Config::default().echomimic_settings()
    }

    /// Replace the endpoint URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Replace the silent-audio reference.
    #[must_use]
    pub fn with_silent_audio(mut self, audio: impl Into<String>) -> Self {
        self.silent_audio = audio.into();
        self
    }

    /// Replace the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
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

    /// Resolve adapter settings: environment, then file, then defaults.
    #[must_use]
    pub fn echomimic_settings(&self) -> EchoMimicSettings {
        self.resolve_settings(|key| std::env::var(key).ok())
    }

    fn resolve_settings(&self, env: impl Fn(&str) -> Option<String>) -> EchoMimicSettings {
        let defaults = EchoMimicSettings::default();
        let file = &self.echomimic;
        let pick = |key: &str, from_file: &Option<String>, fallback: String| {
            env(key).or_else(|| from_file.clone()).unwrap_or(fallback)
        };

        let timeout_secs = env(ENV_TIMEOUT)
            .and_then(|s| s.trim().parse().ok())
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        EchoMimicSettings {
            url: pick(ENV_URL, &file.url, defaults.url),
            silent_audio: pick(ENV_SILENT, &file.silent_audio, defaults.silent_audio),
            talking_audio: pick(ENV_TALKING, &file.talking_audio, defaults.talking_audio),
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

/// Discover the config file path using the resolution order:
/// 1. Explicit path (from `--config` flag)
/// 2. `PORTRAIT_TO_TALKING_CONFIG` environment variable
/// 3. `~/.config/portrait-to-talking/config.toml`
#[must_use]
pub fn discover_config_path(explicit: Option<&str>) -> PathBuf {
    if let Some(p) = explicit {
        return PathBuf::from(p);
    }

    if let Ok(p) = std::env::var("PORTRAIT_TO_TALKING_CONFIG") {
        return PathBuf::from(p);
    }

    default_config_path()
}

fn default_config_path() -> PathBuf {
    if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".config/portrait-to-talking/config.toml")
    } else {
        PathBuf::from("portrait-to-talking.toml")
    }
}
