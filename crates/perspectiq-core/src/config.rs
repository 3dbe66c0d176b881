//! Configuration management for PerspectiQ.
//!
//! Loads configuration from ${PERSPECTIQ_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Returns the default config template with comments.
///
/// This is embedded from default_config.toml at compile time.
fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

pub mod paths {
    //! Path resolution for PerspectiQ configuration and data directories.
    //!
    //! PERSPECTIQ_HOME resolution order:
    //! 1. PERSPECTIQ_HOME environment variable (if set)
    //! 2. ~/.config/perspectiq (default)

    use std::path::PathBuf;

    /// Returns the PerspectiQ home directory.
    ///
    /// Checks PERSPECTIQ_HOME env var first, falls back to ~/.config/perspectiq.
    /// When no home directory can be determined, uses `.perspectiq` in the
    /// current directory.
    pub fn perspectiq_home() -> PathBuf {
        if let Ok(home) = std::env::var("PERSPECTIQ_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".perspectiq"),
            |h| h.join(".config").join("perspectiq"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        perspectiq_home().join("config.toml")
    }

    /// Returns the path to the stored credentials.
    pub fn auth_path() -> PathBuf {
        perspectiq_home().join("auth.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        perspectiq_home().join("logs")
    }
}

/// Settings for the AI text endpoint (scenario and summary generation).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model name passed to `generateContent`.
    pub model: String,
    /// API key (falls back to GEMINI_API_KEY).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override (falls back to GEMINI_BASE_URL).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: Config::DEFAULT_GENERATION_MODEL.to_string(),
            api_key: None,
            base_url: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the PerspectiQ backend.
    pub api_base_url: String,

    /// Timeout for each backend request in seconds (0 disables).
    pub request_timeout_secs: u64,

    /// Log filter directive.
    pub log_level: String,

    /// AI text generation settings.
    pub generation: GenerationConfig,
}

impl Config {
    pub const DEFAULT_API_BASE_URL: &'static str = "http://localhost:8000";
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_LOG_LEVEL: &'static str = "info";
    pub const DEFAULT_GENERATION_MODEL: &'static str = "gemini-2.0-flash";

    /// Loads configuration from the default path.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Writes the default config template to `path`.
    ///
    /// # Errors
    /// Fails if the file already exists or cannot be written.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        Self::write_config(path, default_config_template())
    }

    /// Returns the backend URL with precedence: override > env > config.
    ///
    /// # Errors
    /// Returns an error if the chosen URL does not parse.
    pub fn resolve_api_base_url(&self, cli_override: Option<&str>) -> Result<String> {
        let env = std::env::var("PERSPECTIQ_API_URL").ok();
        let chosen = [cli_override, env.as_deref(), Some(self.api_base_url.as_str())]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or(Self::DEFAULT_API_BASE_URL);
        validate_url(chosen, "backend")?;
        Ok(chosen.trim_end_matches('/').to_string())
    }

    /// Request timeout, or `None` when disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    fn write_config(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, content)
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: Self::DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: Self::DEFAULT_REQUEST_TIMEOUT_SECS,
            log_level: Self::DEFAULT_LOG_LEVEL.to_string(),
            generation: GenerationConfig::default(),
        }
    }
}

/// Validates that a URL is well-formed.
pub(crate) fn validate_url(url: &str, name: &str) -> Result<()> {
    url::Url::parse(url).with_context(|| format!("Invalid {name} base URL: {url}"))?;
    Ok(())
}
