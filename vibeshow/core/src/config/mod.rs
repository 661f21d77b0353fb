//! TOML Configuration File Support
//!
//! Centralized configuration loading for vibeshow, with an optional TOML file
//! at `~/.config/vibeshow/config.toml`.
//!
//! # Configuration Priority
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [service]
//! api_key = "..."
//! text_model = "gemini-2.5-flash"
//! image_model = "gemini-2.5-flash-image"
//! timeout_secs = 120
//!
//! [generation]
//! slide_count = 6
//! batch_size = 2
//! aspect_ratio = "16:9"
//!
//! [playback]
//! slide_interval_ms = 5000
//! time_update_interval_ms = 250
//! ```

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generation::GenerationConfig;
use crate::playback::{DEFAULT_SLIDE_INTERVAL, DEFAULT_TIME_UPDATE_INTERVAL};
use crate::service::ServiceConfig;

/// Environment variables consulted for the API key, first match wins
pub const API_KEY_ENV_VARS: [&str; 3] = ["VIBESHOW_API_KEY", "GEMINI_API_KEY", "API_KEY"];

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Service section of the TOML configuration
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceToml {
    /// API key for the content service
    #[serde(alias = "apiKey")]
    pub api_key: Option<String>,

    /// REST base URL
    pub base_url: Option<String>,

    /// Model for prompt generation
    pub text_model: Option<String>,

    /// Model for image rendering
    pub image_model: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for ServiceToml {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceToml")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Generation section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationToml {
    /// Prompts requested per run
    pub slide_count: Option<usize>,

    /// Renders in flight at once
    pub batch_size: Option<usize>,

    /// Aspect ratio hint for renders
    pub aspect_ratio: Option<String>,
}

/// Playback section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackToml {
    /// Slide rotation period in milliseconds
    pub slide_interval_ms: Option<u64>,

    /// Clock audio time update period in milliseconds
    pub time_update_interval_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VibeshowToml {
    /// Service configuration section
    pub service: ServiceToml,

    /// Generation configuration section
    pub generation: GenerationToml,

    /// Playback configuration section
    pub playback: PlaybackToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Resolved configuration
///
/// Use [`load_config`] to build one with proper priority handling.
#[derive(Clone, Debug)]
pub struct VibeshowConfig {
    /// Content service connection
    pub service: ServiceConfig,

    /// Orchestrator settings
    pub generation: GenerationConfig,

    /// Slide rotation period
    pub slide_interval: Duration,

    /// Clock audio time update period
    pub time_update_interval: Duration,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: ConfigSource,
}

impl Default for VibeshowConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            generation: GenerationConfig::default(),
            slide_interval: DEFAULT_SLIDE_INTERVAL,
            time_update_interval: DEFAULT_TIME_UPDATE_INTERVAL,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl VibeshowConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the highest-priority source that contributed a value
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Reject values the generator or player cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.generation.slide_count == 0 {
            return Err(ConfigError::ValidationError(
                "slide_count must be at least 1".to_string(),
            ));
        }
        if self.generation.batch_size == 0 {
            return Err(ConfigError::ValidationError(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.slide_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "slide_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.time_update_interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "time_update_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.generation.aspect_ratio.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "aspect_ratio must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/vibeshow/config.toml` or the platform equivalent.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("vibeshow").join("config.toml"))
}

/// Load configuration from all sources with proper priority
///
/// CLI overrides are not handled here; apply [`ConfigOverrides`] afterwards.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed.
/// A missing config file is not an error (defaults are used).
pub fn load_config() -> Result<VibeshowConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// With `path` set to `None`, only defaults and environment variables apply.
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<VibeshowConfig, ConfigError> {
    load_layers(path, |name| std::env::var(name).ok())
}

fn load_layers(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<VibeshowConfig, ConfigError> {
    let mut config = VibeshowConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: VibeshowToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut VibeshowConfig, toml: &VibeshowToml) {
    if let Some(key) = toml.service.api_key.as_deref().filter(|k| !k.trim().is_empty()) {
        config.service.api_key = Some(key.to_string());
    }
    if let Some(ref url) = toml.service.base_url {
        config.service.base_url.clone_from(url);
    }
    if let Some(ref model) = toml.service.text_model {
        config.service.text_model.clone_from(model);
    }
    if let Some(ref model) = toml.service.image_model {
        config.service.image_model.clone_from(model);
    }
    if let Some(secs) = toml.service.timeout_secs {
        config.service.timeout = Duration::from_secs(secs);
    }

    if let Some(count) = toml.generation.slide_count {
        config.generation.slide_count = count;
    }
    if let Some(size) = toml.generation.batch_size {
        config.generation.batch_size = size;
    }
    if let Some(ref ratio) = toml.generation.aspect_ratio {
        config.generation.aspect_ratio.clone_from(ratio);
    }

    if let Some(ms) = toml.playback.slide_interval_ms {
        config.slide_interval = Duration::from_millis(ms);
    }
    if let Some(ms) = toml.playback.time_update_interval_ms {
        config.time_update_interval = Duration::from_millis(ms);
    }
}

/// Apply environment variable overrides to the config
fn apply_env_config(config: &mut VibeshowConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(key) = API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| env(name))
        .find(|key| !key.trim().is_empty())
    {
        config.service.api_key = Some(key);
        config.source = ConfigSource::Env;
    }

    if let Some(model) = env("VIBESHOW_TEXT_MODEL") {
        config.service.text_model = model;
        config.source = ConfigSource::Env;
    }
    if let Some(model) = env("VIBESHOW_IMAGE_MODEL") {
        config.service.image_model = model;
        config.source = ConfigSource::Env;
    }

    if let Some(count) = env("VIBESHOW_SLIDE_COUNT") {
        if let Ok(n) = count.parse::<usize>() {
            config.generation.slide_count = n;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(size) = env("VIBESHOW_BATCH_SIZE") {
        if let Ok(n) = size.parse::<usize>() {
            config.generation.batch_size = n;
            config.source = ConfigSource::Env;
        }
    }
    if let Some(interval) = env("VIBESHOW_SLIDE_INTERVAL_MS") {
        if let Ok(ms) = interval.parse::<u64>() {
            config.slide_interval = Duration::from_millis(ms);
            config.source = ConfigSource::Env;
        }
    }
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// CLI argument overrides
///
/// Applied on top of the loaded configuration.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// API key override
    pub api_key: Option<String>,

    /// Slide count override
    pub slide_count: Option<usize>,

    /// Batch size override
    pub batch_size: Option<usize>,

    /// Slide interval override in milliseconds
    pub slide_interval_ms: Option<u64>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set API key override
    #[must_use]
    pub fn with_api_key(mut self, key: String) -> Self {
        self.api_key = Some(key);
        self
    }

    /// Set slide count override
    #[must_use]
    pub fn with_slide_count(mut self, count: usize) -> Self {
        self.slide_count = Some(count);
        self
    }

    /// Set batch size override
    #[must_use]
    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = Some(size);
        self
    }

    /// Set slide interval override
    #[must_use]
    pub fn with_slide_interval_ms(mut self, ms: u64) -> Self {
        self.slide_interval_ms = Some(ms);
        self
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut VibeshowConfig) {
        if self.api_key.is_some()
            || self.slide_count.is_some()
            || self.batch_size.is_some()
            || self.slide_interval_ms.is_some()
        {
            config.source = ConfigSource::Cli;
        }

        if let Some(ref key) = self.api_key {
            config.service.api_key = Some(key.clone());
        }
        if let Some(count) = self.slide_count {
            config.generation.slide_count = count;
        }
        if let Some(size) = self.batch_size {
            config.generation.batch_size = size;
        }
        if let Some(ms) = self.slide_interval_ms {
            config.slide_interval = Duration::from_millis(ms);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
