//! Configuration management for LensCoach
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{LensCoachError, Result};
use crate::session::rate_limit::{RateLimitConfig, MAX_PROMPTS_PER_WINDOW, WINDOW_HOURS};
use crate::session::store::MAX_SESSIONS;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Longest accepted rate window, one year
pub const MAX_WINDOW_HOURS: u32 = 24 * 365;

/// Main configuration structure for LensCoach
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Coaching backend connection settings
    #[serde(default)]
    pub backend: BackendConfig,

    /// Session retention and prompt quota settings
    #[serde(default)]
    pub sessions: SessionsConfig,

    /// Local storage settings
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Coaching backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend API (routes are appended to it)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Maximum number of images uploaded with one prompt
    #[serde(default = "default_max_images")]
    pub max_images: usize,
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_max_images() -> usize {
    3
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            max_images: default_max_images(),
        }
    }
}

/// Session retention and quota configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionsConfig {
    /// Number of sessions retained before the least recently active is evicted
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Prompts allowed per session within one rate window
    #[serde(default = "default_max_prompts_per_window")]
    pub max_prompts_per_window: u32,

    /// Length of the rate window in hours
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
}

fn default_max_sessions() -> usize {
    MAX_SESSIONS
}

fn default_max_prompts_per_window() -> u32 {
    MAX_PROMPTS_PER_WINDOW
}

fn default_window_hours() -> u32 {
    WINDOW_HOURS
}

impl Default for SessionsConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            max_prompts_per_window: default_max_prompts_per_window(),
            window_hours: default_window_hours(),
        }
    }
}

impl SessionsConfig {
    /// Rate limiter settings derived from this section
    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig::new(
            self.max_prompts_per_window,
            chrono::Duration::hours(i64::from(self.window_hours)),
        )
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Explicit path of the sessions database; the platform data dir is used when unset
    #[serde(default)]
    pub db_path: Option<String>,
}

impl Config {
    /// Load configuration from file, environment, and CLI
    ///
    /// A missing file is not an error: defaults are used and a warning is logged.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command line, applied last
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| LensCoachError::Config(format!("Failed to read {}: {}", path, e)))?;
        let config: Config = serde_yaml::from_str(&contents).map_err(LensCoachError::from)?;
        Ok(config)
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("LENSCOACH_BACKEND_URL") {
            self.backend.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("LENSCOACH_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.backend.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid LENSCOACH_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(max_sessions) = std::env::var("LENSCOACH_MAX_SESSIONS") {
            if let Ok(value) = max_sessions.parse() {
                self.sessions.max_sessions = value;
            } else {
                tracing::warn!("Invalid LENSCOACH_MAX_SESSIONS: {}", max_sessions);
            }
        }

        if let Ok(max_prompts) = std::env::var("LENSCOACH_MAX_PROMPTS") {
            if let Ok(value) = max_prompts.parse() {
                self.sessions.max_prompts_per_window = value;
            } else {
                tracing::warn!("Invalid LENSCOACH_MAX_PROMPTS: {}", max_prompts);
            }
        }

        if let Ok(window_hours) = std::env::var("LENSCOACH_WINDOW_HOURS") {
            if let Ok(value) = window_hours.parse() {
                self.sessions.window_hours = value;
            } else {
                tracing::warn!("Invalid LENSCOACH_WINDOW_HOURS: {}", window_hours);
            }
        }

        if let Ok(db_path) = std::env::var("LENSCOACH_SESSIONS_DB") {
            self.storage.db_path = Some(db_path);
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.backend_url {
            self.backend.base_url = base_url.clone();
        }

        if let Some(storage_path) = &cli.storage_path {
            self.storage.db_path = Some(storage_path.clone());
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `LensCoachError::Config` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        let base_url = self.backend.base_url.trim();
        if base_url.is_empty() {
            return Err(
                LensCoachError::Config("backend.base_url cannot be empty".to_string()).into(),
            );
        }

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(LensCoachError::Config(format!(
                "backend.base_url must start with http:// or https://, got: {}",
                base_url
            ))
            .into());
        }

        if self.backend.timeout_seconds == 0 {
            return Err(LensCoachError::Config(
                "backend.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.backend.max_images == 0 || self.backend.max_images > 100 {
            return Err(LensCoachError::Config(
                "backend.max_images must be between 1 and 100".to_string(),
            )
            .into());
        }

        if self.sessions.max_sessions == 0 {
            return Err(LensCoachError::Config(
                "sessions.max_sessions must be greater than 0".to_string(),
            )
            .into());
        }

        if self.sessions.max_prompts_per_window == 0 {
            return Err(LensCoachError::Config(
                "sessions.max_prompts_per_window must be greater than 0".to_string(),
            )
            .into());
        }

        if self.sessions.window_hours == 0 || self.sessions.window_hours > MAX_WINDOW_HOURS {
            return Err(LensCoachError::Config(format!(
                "sessions.window_hours must be between 1 and {}",
                MAX_WINDOW_HOURS
            ))
            .into());
        }

        Ok(())
    }
}
