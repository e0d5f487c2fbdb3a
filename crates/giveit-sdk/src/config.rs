//! # SDK Configuration
//!
//! Where the data key, error verbosity and default button come from.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     GIVEIT_DATA_KEY=...                                                │
//! │     GIVEIT_RENDER_ERRORS=true                                          │
//! │     GIVEIT_BUTTON_TYPE=blue_rect_lg                                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     $GIVEIT_CONFIG, else                                               │
//! │     ~/.config/giveit-sdk/giveit.toml (Linux)                           │
//! │     ~/Library/Application Support/it.give.giveit-sdk/giveit.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     no data key, errors hidden, "blue_rect_sm"                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # giveit.toml
//! data_key = "0123456789abcdef"
//! render_errors = false
//! button_type = "blue_rect_sm"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::context::{DataKey, SdkContext};
use crate::error::{SdkError, SdkResult};

/// Environment variable naming an explicit config file.
pub const CONFIG_PATH_ENV: &str = "GIVEIT_CONFIG";

const DATA_KEY_ENV: &str = "GIVEIT_DATA_KEY";
const RENDER_ERRORS_ENV: &str = "GIVEIT_RENDER_ERRORS";
const BUTTON_TYPE_ENV: &str = "GIVEIT_BUTTON_TYPE";

/// Button variant used when none is configured.
pub const DEFAULT_BUTTON_TYPE: &str = "blue_rect_sm";

// =============================================================================
// SDK Config
// =============================================================================

/// Settings for the render pipeline and the key holder.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    /// Key handed to the encoder. Without it nothing can be rendered.
    #[serde(default)]
    pub data_key: Option<String>,

    /// Show accumulated errors in the page instead of rendering nothing.
    #[serde(default)]
    pub render_errors: bool,

    /// Button variant written to `data-giveit-buttontype`.
    #[serde(default = "default_button_type")]
    pub button_type: String,
}

fn default_button_type() -> String {
    DEFAULT_BUTTON_TYPE.to_string()
}

impl Default for SdkConfig {
    fn default() -> Self {
        SdkConfig {
            data_key: None,
            render_errors: false,
            button_type: default_button_type(),
        }
    }
}

impl std::fmt::Debug for SdkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkConfig")
            .field("data_key", &self.data_key.as_ref().map(|_| "<redacted>"))
            .field("render_errors", &self.render_errors)
            .field("button_type", &self.button_type)
            .finish()
    }
}

impl SdkConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else `$GIVEIT_CONFIG`, else the
    ///    platform config dir)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SdkResult<Self> {
        Self::load_with(config_path, |name| std::env::var(name).ok())
    }

    /// [`load`](Self::load) with variables looked up through `lookup`
    /// instead of the process environment.
    pub fn load_with<F>(config_path: Option<PathBuf>, lookup: F) -> SdkResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = config_path
            .or_else(|| lookup(CONFIG_PATH_ENV).map(PathBuf::from))
            .or_else(Self::default_config_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) => {
                debug!(?path, "Config file not found, using defaults");
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_overrides(lookup)?;
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load SDK config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Reads a TOML config file. No environment overrides are applied.
    pub fn from_file(path: &Path) -> SdkResult<Self> {
        info!(?path, "Loading SDK config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SdkResult<()> {
        if self.button_type.trim().is_empty() {
            return Err(SdkError::InvalidConfig(
                "button_type cannot be empty".into(),
            ));
        }

        if let Some(key) = &self.data_key {
            DataKey::new(key.as_str())?;
        }

        Ok(())
    }

    /// Applies overrides looked up by variable name.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> SdkResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(DATA_KEY_ENV) {
            debug!("Overriding data key from environment");
            self.data_key = Some(key);
        }

        if let Some(flag) = lookup(RENDER_ERRORS_ENV) {
            self.render_errors = parse_flag(&flag).ok_or_else(|| {
                SdkError::InvalidConfig(format!(
                    "{RENDER_ERRORS_ENV} must be true or false, got: '{flag}'"
                ))
            })?;
        }

        if let Some(button_type) = lookup(BUTTON_TYPE_ENV) {
            debug!(button_type = %button_type, "Overriding button type from environment");
            self.button_type = button_type;
        }

        Ok(())
    }

    /// Builds the key-holder context, or `None` when no data key is set.
    pub fn context(&self) -> SdkResult<Option<SdkContext>> {
        self.data_key
            .as_deref()
            .map(|key| DataKey::new(key).map(SdkContext::new))
            .transpose()
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("it", "give", "giveit-sdk")
            .map(|dirs| dirs.config_dir().join("giveit.toml"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
