//! Configuration handling for the TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Thresholds used by the validation rules
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleLimits {
    /// Minimum password length in characters
    pub password_min_len: usize,
    /// Shortest accepted landline number
    pub landline_min_digits: usize,
    /// Longest accepted landline number
    pub landline_max_digits: usize,
    /// Minimum age in whole years
    pub min_age: u32,
    /// Maximum age in whole years (`None` for unbounded)
    pub max_age: Option<u32>,
}

impl Default for RuleLimits {
    fn default() -> Self {
        Self {
            password_min_len: 10,
            landline_min_digits: 7,
            landline_max_digits: 10,
            min_age: 18,
            max_age: Some(100),
        }
    }
}

/// Semantically invalid configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("password_min_len must be at least 1")]
    ZeroPasswordLength,
    #[error("landline digit range is inverted ({min} > {max})")]
    InvertedLandlineRange { min: usize, max: usize },
    #[error("max_age ({max}) is below min_age ({min})")]
    InvertedAgeRange { min: u32, max: u32 },
    #[error("reset_delay_ms must be between 2500 and 3000 (got {0})")]
    ResetDelayOutOfRange(u64),
}

impl RuleLimits {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.password_min_len == 0 {
            return Err(ConfigError::ZeroPasswordLength);
        }
        if self.landline_min_digits > self.landline_max_digits {
            return Err(ConfigError::InvertedLandlineRange {
                min: self.landline_min_digits,
                max: self.landline_max_digits,
            });
        }
        if let Some(max) = self.max_age {
            if max < self.min_age {
                return Err(ConfigError::InvertedAgeRange {
                    min: self.min_age,
                    max,
                });
            }
        }
        Ok(())
    }
}

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Validation thresholds
    #[serde(default)]
    pub rules: RuleLimits,
    /// Delay before the success screen resets the form
    pub reset_delay_ms: Option<u64>,
    /// Lifetime of a solved CAPTCHA token
    pub captcha_ttl_secs: Option<u64>,
}

impl TuiConfig {
    pub const DEFAULT_RESET_DELAY: Duration = Duration::from_millis(3000);
    pub const DEFAULT_CAPTCHA_TTL: Duration = Duration::from_secs(120);
    /// Accepted success-screen durations, in milliseconds
    pub const RESET_DELAY_RANGE_MS: RangeInclusive<u64> = 2500..=3000;

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("co", "signup", "signup-tui")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from the platform config directory
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`, falling back to defaults when it is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        let config: TuiConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, logging and discarding anything unusable
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!("Ignoring unusable config file: {err:#}");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ms) = self.reset_delay_ms {
            if !Self::RESET_DELAY_RANGE_MS.contains(&ms) {
                return Err(ConfigError::ResetDelayOutOfRange(ms));
            }
        }
        self.rules.validate()
    }

    pub fn reset_delay(&self) -> Duration {
        self.reset_delay_ms
            .map(Duration::from_millis)
            .unwrap_or(Self::DEFAULT_RESET_DELAY)
    }

    pub fn captcha_ttl(&self) -> Duration {
        self.captcha_ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(Self::DEFAULT_CAPTCHA_TTL)
    }
}
