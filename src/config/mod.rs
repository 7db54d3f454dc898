//! Configuration loading and validation.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::report::ReportOptions;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub report: ReportOptions,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            report: ReportOptions::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.epsilon < 0.0 {
            return Err(ConfigError::ValidationError(
                "Discrepancy epsilon must not be negative".to_string(),
            ));
        }

        if self.report.marks_per_correct <= 0.0 {
            return Err(ConfigError::ValidationError(
                "Marks per correct answer must be greater than 0".to_string(),
            ));
        }

        if self.report.penalty_per_incorrect < 0.0 {
            return Err(ConfigError::ValidationError(
                "Penalty per incorrect answer must not be negative".to_string(),
            ));
        }

        if self.report.score_bracket_max <= 0.0 {
            return Err(ConfigError::ValidationError(
                "Score bracket ceiling must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
