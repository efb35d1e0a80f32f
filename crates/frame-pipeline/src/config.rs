//! Export configuration.

use std::path::Path;

use frame_common::{GridConventions, DEFAULT_DATASET};
use grid_file::GridFileFormat;
use renderer::{ColorRange, RenderOptions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::report::FailurePolicy;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings shared by every export command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Name of the frame dataset inside the archive.
    pub dataset: String,

    /// Experiment length. When unset it is parsed from the archive path.
    pub experiments_length: Option<usize>,

    /// Grid geometry, channel name and expected extents.
    pub conventions: GridConventions,

    pub render: RenderOptions,

    /// Encoding of exported grid files.
    pub grid_format: GridFileFormat,

    pub failure_policy: FailurePolicy,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dataset: DEFAULT_DATASET.to_string(),
            experiments_length: None,
            conventions: GridConventions::default(),
            render: RenderOptions::default(),
            grid_format: GridFileFormat::default(),
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl ExportConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Override fields from `FRAME_*` environment variables. Unparseable
    /// values are ignored.
    pub fn apply_env(&mut self) {
        if let Ok(val) = std::env::var("FRAME_DATASET") {
            if !val.is_empty() {
                self.dataset = val;
            }
        }

        if let Ok(val) = std::env::var("FRAME_EXPERIMENTS_LENGTH") {
            if let Ok(len) = val.parse() {
                self.experiments_length = Some(len);
            }
        }

        if let Ok(val) = std::env::var("FRAME_CELL_PIXELS") {
            if let Ok(px) = val.parse() {
                self.render.cell_pixels = px;
            }
        }

        let color_min = std::env::var("FRAME_COLOR_MIN").ok().and_then(|v| v.parse().ok());
        let color_max = std::env::var("FRAME_COLOR_MAX").ok().and_then(|v| v.parse().ok());
        if let (Some(min), Some(max)) = (color_min, color_max) {
            self.render.color_range = ColorRange::Fixed { min, max };
        }

        if let Ok(val) = std::env::var("FRAME_GRID_FORMAT") {
            if let Some(format) = GridFileFormat::from_name(&val) {
                self.grid_format = format;
            }
        }

        if let Ok(val) = std::env::var("FRAME_FAILURE_POLICY") {
            if let Some(policy) = FailurePolicy::from_name(&val) {
                self.failure_policy = policy;
            }
        }
    }

    /// Load configuration from a YAML file. Missing fields take defaults.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.is_empty() {
            return Err(ConfigError::Invalid("dataset must not be empty".to_string()));
        }
        if self.experiments_length == Some(0) {
            return Err(ConfigError::Invalid("experiments_length must be > 0".to_string()));
        }
        if self.conventions.cell_data_name.is_empty() {
            return Err(ConfigError::Invalid("cell_data_name must not be empty".to_string()));
        }
        if self.conventions.spacing.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "spacing must be positive, got {:?}",
                self.conventions.spacing
            )));
        }
        if self.conventions.expected_extent_2d.iter().any(|&e| e < 2) {
            return Err(ConfigError::Invalid(format!(
                "expected_extent_2d must be at least 2 points per axis, got {:?}",
                self.conventions.expected_extent_2d
            )));
        }
        self.render.validate().map_err(ConfigError::Invalid)
    }
}
