//! Capture and runtime configuration.

use crate::exposure::{ExposureThresholds, ThresholdError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for acquisition and calibration capture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Settling delay after an exposure change, in milliseconds.
    ///
    /// Honored once before the post-adjustment re-read; never a retry
    /// loop.
    pub settle_ms: u64,
    /// Reads averaged for a white-balance capture.
    pub wb_samples: u32,
    /// Reads averaged per CCM patch capture.
    pub ccm_samples: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            settle_ms: 10,
            wb_samples: 10,
            ccm_samples: 12,
        }
    }
}

impl CaptureConfig {
    /// The settling delay as a [`Duration`].
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    /// Validates the capture parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.wb_samples == 0 || self.ccm_samples == 0 {
            return Err(ConfigError::ZeroSampleCount);
        }
        Ok(())
    }
}

/// Output/loop configuration for the demo binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Run continuously (true) or for a fixed number of cycles (false).
    pub continuous: bool,
    /// Number of acquisition cycles if not continuous.
    pub cycles: u32,
    /// Delay between acquisition cycles in milliseconds.
    pub refresh_ms: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            continuous: false,
            cycles: 20,
            refresh_ms: 200,
        }
    }
}

/// Configuration validation and loading errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("sample counts must be at least 1")]
    ZeroSampleCount,
    #[error(transparent)]
    Thresholds(#[from] ThresholdError),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub exposure: ExposureThresholds,
    #[serde(default)]
    pub capture: CaptureConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let config: FileConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.exposure.validate()?;
        self.capture.validate()?;
        Ok(())
    }
}
