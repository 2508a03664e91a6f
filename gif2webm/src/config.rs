//! Conversion and batch configuration.
//!
//! Every path the pipeline touches is carried here explicitly; nothing is resolved
//! against the process working directory except the CLI defaults.

use crate::{GifWebmError, Result};
use std::path::PathBuf;

pub const DEFAULT_TARGET_FPS: u32 = 60;
pub const DEFAULT_TARGET_DURATION_SECS: f64 = 3.0;
pub const DEFAULT_TARGET_SIZE: u32 = 512;
pub const DEFAULT_BITRATE: &str = "500K";
pub const DEFAULT_SCRATCH_DIR: &str = "temp_frames";
pub const DEFAULT_ENCODER: &str = "ffmpeg";
pub const OUTPUT_EXTENSION: &str = "webm";

/// Per-file conversion settings.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    /// Output stream frame rate.
    pub target_fps: u32,
    /// Minimum nominal playback length; the GIF is looped until it reaches this.
    pub target_duration_secs: f64,
    /// Output frames are `target_size × target_size`.
    pub target_size: u32,
    /// Passed verbatim to `-b:v`.
    pub bitrate: String,
    /// Where numbered PNG frames are staged for the encoder.
    pub scratch_dir: PathBuf,
    /// Encoder binary, looked up on `PATH` unless it contains a separator.
    pub encoder: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            target_duration_secs: DEFAULT_TARGET_DURATION_SECS,
            target_size: DEFAULT_TARGET_SIZE,
            bitrate: DEFAULT_BITRATE.to_string(),
            scratch_dir: PathBuf::from(DEFAULT_SCRATCH_DIR),
            encoder: DEFAULT_ENCODER.to_string(),
        }
    }
}

impl ConversionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.target_fps == 0 {
            return Err(GifWebmError::InvalidConfig(
                "target fps must be greater than 0".to_string(),
            ));
        }
        if self.target_size == 0 {
            return Err(GifWebmError::InvalidConfig(
                "target size must be greater than 0".to_string(),
            ));
        }
        if !self.target_duration_secs.is_finite() || self.target_duration_secs < 0.0 {
            return Err(GifWebmError::InvalidConfig(format!(
                "target duration must be a non-negative number of seconds, got {}",
                self.target_duration_secs
            )));
        }
        if self.bitrate.trim().is_empty() {
            return Err(GifWebmError::InvalidConfig("bitrate must not be empty".to_string()));
        }
        if self.encoder.trim().is_empty() {
            return Err(GifWebmError::InvalidConfig(
                "encoder program must not be empty".to_string(),
            ));
        }
        if self.scratch_dir.as_os_str().is_empty() {
            return Err(GifWebmError::InvalidConfig(
                "scratch directory must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// What the batch driver does when one file fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure and return its error.
    #[default]
    Halt,
    /// Record the failure and move on to the next file.
    Continue,
}

#[derive(Debug, Clone)]
pub struct BatchConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub conversion: ConversionConfig,
    pub policy: FailurePolicy,
}

impl BatchConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            conversion: ConversionConfig::default(),
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_conversion(mut self, conversion: ConversionConfig) -> Self {
        self.conversion = conversion;
        self
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }
}
