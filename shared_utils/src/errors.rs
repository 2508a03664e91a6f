//! Shared error types for the GIF → WebM pipeline.

use crate::ffmpeg_process::FfmpegError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GifWebmError {
    /// The input could not be opened or parsed as an animated GIF.
    #[error("Failed to decode GIF {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Decoded fine, but the timing metadata cannot be normalized.
    #[error("Invalid input {}: {reason}", .path.display())]
    InvalidInput { path: PathBuf, reason: String },

    #[error("Encoding failed: {0}")]
    Encode(#[from] FfmpegError),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to write frame {}: {source}", .path.display())]
    FrameWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GifWebmError {
    /// Short machine-friendly tag used in status lines and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            GifWebmError::Decode { .. } => "decode",
            GifWebmError::InvalidInput { .. } => "invalid_input",
            GifWebmError::Encode(_) => "encode",
            GifWebmError::ToolNotFound(_) => "tool_not_found",
            GifWebmError::InvalidConfig(_) => "invalid_config",
            GifWebmError::FrameWrite { .. } => "frame_write",
            GifWebmError::Io(_) => "io",
        }
    }
}

pub type Result<T> = std::result::Result<T, GifWebmError>;
