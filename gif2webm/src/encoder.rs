//! VP9-with-alpha WebM encoding through an external ffmpeg process.

use crate::config::ConversionConfig;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::info;

/// Alpha-capable codec; not configurable.
pub const VIDEO_CODEC: &str = "libvpx-vp9";
/// 4:2:0 with an alpha plane.
pub const PIXEL_FORMAT: &str = "yuva420p";

/// One fully specified encoder invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct EncoderCommand {
    program: String,
    input_pattern: PathBuf,
    input_fps: f64,
    output_fps: u32,
    bitrate: String,
    output: PathBuf,
}

impl EncoderCommand {
    pub fn new(
        input_pattern: impl Into<PathBuf>,
        input_fps: f64,
        config: &ConversionConfig,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: config.encoder.clone(),
            input_pattern: input_pattern.into(),
            input_fps,
            output_fps: config.target_fps,
            bitrate: config.bitrate.clone(),
            output: output.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The fixed argument template:
    ///
    /// `-y -framerate <in> -i <pattern> -r <out> -c:v libvpx-vp9 -b:v <rate>
    ///  -pix_fmt yuva420p -auto-alt-ref 0 <output>`
    ///
    /// Alt-reference frames are disabled because libvpx cannot combine them with
    /// an alpha plane.
    pub fn args(&self) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-framerate".to_string(),
            format!("{:.2}", self.input_fps),
            "-i".to_string(),
            self.input_pattern.to_string_lossy().into_owned(),
            "-r".to_string(),
            self.output_fps.to_string(),
            "-c:v".to_string(),
            VIDEO_CODEC.to_string(),
            "-b:v".to_string(),
            self.bitrate.clone(),
            "-pix_fmt".to_string(),
            PIXEL_FORMAT.to_string(),
            "-auto-alt-ref".to_string(),
            "0".to_string(),
            self.output.to_string_lossy().into_owned(),
        ]
    }
}

/// Runs the encoder to completion.
///
/// A non-zero exit becomes [`crate::GifWebmError::Encode`] with ffmpeg's stderr as
/// the diagnostic; the report has already been printed when this returns.
pub fn encode(command: &EncoderCommand) -> Result<()> {
    info!(
        output = %command.output().display(),
        input_fps = command.input_fps,
        output_fps = command.output_fps,
        "Encoding WebM"
    );
    shared_utils::run_ffmpeg_with_error_report(command.program(), &command.args())?;
    Ok(())
}
