//! One conversion job: GIF in, WebM out.
//!
//! decode → plan → resize → repeat → stage frames → encode. The scratch guard is
//! created after all validation, so a GIF rejected for its timing never touches
//! the filesystem.

use crate::config::ConversionConfig;
use crate::decoder::{decode_gif, DecodedGif};
use crate::encoder::{encode, EncoderCommand};
use crate::frames::{repeat_frames, resize_frames};
use crate::scratch::ScratchDir;
use crate::timing::TimingPlan;
use crate::Result;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutput {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub plan: TimingPlan,
    pub output_frames: usize,
    pub output_size: u64,
    #[serde(skip)]
    pub elapsed: Duration,
}

/// Source metadata reported by [`plan_gif`].
#[derive(Debug, Clone, Serialize)]
pub struct GifSummary {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub frame_count: usize,
    pub delays_ms: Vec<u32>,
    pub has_transparency: bool,
}

impl GifSummary {
    fn from_decoded(path: &Path, gif: &DecodedGif) -> Self {
        Self {
            path: path.to_path_buf(),
            width: gif.width,
            height: gif.height,
            frame_count: gif.frame_count(),
            delays_ms: gif.delays_ms.clone(),
            has_transparency: gif.has_transparency(),
        }
    }
}

/// Decodes `input` and computes its timing plan without writing anything.
pub fn plan_gif(input: &Path, target_duration_secs: f64) -> Result<(GifSummary, TimingPlan)> {
    let gif = decode_gif(input)?;
    let plan = TimingPlan::compute(input, &gif.delays_ms, target_duration_secs)?;
    Ok((GifSummary::from_decoded(input, &gif), plan))
}

fn log_plan(plan: &TimingPlan) {
    info!(
        "   Original average frame rate: {:.2} FPS",
        plan.original_fps
    );
    info!(
        "   Original duration: {:.2}s, repeating {}x to reach ≥{}s",
        plan.original_duration_secs, plan.repeat_count, plan.target_duration_secs
    );
}

/// Converts one GIF to a WebM at `output`.
///
/// The scratch directory from `config` is created for this job and removed before
/// this function returns, on success and on every error path.
pub fn convert_gif(input: &Path, output: &Path, config: &ConversionConfig) -> Result<ConversionOutput> {
    config.validate()?;
    let start = Instant::now();

    let gif = decode_gif(input)?;
    let plan = TimingPlan::compute(input, &gif.delays_ms, config.target_duration_secs)?;
    log_plan(&plan);

    // Resampling is deterministic, so resizing each distinct frame once and then
    // looping gives the same sequence as looping first.
    let resized = resize_frames(&gif.frames, config.target_size);
    drop(gif);

    let mut scratch = ScratchDir::create(&config.scratch_dir)?;
    let label = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let pb = shared_utils::create_progress_bar(plan.repeated_frame_count() as u64, &label);
    let written = scratch.write_frames(
        repeat_frames(&resized, plan.repeat_count),
        |n| pb.set_position(n as u64),
    );
    pb.finish_and_clear();
    let output_frames = written?.len();

    let command = EncoderCommand::new(scratch.input_pattern(), plan.original_fps, config, output);
    encode(&command)?;
    scratch.cleanup();

    let output_size = fs::metadata(output).map(|m| m.len()).unwrap_or(0);
    Ok(ConversionOutput {
        input_path: input.to_path_buf(),
        output_path: output.to_path_buf(),
        plan,
        output_frames,
        output_size,
        elapsed: start.elapsed(),
    })
}
