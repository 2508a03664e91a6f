//! gif2webm - animated GIF → transparent VP9 WebM clips
//!
//! Every GIF is decoded to RGBA frames, looped until it plays for at least the
//! target duration at its own speed, resampled to a fixed square size, staged as
//! numbered PNGs and encoded by ffmpeg with an alpha-capable codec.
//!
//! ```rust,ignore
//! use gif2webm::{run_batch, BatchConfig};
//!
//! let summary = run_batch(&BatchConfig::new("input", "output"))?;
//! println!("{} converted", summary.succeeded);
//! ```

pub mod batch;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod frames;
pub mod pipeline;
pub mod scratch;
pub mod timing;

pub use batch::{collect_gifs, output_path_for, run_batch, run_batch_with};
pub use config::{BatchConfig, ConversionConfig, FailurePolicy};
pub use decoder::{decode_gif, DecodedGif};
pub use encoder::{encode, EncoderCommand};
pub use frames::{repeat_frames, resize_frame, resize_frames};
pub use pipeline::{convert_gif, plan_gif, ConversionOutput, GifSummary};
pub use scratch::ScratchDir;
pub use timing::TimingPlan;

pub use shared_utils::errors::{GifWebmError, Result};
pub use shared_utils::BatchResult;
