//! Shared Utilities for gif2webm
//!
//! - Unified error type for the conversion pipeline
//! - Logging (stderr + rolling log file)
//! - FFmpeg process runner with error reports
//! - Batch file collection and result bookkeeping
//! - Progress bars and summary reports
//! - External tool detection

pub mod batch;
pub mod errors;
pub mod ffmpeg_process;
pub mod logging;
pub mod progress;
pub mod report;
pub mod tools;

pub use batch::{collect_files, has_extension, BatchResult, GIF_EXTENSIONS};
pub use errors::{GifWebmError, Result};
pub use ffmpeg_process::{
    format_ffmpeg_error, get_error_suggestion, run_ffmpeg_with_error_report, FfmpegError,
};
pub use progress::{create_progress_bar, format_bytes, format_duration};
pub use report::print_summary_report;
pub use tools::require_tool;
