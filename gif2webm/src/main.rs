use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};

use gif2webm::config::{
    DEFAULT_BITRATE, DEFAULT_ENCODER, DEFAULT_SCRATCH_DIR, DEFAULT_TARGET_DURATION_SECS,
    DEFAULT_TARGET_FPS, DEFAULT_TARGET_SIZE, OUTPUT_EXTENSION,
};
use gif2webm::{convert_gif, plan_gif, run_batch, BatchConfig, ConversionConfig, FailurePolicy};
use shared_utils::logging::LogConfig;

#[derive(Parser)]
#[command(name = "gif2webm")]
#[command(version, about = "Batch-convert animated GIFs into transparent VP9 WebM clips", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    verbose: bool,

    /// Hide per-file progress bars
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Directory for the rotating log file (defaults to the system temp dir)
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct TuningArgs {
    /// Output frame rate
    #[arg(long, default_value_t = DEFAULT_TARGET_FPS)]
    fps: u32,
    /// Minimum clip length in seconds; the GIF is looped to reach it
    #[arg(long, default_value_t = DEFAULT_TARGET_DURATION_SECS)]
    duration: f64,
    /// Output width and height in pixels
    #[arg(long, default_value_t = DEFAULT_TARGET_SIZE)]
    size: u32,
    /// Target video bitrate passed to the encoder
    #[arg(long, default_value = DEFAULT_BITRATE)]
    bitrate: String,
    /// Directory used to stage numbered frames
    #[arg(long, default_value = DEFAULT_SCRATCH_DIR)]
    scratch_dir: PathBuf,
    /// ffmpeg binary
    #[arg(long, default_value = DEFAULT_ENCODER)]
    ffmpeg: String,
}

impl TuningArgs {
    fn into_config(self) -> ConversionConfig {
        ConversionConfig {
            target_fps: self.fps,
            target_duration_secs: self.duration,
            target_size: self.size,
            bitrate: self.bitrate,
            scratch_dir: self.scratch_dir,
            encoder: self.ffmpeg,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert every GIF in a directory
    Run {
        #[arg(value_name = "INPUT_DIR", default_value = "input")]
        input: PathBuf,
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
        /// Keep converting after a file fails (exit status is still non-zero)
        #[arg(long)]
        keep_going: bool,
        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Convert a single GIF
    Convert {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        /// Defaults to the input path with a .webm extension
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        tuning: TuningArgs,
    },

    /// Show the timing plan for a GIF without converting it
    Plan {
        #[arg(value_name = "INPUT")]
        input: PathBuf,
        #[arg(long, default_value_t = DEFAULT_TARGET_DURATION_SECS)]
        duration: f64,
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.quiet {
        shared_utils::progress::enable_quiet_mode();
    }

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let mut log_config = LogConfig::new().with_level(level);
    if let Some(dir) = &cli.log_dir {
        log_config = log_config.with_log_dir(dir);
    }
    if let Err(e) = shared_utils::logging::init_logging("gif2webm", log_config) {
        eprintln!("⚠️  Could not initialize logging: {:#}", e);
    }

    match cli.command {
        Commands::Run {
            input,
            output,
            keep_going,
            tuning,
        } => {
            let conversion = tuning.into_config();
            shared_utils::require_tool(&conversion.encoder)?;

            let policy = if keep_going {
                FailurePolicy::Continue
            } else {
                FailurePolicy::Halt
            };
            let config = BatchConfig::new(input, output)
                .with_conversion(conversion)
                .with_policy(policy);

            info!("🎬 GIF → WebM (VP9 + alpha)");
            info!(
                "   {}x{} @ {} fps, ≥{}s per clip",
                config.conversion.target_size,
                config.conversion.target_size,
                config.conversion.target_fps,
                config.conversion.target_duration_secs
            );
            info!(
                "   {} → {}",
                config.input_dir.display(),
                config.output_dir.display()
            );

            let summary = run_batch(&config)?;
            if summary.has_failures() {
                anyhow::bail!(
                    "{} of {} files failed to convert",
                    summary.failed,
                    summary.total
                );
            }
        }

        Commands::Convert {
            input,
            output,
            tuning,
        } => {
            let conversion = tuning.into_config();
            shared_utils::require_tool(&conversion.encoder)?;

            let output = output.unwrap_or_else(|| input.with_extension(OUTPUT_EXTENSION));
            info!("🔄 Converting: {} -> {}", input.display(), output.display());

            let result = convert_gif(&input, &output, &conversion)
                .with_context(|| format!("Failed to convert {}", input.display()))?;

            info!("✅ Done: {}", result.output_path.display());
            info!(
                "   {} frames, {}",
                result.output_frames,
                shared_utils::format_bytes(result.output_size)
            );
        }

        Commands::Plan {
            input,
            duration,
            json,
        } => {
            let (gif, plan) = plan_gif(&input, duration)?;

            if json {
                let report = serde_json::json!({ "gif": gif, "plan": plan });
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("\n🎯 Timing Plan");
                println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
                println!("📁 File: {}", gif.path.display());
                println!("📐 Canvas: {}x{}", gif.width, gif.height);
                println!(
                    "🎞️  Frames: {} ({} ms total)",
                    gif.frame_count, plan.total_duration_ms
                );
                println!("🌈 Transparency: {}", if gif.has_transparency { "yes" } else { "no" });
                println!();
                println!("⏱️  Original: {:.2}s @ {:.2} fps", plan.original_duration_secs, plan.original_fps);
                println!(
                    "🔁 Repeat: {}x → {} frames, {:.2}s (target ≥{}s)",
                    plan.repeat_count,
                    plan.repeated_frame_count(),
                    plan.nominal_duration_secs(),
                    plan.target_duration_secs
                );
                println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            }
        }
    }

    Ok(())
}
