//! Batch driver: every GIF in the input directory, one at a time.

use crate::config::{BatchConfig, FailurePolicy, OUTPUT_EXTENSION};
use crate::pipeline::{convert_gif, ConversionOutput};
use crate::Result;
use shared_utils::{collect_files, BatchResult, GIF_EXTENSIONS};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, warn};

/// `<output_dir>/<input stem>.webm`
pub fn output_path_for(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_else(|| input.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    output_dir.join(name)
}

/// GIFs directly inside `input_dir`, in file-name order.
pub fn collect_gifs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(collect_files(input_dir, GIF_EXTENSIONS)?)
}

/// Runs the batch with the real pipeline.
pub fn run_batch(config: &BatchConfig) -> Result<BatchResult> {
    run_batch_with(config, |input, output| {
        convert_gif(input, output, &config.conversion)
    })
}

/// Batch loop with the per-file conversion injected.
///
/// Under [`FailurePolicy::Halt`] the first failing file's error is returned after
/// the summary is printed; under [`FailurePolicy::Continue`] failures are only
/// recorded in the returned [`BatchResult`].
pub fn run_batch_with<F>(config: &BatchConfig, mut convert: F) -> Result<BatchResult>
where
    F: FnMut(&Path, &Path) -> Result<ConversionOutput>,
{
    config.conversion.validate()?;
    fs::create_dir_all(&config.output_dir)?;

    let files = collect_gifs(&config.input_dir)?;
    if files.is_empty() {
        warn!(
            "No GIF files found in directory: {}",
            config.input_dir.display()
        );
    } else {
        info!("📂 Found {} GIF files to convert", files.len());
    }

    let start = Instant::now();
    let mut batch = BatchResult::new();

    for input in &files {
        let output = output_path_for(input, &config.output_dir);
        info!("🔄 Converting: {} -> {}", input.display(), output.display());

        match convert(input, &output) {
            Ok(result) => {
                info!(
                    "✅ Done: {} ({} frames, {:.1}s)",
                    output.display(),
                    result.output_frames,
                    result.elapsed.as_secs_f64()
                );
                batch.success(result.output_size);
            }
            Err(e) => {
                error!("❌ Failed: {} [{}] {}", input.display(), e.kind(), e);
                batch.fail(input.clone(), e.to_string());
                if config.policy == FailurePolicy::Halt {
                    shared_utils::print_summary_report(&batch, start.elapsed(), "GIF → WebM");
                    return Err(e);
                }
            }
        }
    }

    shared_utils::print_summary_report(&batch, start.elapsed(), "GIF → WebM");
    if !batch.has_failures() {
        info!("🎉 All conversions complete!");
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::TimingPlan;
    use crate::GifWebmError;
    use std::time::Duration;
    use tempfile::TempDir;

    fn fake_output(input: &Path, output: &Path) -> ConversionOutput {
        ConversionOutput {
            input_path: input.to_path_buf(),
            output_path: output.to_path_buf(),
            plan: TimingPlan::compute(input, &[100; 10], 3.0).unwrap(),
            output_frames: 30,
            output_size: 10,
            elapsed: Duration::from_millis(1),
        }
    }

    fn input_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        dir
    }

    #[test]
    fn test_output_path_for() {
        assert_eq!(
            output_path_for(Path::new("input/a.GIF"), Path::new("output")),
            PathBuf::from("output/a.webm")
        );
        assert_eq!(
            output_path_for(Path::new("x/my.cat.gif"), Path::new("/out")),
            PathBuf::from("/out/my.cat.webm")
        );
    }

    #[test]
    fn test_only_gifs_are_dispatched_in_order() {
        let input = input_dir(&["b.gif", "a.GIF", "notes.txt"]);
        let out_root = TempDir::new().unwrap();
        let output_dir = out_root.path().join("output");
        let config = BatchConfig::new(input.path(), &output_dir);

        let mut seen = Vec::new();
        let result = run_batch_with(&config, |i, o| {
            seen.push((
                i.file_name().unwrap().to_string_lossy().to_string(),
                o.to_path_buf(),
            ));
            Ok(fake_output(i, o))
        })
        .unwrap();

        assert!(output_dir.is_dir());
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.output_bytes, 20);
        assert_eq!(
            seen,
            vec![
                ("a.GIF".to_string(), output_dir.join("a.webm")),
                ("b.gif".to_string(), output_dir.join("b.webm")),
            ]
        );
    }

    fn failing(i: &Path, o: &Path) -> Result<ConversionOutput> {
        if i.file_name().unwrap() == "b.gif" {
            Err(GifWebmError::InvalidInput {
                path: i.to_path_buf(),
                reason: "total frame duration is 0 ms".to_string(),
            })
        } else {
            Ok(fake_output(i, o))
        }
    }

    #[test]
    fn test_halt_policy_stops_at_first_failure() {
        let input = input_dir(&["a.gif", "b.gif", "c.gif"]);
        let out = TempDir::new().unwrap();
        let config = BatchConfig::new(input.path(), out.path());

        let mut calls = 0;
        let err = run_batch_with(&config, |i, o| {
            calls += 1;
            failing(i, o)
        })
        .unwrap_err();

        assert!(matches!(err, GifWebmError::InvalidInput { .. }));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_continue_policy_records_and_moves_on() {
        let input = input_dir(&["a.gif", "b.gif", "c.gif"]);
        let out = TempDir::new().unwrap();
        let config =
            BatchConfig::new(input.path(), out.path()).with_policy(FailurePolicy::Continue);

        let result = run_batch_with(&config, failing).unwrap();
        assert_eq!(result.total, 3);
        assert_eq!(result.succeeded, 2);
        assert_eq!(result.failed, 1);
        assert!(result.errors[0].0.ends_with("b.gif"));
    }

    #[test]
    fn test_missing_input_dir_is_io_error() {
        let root = TempDir::new().unwrap();
        let config = BatchConfig::new(root.path().join("missing"), root.path().join("out"));
        let err = run_batch_with(&config, |i, o| Ok(fake_output(i, o))).unwrap_err();
        assert!(matches!(err, GifWebmError::Io(_)));
    }

    #[test]
    fn test_invalid_config_rejected_before_any_io() {
        let root = TempDir::new().unwrap();
        let output_dir = root.path().join("out");
        let mut config = BatchConfig::new(root.path(), &output_dir);
        config.conversion.target_size = 0;
        let err = run_batch_with(&config, |i, o| Ok(fake_output(i, o))).unwrap_err();
        assert!(matches!(err, GifWebmError::InvalidConfig(_)));
        assert!(!output_dir.exists());
    }
}
