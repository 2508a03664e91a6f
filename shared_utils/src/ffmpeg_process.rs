//! FFmpeg process runner with loud, structured error reports.
//!
//! The encoder is run to completion with [`std::process::Command::output`], which
//! drains stdout and stderr concurrently, so a chatty ffmpeg can never fill a pipe
//! buffer and stall. A non-zero exit becomes an [`FfmpegError`] carrying the full
//! stderr as diagnostic text plus a condensed one-line summary.
//!
//! ```ignore
//! use shared_utils::ffmpeg_process::run_ffmpeg_with_error_report;
//!
//! let args = vec!["-y".to_string(), "-i".to_string(), "in.png".to_string(), "out.webm".to_string()];
//! run_ffmpeg_with_error_report("ffmpeg", &args)?;
//! ```

use crate::errors::{GifWebmError, Result};
use crate::logging::log_external_tool;
use std::io::ErrorKind;
use std::process::{Command, Output};
use std::time::Instant;
use tracing::{debug, error, info};

/// 统一的 FFmpeg 错误格式化
///
/// Pulls the most meaningful line out of ffmpeg's stderr:
///
/// 1. the last line mentioning `Error`/`error`
/// 2. otherwise the last non-empty line that is not a progress line (`frame=`, `fps=`, `size=`)
/// 3. otherwise `"Unknown FFmpeg error"`
pub fn format_ffmpeg_error(stderr: &str) -> String {
    if let Some(error_line) = stderr
        .lines()
        .rev()
        .find(|line| line.contains("Error") || line.contains("error"))
    {
        return error_line.trim().to_string();
    }

    stderr
        .lines()
        .rev()
        .find(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty()
                && !trimmed.starts_with("frame=")
                && !trimmed.starts_with("fps=")
                && !trimmed.starts_with("size=")
        })
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "Unknown FFmpeg error".to_string())
}

/// FFmpeg 错误详情
#[derive(Debug, Clone)]
pub struct FfmpegError {
    /// 完整命令行
    pub command: String,
    /// stderr 输出
    pub stderr: String,
    /// 退出码, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// 可操作的建议
    pub suggestion: Option<String>,
}

impl FfmpegError {
    /// Condensed single-line reason, see [`format_ffmpeg_error`].
    pub fn summary(&self) -> String {
        format_ffmpeg_error(&self.stderr)
    }
}

impl std::fmt::Display for FfmpegError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "❌ FFMPEG ERROR")?;
        writeln!(f, "   Command: {}", self.command)?;
        if let Some(code) = self.exit_code {
            writeln!(f, "   Exit code: {}", code)?;
        }
        writeln!(f, "   Error: {}", self.summary())?;
        if let Some(ref suggestion) = self.suggestion {
            writeln!(f, "   💡 Suggestion: {}", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for FfmpegError {}

/// Maps common ffmpeg failure patterns to something the user can act on.
pub fn get_error_suggestion(stderr: &str) -> Option<String> {
    let patterns = [
        (
            "Unknown encoder",
            "Install an ffmpeg build with libvpx (VP9) support",
        ),
        (
            "Encoder not found",
            "Install an ffmpeg build with libvpx (VP9) support",
        ),
        (
            "No such file or directory",
            "Check that the scratch frames and output directory exist",
        ),
        (
            "Could find no file with path",
            "The frame sequence pattern matched no files; check the scratch directory",
        ),
        (
            "Permission denied",
            "Check write permissions on the output directory",
        ),
        (
            "Invalid data found",
            "A scratch frame may be corrupt; re-run the conversion",
        ),
        (
            "Invalid pixel format",
            "This ffmpeg build lacks yuva420p support for VP9",
        ),
    ];

    for (pattern, suggestion) in patterns {
        if stderr.contains(pattern) {
            return Some(suggestion.to_string());
        }
    }
    None
}

/// Runs `program` with `args`, returning the captured output on success.
///
/// Spawn failures map to [`GifWebmError::ToolNotFound`] (binary missing) or
/// [`GifWebmError::Io`]; a non-zero exit maps to [`GifWebmError::Encode`]. The
/// error report is logged and echoed to stderr before it is returned.
pub fn run_ffmpeg_with_error_report(program: &str, args: &[String]) -> Result<Output> {
    let command_str = format!("{} {}", program, args.join(" "));

    info!(command = %command_str, "Executing FFmpeg command");

    let start = Instant::now();
    let output = Command::new(program).args(args).output().map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            GifWebmError::ToolNotFound(program.to_string())
        } else {
            GifWebmError::Io(e)
        }
    })?;
    let duration = start.elapsed();

    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    log_external_tool(program, &arg_refs, &stderr, output.status.code(), duration);

    if !output.status.success() {
        let error = FfmpegError {
            command: command_str,
            suggestion: get_error_suggestion(&stderr),
            stderr,
            exit_code: output.status.code(),
        };

        error!(
            command = %error.command,
            exit_code = ?error.exit_code,
            stderr = %error.stderr,
            suggestion = ?error.suggestion,
            "FFmpeg command failed"
        );

        eprintln!("{}", error);

        return Err(error.into());
    }

    debug!(
        stdout_length = output.stdout.len(),
        stderr_length = output.stderr.len(),
        "FFmpeg output captured"
    );

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ffmpeg_error_with_error_line() {
        let stderr = r#"
frame=   90 fps= 45 q=0.0 size=     256kB time=00:00:01.50 bitrate=1398.1kbits/s
[libvpx-vp9 @ 0x7f8b8c000000] Error: invalid parameter
"#;
        let error = format_ffmpeg_error(stderr);
        assert!(error.contains("Error"));
        assert!(error.contains("invalid parameter"));
    }

    #[test]
    fn test_format_ffmpeg_error_no_error_line() {
        let stderr = r#"
frame=   90 fps= 45 q=0.0 size=     256kB time=00:00:01.50
Conversion failed!
"#;
        assert_eq!(format_ffmpeg_error(stderr), "Conversion failed!");
    }

    #[test]
    fn test_format_ffmpeg_error_empty() {
        assert_eq!(format_ffmpeg_error(""), "Unknown FFmpeg error");
    }

    #[test]
    fn test_suggestion_for_missing_vp9() {
        let suggestion = get_error_suggestion("Unknown encoder 'libvpx-vp9'");
        assert!(suggestion.unwrap().contains("libvpx"));
        assert!(get_error_suggestion("all good").is_none());
    }

    #[test]
    fn test_display_includes_command_and_code() {
        let err = FfmpegError {
            command: "ffmpeg -y out.webm".to_string(),
            stderr: "out.webm: Permission denied\n".to_string(),
            exit_code: Some(1),
            suggestion: get_error_suggestion("Permission denied"),
        };
        let text = err.to_string();
        assert!(text.contains("ffmpeg -y out.webm"));
        assert!(text.contains("Exit code: 1"));
        assert!(text.contains("Permission denied"));
        assert!(text.contains("Suggestion"));
    }

    #[test]
    fn test_missing_program_is_tool_not_found() {
        let result = run_ffmpeg_with_error_report("nonexistent_encoder_xyz", &[]);
        assert!(matches!(result, Err(GifWebmError::ToolNotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_encode_error() {
        let result = run_ffmpeg_with_error_report("false", &[]);
        match result {
            Err(GifWebmError::Encode(e)) => assert_eq!(e.exit_code, Some(1)),
            other => panic!("expected encode error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_zero_exit_is_ok() {
        let args = vec!["hello".to_string()];
        let output = run_ffmpeg_with_error_report("echo", &args).unwrap();
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }
}
