//! Frame-rate and loop-count normalization.
//!
//! The GIF keeps its own nominal speed (`original_fps` becomes the encoder's input
//! rate) and is looped a whole number of times until it plays for at least the
//! target duration.

use crate::{GifWebmError, Result};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingPlan {
    pub frame_count: usize,
    pub total_duration_ms: u64,
    pub average_frame_ms: f64,
    pub original_fps: f64,
    pub original_duration_secs: f64,
    pub target_duration_secs: f64,
    /// How many times the whole frame sequence is played back to back. Always ≥ 1.
    pub repeat_count: usize,
}

/// Slowest source rate that survives the two-decimal `-framerate` argument
/// (anything lower prints as `0.00`).
pub const MIN_ORIGINAL_FPS: f64 = 0.005;

/// `ceil(a / b)` for `b > 0`.
fn ceil_div(a: u64, b: u64) -> u64 {
    a / b + u64::from(a % b != 0)
}

/// Target duration in whole milliseconds, rounded up so the guarantee is never
/// weakened by truncation. Sub-microsecond float noise is rounded away first.
pub fn target_duration_ms(target_duration_secs: f64) -> u64 {
    let micros = (target_duration_secs.max(0.0) * 1_000_000.0).round() as u64;
    ceil_div(micros, 1000)
}

impl TimingPlan {
    /// Builds the plan for a GIF with the given per-frame delays.
    ///
    /// Fails with [`GifWebmError::InvalidInput`] when the delays sum to zero (that
    /// includes an empty delay list): such a GIF has no speed to preserve. Also fails
    /// when the average frame is shown so long that the rate drops below
    /// [`MIN_ORIGINAL_FPS`].
    pub fn compute(path: &Path, delays_ms: &[u32], target_duration_secs: f64) -> Result<Self> {
        let total_duration_ms: u64 = delays_ms.iter().map(|&d| u64::from(d)).sum();
        if total_duration_ms == 0 {
            return Err(GifWebmError::InvalidInput {
                path: path.to_path_buf(),
                reason: "total frame duration is 0 ms, cannot derive a frame rate".to_string(),
            });
        }

        let frame_count = delays_ms.len();
        let average_frame_ms = total_duration_ms as f64 / frame_count as f64;
        let original_fps = 1000.0 / average_frame_ms;
        if original_fps < MIN_ORIGINAL_FPS {
            return Err(GifWebmError::InvalidInput {
                path: path.to_path_buf(),
                reason: format!(
                    "average frame delay of {:.0} ms gives {:.4} fps, below the encoder input minimum of {} fps",
                    average_frame_ms, original_fps, MIN_ORIGINAL_FPS
                ),
            });
        }
        let original_duration_secs = total_duration_ms as f64 / 1000.0;

        // Integer ceiling: float division would turn 3 / 0.3 into 10.000000000000002
        // and add a loop.
        let repeat_count =
            ceil_div(target_duration_ms(target_duration_secs), total_duration_ms).max(1) as usize;

        Ok(Self {
            frame_count,
            total_duration_ms,
            average_frame_ms,
            original_fps,
            original_duration_secs,
            target_duration_secs,
            repeat_count,
        })
    }

    pub fn repeated_frame_count(&self) -> usize {
        self.frame_count * self.repeat_count
    }

    /// Playback length of the looped sequence at `original_fps`.
    pub fn nominal_duration_secs(&self) -> f64 {
        self.original_duration_secs * self.repeat_count as f64
    }

    /// Encoder input rate, formatted the way it is passed on the command line.
    pub fn input_rate_arg(&self) -> String {
        format!("{:.2}", self.original_fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(delays: &[u32], target: f64) -> Result<TimingPlan> {
        TimingPlan::compute(Path::new("test.gif"), delays, target)
    }

    #[test]
    fn test_ten_frames_at_100ms() {
        let p = plan(&[100; 10], 3.0).unwrap();
        assert_eq!(p.frame_count, 10);
        assert_eq!(p.total_duration_ms, 1000);
        assert!((p.original_fps - 10.0).abs() < 1e-9);
        assert!((p.original_duration_secs - 1.0).abs() < 1e-9);
        assert_eq!(p.repeat_count, 3);
        assert_eq!(p.repeated_frame_count(), 30);
        assert_eq!(p.input_rate_arg(), "10.00");
        assert!((p.nominal_duration_secs() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_total_duration_is_invalid() {
        let err = plan(&[0, 0, 0], 3.0).unwrap_err();
        assert!(matches!(err, GifWebmError::InvalidInput { .. }));
        assert!(matches!(
            plan(&[], 3.0),
            Err(GifWebmError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_very_slow_gif_is_invalid() {
        // 250 s per frame would print as "-framerate 0.00".
        let err = plan(&[250_000, 250_000], 3.0).unwrap_err();
        assert!(matches!(err, GifWebmError::InvalidInput { ref reason, .. } if reason.contains("250000 ms")));

        let p = plan(&[100_000], 3.0).unwrap();
        assert_eq!(p.input_rate_arg(), "0.01");
        assert_eq!(p.repeat_count, 1);
    }

    #[test]
    fn test_longer_than_target_plays_once() {
        let p = plan(&[500; 10], 3.0).unwrap();
        assert_eq!(p.repeat_count, 1);
        let p = plan(&[100; 10], 0.0).unwrap();
        assert_eq!(p.repeat_count, 1);
    }

    #[test]
    fn test_float_edge_does_not_add_a_loop() {
        // 300 ms total, 3 s target: exactly 10 loops.
        let p = plan(&[100, 100, 100], 3.0).unwrap();
        assert_eq!(p.repeat_count, 10);
    }

    #[test]
    fn test_uneven_delays() {
        // 70 ms total, average 35 ms, fps ≈ 28.57; ceil(3000 / 70) = 43.
        let p = plan(&[20, 50], 3.0).unwrap();
        assert!((p.average_frame_ms - 35.0).abs() < 1e-9);
        assert_eq!(p.input_rate_arg(), "28.57");
        assert_eq!(p.repeat_count, 43);
    }

    #[test]
    fn test_plan_serializes() {
        let p = plan(&[100; 10], 3.0).unwrap();
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["repeat_count"], 3);
        assert_eq!(json["frame_count"], 10);
    }
}

#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The looped sequence always plays at least as long as the target, and one
        /// loop fewer would fall short.
        #[test]
        fn prop_repeat_count_reaches_target(
            delays in prop::collection::vec(0u32..2000, 1..64),
            target_ms in 0u64..20_000,
        ) {
            let total: u64 = delays.iter().map(|&d| u64::from(d)).sum();
            prop_assume!(total > 0);
            let target = target_ms as f64 / 1000.0;

            let p = TimingPlan::compute(Path::new("p.gif"), &delays, target).unwrap();
            let target_ms = target_duration_ms(target);

            prop_assert!(p.repeat_count >= 1);
            prop_assert!(p.repeat_count as u64 * total >= target_ms);
            if p.repeat_count > 1 {
                prop_assert!((p.repeat_count as u64 - 1) * total < target_ms);
            }
            prop_assert_eq!(p.repeated_frame_count(), delays.len() * p.repeat_count);
        }

        #[test]
        fn prop_fps_matches_average(delays in prop::collection::vec(1u32..1000, 1..64)) {
            let p = TimingPlan::compute(Path::new("p.gif"), &delays, 3.0).unwrap();
            let expected = 1000.0 * delays.len() as f64
                / delays.iter().map(|&d| d as f64).sum::<f64>();
            prop_assert!((p.original_fps - expected).abs() < 1e-6);
        }
    }
}
