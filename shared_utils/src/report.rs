//! Report Module
//!
//! Summary box printed at the end of a batch run.

use crate::batch::BatchResult;
use crate::progress::{format_bytes, format_duration};
use std::time::Duration;

pub fn print_summary_report(result: &BatchResult, duration: Duration, operation_name: &str) {
    println!();
    println!("╔════════════════════════════════════════════════════╗");
    println!("║  📊 {:<47}║", format!("{} Summary Report", operation_name));
    println!("╠════════════════════════════════════════════════════╣");
    println!("║  📁 Files Processed:    {:>10}                 ║", result.total);
    println!("║  ✅ Succeeded:          {:>10}                 ║", result.succeeded);
    println!("║  ❌ Failed:             {:>10}                 ║", result.failed);
    println!(
        "║  📈 Success Rate:       {:>9.1}%                 ║",
        result.success_rate()
    );
    println!(
        "║  💾 Output Size:        {:>10}                 ║",
        format_bytes(result.output_bytes)
    );
    println!(
        "║  ⏱️  Total Time:         {:>10}                 ║",
        format_duration(duration)
    );
    println!("╚════════════════════════════════════════════════════╝");

    if !result.errors.is_empty() {
        println!();
        println!("❌ Errors encountered:");
        for (path, error) in &result.errors {
            println!("   {} → {}", path.display(), error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_print_summary_report_no_panic() {
        let mut result = BatchResult::new();
        result.success(4096);
        result.fail(PathBuf::from("broken.gif"), "decode".to_string());
        print_summary_report(&result, Duration::from_secs(3), "GIF → WebM");
    }

    #[test]
    fn test_print_summary_report_empty_batch() {
        print_summary_report(&BatchResult::new(), Duration::ZERO, "GIF → WebM");
    }
}
