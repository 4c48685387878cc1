//! Terminal output for pipeline progress and the final report.
//!
//! Each concern has a `format_*` function (pure, returns strings) and a
//! `print_*` wrapper that writes to stdout. Format functions have no I/O or
//! side effects, so tests assert on the exact lines.

use crate::pipeline::RunReport;

/// Stage banner: `==> Generating valentines`.
pub fn format_stage(label: &str) -> String {
    format!("==> {}", label)
}

/// Per-follower success line: `    generated @alice`.
pub fn format_follower_ok(action: &str, handle: &str) -> String {
    format!("    {} @{}", action, handle)
}

/// Per-follower failure line: `    FAILED @bob (upload): no media id`.
pub fn format_follower_failed(handle: &str, stage: &str, reason: &str) -> String {
    format!("    FAILED @{} ({}): {}", handle, stage, reason)
}

/// Final summary: sent count plus one line per failed handle.
pub fn format_report(report: &RunReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Sent {} of {} valentines as @{}",
        report.sent(),
        report.deliveries.len(),
        report.identity.handle
    )];
    let failures = report.failures();
    if !failures.is_empty() {
        lines.push(format!("{} failed:", failures.len()));
        for (handle, stage, reason) in failures {
            lines.push(format!("    @{} at {}: {}", handle, stage, reason));
        }
    }
    lines
}

pub fn print_stage(label: &str) {
    println!("{}", format_stage(label));
}

pub fn print_follower_ok(action: &str, handle: &str) {
    println!("{}", format_follower_ok(action, handle));
}

pub fn print_follower_failed(handle: &str, stage: &str, reason: &str) {
    println!("{}", format_follower_failed(handle, stage, reason));
}

pub fn print_report(report: &RunReport) {
    for line in format_report(report) {
        println!("{}", line);
    }
}
