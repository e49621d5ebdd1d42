//! CLI command implementations

pub mod check;
pub mod config;
pub mod fetch_check;
pub mod resolve;

use std::process::ExitCode;

use fieldsched_conflict::DetectionOutcome;
use fieldsched_core::domain::conflict::{Conflict, Severity};

use crate::output::{OutputFormat, OutputFormatter};

/// Exit code signalled when open critical conflicts remain
///
/// Lets dispatcher scripts gate on `fieldsched check` without parsing
/// output.
const EXIT_CRITICAL_OPEN: u8 = 2;

/// Glyph prefix for a severity tier in human output
fn severity_glyph(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "!!",
        Severity::High => " !",
        Severity::Medium => " ~",
        Severity::Low => "  ",
    }
}

/// Truncate a conflict key for table display
fn truncate_key(key: &str, max_len: usize) -> String {
    if key.len() <= max_len {
        key.to_string()
    } else {
        format!("{}...", &key[..max_len - 3])
    }
}

/// Renders a detection outcome and returns the process exit code
pub(crate) fn render_outcome(
    formatter: &dyn OutputFormatter,
    format: OutputFormat,
    outcome: &DetectionOutcome,
) -> ExitCode {
    let counts = outcome.open_severity_counts();

    if format.is_json() {
        let mut json = serde_json::to_value(outcome).unwrap_or_default();
        if let Some(object) = json.as_object_mut() {
            object.insert(
                "open_severity_counts".to_string(),
                serde_json::to_value(counts).unwrap_or_default(),
            );
        }
        formatter.print_json(&json);
    } else if outcome.total_detected() == 0 {
        formatter.success(&format!(
            "No conflicts detected ({} jobs scanned, {} eligible)",
            outcome.jobs_scanned, outcome.eligible_jobs
        ));
    } else {
        formatter.success(&format!(
            "{} conflict{} detected, {} open ({} jobs scanned, {} eligible)",
            outcome.total_detected(),
            if outcome.total_detected() == 1 { "" } else { "s" },
            outcome.open.len(),
            outcome.jobs_scanned,
            outcome.eligible_jobs
        ));
        formatter.info(&format!(
            "critical: {}  high: {}  medium: {}  low: {}",
            counts.critical, counts.high, counts.medium, counts.low
        ));

        if !outcome.open.is_empty() {
            formatter.info("");
            for severity in [
                Severity::Critical,
                Severity::High,
                Severity::Medium,
                Severity::Low,
            ] {
                for conflict in open_at(outcome, severity) {
                    formatter.info(&format!(
                        "{} [{}] {:<44} {}",
                        severity_glyph(severity),
                        severity,
                        truncate_key(conflict.key().as_str(), 44),
                        conflict.description()
                    ));
                }
            }
        }

        if !outcome.auto_resolved.is_empty() {
            formatter.info("");
            formatter.info(&format!(
                "{} auto-resolved by policy",
                outcome.auto_resolved.len()
            ));
        }
        if !outcome.auto_ignored.is_empty() {
            formatter.info(&format!(
                "{} suppressed by policy",
                outcome.auto_ignored.len()
            ));
        }
    }

    if counts.critical > 0 {
        ExitCode::from(EXIT_CRITICAL_OPEN)
    } else {
        ExitCode::SUCCESS
    }
}

fn open_at(outcome: &DetectionOutcome, severity: Severity) -> impl Iterator<Item = &Conflict> {
    outcome
        .open
        .iter()
        .filter(move |c| c.severity() == severity)
}
