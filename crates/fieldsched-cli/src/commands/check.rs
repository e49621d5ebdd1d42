//! Check command - Detect conflicts in a local job snapshot
//!
//! Provides the `fieldsched check` CLI command which:
//! 1. Loads a jobs snapshot from a JSON file
//! 2. Runs a detection pass, optionally applying the auto-action policy
//! 3. Prints a severity-grouped listing (or the full report as JSON)
//!
//! Exits with code 2 when open critical conflicts remain, so dispatch
//! scripts can gate on it.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use fieldsched_conflict::{DetectConflictsUseCase, PolicyEngine};
use fieldsched_core::config::Config;

use crate::commands::render_outcome;
use crate::output::{get_formatter, OutputFormat};
use crate::snapshot::load_snapshot;

/// Detect conflicts in a jobs snapshot file
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Path to a jobs snapshot JSON file
    #[arg(long)]
    jobs: PathBuf,

    /// Only check jobs scheduled on this date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Skip the auto-action policy; report every conflict as open
    #[arg(long)]
    no_policy: bool,
}

impl CheckCommand {
    /// Execute the check command
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<ExitCode> {
        let formatter = get_formatter(format);

        let (mut jobs, directory) = match load_snapshot(&self.jobs) {
            Ok(loaded) => loaded,
            Err(e) => {
                formatter.error(&format!("{e:#}"));
                return Ok(ExitCode::FAILURE);
            }
        };

        if let Some(date) = self.date {
            jobs.retain(|j| j.scheduled_date() == date);
        }

        info!(
            snapshot = %self.jobs.display(),
            jobs = jobs.len(),
            "Running offline detection pass"
        );

        // Offline runs have no gateway; policy resolve rules would stay
        // open anyway, but ignore rules still apply.
        let use_case = if self.no_policy {
            DetectConflictsUseCase::offline()
        } else {
            DetectConflictsUseCase::new(
                PolicyEngine::new(&config.policy.default_action, &config.policy.rules),
                None,
            )
        };

        let outcome = use_case.run(&jobs, &directory).await;
        Ok(render_outcome(&*formatter, format, &outcome))
    }
}
