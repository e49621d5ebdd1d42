//! Fetch-check command - Detect conflicts against the live backend
//!
//! Same pipeline as `check`, but the snapshot comes from the dispatch
//! backend's REST API and policy resolutions are submitted through it.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use tracing::info;

use fieldsched_api::{DispatchClient, RestDispatchProvider};
use fieldsched_conflict::{ConflictResolver, DetectConflictsUseCase, PolicyEngine};
use fieldsched_core::{config::Config, ports::job_source::DateWindow};

use crate::commands::render_outcome;
use crate::output::{get_formatter, OutputFormat};

/// Fetch jobs from the backend and detect conflicts
#[derive(Debug, Args)]
pub struct FetchCheckCommand {
    /// First day of the window (YYYY-MM-DD)
    #[arg(long)]
    from: NaiveDate,

    /// Last day of the window; defaults to `from`
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Skip the auto-action policy; report every conflict as open
    #[arg(long)]
    no_policy: bool,
}

impl FetchCheckCommand {
    /// Execute the fetch-check command
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<ExitCode> {
        let formatter = get_formatter(format);

        let window = match DateWindow::new(self.from, self.to.unwrap_or(self.from)) {
            Ok(window) => window,
            Err(e) => {
                formatter.error(&e.to_string());
                return Ok(ExitCode::FAILURE);
            }
        };

        if window.days() > i64::from(config.detection.max_window_days) {
            formatter.error(&format!(
                "Window of {} days exceeds detection.max_window_days ({})",
                window.days(),
                config.detection.max_window_days
            ));
            return Ok(ExitCode::FAILURE);
        }

        let client = DispatchClient::new(&config.api.base_url, config.api.timeout_secs)?;
        let provider = Arc::new(RestDispatchProvider::new(client));

        let (jobs, directory) = provider
            .fetch_snapshot(&window)
            .await
            .context("Failed to fetch jobs from the dispatch backend")?;

        info!(
            from = %window.from(),
            to = %window.to(),
            jobs = jobs.len(),
            "Running detection pass over fetched snapshot"
        );

        let use_case = if self.no_policy {
            DetectConflictsUseCase::offline()
        } else {
            DetectConflictsUseCase::new(
                PolicyEngine::new(&config.policy.default_action, &config.policy.rules),
                Some(Arc::new(ConflictResolver::new(provider))),
            )
        };

        let outcome = use_case.run(&jobs, &directory).await;
        Ok(render_outcome(&*formatter, format, &outcome))
    }
}
