//! Resolve command - Act on a detected conflict
//!
//! Recomputes the conflict list from a jobs snapshot, finds the target by
//! key (full or unique prefix), and either submits the resolution through
//! the dispatch backend or, with `--offline`, annotates locally.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use tracing::info;

use fieldsched_api::{DispatchClient, RestDispatchProvider};
use fieldsched_conflict::{resolution, ConflictEngine, ConflictResolver, ResolveConflictUseCase};
use fieldsched_core::{
    config::Config,
    domain::conflict::{Conflict, ResolutionMethod, ResolutionSource},
};

use crate::output::{get_formatter, OutputFormat, OutputFormatter};
use crate::snapshot::load_snapshot;

/// Resolve a conflict by key
#[derive(Debug, Args)]
pub struct ResolveCommand {
    /// Conflict key (full, or a unique prefix)
    key: String,

    /// Resolution method: reschedule_job, reassign_technician, split_job,
    /// or manual_resolution
    #[arg(long)]
    method: String,

    /// Jobs snapshot to recompute the conflict list from
    #[arg(long)]
    jobs: PathBuf,

    /// Annotate locally without contacting the dispatch backend
    #[arg(long)]
    offline: bool,
}

impl ResolveCommand {
    /// Execute the resolve command
    pub async fn execute(&self, config: &Config, format: OutputFormat) -> Result<ExitCode> {
        let formatter = get_formatter(format);

        let method = match self.method.parse::<ResolutionMethod>() {
            Ok(method) => method,
            Err(_) => {
                formatter.error(&format!(
                    "Unknown method: '{}'. Valid: reschedule_job, reassign_technician, \
                     split_job, manual_resolution",
                    self.method
                ));
                return Ok(ExitCode::FAILURE);
            }
        };

        let (jobs, directory) = match load_snapshot(&self.jobs) {
            Ok(loaded) => loaded,
            Err(e) => {
                formatter.error(&format!("{e:#}"));
                return Ok(ExitCode::FAILURE);
            }
        };

        let report = ConflictEngine::detect(&jobs, &directory);
        let Some(conflict) = resolution::find_by_key(&report.conflicts, &self.key) else {
            formatter.error(&format!(
                "No conflict matches key '{}' in the current snapshot",
                self.key
            ));
            formatter.info("Run 'fieldsched check' to list current conflict keys.");
            return Ok(ExitCode::FAILURE);
        };
        let conflict = conflict.clone();

        info!(
            key = %conflict.key(),
            method = %method,
            offline = self.offline,
            "Resolving conflict"
        );

        let resolved = if self.offline {
            let key = conflict.key().clone();
            let updated =
                resolution::resolve(report.conflicts, &key, method, ResolutionSource::User)?;
            updated
                .into_iter()
                .find(|c| c.key() == &key)
                .expect("resolved conflict stays in list")
        } else {
            let client = DispatchClient::new(&config.api.base_url, config.api.timeout_secs)?;
            let resolver = Arc::new(ConflictResolver::new(Arc::new(
                RestDispatchProvider::new(client),
            )));
            match ResolveConflictUseCase::new(resolver)
                .resolve(conflict, method)
                .await
            {
                Ok(resolved) => resolved,
                Err(e) => {
                    // Submission failed; the conflict is still open.
                    formatter.error(&e.to_string());
                    return Ok(ExitCode::FAILURE);
                }
            }
        };

        print_resolved(&*formatter, format, &resolved);
        Ok(ExitCode::SUCCESS)
    }
}

fn print_resolved(formatter: &dyn OutputFormatter, format: OutputFormat, conflict: &Conflict) {
    if format.is_json() {
        formatter.print_json(&serde_json::to_value(conflict).unwrap_or_default());
        return;
    }

    formatter.success(&format!(
        "Conflict {} resolved: {}",
        conflict.key(),
        conflict
            .resolution()
            .map(|m| m.to_string())
            .unwrap_or_default()
    ));
    formatter.info(&conflict.description().to_string());
    if let Some(resolved_at) = conflict.resolved_at() {
        formatter.info(&format!(
            "Resolved at {}",
            resolved_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
    }
}
