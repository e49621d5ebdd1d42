//! Config command - Inspect Fieldsched configuration
//!
//! Provides the `fieldsched config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Validates the configuration file and reports errors
//! 3. Prints the configuration file path in use

use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;
use tracing::info;

use fieldsched_core::config::Config;

use crate::output::{get_formatter, OutputFormat};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Validate the configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<ExitCode> {
        match self {
            ConfigCommand::Show => self.execute_show(config_path, format).await,
            ConfigCommand::Validate => self.execute_validate(config_path, format).await,
            ConfigCommand::Path => self.execute_path(config_path, format).await,
        }
    }

    /// Show the effective configuration
    async fn execute_show(&self, config_path: &Path, format: OutputFormat) -> Result<ExitCode> {
        let formatter = get_formatter(format);
        let config = Config::load_or_default(config_path);

        info!(config_path = %config_path.display(), "Showing configuration");

        if format.is_json() {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;
            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(ExitCode::SUCCESS)
    }

    /// Validate the configuration file
    async fn execute_validate(
        &self,
        config_path: &Path,
        format: OutputFormat,
    ) -> Result<ExitCode> {
        let formatter = get_formatter(format);

        let config = match Config::load(config_path) {
            Ok(config) => config,
            Err(e) => {
                if !config_path.exists() {
                    if format.is_json() {
                        formatter.print_json(&serde_json::json!({
                            "valid": true,
                            "config_path": config_path.display().to_string(),
                            "errors": [],
                            "note": "No configuration file; defaults in effect.",
                        }));
                    } else {
                        formatter.info(&format!(
                            "No configuration file at {}; defaults in effect.",
                            config_path.display()
                        ));
                    }
                    return Ok(ExitCode::SUCCESS);
                }

                if format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "valid": false,
                        "config_path": config_path.display().to_string(),
                        "errors": [format!("Failed to parse configuration: {e}")],
                    }));
                } else {
                    formatter.error(&format!("Failed to parse configuration: {e}"));
                    formatter.info(&format!("File: {}", config_path.display()));
                }
                return Ok(ExitCode::FAILURE);
            }
        };

        info!(config_path = %config_path.display(), "Validating configuration");

        let errors = config.validate();

        if format.is_json() {
            let error_strings: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": error_strings,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {} - {}", error.field, error.message));
            }
        }

        if errors.is_empty() {
            Ok(ExitCode::SUCCESS)
        } else {
            Ok(ExitCode::FAILURE)
        }
    }

    /// Print the configuration file path
    async fn execute_path(&self, config_path: &Path, format: OutputFormat) -> Result<ExitCode> {
        let formatter = get_formatter(format);

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "config_path": config_path.display().to_string(),
                "exists": config_path.exists(),
            }));
        } else {
            println!("{}", config_path.display());
        }

        Ok(ExitCode::SUCCESS)
    }
}
