//! Configuration module for Fieldsched.
//!
//! Provides typed configuration structs that map to the YAML configuration
//! file, with loading, validation, defaults, and a builder pattern for
//! programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::conflict::{ConflictKind, ResolutionMethod, Severity};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for Fieldsched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub detection: DetectionConfig,
    pub policy: PolicyConfig,
    pub api: ApiConfig,
    pub logging: LoggingConfig,
}

/// Detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Largest date window (in days) a single detection pass accepts.
    /// The pairwise scan is quadratic; this bounds its input.
    pub max_window_days: u32,
}

/// Auto-action policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Action applied when no rule matches: `manual`, `ignore`, or
    /// `resolve:<method>`.
    pub default_action: String,
    /// Ordered rules, first match wins.
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
}

/// A single auto-action rule from configuration.
///
/// Matches conflicts by kind and (optionally) a minimum severity; the
/// action decides what happens to a matching conflict without dispatcher
/// input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Conflict kind label, e.g. `location_conflict`.
    pub kind: String,
    /// Only match conflicts at or above this severity, e.g. `high`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_severity: Option<String>,
    /// `ignore`, `manual`, or `resolve:<method>`.
    pub action: String,
}

/// Dispatch backend API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the dispatch backend REST API.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/fieldsched/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("fieldsched")
            .join("config.yaml")
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

// Config derives Default because all its fields implement Default.

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            max_window_days: 31,
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            default_action: "manual".to_string(),
            rules: Vec::new(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"policy.default_action"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Parses a policy action string: `ignore`, `manual`, or `resolve:<method>`.
///
/// Returns `None` for anything else. Shared with the policy engine, which
/// skips (rather than rejects) rules that fail to parse.
pub fn parse_policy_action(s: &str) -> Option<PolicyActionSpec> {
    match s {
        "ignore" => Some(PolicyActionSpec::Ignore),
        "manual" => Some(PolicyActionSpec::Manual),
        other => {
            let method = other.strip_prefix("resolve:")?;
            method
                .parse::<ResolutionMethod>()
                .ok()
                .map(PolicyActionSpec::Resolve)
        }
    }
}

/// Parsed form of a policy action string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyActionSpec {
    /// Drop the conflict from the active list.
    Ignore,
    /// Leave the conflict open for a dispatcher.
    Manual,
    /// Auto-resolve with the given method.
    Resolve(ResolutionMethod),
}

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- detection ---
        if self.detection.max_window_days == 0 {
            errors.push(ValidationError {
                field: "detection.max_window_days".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- policy ---
        if parse_policy_action(&self.policy.default_action).is_none() {
            errors.push(ValidationError {
                field: "policy.default_action".into(),
                message: format!(
                    "invalid action '{}'; valid: ignore, manual, resolve:<method>",
                    self.policy.default_action
                ),
            });
        }
        for (i, rule) in self.policy.rules.iter().enumerate() {
            if rule.kind.parse::<ConflictKind>().is_err() {
                errors.push(ValidationError {
                    field: format!("policy.rules[{i}].kind"),
                    message: format!("unknown conflict kind '{}'", rule.kind),
                });
            }
            if let Some(sev) = &rule.min_severity {
                if sev.parse::<Severity>().is_err() {
                    errors.push(ValidationError {
                        field: format!("policy.rules[{i}].min_severity"),
                        message: format!("unknown severity '{sev}'"),
                    });
                }
            }
            if parse_policy_action(&rule.action).is_none() {
                errors.push(ValidationError {
                    field: format!("policy.rules[{i}].action"),
                    message: format!(
                        "invalid action '{}'; valid: ignore, manual, resolve:<method>",
                        rule.action
                    ),
                });
            }
        }

        // --- api ---
        if self.api.base_url.is_empty() {
            errors.push(ValidationError {
                field: "api.base_url".into(),
                message: "must not be empty".into(),
            });
        } else if !self.api.base_url.starts_with("http://")
            && !self.api.base_url.starts_with("https://")
        {
            errors.push(ValidationError {
                field: "api.base_url".into(),
                message: format!("must be an http(s) URL: {}", self.api.base_url),
            });
        }
        if self.api.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "api.timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use fieldsched_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .api_base_url("https://dispatch.example.com/api/v1")
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- detection ---

    pub fn detection_max_window_days(mut self, days: u32) -> Self {
        self.config.detection.max_window_days = days;
        self
    }

    // --- policy ---

    pub fn policy_default_action(mut self, action: impl Into<String>) -> Self {
        self.config.policy.default_action = action.into();
        self
    }

    pub fn policy_rule(mut self, rule: PolicyRule) -> Self {
        self.config.policy.rules.push(rule);
        self
    }

    // --- api ---

    pub fn api_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.api.base_url = base_url.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api.timeout_secs = secs;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // -- Defaults --

    #[test]
    fn default_config_has_sensible_values() {
        let cfg = Config::default();
        assert_eq!(cfg.detection.max_window_days, 31);
        assert_eq!(cfg.policy.default_action, "manual");
        assert!(cfg.policy.rules.is_empty());
        assert_eq!(cfg.api.base_url, "http://localhost:8080/api/v1");
        assert_eq!(cfg.api.timeout_secs, 30);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn default_config_passes_validation() {
        let errors = Config::default().validate();
        assert!(errors.is_empty(), "unexpected validation errors: {errors:?}");
    }

    // -- Loading --

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
detection:
  max_window_days: 7
policy:
  default_action: manual
  rules:
    - kind: location_conflict
      action: ignore
    - kind: time_overlap
      min_severity: high
      action: resolve:reschedule_job
api:
  base_url: https://dispatch.example.com/api/v1
  timeout_secs: 15
logging:
  level: debug
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.detection.max_window_days, 7);
        assert_eq!(cfg.policy.rules.len(), 2);
        assert_eq!(cfg.policy.rules[0].kind, "location_conflict");
        assert_eq!(cfg.policy.rules[0].action, "ignore");
        assert_eq!(
            cfg.policy.rules[1].min_severity,
            Some("high".to_string())
        );
        assert_eq!(cfg.api.base_url, "https://dispatch.example.com/api/v1");
        assert_eq!(cfg.api.timeout_secs, 15);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn load_or_default_returns_default_on_missing_file() {
        let cfg = Config::load_or_default(Path::new("/nonexistent/config.yaml"));
        assert_eq!(cfg.detection.max_window_days, 31);
    }

    #[test]
    fn load_returns_error_on_invalid_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"not: [valid: yaml: {{{").unwrap();
        tmp.flush().unwrap();

        assert!(Config::load(tmp.path()).is_err());
    }

    // -- Validation --

    #[test]
    fn validate_catches_zero_window() {
        let mut cfg = Config::default();
        cfg.detection.max_window_days = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "detection.max_window_days"));
    }

    #[test]
    fn validate_catches_invalid_default_action() {
        let mut cfg = Config::default();
        cfg.policy.default_action = "yolo".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "policy.default_action"));
    }

    #[test]
    fn validate_accepts_resolve_action() {
        let mut cfg = Config::default();
        cfg.policy.default_action = "resolve:reassign_technician".to_string();
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn validate_catches_bad_rule_fields() {
        let mut cfg = Config::default();
        cfg.policy.rules.push(PolicyRule {
            kind: "rivalry".to_string(),
            min_severity: Some("extreme".to_string()),
            action: "resolve:panic".to_string(),
        });
        let errors = cfg.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"policy.rules[0].kind"));
        assert!(fields.contains(&"policy.rules[0].min_severity"));
        assert!(fields.contains(&"policy.rules[0].action"));
    }

    #[test]
    fn validate_catches_bad_api_settings() {
        let mut cfg = Config::default();
        cfg.api.base_url = "dispatch.example.com".to_string();
        cfg.api.timeout_secs = 0;
        let errors = cfg.validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert!(fields.contains(&"api.base_url"));
        assert!(fields.contains(&"api.timeout_secs"));
    }

    #[test]
    fn validate_catches_invalid_log_level() {
        let mut cfg = Config::default();
        cfg.logging.level = "verbose".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "logging.level"));
    }

    #[test]
    fn validate_accepts_all_valid_log_levels() {
        for level in VALID_LOG_LEVELS {
            let mut cfg = Config::default();
            cfg.logging.level = level.to_string();
            assert!(
                !cfg.validate().iter().any(|e| e.field == "logging.level"),
                "level '{level}' should be valid"
            );
        }
    }

    // -- parse_policy_action --

    #[test]
    fn parse_policy_action_forms() {
        assert_eq!(parse_policy_action("ignore"), Some(PolicyActionSpec::Ignore));
        assert_eq!(parse_policy_action("manual"), Some(PolicyActionSpec::Manual));
        assert_eq!(
            parse_policy_action("resolve:split_job"),
            Some(PolicyActionSpec::Resolve(ResolutionMethod::SplitJob))
        );
        assert_eq!(parse_policy_action("resolve:"), None);
        assert_eq!(parse_policy_action("resolve"), None);
        assert_eq!(parse_policy_action("drop"), None);
    }

    // -- Builder --

    #[test]
    fn builder_starts_from_defaults() {
        let cfg = ConfigBuilder::new().build();
        assert_eq!(cfg.policy.default_action, "manual");
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn builder_overrides_fields() {
        let cfg = ConfigBuilder::new()
            .detection_max_window_days(7)
            .policy_default_action("ignore")
            .policy_rule(PolicyRule {
                kind: "location_conflict".to_string(),
                min_severity: None,
                action: "ignore".to_string(),
            })
            .api_base_url("https://dispatch.example.com")
            .api_timeout_secs(5)
            .logging_level("trace")
            .build();

        assert_eq!(cfg.detection.max_window_days, 7);
        assert_eq!(cfg.policy.default_action, "ignore");
        assert_eq!(cfg.policy.rules.len(), 1);
        assert_eq!(cfg.api.base_url, "https://dispatch.example.com");
        assert_eq!(cfg.api.timeout_secs, 5);
        assert_eq!(cfg.logging.level, "trace");
    }

    #[test]
    fn builder_build_validated_fails_for_invalid_config() {
        let result = ConfigBuilder::new()
            .detection_max_window_days(0)
            .logging_level("nope")
            .build_validated();
        assert!(result.is_err());
        assert!(result.unwrap_err().len() >= 2);
    }

    // -- default_path --

    #[test]
    fn default_path_ends_with_config_yaml() {
        let p = Config::default_path();
        assert!(p.ends_with("fieldsched/config.yaml"));
    }

    // -- ValidationError Display --

    #[test]
    fn validation_error_display() {
        let err = ValidationError {
            field: "api.timeout_secs".into(),
            message: "must be greater than 0".into(),
        };
        assert_eq!(err.to_string(), "api.timeout_secs: must be greater than 0");
    }
}
