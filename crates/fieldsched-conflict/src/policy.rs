//! Policy engine for automatic conflict handling
//!
//! Evaluates configured rules to decide what happens to a freshly detected
//! conflict without dispatcher input. Rules match on conflict kind and an
//! optional minimum severity, in first-match-wins order. Because the rules
//! re-apply on every detection pass, an `ignore` rule doubles as a durable
//! suppression for kinds the operation has decided not to chase.

use tracing::{debug, trace};

use fieldsched_core::config::{parse_policy_action, PolicyActionSpec, PolicyRule};
use fieldsched_core::domain::conflict::{Conflict, ConflictKind, Severity};

/// What the policy decided for a conflict
pub type PolicyAction = PolicyActionSpec;

/// A rule compiled from configuration
#[derive(Debug, Clone)]
struct CompiledRule {
    kind: ConflictKind,
    min_severity: Option<Severity>,
    action: PolicyAction,
}

/// Engine that evaluates auto-action rules
pub struct PolicyEngine {
    rules: Vec<CompiledRule>,
    default_action: PolicyAction,
}

impl PolicyEngine {
    /// Creates a PolicyEngine from the default action string and rule list
    ///
    /// Invalid rules are logged and skipped; an unparsable default falls
    /// back to `manual`.
    pub fn new(default_action: &str, rules: &[PolicyRule]) -> Self {
        let default = parse_policy_action(default_action).unwrap_or(PolicyAction::Manual);

        let compiled: Vec<CompiledRule> = rules
            .iter()
            .filter_map(|rule| {
                let kind = match rule.kind.parse::<ConflictKind>() {
                    Ok(k) => k,
                    Err(_) => {
                        tracing::warn!(
                            kind = %rule.kind,
                            "Skipping policy rule with unknown conflict kind"
                        );
                        return None;
                    }
                };
                let min_severity = match &rule.min_severity {
                    None => None,
                    Some(s) => match s.parse::<Severity>() {
                        Ok(sev) => Some(sev),
                        Err(_) => {
                            tracing::warn!(
                                min_severity = %s,
                                "Skipping policy rule with unknown severity"
                            );
                            return None;
                        }
                    },
                };
                let action = match parse_policy_action(&rule.action) {
                    Some(a) => a,
                    None => {
                        tracing::warn!(
                            action = %rule.action,
                            "Skipping policy rule with invalid action"
                        );
                        return None;
                    }
                };
                Some(CompiledRule {
                    kind,
                    min_severity,
                    action,
                })
            })
            .collect();

        debug!(
            rules_count = compiled.len(),
            default = ?default,
            "PolicyEngine initialized"
        );

        Self {
            rules: compiled,
            default_action: default,
        }
    }

    /// Policy engine that leaves every conflict open
    #[must_use]
    pub fn manual_only() -> Self {
        Self {
            rules: Vec::new(),
            default_action: PolicyAction::Manual,
        }
    }

    /// Evaluates the policy for a detected conflict
    ///
    /// First-match-wins: the first rule whose kind equals the conflict's
    /// kind and whose minimum severity (if any) is met decides the action.
    /// If no rule matches, the default action applies.
    pub fn evaluate(&self, conflict: &Conflict) -> PolicyAction {
        for rule in &self.rules {
            if rule.kind != conflict.kind() {
                continue;
            }
            if let Some(min) = rule.min_severity {
                if conflict.severity() < min {
                    continue;
                }
            }
            trace!(
                key = %conflict.key(),
                action = ?rule.action,
                "Policy rule matched"
            );
            return rule.action;
        }

        trace!(
            key = %conflict.key(),
            default = ?self.default_action,
            "No policy rule matched, using default"
        );
        self.default_action
    }

    /// Returns the default action
    pub fn default_action(&self) -> PolicyAction {
        self.default_action
    }

    /// Returns the number of compiled rules
    pub fn rules_count(&self) -> usize {
        self.rules.len()
    }
}
