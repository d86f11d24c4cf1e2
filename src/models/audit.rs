//! Audit records attached to calculation results.
//!
//! Every rule application records an [`AuditStep`] so a payslip or tax sheet
//! can explain how each figure was reached. Audit records carry no
//! timestamps or random identifiers, so evaluating the same input twice
//! produces identical results.

use serde::{Deserialize, Serialize};

/// Warning code raised when the balancing head resolves to a negative amount.
pub const NEGATIVE_BALANCING_AMOUNT: &str = "NEGATIVE_BALANCING_AMOUNT";

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings indicate potential issues that don't prevent calculation
/// but may require attention before the result is saved.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{AuditWarning, WarningSeverity};
///
/// let warning = AuditWarning {
///     code: "NEGATIVE_BALANCING_AMOUNT".to_string(),
///     message: "Special Allowance resolved to -12000".to_string(),
///     severity: WarningSeverity::High,
/// };
/// assert_eq!(serde_json::to_value(&warning.severity).unwrap(), "high");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// How seriously the caller should treat the warning.
    pub severity: WarningSeverity,
}

/// Severity of an [`AuditWarning`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Informational.
    Low,
    /// Should be reviewed.
    Medium,
    /// Should normally block saving.
    High,
}
