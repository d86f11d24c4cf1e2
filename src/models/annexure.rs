//! Resolved salary annexure models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::audit::{AuditStep, AuditWarning, NEGATIVE_BALANCING_AMOUNT};

/// One salary head resolved to concrete amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPayComponent {
    /// The head name from the template.
    pub head_name: String,
    /// Annual amount rounded to the month (annual / 12, half-up).
    pub monthly_amount: Decimal,
    /// Annual amount.
    pub annual_amount: Decimal,
    /// Display-only basis copied from the head definition.
    pub calculation_basis: String,
    /// Whether the caller designated this head as flexible-benefit eligible.
    pub is_flexi_component: bool,
    /// Whether the head counts toward taxable salary.
    pub is_taxable: bool,
}

/// The full pay breakup produced from one CTC and one template.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{Annexure, ResolvedPayComponent};
/// use rust_decimal::Decimal;
///
/// let annexure = Annexure {
///     financial_year: "2025-26".to_string(),
///     annual_ctc: Decimal::from(120_000),
///     components: vec![ResolvedPayComponent {
///         head_name: "Basic".to_string(),
///         monthly_amount: Decimal::from(10_000),
///         annual_amount: Decimal::from(120_000),
///         calculation_basis: "100% of CTC".to_string(),
///         is_flexi_component: false,
///         is_taxable: true,
///     }],
///     warnings: vec![],
///     audit_steps: vec![],
/// };
/// assert_eq!(annexure.total_annual(), Decimal::from(120_000));
/// assert_eq!(annexure.taxable_annual(), Decimal::from(120_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annexure {
    /// The template's financial year.
    pub financial_year: String,
    /// The CTC the annexure was evaluated for.
    pub annual_ctc: Decimal,
    /// Resolved heads in template order.
    pub components: Vec<ResolvedPayComponent>,
    /// Non-fatal problems found during evaluation.
    pub warnings: Vec<AuditWarning>,
    /// One step per resolved head.
    pub audit_steps: Vec<AuditStep>,
}

impl Annexure {
    /// Sum of every component's annual amount.
    pub fn total_annual(&self) -> Decimal {
        self.components.iter().map(|c| c.annual_amount).sum()
    }

    /// Sum of every component's monthly amount.
    pub fn total_monthly(&self) -> Decimal {
        self.components.iter().map(|c| c.monthly_amount).sum()
    }

    /// Annual amount of the taxable components; the gross salary for tax purposes.
    pub fn taxable_annual(&self) -> Decimal {
        self.components
            .iter()
            .filter(|c| c.is_taxable)
            .map(|c| c.annual_amount)
            .sum()
    }

    /// Annual amount of the flexible-benefit components.
    pub fn flexi_annual(&self) -> Decimal {
        self.components
            .iter()
            .filter(|c| c.is_flexi_component)
            .map(|c| c.annual_amount)
            .sum()
    }

    /// Finds a component by head name.
    pub fn component(&self, head_name: &str) -> Option<&ResolvedPayComponent> {
        self.components.iter().find(|c| c.head_name == head_name)
    }

    /// Returns true if the balancing head came out negative.
    pub fn has_negative_balancing(&self) -> bool {
        self.warnings
            .iter()
            .any(|w| w.code == NEGATIVE_BALANCING_AMOUNT)
    }
}
