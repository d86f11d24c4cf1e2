//! Income-tax computation results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::AuditStep;

/// One of the two mutually exclusive tax regimes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxRegime {
    /// The old regime with itemised deductions and exemptions.
    Old,
    /// The new regime with lower slabs and only a standard deduction.
    New,
}

impl std::fmt::Display for TaxRegime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaxRegime::Old => write!(f, "old"),
            TaxRegime::New => write!(f, "new"),
        }
    }
}

/// Old-regime deductions after each section's cap has been applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionBreakdown {
    /// Section 80C, capped.
    pub section_80c: Decimal,
    /// Section 80D, capped.
    pub section_80d: Decimal,
    /// Section 80TTA, capped.
    pub section_80tta: Decimal,
    /// Section 80TTB, capped.
    pub section_80ttb: Decimal,
    /// Section 80EE, capped.
    pub section_80ee: Decimal,
    /// Section 80EEA, capped.
    pub section_80eea: Decimal,
    /// Section 80E, uncapped.
    pub section_80e: Decimal,
    /// Section 80G, uncapped.
    pub section_80g: Decimal,
    /// Medical reimbursement, uncapped.
    pub medical_reimbursement: Decimal,
    /// Other deductions, uncapped.
    pub other: Decimal,
}

impl DeductionBreakdown {
    /// Sum of every capped bucket.
    pub fn total(&self) -> Decimal {
        self.section_80c
            + self.section_80d
            + self.section_80tta
            + self.section_80ttb
            + self.section_80ee
            + self.section_80eea
            + self.section_80e
            + self.section_80g
            + self.medical_reimbursement
            + self.other
    }
}

/// The portion of income taxed within one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    /// Lower bound of the bracket.
    pub lower: Decimal,
    /// Upper bound of the bracket, `None` if unbounded.
    pub upper: Option<Decimal>,
    /// The bracket's marginal rate as a fraction (0.05 = 5%).
    pub rate: Decimal,
    /// Income falling inside this bracket.
    pub income: Decimal,
    /// Tax on that income.
    pub tax: Decimal,
}

/// Tax under a single regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeTax {
    /// The regime these figures apply to.
    pub regime: TaxRegime,
    /// Standard deduction applied.
    pub standard_deduction: Decimal,
    /// Exemptions applied (always zero under the new regime).
    pub total_exemptions: Decimal,
    /// Itemised deductions applied (always zero under the new regime).
    pub total_deductions: Decimal,
    /// Income after exemptions and deductions, floored at zero.
    pub taxable_income: Decimal,
    /// Slab tax before cess.
    pub tax: Decimal,
    /// Health and education cess on the slab tax.
    pub cess: Decimal,
    /// Tax plus cess, rounded to the nearest rupee.
    pub total_liability: Decimal,
    /// How the slab tax was built up.
    pub bracket_slices: Vec<BracketSlice>,
}

/// Side-by-side comparison of both regimes with a recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputationResult {
    /// Gross salary the computation started from.
    pub gross_salary: Decimal,
    /// Old-regime exemptions.
    pub total_exemptions: Decimal,
    /// Old-regime deductions after caps.
    pub total_deductions: Decimal,
    /// Old-regime taxable income.
    pub net_taxable_income_old: Decimal,
    /// New-regime taxable income.
    pub net_taxable_income_new: Decimal,
    /// Old-regime liability including cess.
    pub old_regime_tax: Decimal,
    /// New-regime liability including cess.
    pub new_regime_tax: Decimal,
    /// The regime with the lower liability; ties go to the old regime.
    pub recommended_regime: TaxRegime,
    /// Liability under the recommended regime.
    pub final_tax_liability: Decimal,
    /// Per-section old-regime deductions.
    pub deductions: DeductionBreakdown,
    /// Full old-regime figures.
    pub old_regime: RegimeTax,
    /// Full new-regime figures.
    pub new_regime: RegimeTax,
    /// Steps taken to reach the recommendation.
    pub audit_steps: Vec<AuditStep>,
}
