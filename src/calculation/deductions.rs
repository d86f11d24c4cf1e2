//! Old-regime deduction capping.

use rust_decimal::Decimal;

use crate::config::DeductionCaps;
use crate::models::{DeductionBreakdown, DeclarationInput};

/// Applies each section's cap to the declared amounts.
///
/// Only the old regime allows itemised deductions; the new regime never
/// calls this. Sections 80E, 80G, medical reimbursement and other deductions
/// pass through uncapped.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::cap_deductions;
/// use payroll_engine::config::DeductionCaps;
/// use payroll_engine::models::DeclarationInput;
/// use rust_decimal::Decimal;
///
/// let declarations = DeclarationInput {
///     provident_fund: Decimal::from(60_000),
///     elss: Decimal::from(100_000),
///     ..Default::default()
/// };
///
/// let breakdown = cap_deductions(&declarations, &DeductionCaps::default());
/// assert_eq!(breakdown.section_80c, Decimal::from(150_000));
/// ```
pub fn cap_deductions(declarations: &DeclarationInput, caps: &DeductionCaps) -> DeductionBreakdown {
    DeductionBreakdown {
        section_80c: declarations.section_80c_total().min(caps.section_80c),
        section_80d: declarations.section_80d_total().min(caps.section_80d),
        section_80tta: declarations.savings_interest.min(caps.section_80tta),
        section_80ttb: declarations.deposit_interest.min(caps.section_80ttb),
        section_80ee: declarations.first_home_loan_interest.min(caps.section_80ee),
        section_80eea: declarations
            .affordable_housing_interest
            .min(caps.section_80eea),
        section_80e: declarations.education_loan_interest,
        section_80g: declarations.donations,
        medical_reimbursement: declarations.medical_reimbursement,
        other: declarations.other_deductions,
    }
}

/// Returns how much of a declaration was disallowed by the caps.
pub fn disallowed_amount(declarations: &DeclarationInput, breakdown: &DeductionBreakdown) -> Decimal {
    let declared = declarations.section_80c_total()
        + declarations.section_80d_total()
        + declarations.savings_interest
        + declarations.deposit_interest
        + declarations.first_home_loan_interest
        + declarations.affordable_housing_interest
        + declarations.education_loan_interest
        + declarations.donations
        + declarations.medical_reimbursement
        + declarations.other_deductions;
    declared - breakdown.total()
}
