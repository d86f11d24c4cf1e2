//! Employee investment and exemption declarations.
//!
//! A [`DeclarationInput`] is a closed record with one field per deduction
//! bucket. Buckets an employee did not fill in are zero; unknown field names
//! are rejected when deserializing so a misspelt bucket can never silently
//! drop out of the computation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest amount, in rupees, any salary, declaration or configured value may carry.
///
/// Sums of bounded amounts stay far inside `Decimal`'s range, so arithmetic
/// on validated inputs never overflows.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// An employee's declared deductions and exemptions for one financial year.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DeclarationInput;
/// use rust_decimal::Decimal;
///
/// let declarations = DeclarationInput {
///     provident_fund: Decimal::from(60_000),
///     elss: Decimal::from(100_000),
///     ..Default::default()
/// };
/// assert_eq!(declarations.section_80c_total(), Decimal::from(160_000));
/// assert!(declarations.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeclarationInput {
    /// Employee provident fund contribution (80C).
    pub provident_fund: Decimal,
    /// Equity-linked savings scheme (80C).
    pub elss: Decimal,
    /// Life insurance premium (80C).
    pub life_insurance: Decimal,
    /// National savings certificate (80C).
    pub nsc: Decimal,
    /// Public provident fund (80C).
    pub ppf: Decimal,
    /// Sukanya Samriddhi account (80C).
    pub sukanya_samriddhi: Decimal,
    /// Home loan principal repayment (80C).
    pub home_loan_principal: Decimal,
    /// Children's tuition fees (80C).
    pub tuition_fees: Decimal,
    /// Any other 80C investment.
    pub other_80c: Decimal,
    /// Medical insurance premium for self and family (80D).
    pub medical_insurance_self: Decimal,
    /// Medical insurance premium for parents (80D).
    pub medical_insurance_parents: Decimal,
    /// Savings account interest (80TTA).
    pub savings_interest: Decimal,
    /// Deposit interest for senior citizens (80TTB).
    pub deposit_interest: Decimal,
    /// First home loan interest (80EE).
    pub first_home_loan_interest: Decimal,
    /// Affordable housing loan interest (80EEA).
    pub affordable_housing_interest: Decimal,
    /// Education loan interest (80E).
    pub education_loan_interest: Decimal,
    /// Eligible donations (80G).
    pub donations: Decimal,
    /// Medical reimbursement claimed.
    pub medical_reimbursement: Decimal,
    /// Any other deduction.
    pub other_deductions: Decimal,
    /// House rent allowance exemption claimed.
    pub hra_exemption: Decimal,
    /// Leave travel allowance exemption claimed.
    pub lta_exemption: Decimal,
    /// Any other exemption claimed.
    pub other_exemptions: Decimal,
    /// Landlord's name for the HRA claim; not used in arithmetic.
    pub landlord_name: Option<String>,
    /// Landlord's PAN for the HRA claim; not used in arithmetic.
    pub landlord_pan: Option<String>,
}

impl DeclarationInput {
    fn amounts(&self) -> [(&'static str, Decimal); 22] {
        [
            ("provident_fund", self.provident_fund),
            ("elss", self.elss),
            ("life_insurance", self.life_insurance),
            ("nsc", self.nsc),
            ("ppf", self.ppf),
            ("sukanya_samriddhi", self.sukanya_samriddhi),
            ("home_loan_principal", self.home_loan_principal),
            ("tuition_fees", self.tuition_fees),
            ("other_80c", self.other_80c),
            ("medical_insurance_self", self.medical_insurance_self),
            ("medical_insurance_parents", self.medical_insurance_parents),
            ("savings_interest", self.savings_interest),
            ("deposit_interest", self.deposit_interest),
            ("first_home_loan_interest", self.first_home_loan_interest),
            ("affordable_housing_interest", self.affordable_housing_interest),
            ("education_loan_interest", self.education_loan_interest),
            ("donations", self.donations),
            ("medical_reimbursement", self.medical_reimbursement),
            ("other_deductions", self.other_deductions),
            ("hra_exemption", self.hra_exemption),
            ("lta_exemption", self.lta_exemption),
            ("other_exemptions", self.other_exemptions),
        ]
    }

    /// Rejects any negative amount or any amount above [`MAX_AMOUNT`].
    ///
    /// The sum helpers below assume a validated declaration.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] naming the first offending bucket.
    pub fn validate(&self) -> EngineResult<()> {
        for (field, amount) in self.amounts() {
            if amount < Decimal::ZERO {
                return Err(EngineError::invalid_input(
                    field,
                    format!("declared amount {} must not be negative", amount),
                ));
            }
            if amount > MAX_AMOUNT {
                return Err(EngineError::invalid_input(
                    field,
                    format!("declared amount {} exceeds the maximum of {}", amount, MAX_AMOUNT),
                ));
            }
        }
        Ok(())
    }

    /// Uncapped sum of every 80C investment.
    pub fn section_80c_total(&self) -> Decimal {
        self.provident_fund
            + self.elss
            + self.life_insurance
            + self.nsc
            + self.ppf
            + self.sukanya_samriddhi
            + self.home_loan_principal
            + self.tuition_fees
            + self.other_80c
    }

    /// Uncapped sum of 80D medical insurance premiums.
    pub fn section_80d_total(&self) -> Decimal {
        self.medical_insurance_self + self.medical_insurance_parents
    }

    /// Sum of the claimed exemptions.
    pub fn total_exemptions(&self) -> Decimal {
        self.hra_exemption + self.lta_exemption + self.other_exemptions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_amount_rejected_with_field_name() {
        let declarations = DeclarationInput {
            elss: Decimal::from(-1),
            ..Default::default()
        };
        match declarations.validate() {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "elss"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_amount_above_maximum_rejected() {
        let declarations = DeclarationInput {
            provident_fund: Decimal::MAX,
            elss: Decimal::MAX,
            ..Default::default()
        };
        match declarations.validate() {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "provident_fund"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_amount_at_maximum_accepted() {
        let declarations = DeclarationInput {
            donations: MAX_AMOUNT,
            ..Default::default()
        };
        assert!(declarations.validate().is_ok());
        assert_eq!(MAX_AMOUNT, Decimal::from(1_000_000_000_000_000i64));
    }

    #[test]
    fn test_empty_declarations_are_valid() {
        assert!(DeclarationInput::default().validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial_declarations() {
        let json = r#"{
            "provident_fund": "60000",
            "medical_insurance_parents": 30000,
            "landlord_name": "R. Sharma"
        }"#;
        let declarations: DeclarationInput = serde_json::from_str(json).unwrap();
        assert_eq!(declarations.provident_fund, Decimal::from(60_000));
        assert_eq!(declarations.section_80d_total(), Decimal::from(30_000));
        assert_eq!(declarations.landlord_name.as_deref(), Some("R. Sharma"));
        assert_eq!(declarations.elss, Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_rejects_unknown_bucket() {
        let json = r#"{ "provident_fnd": "60000" }"#;
        let result: Result<DeclarationInput, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn test_total_exemptions() {
        let declarations = DeclarationInput {
            hra_exemption: Decimal::from(120_000),
            lta_exemption: Decimal::from(20_000),
            ..Default::default()
        };
        assert_eq!(declarations.total_exemptions(), Decimal::from(140_000));
    }
}
