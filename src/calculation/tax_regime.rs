//! Income-tax computation under the old and new regimes.
//!
//! ## Rules
//!
//! - **Old regime:** gross − exemptions − standard deduction − capped deductions
//! - **New regime:** gross − standard deduction; itemised deductions and
//!   exemptions are ignored
//!
//! Taxable income is floored at zero, taxed through the regime's progressive
//! brackets, and a flat cess is added. The total liability is rounded to the
//! nearest rupee.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use super::deductions::{cap_deductions, disallowed_amount};
use super::slab_lookup::progressive_tax;
use crate::config::{RegimeRules, TaxRules};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, DeclarationInput, DeductionBreakdown, MAX_AMOUNT, RegimeTax, TaxComputationResult,
    TaxRegime,
};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

fn round_rupee(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes and compares income tax under both regimes.
///
/// The calculator holds no mutable state; one instance can serve any number
/// of employees concurrently.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::TaxCalculator;
/// use payroll_engine::models::{DeclarationInput, TaxRegime};
/// use rust_decimal::Decimal;
///
/// let calculator = TaxCalculator::default();
/// let result = calculator
///     .compute(Decimal::from(825_000), &DeclarationInput::default(), TaxRegime::New)
///     .unwrap();
///
/// assert_eq!(result.taxable_income, Decimal::from(750_000));
/// assert_eq!(result.tax, Decimal::from(17_500));
/// assert_eq!(result.total_liability, Decimal::from(18_200));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TaxCalculator {
    rules: TaxRules,
}

impl TaxCalculator {
    /// Creates a calculator for the given rule set.
    pub fn new(rules: TaxRules) -> Self {
        Self { rules }
    }

    /// Returns the rule set in use.
    pub fn rules(&self) -> &TaxRules {
        &self.rules
    }

    fn regime_rules(&self, regime: TaxRegime) -> &RegimeRules {
        match regime {
            TaxRegime::Old => &self.rules.old_regime,
            TaxRegime::New => &self.rules.new_regime,
        }
    }

    /// Computes tax under a single regime.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if `gross` or any declared amount
    /// is negative or above [`MAX_AMOUNT`]. Nothing is computed in that case.
    pub fn compute(
        &self,
        gross: Decimal,
        declarations: &DeclarationInput,
        regime: TaxRegime,
    ) -> EngineResult<RegimeTax> {
        validate_inputs(gross, declarations)?;
        Ok(self.regime_tax(gross, declarations, regime).0)
    }

    /// Runs both regimes and recommends the one with the lower liability.
    ///
    /// Ties are resolved in favour of the old regime.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if `gross` or any declared amount
    /// is negative or above [`MAX_AMOUNT`].
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::calculation::TaxCalculator;
    /// use payroll_engine::models::{DeclarationInput, TaxRegime};
    /// use rust_decimal::Decimal;
    ///
    /// let calculator = TaxCalculator::default();
    /// let result = calculator
    ///     .compare(Decimal::from(1_200_000), &DeclarationInput::default())
    ///     .unwrap();
    ///
    /// assert_eq!(result.recommended_regime, TaxRegime::New);
    /// assert_eq!(result.final_tax_liability, result.new_regime_tax);
    /// ```
    pub fn compare(
        &self,
        gross: Decimal,
        declarations: &DeclarationInput,
    ) -> EngineResult<TaxComputationResult> {
        validate_inputs(gross, declarations)?;

        let (old, deductions) = self.regime_tax(gross, declarations, TaxRegime::Old);
        let (new, _) = self.regime_tax(gross, declarations, TaxRegime::New);

        let (recommended_regime, final_tax_liability) =
            if new.total_liability < old.total_liability {
                (TaxRegime::New, new.total_liability)
            } else {
                if new.total_liability == old.total_liability {
                    debug!(liability = %old.total_liability, "Regimes tie, recommending old regime");
                }
                (TaxRegime::Old, old.total_liability)
            };

        debug!(
            gross = %gross,
            old_liability = %old.total_liability,
            new_liability = %new.total_liability,
            recommended = %recommended_regime,
            "Compared tax regimes"
        );

        let disallowed = disallowed_amount(declarations, &deductions);
        let mut caps_output = serde_json::to_value(&deductions).unwrap_or_default();
        if let Some(fields) = caps_output.as_object_mut() {
            fields.insert(
                "disallowed".to_string(),
                serde_json::Value::String(disallowed.normalize().to_string()),
            );
        }

        let audit_steps = vec![
            AuditStep {
                step_number: 1,
                rule_id: "deduction_caps".to_string(),
                rule_name: "Old Regime Deduction Caps".to_string(),
                input: serde_json::json!({
                    "section_80c_declared": declarations.section_80c_total().normalize().to_string(),
                    "section_80d_declared": declarations.section_80d_total().normalize().to_string()
                }),
                output: caps_output,
                reasoning: format!(
                    "Capped deductions total ₹{}, ₹{} disallowed by section caps",
                    deductions.total().normalize(),
                    disallowed.normalize()
                ),
            },
            regime_step(2, &old, gross),
            regime_step(3, &new, gross),
            AuditStep {
                step_number: 4,
                rule_id: "regime_recommendation".to_string(),
                rule_name: "Regime Recommendation".to_string(),
                input: serde_json::json!({
                    "old_regime_tax": old.total_liability.normalize().to_string(),
                    "new_regime_tax": new.total_liability.normalize().to_string()
                }),
                output: serde_json::json!({
                    "recommended_regime": recommended_regime,
                    "final_tax_liability": final_tax_liability.normalize().to_string()
                }),
                reasoning: format!(
                    "Old ₹{} vs new ₹{}: {} regime is lower or equal (ties favour old)",
                    old.total_liability.normalize(),
                    new.total_liability.normalize(),
                    recommended_regime
                ),
            },
        ];

        Ok(TaxComputationResult {
            gross_salary: gross,
            total_exemptions: old.total_exemptions,
            total_deductions: old.total_deductions,
            net_taxable_income_old: old.taxable_income,
            net_taxable_income_new: new.taxable_income,
            old_regime_tax: old.total_liability,
            new_regime_tax: new.total_liability,
            recommended_regime,
            final_tax_liability,
            deductions,
            old_regime: old,
            new_regime: new,
            audit_steps,
        })
    }

    fn regime_tax(
        &self,
        gross: Decimal,
        declarations: &DeclarationInput,
        regime: TaxRegime,
    ) -> (RegimeTax, DeductionBreakdown) {
        let rules = self.regime_rules(regime);
        let deductions = cap_deductions(declarations, &self.rules.deduction_caps);

        let (total_exemptions, total_deductions) = match regime {
            TaxRegime::Old => (declarations.total_exemptions(), deductions.total()),
            TaxRegime::New => (Decimal::ZERO, Decimal::ZERO),
        };

        let taxable_income =
            (gross - total_exemptions - rules.standard_deduction() - total_deductions)
                .max(Decimal::ZERO);
        let (tax, bracket_slices) = progressive_tax(taxable_income, rules.brackets());
        let cess = tax * rules.cess_rate();

        let result = RegimeTax {
            regime,
            standard_deduction: rules.standard_deduction(),
            total_exemptions,
            total_deductions,
            taxable_income,
            tax,
            cess,
            total_liability: round_rupee(tax + cess),
            bracket_slices,
        };

        (result, deductions)
    }
}

/// Splits an annual liability into equal monthly withholding, rounded half-up.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::monthly_tds;
/// use rust_decimal::Decimal;
///
/// assert_eq!(monthly_tds(Decimal::from(18_200)), Decimal::from(1_517));
/// ```
pub fn monthly_tds(annual_liability: Decimal) -> Decimal {
    round_rupee(annual_liability / MONTHS_PER_YEAR)
}

fn validate_inputs(gross: Decimal, declarations: &DeclarationInput) -> EngineResult<()> {
    if gross < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "gross",
            format!("gross salary {} must not be negative", gross),
        ));
    }
    if gross > MAX_AMOUNT {
        return Err(EngineError::invalid_input(
            "gross",
            format!("gross salary {} exceeds the maximum of {}", gross, MAX_AMOUNT),
        ));
    }
    declarations.validate()
}

fn regime_step(step_number: u32, result: &RegimeTax, gross: Decimal) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: format!("{}_regime_tax", result.regime),
        rule_name: format!("{} Regime Tax", capitalize(&result.regime.to_string())),
        input: serde_json::json!({
            "gross": gross.normalize().to_string(),
            "standard_deduction": result.standard_deduction.normalize().to_string(),
            "total_exemptions": result.total_exemptions.normalize().to_string(),
            "total_deductions": result.total_deductions.normalize().to_string()
        }),
        output: serde_json::json!({
            "taxable_income": result.taxable_income.normalize().to_string(),
            "tax": result.tax.normalize().to_string(),
            "cess": result.cess.normalize().to_string(),
            "total_liability": result.total_liability.normalize().to_string()
        }),
        reasoning: format!(
            "Taxable ₹{}: slab tax ₹{} + cess ₹{} = ₹{}",
            result.taxable_income.normalize(),
            result.tax.normalize(),
            result.cess.normalize(),
            result.total_liability.normalize()
        ),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
