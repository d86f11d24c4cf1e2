//! Income-tax regime rules.
//!
//! The statutory rules for the old and new regimes are built in; a company
//! configuration may override them with a `tax_rules.yaml` file when the
//! Finance Act changes the slabs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::check_partition;
use crate::error::{EngineError, EngineResult};
use crate::models::MAX_AMOUNT;

/// One progressive tax bracket covering `[lower, upper)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive lower bound of taxable income.
    pub lower: Decimal,
    /// Exclusive upper bound, or `None` for the top bracket.
    #[serde(default)]
    pub upper: Option<Decimal>,
    /// Marginal rate as a fraction (0.05 = 5%).
    pub rate: Decimal,
}

impl TaxBracket {
    fn new(lower: i64, upper: Option<i64>, rate_percent: i64) -> Self {
        Self {
            lower: Decimal::from(lower),
            upper: upper.map(Decimal::from),
            rate: Decimal::new(rate_percent, 2),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct RegimeRulesDefinition {
    standard_deduction: Decimal,
    brackets: Vec<TaxBracket>,
    #[serde(default = "default_cess_rate")]
    cess_rate: Decimal,
}

fn default_cess_rate() -> Decimal {
    Decimal::new(4, 2)
}

/// The standard deduction, brackets and cess for one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegimeRulesDefinition")]
pub struct RegimeRules {
    standard_deduction: Decimal,
    brackets: Vec<TaxBracket>,
    cess_rate: Decimal,
}

impl RegimeRules {
    /// Builds regime rules, sorting the brackets and checking they partition `[0, ∞)`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidBracket`] if the brackets leave a gap,
    /// overlap, or carry a rate outside 0..=1, if the cess rate is outside
    /// 0..=1, or if the standard deduction is negative or above
    /// [`MAX_AMOUNT`].
    pub fn new(
        standard_deduction: Decimal,
        mut brackets: Vec<TaxBracket>,
        cess_rate: Decimal,
    ) -> EngineResult<Self> {
        Self::validate(standard_deduction, &brackets, cess_rate, "custom")?;
        brackets.sort_by(|a, b| a.lower.cmp(&b.lower));
        Ok(Self {
            standard_deduction,
            brackets,
            cess_rate,
        })
    }

    fn validate(
        standard_deduction: Decimal,
        brackets: &[TaxBracket],
        cess_rate: Decimal,
        label: &str,
    ) -> EngineResult<()> {
        let invalid = |message: &str| EngineError::InvalidBracket {
            regime: label.to_string(),
            message: message.to_string(),
        };

        if brackets.is_empty() {
            return Err(invalid("at least one bracket is required"));
        }
        if brackets.iter().any(|b| b.rate.is_sign_negative()) {
            return Err(invalid("bracket rates must not be negative"));
        }
        if brackets.iter().any(|b| b.rate > Decimal::ONE) {
            return Err(invalid("bracket rates must not exceed 1"));
        }
        if standard_deduction.is_sign_negative() {
            return Err(invalid("standard deduction must not be negative"));
        }
        if standard_deduction > MAX_AMOUNT {
            return Err(invalid("standard deduction exceeds the maximum amount"));
        }
        if cess_rate.is_sign_negative() {
            return Err(invalid("cess rate must not be negative"));
        }
        if cess_rate > Decimal::ONE {
            return Err(invalid("cess rate must not exceed 1"));
        }

        let ranges: Vec<(Decimal, Option<Decimal>)> =
            brackets.iter().map(|b| (b.lower, b.upper)).collect();
        check_partition(&ranges).map_err(|fault| fault.into_bracket_error(label))
    }

    /// Old regime: 0% to 2.5L, 5% to 5L, 20% to 10L, 30% above; ₹50,000 standard deduction.
    pub fn statutory_old() -> Self {
        Self {
            standard_deduction: Decimal::from(50_000),
            brackets: vec![
                TaxBracket::new(0, Some(250_000), 0),
                TaxBracket::new(250_000, Some(500_000), 5),
                TaxBracket::new(500_000, Some(1_000_000), 20),
                TaxBracket::new(1_000_000, None, 30),
            ],
            cess_rate: default_cess_rate(),
        }
    }

    /// New regime: 0% to 4L then 5/10/15/20% per 4L band, 30% above 20L; ₹75,000 standard deduction.
    pub fn statutory_new() -> Self {
        Self {
            standard_deduction: Decimal::from(75_000),
            brackets: vec![
                TaxBracket::new(0, Some(400_000), 0),
                TaxBracket::new(400_000, Some(800_000), 5),
                TaxBracket::new(800_000, Some(1_200_000), 10),
                TaxBracket::new(1_200_000, Some(1_600_000), 15),
                TaxBracket::new(1_600_000, Some(2_000_000), 20),
                TaxBracket::new(2_000_000, None, 30),
            ],
            cess_rate: default_cess_rate(),
        }
    }

    /// Returns the regime's standard deduction.
    pub fn standard_deduction(&self) -> Decimal {
        self.standard_deduction
    }

    /// Returns the brackets sorted by lower bound.
    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Returns the health and education cess as a fraction of tax.
    pub fn cess_rate(&self) -> Decimal {
        self.cess_rate
    }
}

impl TryFrom<RegimeRulesDefinition> for RegimeRules {
    type Error = EngineError;

    fn try_from(definition: RegimeRulesDefinition) -> Result<Self, Self::Error> {
        Self::new(
            definition.standard_deduction,
            definition.brackets,
            definition.cess_rate,
        )
    }
}

/// Old-regime caps on each deduction section.
///
/// Sections 80E, 80G, medical reimbursement and other deductions are uncapped
/// and so have no entry here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeductionCaps {
    /// Section 80C investments (PF, ELSS, life insurance, NSC, PPF, ...).
    pub section_80c: Decimal,
    /// Section 80D medical insurance for self and parents.
    pub section_80d: Decimal,
    /// Section 80TTA savings account interest.
    pub section_80tta: Decimal,
    /// Section 80TTB deposit interest.
    pub section_80ttb: Decimal,
    /// Section 80EE first home loan interest.
    pub section_80ee: Decimal,
    /// Section 80EEA affordable housing loan interest.
    pub section_80eea: Decimal,
}

impl Default for DeductionCaps {
    fn default() -> Self {
        Self {
            section_80c: Decimal::from(150_000),
            section_80d: Decimal::from(100_000),
            section_80tta: Decimal::from(10_000),
            section_80ttb: Decimal::from(50_000),
            section_80ee: Decimal::from(50_000),
            section_80eea: Decimal::from(200_000),
        }
    }
}

/// The complete tax rule set for both regimes.
///
/// Any section missing from `tax_rules.yaml` falls back to the statutory default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxRules {
    /// Rules for the old regime.
    pub old_regime: RegimeRules,
    /// Rules for the new regime.
    pub new_regime: RegimeRules,
    /// Old-regime deduction caps.
    pub deduction_caps: DeductionCaps,
}

impl Default for TaxRules {
    fn default() -> Self {
        Self {
            old_regime: RegimeRules::statutory_old(),
            new_regime: RegimeRules::statutory_new(),
            deduction_caps: DeductionCaps::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_statutory_rules_are_valid_partitions() {
        for rules in [RegimeRules::statutory_old(), RegimeRules::statutory_new()] {
            assert!(
                RegimeRules::new(
                    rules.standard_deduction(),
                    rules.brackets().to_vec(),
                    rules.cess_rate()
                )
                .is_ok()
            );
        }
    }

    #[test]
    fn test_statutory_standard_deductions() {
        assert_eq!(RegimeRules::statutory_old().standard_deduction(), dec("50000"));
        assert_eq!(RegimeRules::statutory_new().standard_deduction(), dec("75000"));
    }

    #[test]
    fn test_new_sorts_brackets() {
        let rules = RegimeRules::new(
            dec("50000"),
            vec![
                TaxBracket::new(500_000, None, 20),
                TaxBracket::new(0, Some(500_000), 0),
            ],
            dec("0.04"),
        )
        .unwrap();
        assert_eq!(rules.brackets()[0].lower, Decimal::ZERO);
    }

    #[test]
    fn test_bracket_gap_rejected() {
        let result = RegimeRules::new(
            dec("50000"),
            vec![
                TaxBracket::new(0, Some(250_000), 0),
                TaxBracket::new(300_000, None, 5),
            ],
            dec("0.04"),
        );
        match result {
            Err(EngineError::InvalidBracket { message, .. }) => {
                assert_eq!(message, "brackets leave a gap at 250000");
            }
            other => panic!("Expected InvalidBracket, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_rate_rejected() {
        let result = RegimeRules::new(
            dec("50000"),
            vec![TaxBracket::new(0, None, -5)],
            dec("0.04"),
        );
        assert!(matches!(result, Err(EngineError::InvalidBracket { .. })));
    }

    #[test]
    fn test_rate_above_one_rejected() {
        let result = RegimeRules::new(
            dec("50000"),
            vec![TaxBracket::new(0, None, 150)],
            dec("0.04"),
        );
        assert!(matches!(result, Err(EngineError::InvalidBracket { .. })));

        let result = RegimeRules::new(
            dec("50000"),
            vec![TaxBracket::new(0, None, 30)],
            dec("1.5"),
        );
        assert!(matches!(result, Err(EngineError::InvalidBracket { .. })));
    }

    #[test]
    fn test_oversized_standard_deduction_rejected() {
        let result = RegimeRules::new(
            Decimal::MAX,
            vec![TaxBracket::new(0, None, 30)],
            dec("0.04"),
        );
        assert!(matches!(result, Err(EngineError::InvalidBracket { .. })));
    }

    #[test]
    fn test_deserialize_partial_tax_rules_keeps_defaults() {
        let yaml = r#"
deduction_caps:
  section_80c: 200000
"#;
        let rules: TaxRules = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rules.deduction_caps.section_80c, dec("200000"));
        assert_eq!(rules.deduction_caps.section_80d, dec("100000"));
        assert_eq!(rules.new_regime, RegimeRules::statutory_new());
    }

    #[test]
    fn test_deserialize_regime_override() {
        let yaml = r#"
new_regime:
  standard_deduction: 75000
  brackets:
    - { lower: 0, upper: 300000, rate: "0" }
    - { lower: 300000, rate: "0.1" }
"#;
        let rules: TaxRules = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rules.new_regime.brackets().len(), 2);
        assert_eq!(rules.new_regime.cess_rate(), dec("0.04"));
        assert_eq!(rules.old_regime, RegimeRules::statutory_old());
    }
}
