//! Compensation template configuration.
//!
//! A [`CompensationTemplate`] is the company-defined recipe for splitting an
//! annual CTC into named salary heads. Templates are validated when they are
//! built (or deserialized), so a template that reaches the evaluator always
//! has unique head names, at most one balancing head, and slab tables that
//! partition the CTC axis.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::check_partition;
use crate::error::{EngineError, EngineResult};

/// How a salary head derives its annual amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationType {
    /// A percentage of annual CTC.
    Percentage,
    /// A fixed annual amount.
    Fixed,
    /// A value looked up from the slab table by annual CTC.
    Slab,
    /// The balancing residual: CTC minus every other head.
    Formula,
}

/// The reimbursement categories that carry CTC-keyed slab tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlabType {
    /// Leave travel allowance.
    Lta,
    /// Fuel reimbursement.
    Fuel,
    /// Gift vouchers.
    Gift,
    /// Telephone and internet reimbursement.
    Telephone,
    /// Technical books and periodicals.
    TechnicalBook,
    /// Meal cards.
    Meal,
    /// Uniform washing allowance.
    Washing,
    /// Any other reimbursement.
    OtherReimbursement,
}

impl std::fmt::Display for SlabType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlabType::Lta => write!(f, "LTA"),
            SlabType::Fuel => write!(f, "Fuel"),
            SlabType::Gift => write!(f, "Gift"),
            SlabType::Telephone => write!(f, "Telephone"),
            SlabType::TechnicalBook => write!(f, "TechnicalBook"),
            SlabType::Meal => write!(f, "Meal"),
            SlabType::Washing => write!(f, "Washing"),
            SlabType::OtherReimbursement => write!(f, "OtherReimbursement"),
        }
    }
}

/// A named salary head within a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryHeadDefinition {
    /// The head name shown on the annexure (e.g., "Basic").
    pub name: String,
    /// How the head's amount is derived.
    pub calculation_type: CalculationType,
    /// Percentage of CTC or fixed annual amount; unused by slab and formula heads.
    #[serde(default)]
    pub calculation_value: Option<Decimal>,
    /// Display-only description of the basis (e.g., "40% of CTC").
    #[serde(default)]
    pub calculation_basis: String,
    /// Display-only exemption limit text.
    #[serde(default)]
    pub exemption_limit: String,
    /// Whether the head counts toward taxable salary.
    #[serde(default = "default_true")]
    pub is_taxable: bool,
    /// Evaluation and display order.
    pub order: i32,
    /// The slab table a slab head reads.
    #[serde(default)]
    pub slab_type: Option<SlabType>,
}

fn default_true() -> bool {
    true
}

/// One row of a slab table, covering the half-open CTC range `[salary_min, salary_max)`.
///
/// A missing `salary_max` means the row extends to infinity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlabRow {
    /// The slab table this row belongs to.
    pub slab_type: SlabType,
    /// Inclusive lower CTC bound.
    pub salary_min: Decimal,
    /// Exclusive upper CTC bound, or `None` for no upper bound.
    #[serde(default)]
    pub salary_max: Option<Decimal>,
    /// The annual amount paid to CTCs in this range.
    pub value: Decimal,
    /// Display-only description.
    #[serde(default)]
    pub description: String,
}

impl SlabRow {
    /// Returns true if the CTC falls inside this row's half-open range.
    pub fn contains(&self, annual_ctc: Decimal) -> bool {
        annual_ctc >= self.salary_min && self.salary_max.is_none_or(|max| annual_ctc < max)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct TemplateDefinition {
    financial_year: String,
    heads: Vec<SalaryHeadDefinition>,
    #[serde(default)]
    slabs: Vec<SlabRow>,
}

/// A validated compensation template.
///
/// # Example
///
/// ```
/// use payroll_engine::config::{CalculationType, CompensationTemplate, SalaryHeadDefinition};
/// use rust_decimal::Decimal;
///
/// let basic = SalaryHeadDefinition {
///     name: "Basic".to_string(),
///     calculation_type: CalculationType::Percentage,
///     calculation_value: Some(Decimal::from(40)),
///     calculation_basis: "40% of CTC".to_string(),
///     exemption_limit: String::new(),
///     is_taxable: true,
///     order: 1,
///     slab_type: None,
/// };
/// let template = CompensationTemplate::new("2025-26", vec![basic], vec![]).unwrap();
/// assert!(template.formula_head().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TemplateDefinition")]
pub struct CompensationTemplate {
    financial_year: String,
    heads: Vec<SalaryHeadDefinition>,
    slabs: Vec<SlabRow>,
}

impl CompensationTemplate {
    /// Builds a template, rejecting any configuration the evaluator cannot run.
    ///
    /// # Errors
    ///
    /// - [`EngineError::DuplicateHeadName`] if two heads share a name
    /// - [`EngineError::DuplicateFormulaHead`] if more than one head is a formula head
    /// - [`EngineError::MissingCalculationValue`] for a percentage/fixed head without a value
    /// - [`EngineError::MissingSlabType`] for a slab head without a slab type
    /// - [`EngineError::SlabGap`] / [`EngineError::SlabOverlap`] if a slab table
    ///   does not partition `[0, ∞)`
    pub fn new(
        financial_year: impl Into<String>,
        heads: Vec<SalaryHeadDefinition>,
        slabs: Vec<SlabRow>,
    ) -> EngineResult<Self> {
        let mut names = HashSet::new();
        let mut formula: Option<&str> = None;

        for head in &heads {
            if !names.insert(head.name.as_str()) {
                return Err(EngineError::DuplicateHeadName {
                    name: head.name.clone(),
                });
            }

            match head.calculation_type {
                CalculationType::Formula => {
                    if let Some(first) = formula {
                        return Err(EngineError::DuplicateFormulaHead {
                            first: first.to_string(),
                            second: head.name.clone(),
                        });
                    }
                    formula = Some(&head.name);
                }
                CalculationType::Percentage | CalculationType::Fixed => {
                    if head.calculation_value.is_none() {
                        return Err(EngineError::MissingCalculationValue {
                            head: head.name.clone(),
                        });
                    }
                }
                CalculationType::Slab => {
                    if head.slab_type.is_none() {
                        return Err(EngineError::MissingSlabType {
                            head: head.name.clone(),
                        });
                    }
                }
            }
        }

        validate_slab_tables(&slabs)?;

        Ok(Self {
            financial_year: financial_year.into(),
            heads,
            slabs,
        })
    }

    /// Returns the financial year this template applies to (e.g., "2025-26").
    pub fn financial_year(&self) -> &str {
        &self.financial_year
    }

    /// Returns the heads in their declared order.
    pub fn heads(&self) -> &[SalaryHeadDefinition] {
        &self.heads
    }

    /// Returns every slab row.
    pub fn slabs(&self) -> &[SlabRow] {
        &self.slabs
    }

    /// Returns the balancing head, if the template has one.
    pub fn formula_head(&self) -> Option<&SalaryHeadDefinition> {
        self.heads
            .iter()
            .find(|h| h.calculation_type == CalculationType::Formula)
    }
}

impl TryFrom<TemplateDefinition> for CompensationTemplate {
    type Error = EngineError;

    fn try_from(definition: TemplateDefinition) -> Result<Self, Self::Error> {
        Self::new(definition.financial_year, definition.heads, definition.slabs)
    }
}

/// Checks that each slab type's rows partition `[0, ∞)` without gaps or overlaps.
fn validate_slab_tables(slabs: &[SlabRow]) -> EngineResult<()> {
    let mut types: Vec<SlabType> = slabs.iter().map(|s| s.slab_type).collect();
    types.sort();
    types.dedup();

    for slab_type in types {
        let rows: Vec<(Decimal, Option<Decimal>)> = slabs
            .iter()
            .filter(|s| s.slab_type == slab_type)
            .map(|s| (s.salary_min, s.salary_max))
            .collect();

        check_partition(&rows).map_err(|fault| fault.into_slab_error(slab_type))?;
    }

    Ok(())
}
