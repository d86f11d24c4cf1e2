//! Compensation template evaluation.
//!
//! This module turns an annual CTC and a [`CompensationTemplate`] into an
//! [`Annexure`]: every salary head resolved to an annual and monthly amount.
//!
//! ## Evaluation
//!
//! Evaluation runs in two passes:
//! 1. Every percentage, fixed and slab head is resolved on its own.
//! 2. The single formula head, if any, takes whatever CTC is left over.
//!
//! Monthly amounts are always derived from annual amounts, never the reverse.

use std::collections::BTreeSet;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, warn};

use super::slab_lookup::lookup_slab;
use crate::config::{CalculationType, CompensationTemplate, SalaryHeadDefinition};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Annexure, AuditStep, AuditWarning, MAX_AMOUNT, NEGATIVE_BALANCING_AMOUNT,
    ResolvedPayComponent, WarningSeverity,
};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const ONE_HUNDRED: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Rounds an annual amount to a whole monthly figure, half away from zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::monthly_from_annual;
/// use rust_decimal::Decimal;
///
/// assert_eq!(monthly_from_annual(Decimal::from(100_000)), Decimal::from(8_333));
/// assert_eq!(monthly_from_annual(Decimal::from(30)), Decimal::from(3));
/// ```
pub fn monthly_from_annual(annual: Decimal) -> Decimal {
    (annual / MONTHS_PER_YEAR).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Evaluates a compensation template for one annual CTC.
///
/// # Arguments
///
/// * `annual_ctc` - The employee's annual cost to company; must be positive
/// * `template` - The company's validated compensation template
/// * `flexi_heads` - Head names the caller treats as flexible-benefit eligible
///
/// # Returns
///
/// An [`Annexure`] whose components follow the template's `order` (ties keep
/// their declared position). If the formula head resolves to a negative
/// amount the annexure is still returned, carrying a
/// `NEGATIVE_BALANCING_AMOUNT` warning the caller may use to block saving.
///
/// # Errors
///
/// - [`EngineError::InvalidInput`] if `annual_ctc` is not positive or above
///   [`MAX_AMOUNT`], or if the template's values overflow for this CTC
/// - [`EngineError::SlabLookupFailed`] if a slab head's table has no row for the CTC
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::evaluate_template;
/// use payroll_engine::config::{CalculationType, CompensationTemplate, SalaryHeadDefinition};
/// use rust_decimal::Decimal;
/// use std::collections::BTreeSet;
///
/// let head = |name: &str, calculation_type, value: Option<i64>, order| SalaryHeadDefinition {
///     name: name.to_string(),
///     calculation_type,
///     calculation_value: value.map(Decimal::from),
///     calculation_basis: String::new(),
///     exemption_limit: String::new(),
///     is_taxable: true,
///     order,
///     slab_type: None,
/// };
/// let template = CompensationTemplate::new(
///     "2025-26",
///     vec![
///         head("Basic", CalculationType::Percentage, Some(40), 1),
///         head("Other Allowance", CalculationType::Formula, None, 2),
///     ],
///     vec![],
/// )
/// .unwrap();
///
/// let annexure = evaluate_template(Decimal::from(1_000_000), &template, &BTreeSet::new()).unwrap();
/// assert_eq!(annexure.component("Basic").unwrap().annual_amount, Decimal::from(400_000));
/// assert_eq!(annexure.component("Other Allowance").unwrap().annual_amount, Decimal::from(600_000));
/// ```
pub fn evaluate_template(
    annual_ctc: Decimal,
    template: &CompensationTemplate,
    flexi_heads: &BTreeSet<String>,
) -> EngineResult<Annexure> {
    if annual_ctc <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "annual_ctc",
            format!("annual CTC must be positive, got {}", annual_ctc),
        ));
    }
    if annual_ctc > MAX_AMOUNT {
        return Err(EngineError::invalid_input(
            "annual_ctc",
            format!("annual CTC {} exceeds the maximum of {}", annual_ctc, MAX_AMOUNT),
        ));
    }

    debug!(
        annual_ctc = %annual_ctc,
        financial_year = %template.financial_year(),
        "Evaluating compensation template"
    );

    // sort_by_key is stable, so equal orders keep their declared position
    let mut heads: Vec<&SalaryHeadDefinition> = template.heads().iter().collect();
    heads.sort_by_key(|h| h.order);

    // First pass: every head except the balancing one.
    let mut annual_amounts: Vec<Option<Decimal>> = Vec::with_capacity(heads.len());
    let mut audit_steps = Vec::with_capacity(heads.len());
    for head in &heads {
        let resolved = resolve_fixed_head(head, annual_ctc, template)?;
        if let Some((amount, step)) = resolved {
            audit_steps.push(step);
            annual_amounts.push(Some(amount));
        } else {
            annual_amounts.push(None);
        }
    }

    // Second pass: the balancing residual.
    let allocated = annual_amounts
        .iter()
        .flatten()
        .try_fold(Decimal::ZERO, |sum, amount| sum.checked_add(*amount))
        .ok_or_else(|| overflow("allocated", annual_ctc))?;
    let residual = annual_ctc
        .checked_sub(allocated)
        .ok_or_else(|| overflow("residual", annual_ctc))?;
    let mut warnings = Vec::new();

    if let Some(formula) = template.formula_head() {
        if residual < Decimal::ZERO {
            warn!(
                head = %formula.name,
                annual_ctc = %annual_ctc,
                residual = %residual,
                "Balancing head resolved to a negative amount"
            );
            warnings.push(AuditWarning {
                code: NEGATIVE_BALANCING_AMOUNT.to_string(),
                message: format!(
                    "{} resolved to {}: other heads allocate {} of a {} CTC",
                    formula.name, residual, allocated, annual_ctc
                ),
                severity: WarningSeverity::High,
            });
        }

        audit_steps.push(AuditStep {
            step_number: 0,
            rule_id: "formula_head".to_string(),
            rule_name: formula.name.clone(),
            input: serde_json::json!({
                "annual_ctc": annual_ctc.normalize().to_string(),
                "allocated": allocated.normalize().to_string()
            }),
            output: serde_json::json!({
                "annual_amount": residual.normalize().to_string()
            }),
            reasoning: format!(
                "CTC ₹{} - other heads ₹{} = ₹{}",
                annual_ctc.normalize(),
                allocated.normalize(),
                residual.normalize()
            ),
        });
    }

    for (index, step) in audit_steps.iter_mut().enumerate() {
        step.step_number = index as u32 + 1;
    }

    let components = heads
        .iter()
        .zip(annual_amounts)
        .map(|(head, amount)| {
            let annual_amount = amount.unwrap_or(residual);
            ResolvedPayComponent {
                head_name: head.name.clone(),
                monthly_amount: monthly_from_annual(annual_amount),
                annual_amount,
                calculation_basis: head.calculation_basis.clone(),
                is_flexi_component: flexi_heads.contains(&head.name),
                is_taxable: head.is_taxable,
            }
        })
        .collect();

    Ok(Annexure {
        financial_year: template.financial_year().to_string(),
        annual_ctc,
        components,
        warnings,
        audit_steps,
    })
}

fn overflow(field: &str, annual_ctc: Decimal) -> EngineError {
    EngineError::invalid_input(
        field,
        format!("amounts for a CTC of {} exceed the representable range", annual_ctc),
    )
}

/// Resolves a non-formula head. Returns `None` for the formula head.
fn resolve_fixed_head(
    head: &SalaryHeadDefinition,
    annual_ctc: Decimal,
    template: &CompensationTemplate,
) -> EngineResult<Option<(Decimal, AuditStep)>> {
    let (amount, reasoning) = match head.calculation_type {
        CalculationType::Formula => return Ok(None),
        CalculationType::Percentage => {
            let percent = head.calculation_value.unwrap_or_default();
            let amount = annual_ctc
                .checked_mul(percent)
                .ok_or_else(|| overflow(&head.name, annual_ctc))?
                / ONE_HUNDRED;
            (
                amount,
                format!(
                    "{}% of ₹{} = ₹{}",
                    percent.normalize(),
                    annual_ctc.normalize(),
                    amount.normalize()
                ),
            )
        }
        CalculationType::Fixed => {
            let amount = head.calculation_value.unwrap_or_default();
            (amount, format!("Fixed annual amount ₹{}", amount.normalize()))
        }
        CalculationType::Slab => {
            // Template construction guarantees slab heads carry a slab type.
            let slab_type = head.slab_type.ok_or_else(|| EngineError::MissingSlabType {
                head: head.name.clone(),
            })?;
            let row = lookup_slab(template.slabs(), slab_type, annual_ctc)?;
            let upper = row
                .salary_max
                .map_or_else(|| "∞".to_string(), |max| max.normalize().to_string());
            (
                row.value,
                format!(
                    "{} slab [₹{}, ₹{}) contains CTC ₹{}: ₹{}",
                    slab_type,
                    row.salary_min.normalize(),
                    upper,
                    annual_ctc.normalize(),
                    row.value.normalize()
                ),
            )
        }
    };

    let step = AuditStep {
        step_number: 0,
        rule_id: format!("{:?}_head", head.calculation_type).to_lowercase(),
        rule_name: head.name.clone(),
        input: serde_json::json!({
            "annual_ctc": annual_ctc.normalize().to_string(),
            "calculation_value": head.calculation_value.map(|v| v.normalize().to_string())
        }),
        output: serde_json::json!({
            "annual_amount": amount.normalize().to_string()
        }),
        reasoning,
    };

    Ok(Some((amount, step)))
}
