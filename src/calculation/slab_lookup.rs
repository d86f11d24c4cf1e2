//! Slab and bracket primitives.
//!
//! Both compensation slabs and income-tax brackets are ranges over a
//! continuous amount. This module holds the shared pieces: a partition check
//! used when configuration is built, the unique-row slab lookup, and the
//! progressive bracket sum used by each tax regime.

use rust_decimal::Decimal;

use crate::config::{SlabRow, SlabType, TaxBracket};
use crate::error::{EngineError, EngineResult};
use crate::models::BracketSlice;

/// Why a set of ranges fails to partition `[0, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartitionFault {
    /// The value at which coverage stops.
    Gap(Decimal),
    /// The value covered by more than one range.
    Overlap(Decimal),
}

impl PartitionFault {
    /// Converts the fault into the slab-table configuration error.
    pub fn into_slab_error(self, slab_type: SlabType) -> EngineError {
        match self {
            PartitionFault::Gap(at) => EngineError::SlabGap { slab_type, at },
            PartitionFault::Overlap(at) => EngineError::SlabOverlap { slab_type, at },
        }
    }

    /// Converts the fault into the tax-bracket configuration error.
    pub fn into_bracket_error(self, regime: &str) -> EngineError {
        let message = match self {
            PartitionFault::Gap(at) => format!("brackets leave a gap at {}", at),
            PartitionFault::Overlap(at) => format!("brackets overlap at {}", at),
        };
        EngineError::InvalidBracket {
            regime: regime.to_string(),
            message,
        }
    }
}

/// Checks that half-open ranges `[lower, upper)` cover `[0, ∞)` exactly once.
///
/// Ranges may be given in any order. `None` as an upper bound means the range
/// is unbounded. An empty slice is accepted; it simply has no coverage to
/// check and any lookup against it will fail.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{check_partition, PartitionFault};
/// use rust_decimal::Decimal;
///
/// let ranges = [
///     (Decimal::ZERO, Some(Decimal::from(500_000))),
///     (Decimal::from(500_000), None),
/// ];
/// assert!(check_partition(&ranges).is_ok());
///
/// let gap = [(Decimal::ZERO, Some(Decimal::from(100)))];
/// assert_eq!(check_partition(&gap), Err(PartitionFault::Gap(Decimal::from(100))));
/// ```
pub fn check_partition(ranges: &[(Decimal, Option<Decimal>)]) -> Result<(), PartitionFault> {
    if ranges.is_empty() {
        return Ok(());
    }

    let mut sorted = ranges.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    if sorted[0].0 > Decimal::ZERO {
        return Err(PartitionFault::Gap(Decimal::ZERO));
    }

    let mut covered_to: Option<Decimal> = None;
    for (lower, upper) in &sorted {
        if let Some(expected) = covered_to {
            if *lower < expected {
                return Err(PartitionFault::Overlap(*lower));
            }
            if *lower > expected {
                return Err(PartitionFault::Gap(expected));
            }
        }

        match upper {
            // An unbounded range must be the last one.
            None => {
                return match sorted.iter().find(|(l, _)| l > lower) {
                    Some((next_lower, _)) => Err(PartitionFault::Overlap(*next_lower)),
                    None if sorted.iter().filter(|(l, _)| l == lower).count() > 1 => {
                        Err(PartitionFault::Overlap(*lower))
                    }
                    None => Ok(()),
                };
            }
            Some(upper) if upper <= lower => return Err(PartitionFault::Gap(*lower)),
            Some(upper) => covered_to = Some(*upper),
        }
    }

    // Every range was bounded, so coverage ends at the last upper bound.
    Err(PartitionFault::Gap(covered_to.unwrap_or(Decimal::ZERO)))
}

/// Finds the single slab row of `slab_type` whose range contains `annual_ctc`.
///
/// # Errors
///
/// Returns [`EngineError::SlabLookupFailed`] when no row (a gap) or more than
/// one row (an overlap) contains the CTC.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::lookup_slab;
/// use payroll_engine::config::{SlabRow, SlabType};
/// use rust_decimal::Decimal;
///
/// let rows = vec![
///     SlabRow {
///         slab_type: SlabType::Fuel,
///         salary_min: Decimal::ZERO,
///         salary_max: Some(Decimal::from(600_000)),
///         value: Decimal::ZERO,
///         description: "Not eligible".to_string(),
///     },
///     SlabRow {
///         slab_type: SlabType::Fuel,
///         salary_min: Decimal::from(600_000),
///         salary_max: None,
///         value: Decimal::from(21_600),
///         description: "1800 per month".to_string(),
///     },
/// ];
///
/// // The lower bound is inclusive to the upper row.
/// let row = lookup_slab(&rows, SlabType::Fuel, Decimal::from(600_000)).unwrap();
/// assert_eq!(row.value, Decimal::from(21_600));
/// ```
pub fn lookup_slab(
    rows: &[SlabRow],
    slab_type: SlabType,
    annual_ctc: Decimal,
) -> EngineResult<&SlabRow> {
    let mut matching = rows
        .iter()
        .filter(|row| row.slab_type == slab_type && row.contains(annual_ctc));

    match (matching.next(), matching.count()) {
        (Some(row), 0) => Ok(row),
        (first, rest) => Err(EngineError::SlabLookupFailed {
            slab_type,
            annual_ctc,
            matches: usize::from(first.is_some()) + rest,
        }),
    }
}

/// Applies progressive brackets to an income.
///
/// Brackets must be sorted by lower bound and partition `[0, ∞)`, which
/// [`crate::config::RegimeRules`] guarantees. Returns the total tax and the
/// per-bracket slices that produced it; brackets the income never reaches
/// are omitted.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::progressive_tax;
/// use payroll_engine::config::RegimeRules;
/// use rust_decimal::Decimal;
///
/// let rules = RegimeRules::statutory_new();
/// let (tax, slices) = progressive_tax(Decimal::from(750_000), rules.brackets());
/// assert_eq!(tax, Decimal::from(17_500));
/// assert_eq!(slices.len(), 2);
/// ```
pub fn progressive_tax(income: Decimal, brackets: &[TaxBracket]) -> (Decimal, Vec<BracketSlice>) {
    let mut total = Decimal::ZERO;
    let mut slices = Vec::new();

    for bracket in brackets {
        if income <= bracket.lower {
            break;
        }

        let ceiling = match bracket.upper {
            Some(upper) if upper < income => upper,
            _ => income,
        };
        let portion = ceiling - bracket.lower;
        let tax = portion * bracket.rate;
        total += tax;

        slices.push(BracketSlice {
            lower: bracket.lower,
            upper: bracket.upper,
            rate: bracket.rate,
            income: portion,
            tax,
        });
    }

    (total, slices)
}
