//! Calculation logic for the payroll rules engine.
//!
//! This module contains the three pure computations the engine performs:
//! compensation template evaluation (slab lookup and residual balancing),
//! income tax under the old and new regimes with deduction capping, and
//! leave day counting, application validation and balance aggregation.

mod compensation;
mod day_count;
mod deductions;
mod leave_balance;
mod leave_validation;
mod slab_lookup;
mod tax_regime;

pub use compensation::{evaluate_template, monthly_from_annual};
pub use day_count::{HALF_DAY, count_days, leave_year_bounds, weekday_index};
pub use deductions::{cap_deductions, disallowed_amount};
pub use leave_balance::{aggregate_balances, aggregate_for_leave_year};
pub use leave_validation::{submit_application, validate_application};
pub use slab_lookup::{PartitionFault, check_partition, lookup_slab, progressive_tax};
pub use tax_regime::{TaxCalculator, monthly_tds};
