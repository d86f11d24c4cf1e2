//! Leave balance aggregation.
//!
//! Balances are recomputed from the full list of requests on every call;
//! there are no stored counters to drift out of step with the requests.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::day_count::leave_year_bounds;
use crate::config::LeavePolicy;
use crate::error::EngineResult;
use crate::models::{LeaveBalance, LeaveRequest};

/// Aggregates an employee's requests into a balance for every leave type in the policy.
///
/// `used` sums the days of approved and pending requests; rejected and
/// cancelled requests never count. `remaining` never drops below zero.
/// Requests for leave types the policy does not define are ignored.
///
/// The caller passes one employee's requests; no filtering by employee is done.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::aggregate_balances;
/// use payroll_engine::config::{Applicability, LeavePolicy, LeaveTypeRule};
/// use rust_decimal::Decimal;
/// use std::collections::BTreeSet;
///
/// let rule = LeaveTypeRule {
///     name: "Casual Leave".to_string(),
///     short_code: "CL".to_string(),
///     max_per_request: Decimal::from(3),
///     min_per_request: Decimal::ZERO,
///     max_instances_per_year: Decimal::from(12),
///     cooling_period: 0,
///     requires_approval: true,
///     requires_docs: false,
///     unpaid: false,
///     applicable_for: Applicability::All,
///     is_active: true,
/// };
/// let policy = LeavePolicy::new(1, BTreeSet::from([0, 6]), vec![rule]).unwrap();
///
/// let balances = aggregate_balances(&[], &policy);
/// assert_eq!(balances["CL"].remaining, Decimal::from(12));
/// ```
pub fn aggregate_balances(
    requests: &[LeaveRequest],
    policy: &LeavePolicy,
) -> BTreeMap<String, LeaveBalance> {
    let mut used: BTreeMap<&str, Decimal> = BTreeMap::new();
    for request in requests {
        if !request.status.counts_toward_balance() {
            continue;
        }
        if policy.rule(&request.short_code).is_err() {
            debug!(
                short_code = %request.short_code,
                "Ignoring request for leave type missing from policy"
            );
            continue;
        }
        *used.entry(request.short_code.as_str()).or_default() += request.days;
    }

    policy
        .leave_types()
        .iter()
        .map(|rule| {
            let total = rule.max_instances_per_year;
            let used = used
                .get(rule.short_code.as_str())
                .copied()
                .unwrap_or(Decimal::ZERO);
            let balance = LeaveBalance {
                short_code: rule.short_code.clone(),
                total,
                used,
                remaining: (total - used).max(Decimal::ZERO),
            };
            (rule.short_code.clone(), balance)
        })
        .collect()
}

/// Aggregates only the requests starting within the leave year containing `as_of`.
///
/// # Errors
///
/// Returns [`crate::error::EngineError::InvalidYearStartMonth`] if the
/// policy's start month is out of range.
pub fn aggregate_for_leave_year(
    requests: &[LeaveRequest],
    policy: &LeavePolicy,
    as_of: NaiveDate,
) -> EngineResult<BTreeMap<String, LeaveBalance>> {
    let (year_start, year_end) = leave_year_bounds(as_of, policy.year_start_month())?;

    let in_year: Vec<LeaveRequest> = requests
        .iter()
        .filter(|r| r.start_date >= year_start && r.start_date <= year_end)
        .cloned()
        .collect();

    debug!(
        %year_start,
        %year_end,
        counted = in_year.len(),
        skipped = requests.len() - in_year.len(),
        "Aggregating leave balances for leave year"
    );

    Ok(aggregate_balances(&in_year, policy))
}
