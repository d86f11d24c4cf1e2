//! Leave application validation and submission.
//!
//! Checks run in a fixed order and the first failure is reported, so the
//! form always shows the earliest problem the employee needs to fix:
//!
//! 1. leave type selected, and the rule and balance are for that type
//! 2. start and end dates present
//! 3. reason not blank
//! 4. half-day type present for half-day requests
//! 5. half-day requests start and end on the same date
//! 6. documents attached when the leave type requires them
//! 7. at least one countable day
//! 8. no more than the per-request maximum
//! 9. no fewer than the per-request minimum
//! 10. no more than the remaining balance

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::day_count::count_days;
use crate::config::{LeavePolicy, LeaveTypeRule};
use crate::error::{EngineResult, LeaveValidationError};
use crate::models::{LeaveApplication, LeaveBalance, LeaveRequest, LeaveStatus};

/// Validates a leave application against its leave type and current balance.
///
/// # Returns
///
/// The number of days the application consumes, or the first rule it breaks.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::validate_application;
/// use payroll_engine::config::{Applicability, LeaveTypeRule};
/// use payroll_engine::error::LeaveValidationError;
/// use payroll_engine::models::{LeaveApplication, LeaveBalance};
/// use chrono::NaiveDate;
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
/// let balance = LeaveBalance {
///     short_code: "CL".to_string(),
///     total: Decimal::from(12),
///     used: Decimal::from(10),
///     remaining: Decimal::from(2),
/// };
/// let application = LeaveApplication {
///     employee_id: "emp_001".to_string(),
///     short_code: Some("CL".to_string()),
///     start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
///     end_date: NaiveDate::from_ymd_opt(2024, 1, 3),
///     reason: "Travel".to_string(),
///     ..Default::default()
/// };
///
/// let result = validate_application(&application, &rule, &balance, &BTreeSet::from([0, 6]));
/// assert!(matches!(result, Err(LeaveValidationError::InsufficientBalance { .. })));
/// ```
pub fn validate_application(
    application: &LeaveApplication,
    rule: &LeaveTypeRule,
    balance: &LeaveBalance,
    week_off: &BTreeSet<u8>,
) -> Result<Decimal, LeaveValidationError> {
    let selected = selected_leave_type(application)?;
    if rule.short_code != selected || balance.short_code != selected {
        return Err(LeaveValidationError::MismatchedLeaveType {
            selected: selected.to_string(),
            rule: rule.short_code.clone(),
            balance: balance.short_code.clone(),
        });
    }
    let (start_date, end_date) = selected_dates(application)?;

    if application.reason.trim().is_empty() {
        return Err(LeaveValidationError::BlankReason);
    }

    if application.is_half_day {
        if application.half_day_type.is_none() {
            return Err(LeaveValidationError::MissingHalfDayType);
        }
        if start_date != end_date {
            return Err(LeaveValidationError::HalfDaySpansMultipleDays);
        }
    }

    if rule.requires_docs && application.attachments.is_empty() {
        return Err(LeaveValidationError::MissingDocuments {
            short_code: rule.short_code.clone(),
        });
    }

    // The half-day range was checked above, so counting cannot fail here.
    let days = count_days(start_date, end_date, application.is_half_day, week_off)
        .map_err(|_| LeaveValidationError::HalfDaySpansMultipleDays)?;

    if days <= Decimal::ZERO {
        return Err(LeaveValidationError::NoWorkingDays);
    }

    if days > rule.max_per_request {
        return Err(LeaveValidationError::ExceedsMaxPerRequest {
            short_code: rule.short_code.clone(),
            max: rule.max_per_request,
            requested: days,
        });
    }

    if days < rule.min_per_request {
        return Err(LeaveValidationError::BelowMinPerRequest {
            short_code: rule.short_code.clone(),
            min: rule.min_per_request,
            requested: days,
        });
    }

    if days > balance.remaining {
        return Err(LeaveValidationError::InsufficientBalance {
            short_code: rule.short_code.clone(),
            remaining: balance.remaining,
            requested: days,
        });
    }

    Ok(days)
}

fn selected_leave_type(application: &LeaveApplication) -> Result<&str, LeaveValidationError> {
    application
        .short_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or(LeaveValidationError::MissingLeaveType)
}

fn selected_dates(
    application: &LeaveApplication,
) -> Result<(NaiveDate, NaiveDate), LeaveValidationError> {
    application
        .start_date
        .zip(application.end_date)
        .ok_or(LeaveValidationError::MissingDates)
}

/// Validates an application against the policy and turns it into a pending request.
///
/// The leave type is resolved from the policy and its balance from
/// `balances` (as produced by [`super::aggregate_balances`]); a leave type with
/// no balance entry is treated as unused. The request's `days` are fixed
/// here and never recomputed.
///
/// # Errors
///
/// - [`crate::error::EngineError::LeaveValidation`] for any rule violation
/// - [`crate::error::EngineError::LeaveTypeNotFound`] if the selected type is not in the policy
pub fn submit_application(
    application: &LeaveApplication,
    policy: &LeavePolicy,
    balances: &BTreeMap<String, LeaveBalance>,
) -> EngineResult<LeaveRequest> {
    let short_code = selected_leave_type(application)?;
    let rule = policy.rule(short_code)?;

    let unused;
    let balance = match balances.get(short_code) {
        Some(balance) => balance,
        None => {
            unused = LeaveBalance {
                short_code: rule.short_code.clone(),
                total: rule.max_instances_per_year,
                used: Decimal::ZERO,
                remaining: rule.max_instances_per_year,
            };
            &unused
        }
    };

    let days = validate_application(application, rule, balance, policy.week_off())?;
    let (start_date, end_date) = selected_dates(application)?;

    debug!(
        employee_id = %application.employee_id,
        short_code = %rule.short_code,
        days = %days,
        "Leave application accepted"
    );

    Ok(LeaveRequest {
        employee_id: application.employee_id.clone(),
        short_code: rule.short_code.clone(),
        start_date,
        end_date,
        is_half_day: application.is_half_day,
        half_day_type: application.half_day_type,
        days,
        status: LeaveStatus::Pending,
        reason: application.reason.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Applicability;
    use crate::error::EngineError;
    use crate::models::HalfDayType;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rule(requires_docs: bool) -> LeaveTypeRule {
        LeaveTypeRule {
            name: "Casual Leave".to_string(),
            short_code: "CL".to_string(),
            max_per_request: dec("3"),
            min_per_request: dec("0.5"),
            max_instances_per_year: dec("12"),
            cooling_period: 0,
            requires_approval: true,
            requires_docs,
            unpaid: false,
            applicable_for: Applicability::All,
            is_active: true,
        }
    }

    fn balance(remaining: &str) -> LeaveBalance {
        LeaveBalance {
            short_code: "CL".to_string(),
            total: dec("12"),
            used: dec("12") - dec(remaining),
            remaining: dec(remaining),
        }
    }

    fn weekend() -> BTreeSet<u8> {
        BTreeSet::from([0, 6])
    }

    /// Monday 2024-01-01 to Wednesday 2024-01-03.
    fn application() -> LeaveApplication {
        LeaveApplication {
            employee_id: "emp_001".to_string(),
            short_code: Some("CL".to_string()),
            start_date: Some(date(2024, 1, 1)),
            end_date: Some(date(2024, 1, 3)),
            reason: "Family function".to_string(),
            is_half_day: false,
            half_day_type: None,
            attachments: vec![],
        }
    }

    fn validate(app: &LeaveApplication) -> Result<Decimal, LeaveValidationError> {
        validate_application(app, &rule(false), &balance("12"), &weekend())
    }

    #[test]
    fn test_valid_application_returns_days() {
        assert_eq!(validate(&application()), Ok(dec("3")));
    }

    #[test]
    fn test_missing_leave_type_checked_first() {
        let app = LeaveApplication {
            short_code: None,
            start_date: None,
            reason: String::new(),
            ..application()
        };
        assert_eq!(validate(&app), Err(LeaveValidationError::MissingLeaveType));

        let app = LeaveApplication {
            short_code: Some("  ".to_string()),
            ..application()
        };
        assert_eq!(validate(&app), Err(LeaveValidationError::MissingLeaveType));
    }

    #[test]
    fn test_rule_for_another_leave_type_rejected() {
        let app = LeaveApplication {
            short_code: Some("SL".to_string()),
            ..application()
        };
        assert_eq!(
            validate(&app),
            Err(LeaveValidationError::MismatchedLeaveType {
                selected: "SL".to_string(),
                rule: "CL".to_string(),
                balance: "CL".to_string(),
            })
        );
    }

    #[test]
    fn test_balance_for_another_leave_type_rejected() {
        let other = LeaveBalance {
            short_code: "EL".to_string(),
            ..balance("12")
        };
        let result = validate_application(&application(), &rule(false), &other, &weekend());
        assert!(matches!(
            result,
            Err(LeaveValidationError::MismatchedLeaveType { balance, .. }) if balance == "EL"
        ));
    }

    #[test]
    fn test_selected_code_is_trimmed_before_matching() {
        let app = LeaveApplication {
            short_code: Some(" CL ".to_string()),
            ..application()
        };
        assert_eq!(validate(&app), Ok(dec("3")));
    }

    #[test]
    fn test_missing_dates_checked_before_reason() {
        let app = LeaveApplication {
            end_date: None,
            reason: String::new(),
            ..application()
        };
        assert_eq!(validate(&app), Err(LeaveValidationError::MissingDates));
    }

    #[test]
    fn test_blank_reason() {
        let app = LeaveApplication {
            reason: "   ".to_string(),
            ..application()
        };
        assert_eq!(validate(&app), Err(LeaveValidationError::BlankReason));
    }

    #[test]
    fn test_half_day_requires_half_day_type() {
        let app = LeaveApplication {
            is_half_day: true,
            end_date: Some(date(2024, 1, 1)),
            ..application()
        };
        assert_eq!(validate(&app), Err(LeaveValidationError::MissingHalfDayType));
    }

    #[test]
    fn test_half_day_must_be_single_date() {
        let app = LeaveApplication {
            is_half_day: true,
            half_day_type: Some(HalfDayType::FirstHalf),
            ..application()
        };
        assert_eq!(
            validate(&app),
            Err(LeaveValidationError::HalfDaySpansMultipleDays)
        );
    }

    #[test]
    fn test_valid_half_day_on_week_off_is_permitted() {
        // 2024-01-06 is a Saturday
        let app = LeaveApplication {
            is_half_day: true,
            half_day_type: Some(HalfDayType::SecondHalf),
            start_date: Some(date(2024, 1, 6)),
            end_date: Some(date(2024, 1, 6)),
            ..application()
        };
        assert_eq!(validate(&app), Ok(dec("0.5")));
    }

    #[test]
    fn test_documents_required() {
        let result = validate_application(&application(), &rule(true), &balance("12"), &weekend());
        assert_eq!(
            result,
            Err(LeaveValidationError::MissingDocuments {
                short_code: "CL".to_string()
            })
        );

        let app = LeaveApplication {
            attachments: vec!["certificate.pdf".to_string()],
            ..application()
        };
        let result = validate_application(&app, &rule(true), &balance("12"), &weekend());
        assert_eq!(result, Ok(dec("3")));
    }

    #[test]
    fn test_weekend_only_range_has_no_working_days() {
        let app = LeaveApplication {
            start_date: Some(date(2024, 1, 6)),
            end_date: Some(date(2024, 1, 7)),
            ..application()
        };
        assert_eq!(validate(&app), Err(LeaveValidationError::NoWorkingDays));
    }

    #[test]
    fn test_reversed_range_has_no_working_days() {
        let app = LeaveApplication {
            start_date: Some(date(2024, 1, 3)),
            end_date: Some(date(2024, 1, 1)),
            ..application()
        };
        assert_eq!(validate(&app), Err(LeaveValidationError::NoWorkingDays));
    }

    #[test]
    fn test_exceeds_max_per_request() {
        // Monday to the following Monday: 6 working days
        let app = LeaveApplication {
            end_date: Some(date(2024, 1, 8)),
            ..application()
        };
        assert_eq!(
            validate(&app),
            Err(LeaveValidationError::ExceedsMaxPerRequest {
                short_code: "CL".to_string(),
                max: dec("3"),
                requested: dec("6"),
            })
        );
    }

    #[test]
    fn test_below_min_per_request() {
        let mut strict = rule(false);
        strict.min_per_request = dec("2");
        let app = LeaveApplication {
            end_date: Some(date(2024, 1, 1)),
            ..application()
        };
        let result = validate_application(&app, &strict, &balance("12"), &weekend());
        assert_eq!(
            result,
            Err(LeaveValidationError::BelowMinPerRequest {
                short_code: "CL".to_string(),
                min: dec("2"),
                requested: dec("1"),
            })
        );
    }

    #[test]
    fn test_insufficient_balance_checked_last() {
        let result = validate_application(&application(), &rule(false), &balance("2"), &weekend());
        assert_eq!(
            result,
            Err(LeaveValidationError::InsufficientBalance {
                short_code: "CL".to_string(),
                remaining: dec("2"),
                requested: dec("3"),
            })
        );
    }

    #[test]
    fn test_exact_balance_is_enough() {
        let result = validate_application(&application(), &rule(false), &balance("3"), &weekend());
        assert_eq!(result, Ok(dec("3")));
    }

    fn policy() -> LeavePolicy {
        LeavePolicy::new(1, weekend(), vec![rule(false)]).unwrap()
    }

    #[test]
    fn test_submit_creates_pending_request() {
        let request = submit_application(&application(), &policy(), &BTreeMap::new()).unwrap();
        assert_eq!(request.status, LeaveStatus::Pending);
        assert_eq!(request.days, dec("3"));
        assert_eq!(request.short_code, "CL");
        assert_eq!(request.start_date, date(2024, 1, 1));
    }

    #[test]
    fn test_submit_uses_supplied_balance() {
        let balances = BTreeMap::from([("CL".to_string(), balance("1"))]);
        let result = submit_application(&application(), &policy(), &balances);
        assert!(matches!(
            result,
            Err(EngineError::LeaveValidation(
                LeaveValidationError::InsufficientBalance { .. }
            ))
        ));
    }

    #[test]
    fn test_submit_unknown_leave_type() {
        let app = LeaveApplication {
            short_code: Some("XX".to_string()),
            ..application()
        };
        let result = submit_application(&app, &policy(), &BTreeMap::new());
        assert!(matches!(
            result,
            Err(EngineError::LeaveTypeNotFound { short_code }) if short_code == "XX"
        ));
    }

    #[test]
    fn test_submit_without_leave_type() {
        let app = LeaveApplication {
            short_code: None,
            ..application()
        };
        let result = submit_application(&app, &policy(), &BTreeMap::new());
        assert!(matches!(
            result,
            Err(EngineError::LeaveValidation(LeaveValidationError::MissingLeaveType))
        ));
    }
}
