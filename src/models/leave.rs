//! Leave application, request and balance models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Which half of the day a half-day leave covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HalfDayType {
    /// Morning half.
    FirstHalf,
    /// Afternoon half.
    SecondHalf,
}

/// Lifecycle status of a leave request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Submitted and awaiting a decision.
    Pending,
    /// Approved by the approver.
    Approved,
    /// Rejected by the approver.
    Rejected,
    /// Withdrawn before or after approval.
    Cancelled,
}

impl LeaveStatus {
    /// Returns true if requests in this status consume balance.
    pub fn counts_toward_balance(self) -> bool {
        matches!(self, LeaveStatus::Pending | LeaveStatus::Approved)
    }

    /// Returns true if a request may move from this status to `next`.
    pub fn can_transition_to(self, next: LeaveStatus) -> bool {
        matches!(
            (self, next),
            (
                LeaveStatus::Pending,
                LeaveStatus::Approved | LeaveStatus::Rejected | LeaveStatus::Cancelled
            ) | (LeaveStatus::Approved, LeaveStatus::Cancelled)
        )
    }
}

impl std::fmt::Display for LeaveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeaveStatus::Pending => write!(f, "pending"),
            LeaveStatus::Approved => write!(f, "approved"),
            LeaveStatus::Rejected => write!(f, "rejected"),
            LeaveStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A leave form as filled in by the employee, before validation.
///
/// Every field the employee may leave empty is optional here; validation
/// reports the first one missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveApplication {
    /// The applying employee.
    pub employee_id: String,
    /// The selected leave type, if any.
    #[serde(default)]
    pub short_code: Option<String>,
    /// First day of leave.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Last day of leave, inclusive.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Free-text reason.
    #[serde(default)]
    pub reason: String,
    /// Whether only half a day is requested.
    #[serde(default)]
    pub is_half_day: bool,
    /// Which half, for half-day requests.
    #[serde(default)]
    pub half_day_type: Option<HalfDayType>,
    /// Names of attached supporting documents.
    #[serde(default)]
    pub attachments: Vec<String>,
}

/// A submitted leave request.
///
/// `days` is fixed when the request is created and never recomputed, even if
/// the policy's week-offs later change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// The applying employee.
    pub employee_id: String,
    /// The leave type.
    pub short_code: String,
    /// First day of leave.
    pub start_date: NaiveDate,
    /// Last day of leave, inclusive.
    pub end_date: NaiveDate,
    /// Whether only half a day was requested.
    pub is_half_day: bool,
    /// Which half, for half-day requests.
    #[serde(default)]
    pub half_day_type: Option<HalfDayType>,
    /// Countable days, computed at creation.
    pub days: Decimal,
    /// Current status.
    pub status: LeaveStatus,
    /// Free-text reason.
    #[serde(default)]
    pub reason: String,
}

impl LeaveRequest {
    /// Applies an approver action.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidInput`] if the move is not allowed, e.g.
    /// approving a rejected request or re-opening a cancelled one.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{LeaveRequest, LeaveStatus};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let mut request = LeaveRequest {
    ///     employee_id: "emp_001".to_string(),
    ///     short_code: "CL".to_string(),
    ///     start_date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
    ///     end_date: NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(),
    ///     is_half_day: false,
    ///     half_day_type: None,
    ///     days: Decimal::from(2),
    ///     status: LeaveStatus::Pending,
    ///     reason: "Family function".to_string(),
    /// };
    ///
    /// request.transition(LeaveStatus::Approved).unwrap();
    /// assert!(request.transition(LeaveStatus::Rejected).is_err());
    /// ```
    pub fn transition(&mut self, next: LeaveStatus) -> EngineResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(EngineError::invalid_input(
                "status",
                format!("cannot move a {} request to {}", self.status, next),
            ));
        }
        self.status = next;
        Ok(())
    }
}

/// Entitlement and consumption for one leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveBalance {
    /// The leave type.
    pub short_code: String,
    /// Days granted per year.
    pub total: Decimal,
    /// Days consumed by approved and pending requests.
    pub used: Decimal,
    /// Days still available, never below zero.
    pub remaining: Decimal,
}
