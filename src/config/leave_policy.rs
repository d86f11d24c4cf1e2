//! Leave policy configuration.
//!
//! A [`LeavePolicy`] holds the company calendar settings (leave-year start
//! month and weekly offs) and the rules for each leave type.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::weekday_index;
use crate::error::{EngineError, EngineResult};

/// An employee's gender as recorded for leave eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
    /// Any other gender.
    Other,
}

/// Which employees a leave type is offered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Applicability {
    /// Every employee.
    #[default]
    All,
    /// Male employees only.
    Male,
    /// Female employees only.
    Female,
    /// Employees of any other gender only.
    Other,
}

impl Applicability {
    /// Returns true if an employee of the given gender may take this leave.
    pub fn admits(self, gender: Gender) -> bool {
        matches!(
            (self, gender),
            (Applicability::All, _)
                | (Applicability::Male, Gender::Male)
                | (Applicability::Female, Gender::Female)
                | (Applicability::Other, Gender::Other)
        )
    }
}

/// The rules for one leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveTypeRule {
    /// Display name (e.g., "Casual Leave").
    pub name: String,
    /// Code unique within the policy (e.g., "CL").
    pub short_code: String,
    /// Most days a single request may cover.
    pub max_per_request: Decimal,
    /// Fewest days a single request may cover.
    #[serde(default)]
    pub min_per_request: Decimal,
    /// Days granted per leave year.
    pub max_instances_per_year: Decimal,
    /// Days that must pass between two requests of this type.
    #[serde(default)]
    pub cooling_period: u32,
    /// Whether a manager must approve requests.
    #[serde(default = "default_true")]
    pub requires_approval: bool,
    /// Whether supporting documents must be attached.
    #[serde(default)]
    pub requires_docs: bool,
    /// Whether the leave is unpaid.
    #[serde(default)]
    pub unpaid: bool,
    /// Which employees may take this leave.
    #[serde(default)]
    pub applicable_for: Applicability,
    /// Whether the leave type is currently offered.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
struct LeavePolicyDefinition {
    #[serde(default = "default_year_start_month")]
    year_start_month: u32,
    #[serde(default)]
    week_off: BTreeSet<u8>,
    #[serde(default)]
    leave_types: Vec<LeaveTypeRule>,
}

fn default_year_start_month() -> u32 {
    1
}

/// A validated company leave policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LeavePolicyDefinition")]
pub struct LeavePolicy {
    year_start_month: u32,
    week_off: BTreeSet<u8>,
    leave_types: Vec<LeaveTypeRule>,
}

impl LeavePolicy {
    /// Builds a leave policy.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidYearStartMonth`] if the month is outside 1..=12
    /// - [`EngineError::InvalidWeekOff`] if a week-off day is outside 0..=6
    /// - [`EngineError::DuplicateLeaveType`] if two rules share a short code
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::config::LeavePolicy;
    /// use std::collections::BTreeSet;
    ///
    /// let policy = LeavePolicy::new(4, BTreeSet::from([0, 6]), vec![]).unwrap();
    /// assert_eq!(policy.year_start_month(), 4);
    ///
    /// assert!(LeavePolicy::new(4, BTreeSet::from([7]), vec![]).is_err());
    /// ```
    pub fn new(
        year_start_month: u32,
        week_off: BTreeSet<u8>,
        leave_types: Vec<LeaveTypeRule>,
    ) -> EngineResult<Self> {
        if !(1..=12).contains(&year_start_month) {
            return Err(EngineError::InvalidYearStartMonth {
                month: year_start_month,
            });
        }

        if let Some(&day) = week_off.iter().find(|&&d| d > 6) {
            return Err(EngineError::InvalidWeekOff { day });
        }

        let mut codes = HashSet::new();
        for rule in &leave_types {
            if !codes.insert(rule.short_code.as_str()) {
                return Err(EngineError::DuplicateLeaveType {
                    short_code: rule.short_code.clone(),
                });
            }
        }

        Ok(Self {
            year_start_month,
            week_off,
            leave_types,
        })
    }

    /// Returns the month (1 = January) in which the leave year starts.
    pub fn year_start_month(&self) -> u32 {
        self.year_start_month
    }

    /// Returns the weekly off days, 0 = Sunday through 6 = Saturday.
    pub fn week_off(&self) -> &BTreeSet<u8> {
        &self.week_off
    }

    /// Returns every leave type rule, active or not.
    pub fn leave_types(&self) -> &[LeaveTypeRule] {
        &self.leave_types
    }

    /// Returns true if the date falls on a configured weekly off.
    pub fn is_week_off(&self, date: NaiveDate) -> bool {
        self.week_off.contains(&weekday_index(date))
    }

    /// Gets a leave type rule by its short code.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::LeaveTypeNotFound`] if no rule has that code.
    pub fn rule(&self, short_code: &str) -> EngineResult<&LeaveTypeRule> {
        self.leave_types
            .iter()
            .find(|r| r.short_code == short_code)
            .ok_or_else(|| EngineError::LeaveTypeNotFound {
                short_code: short_code.to_string(),
            })
    }

    /// Returns the active leave types an employee of the given gender may apply for.
    pub fn applicable_rules(&self, gender: Gender) -> Vec<&LeaveTypeRule> {
        self.leave_types
            .iter()
            .filter(|r| r.is_active && r.applicable_for.admits(gender))
            .collect()
    }
}

impl TryFrom<LeavePolicyDefinition> for LeavePolicy {
    type Error = EngineError;

    fn try_from(definition: LeavePolicyDefinition) -> Result<Self, Self::Error> {
        Self::new(
            definition.year_start_month,
            definition.week_off,
            definition.leave_types,
        )
    }
}
