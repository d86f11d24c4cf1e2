//! Error types for the payroll rules engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure a compensation, tax or leave calculation can report.
//! Leave-rule violations have their own enum, [`LeaveValidationError`],
//! because they are expected, user-correctable outcomes rather than faults.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::config::SlabType;

/// The main error type for the payroll rules engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/template.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/template.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A template declares more than one balancing (formula) head.
    #[error("Template has more than one formula head: '{first}' and '{second}'")]
    DuplicateFormulaHead {
        /// The first formula head encountered.
        first: String,
        /// The second formula head encountered.
        second: String,
    },

    /// Two salary heads in a template share a name.
    #[error("Duplicate salary head name: {name}")]
    DuplicateHeadName {
        /// The repeated head name.
        name: String,
    },

    /// A percentage or fixed head has no calculation value.
    #[error("Salary head '{head}' requires a calculation value")]
    MissingCalculationValue {
        /// The head missing its value.
        head: String,
    },

    /// A slab head does not say which slab table it reads.
    #[error("Slab head '{head}' does not name a slab type")]
    MissingSlabType {
        /// The head missing its slab type.
        head: String,
    },

    /// The slab rows for a slab type leave part of the CTC axis uncovered.
    #[error("Slab rows for {slab_type} leave a gap at {at}")]
    SlabGap {
        /// The slab type with the gap.
        slab_type: SlabType,
        /// The first uncovered value.
        at: Decimal,
    },

    /// The slab rows for a slab type overlap.
    #[error("Slab rows for {slab_type} overlap at {at}")]
    SlabOverlap {
        /// The slab type with overlapping rows.
        slab_type: SlabType,
        /// The value covered by more than one row.
        at: Decimal,
    },

    /// Tax brackets are not a contiguous partition starting at zero.
    #[error("Invalid tax brackets for {regime} regime: {message}")]
    InvalidBracket {
        /// The regime whose brackets are invalid.
        regime: String,
        /// A description of the problem.
        message: String,
    },

    /// Two leave types in a policy share a short code.
    #[error("Duplicate leave type short code: {short_code}")]
    DuplicateLeaveType {
        /// The repeated short code.
        short_code: String,
    },

    /// A week-off day is outside 0 (Sunday) to 6 (Saturday).
    #[error("Invalid week-off day {day}: expected 0 (Sunday) to 6 (Saturday)")]
    InvalidWeekOff {
        /// The offending day index.
        day: u8,
    },

    /// The leave year start month is outside 1 to 12.
    #[error("Invalid leave year start month {month}: expected 1 to 12")]
    InvalidYearStartMonth {
        /// The offending month.
        month: u32,
    },

    /// No leave type with the given short code exists in the policy.
    #[error("Leave type not found: {short_code}")]
    LeaveTypeNotFound {
        /// The short code that was not found.
        short_code: String,
    },

    /// Slab lookup found zero or several rows containing the CTC.
    #[error("Slab lookup for {slab_type} at CTC {annual_ctc} matched {matches} rows")]
    SlabLookupFailed {
        /// The slab type being looked up.
        slab_type: SlabType,
        /// The annual CTC used as the lookup key.
        annual_ctc: Decimal,
        /// How many rows matched (0 for a gap, more than 1 for an overlap).
        matches: usize,
    },

    /// Caller-supplied input was rejected before any computation.
    #[error("Invalid input '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A leave application broke one of its leave type's rules.
    #[error(transparent)]
    LeaveValidation(#[from] LeaveValidationError),
}

impl EngineError {
    /// Returns true for errors caused by a malformed template, policy or rule set.
    ///
    /// These must be surfaced to an administrator; retrying with the same
    /// configuration cannot succeed.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            EngineError::ConfigNotFound { .. }
                | EngineError::ConfigParseError { .. }
                | EngineError::DuplicateFormulaHead { .. }
                | EngineError::DuplicateHeadName { .. }
                | EngineError::MissingCalculationValue { .. }
                | EngineError::MissingSlabType { .. }
                | EngineError::SlabGap { .. }
                | EngineError::SlabOverlap { .. }
                | EngineError::InvalidBracket { .. }
                | EngineError::DuplicateLeaveType { .. }
                | EngineError::InvalidWeekOff { .. }
                | EngineError::InvalidYearStartMonth { .. }
                | EngineError::LeaveTypeNotFound { .. }
                | EngineError::SlabLookupFailed { .. }
        )
    }

    pub(crate) fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// A leave application that breaks a leave type rule.
///
/// Variants are listed in the order the checks run; the first failing
/// check is the one reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveValidationError {
    /// No leave type was selected.
    #[error("Please select a leave type")]
    MissingLeaveType,

    /// The rule or balance passed in belongs to a different leave type than the one selected.
    #[error("Leave type '{selected}' was checked against rule '{rule}' and balance '{balance}'")]
    MismatchedLeaveType {
        /// The selected leave type.
        selected: String,
        /// The short code of the rule supplied.
        rule: String,
        /// The short code of the balance supplied.
        balance: String,
    },

    /// The start or end date is missing.
    #[error("Please select both a start date and an end date")]
    MissingDates,

    /// The reason is empty or whitespace.
    #[error("Please provide a reason for the leave")]
    BlankReason,

    /// A half-day request did not say which half.
    #[error("Please select which half of the day you are taking off")]
    MissingHalfDayType,

    /// A half-day request spans more than one date.
    #[error("Half-day leave must start and end on the same date")]
    HalfDaySpansMultipleDays,

    /// The leave type needs supporting documents and none were attached.
    #[error("Leave type '{short_code}' requires supporting documents")]
    MissingDocuments {
        /// The leave type requiring documents.
        short_code: String,
    },

    /// The range contains no countable working days.
    #[error("The selected range contains no working days")]
    NoWorkingDays,

    /// The request is longer than the leave type allows.
    #[error("Leave type '{short_code}' allows at most {max} days per request, requested {requested}")]
    ExceedsMaxPerRequest {
        /// The leave type.
        short_code: String,
        /// The per-request maximum.
        max: Decimal,
        /// The days requested.
        requested: Decimal,
    },

    /// The request is shorter than the leave type allows.
    #[error("Leave type '{short_code}' requires at least {min} days per request, requested {requested}")]
    BelowMinPerRequest {
        /// The leave type.
        short_code: String,
        /// The per-request minimum.
        min: Decimal,
        /// The days requested.
        requested: Decimal,
    },

    /// The request needs more days than remain in the balance.
    #[error("Insufficient '{short_code}' balance: {remaining} days remaining, requested {requested}")]
    InsufficientBalance {
        /// The leave type.
        short_code: String,
        /// Days remaining in the balance.
        remaining: Decimal,
        /// The days requested.
        requested: Decimal,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
