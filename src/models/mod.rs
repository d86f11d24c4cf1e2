//! Core data models for the payroll rules engine.
//!
//! This module contains the domain models produced and consumed by the
//! calculations: salary annexures, tax declarations and results, leave
//! requests and balances, and the audit records attached to results.

mod annexure;
mod audit;
mod declaration;
mod leave;
mod tax_result;

pub use annexure::{Annexure, ResolvedPayComponent};
pub use audit::{AuditStep, AuditWarning, NEGATIVE_BALANCING_AMOUNT, WarningSeverity};
pub use declaration::{DeclarationInput, MAX_AMOUNT};
pub use leave::{HalfDayType, LeaveApplication, LeaveBalance, LeaveRequest, LeaveStatus};
pub use tax_result::{BracketSlice, DeductionBreakdown, RegimeTax, TaxComputationResult, TaxRegime};
