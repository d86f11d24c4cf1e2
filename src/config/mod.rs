//! Company configuration for the payroll rules engine.
//!
//! This module provides the strongly-typed compensation template, leave
//! policy and tax rules, and the loader that reads them from a company
//! configuration directory of YAML files.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/sample_company").unwrap();
//! println!("Loaded company: {}", config.company().name);
//! ```

mod leave_policy;
mod loader;
mod tax_rules;
mod template;
mod types;

pub use leave_policy::{Applicability, Gender, LeavePolicy, LeaveTypeRule};
pub use loader::ConfigLoader;
pub use tax_rules::{DeductionCaps, RegimeRules, TaxBracket, TaxRules};
pub use template::{
    CalculationType, CompensationTemplate, SalaryHeadDefinition, SlabRow, SlabType,
};
pub use types::{CompanyConfig, CompanyMetadata};
