//! Company configuration types.
//!
//! This module holds the top-level structures assembled from a company
//! configuration directory.

use serde::Deserialize;

use super::{CompensationTemplate, LeavePolicy, TaxRules};

/// Metadata about the company the configuration belongs to.
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyMetadata {
    /// Short company code (e.g., "ACME").
    pub code: String,
    /// The registered company name.
    pub name: String,
}

/// The complete company configuration loaded from YAML files.
///
/// This struct aggregates the compensation template, leave policy and tax
/// rules a payroll run reads. It is immutable once loaded, so one instance can
/// be shared by any number of concurrent evaluations.
#[derive(Debug, Clone)]
pub struct CompanyConfig {
    metadata: CompanyMetadata,
    template: CompensationTemplate,
    leave_policy: LeavePolicy,
    tax_rules: TaxRules,
}

impl CompanyConfig {
    /// Creates a new CompanyConfig from its component parts.
    pub fn new(
        metadata: CompanyMetadata,
        template: CompensationTemplate,
        leave_policy: LeavePolicy,
        tax_rules: TaxRules,
    ) -> Self {
        Self {
            metadata,
            template,
            leave_policy,
            tax_rules,
        }
    }

    /// Returns the company metadata.
    pub fn company(&self) -> &CompanyMetadata {
        &self.metadata
    }

    /// Returns the compensation template.
    pub fn template(&self) -> &CompensationTemplate {
        &self.template
    }

    /// Returns the leave policy.
    pub fn leave_policy(&self) -> &LeavePolicy {
        &self.leave_policy
    }

    /// Returns the tax rules.
    pub fn tax_rules(&self) -> &TaxRules {
        &self.tax_rules
    }
}
