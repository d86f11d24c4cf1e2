//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading company
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{CompanyConfig, CompanyMetadata};
use super::{CompensationTemplate, LeavePolicy, LeaveTypeRule, TaxRules};

/// Loads and provides access to a company configuration.
///
/// # Directory Structure
///
/// ```text
/// config/sample_company/
/// ├── company.yaml       # Company metadata
/// ├── template.yaml      # Compensation template (heads and slabs)
/// ├── leave_policy.yaml  # Leave year, week-offs and leave types
/// └── tax_rules.yaml     # Optional override of the statutory tax rules
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/sample_company").unwrap();
///
/// let casual = loader.get_leave_rule("CL").unwrap();
/// println!("{} allows {} days a year", casual.name, casual.max_instances_per_year);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: CompanyConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A template, policy or rule set fails validation (reported as a
    ///   parse error naming the file)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/sample_company")?;
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<CompanyMetadata>(&path.join("company.yaml"))?;
        let template = Self::load_yaml::<CompensationTemplate>(&path.join("template.yaml"))?;
        let leave_policy = Self::load_yaml::<LeavePolicy>(&path.join("leave_policy.yaml"))?;

        let tax_rules_path = path.join("tax_rules.yaml");
        let tax_rules = if tax_rules_path.exists() {
            Self::load_yaml::<TaxRules>(&tax_rules_path)?
        } else {
            debug!(path = %path.display(), "No tax_rules.yaml, using statutory tax rules");
            TaxRules::default()
        };

        debug!(
            company = %metadata.code,
            financial_year = %template.financial_year(),
            heads = template.heads().len(),
            leave_types = leave_policy.leave_types().len(),
            "Loaded company configuration"
        );

        Ok(Self {
            config: CompanyConfig::new(metadata, template, leave_policy, tax_rules),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying company configuration.
    pub fn config(&self) -> &CompanyConfig {
        &self.config
    }

    /// Returns the company metadata.
    pub fn company(&self) -> &CompanyMetadata {
        self.config.company()
    }

    /// Returns the compensation template.
    pub fn template(&self) -> &CompensationTemplate {
        self.config.template()
    }

    /// Returns the leave policy.
    pub fn leave_policy(&self) -> &LeavePolicy {
        self.config.leave_policy()
    }

    /// Returns the tax rules.
    pub fn tax_rules(&self) -> &TaxRules {
        self.config.tax_rules()
    }

    /// Gets a leave type rule by its short code.
    ///
    /// # Returns
    ///
    /// Returns the rule if found, or `LeaveTypeNotFound` error.
    pub fn get_leave_rule(&self, short_code: &str) -> EngineResult<&LeaveTypeRule> {
        self.config.leave_policy().rule(short_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalculationType;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/sample_company"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.company().code, "ACME");
        assert_eq!(loader.company().name, "Acme Software Private Limited");
    }

    #[test]
    fn test_template_loaded_with_single_formula_head() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let template = loader.template();

        assert_eq!(template.financial_year(), "2025-26");
        let formula = template.formula_head().unwrap();
        assert_eq!(formula.name, "Special Allowance");
        assert_eq!(formula.calculation_type, CalculationType::Formula);
    }

    #[test]
    fn test_leave_policy_loaded() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        let policy = loader.leave_policy();

        assert_eq!(policy.year_start_month(), 4);
        assert!(policy.week_off().contains(&0));
        assert!(policy.week_off().contains(&6));
    }

    #[test]
    fn test_get_leave_rule() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let casual = loader.get_leave_rule("CL").unwrap();
        assert_eq!(casual.name, "Casual Leave");
        assert_eq!(casual.max_instances_per_year, dec("12"));
    }

    #[test]
    fn test_get_leave_rule_unknown_returns_error() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        match loader.get_leave_rule("XX") {
            Err(EngineError::LeaveTypeNotFound { short_code }) => assert_eq!(short_code, "XX"),
            other => panic!("Expected LeaveTypeNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_tax_rules_falls_back_to_statutory() {
        let loader = ConfigLoader::load(config_path()).unwrap();
        assert_eq!(loader.tax_rules(), &TaxRules::default());
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        match ConfigLoader::load("/nonexistent/path") {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("company.yaml"));
            }
            other => panic!("Expected ConfigNotFound error, got {:?}", other),
        }
    }
}
