//! # Required Settings Compliance
//!
//! ONC certification requires a handful of host settings to hold exact
//! values. [`REQUIRED_SETTINGS`] is that table, in display order, and
//! [`SettingsComplianceChecker`] evaluates it against a
//! [`ConfigurationSource`].
//!
//! ## Evaluation Rules
//!
//! 1. Every rule is evaluated, in table order, on every call. Nothing is
//!    cached; the host may change settings between calls.
//! 2. A rule passes iff the actual value equals the required value exactly.
//!    No trimming, no case folding, no numeric coercion: `"sha512"` does
//!    not satisfy `"SHA512"` and `"01"` does not satisfy `"1"`.
//! 3. An unset setting reads as `""` and fails its rule. There are no
//!    error states.

use serde::Serialize;

use crate::config::ConfigurationSource;

/// A host setting that must hold an exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RequiredSettingRule {
    /// Host setting key.
    pub key: &'static str,
    /// Value the setting must equal exactly.
    pub required_value: &'static str,
    /// Human-readable name of the setting.
    pub description: &'static str,
}

/// Host settings required for ONC certification, in display order.
pub const REQUIRED_SETTINGS: &[RequiredSettingRule] = &[
    RequiredSettingRule {
        key: "gbl_fhir_rest_api",
        required_value: "1",
        description: "Enable OpenEMR Standard FHIR REST API",
    },
    RequiredSettingRule {
        key: "oauth_hash_algo",
        required_value: "SHA512",
        description: "Hash Algorithm for Authentication",
    },
    RequiredSettingRule {
        key: "oauth_token_hash_algo",
        required_value: "SHA512",
        description: "Hash Algorithm for Token",
    },
    RequiredSettingRule {
        key: "enable_auditlog_encryption",
        required_value: "1",
        description: "Enable Audit Log Encryption",
    },
];

/// Outcome of evaluating one [`RequiredSettingRule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceResult {
    /// Host setting key.
    pub key: String,
    /// Human-readable name of the setting.
    pub description: String,
    /// Value the setting must hold.
    pub required_value: String,
    /// Value the setting currently holds; empty when unset.
    pub actual_value: String,
    /// Whether `actual_value == required_value`.
    pub passed: bool,
}

/// Pass/fail counts over a [`ComplianceReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceSummary {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

/// Results for every rule, in rule-table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComplianceReport {
    results: Vec<ComplianceResult>,
}

impl ComplianceReport {
    /// Result for `key`, if the key is in the rule table.
    pub fn get(&self, key: &str) -> Option<&ComplianceResult> {
        self.results.iter().find(|r| r.key == key)
    }

    /// Results in rule-table order.
    pub fn iter(&self) -> std::slice::Iter<'_, ComplianceResult> {
        self.results.iter()
    }

    /// Rule keys in rule-table order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(|r| r.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// True iff every result passed.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    /// Count passes and failures.
    pub fn summary(&self) -> ComplianceSummary {
        let passed = self.results.iter().filter(|r| r.passed).count();
        let failed = self.results.len() - passed;
        ComplianceSummary {
            passed,
            failed,
            total: passed + failed,
        }
    }
}

impl<'a> IntoIterator for &'a ComplianceReport {
    type Item = &'a ComplianceResult;
    type IntoIter = std::slice::Iter<'a, ComplianceResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

/// Evaluates [`REQUIRED_SETTINGS`] against a configuration source.
#[derive(Debug, Clone)]
pub struct SettingsComplianceChecker<C> {
    config: C,
    rules: &'static [RequiredSettingRule],
}

impl<C: ConfigurationSource> SettingsComplianceChecker<C> {
    /// Create a checker over the fixed ONC rule table.
    pub fn new(config: C) -> Self {
        Self {
            config,
            rules: REQUIRED_SETTINGS,
        }
    }

    /// Evaluate every rule in table order.
    pub fn evaluate_all(&self) -> ComplianceReport {
        let results = self
            .rules
            .iter()
            .map(|rule| {
                let actual_value = self.config.get_setting_value(rule.key);
                let passed = actual_value == rule.required_value;
                if !passed {
                    tracing::debug!(
                        setting = rule.key,
                        required = rule.required_value,
                        actual = %actual_value,
                        "required setting does not match"
                    );
                }
                ComplianceResult {
                    key: rule.key.to_string(),
                    description: rule.description.to_string(),
                    required_value: rule.required_value.to_string(),
                    actual_value,
                    passed,
                }
            })
            .collect();
        ComplianceReport { results }
    }

    /// True iff every required setting holds its required value.
    pub fn all_pass(&self) -> bool {
        self.evaluate_all().all_passed()
    }

    /// Pass/fail counts from a fresh evaluation.
    pub fn summarize(&self) -> ComplianceSummary {
        self.evaluate_all().summary()
    }
}
