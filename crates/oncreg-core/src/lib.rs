//! # oncreg-core: Foundational Types for ONC Registration Checks
//!
//! This crate holds the pure, host-independent pieces of the ONC
//! registration helper. Every other crate in the workspace depends on
//! `oncreg-core`; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Configuration behind a capability.** The host owns settings storage.
//!    Everything here reads settings through [`ConfigurationSource`], so
//!    tests run against [`InMemoryConfig`] and production wires in whatever
//!    the host provides.
//!
//! 2. **Rules as data.** The required host settings live in a single ordered
//!    table, [`REQUIRED_SETTINGS`]. Adding a rule never touches the
//!    evaluation loop.
//!
//! 3. **Validated identifiers.** [`Npi`] can only be constructed from a
//!    string that passes the length, digit, and prefixed-Luhn checks.
//!
//! 4. **Outcomes are values.** A failed setting or a bad NPI is reported in
//!    a result struct, never as a panic or an `Err` from the check itself.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `oncreg-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod identity;
pub mod settings;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use config::{
    config_from_env, config_from_lookup, parse_boolean, ConfigurationSource, EnvironmentConfig,
    InMemoryConfig, ENV_CONFIG_VAR,
};
pub use error::{ConfigError, NpiError};
pub use identity::{validate_npi, IdentifierValidation, IdentifierValidator, Npi, NPI_LUHN_PREFIX};
pub use settings::{
    ComplianceReport, ComplianceResult, ComplianceSummary, RequiredSettingRule,
    SettingsComplianceChecker, REQUIRED_SETTINGS,
};
pub use temporal::{Clock, SystemClock};
