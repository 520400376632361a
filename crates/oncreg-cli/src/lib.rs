//! # oncreg-cli: ONC Registration Command-Line Interface
//!
//! Plays the role of the host orchestrator: loads settings, runs the
//! checks from `oncreg-core` and `oncreg-registry`, and prints the
//! results.
//!
//! ## Subcommands
//!
//! - `oncreg settings`: required host settings and pass/fail summary
//! - `oncreg npi <VALUE>`: NPI format and check-digit validation
//! - `oncreg verify`: is the FHIR endpoint on the published listing page
//! - `oncreg report`: everything above plus the registration email
//!
//! ## Exit Codes
//!
//! `0` when the check passed, `1` when it ran but did not pass, and `1`
//! with an error message when it could not run at all.
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the checks themselves.
//! - Handlers delegate to the domain crates; no business logic here.

pub mod npi;
pub mod report;
pub mod settings;
pub mod verify;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use oncreg_core::{config_from_env, ConfigurationSource, InMemoryConfig};

/// Shared configuration handle passed to every subcommand.
pub type SharedConfig = Arc<dyn ConfigurationSource>;

/// Load host settings from an optional YAML file, then apply environment
/// overrides when `ONCREG_ENV_CONFIG` is set.
///
/// Without a file the base configuration is empty, so every required
/// setting reads as unset.
pub fn load_config(settings: Option<&Path>) -> Result<SharedConfig> {
    let base = match settings {
        Some(path) => InMemoryConfig::from_yaml_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => {
            tracing::debug!("no settings file given; starting from empty configuration");
            InMemoryConfig::new()
        }
    };
    tracing::debug!(keys = base.len(), "loaded host settings");
    Ok(Arc::from(config_from_env(base)))
}

/// Map a pass/fail outcome to a process exit code.
pub(crate) fn exit_code(passed: bool) -> u8 {
    if passed {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_config_without_file_is_empty() {
        let config = load_config(None).unwrap();
        assert_eq!(config.get_setting_value("gbl_fhir_rest_api"), "");
    }

    #[test]
    fn load_config_reads_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "oauth_hash_algo: SHA512\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.get_setting_value("oauth_hash_algo"), "SHA512");
    }

    #[test]
    fn load_config_reports_bad_file_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let err = load_config(Some(&path)).err().unwrap();
        assert!(format!("{err:#}").contains("missing.yaml"));
    }

    #[test]
    fn exit_code_maps_pass_to_zero() {
        assert_eq!(exit_code(true), 0);
        assert_eq!(exit_code(false), 1);
    }
}
