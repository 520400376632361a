//! # Configuration Sources
//!
//! The host application owns settings storage. The checks in this
//! workspace only ever *read* settings, through the narrow
//! [`ConfigurationSource`] capability.
//!
//! ## Implementations
//!
//! - [`InMemoryConfig`]: `HashMap`-backed. Used by tests and by the CLI,
//!   which loads it from a YAML settings file.
//! - [`EnvironmentConfig`]: wraps another source and lets environment
//!   variables override the module's own keys (organization info, FHIR
//!   endpoint, enable flag). Host system settings are always delegated.
//!
//! [`config_from_env`] (or [`config_from_lookup`] in tests) picks between the two based on
//! [`ENV_CONFIG_VAR`], for container deployments that configure the module
//! through the environment only.
//!
//! ## Missing keys
//!
//! A missing key is never an error. `get_setting_value` yields the empty
//! string and the typed getters yield the caller's default.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::error::ConfigError;

/// Environment variable that toggles environment-based configuration.
///
/// Truthy values (see [`parse_boolean`]) enable [`EnvironmentConfig`].
pub const ENV_CONFIG_VAR: &str = "ONCREG_ENV_CONFIG";

/// Module configuration keys owned by the registration helper.
pub mod keys {
    /// Whether the registration helper is enabled.
    pub const ENABLED: &str = "oce_onc_registration_enabled";
    /// Legal name of the healthcare organization.
    pub const ORG_NAME: &str = "oce_onc_registration_org_name";
    /// Full address of the organization.
    pub const ORG_LOCATION: &str = "oce_onc_registration_org_location";
    /// Organization National Provider Identifier.
    pub const ORG_NPI: &str = "oce_onc_registration_org_npi";
    /// Explicit FHIR base URL; auto-detected from [`SITE_ADDRESS`] if empty.
    pub const FHIR_ENDPOINT: &str = "oce_onc_registration_fhir_endpoint";
    /// Date the registration was submitted.
    pub const REGISTRATION_DATE: &str = "oce_onc_registration_date";
    /// Current registration status as recorded by the host.
    pub const REGISTRATION_STATUS: &str = "oce_onc_registration_status";
    /// Host system setting: public base URL of the site's OAuth/API server.
    pub const SITE_ADDRESS: &str = "site_addr_oath";
}

/// Read-only access to host configuration.
///
/// Implementations must be `Send + Sync` so a single source can be shared
/// by the checker and the verifier behind an `Arc`.
pub trait ConfigurationSource: Send + Sync {
    /// Raw string value of a setting, or `default` if the key is absent.
    fn get_string(&self, key: &str, default: &str) -> String;

    /// Boolean value of a setting, or `default` if the key is absent.
    fn get_boolean(&self, key: &str, default: bool) -> bool;

    /// Whether the key is present at all.
    fn has(&self, key: &str) -> bool;

    /// Value of a host setting; the empty string when unset.
    fn get_setting_value(&self, key: &str) -> String {
        self.get_string(key, "")
    }
}

impl<T: ConfigurationSource + ?Sized> ConfigurationSource for &T {
    fn get_string(&self, key: &str, default: &str) -> String {
        (**self).get_string(key, default)
    }

    fn get_boolean(&self, key: &str, default: bool) -> bool {
        (**self).get_boolean(key, default)
    }

    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }
}

impl<T: ConfigurationSource + ?Sized> ConfigurationSource for Box<T> {
    fn get_string(&self, key: &str, default: &str) -> String {
        (**self).get_string(key, default)
    }

    fn get_boolean(&self, key: &str, default: bool) -> bool {
        (**self).get_boolean(key, default)
    }

    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }
}

impl<T: ConfigurationSource + ?Sized> ConfigurationSource for Arc<T> {
    fn get_string(&self, key: &str, default: &str) -> String {
        (**self).get_string(key, default)
    }

    fn get_boolean(&self, key: &str, default: bool) -> bool {
        (**self).get_boolean(key, default)
    }

    fn has(&self, key: &str) -> bool {
        (**self).has(key)
    }
}

/// Interpret a string as a boolean flag.
///
/// `1`, `true`, `on` and `yes` (case-insensitive, surrounding whitespace
/// ignored) are true. Everything else, including the empty string, is false.
pub fn parse_boolean(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

// ---------------------------------------------------------------------------
// In-memory source
// ---------------------------------------------------------------------------

/// Configuration held in a `HashMap`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryConfig {
    values: HashMap<String, String>,
}

impl InMemoryConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Number of keys held.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys are held.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Parse a YAML settings document.
    ///
    /// The top level must be a mapping from keys to scalars. Strings are
    /// kept as-is, numbers use their decimal rendering, booleans become
    /// `"1"` / `""` (the way the host renders boolean flags), and `null`
    /// becomes the empty string. An empty document yields an empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML and
    /// [`ConfigError::Invalid`] for non-mapping documents, non-string keys,
    /// or nested values.
    pub fn from_yaml_str(document: &str) -> Result<Self, ConfigError> {
        let value: serde_yaml::Value = serde_yaml::from_str(document)?;
        let mapping = match value {
            serde_yaml::Value::Null => return Ok(Self::new()),
            serde_yaml::Value::Mapping(m) => m,
            other => {
                return Err(ConfigError::Invalid(format!(
                    "top level must be a mapping, got {}",
                    yaml_kind(&other)
                )))
            }
        };

        let mut config = Self::new();
        for (key, value) in mapping {
            let key = match key {
                serde_yaml::Value::String(k) => k,
                other => {
                    return Err(ConfigError::Invalid(format!(
                        "setting keys must be strings, got {}",
                        yaml_kind(&other)
                    )))
                }
            };
            let rendered = render_scalar(&key, value)?;
            config.set(key, rendered);
        }
        Ok(config)
    }

    /// Read and parse a YAML settings file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`InMemoryConfig::from_yaml_str`].
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&document)
    }
}

fn render_scalar(key: &str, value: serde_yaml::Value) -> Result<String, ConfigError> {
    match value {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::Bool(true) => Ok("1".to_string()),
        serde_yaml::Value::Bool(false) => Ok(String::new()),
        serde_yaml::Value::Number(n) => Ok(n.to_string()),
        serde_yaml::Value::String(s) => Ok(s),
        other => Err(ConfigError::Invalid(format!(
            "setting {key:?} must be a scalar, got {}",
            yaml_kind(&other)
        ))),
    }
}

fn yaml_kind(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

impl ConfigurationSource for InMemoryConfig {
    fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn get_boolean(&self, key: &str, default: bool) -> bool {
        self.values.get(key).map_or(default, |v| parse_boolean(v))
    }

    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

// ---------------------------------------------------------------------------
// Environment overrides
// ---------------------------------------------------------------------------

/// Module keys that may be overridden from the environment, with their
/// variable names.
const ENV_KEY_MAP: &[(&str, &str)] = &[
    (keys::ENABLED, "ONCREG_ENABLED"),
    (keys::ORG_NAME, "ONCREG_ORG_NAME"),
    (keys::ORG_LOCATION, "ONCREG_ORG_LOCATION"),
    (keys::ORG_NPI, "ONCREG_ORG_NPI"),
    (keys::FHIR_ENDPOINT, "ONCREG_FHIR_ENDPOINT"),
];

type EnvLookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Source that reads mapped module keys from environment variables first
/// and delegates everything else to an inner source.
pub struct EnvironmentConfig<S> {
    inner: S,
    lookup: EnvLookup,
}

impl<S: std::fmt::Debug> std::fmt::Debug for EnvironmentConfig<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentConfig")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<S: ConfigurationSource> EnvironmentConfig<S> {
    /// Wrap `inner`, reading overrides from the process environment.
    pub fn new(inner: S) -> Self {
        Self::with_lookup(inner, |var| std::env::var(var).ok())
    }

    /// Wrap `inner`, reading overrides through `lookup` instead of the
    /// process environment.
    pub fn with_lookup<F>(inner: S, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            inner,
            lookup: Box::new(lookup),
        }
    }

    /// Environment variable mapped to `key`, if any.
    pub fn env_var_for(key: &str) -> Option<&'static str> {
        ENV_KEY_MAP
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, var)| *var)
    }

    fn override_for(&self, key: &str) -> Option<String> {
        Self::env_var_for(key).and_then(|var| (self.lookup)(var))
    }
}

impl<S: ConfigurationSource> ConfigurationSource for EnvironmentConfig<S> {
    fn get_string(&self, key: &str, default: &str) -> String {
        match self.override_for(key) {
            Some(value) => value,
            None => self.inner.get_string(key, default),
        }
    }

    fn get_boolean(&self, key: &str, default: bool) -> bool {
        match self.override_for(key) {
            Some(value) => parse_boolean(&value),
            None => self.inner.get_boolean(key, default),
        }
    }

    fn has(&self, key: &str) -> bool {
        self.override_for(key).is_some() || self.inner.has(key)
    }
}

/// Choose the configuration source for this process.
///
/// Returns `base` wrapped in [`EnvironmentConfig`] when [`ENV_CONFIG_VAR`]
/// is truthy, otherwise `base` unchanged.
pub fn config_from_env<S>(base: S) -> Box<dyn ConfigurationSource>
where
    S: ConfigurationSource + 'static,
{
    config_from_lookup(base, |var| std::env::var(var).ok())
}

/// [`config_from_env`] with variables read through `lookup`.
///
/// `lookup` decides both the [`ENV_CONFIG_VAR`] switch and the overrides.
pub fn config_from_lookup<S, F>(base: S, lookup: F) -> Box<dyn ConfigurationSource>
where
    S: ConfigurationSource + 'static,
    F: Fn(&str) -> Option<String> + Send + Sync + 'static,
{
    let env_mode = lookup(ENV_CONFIG_VAR)
        .map(|v| parse_boolean(&v))
        .unwrap_or(false);
    if env_mode {
        tracing::debug!(var = ENV_CONFIG_VAR, "environment configuration mode enabled");
        Box::new(EnvironmentConfig::with_lookup(base, lookup))
    } else {
        Box::new(base)
    }
}
