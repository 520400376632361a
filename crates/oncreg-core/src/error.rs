//! # Error Types
//!
//! Errors used by the core crate. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - NPI errors carry the exact user-facing reason string in their
//!   `Display` output, so callers can surface them without rewording.
//! - Format failures (length, character class) and checksum failures are
//!   distinct variants: "malformed input" is not "plausible but wrong".
//! - Configuration errors only arise while loading a settings file. Reading
//!   an individual setting never fails.

use thiserror::Error;

/// Reason an NPI string was rejected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NpiError {
    /// After stripping separators the value is not 10 characters long.
    #[error("NPI must be exactly 10 digits")]
    WrongLength,

    /// The value contains a character that is not an ASCII digit.
    #[error("NPI must contain only digits")]
    NonDigit,

    /// The value is well-formed but fails the prefixed Luhn check.
    #[error("invalid check digit")]
    InvalidCheckDigit,
}

impl NpiError {
    /// True for length and character-class failures, false for checksum failures.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::WrongLength | Self::NonDigit)
    }
}

/// Error while loading configuration from a settings file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The settings document is not valid YAML.
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The settings document parsed but does not have the expected shape.
    #[error("invalid settings document: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_errors_are_distinguished_from_checksum_errors() {
        assert!(NpiError::WrongLength.is_format_error());
        assert!(NpiError::NonDigit.is_format_error());
        assert!(!NpiError::InvalidCheckDigit.is_format_error());
    }

    #[test]
    fn npi_error_display_is_the_user_facing_reason() {
        assert_eq!(NpiError::WrongLength.to_string(), "NPI must be exactly 10 digits");
        assert_eq!(NpiError::NonDigit.to_string(), "NPI must contain only digits");
        assert_eq!(NpiError::InvalidCheckDigit.to_string(), "invalid check digit");
    }
}
