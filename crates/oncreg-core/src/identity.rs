//! # National Provider Identifier (NPI)
//!
//! An NPI is a 10-digit number whose last digit is a Luhn check digit.
//! The check digit is computed as if the number carried the 5-digit
//! card-issuer prefix [`NPI_LUHN_PREFIX`] (`80840`), so a plain mod-10 Luhn
//! over the 10 digits accepts and rejects the wrong identifiers.
//!
//! ## Validation
//!
//! 1. ASCII whitespace and `-` are stripped; every other character is kept.
//! 2. The remainder must be exactly 10 characters ([`NpiError::WrongLength`]).
//! 3. All 10 must be ASCII digits ([`NpiError::NonDigit`]).
//! 4. `80840` + the 10 digits must pass Luhn ([`NpiError::InvalidCheckDigit`]).
//!
//! [`validate_npi`] reports the outcome as an [`IdentifierValidation`]
//! value for display. [`Npi::new`] is the typed constructor.

use serde::{Deserialize, Serialize};

use crate::error::NpiError;

/// Issuer prefix prepended to an NPI before the Luhn check.
pub const NPI_LUHN_PREFIX: &str = "80840";

/// Number of digits in an NPI.
pub const NPI_LENGTH: usize = 10;

/// A National Provider Identifier that has passed validation.
///
/// Holds the canonical 10-digit form, without separators.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Npi(String);

impl Npi {
    /// Validate `raw` and return the canonical identifier.
    ///
    /// # Errors
    ///
    /// Returns the first [`NpiError`] hit, in the order length, digits,
    /// check digit.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, NpiError> {
        let npi = strip_separators(raw.as_ref());

        if npi.chars().count() != NPI_LENGTH {
            return Err(NpiError::WrongLength);
        }
        if !npi.bytes().all(|b| b.is_ascii_digit()) {
            return Err(NpiError::NonDigit);
        }

        let prefixed = format!("{NPI_LUHN_PREFIX}{npi}");
        if !luhn_valid(&prefixed) {
            return Err(NpiError::InvalidCheckDigit);
        }

        Ok(Self(npi))
    }

    /// The canonical 10-digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Npi {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Npi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Npi {
    type Err = NpiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Validation outcome in display form.
///
/// `error` is `None` iff `valid` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierValidation {
    pub valid: bool,
    pub error: Option<String>,
}

impl IdentifierValidation {
    fn ok() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    fn rejected(err: NpiError) -> Self {
        Self {
            valid: false,
            error: Some(err.to_string()),
        }
    }
}

impl From<Result<Npi, NpiError>> for IdentifierValidation {
    fn from(result: Result<Npi, NpiError>) -> Self {
        match result {
            Ok(_) => Self::ok(),
            Err(e) => Self::rejected(e),
        }
    }
}

/// Validate an NPI string. Pure and deterministic.
pub fn validate_npi(raw: &str) -> IdentifierValidation {
    Npi::new(raw).into()
}

/// Stateless NPI validator, for callers that hold validators as values.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierValidator;

impl IdentifierValidator {
    pub fn validate(&self, raw: &str) -> IdentifierValidation {
        validate_npi(raw)
    }
}

/// Drop ASCII whitespace and `-`. Other characters, including non-ASCII
/// spaces, are kept and fail a later check.
fn strip_separators(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r' | '-'))
        .collect()
}

/// Luhn check over an all-digit string.
///
/// Scanning from the right, every digit at an odd index (0-based) is
/// doubled, with 9 subtracted when the product exceeds 9.
fn luhn_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Validation is deterministic for any input.
        #[test]
        fn validate_is_deterministic(raw in ".{0,16}") {
            prop_assert_eq!(validate_npi(&raw), validate_npi(&raw));
        }

        /// Inserting spaces or hyphens never changes the outcome.
        #[test]
        fn separators_never_change_the_outcome(
            digits in "[0-9]{10}",
            seps in prop::collection::vec(prop_oneof![Just(""), Just(" "), Just("-")], 10),
        ) {
            let spaced: String = digits
                .chars()
                .zip(seps.iter())
                .flat_map(|(d, s)| std::iter::once(d.to_string()).chain(std::iter::once(s.to_string())))
                .collect();
            prop_assert_eq!(validate_npi(&spaced), validate_npi(&digits));
        }

        /// Exactly one check digit completes any 9-digit body.
        #[test]
        fn exactly_one_check_digit_is_valid(body in "[0-9]{9}") {
            let valid = (0..10)
                .filter(|d| Npi::new(format!("{body}{d}")).is_ok())
                .count();
            prop_assert_eq!(valid, 1);
        }

        /// Any 10-digit string fails only on the checksum, never on format.
        #[test]
        fn ten_digits_never_fail_format(digits in "[0-9]{10}") {
            match Npi::new(&digits) {
                Ok(npi) => prop_assert_eq!(npi.as_str(), digits.as_str()),
                Err(e) => prop_assert_eq!(e, NpiError::InvalidCheckDigit),
            }
        }
    }
}
