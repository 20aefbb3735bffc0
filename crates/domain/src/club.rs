//! Club identity and registration-number rules.

use registar_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Unique identifier for a club row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClubId(i32);

impl ClubId {
    /// Creates a club identifier from a raw database key.
    #[must_use]
    pub fn from_i32(value: i32) -> Self {
        Self(value)
    }

    /// Returns the raw database key.
    #[must_use]
    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for ClubId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Validated organization registration number.
///
/// An ICO is exactly eight ASCII digits, unique per club.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ico(String);

impl Ico {
    /// Creates a validated registration number.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation("ico must not be empty".to_owned()));
        }

        if trimmed.len() != 8 || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(AppError::Validation(format!(
                "ico must be exactly eight digits, got '{trimmed}'"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the validated registration number.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Ico> for String {
    fn from(value: Ico) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::Ico;

    #[test]
    fn eight_digit_ico_is_accepted() {
        assert!(Ico::new("12345678").is_ok());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let ico = Ico::new(" 12345678 ");
        assert_eq!(ico.ok().map(String::from).as_deref(), Some("12345678"));
    }

    #[test]
    fn short_ico_is_rejected() {
        assert!(Ico::new("1234").is_err());
    }

    #[test]
    fn non_numeric_ico_is_rejected() {
        assert!(Ico::new("1234567a").is_err());
    }

    #[test]
    fn empty_ico_is_rejected() {
        assert!(Ico::new("   ").is_err());
    }
}
