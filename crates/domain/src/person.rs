//! Person identity, gender, and contact-channel types.

use std::str::FromStr;

use registar_core::AppError;
use serde::{Deserialize, Serialize};

/// Unique identifier for a person row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonId(i32);

impl PersonId {
    /// Creates a person identifier from a raw database key.
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

impl std::fmt::Display for PersonId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Registered gender of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Male competitor.
    Male,
    /// Female competitor.
    Female,
}

impl Gender {
    /// Returns the storage string for this gender.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl FromStr for Gender {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(AppError::Validation(format!(
                "gender must be 'male' or 'female', got '{value}'"
            ))),
        }
    }
}

/// Channel of a person contact entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactType {
    /// Email address.
    Email,
    /// Telephone number.
    Phone,
}

impl ContactType {
    /// Returns the storage string for this contact type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

impl FromStr for ContactType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "email" => Ok(Self::Email),
            "phone" => Ok(Self::Phone),
            _ => Err(AppError::Validation(format!(
                "contact type must be 'email' or 'phone', got '{value}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{ContactType, Gender};

    #[test]
    fn gender_round_trips_through_storage_string() {
        for gender in [Gender::Male, Gender::Female] {
            assert_eq!(Gender::from_str(gender.as_str()).ok(), Some(gender));
        }
    }

    #[test]
    fn unknown_gender_is_rejected() {
        assert!(Gender::from_str("other").is_err());
    }

    #[test]
    fn contact_type_round_trips_through_storage_string() {
        for contact_type in [ContactType::Email, ContactType::Phone] {
            assert_eq!(
                ContactType::from_str(contact_type.as_str()).ok(),
                Some(contact_type)
            );
        }
    }

    #[test]
    fn unknown_contact_type_is_rejected() {
        assert!(ContactType::from_str("fax").is_err());
    }
}
