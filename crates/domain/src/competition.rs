use serde::{Deserialize, Serialize};

/// Unique identifier for a competition row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompetitionId(i32);

impl CompetitionId {
    /// Creates a competition identifier from a raw database key.
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

impl std::fmt::Display for CompetitionId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
