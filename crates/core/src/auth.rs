use serde::{Deserialize, Serialize};

/// User information persisted in the authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    person_id: i32,
    login: String,
}

impl UserIdentity {
    /// Creates a user identity from an authenticated credential row.
    #[must_use]
    pub fn new(person_id: i32, login: impl Into<String>) -> Self {
        Self {
            person_id,
            login: login.into(),
        }
    }

    /// Returns the person this identity belongs to.
    #[must_use]
    pub fn person_id(&self) -> i32 {
        self.person_id
    }

    /// Returns the login name of the authenticated user.
    #[must_use]
    pub fn login(&self) -> &str {
        self.login.as_str()
    }
}
