use registar_core::UserIdentity;
use serde::{Deserialize, Serialize};

/// Registration payload; the login is derived from the name.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub person_id: i32,
    pub first_name: String,
    pub last_name: String,
    /// Address the issued credentials are mailed to, when given.
    #[serde(default)]
    pub email: Option<String>,
}

/// Issued credentials, returned exactly once.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub login: String,
    pub password: String,
}

/// Login payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Login outcome.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub login: String,
    pub person_id: i32,
    /// Set on the very first sign-in of an account.
    pub must_change_password: bool,
}

/// Identity of the current session.
#[derive(Debug, Serialize)]
pub struct UserIdentityResponse {
    pub person_id: i32,
    pub login: String,
}

impl From<UserIdentity> for UserIdentityResponse {
    fn from(identity: UserIdentity) -> Self {
        Self {
            person_id: identity.person_id(),
            login: identity.login().to_owned(),
        }
    }
}
