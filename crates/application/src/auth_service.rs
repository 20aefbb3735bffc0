//! Credential ports and application service.
//!
//! Registration issues a derived login and a generated initial password.
//! A credential whose `last_login` is still NULL has never signed in, which
//! callers surface as "must change password".

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use registar_core::{AppError, AppResult};
use registar_domain::{INITIAL_PASSWORD_CHARSET, INITIAL_PASSWORD_LENGTH, PersonId, derive_login};

/// Stored credential row.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// Credential row identifier.
    pub id: i32,
    /// Person the credential belongs to, one-to-one.
    pub person_id: PersonId,
    /// Unique login name.
    pub login: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last successful login; NULL until the first sign-in.
    pub last_login: Option<DateTime<Utc>>,
}

/// Repository port for credential persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Finds a credential by login name.
    async fn find_by_login(&self, login: &str) -> AppResult<Option<CredentialRecord>>;

    /// Inserts a credential row and returns its id.
    async fn create(&self, person_id: PersonId, login: &str, password_hash: &str) -> AppResult<i32>;

    /// Stamps `last_login` with the current time.
    async fn record_login(&self, id: i32) -> AppResult<()>;
}

/// One-way password hashing port.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password with a per-call random salt.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

/// Registration payload.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    /// Person to issue credentials for.
    pub person_id: PersonId,
    /// First name the login is derived from.
    pub first_name: String,
    /// Last name the login is derived from.
    pub last_name: String,
}

/// Credentials issued by a successful registration.
#[derive(Debug, Clone)]
pub struct IssuedCredentials {
    /// Derived login name.
    pub login: String,
    /// Generated plaintext password, returned once.
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// Credential row identifier.
    pub credential_id: i32,
    /// Person the credential belongs to.
    pub person_id: PersonId,
    /// Login name.
    pub login: String,
    /// Whether the account has never signed in before this call.
    pub must_change_password: bool,
}

/// Application service for credential operations.
#[derive(Clone)]
pub struct AuthService {
    repository: Arc<dyn AuthRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl AuthService {
    /// Creates an auth service from its ports.
    #[must_use]
    pub fn new(
        repository: Arc<dyn AuthRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            repository,
            password_hasher,
        }
    }

    /// Issues credentials for a person.
    ///
    /// The login is derived from the name; a random initial password is
    /// generated, hashed, and stored. The plaintext password is returned to
    /// the caller exactly once.
    pub async fn register(&self, input: RegisterInput) -> AppResult<IssuedCredentials> {
        let login = derive_login(&input.first_name, &input.last_name)?;

        if self.repository.find_by_login(&login).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "login '{login}' is already registered"
            )));
        }

        let password = generate_initial_password()?;
        let password_hash = self.password_hasher.hash_password(&password)?;
        self.repository
            .create(input.person_id, &login, &password_hash)
            .await?;

        Ok(IssuedCredentials { login, password })
    }

    /// Authenticates a login/password pair.
    ///
    /// Unknown logins and wrong passwords fail with the same generic
    /// message; a hash is still computed for unknown logins to keep the
    /// response time uniform.
    pub async fn login(&self, login: &str, password: &str) -> AppResult<LoginOutcome> {
        let Some(credential) = self.repository.find_by_login(login).await? else {
            let _ = self.password_hasher.hash_password(password);
            return Err(AppError::Unauthorized(
                "invalid login or password".to_owned(),
            ));
        };

        if !self
            .password_hasher
            .verify_password(password, &credential.password_hash)?
        {
            return Err(AppError::Unauthorized(
                "invalid login or password".to_owned(),
            ));
        }

        let must_change_password = credential.last_login.is_none();
        self.repository.record_login(credential.id).await?;

        Ok(LoginOutcome {
            credential_id: credential.id,
            person_id: credential.person_id,
            login: credential.login,
            must_change_password,
        })
    }
}

fn generate_initial_password() -> AppResult<String> {
    let mut bytes = [0u8; INITIAL_PASSWORD_LENGTH];
    getrandom::fill(&mut bytes).map_err(|error| {
        AppError::Internal(format!("failed to generate initial password: {error}"))
    })?;

    Ok(bytes
        .iter()
        .map(|byte| {
            INITIAL_PASSWORD_CHARSET[usize::from(*byte) % INITIAL_PASSWORD_CHARSET.len()] as char
        })
        .collect())
}

#[cfg(test)]
mod tests;
