//! Argon2id password hasher implementation.

use argon2::password_hash::SaltString;
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use registar_application::PasswordHasher as PasswordHasherPort;
use registar_core::{AppError, AppResult};

/// Argon2id password hasher with OWASP-recommended parameters
/// (m=19456 KiB, t=2, p=1).
#[derive(Clone)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    /// Creates a hasher with the recommended parameters.
    #[must_use]
    pub fn new() -> Self {
        let params = Params::new(19456, 2, 1, None).unwrap_or_else(|_| Params::default());

        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasherPort for Argon2PasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);

        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|error| AppError::Internal(format!("failed to hash password: {error}")))?;

        Ok(hash.to_string())
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(hash).map_err(|error| {
            AppError::Internal(format!("failed to parse stored password hash: {error}"))
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(error) => Err(AppError::Internal(format!(
                "password verification failed: {error}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use registar_application::PasswordHasher as PasswordHasherPort;

    use super::Argon2PasswordHasher;

    #[test]
    fn generated_hashes_verify_and_are_salted() {
        let hasher = Argon2PasswordHasher::new();

        let first = hasher.hash_password("tajné-heslo");
        let second = hasher.hash_password("tajné-heslo");
        assert!(first.is_ok());
        assert!(second.is_ok());
        let first = first.unwrap_or_default();
        let second = second.unwrap_or_default();
        assert_ne!(first, second, "per-call salts must differ");

        assert_eq!(hasher.verify_password("tajné-heslo", &first).ok(), Some(true));
        assert_eq!(
            hasher.verify_password("iné-heslo", &first).ok(),
            Some(false)
        );
    }
}
