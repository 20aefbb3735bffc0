use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use registar_core::{AppError, AppResult};
use registar_domain::PersonId;
use tokio::sync::Mutex;

use super::{AuthRepository, AuthService, CredentialRecord, PasswordHasher, RegisterInput};

#[derive(Default)]
struct FakeRepository {
    credentials: Mutex<HashMap<String, CredentialRecord>>,
}

#[async_trait]
impl AuthRepository for FakeRepository {
    async fn find_by_login(&self, login: &str) -> AppResult<Option<CredentialRecord>> {
        Ok(self.credentials.lock().await.get(login).cloned())
    }

    async fn create(
        &self,
        person_id: PersonId,
        login: &str,
        password_hash: &str,
    ) -> AppResult<i32> {
        let mut credentials = self.credentials.lock().await;
        let id = i32::try_from(credentials.len())
            .map_err(|_| AppError::Internal("fake repository overflow".to_owned()))?
            + 1;
        credentials.insert(
            login.to_owned(),
            CredentialRecord {
                id,
                person_id,
                login: login.to_owned(),
                password_hash: password_hash.to_owned(),
                created_at: Utc::now(),
                last_login: None,
            },
        );
        Ok(id)
    }

    async fn record_login(&self, id: i32) -> AppResult<()> {
        let mut credentials = self.credentials.lock().await;
        for credential in credentials.values_mut() {
            if credential.id == id {
                credential.last_login = Some(Utc::now());
            }
        }
        Ok(())
    }
}

struct FakeHasher;

impl PasswordHasher for FakeHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}

fn service() -> (AuthService, Arc<FakeRepository>) {
    let repository = Arc::new(FakeRepository::default());
    (
        AuthService::new(repository.clone(), Arc::new(FakeHasher)),
        repository,
    )
}

fn register_input() -> RegisterInput {
    RegisterInput {
        person_id: PersonId::from_i32(7),
        first_name: "Peter".to_owned(),
        last_name: "Novák".to_owned(),
    }
}

#[tokio::test]
async fn registration_derives_the_login_and_stores_a_hash() {
    let (service, repository) = service();

    let issued = service.register(register_input()).await;
    assert!(issued.is_ok());
    let issued = issued.unwrap_or_else(|_| unreachable!());
    assert_eq!(issued.login, "pete.nova");
    assert_eq!(issued.password.len(), 12);

    let stored = repository.credentials.lock().await;
    let credential = stored.get("pete.nova");
    assert!(credential.is_some_and(|credential| credential
        .password_hash
        .starts_with("hashed:")));
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let (service, _) = service();
    assert!(service.register(register_input()).await.is_ok());

    let second = service.register(register_input()).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn unknown_login_fails_with_a_generic_message() {
    let (service, _) = service();
    let outcome = service.login("ghost", "whatever").await;
    assert!(matches!(outcome, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn wrong_password_fails_with_a_generic_message() {
    let (service, _) = service();
    assert!(service.register(register_input()).await.is_ok());

    let outcome = service.login("pete.nova", "wrong-password").await;
    assert!(matches!(outcome, Err(AppError::Unauthorized(_))));
}

#[tokio::test]
async fn first_login_requires_a_password_change_and_later_logins_do_not() {
    let (service, _) = service();
    let issued = service.register(register_input()).await;
    assert!(issued.is_ok());
    let issued = issued.unwrap_or_else(|_| unreachable!());

    let first = service.login(&issued.login, &issued.password).await;
    assert!(first.is_ok_and(|outcome| outcome.must_change_password));

    let second = service.login(&issued.login, &issued.password).await;
    assert!(second.is_ok_and(|outcome| !outcome.must_change_password));
}
