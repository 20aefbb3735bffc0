//! PostgreSQL-backed credential repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use registar_application::{AuthRepository, CredentialRecord};
use registar_core::{AppError, AppResult};
use registar_domain::PersonId;

/// PostgreSQL implementation of the credential repository port.
#[derive(Clone)]
pub struct PostgresAuthRepository {
    pool: PgPool,
}

impl PostgresAuthRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CredentialRow {
    id: i32,
    person_id: i32,
    login: String,
    password: String,
    created_at: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

impl From<CredentialRow> for CredentialRecord {
    fn from(row: CredentialRow) -> Self {
        Self {
            id: row.id,
            person_id: PersonId::from_i32(row.person_id),
            login: row.login,
            password_hash: row.password,
            created_at: row.created_at,
            last_login: row.last_login,
        }
    }
}

#[async_trait]
impl AuthRepository for PostgresAuthRepository {
    async fn find_by_login(&self, login: &str) -> AppResult<Option<CredentialRecord>> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT id, person_id, login, password, created_at, last_login
            FROM auth
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to look up credential '{login}': {error}"))
        })?;

        Ok(row.map(CredentialRecord::from))
    }

    async fn create(
        &self,
        person_id: PersonId,
        login: &str,
        password_hash: &str,
    ) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO auth (person_id, login, password, created_at)
            VALUES ($1, $2, $3, now())
            RETURNING id
            "#,
        )
        .bind(person_id.as_i32())
        .bind(login)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(credential_write_error)
    }

    async fn record_login(&self, id: i32) -> AppResult<()> {
        sqlx::query("UPDATE auth SET last_login = now() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to stamp last login: {error}"))
            })?;

        Ok(())
    }
}

fn credential_write_error(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error {
        match database_error.code().as_deref() {
            Some("23505") => {
                return AppError::Conflict(
                    "credentials already exist for this login or person".to_owned(),
                );
            }
            Some("23503") => {
                return AppError::Validation(
                    "credential references a nonexistent person".to_owned(),
                );
            }
            _ => {}
        }
    }

    AppError::Internal(format!("failed to create credential: {error}"))
}
