//! PostgreSQL-backed club-type lookup repository.

use async_trait::async_trait;
use sqlx::PgPool;

use registar_application::{ClubTypeRecord, ClubTypeRepository};
use registar_core::{AppError, AppResult};

/// PostgreSQL implementation of the club-type repository port.
#[derive(Clone)]
pub struct PostgresClubTypeRepository {
    pool: PgPool,
}

impl PostgresClubTypeRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClubTypeRow {
    id: i32,
    label: String,
    short_label: String,
}

impl From<ClubTypeRow> for ClubTypeRecord {
    fn from(row: ClubTypeRow) -> Self {
        Self {
            id: row.id,
            label: row.label,
            short_label: row.short_label,
        }
    }
}

#[async_trait]
impl ClubTypeRepository for PostgresClubTypeRepository {
    async fn list(&self) -> AppResult<Vec<ClubTypeRecord>> {
        let rows = sqlx::query_as::<_, ClubTypeRow>(
            "SELECT id, label, short_label FROM club_type ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list club types: {error}")))?;

        Ok(rows.into_iter().map(ClubTypeRecord::from).collect())
    }

    async fn create(&self, label: &str, short_label: &str) -> AppResult<i32> {
        sqlx::query_scalar::<_, i32>(
            "INSERT INTO club_type (label, short_label) VALUES ($1, $2) RETURNING id",
        )
        .bind(label)
        .bind(short_label)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create club type: {error}")))
    }

    async fn delete(&self, id: i32) -> AppResult<()> {
        let deleted = sqlx::query_scalar::<_, i32>(
            "DELETE FROM club_type WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to delete club type {id}: {error}"))
        })?;

        if deleted.is_none() {
            return Err(AppError::NotFound(format!("club type {id} does not exist")));
        }

        Ok(())
    }
}
