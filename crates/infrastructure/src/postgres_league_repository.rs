//! PostgreSQL-backed league repository.

use async_trait::async_trait;
use sqlx::PgPool;

use registar_application::{LeagueRecord, LeagueRepository};
use registar_core::{AppError, AppResult};
use registar_domain::LeagueId;

/// PostgreSQL implementation of the league repository port.
#[derive(Clone)]
pub struct PostgresLeagueRepository {
    pool: PgPool,
}

impl PostgresLeagueRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct LeagueRow {
    id: i32,
    name: String,
}

impl From<LeagueRow> for LeagueRecord {
    fn from(row: LeagueRow) -> Self {
        Self {
            id: LeagueId::from_i32(row.id),
            name: row.name,
        }
    }
}

#[async_trait]
impl LeagueRepository for PostgresLeagueRepository {
    async fn list(&self) -> AppResult<Vec<LeagueRecord>> {
        let rows = sqlx::query_as::<_, LeagueRow>("SELECT id, name FROM league ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list leagues: {error}")))?;

        Ok(rows.into_iter().map(LeagueRecord::from).collect())
    }

    async fn create(&self, name: &str) -> AppResult<LeagueId> {
        let id = sqlx::query_scalar::<_, i32>(
            "INSERT INTO league (name) VALUES ($1) RETURNING id",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| league_write_error(error, "create league"))?;

        Ok(LeagueId::from_i32(id))
    }

    async fn rename(&self, id: LeagueId, name: &str) -> AppResult<()> {
        let renamed = sqlx::query("UPDATE league SET name = $1 WHERE id = $2")
            .bind(name)
            .bind(id.as_i32())
            .execute(&self.pool)
            .await
            .map_err(|error| league_write_error(error, "rename league"))?;

        if renamed.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("league {id} does not exist")));
        }

        Ok(())
    }

    async fn delete(&self, id: LeagueId) -> AppResult<()> {
        let deleted = sqlx::query_scalar::<_, i32>(
            "DELETE FROM league WHERE id = $1 RETURNING id",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(ref database_error) = error
                && database_error.code().as_deref() == Some("23503")
            {
                return AppError::Conflict(format!(
                    "league {id} is still referenced by competitions"
                ));
            }
            AppError::Internal(format!("failed to delete league {id}: {error}"))
        })?;

        if deleted.is_none() {
            return Err(AppError::NotFound(format!("league {id} does not exist")));
        }

        Ok(())
    }
}

fn league_write_error(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict("a league with this name already exists".to_owned());
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
