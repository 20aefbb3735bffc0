//! PostgreSQL-backed competition repository.
//!
//! Listing and search return one flat row per competition × location pair;
//! the application layer folds them into nested records. Creation inserts
//! the competition and all its locations in one transaction.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, QueryBuilder};

use registar_application::{
    CompetitionRepository, CompetitionRow, CompetitionSearchInput, CreateCompetitionInput,
    LocationRecord, UpdateCompetitionFields,
};
use registar_core::{AppError, AppResult};
use registar_domain::{ClubId, CompetitionId, LeagueId};

use crate::update_fields::{SqlParam, UpdateFieldSet};

/// PostgreSQL implementation of the competition repository port.
#[derive(Clone)]
pub struct PostgresCompetitionRepository {
    pool: PgPool,
}

impl PostgresCompetitionRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct FlatCompetitionRow {
    id: i32,
    year: i32,
    round: i32,
    date: NaiveDate,
    league_id: i32,
    league: String,
    location_id: Option<i32>,
    group_label: Option<String>,
    location_city: Option<String>,
    location_club_id: Option<i32>,
}

impl From<FlatCompetitionRow> for CompetitionRow {
    fn from(row: FlatCompetitionRow) -> Self {
        let location = match (
            row.location_id,
            row.group_label,
            row.location_city,
            row.location_club_id,
        ) {
            (Some(id), Some(group_label), Some(city), Some(club_id)) => Some(LocationRecord {
                id,
                group_label,
                city,
                club_id: ClubId::from_i32(club_id),
            }),
            _ => None,
        };

        Self {
            id: CompetitionId::from_i32(row.id),
            year: row.year,
            round: row.round,
            date: row.date,
            league_id: LeagueId::from_i32(row.league_id),
            league: row.league,
            location,
        }
    }
}

const COMPETITION_SELECT: &str = r#"
SELECT competition.id, competition.year, competition.round, competition.date,
       league.id AS league_id, league.name AS league,
       loc.id AS location_id, loc.group_label,
       loc.city AS location_city, loc.club_id AS location_club_id
FROM competition
JOIN league ON competition.league_id = league.id
LEFT JOIN competition_location loc ON loc.competition_id = competition.id
"#;

/// Columns a sparse competition update may touch.
const COMPETITION_UPDATE_COLUMNS: &[&str] = &["year", "league_id", "round", "date"];

#[async_trait]
impl CompetitionRepository for PostgresCompetitionRepository {
    async fn list(&self, order_by: &'static str) -> AppResult<Vec<CompetitionRow>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(COMPETITION_SELECT);
        builder.push(" ORDER BY ");
        builder.push(order_by);
        // Stable secondary order keeps location rows adjacent per competition.
        builder.push(", competition.id, loc.id");

        let rows = builder
            .build_query_as::<FlatCompetitionRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list competitions: {error}"))
            })?;

        Ok(rows.into_iter().map(CompetitionRow::from).collect())
    }

    async fn search(&self, search: &CompetitionSearchInput) -> AppResult<Vec<CompetitionRow>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(COMPETITION_SELECT);
        let mut has_condition = false;

        push_ilike(
            &mut builder,
            &mut has_condition,
            "loc.group_label",
            search.group_label.as_deref(),
        );
        push_ilike(
            &mut builder,
            &mut has_condition,
            "loc.city",
            search.city.as_deref(),
        );
        push_ilike(
            &mut builder,
            &mut has_condition,
            "league.name",
            search.league.as_deref(),
        );

        builder.push(" ORDER BY competition.date, competition.id, loc.id");

        let rows = builder
            .build_query_as::<FlatCompetitionRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to search competitions: {error}"))
            })?;

        Ok(rows.into_iter().map(CompetitionRow::from).collect())
    }

    async fn rows_by_id(&self, id: CompetitionId) -> AppResult<Vec<CompetitionRow>> {
        let statement = format!("{COMPETITION_SELECT} WHERE competition.id = $1 ORDER BY loc.id");
        let rows = sqlx::query_as::<_, FlatCompetitionRow>(statement.as_str())
            .bind(id.as_i32())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to load competition {id}: {error}"))
            })?;

        Ok(rows.into_iter().map(CompetitionRow::from).collect())
    }

    async fn create(
        &self,
        input: &CreateCompetitionInput,
        year: i32,
    ) -> AppResult<CompetitionId> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to start competition insert transaction: {error}"
            ))
        })?;

        let id = sqlx::query_scalar::<_, i32>(
            r#"
            INSERT INTO competition (year, league_id, round, date)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(year)
        .bind(input.league_id.as_i32())
        .bind(input.round)
        .bind(input.date)
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| competition_write_error(error, "create competition"))?;

        for location in &input.locations {
            sqlx::query(
                r#"
                INSERT INTO competition_location (competition_id, group_label, city, club_id)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(id)
            .bind(location.group_label.as_str())
            .bind(location.city.as_str())
            .bind(location.club_id.as_i32())
            .execute(&mut *transaction)
            .await
            .map_err(|error| competition_write_error(error, "insert competition location"))?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit competition insert transaction: {error}"
            ))
        })?;

        Ok(CompetitionId::from_i32(id))
    }

    async fn update(&self, id: CompetitionId, fields: UpdateCompetitionFields) -> AppResult<()> {
        let mut field_set = UpdateFieldSet::new("competition", COMPETITION_UPDATE_COLUMNS);
        if let Some(year) = fields.year {
            field_set.set("year", SqlParam::Int(year))?;
        }
        if let Some(league_id) = fields.league_id {
            field_set.set("league_id", SqlParam::Int(league_id.as_i32()))?;
        }
        if let Some(round) = fields.round {
            field_set.set("round", SqlParam::Int(round))?;
        }
        if let Some(date) = fields.date {
            field_set.set("date", SqlParam::Date(date))?;
        }

        let mut builder = field_set.into_update_query(id.as_i32())?;
        let updated = builder
            .build_query_scalar::<i32>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| competition_write_error(error, "update competition"))?;

        if updated.is_none() {
            return Err(AppError::NotFound(format!(
                "competition {id} does not exist"
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: CompetitionId) -> AppResult<()> {
        // Location rows go with the competition through ON DELETE CASCADE.
        let deleted =
            sqlx::query_scalar::<_, i32>("DELETE FROM competition WHERE id = $1 RETURNING id")
                .bind(id.as_i32())
                .fetch_optional(&self.pool)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to delete competition {id}: {error}"))
                })?;

        if deleted.is_none() {
            return Err(AppError::NotFound(format!(
                "competition {id} does not exist"
            )));
        }

        Ok(())
    }
}

/// Appends a case-insensitive substring condition when a value is present.
fn push_ilike(
    builder: &mut QueryBuilder<'_, Postgres>,
    has_condition: &mut bool,
    column: &'static str,
    value: Option<&str>,
) {
    let Some(value) = value else {
        return;
    };

    builder.push(if *has_condition { " AND " } else { " WHERE " });
    builder.push(column);
    builder.push(" ILIKE ");
    builder.push_bind(format!("%{value}%"));
    *has_condition = true;
}

fn competition_write_error(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::Validation(
            "competition references a nonexistent league or club".to_owned(),
        );
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}
