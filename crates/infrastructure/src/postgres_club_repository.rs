//! PostgreSQL-backed club repository.
//!
//! Club writes are transactional: creating or re-assigning a chairman also
//! updates the person's club membership on the same connection, and a bulk
//! insert either persists every row or none.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use registar_application::{
    ChairmanRecord, ClubRecord, ClubRepository, CreateClubInput, UpdateClubFields,
};
use registar_core::{AppError, AppResult};
use registar_domain::{ClubId, PersonId};

use crate::update_fields::{SqlParam, UpdateFieldSet};

/// PostgreSQL implementation of the club repository port.
#[derive(Clone)]
pub struct PostgresClubRepository {
    pool: PgPool,
}

impl PostgresClubRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ClubRow {
    id: i32,
    name: String,
    city_id: i32,
    city: String,
    street: String,
    postal: String,
    ico: String,
    email: Option<String>,
    phone: Option<String>,
    chairman_id: Option<i32>,
    chairman_first_name: Option<String>,
    chairman_last_name: Option<String>,
}

impl From<ClubRow> for ClubRecord {
    fn from(row: ClubRow) -> Self {
        let chairman = match (
            row.chairman_id,
            row.chairman_first_name,
            row.chairman_last_name,
        ) {
            (Some(id), Some(first_name), Some(last_name)) => Some(ChairmanRecord {
                id: PersonId::from_i32(id),
                first_name,
                last_name,
            }),
            _ => None,
        };

        Self {
            id: ClubId::from_i32(row.id),
            name: row.name,
            city_id: row.city_id,
            city: row.city,
            street: row.street,
            postal: row.postal,
            ico: row.ico,
            email: row.email,
            phone: row.phone,
            chairman,
        }
    }
}

const CLUB_SELECT: &str = r#"
SELECT club.id, club.name, city.id AS city_id, city.name AS city,
       club.street, club.postal, club.ico, club.email, club.phone,
       person.id AS chairman_id,
       person.first_name AS chairman_first_name,
       person.last_name AS chairman_last_name
FROM club
LEFT JOIN person ON club.chairman_id = person.id
LEFT JOIN city ON club.city_id = city.id
"#;

/// Columns a sparse club update may touch.
const CLUB_UPDATE_COLUMNS: &[&str] = &[
    "name", "city_id", "street", "postal", "ico", "email", "phone", "chairman_id",
];

#[async_trait]
impl ClubRepository for PostgresClubRepository {
    async fn list(&self, order_by: &'static str) -> AppResult<Vec<ClubRecord>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(CLUB_SELECT);
        builder.push(" ORDER BY ");
        builder.push(order_by);

        let rows = builder
            .build_query_as::<ClubRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list clubs: {error}")))?;

        Ok(rows.into_iter().map(ClubRecord::from).collect())
    }

    async fn find_by_id(&self, id: ClubId) -> AppResult<Option<ClubRecord>> {
        let statement = format!("{CLUB_SELECT} WHERE club.id = $1");
        let row = sqlx::query_as::<_, ClubRow>(statement.as_str())
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to load club {id}: {error}"))
            })?;

        Ok(row.map(ClubRecord::from))
    }

    async fn create_many(&self, clubs: &[CreateClubInput]) -> AppResult<Vec<ClubId>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start club insert transaction: {error}"))
        })?;

        let mut ids = Vec::with_capacity(clubs.len());
        for club in clubs {
            let id = sqlx::query_scalar::<_, i32>(
                r#"
                INSERT INTO club (name, city_id, street, postal, ico, email, phone, chairman_id)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id
                "#,
            )
            .bind(club.name.as_str())
            .bind(club.city_id)
            .bind(club.street.as_str())
            .bind(club.postal.as_str())
            .bind(club.ico.as_str())
            .bind(club.email.as_deref())
            .bind(club.phone.as_deref())
            .bind(club.chairman_id.map(|chairman| chairman.as_i32()))
            .fetch_one(&mut *transaction)
            .await
            .map_err(|error| club_write_error(error, "create club"))?;

            let id = ClubId::from_i32(id);
            if let Some(chairman_id) = club.chairman_id {
                assign_chairman(&mut transaction, id, chairman_id).await?;
            }

            ids.push(id);
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit club insert transaction: {error}"))
        })?;

        Ok(ids)
    }

    async fn update(&self, id: ClubId, fields: UpdateClubFields) -> AppResult<()> {
        let chairman_id = fields.chairman_id;

        let mut field_set = UpdateFieldSet::new("club", CLUB_UPDATE_COLUMNS);
        if let Some(name) = fields.name {
            field_set.set("name", SqlParam::Text(name))?;
        }
        if let Some(city_id) = fields.city_id {
            field_set.set("city_id", SqlParam::Int(city_id))?;
        }
        if let Some(street) = fields.street {
            field_set.set("street", SqlParam::Text(street))?;
        }
        if let Some(postal) = fields.postal {
            field_set.set("postal", SqlParam::Text(postal))?;
        }
        if let Some(ico) = fields.ico {
            field_set.set("ico", SqlParam::Text(ico))?;
        }
        if let Some(email) = fields.email {
            field_set.set("email", SqlParam::Text(email))?;
        }
        if let Some(phone) = fields.phone {
            field_set.set("phone", SqlParam::Text(phone))?;
        }
        if let Some(chairman) = chairman_id {
            field_set.set("chairman_id", SqlParam::Int(chairman.as_i32()))?;
        }

        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start club update transaction: {error}"))
        })?;

        let mut builder = field_set.into_update_query(id.as_i32())?;
        let updated = builder
            .build_query_scalar::<i32>()
            .fetch_optional(&mut *transaction)
            .await
            .map_err(|error| club_write_error(error, "update club"))?;

        if updated.is_none() {
            // Dropping the transaction rolls back and releases the connection.
            return Err(AppError::NotFound(format!("club {id} does not exist")));
        }

        if let Some(chairman) = chairman_id {
            assign_chairman(&mut transaction, id, chairman).await?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit club update transaction: {error}"))
        })?;

        Ok(())
    }

    async fn delete(&self, id: ClubId) -> AppResult<()> {
        let deleted = sqlx::query_scalar::<_, i32>("DELETE FROM club WHERE id = $1 RETURNING id")
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                if is_foreign_key_violation(&error) {
                    return AppError::Conflict(format!(
                        "club {id} is still referenced by competition locations"
                    ));
                }
                AppError::Internal(format!("failed to delete club {id}: {error}"))
            })?;

        if deleted.is_none() {
            return Err(AppError::NotFound(format!("club {id} does not exist")));
        }

        Ok(())
    }
}

/// Mirrors a chairman assignment onto the person's club membership.
async fn assign_chairman(
    transaction: &mut Transaction<'_, Postgres>,
    club_id: ClubId,
    person_id: PersonId,
) -> AppResult<()> {
    let updated = sqlx::query("UPDATE person SET club_id = $1 WHERE id = $2")
        .bind(club_id.as_i32())
        .bind(person_id.as_i32())
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to assign chairman {person_id} to club {club_id}: {error}"
            ))
        })?;

    if updated.rows_affected() == 0 {
        return Err(AppError::Validation(format!(
            "chairman {person_id} does not exist"
        )));
    }

    Ok(())
}

fn club_write_error(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error {
        match database_error.code().as_deref() {
            Some("23505") => {
                return AppError::Conflict(
                    "a club with this ico is already registered".to_owned(),
                );
            }
            Some("23503") => {
                return AppError::Validation(
                    "club references a nonexistent city or person".to_owned(),
                );
            }
            _ => {}
        }
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(database_error) = error {
        return database_error.code().as_deref() == Some("23503");
    }

    false
}

#[cfg(test)]
mod tests;
