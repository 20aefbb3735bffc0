//! PostgreSQL-backed person repository.
//!
//! Contacts are aggregated into each person row with a grouped JSON_AGG,
//! never with per-person follow-up queries. Writes that touch both the
//! person and its contact rows run inside one transaction.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use registar_application::{
    ClubRef, ContactRecord, CreatePersonInput, NewContact, PersonRecord, PersonRepository,
    UpdatePersonFields,
};
use registar_core::{AppError, AppResult};
use registar_domain::{ClubId, PersonId};

use crate::update_fields::{SqlParam, UpdateFieldSet};

/// PostgreSQL implementation of the person repository port.
#[derive(Clone)]
pub struct PostgresPersonRepository {
    pool: PgPool,
}

impl PostgresPersonRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PersonRow {
    id: i32,
    first_name: String,
    last_name: String,
    birth_date: NaiveDate,
    gender: String,
    club_id: Option<i32>,
    club_name: Option<String>,
    contacts: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct ContactJson {
    id: i32,
    contact_type: String,
    contact_value: String,
}

fn person_record_from_row(row: PersonRow) -> AppResult<PersonRecord> {
    let contacts: Vec<ContactJson> = serde_json::from_value(row.contacts).map_err(|error| {
        AppError::Internal(format!(
            "failed to decode aggregated contacts for person {}: {error}",
            row.id
        ))
    })?;

    let contacts = contacts
        .into_iter()
        .map(|contact| {
            Ok(ContactRecord {
                id: contact.id,
                contact_type: contact.contact_type.parse()?,
                contact_value: contact.contact_value,
            })
        })
        .collect::<AppResult<Vec<ContactRecord>>>()?;

    let club = match (row.club_id, row.club_name) {
        (Some(id), Some(name)) => Some(ClubRef {
            id: ClubId::from_i32(id),
            name,
        }),
        _ => None,
    };

    Ok(PersonRecord {
        id: PersonId::from_i32(row.id),
        first_name: row.first_name,
        last_name: row.last_name,
        birth_date: row.birth_date,
        gender: row.gender.parse()?,
        club,
        contacts,
    })
}

const PERSON_SELECT: &str = r#"
SELECT p.id, p.first_name, p.last_name, p.birth_date, p.gender,
       c.id AS club_id, c.name AS club_name,
       COALESCE(
           JSON_AGG(
               JSON_BUILD_OBJECT(
                   'id', pc.id,
                   'contact_type', pc.contact_type,
                   'contact_value', pc.contact_value
               )
               ORDER BY pc.id
           ) FILTER (WHERE pc.id IS NOT NULL),
           '[]'
       ) AS contacts
FROM person p
LEFT JOIN club c ON p.club_id = c.id
LEFT JOIN person_contact pc ON pc.person_id = p.id
"#;

const PERSON_GROUP_BY: &str =
    " GROUP BY p.id, p.first_name, p.last_name, p.birth_date, p.gender, c.id, c.name";

/// Columns a sparse person update may touch.
const PERSON_UPDATE_COLUMNS: &[&str] =
    &["first_name", "last_name", "birth_date", "gender", "club_id"];

#[async_trait]
impl PersonRepository for PostgresPersonRepository {
    async fn list(&self, order_by: &'static str) -> AppResult<Vec<PersonRecord>> {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(PERSON_SELECT);
        builder.push(PERSON_GROUP_BY);
        builder.push(" ORDER BY ");
        builder.push(order_by);

        let rows = builder
            .build_query_as::<PersonRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list persons: {error}")))?;

        rows.into_iter().map(person_record_from_row).collect()
    }

    async fn list_without_club(&self) -> AppResult<Vec<PersonRecord>> {
        let statement =
            format!("{PERSON_SELECT} WHERE p.club_id IS NULL {PERSON_GROUP_BY} ORDER BY p.last_name");
        let rows = sqlx::query_as::<_, PersonRow>(statement.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list persons without a club: {error}"))
            })?;

        rows.into_iter().map(person_record_from_row).collect()
    }

    async fn find_by_id(&self, id: PersonId) -> AppResult<Option<PersonRecord>> {
        let statement = format!("{PERSON_SELECT} WHERE p.id = $1 {PERSON_GROUP_BY}");
        let row = sqlx::query_as::<_, PersonRow>(statement.as_str())
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to load person {id}: {error}"))
            })?;

        row.map(person_record_from_row).transpose()
    }

    async fn create_many(&self, persons: &[CreatePersonInput]) -> AppResult<Vec<PersonRecord>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start person insert transaction: {error}"))
        })?;

        let mut created = Vec::with_capacity(persons.len());
        for person in persons {
            let id = sqlx::query_scalar::<_, i32>(
                r#"
                INSERT INTO person (first_name, last_name, birth_date, gender, club_id)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id
                "#,
            )
            .bind(person.first_name.as_str())
            .bind(person.last_name.as_str())
            .bind(person.birth_date)
            .bind(person.gender.as_str())
            .bind(person.club_id.map(|club| club.as_i32()))
            .fetch_one(&mut *transaction)
            .await
            .map_err(|error| person_write_error(error, "create person"))?;

            insert_contacts(&mut transaction, id, &person.contacts).await?;
            created.push(id);
        }

        // Read the finished rows back on the same connection so the result
        // carries generated contact ids and the joined club name.
        let mut records = Vec::with_capacity(created.len());
        let statement = format!("{PERSON_SELECT} WHERE p.id = $1 {PERSON_GROUP_BY}");
        for id in created {
            let row = sqlx::query_as::<_, PersonRow>(statement.as_str())
                .bind(id)
                .fetch_one(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!(
                        "failed to read back created person {id}: {error}"
                    ))
                })?;
            records.push(person_record_from_row(row)?);
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit person insert transaction: {error}"))
        })?;

        Ok(records)
    }

    async fn update(
        &self,
        id: PersonId,
        fields: UpdatePersonFields,
        contacts: Option<Vec<NewContact>>,
    ) -> AppResult<()> {
        let mut field_set = UpdateFieldSet::new("person", PERSON_UPDATE_COLUMNS);
        if let Some(first_name) = fields.first_name {
            field_set.set("first_name", SqlParam::Text(first_name))?;
        }
        if let Some(last_name) = fields.last_name {
            field_set.set("last_name", SqlParam::Text(last_name))?;
        }
        if let Some(birth_date) = fields.birth_date {
            field_set.set("birth_date", SqlParam::Date(birth_date))?;
        }
        if let Some(gender) = fields.gender {
            field_set.set("gender", SqlParam::Text(gender.as_str().to_owned()))?;
        }
        if let Some(club_id) = fields.club_id {
            field_set.set(
                "club_id",
                SqlParam::NullableInt(club_id.map(|club| club.as_i32())),
            )?;
        }

        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start person update transaction: {error}"))
        })?;

        let updated = if field_set.is_empty() {
            // Contact-only update: just pin down that the person exists.
            sqlx::query_scalar::<_, i32>("SELECT id FROM person WHERE id = $1")
                .bind(id.as_i32())
                .fetch_optional(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to check person {id}: {error}"))
                })?
        } else {
            let mut builder = field_set.into_update_query(id.as_i32())?;
            builder
                .build_query_scalar::<i32>()
                .fetch_optional(&mut *transaction)
                .await
                .map_err(|error| person_write_error(error, "update person"))?
        };

        if updated.is_none() {
            return Err(AppError::NotFound(format!("person {id} does not exist")));
        }

        if let Some(contacts) = contacts {
            sqlx::query("DELETE FROM person_contact WHERE person_id = $1")
                .bind(id.as_i32())
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!(
                        "failed to clear contacts of person {id}: {error}"
                    ))
                })?;

            insert_contacts(&mut transaction, id.as_i32(), &contacts).await?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit person update transaction: {error}"))
        })?;

        Ok(())
    }

    async fn delete(&self, id: PersonId) -> AppResult<()> {
        // Contact rows go with the person through ON DELETE CASCADE.
        let deleted =
            sqlx::query_scalar::<_, i32>("DELETE FROM person WHERE id = $1 RETURNING id")
                .bind(id.as_i32())
                .fetch_optional(&self.pool)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to delete person {id}: {error}"))
                })?;

        if deleted.is_none() {
            return Err(AppError::NotFound(format!("person {id} does not exist")));
        }

        Ok(())
    }
}

async fn insert_contacts(
    transaction: &mut sqlx::Transaction<'_, Postgres>,
    person_id: i32,
    contacts: &[NewContact],
) -> AppResult<()> {
    for contact in contacts {
        sqlx::query(
            r#"
            INSERT INTO person_contact (person_id, contact_type, contact_value)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(person_id)
        .bind(contact.contact_type.as_str())
        .bind(contact.contact_value.as_str())
        .execute(&mut **transaction)
        .await
        .map_err(|error| person_write_error(error, "insert person contact"))?;
    }

    Ok(())
}

fn person_write_error(error: sqlx::Error, operation: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error {
        match database_error.code().as_deref() {
            Some("23505") => {
                return AppError::Conflict(
                    "this person already has an identical contact".to_owned(),
                );
            }
            Some("23503") => {
                return AppError::Validation(
                    "person references a nonexistent club".to_owned(),
                );
            }
            _ => {}
        }
    }

    AppError::Internal(format!("failed to {operation}: {error}"))
}

#[cfg(test)]
mod tests;
