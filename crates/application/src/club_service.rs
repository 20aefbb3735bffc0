//! Club ports and application service.

use std::sync::Arc;

use async_trait::async_trait;
use registar_core::{AppError, AppResult};
use registar_domain::{ClubId, Ico, PersonId};

use crate::bulk::bulk_element_error;
use crate::sort::SortAllowlist;

/// Chairman summary joined onto a club row.
#[derive(Debug, Clone)]
pub struct ChairmanRecord {
    /// Person acting as the club's statutory representative.
    pub id: PersonId,
    /// Chairman first name.
    pub first_name: String,
    /// Chairman last name.
    pub last_name: String,
}

/// Club row returned by repository queries, with city and chairman joined in.
#[derive(Debug, Clone)]
pub struct ClubRecord {
    /// Club identifier.
    pub id: ClubId,
    /// Club name.
    pub name: String,
    /// City lookup key.
    pub city_id: i32,
    /// City name.
    pub city: String,
    /// Street address.
    pub street: String,
    /// Postal code.
    pub postal: String,
    /// Organization registration number.
    pub ico: String,
    /// Club contact email.
    pub email: Option<String>,
    /// Club contact phone.
    pub phone: Option<String>,
    /// Chairman, when one is assigned.
    pub chairman: Option<ChairmanRecord>,
}

/// Payload for creating one club.
#[derive(Debug, Clone)]
pub struct CreateClubInput {
    /// Club name.
    pub name: String,
    /// City lookup key.
    pub city_id: i32,
    /// Street address.
    pub street: String,
    /// Postal code.
    pub postal: String,
    /// Organization registration number, unique per club.
    pub ico: String,
    /// Club contact email.
    pub email: Option<String>,
    /// Club contact phone.
    pub phone: Option<String>,
    /// Chairman to assign; the person's club membership is updated in the
    /// same transaction.
    pub chairman_id: Option<PersonId>,
}

impl CreateClubInput {
    /// Checks the payload before any store access.
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation(
                "club name must not be empty".to_owned(),
            ));
        }

        if self.city_id < 1 {
            return Err(AppError::Validation(
                "city_id must be a positive id".to_owned(),
            ));
        }

        if self.street.trim().is_empty() {
            return Err(AppError::Validation("street must not be empty".to_owned()));
        }

        if self.postal.trim().is_empty() {
            return Err(AppError::Validation("postal must not be empty".to_owned()));
        }

        Ico::new(self.ico.as_str())?;

        if let Some(chairman_id) = self.chairman_id
            && chairman_id.as_i32() < 1
        {
            return Err(AppError::Validation(
                "chairman_id must be a positive id".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Sparse set of club columns to update.
#[derive(Debug, Clone, Default)]
pub struct UpdateClubFields {
    /// New club name.
    pub name: Option<String>,
    /// New city lookup key.
    pub city_id: Option<i32>,
    /// New street address.
    pub street: Option<String>,
    /// New postal code.
    pub postal: Option<String>,
    /// New registration number.
    pub ico: Option<String>,
    /// New contact email.
    pub email: Option<String>,
    /// New contact phone.
    pub phone: Option<String>,
    /// New chairman; the person's club membership is updated in the same
    /// transaction.
    pub chairman_id: Option<PersonId>,
}

impl UpdateClubFields {
    /// Returns whether no column was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.city_id.is_none()
            && self.street.is_none()
            && self.postal.is_none()
            && self.ico.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.chairman_id.is_none()
    }

    fn validate(&self) -> AppResult<()> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(AppError::Validation(
                "club name must not be empty".to_owned(),
            ));
        }

        if let Some(city_id) = self.city_id
            && city_id < 1
        {
            return Err(AppError::Validation(
                "city_id must be a positive id".to_owned(),
            ));
        }

        if let Some(ico) = &self.ico {
            Ico::new(ico.as_str())?;
        }

        if let Some(chairman_id) = self.chairman_id
            && chairman_id.as_i32() < 1
        {
            return Err(AppError::Validation(
                "chairman_id must be a positive id".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Repository port for club persistence.
#[async_trait]
pub trait ClubRepository: Send + Sync {
    /// Lists clubs ordered by an allowlisted column.
    async fn list(&self, order_by: &'static str) -> AppResult<Vec<ClubRecord>>;

    /// Finds one club; `None` when the row is absent.
    async fn find_by_id(&self, id: ClubId) -> AppResult<Option<ClubRecord>>;

    /// Inserts all clubs atomically and returns their ids in input order.
    ///
    /// Chairman back-references are written inside the same transaction.
    async fn create_many(&self, clubs: &[CreateClubInput]) -> AppResult<Vec<ClubId>>;

    /// Applies a sparse column update, keeping the chairman back-reference
    /// consistent in the same transaction.
    async fn update(&self, id: ClubId, fields: UpdateClubFields) -> AppResult<()>;

    /// Deletes one club.
    async fn delete(&self, id: ClubId) -> AppResult<()>;
}

/// Sort keys accepted by the club listing.
const CLUB_SORT: SortAllowlist = SortAllowlist::new(
    "club",
    "club.name",
    &[
        ("id", "club.id"),
        ("name", "club.name"),
        ("city", "city.name"),
        ("ico", "club.ico"),
        ("phone", "club.phone"),
        ("chairman_id", "club.chairman_id"),
    ],
);

/// Application service for club operations.
#[derive(Clone)]
pub struct ClubService {
    repository: Arc<dyn ClubRepository>,
}

impl ClubService {
    /// Creates a club service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn ClubRepository>) -> Self {
        Self { repository }
    }

    /// Lists clubs with an optional client sort key.
    pub async fn list(&self, sort_by: Option<&str>) -> AppResult<Vec<ClubRecord>> {
        let order_by = CLUB_SORT.resolve(sort_by)?;
        self.repository.list(order_by).await
    }

    /// Returns one club or a not-found failure.
    pub async fn get(&self, id: ClubId) -> AppResult<ClubRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("club {id} does not exist")))
    }

    /// Creates one or more clubs atomically.
    ///
    /// Every element is validated before any insert; the first invalid
    /// element aborts the whole batch with its 1-based position.
    pub async fn create_many(&self, clubs: Vec<CreateClubInput>) -> AppResult<Vec<ClubId>> {
        for (index, club) in clubs.iter().enumerate() {
            club.validate()
                .map_err(|error| bulk_element_error(index, "club", error))?;
        }

        if clubs.is_empty() {
            return Ok(Vec::new());
        }

        self.repository.create_many(&clubs).await
    }

    /// Applies a sparse update and returns the fresh record.
    pub async fn update(&self, id: ClubId, fields: UpdateClubFields) -> AppResult<ClubRecord> {
        if fields.is_empty() {
            return Err(AppError::Validation("no fields to update".to_owned()));
        }

        fields.validate()?;
        self.repository.update(id, fields).await?;
        self.get(id).await
    }

    /// Deletes one club.
    pub async fn delete(&self, id: ClubId) -> AppResult<()> {
        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests;
