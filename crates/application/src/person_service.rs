//! Person ports and application service.
//!
//! A person owns its contact rows: they are created together with the
//! person, replaced wholesale on update, and removed by cascade on delete.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use registar_core::{AppError, AppResult};
use registar_domain::{ClubId, ContactType, Gender, PersonId};

use crate::bulk::bulk_element_error;
use crate::sort::SortAllowlist;

/// Club summary joined onto a person row.
#[derive(Debug, Clone)]
pub struct ClubRef {
    /// Club identifier.
    pub id: ClubId,
    /// Club name.
    pub name: String,
}

/// Stored contact entry of a person.
#[derive(Debug, Clone)]
pub struct ContactRecord {
    /// Contact row identifier.
    pub id: i32,
    /// Contact channel.
    pub contact_type: ContactType,
    /// Address or number.
    pub contact_value: String,
}

/// Person row returned by repository queries, with club and contacts
/// aggregated in.
#[derive(Debug, Clone)]
pub struct PersonRecord {
    /// Person identifier.
    pub id: PersonId,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Registered gender.
    pub gender: Gender,
    /// Club membership, when assigned.
    pub club: Option<ClubRef>,
    /// Contact entries in insertion order.
    pub contacts: Vec<ContactRecord>,
}

/// Contact entry supplied on create or contact replacement.
#[derive(Debug, Clone)]
pub struct NewContact {
    /// Contact channel.
    pub contact_type: ContactType,
    /// Address or number.
    pub contact_value: String,
}

impl NewContact {
    fn validate(&self) -> AppResult<()> {
        if self.contact_value.trim().is_empty() {
            return Err(AppError::Validation(
                "contact value must not be empty".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Payload for creating one person with their contacts.
#[derive(Debug, Clone)]
pub struct CreatePersonInput {
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Date of birth.
    pub birth_date: NaiveDate,
    /// Registered gender.
    pub gender: Gender,
    /// Club membership, when known.
    pub club_id: Option<ClubId>,
    /// Contact entries; at least one is required.
    pub contacts: Vec<NewContact>,
}

impl CreatePersonInput {
    /// Checks the payload before any store access.
    pub fn validate(&self) -> AppResult<()> {
        if self.first_name.trim().is_empty() {
            return Err(AppError::Validation(
                "first name must not be empty".to_owned(),
            ));
        }

        if self.last_name.trim().is_empty() {
            return Err(AppError::Validation(
                "last name must not be empty".to_owned(),
            ));
        }

        if let Some(club_id) = self.club_id
            && club_id.as_i32() < 1
        {
            return Err(AppError::Validation(
                "club_id must be a positive id".to_owned(),
            ));
        }

        if self.contacts.is_empty() {
            return Err(AppError::Validation(
                "a person needs at least one contact".to_owned(),
            ));
        }

        for contact in &self.contacts {
            contact.validate()?;
        }

        Ok(())
    }
}

/// Sparse set of person columns to update.
///
/// `club_id` distinguishes "leave untouched" (`None`) from "clear the
/// membership" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct UpdatePersonFields {
    /// New first name.
    pub first_name: Option<String>,
    /// New last name.
    pub last_name: Option<String>,
    /// New date of birth.
    pub birth_date: Option<NaiveDate>,
    /// New gender.
    pub gender: Option<Gender>,
    /// New club membership; `Some(None)` clears it.
    pub club_id: Option<Option<ClubId>>,
}

impl UpdatePersonFields {
    /// Returns whether no column was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.birth_date.is_none()
            && self.gender.is_none()
            && self.club_id.is_none()
    }

    fn validate(&self) -> AppResult<()> {
        if let Some(first_name) = &self.first_name
            && first_name.trim().is_empty()
        {
            return Err(AppError::Validation(
                "first name must not be empty".to_owned(),
            ));
        }

        if let Some(last_name) = &self.last_name
            && last_name.trim().is_empty()
        {
            return Err(AppError::Validation(
                "last name must not be empty".to_owned(),
            ));
        }

        if let Some(Some(club_id)) = self.club_id
            && club_id.as_i32() < 1
        {
            return Err(AppError::Validation(
                "club_id must be a positive id".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Repository port for person persistence.
#[async_trait]
pub trait PersonRepository: Send + Sync {
    /// Lists persons ordered by an allowlisted column, contacts aggregated
    /// per person in one grouped query.
    async fn list(&self, order_by: &'static str) -> AppResult<Vec<PersonRecord>>;

    /// Lists persons without a club membership.
    async fn list_without_club(&self) -> AppResult<Vec<PersonRecord>>;

    /// Finds one person; `None` when the row is absent.
    async fn find_by_id(&self, id: PersonId) -> AppResult<Option<PersonRecord>>;

    /// Inserts all persons and their contacts atomically, returning the
    /// created records in input order.
    async fn create_many(&self, persons: &[CreatePersonInput]) -> AppResult<Vec<PersonRecord>>;

    /// Applies a sparse column update; when `contacts` is supplied the
    /// person's contact rows are replaced wholesale in the same transaction.
    async fn update(
        &self,
        id: PersonId,
        fields: UpdatePersonFields,
        contacts: Option<Vec<NewContact>>,
    ) -> AppResult<()>;

    /// Deletes one person; contact rows are removed by cascade.
    async fn delete(&self, id: PersonId) -> AppResult<()>;
}

/// Sort keys accepted by the person listing.
const PERSON_SORT: SortAllowlist = SortAllowlist::new(
    "person",
    "p.last_name",
    &[
        ("first_name", "p.first_name"),
        ("last_name", "p.last_name"),
        ("birth_date", "p.birth_date"),
        ("gender", "p.gender"),
        ("club_name", "c.name"),
    ],
);

/// Application service for person operations.
#[derive(Clone)]
pub struct PersonService {
    repository: Arc<dyn PersonRepository>,
}

impl PersonService {
    /// Creates a person service from a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn PersonRepository>) -> Self {
        Self { repository }
    }

    /// Lists persons with an optional client sort key.
    pub async fn list(&self, sort_by: Option<&str>) -> AppResult<Vec<PersonRecord>> {
        let order_by = PERSON_SORT.resolve(sort_by)?;
        self.repository.list(order_by).await
    }

    /// Lists persons that are not assigned to any club.
    pub async fn list_without_club(&self) -> AppResult<Vec<PersonRecord>> {
        self.repository.list_without_club().await
    }

    /// Returns one person or a not-found failure.
    pub async fn get(&self, id: PersonId) -> AppResult<PersonRecord> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("person {id} does not exist")))
    }

    /// Creates one or more persons atomically, contacts included.
    pub async fn create_many(
        &self,
        persons: Vec<CreatePersonInput>,
    ) -> AppResult<Vec<PersonRecord>> {
        for (index, person) in persons.iter().enumerate() {
            person
                .validate()
                .map_err(|error| bulk_element_error(index, "person", error))?;
        }

        if persons.is_empty() {
            return Ok(Vec::new());
        }

        self.repository.create_many(&persons).await
    }

    /// Applies a sparse update and returns the fresh record.
    ///
    /// Supplying `contacts` replaces the person's contact rows wholesale;
    /// an update that carries neither columns nor contacts is rejected.
    pub async fn update(
        &self,
        id: PersonId,
        fields: UpdatePersonFields,
        contacts: Option<Vec<NewContact>>,
    ) -> AppResult<PersonRecord> {
        if fields.is_empty() && contacts.is_none() {
            return Err(AppError::Validation("no fields to update".to_owned()));
        }

        fields.validate()?;

        if let Some(contacts) = &contacts {
            if contacts.is_empty() {
                return Err(AppError::Validation(
                    "contact replacement needs at least one contact".to_owned(),
                ));
            }

            for contact in contacts {
                contact.validate()?;
            }
        }

        self.repository.update(id, fields, contacts).await?;
        self.get(id).await
    }

    /// Deletes one person together with their contacts.
    pub async fn delete(&self, id: PersonId) -> AppResult<()> {
        self.repository.delete(id).await
    }
}
