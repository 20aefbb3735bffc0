use chrono::NaiveDate;
use registar_application::{
    CreatePersonInput, NewContact, PersonRecord, UpdatePersonFields,
};
use registar_domain::{ClubId, ContactType, Gender};
use serde::{Deserialize, Serialize};

use super::common::normalize_reference;

/// Contact entry of a create or update payload.
#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    pub contact_type: ContactType,
    pub contact_value: String,
}

impl From<ContactRequest> for NewContact {
    fn from(request: ContactRequest) -> Self {
        Self {
            contact_type: request.contact_type,
            contact_value: request.contact_value,
        }
    }
}

/// Create-person payload.
#[derive(Debug, Deserialize)]
pub struct CreatePersonRequest {
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    /// Club membership; 0 means none.
    #[serde(default)]
    pub club_id: Option<i32>,
    #[serde(default)]
    pub contacts: Vec<ContactRequest>,
}

impl From<CreatePersonRequest> for CreatePersonInput {
    fn from(request: CreatePersonRequest) -> Self {
        Self {
            first_name: request.first_name,
            last_name: request.last_name,
            birth_date: request.birth_date,
            gender: request.gender,
            club_id: normalize_reference(request.club_id).map(ClubId::from_i32),
            contacts: request.contacts.into_iter().map(NewContact::from).collect(),
        }
    }
}

/// Sparse update-person payload.
///
/// A present `contacts` array replaces the person's contacts wholesale.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePersonRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub gender: Option<Gender>,
    /// Club membership; 0 clears it.
    pub club_id: Option<i32>,
    pub contacts: Option<Vec<ContactRequest>>,
}

impl UpdatePersonRequest {
    /// Splits the payload into sparse columns and the contact replacement.
    pub fn into_parts(self) -> (UpdatePersonFields, Option<Vec<NewContact>>) {
        let fields = UpdatePersonFields {
            first_name: self.first_name,
            last_name: self.last_name,
            birth_date: self.birth_date,
            gender: self.gender,
            club_id: self
                .club_id
                .map(|club_id| normalize_reference(Some(club_id)).map(ClubId::from_i32)),
        };

        let contacts = self
            .contacts
            .map(|contacts| contacts.into_iter().map(NewContact::from).collect());

        (fields, contacts)
    }
}

/// Contact entry as served to clients.
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: i32,
    pub contact_type: ContactType,
    pub contact_value: String,
}

/// Person row as served to clients.
#[derive(Debug, Serialize)]
pub struct PersonResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    pub club_id: Option<i32>,
    pub club_name: Option<String>,
    pub contacts: Vec<ContactResponse>,
}

impl From<PersonRecord> for PersonResponse {
    fn from(record: PersonRecord) -> Self {
        let (club_id, club_name) = match record.club {
            Some(club) => (Some(club.id.as_i32()), Some(club.name)),
            None => (None, None),
        };

        Self {
            id: record.id.as_i32(),
            first_name: record.first_name,
            last_name: record.last_name,
            birth_date: record.birth_date,
            gender: record.gender,
            club_id,
            club_name,
            contacts: record
                .contacts
                .into_iter()
                .map(|contact| ContactResponse {
                    id: contact.id,
                    contact_type: contact.contact_type,
                    contact_value: contact.contact_value,
                })
                .collect(),
        }
    }
}
