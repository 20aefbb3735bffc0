use registar_application::{ClubRecord, ClubTypeRecord, CreateClubInput, UpdateClubFields};
use registar_domain::PersonId;
use serde::{Deserialize, Serialize};

use super::common::normalize_reference;

/// Create-club payload.
#[derive(Debug, Deserialize)]
pub struct CreateClubRequest {
    pub name: String,
    pub city_id: i32,
    pub street: String,
    pub postal: String,
    pub ico: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Chairman person id; 0 means none.
    #[serde(default)]
    pub chairman_id: Option<i32>,
}

impl From<CreateClubRequest> for CreateClubInput {
    fn from(request: CreateClubRequest) -> Self {
        Self {
            name: request.name,
            city_id: request.city_id,
            street: request.street,
            postal: request.postal,
            ico: request.ico,
            email: request.email,
            phone: request.phone,
            chairman_id: normalize_reference(request.chairman_id).map(PersonId::from_i32),
        }
    }
}

/// Sparse update-club payload.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateClubRequest {
    pub name: Option<String>,
    pub city_id: Option<i32>,
    pub street: Option<String>,
    pub postal: Option<String>,
    pub ico: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub chairman_id: Option<i32>,
}

impl From<UpdateClubRequest> for UpdateClubFields {
    fn from(request: UpdateClubRequest) -> Self {
        Self {
            name: request.name,
            city_id: request.city_id,
            street: request.street,
            postal: request.postal,
            ico: request.ico,
            email: request.email,
            phone: request.phone,
            chairman_id: normalize_reference(request.chairman_id).map(PersonId::from_i32),
        }
    }
}

/// Chairman part of a club response.
#[derive(Debug, Serialize)]
pub struct ChairmanResponse {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

/// Club row as served to clients.
#[derive(Debug, Serialize)]
pub struct ClubResponse {
    pub id: i32,
    pub name: String,
    pub city_id: i32,
    pub city: String,
    pub street: String,
    pub postal: String,
    pub ico: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub chairman: ChairmanResponse,
}

impl From<ClubRecord> for ClubResponse {
    fn from(record: ClubRecord) -> Self {
        // A club without a chairman reports an explicit placeholder so
        // consumers never deal with a null chairman.
        let chairman = record.chairman.map_or_else(
            || ChairmanResponse {
                id: 0,
                first_name: "Štatutár".to_owned(),
                last_name: "Nepriradený".to_owned(),
            },
            |chairman| ChairmanResponse {
                id: chairman.id.as_i32(),
                first_name: chairman.first_name,
                last_name: chairman.last_name,
            },
        );

        Self {
            id: record.id.as_i32(),
            name: record.name,
            city_id: record.city_id,
            city: record.city,
            street: record.street,
            postal: record.postal,
            ico: record.ico,
            email: record.email,
            phone: record.phone,
            chairman,
        }
    }
}

/// Create-club-type payload.
#[derive(Debug, Deserialize)]
pub struct ClubTypeRequest {
    pub label: String,
    pub short_label: String,
}

/// Club-type row as served to clients.
#[derive(Debug, Serialize)]
pub struct ClubTypeResponse {
    pub id: i32,
    pub label: String,
    pub short_label: String,
}

impl From<ClubTypeRecord> for ClubTypeResponse {
    fn from(record: ClubTypeRecord) -> Self {
        Self {
            id: record.id,
            label: record.label,
            short_label: record.short_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use registar_application::CreateClubInput;

    use super::CreateClubRequest;

    #[test]
    fn zero_chairman_is_normalized_to_none() {
        let parsed: Result<CreateClubRequest, _> = serde_json::from_str(
            r#"{"name": "TJ Sokol", "city_id": 5, "street": "Hlavná 1",
                "postal": "01001", "ico": "12345678", "chairman_id": 0}"#,
        );
        assert!(parsed.is_ok());
        let input = parsed.map(CreateClubInput::from);
        assert!(input.is_ok_and(|input| input.chairman_id.is_none()));
    }
}
