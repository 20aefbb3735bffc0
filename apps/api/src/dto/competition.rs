use chrono::NaiveDate;
use registar_application::{
    CompetitionRecord, CompetitionSearchInput, CreateCompetitionInput, NewLocation,
    UpdateCompetitionFields,
};
use registar_domain::{ClubId, LeagueId};
use serde::{Deserialize, Serialize};

/// Location entry of a create payload.
#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    #[serde(rename = "group")]
    pub group_label: String,
    /// City the location is in; blank is allowed.
    #[serde(default)]
    pub city: String,
    pub club_id: i32,
}

impl From<LocationRequest> for NewLocation {
    fn from(request: LocationRequest) -> Self {
        Self {
            group_label: request.group_label,
            city: request.city,
            club_id: ClubId::from_i32(request.club_id),
        }
    }
}

/// Create-competition payload; the season year is derived from the date.
#[derive(Debug, Deserialize)]
pub struct CreateCompetitionRequest {
    pub league_id: i32,
    pub round: i32,
    pub date: NaiveDate,
    pub locations: Vec<LocationRequest>,
}

impl From<CreateCompetitionRequest> for CreateCompetitionInput {
    fn from(request: CreateCompetitionRequest) -> Self {
        Self {
            league_id: LeagueId::from_i32(request.league_id),
            round: request.round,
            date: request.date,
            locations: request
                .locations
                .into_iter()
                .map(NewLocation::from)
                .collect(),
        }
    }
}

/// Sparse update-competition payload.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCompetitionRequest {
    pub year: Option<i32>,
    pub league_id: Option<i32>,
    pub round: Option<i32>,
    pub date: Option<NaiveDate>,
}

impl From<UpdateCompetitionRequest> for UpdateCompetitionFields {
    fn from(request: UpdateCompetitionRequest) -> Self {
        Self {
            year: request.year,
            league_id: request.league_id.map(LeagueId::from_i32),
            round: request.round,
            date: request.date,
        }
    }
}

/// Partial-match search payload over the fixed field set.
#[derive(Debug, Default, Deserialize)]
pub struct SearchCompetitionRequest {
    #[serde(rename = "group")]
    pub group_label: Option<String>,
    pub city: Option<String>,
    pub league: Option<String>,
}

impl From<SearchCompetitionRequest> for CompetitionSearchInput {
    fn from(request: SearchCompetitionRequest) -> Self {
        Self {
            group_label: request.group_label,
            city: request.city,
            league: request.league,
        }
    }
}

/// Location as served to clients.
#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub id: i32,
    #[serde(rename = "group")]
    pub group_label: String,
    pub city: String,
    pub club_id: i32,
}

/// Competition with nested locations as served to clients.
#[derive(Debug, Serialize)]
pub struct CompetitionResponse {
    pub id: i32,
    pub year: i32,
    pub round: i32,
    pub date: NaiveDate,
    pub league_id: i32,
    pub league: String,
    pub locations: Vec<LocationResponse>,
}

impl From<CompetitionRecord> for CompetitionResponse {
    fn from(record: CompetitionRecord) -> Self {
        Self {
            id: record.id.as_i32(),
            year: record.year,
            round: record.round,
            date: record.date,
            league_id: record.league_id.as_i32(),
            league: record.league,
            locations: record
                .locations
                .into_iter()
                .map(|location| LocationResponse {
                    id: location.id,
                    group_label: location.group_label,
                    city: location.city,
                    club_id: location.club_id.as_i32(),
                })
                .collect(),
        }
    }
}
