use registar_application::LeagueRecord;
use serde::{Deserialize, Serialize};

/// Create or rename payload for a league.
#[derive(Debug, Deserialize)]
pub struct LeagueRequest {
    pub name: String,
}

/// League row as served to clients.
#[derive(Debug, Serialize)]
pub struct LeagueResponse {
    pub id: i32,
    pub name: String,
}

impl From<LeagueRecord> for LeagueResponse {
    fn from(record: LeagueRecord) -> Self {
        Self {
            id: record.id.as_i32(),
            name: record.name,
        }
    }
}
