//! Request and response types of the HTTP surface.

mod auth;
mod club;
mod common;
mod competition;
mod league;
mod person;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserIdentityResponse};
pub use club::{
    ChairmanResponse, ClubResponse, ClubTypeRequest, ClubTypeResponse, CreateClubRequest,
    UpdateClubRequest,
};
pub use common::{CreatedResourceResponse, ListQuery, SingleOrMany};
pub use competition::{
    CompetitionResponse, CreateCompetitionRequest, LocationRequest, LocationResponse,
    SearchCompetitionRequest, UpdateCompetitionRequest,
};
pub use league::{LeagueRequest, LeagueResponse};
pub use person::{
    ContactRequest, ContactResponse, CreatePersonRequest, PersonResponse, UpdatePersonRequest,
};
