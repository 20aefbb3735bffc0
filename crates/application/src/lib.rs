//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_service;
mod bulk;
mod club_service;
mod club_type_service;
mod competition_service;
mod email;
mod league_service;
mod person_service;
mod sort;

pub use auth_service::{
    AuthRepository, AuthService, CredentialRecord, IssuedCredentials, LoginOutcome, PasswordHasher,
    RegisterInput,
};
pub use club_service::{
    ChairmanRecord, ClubRecord, ClubRepository, ClubService, CreateClubInput, UpdateClubFields,
};
pub use club_type_service::{ClubTypeRecord, ClubTypeRepository, ClubTypeService};
pub use competition_service::{
    CompetitionRecord, CompetitionRepository, CompetitionRow, CompetitionSearchInput,
    CompetitionService, CreateCompetitionInput, LocationRecord, NewLocation,
    UpdateCompetitionFields, group_competition_rows,
};
pub use email::EmailService;
pub use league_service::{LeagueRecord, LeagueRepository, LeagueService};
pub use person_service::{
    ClubRef, ContactRecord, CreatePersonInput, NewContact, PersonRecord, PersonRepository,
    PersonService, UpdatePersonFields,
};
pub use sort::SortAllowlist;
