use std::sync::Arc;

use registar_application::{
    AuthService, ClubService, ClubTypeService, CompetitionService, EmailService, LeagueService,
    PersonService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub club_service: ClubService,
    pub club_type_service: ClubTypeService,
    pub person_service: PersonService,
    pub competition_service: CompetitionService,
    pub league_service: LeagueService,
    pub auth_service: AuthService,
    pub email_service: Arc<dyn EmailService>,
}
