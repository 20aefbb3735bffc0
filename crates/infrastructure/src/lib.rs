//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod console_email_service;
mod postgres_auth_repository;
mod postgres_club_repository;
mod postgres_club_type_repository;
mod postgres_competition_repository;
mod postgres_league_repository;
mod postgres_person_repository;
mod smtp_email_service;
mod update_fields;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use console_email_service::ConsoleEmailService;
pub use postgres_auth_repository::PostgresAuthRepository;
pub use postgres_club_repository::PostgresClubRepository;
pub use postgres_club_type_repository::PostgresClubTypeRepository;
pub use postgres_competition_repository::PostgresCompetitionRepository;
pub use postgres_league_repository::PostgresLeagueRepository;
pub use postgres_person_repository::PostgresPersonRepository;
pub use smtp_email_service::{SmtpEmailConfig, SmtpEmailService};
