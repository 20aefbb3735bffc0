//! Registar API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod auth;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn;
use axum::routing::{delete, get, post};
use registar_application::{
    AuthService, ClubService, ClubTypeService, CompetitionService, EmailService, LeagueService,
    PersonService,
};
use registar_core::AppError;
use registar_infrastructure::{
    Argon2PasswordHasher, ConsoleEmailService, PostgresAuthRepository, PostgresClubRepository,
    PostgresClubTypeRepository, PostgresCompetitionRepository, PostgresLeagueRepository,
    PostgresPersonRepository, SmtpEmailService,
};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;

use crate::api_config::{ApiConfig, EmailProviderConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let session_store = PostgresStore::new(pool.clone())
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;
    session_store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(30)));

    let email_service: Arc<dyn EmailService> = match &config.email_provider {
        EmailProviderConfig::Console => Arc::new(ConsoleEmailService::new()),
        EmailProviderConfig::Smtp(smtp_config) => {
            Arc::new(SmtpEmailService::new(smtp_config.clone()))
        }
    };

    let app_state = AppState {
        club_service: ClubService::new(Arc::new(PostgresClubRepository::new(pool.clone()))),
        club_type_service: ClubTypeService::new(Arc::new(PostgresClubTypeRepository::new(
            pool.clone(),
        ))),
        person_service: PersonService::new(Arc::new(PostgresPersonRepository::new(pool.clone()))),
        competition_service: CompetitionService::new(Arc::new(
            PostgresCompetitionRepository::new(pool.clone()),
        )),
        league_service: LeagueService::new(Arc::new(PostgresLeagueRepository::new(pool.clone()))),
        auth_service: AuthService::new(
            Arc::new(PostgresAuthRepository::new(pool.clone())),
            Arc::new(Argon2PasswordHasher::new()),
        ),
        email_service,
    };

    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route_layer(from_fn(middleware::require_auth));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(&config.frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/club",
            get(handlers::club::list_clubs_handler).post(handlers::club::create_clubs_handler),
        )
        .route(
            "/api/club/type",
            get(handlers::club_type::list_club_types_handler)
                .post(handlers::club_type::create_club_type_handler),
        )
        .route(
            "/api/club/type/{id}",
            delete(handlers::club_type::delete_club_type_handler),
        )
        .route(
            "/api/club/{id}",
            get(handlers::club::get_club_handler)
                .patch(handlers::club::update_club_handler)
                .delete(handlers::club::delete_club_handler),
        )
        .route(
            "/api/person",
            get(handlers::person::list_persons_handler)
                .post(handlers::person::create_persons_handler),
        )
        .route(
            "/api/person/without-club",
            get(handlers::person::list_persons_without_club_handler),
        )
        .route(
            "/api/person/{id}",
            get(handlers::person::get_person_handler)
                .patch(handlers::person::update_person_handler)
                .delete(handlers::person::delete_person_handler),
        )
        .route(
            "/api/competition",
            get(handlers::competition::list_competitions_handler)
                .post(handlers::competition::create_competition_handler),
        )
        .route(
            "/api/competition/search",
            post(handlers::competition::search_competitions_handler),
        )
        .route(
            "/api/competition/{id}",
            get(handlers::competition::get_competition_handler)
                .patch(handlers::competition::update_competition_handler)
                .delete(handlers::competition::delete_competition_handler),
        )
        .route(
            "/api/league",
            get(handlers::league::list_leagues_handler)
                .post(handlers::league::create_league_handler),
        )
        .route(
            "/api/league/{id}",
            axum::routing::patch(handlers::league::update_league_handler)
                .delete(handlers::league::delete_league_handler),
        )
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(session_layer)
        .with_state(app_state);

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "registar-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
