//! Credential registration, login, and session handlers.

use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use registar_core::{AppError, UserIdentity};
use registar_domain::PersonId;
use tower_sessions::Session;
use tracing::warn;

use crate::dto::{
    LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserIdentityResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// Session key carrying the authenticated identity.
pub const SESSION_USER_KEY: &str = "user_identity";

/// POST /auth/register - issue credentials for a person.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let issued = state
        .auth_service
        .register(registar_application::RegisterInput {
            person_id: PersonId::from_i32(payload.person_id),
            first_name: payload.first_name,
            last_name: payload.last_name,
        })
        .await?;

    // Credential delivery is best effort; the credentials are already
    // returned in the response body.
    if let Some(email) = payload.email.as_deref() {
        let body = format!(
            "Login: {}\nHeslo: {}\n\nHeslo si zmeňte pri prvom prihlásení.",
            issued.login, issued.password
        );
        if let Err(error) = state
            .email_service
            .send_email(email, "Prístupové údaje do registra", &body)
            .await
        {
            warn!(error = %error, "failed to email issued credentials");
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            login: issued.login,
            password: issued.password,
        }),
    ))
}

/// POST /auth/login - authenticate and open a server-side session.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = state
        .auth_service
        .login(&payload.login, &payload.password)
        .await?;

    let identity = UserIdentity::new(outcome.person_id.as_i32(), outcome.login.clone());

    // Session fixation defence: new session id on privilege change.
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    Ok(Json(LoginResponse {
        login: outcome.login,
        person_id: outcome.person_id.as_i32(),
        must_change_password: outcome.must_change_password,
    }))
}

/// POST /auth/logout - drop the session.
pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - identity of the current session.
pub async fn me_handler(
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Json<UserIdentityResponse>> {
    Ok(Json(UserIdentityResponse::from(identity)))
}
