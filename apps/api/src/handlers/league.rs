use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use registar_domain::LeagueId;

use crate::dto::{LeagueRequest, LeagueResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/league - list leagues.
pub async fn list_leagues_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LeagueResponse>>> {
    let leagues = state.league_service.list().await?;
    Ok(Json(leagues.into_iter().map(LeagueResponse::from).collect()))
}

/// POST /api/league - create a league.
pub async fn create_league_handler(
    State(state): State<AppState>,
    Json(payload): Json<LeagueRequest>,
) -> ApiResult<(StatusCode, Json<LeagueResponse>)> {
    let created = state.league_service.create(payload.name).await?;
    Ok((StatusCode::CREATED, Json(LeagueResponse::from(created))))
}

/// PATCH /api/league/{id} - rename a league.
pub async fn update_league_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<LeagueRequest>,
) -> ApiResult<Json<LeagueResponse>> {
    let renamed = state
        .league_service
        .rename(LeagueId::from_i32(id), payload.name)
        .await?;
    Ok(Json(LeagueResponse::from(renamed)))
}

/// DELETE /api/league/{id}.
pub async fn delete_league_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.league_service.delete(LeagueId::from_i32(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
