use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::dto::{ClubTypeRequest, ClubTypeResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/club/type - list club types.
pub async fn list_club_types_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<ClubTypeResponse>>> {
    let club_types = state.club_type_service.list().await?;
    Ok(Json(
        club_types.into_iter().map(ClubTypeResponse::from).collect(),
    ))
}

/// POST /api/club/type - create a club type.
pub async fn create_club_type_handler(
    State(state): State<AppState>,
    Json(payload): Json<ClubTypeRequest>,
) -> ApiResult<(StatusCode, Json<ClubTypeResponse>)> {
    let created = state
        .club_type_service
        .create(payload.label, payload.short_label)
        .await?;
    Ok((StatusCode::CREATED, Json(ClubTypeResponse::from(created))))
}

/// DELETE /api/club/type/{id}.
pub async fn delete_club_type_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.club_type_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
