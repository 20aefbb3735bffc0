use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use registar_application::{CreateClubInput, UpdateClubFields};
use registar_domain::ClubId;

use crate::dto::{
    ClubResponse, CreateClubRequest, CreatedResourceResponse, ListQuery, SingleOrMany,
    UpdateClubRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/club - list clubs, optionally sorted.
pub async fn list_clubs_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<ClubResponse>>> {
    let clubs = state.club_service.list(query.sort_by.as_deref()).await?;
    Ok(Json(clubs.into_iter().map(ClubResponse::from).collect()))
}

/// GET /api/club/{id} - one club.
pub async fn get_club_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<ClubResponse>> {
    let club = state.club_service.get(ClubId::from_i32(id)).await?;
    Ok(Json(ClubResponse::from(club)))
}

/// POST /api/club - create one club or an atomic batch.
pub async fn create_clubs_handler(
    State(state): State<AppState>,
    Json(payload): Json<SingleOrMany<CreateClubRequest>>,
) -> ApiResult<(StatusCode, Json<Vec<CreatedResourceResponse>>)> {
    let inputs: Vec<CreateClubInput> = payload
        .into_vec()
        .into_iter()
        .map(CreateClubInput::from)
        .collect();

    let ids = state.club_service.create_many(inputs).await?;
    let created = ids
        .into_iter()
        .map(|id| CreatedResourceResponse { id: id.as_i32() })
        .collect();

    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /api/club/{id} - sparse update.
pub async fn update_club_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateClubRequest>,
) -> ApiResult<Json<ClubResponse>> {
    let club = state
        .club_service
        .update(ClubId::from_i32(id), UpdateClubFields::from(payload))
        .await?;
    Ok(Json(ClubResponse::from(club)))
}

/// DELETE /api/club/{id}.
pub async fn delete_club_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.club_service.delete(ClubId::from_i32(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
