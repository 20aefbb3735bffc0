use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use registar_application::{
    CompetitionSearchInput, CreateCompetitionInput, UpdateCompetitionFields,
};
use registar_domain::CompetitionId;

use crate::dto::{
    CompetitionResponse, CreateCompetitionRequest, ListQuery, SearchCompetitionRequest,
    UpdateCompetitionRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/competition - list competitions with nested locations.
pub async fn list_competitions_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<CompetitionResponse>>> {
    let competitions = state
        .competition_service
        .list(query.sort_by.as_deref())
        .await?;
    Ok(Json(
        competitions
            .into_iter()
            .map(CompetitionResponse::from)
            .collect(),
    ))
}

/// POST /api/competition/search - partial-match search.
pub async fn search_competitions_handler(
    State(state): State<AppState>,
    Json(payload): Json<SearchCompetitionRequest>,
) -> ApiResult<Json<Vec<CompetitionResponse>>> {
    let competitions = state
        .competition_service
        .search(CompetitionSearchInput::from(payload))
        .await?;
    Ok(Json(
        competitions
            .into_iter()
            .map(CompetitionResponse::from)
            .collect(),
    ))
}

/// GET /api/competition/{id} - one competition.
pub async fn get_competition_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<CompetitionResponse>> {
    let competition = state
        .competition_service
        .get(CompetitionId::from_i32(id))
        .await?;
    Ok(Json(CompetitionResponse::from(competition)))
}

/// POST /api/competition - create a competition with its locations.
pub async fn create_competition_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateCompetitionRequest>,
) -> ApiResult<(StatusCode, Json<CompetitionResponse>)> {
    let id = state
        .competition_service
        .create(CreateCompetitionInput::from(payload))
        .await?;
    let created = state.competition_service.get(id).await?;
    Ok((StatusCode::CREATED, Json(CompetitionResponse::from(created))))
}

/// PATCH /api/competition/{id} - sparse update.
pub async fn update_competition_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateCompetitionRequest>,
) -> ApiResult<Json<CompetitionResponse>> {
    let competition = state
        .competition_service
        .update(
            CompetitionId::from_i32(id),
            UpdateCompetitionFields::from(payload),
        )
        .await?;
    Ok(Json(CompetitionResponse::from(competition)))
}

/// DELETE /api/competition/{id} - delete a competition and its locations.
pub async fn delete_competition_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state
        .competition_service
        .delete(CompetitionId::from_i32(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
