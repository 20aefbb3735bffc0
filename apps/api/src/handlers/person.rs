use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use registar_application::CreatePersonInput;
use registar_domain::PersonId;

use crate::dto::{
    CreatePersonRequest, ListQuery, PersonResponse, SingleOrMany, UpdatePersonRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/person - list persons with aggregated contacts.
pub async fn list_persons_handler(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<PersonResponse>>> {
    let persons = state.person_service.list(query.sort_by.as_deref()).await?;
    Ok(Json(persons.into_iter().map(PersonResponse::from).collect()))
}

/// GET /api/person/without-club - persons with no club membership.
pub async fn list_persons_without_club_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PersonResponse>>> {
    let persons = state.person_service.list_without_club().await?;
    Ok(Json(persons.into_iter().map(PersonResponse::from).collect()))
}

/// GET /api/person/{id} - one person.
pub async fn get_person_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<Json<PersonResponse>> {
    let person = state.person_service.get(PersonId::from_i32(id)).await?;
    Ok(Json(PersonResponse::from(person)))
}

/// POST /api/person - create one person or an atomic batch, contacts
/// included.
pub async fn create_persons_handler(
    State(state): State<AppState>,
    Json(payload): Json<SingleOrMany<CreatePersonRequest>>,
) -> ApiResult<(StatusCode, Json<Vec<PersonResponse>>)> {
    let inputs: Vec<CreatePersonInput> = payload
        .into_vec()
        .into_iter()
        .map(CreatePersonInput::from)
        .collect();

    let created = state.person_service.create_many(inputs).await?;
    Ok((
        StatusCode::CREATED,
        Json(created.into_iter().map(PersonResponse::from).collect()),
    ))
}

/// PATCH /api/person/{id} - sparse update, optional contact replacement.
pub async fn update_person_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePersonRequest>,
) -> ApiResult<Json<PersonResponse>> {
    let (fields, contacts) = payload.into_parts();
    let person = state
        .person_service
        .update(PersonId::from_i32(id), fields, contacts)
        .await?;
    Ok(Json(PersonResponse::from(person)))
}

/// DELETE /api/person/{id} - delete a person and their contacts.
pub async fn delete_person_handler(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> ApiResult<StatusCode> {
    state.person_service.delete(PersonId::from_i32(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
