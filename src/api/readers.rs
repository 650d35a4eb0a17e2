//! Reader endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::reader::{CreateReader, Reader},
};

use super::AuthenticatedUser;

/// List readers
#[utoipa::path(
    get,
    path = "/readers",
    tag = "readers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "List of readers", body = Vec<Reader>)
    )
)]
pub async fn list_readers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Reader>>> {
    let readers = state.services.readers.list().await?;
    Ok(Json(readers))
}

/// Get reader by ID
#[utoipa::path(
    get,
    path = "/readers/{id}",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reader ID")),
    responses(
        (status = 200, description = "Reader details", body = Reader),
        (status = 404, description = "Reader not found")
    )
)]
pub async fn get_reader(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Reader>> {
    let reader = state.services.readers.get_by_id(id).await?;
    Ok(Json(reader))
}

/// Register a reader
#[utoipa::path(
    post,
    path = "/readers",
    tag = "readers",
    security(("bearer_auth" = [])),
    request_body = CreateReader,
    responses(
        (status = 201, description = "Reader created", body = Reader),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_reader(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(reader): Json<CreateReader>,
) -> AppResult<(StatusCode, Json<Reader>)> {
    let created = state.services.readers.create(&reader).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Delete a reader without rentals
#[utoipa::path(
    delete,
    path = "/readers/{id}",
    tag = "readers",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Reader ID")),
    responses(
        (status = 204, description = "Reader deleted"),
        (status = 404, description = "Reader not found"),
        (status = 422, description = "Reader still has rentals")
    )
)]
pub async fn delete_reader(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.readers.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
