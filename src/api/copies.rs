//! Copy endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::copy::{Copy, CopyCount, CopyQuery, CreateCopy, UpdateCopyStatus},
};

use super::AuthenticatedUser;

/// List copies, optionally by book title and availability
#[utoipa::path(
    get,
    path = "/copies",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(CopyQuery),
    responses(
        (status = 200, description = "List of copies", body = Vec<Copy>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_copies(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<CopyQuery>,
) -> AppResult<Json<Vec<Copy>>> {
    let copies = state.services.copies.list(&query).await?;
    Ok(Json(copies))
}

/// Copies of a book available for rental
#[utoipa::path(
    get,
    path = "/books/{id}/copies/available",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Available copies", body = Vec<Copy>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_available_copies_for_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<Copy>>> {
    let copies = state.services.copies.list_available_for_book(book_id).await?;
    Ok(Json(copies))
}

/// Number of copies held for a book
#[utoipa::path(
    get,
    path = "/books/{id}/copies/count",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Copy count", body = CopyCount),
        (status = 404, description = "Book not found")
    )
)]
pub async fn count_copies_for_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(book_id): Path<i32>,
) -> AppResult<Json<CopyCount>> {
    let count = state.services.copies.count_for_book(book_id).await?;
    Ok(Json(count))
}

/// Get copy by ID
#[utoipa::path(
    get,
    path = "/copies/{id}",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 200, description = "Copy details", body = Copy),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Copy>> {
    let copy = state.services.copies.get_by_id(id).await?;
    Ok(Json(copy))
}

/// Add a copy of a book
#[utoipa::path(
    post,
    path = "/copies",
    tag = "copies",
    security(("bearer_auth" = [])),
    request_body = CreateCopy,
    responses(
        (status = 201, description = "Copy created", body = Copy),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(copy): Json<CreateCopy>,
) -> AppResult<(StatusCode, Json<Copy>)> {
    let created = state.services.copies.create(&copy).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Change the status of a copy
#[utoipa::path(
    patch,
    path = "/copies/{id}/status",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Copy ID")),
    request_body = UpdateCopyStatus,
    responses(
        (status = 200, description = "Copy updated", body = Copy),
        (status = 404, description = "Copy not found"),
        (status = 422, description = "Status change not allowed")
    )
)]
pub async fn change_copy_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateCopyStatus>,
) -> AppResult<Json<Copy>> {
    let copy = state.services.copies.change_status(id, request.status).await?;
    Ok(Json(copy))
}

/// Delete a copy
#[utoipa::path(
    delete,
    path = "/copies/{id}",
    tag = "copies",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Copy ID")),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn delete_copy(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.copies.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
