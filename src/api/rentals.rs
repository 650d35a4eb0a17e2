//! Rental endpoints
//!
//! Every mutating handler passes the caller's principal down to the rentals
//! service, which attributes the audit record to it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::rental::{CompleteRental, CreateRental, Rental, RentalQuery},
};

use super::AuthenticatedUser;

/// List rentals
#[utoipa::path(
    get,
    path = "/rentals",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(RentalQuery),
    responses(
        (status = 200, description = "List of rentals", body = Vec<Rental>)
    )
)]
pub async fn list_rentals(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<RentalQuery>,
) -> AppResult<Json<Vec<Rental>>> {
    let rentals = state.services.rentals.list(&query).await?;
    Ok(Json(rentals))
}

/// Get rental by ID
#[utoipa::path(
    get,
    path = "/rentals/{id}",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rental ID")),
    responses(
        (status = 200, description = "Rental details", body = Rental),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn get_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Rental>> {
    let rental = state.services.rentals.get_by_id(id).await?;
    Ok(Json(rental))
}

/// Rent a copy to a reader
#[utoipa::path(
    post,
    path = "/rentals",
    tag = "rentals",
    security(("bearer_auth" = [])),
    request_body = CreateRental,
    responses(
        (status = 201, description = "Rental created", body = Rental),
        (status = 404, description = "Copy or reader not found"),
        (status = 422, description = "Copy not available")
    )
)]
pub async fn create_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateRental>,
) -> AppResult<(StatusCode, Json<Rental>)> {
    let principal = claims.principal()?;
    let rental = state.services.rentals.create_rental(&principal, request).await?;
    Ok((StatusCode::CREATED, Json(rental)))
}

/// Complete a rental
#[utoipa::path(
    put,
    path = "/rentals/{id}/complete",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rental ID")),
    request_body = CompleteRental,
    responses(
        (status = 200, description = "Rental completed", body = Rental),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn complete_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<CompleteRental>,
) -> AppResult<Json<Rental>> {
    let principal = claims.principal()?;
    let rental = state
        .services
        .rentals
        .complete_rental(&principal, id, request)
        .await?;
    Ok(Json(rental))
}

/// Delete a rental
#[utoipa::path(
    delete,
    path = "/rentals/{id}",
    tag = "rentals",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Rental ID")),
    responses(
        (status = 204, description = "Rental deleted"),
        (status = 404, description = "Rental not found")
    )
)]
pub async fn delete_rental(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    let principal = claims.principal()?;
    state.services.rentals.delete_rental(&principal, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
