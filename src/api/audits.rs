//! Rental audit trail endpoints (read only)

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::audit::{AuditQuery, RentalAudit},
};

use super::AuthenticatedUser;

/// Audit trail of all rentals, newest first
#[utoipa::path(
    get,
    path = "/rentals/audits",
    tag = "audits",
    security(("bearer_auth" = [])),
    params(AuditQuery),
    responses(
        (status = 200, description = "Audit records", body = Vec<RentalAudit>)
    )
)]
pub async fn list_audits(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<Vec<RentalAudit>>> {
    let audits = state.services.rentals.list_audits(None, &query).await?;
    Ok(Json(audits))
}

/// Audit trail of one rental, including deleted ones
#[utoipa::path(
    get,
    path = "/rentals/{id}/audits",
    tag = "audits",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Rental ID"),
        AuditQuery
    ),
    responses(
        (status = 200, description = "Audit records", body = Vec<RentalAudit>)
    )
)]
pub async fn list_rental_audits(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(rental_id): Path<i32>,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<Vec<RentalAudit>>> {
    let audits = state.services.rentals.list_audits(Some(rental_id), &query).await?;
    Ok(Json(audits))
}
