//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{audits, auth, books, copies, health, readers, rentals, users};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library API",
        version = "0.1.0",
        description = "Library rentals REST API with rental audit trail"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Users
        users::list_users,
        users::create_user,
        users::delete_user,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::delete_book,
        // Copies
        copies::list_copies,
        copies::list_available_copies_for_book,
        copies::count_copies_for_book,
        copies::get_copy,
        copies::create_copy,
        copies::change_copy_status,
        copies::delete_copy,
        // Readers
        readers::list_readers,
        readers::get_reader,
        readers::create_reader,
        readers::delete_reader,
        // Rentals
        rentals::list_rentals,
        rentals::get_rental,
        rentals::create_rental,
        rentals::complete_rental,
        rentals::delete_rental,
        // Audits
        audits::list_audits,
        audits::list_rental_audits,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::user::UserClaims,
            crate::models::user::AccountType,
            // Users
            crate::models::user::User,
            crate::models::user::CreateUser,
            // Books
            crate::models::book::Book,
            crate::models::book::CreateBook,
            // Copies
            crate::models::copy::Copy,
            crate::models::copy::CopyStatus,
            crate::models::copy::CopyCount,
            crate::models::copy::CreateCopy,
            crate::models::copy::UpdateCopyStatus,
            // Readers
            crate::models::reader::Reader,
            crate::models::reader::CreateReader,
            // Rentals
            crate::models::rental::Rental,
            crate::models::rental::CreateRental,
            crate::models::rental::CompleteRental,
            // Audits
            crate::models::audit::RentalAudit,
            crate::models::audit::AuditEvent,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "users", description = "Staff user management"),
        (name = "books", description = "Book catalog"),
        (name = "copies", description = "Physical copies of books"),
        (name = "readers", description = "Library readers"),
        (name = "rentals", description = "Rental management"),
        (name = "audits", description = "Rental audit trail")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_rental_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/rentals"));
        assert!(paths.contains_key("/rentals/{id}/complete"));
        assert!(paths.contains_key("/rentals/{id}/audits"));
        assert!(doc
            .components
            .as_ref()
            .map(|c| c.security_schemes.contains_key("bearer_auth"))
            .unwrap_or(false));
    }
}
