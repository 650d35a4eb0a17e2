//! API handlers for the library REST endpoints

pub mod audits;
pub mod auth;
pub mod books;
pub mod copies;
pub mod health;
pub mod openapi;
pub mod readers;
pub mod rentals;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, patch, post, put},
    Router,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, models::user::UserClaims, AppState};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Authentication("Missing or invalid authorization header".to_string()))?;

        let claims = UserClaims::from_token(bearer.token(), &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Create the application router with all routes
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Authentication
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Staff users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", axum::routing::delete(users::delete_user))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/:id", get(books::get_book).delete(books::delete_book))
        .route("/books/:id/copies/available", get(copies::list_available_copies_for_book))
        .route("/books/:id/copies/count", get(copies::count_copies_for_book))
        // Copies
        .route("/copies", get(copies::list_copies).post(copies::create_copy))
        .route("/copies/:id", get(copies::get_copy).delete(copies::delete_copy))
        .route("/copies/:id/status", patch(copies::change_copy_status))
        // Readers
        .route("/readers", get(readers::list_readers).post(readers::create_reader))
        .route("/readers/:id", get(readers::get_reader).delete(readers::delete_reader))
        // Rentals
        .route("/rentals", get(rentals::list_rentals).post(rentals::create_rental))
        .route("/rentals/audits", get(audits::list_audits))
        .route("/rentals/:id", get(rentals::get_rental).delete(rentals::delete_rental))
        .route("/rentals/:id/complete", put(rentals::complete_rental))
        .route("/rentals/:id/audits", get(audits::list_rental_audits))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, Request, StatusCode},
    };
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::{config::AppConfig, repository::Repository, services::Services};

    /// State whose pool never connects; only usable for routes that stop
    /// before touching the database.
    fn offline_state() -> AppState {
        let config = AppConfig::default();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();
        let services = Services::new(Repository::new(pool.clone()), &config);

        AppState {
            config: Arc::new(config),
            services: Arc::new(services),
            pool,
        }
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = router(offline_state())
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rental_routes_require_authentication() {
        let app = router(offline_state());

        let response = app
            .clone()
            .oneshot(Request::delete("/api/v1/rentals/1").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::get("/api/v1/rentals/audits")
                    .header(AUTHORIZATION, "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_me_returns_claims() {
        let state = offline_state();
        let claims = UserClaims {
            sub: "librarian".to_string(),
            user_id: 3,
            account_type: crate::models::user::AccountType::Librarian,
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
            iat: chrono::Utc::now().timestamp(),
        };
        let token = claims.create_token(&state.config.auth.jwt_secret).unwrap();

        let response = router(state)
            .oneshot(
                Request::get("/api/v1/auth/me")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_user_management_requires_admin() {
        let state = offline_state();
        let claims = UserClaims {
            sub: "librarian".to_string(),
            user_id: 3,
            account_type: crate::models::user::AccountType::Librarian,
            exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
            iat: chrono::Utc::now().timestamp(),
        };
        let token = claims.create_token(&state.config.auth.jwt_secret).unwrap();

        let response = router(state)
            .oneshot(
                Request::get("/api/v1/users")
                    .header(AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
