//! Staff users and authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use validator::Validate;

use crate::{
    config::{AdminConfig, AuthConfig},
    error::{AppError, AppResult},
    models::user::{AccountType, CreateUser, User, UserClaims},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate user by login and return a JWT token
    pub async fn authenticate(&self, login: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_login(login)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid login or password".to_string()))?;

        if !verify_password(&user.password, password)? {
            return Err(AppError::Authentication("Invalid login or password".to_string()));
        }

        let claims = UserClaims::new(&user, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!(login = %user.login, "User authenticated");
        Ok((token, user))
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        self.repository.users.list().await
    }

    pub async fn create(&self, user: &CreateUser) -> AppResult<User> {
        user.validate()?;
        let hash = hash_password(&user.password)?;
        self.repository
            .users
            .create(
                &user.login,
                &hash,
                user.account_type.unwrap_or(AccountType::Librarian),
                user.email.as_deref(),
            )
            .await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.users.delete(id).await
    }

    /// Create the configured admin account when no staff user exists yet
    pub async fn ensure_admin(&self, admin: &AdminConfig) -> AppResult<()> {
        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        let hash = hash_password(initial_admin_password(admin)?)?;
        self.repository
            .users
            .create(&admin.login, &hash, AccountType::Admin, Some(&admin.mail))
            .await?;

        tracing::info!(login = %admin.login, "Created initial admin account");
        Ok(())
    }
}

/// Password for the bootstrap admin account. It must be configured explicitly.
fn initial_admin_password(admin: &AdminConfig) -> AppResult<&str> {
    let password = admin.password.trim();
    if password.is_empty() {
        return Err(AppError::Validation(
            "No staff user exists and admin.password is not set (LIBRARY_ADMIN__PASSWORD)".to_string(),
        ));
    }
    Ok(&admin.password)
}

fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_verification() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password(&hash, "s3cret").unwrap());
        assert!(!verify_password(&hash, "wrong").unwrap());
    }

    #[test]
    fn test_initial_admin_requires_configured_password() {
        let unset = AdminConfig::default();
        assert!(matches!(initial_admin_password(&unset), Err(AppError::Validation(_))));

        let blank = AdminConfig {
            password: "   ".to_string(),
            ..AdminConfig::default()
        };
        assert!(initial_admin_password(&blank).is_err());

        let configured = AdminConfig {
            password: "s3cret".to_string(),
            ..AdminConfig::default()
        };
        assert_eq!(initial_admin_password(&configured).unwrap(), "s3cret");
    }

    #[test]
    fn test_malformed_hash_is_internal_error() {
        assert!(matches!(verify_password("plain", "plain"), Err(AppError::Internal(_))));
    }
}
