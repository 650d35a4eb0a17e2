//! Staff user model, JWT claims and the acting principal

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Staff account type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Librarian,
    Admin,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Librarian => "librarian",
            AccountType::Admin => "admin",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "librarian" => Ok(AccountType::Librarian),
            "admin" => Ok(AccountType::Admin),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }
}

// SQLx conversion for AccountType
impl sqlx::Type<Postgres> for AccountType {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for AccountType {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AccountType {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Staff user from database
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub login: String,
    /// Argon2 hash, never serialized
    #[serde(skip_serializing)]
    pub password: String,
    pub account_type: AccountType,
    pub email: Option<String>,
    pub crea_date: DateTime<Utc>,
}

/// Create staff user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(min = 3, message = "Login must be at least 3 characters"))]
    pub login: String,
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub account_type: Option<AccountType>,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// The authenticated actor a change is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal(String);

impl Principal {
    /// Fails when no principal name is available
    pub fn new(name: impl Into<String>) -> AppResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(AppError::Authentication("No authenticated principal".to_string()));
        }
        Ok(Self(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Principal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserClaims {
    /// User login
    pub sub: String,
    pub user_id: i32,
    pub account_type: AccountType,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    pub fn new(user: &User, expiration_hours: u64) -> Self {
        let now = Utc::now();
        Self {
            sub: user.login.clone(),
            user_id: user.id,
            account_type: user.account_type,
            exp: (now + chrono::Duration::hours(expiration_hours as i64)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Principal that changes made with these claims are attributed to
    pub fn principal(&self) -> AppResult<Principal> {
        Principal::new(self.sub.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.account_type == AccountType::Admin
    }

    /// Require admin privileges
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(account_type: AccountType) -> User {
        User {
            id: 7,
            login: "jdoe".to_string(),
            password: String::new(),
            account_type,
            email: None,
            crea_date: Utc::now(),
        }
    }

    #[test]
    fn test_token_roundtrip_keeps_principal() {
        let claims = UserClaims::new(&user(AccountType::Librarian), 1);
        let token = claims.create_token("secret").unwrap();

        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.user_id, 7);
        assert_eq!(parsed.principal().unwrap().name(), "jdoe");
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_blank_principal_is_rejected() {
        assert!(matches!(Principal::new("  "), Err(AppError::Authentication(_))));
    }

    #[test]
    fn test_require_admin() {
        assert!(UserClaims::new(&user(AccountType::Admin), 1).require_admin().is_ok());
        assert!(matches!(
            UserClaims::new(&user(AccountType::Librarian), 1).require_admin(),
            Err(AppError::Authorization(_))
        ));
    }
}
