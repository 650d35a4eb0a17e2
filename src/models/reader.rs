//! Reader (library member) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reader {
    pub id: i32,
    pub firstname: String,
    pub lastname: String,
    pub email: Option<String>,
    /// Account creation date
    pub crea_date: DateTime<Utc>,
}

/// Create reader request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReader {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub firstname: String,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub lastname: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}
