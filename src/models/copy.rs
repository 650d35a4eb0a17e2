//! Copy (physical book instance) model and related types

use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};

/// Copy availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CopyStatus {
    #[default]
    Available,
    Rented,
    Lost,
    Destroyed,
}

impl CopyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CopyStatus::Available => "available",
            CopyStatus::Rented => "rented",
            CopyStatus::Lost => "lost",
            CopyStatus::Destroyed => "destroyed",
        }
    }
}

impl std::fmt::Display for CopyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CopyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "available" => Ok(CopyStatus::Available),
            "rented" => Ok(CopyStatus::Rented),
            "lost" => Ok(CopyStatus::Lost),
            "destroyed" => Ok(CopyStatus::Destroyed),
            _ => Err(format!("Invalid copy status: {}", s)),
        }
    }
}

// SQLx conversion for CopyStatus
impl sqlx::Type<Postgres> for CopyStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for CopyStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for CopyStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Copy from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Copy {
    pub id: i32,
    pub book_id: i32,
    pub status: CopyStatus,
}

/// Create copy request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCopy {
    pub book_id: i32,
    /// Defaults to `available`
    pub status: Option<CopyStatus>,
}

/// Change copy status request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCopyStatus {
    pub status: CopyStatus,
}

/// Query parameters for copies
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CopyQuery {
    /// Only copies of books with exactly this title
    pub title: Option<String>,
    /// Only copies currently available for rental
    pub available: Option<bool>,
}

impl CopyQuery {
    /// Status the listing is restricted to, if any
    pub fn status(&self) -> Option<CopyStatus> {
        self.available.unwrap_or(false).then_some(CopyStatus::Available)
    }
}

/// Number of copies held for a book
#[derive(Debug, Serialize, ToSchema)]
pub struct CopyCount {
    pub book_id: i32,
    pub copies: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_status_parsing() {
        assert_eq!("available".parse::<CopyStatus>(), Ok(CopyStatus::Available));
        assert_eq!("RENTED".parse::<CopyStatus>(), Ok(CopyStatus::Rented));
        assert!("in_use".parse::<CopyStatus>().is_err());
        assert_eq!(CopyStatus::default(), CopyStatus::Available);
    }

    #[test]
    fn test_copy_query_status_filter() {
        let available = CopyQuery {
            title: None,
            available: Some(true),
        };
        assert_eq!(available.status(), Some(CopyStatus::Available));

        let all = CopyQuery {
            title: Some("Solaris".to_string()),
            available: Some(false),
        };
        assert_eq!(all.status(), None);
        assert_eq!(CopyQuery::default().status(), None);
    }

    #[test]
    fn test_copy_status_json() {
        let status: CopyStatus = serde_json::from_str("\"lost\"").unwrap();
        assert_eq!(status, CopyStatus::Lost);
        assert_eq!(serde_json::to_string(&CopyStatus::Rented).unwrap(), "\"rented\"");
        assert!(serde_json::from_str::<CopyStatus>("\"in_use\"").is_err());
    }
}
