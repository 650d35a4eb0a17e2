//! Rental model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// A copy lent to a reader for a time window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Rental {
    pub id: i32,
    pub copy_id: i32,
    pub reader_id: i32,
    /// First day of the rental
    pub rented_from: NaiveDate,
    /// Due date while the rental is open, return date once completed
    pub rented_to: NaiveDate,
}

/// Create rental request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRental {
    pub copy_id: i32,
    pub reader_id: i32,
    /// Defaults to today
    pub rented_from: Option<NaiveDate>,
    /// Defaults to `rented_from` plus the configured rental length
    pub rented_to: Option<NaiveDate>,
}

/// Complete rental request: the full state the rental is moved to
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CompleteRental {
    pub copy_id: i32,
    pub reader_id: i32,
    pub rented_from: NaiveDate,
    pub rented_to: NaiveDate,
}

impl CompleteRental {
    pub fn into_rental(self, id: i32) -> Rental {
        Rental {
            id,
            copy_id: self.copy_id,
            reader_id: self.reader_id,
            rented_from: self.rented_from,
            rented_to: self.rented_to,
        }
    }
}

/// Query parameters for rentals
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct RentalQuery {
    /// Only rentals of this reader
    pub reader_id: Option<i32>,
}
