//! Rental audit trail records
//!
//! A [`NewRentalAudit`] is built by exactly one of three constructors, one per
//! lifecycle event, so a record never reaches the store half-populated. Once
//! built it can only be read. [`RentalAudit`] is the persisted row.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::{IntoParams, ToSchema};

use super::{rental::Rental, user::Principal};

/// Kind of rental lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditEvent {
    Insert,
    Update,
    Delete,
}

impl AuditEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditEvent::Insert => "INSERT",
            AuditEvent::Update => "UPDATE",
            AuditEvent::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AuditEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "INSERT" => Ok(AuditEvent::Insert),
            "UPDATE" => Ok(AuditEvent::Update),
            "DELETE" => Ok(AuditEvent::Delete),
            _ => Err(format!("Invalid audit event type: {}", s)),
        }
    }
}

// SQLx conversion for AuditEvent
impl sqlx::Type<Postgres> for AuditEvent {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for AuditEvent {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for AuditEvent {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Rental fields captured on one side of an audited change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalSnapshot {
    pub copy_id: i32,
    pub reader_id: i32,
    pub rent_from: NaiveDate,
    pub return_date: NaiveDate,
}

impl From<&Rental> for RentalSnapshot {
    fn from(rental: &Rental) -> Self {
        Self {
            copy_id: rental.copy_id,
            reader_id: rental.reader_id,
            rent_from: rental.rented_from,
            return_date: rental.rented_to,
        }
    }
}

/// Audit record about to be appended to the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRentalAudit {
    rental_id: i32,
    event: AuditEvent,
    event_date: DateTime<Utc>,
    owner: String,
    old: Option<RentalSnapshot>,
    new: Option<RentalSnapshot>,
}

impl NewRentalAudit {
    /// Record for a freshly created rental: only the new side is set
    pub fn for_insert(rental: &Rental, owner: &Principal, at: DateTime<Utc>) -> Self {
        Self {
            rental_id: rental.id,
            event: AuditEvent::Insert,
            event_date: at,
            owner: owner.name().to_string(),
            old: None,
            new: Some(rental.into()),
        }
    }

    /// Record for a completed rental: both sides are set
    pub fn for_update(old: &Rental, new: &Rental, owner: &Principal, at: DateTime<Utc>) -> Self {
        Self {
            rental_id: new.id,
            event: AuditEvent::Update,
            event_date: at,
            owner: owner.name().to_string(),
            old: Some(old.into()),
            new: Some(new.into()),
        }
    }

    /// Record for a removed rental: only the old side is set
    pub fn for_delete(rental: &Rental, owner: &Principal, at: DateTime<Utc>) -> Self {
        Self {
            rental_id: rental.id,
            event: AuditEvent::Delete,
            event_date: at,
            owner: owner.name().to_string(),
            old: Some(rental.into()),
            new: None,
        }
    }

    pub fn rental_id(&self) -> i32 {
        self.rental_id
    }

    pub fn event(&self) -> AuditEvent {
        self.event
    }

    pub fn event_date(&self) -> DateTime<Utc> {
        self.event_date
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn old_state(&self) -> Option<&RentalSnapshot> {
        self.old.as_ref()
    }

    pub fn new_state(&self) -> Option<&RentalSnapshot> {
        self.new.as_ref()
    }
}

/// Persisted audit record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct RentalAudit {
    pub id: i32,
    pub rental_id: i32,
    pub event_type: AuditEvent,
    pub event_date: DateTime<Utc>,
    /// Login of the staff member who made the change
    pub aud_owner: String,
    pub old_copy_id: Option<i32>,
    pub new_copy_id: Option<i32>,
    pub old_reader_id: Option<i32>,
    pub new_reader_id: Option<i32>,
    pub old_rent_from: Option<NaiveDate>,
    pub new_rent_from: Option<NaiveDate>,
    pub old_return: Option<NaiveDate>,
    pub new_return: Option<NaiveDate>,
}

/// Query parameters for the audit trail
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AuditQuery {
    /// Only records of this event type
    pub event_type: Option<AuditEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rental(to: NaiveDate) -> Rental {
        Rental {
            id: 1,
            copy_id: 10,
            reader_id: 5,
            rented_from: date(2024, 1, 1),
            rented_to: to,
        }
    }

    fn librarian() -> Principal {
        Principal::new("librarian").unwrap()
    }

    #[test]
    fn test_insert_record_has_only_new_side() {
        let now = Utc::now();
        let record = NewRentalAudit::for_insert(&rental(date(2024, 1, 14)), &librarian(), now);

        assert_eq!(record.rental_id(), 1);
        assert_eq!(record.event(), AuditEvent::Insert);
        assert_eq!(record.event_date(), now);
        assert_eq!(record.owner(), "librarian");
        assert!(record.old_state().is_none());

        let new = record.new_state().unwrap();
        assert_eq!(new.copy_id, 10);
        assert_eq!(new.reader_id, 5);
        assert_eq!(new.rent_from, date(2024, 1, 1));
        assert_eq!(new.return_date, date(2024, 1, 14));
    }

    #[test]
    fn test_update_record_has_both_sides() {
        let old = rental(date(2024, 1, 14));
        let new = rental(date(2024, 1, 20));
        let record = NewRentalAudit::for_update(&old, &new, &librarian(), Utc::now());

        assert_eq!(record.event(), AuditEvent::Update);
        assert_eq!(record.old_state().unwrap().return_date, date(2024, 1, 14));
        assert_eq!(record.new_state().unwrap().return_date, date(2024, 1, 20));
        assert_eq!(record.old_state().unwrap().copy_id, record.new_state().unwrap().copy_id);
    }

    #[test]
    fn test_delete_record_has_only_old_side() {
        let record = NewRentalAudit::for_delete(&rental(date(2024, 1, 14)), &librarian(), Utc::now());

        assert_eq!(record.event(), AuditEvent::Delete);
        assert!(record.new_state().is_none());
        let old = record.old_state().unwrap();
        assert_eq!(old.copy_id, 10);
        assert_eq!(old.reader_id, 5);
    }

    #[test]
    fn test_audit_event_parsing() {
        assert_eq!("insert".parse::<AuditEvent>(), Ok(AuditEvent::Insert));
        assert_eq!("UPDATE".parse::<AuditEvent>(), Ok(AuditEvent::Update));
        assert_eq!(AuditEvent::Delete.to_string(), "DELETE");
        assert!("MERGE".parse::<AuditEvent>().is_err());
    }
}
