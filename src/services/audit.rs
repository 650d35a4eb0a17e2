//! Rental audit trail
//!
//! [`RentalAuditor`] is called by the rentals service at three points of a
//! rental's life: after creation, before completion and before deletion. Each
//! call appends one immutable record to the [`AuditStore`]. The caller passes
//! the acting [`Principal`] explicitly.
//!
//! Completing a rental that does not exist records nothing and succeeds, while
//! deleting one fails with `NotFound` so the delete is aborted.

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::AppResult,
    models::{
        audit::{NewRentalAudit, RentalAudit},
        rental::Rental,
        user::Principal,
    },
};

/// Read access to persisted rentals
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalLookup: Send + Sync {
    /// Fails with `AppError::NotFound` if the rental does not exist
    async fn find(&self, id: i32) -> AppResult<Rental>;

    async fn exists(&self, id: i32) -> AppResult<bool>;
}

/// Append-only storage of audit records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, record: NewRentalAudit) -> AppResult<RentalAudit>;
}

#[derive(Clone)]
pub struct RentalAuditor<L, S> {
    lookup: L,
    store: S,
}

impl<L, S> RentalAuditor<L, S>
where
    L: RentalLookup,
    S: AuditStore,
{
    pub fn new(lookup: L, store: S) -> Self {
        Self { lookup, store }
    }

    /// Record a rental that was just created
    pub async fn on_created(&self, principal: &Principal, rental: &Rental) -> AppResult<RentalAudit> {
        tracing::info!(rental_id = rental.id, owner = %principal, "Rental INSERT operation caught");

        let record = NewRentalAudit::for_insert(rental, principal, Utc::now());
        let audit = self.store.append(record).await?;

        tracing::info!(rental_id = rental.id, audit_id = audit.id, "Rental INSERT operation recorded");
        Ok(audit)
    }

    /// Record a rental about to be deleted
    pub async fn before_delete(&self, principal: &Principal, rental_id: i32) -> AppResult<RentalAudit> {
        tracing::info!(rental_id, owner = %principal, "Rental DELETE operation caught");

        let rental = self.lookup.find(rental_id).await?;
        let record = NewRentalAudit::for_delete(&rental, principal, Utc::now());
        let audit = self.store.append(record).await?;

        tracing::info!(rental_id, audit_id = audit.id, "Rental DELETE operation recorded");
        Ok(audit)
    }

    /// Record the difference between the stored rental and the state it is
    /// about to be completed to. Returns `None` when there is no stored rental.
    pub async fn before_complete(
        &self,
        principal: &Principal,
        proposed: &Rental,
    ) -> AppResult<Option<RentalAudit>> {
        tracing::info!(rental_id = proposed.id, owner = %principal, "Rental UPDATE operation caught");

        if !self.lookup.exists(proposed.id).await? {
            tracing::debug!(rental_id = proposed.id, "No stored rental, UPDATE not recorded");
            return Ok(None);
        }

        let current = self.lookup.find(proposed.id).await?;
        let record = NewRentalAudit::for_update(&current, proposed, principal, Utc::now());
        let audit = self.store.append(record).await?;

        tracing::info!(rental_id = proposed.id, audit_id = audit.id, "Rental UPDATE operation recorded");
        Ok(Some(audit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, models::audit::AuditEvent};
    use chrono::NaiveDate;
    use mockall::predicate::eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rental(rented_to: NaiveDate) -> Rental {
        Rental {
            id: 1,
            copy_id: 10,
            reader_id: 5,
            rented_from: date(2024, 1, 1),
            rented_to,
        }
    }

    fn principal() -> Principal {
        Principal::new("librarian").unwrap()
    }

    /// What the store hands back after persisting a record
    fn persisted(record: NewRentalAudit) -> RentalAudit {
        let old = record.old_state().copied();
        let new = record.new_state().copied();
        RentalAudit {
            id: 100,
            rental_id: record.rental_id(),
            event_type: record.event(),
            event_date: record.event_date(),
            aud_owner: record.owner().to_string(),
            old_copy_id: old.map(|s| s.copy_id),
            new_copy_id: new.map(|s| s.copy_id),
            old_reader_id: old.map(|s| s.reader_id),
            new_reader_id: new.map(|s| s.reader_id),
            old_rent_from: old.map(|s| s.rent_from),
            new_rent_from: new.map(|s| s.rent_from),
            old_return: old.map(|s| s.return_date),
            new_return: new.map(|s| s.return_date),
        }
    }

    #[tokio::test]
    async fn test_create_appends_insert_record() {
        let mut lookup = MockRentalLookup::new();
        lookup.expect_find().never();
        lookup.expect_exists().never();

        let mut store = MockAuditStore::new();
        store.expect_append().times(1).returning(|record| Ok(persisted(record)));

        let auditor = RentalAuditor::new(lookup, store);
        let audit = auditor
            .on_created(&principal(), &rental(date(2024, 1, 14)))
            .await
            .unwrap();

        assert_eq!(audit.rental_id, 1);
        assert_eq!(audit.event_type, AuditEvent::Insert);
        assert_eq!(audit.aud_owner, "librarian");
        assert_eq!(audit.new_copy_id, Some(10));
        assert_eq!(audit.new_reader_id, Some(5));
        assert_eq!(audit.new_rent_from, Some(date(2024, 1, 1)));
        assert_eq!(audit.new_return, Some(date(2024, 1, 14)));
        assert_eq!(audit.old_copy_id, None);
        assert_eq!(audit.old_reader_id, None);
        assert_eq!(audit.old_rent_from, None);
        assert_eq!(audit.old_return, None);
    }

    #[tokio::test]
    async fn test_complete_appends_update_diff() {
        let mut lookup = MockRentalLookup::new();
        lookup.expect_exists().with(eq(1)).times(1).returning(|_| Ok(true));
        lookup
            .expect_find()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(rental(date(2024, 1, 14))));

        let mut store = MockAuditStore::new();
        store
            .expect_append()
            .withf(|record| record.event() == AuditEvent::Update)
            .times(1)
            .returning(|record| Ok(persisted(record)));

        let auditor = RentalAuditor::new(lookup, store);
        let audit = auditor
            .before_complete(&principal(), &rental(date(2024, 1, 20)))
            .await
            .unwrap()
            .expect("update should be recorded");

        assert_eq!(audit.old_return, Some(date(2024, 1, 14)));
        assert_eq!(audit.new_return, Some(date(2024, 1, 20)));
        assert_eq!(audit.old_copy_id, Some(10));
        assert_eq!(audit.new_copy_id, Some(10));
        assert_eq!(audit.old_reader_id, Some(5));
        assert_eq!(audit.new_reader_id, Some(5));
        assert_eq!(audit.old_rent_from, audit.new_rent_from);
    }

    #[tokio::test]
    async fn test_complete_of_missing_rental_records_nothing() {
        let mut lookup = MockRentalLookup::new();
        lookup.expect_exists().with(eq(1)).times(1).returning(|_| Ok(false));
        lookup.expect_find().never();

        let mut store = MockAuditStore::new();
        store.expect_append().never();

        let auditor = RentalAuditor::new(lookup, store);
        let audit = auditor
            .before_complete(&principal(), &rental(date(2024, 1, 20)))
            .await
            .unwrap();

        assert!(audit.is_none());
    }

    #[tokio::test]
    async fn test_delete_appends_record_of_prior_state() {
        let mut lookup = MockRentalLookup::new();
        lookup
            .expect_find()
            .with(eq(1))
            .times(1)
            .returning(|_| Ok(rental(date(2024, 1, 14))));

        let mut store = MockAuditStore::new();
        store
            .expect_append()
            .withf(|record| record.event() == AuditEvent::Delete && record.new_state().is_none())
            .times(1)
            .returning(|record| Ok(persisted(record)));

        let auditor = RentalAuditor::new(lookup, store);
        let audit = auditor.before_delete(&principal(), 1).await.unwrap();

        assert_eq!(audit.event_type, AuditEvent::Delete);
        assert_eq!(audit.old_copy_id, Some(10));
        assert_eq!(audit.old_reader_id, Some(5));
        assert_eq!(audit.old_return, Some(date(2024, 1, 14)));
        assert_eq!(audit.new_copy_id, None);
        assert_eq!(audit.new_reader_id, None);
        assert_eq!(audit.new_rent_from, None);
        assert_eq!(audit.new_return, None);
    }

    #[tokio::test]
    async fn test_delete_of_missing_rental_propagates_not_found() {
        let mut lookup = MockRentalLookup::new();
        lookup
            .expect_find()
            .with(eq(42))
            .times(1)
            .returning(|id| Err(AppError::NotFound(format!("Rental with id {} not found", id))));

        let mut store = MockAuditStore::new();
        store.expect_append().never();

        let auditor = RentalAuditor::new(lookup, store);
        let result = auditor.before_delete(&principal(), 42).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let lookup = MockRentalLookup::new();
        let mut store = MockAuditStore::new();
        store
            .expect_append()
            .times(1)
            .returning(|_| Err(AppError::Database(sqlx::Error::PoolTimedOut)));

        let auditor = RentalAuditor::new(lookup, store);
        let result = auditor.on_created(&principal(), &rental(date(2024, 1, 14))).await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }

    #[tokio::test]
    async fn test_each_invocation_appends_its_own_record() {
        let lookup = MockRentalLookup::new();
        let mut store = MockAuditStore::new();
        store.expect_append().times(2).returning(|record| Ok(persisted(record)));

        let auditor = RentalAuditor::new(lookup, store);
        let created = rental(date(2024, 1, 14));
        auditor.on_created(&principal(), &created).await.unwrap();
        auditor.on_created(&principal(), &created).await.unwrap();
    }
}
