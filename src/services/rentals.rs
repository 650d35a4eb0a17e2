//! Rental management service
//!
//! Every lifecycle change goes through the [`RentalAuditor`]: creation is
//! recorded once the rental exists, completion and deletion are recorded
//! before the change is written. Requests that would be rejected by the write
//! are rejected before the auditor runs, so the trail only holds changes that
//! were applied.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};

use crate::{
    config::RentalsConfig,
    error::{AppError, AppResult},
    models::{
        audit::{AuditEvent, AuditQuery, RentalAudit},
        copy::{Copy, CopyStatus},
        reader::Reader,
        rental::{CompleteRental, CreateRental, Rental, RentalQuery},
        user::Principal,
    },
    repository::{audits::AuditsRepository, rentals::RentalsRepository, Repository},
};

use super::audit::{AuditStore, RentalAuditor, RentalLookup};

/// Storage the rental use cases read and write through
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Fails with `AppError::NotFound` if the reader does not exist
    async fn reader(&self, id: i32) -> AppResult<Reader>;

    /// Fails with `AppError::NotFound` if the copy does not exist
    async fn copy(&self, id: i32) -> AppResult<Copy>;

    async fn rental(&self, id: i32) -> AppResult<Option<Rental>>;

    async fn rentals(&self, reader_id: Option<i32>) -> AppResult<Vec<Rental>>;

    /// Fails with `AppError::BusinessRule` if the copy is no longer available
    async fn create_rental(
        &self,
        copy_id: i32,
        reader_id: i32,
        rented_from: NaiveDate,
        rented_to: NaiveDate,
    ) -> AppResult<Rental>;

    async fn complete_rental(&self, rental: &Rental) -> AppResult<Rental>;

    async fn delete_rental(&self, id: i32) -> AppResult<()>;

    async fn audits(&self, rental_id: Option<i32>, event_type: Option<AuditEvent>) -> AppResult<Vec<RentalAudit>>;
}

#[derive(Clone)]
pub struct RentalsService<S = Repository, L = RentalsRepository, A = AuditsRepository> {
    store: S,
    auditor: RentalAuditor<L, A>,
    config: RentalsConfig,
}

impl RentalsService {
    pub fn new(repository: Repository, config: RentalsConfig) -> Self {
        let auditor = RentalAuditor::new(repository.rentals.clone(), repository.audits.clone());
        Self::with_parts(repository, auditor, config)
    }
}

impl<S, L, A> RentalsService<S, L, A>
where
    S: RentalStore,
    L: RentalLookup,
    A: AuditStore,
{
    pub fn with_parts(store: S, auditor: RentalAuditor<L, A>, config: RentalsConfig) -> Self {
        Self {
            store,
            auditor,
            config,
        }
    }

    pub async fn list(&self, query: &RentalQuery) -> AppResult<Vec<Rental>> {
        self.store.rentals(query.reader_id).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Rental> {
        self.store
            .rental(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))
    }

    /// Rent an available copy to a reader
    pub async fn create_rental(&self, principal: &Principal, request: CreateRental) -> AppResult<Rental> {
        self.store.reader(request.reader_id).await?;

        let copy = self.store.copy(request.copy_id).await?;
        ensure_available(&copy)?;

        let rented_from = request.rented_from.unwrap_or_else(|| Utc::now().date_naive());
        let rented_to = request
            .rented_to
            .unwrap_or_else(|| rented_from + Duration::days(self.config.default_days));
        ensure_ordered(rented_from, rented_to)?;

        let rental = self
            .store
            .create_rental(request.copy_id, request.reader_id, rented_from, rented_to)
            .await?;

        self.auditor.on_created(principal, &rental).await?;
        Ok(rental)
    }

    /// Complete a rental: store its final state and release the copy
    pub async fn complete_rental(
        &self,
        principal: &Principal,
        id: i32,
        request: CompleteRental,
    ) -> AppResult<Rental> {
        let proposed = request.into_rental(id);
        ensure_ordered(proposed.rented_from, proposed.rented_to)?;

        self.store.reader(proposed.reader_id).await?;
        let copy = self.store.copy(proposed.copy_id).await?;
        if let Some(current) = self.store.rental(id).await? {
            if current.copy_id != copy.id {
                ensure_available(&copy)?;
            }
        }

        self.auditor.before_complete(principal, &proposed).await?;
        self.store.complete_rental(&proposed).await
    }

    /// Delete a rental. Fails without deleting anything if it does not exist.
    pub async fn delete_rental(&self, principal: &Principal, id: i32) -> AppResult<()> {
        self.auditor.before_delete(principal, id).await?;
        self.store.delete_rental(id).await
    }

    /// Audit trail, newest first, optionally for a single rental
    pub async fn list_audits(&self, rental_id: Option<i32>, query: &AuditQuery) -> AppResult<Vec<RentalAudit>> {
        self.store.audits(rental_id, query.event_type).await
    }
}

fn ensure_available(copy: &Copy) -> AppResult<()> {
    if copy.status != CopyStatus::Available {
        return Err(AppError::BusinessRule(format!(
            "Copy {} is not available ({})",
            copy.id, copy.status
        )));
    }
    Ok(())
}

fn ensure_ordered(rented_from: NaiveDate, rented_to: NaiveDate) -> AppResult<()> {
    if rented_to < rented_from {
        return Err(AppError::Validation(
            "rented_to cannot be earlier than rented_from".to_string(),
        ));
    }
    Ok(())
}
