//! Repository layer for database operations

pub mod audits;
pub mod books;
pub mod copies;
pub mod readers;
pub mod rentals;
pub mod users;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{
        audit::{AuditEvent, RentalAudit},
        copy::Copy,
        reader::Reader,
        rental::Rental,
    },
    services::rentals::RentalStore,
};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub books: books::BooksRepository,
    pub copies: copies::CopiesRepository,
    pub readers: readers::ReadersRepository,
    pub rentals: rentals::RentalsRepository,
    pub audits: audits::AuditsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            books: books::BooksRepository::new(pool.clone()),
            copies: copies::CopiesRepository::new(pool.clone()),
            readers: readers::ReadersRepository::new(pool.clone()),
            rentals: rentals::RentalsRepository::new(pool.clone()),
            audits: audits::AuditsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl RentalStore for Repository {
    async fn reader(&self, id: i32) -> AppResult<Reader> {
        self.readers.get_by_id(id).await
    }

    async fn copy(&self, id: i32) -> AppResult<Copy> {
        self.copies.get_by_id(id).await
    }

    async fn rental(&self, id: i32) -> AppResult<Option<Rental>> {
        self.rentals.find_by_id(id).await
    }

    async fn rentals(&self, reader_id: Option<i32>) -> AppResult<Vec<Rental>> {
        self.rentals.list(reader_id).await
    }

    async fn create_rental(
        &self,
        copy_id: i32,
        reader_id: i32,
        rented_from: NaiveDate,
        rented_to: NaiveDate,
    ) -> AppResult<Rental> {
        self.rentals.create(copy_id, reader_id, rented_from, rented_to).await
    }

    async fn complete_rental(&self, rental: &Rental) -> AppResult<Rental> {
        self.rentals.complete(rental).await
    }

    async fn delete_rental(&self, id: i32) -> AppResult<()> {
        self.rentals.delete(id).await
    }

    async fn audits(&self, rental_id: Option<i32>, event_type: Option<AuditEvent>) -> AppResult<Vec<RentalAudit>> {
        self.audits.list(rental_id, event_type).await
    }
}
