//! Rentals repository for database operations

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{copy::CopyStatus, rental::Rental},
    services::audit::RentalLookup,
};

#[derive(Clone)]
pub struct RentalsRepository {
    pool: Pool<Postgres>,
}

impl RentalsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List rentals, optionally only those of one reader
    pub async fn list(&self, reader_id: Option<i32>) -> AppResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT * FROM rentals
            WHERE ($1::INTEGER IS NULL OR reader_id = $1)
            ORDER BY rented_from DESC, id DESC
            "#,
        )
        .bind(reader_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rentals)
    }

    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<Rental>> {
        let rental = sqlx::query_as::<_, Rental>("SELECT * FROM rentals WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(rental)
    }

    /// Get rental by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Rental> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))
    }

    pub async fn exists(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM rentals WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Mark the copy as rented and create the rental. Fails with
    /// `BusinessRule` if the copy is no longer available.
    pub async fn create(
        &self,
        copy_id: i32,
        reader_id: i32,
        rented_from: chrono::NaiveDate,
        rented_to: chrono::NaiveDate,
    ) -> AppResult<Rental> {
        let mut tx = self.pool.begin().await?;

        let claimed = sqlx::query("UPDATE copies SET status = 'rented' WHERE id = $1 AND status = 'available'")
            .bind(copy_id)
            .execute(&mut *tx)
            .await?;
        if claimed.rows_affected() == 0 {
            return Err(AppError::BusinessRule(format!("Copy {} is not available", copy_id)));
        }

        let rental = sqlx::query_as::<_, Rental>(
            r#"
            INSERT INTO rentals (copy_id, reader_id, rented_from, rented_to)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(copy_id)
        .bind(reader_id)
        .bind(rented_from)
        .bind(rented_to)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(rental)
    }

    /// Store the completed state of a rental and release the copy it held.
    /// Moving the rental to another copy requires that copy to be available.
    pub async fn complete(&self, rental: &Rental) -> AppResult<Rental> {
        let mut tx = self.pool.begin().await?;

        let previous_copy_id: i32 = sqlx::query_scalar("SELECT copy_id FROM rentals WHERE id = $1 FOR UPDATE")
            .bind(rental.id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", rental.id)))?;

        if rental.copy_id != previous_copy_id {
            let status: CopyStatus = sqlx::query_scalar("SELECT status FROM copies WHERE id = $1 FOR UPDATE")
                .bind(rental.copy_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", rental.copy_id)))?;
            if status != CopyStatus::Available {
                return Err(AppError::BusinessRule(format!(
                    "Copy {} is not available ({})",
                    rental.copy_id, status
                )));
            }
        }

        let updated = sqlx::query_as::<_, Rental>(
            r#"
            UPDATE rentals
            SET copy_id = $1, reader_id = $2, rented_from = $3, rented_to = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(rental.copy_id)
        .bind(rental.reader_id)
        .bind(rental.rented_from)
        .bind(rental.rented_to)
        .bind(rental.id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE copies SET status = 'available' WHERE id = $1")
            .bind(previous_copy_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a rental and release its copy if it is still marked as rented
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let copy_id: i32 = sqlx::query_scalar("DELETE FROM rentals WHERE id = $1 RETURNING copy_id")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Rental with id {} not found", id)))?;

        sqlx::query("UPDATE copies SET status = 'available' WHERE id = $1 AND status = 'rented'")
            .bind(copy_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Count rentals whose due date has not passed yet
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rentals WHERE rented_to >= CURRENT_DATE")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl RentalLookup for RentalsRepository {
    async fn find(&self, id: i32) -> AppResult<Rental> {
        self.get_by_id(id).await
    }

    async fn exists(&self, id: i32) -> AppResult<bool> {
        RentalsRepository::exists(self, id).await
    }
}
