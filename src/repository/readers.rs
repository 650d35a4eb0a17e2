//! Readers repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::reader::{CreateReader, Reader},
};

#[derive(Clone)]
pub struct ReadersRepository {
    pool: Pool<Postgres>,
}

impl ReadersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Reader>> {
        let readers = sqlx::query_as::<_, Reader>("SELECT * FROM readers ORDER BY lastname, firstname")
            .fetch_all(&self.pool)
            .await?;
        Ok(readers)
    }

    /// Get reader by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Reader> {
        sqlx::query_as::<_, Reader>("SELECT * FROM readers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Reader with id {} not found", id)))
    }

    pub async fn create(&self, reader: &CreateReader) -> AppResult<Reader> {
        let reader = sqlx::query_as::<_, Reader>(
            r#"
            INSERT INTO readers (firstname, lastname, email)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&reader.firstname)
        .bind(&reader.lastname)
        .bind(&reader.email)
        .fetch_one(&self.pool)
        .await?;
        Ok(reader)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM readers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Reader with id {} not found", id)));
        }
        Ok(())
    }

    /// Whether the reader still has rentals on record
    pub async fn has_rentals(&self, id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM rentals WHERE reader_id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }
}
