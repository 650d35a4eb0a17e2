//! Copies repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::copy::{Copy, CopyStatus},
};

#[derive(Clone)]
pub struct CopiesRepository {
    pool: Pool<Postgres>,
}

impl CopiesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All copies, optionally restricted to one status
    pub async fn list(&self, status: Option<CopyStatus>) -> AppResult<Vec<Copy>> {
        let copies = sqlx::query_as::<_, Copy>(
            "SELECT * FROM copies WHERE ($1::TEXT IS NULL OR status = $1) ORDER BY id",
        )
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }

    /// Copies of books with the given title, optionally restricted to one status
    pub async fn list_by_title(&self, title: &str, status: Option<CopyStatus>) -> AppResult<Vec<Copy>> {
        let copies = sqlx::query_as::<_, Copy>(
            r#"
            SELECT c.*
            FROM copies c
            JOIN books b ON c.book_id = b.id
            WHERE b.title = $1
              AND ($2::TEXT IS NULL OR c.status = $2)
            ORDER BY c.id
            "#,
        )
        .bind(title)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }

    /// Copies of a book, optionally restricted to one status
    pub async fn list_by_book(&self, book_id: i32, status: Option<CopyStatus>) -> AppResult<Vec<Copy>> {
        let copies = sqlx::query_as::<_, Copy>(
            r#"
            SELECT * FROM copies
            WHERE book_id = $1
              AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY id
            "#,
        )
        .bind(book_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(copies)
    }

    pub async fn count_by_book(&self, book_id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM copies WHERE book_id = $1")
            .bind(book_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Get copy by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Copy> {
        sqlx::query_as::<_, Copy>("SELECT * FROM copies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    pub async fn create(&self, book_id: i32, status: CopyStatus) -> AppResult<Copy> {
        let copy = sqlx::query_as::<_, Copy>(
            "INSERT INTO copies (book_id, status) VALUES ($1, $2) RETURNING *",
        )
        .bind(book_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(copy)
    }

    pub async fn update_status(&self, id: i32, status: CopyStatus) -> AppResult<Copy> {
        sqlx::query_as::<_, Copy>("UPDATE copies SET status = $1 WHERE id = $2 RETURNING *")
            .bind(status)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Copy with id {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM copies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Copy with id {} not found", id)));
        }
        Ok(())
    }

    /// Count copies, optionally only those with the given status
    pub async fn count(&self, status: Option<CopyStatus>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM copies WHERE ($1::TEXT IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }
}
