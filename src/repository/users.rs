//! Staff users repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{AccountType, User},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY login")
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    pub async fn get_by_login(&self, login: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE login = $1")
            .bind(login)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Create a user with an already hashed password
    pub async fn create(
        &self,
        login: &str,
        password_hash: &str,
        account_type: AccountType,
        email: Option<&str>,
    ) -> AppResult<User> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE login = $1)")
            .bind(login)
            .fetch_one(&self.pool)
            .await?;

        if exists {
            return Err(AppError::Conflict(format!("Login {} is already taken", login)));
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (login, password, account_type, email)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(login)
        .bind(password_hash)
        .bind(account_type)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("User with id {} not found", id)));
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
