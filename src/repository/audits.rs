//! Rental audit trail storage (append-only)

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::audit::{AuditEvent, NewRentalAudit, RentalAudit},
    services::audit::AuditStore,
};

#[derive(Clone)]
pub struct AuditsRepository {
    pool: Pool<Postgres>,
}

impl AuditsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Audit records newest first, optionally for one rental and one event type
    pub async fn list(&self, rental_id: Option<i32>, event_type: Option<AuditEvent>) -> AppResult<Vec<RentalAudit>> {
        let audits = sqlx::query_as::<_, RentalAudit>(
            r#"
            SELECT * FROM rentals_audit
            WHERE ($1::INTEGER IS NULL OR rental_id = $1)
              AND ($2::TEXT IS NULL OR event_type = $2)
            ORDER BY event_date DESC, id DESC
            "#,
        )
        .bind(rental_id)
        .bind(event_type)
        .fetch_all(&self.pool)
        .await?;
        Ok(audits)
    }
}

#[async_trait]
impl AuditStore for AuditsRepository {
    async fn append(&self, record: NewRentalAudit) -> AppResult<RentalAudit> {
        let old = record.old_state();
        let new = record.new_state();

        let audit = sqlx::query_as::<_, RentalAudit>(
            r#"
            INSERT INTO rentals_audit (
                rental_id, event_type, event_date, aud_owner,
                old_copy_id, new_copy_id, old_reader_id, new_reader_id,
                old_rent_from, new_rent_from, old_return, new_return
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(record.rental_id())
        .bind(record.event())
        .bind(record.event_date())
        .bind(record.owner())
        .bind(old.map(|s| s.copy_id))
        .bind(new.map(|s| s.copy_id))
        .bind(old.map(|s| s.reader_id))
        .bind(new.map(|s| s.reader_id))
        .bind(old.map(|s| s.rent_from))
        .bind(new.map(|s| s.rent_from))
        .bind(old.map(|s| s.return_date))
        .bind(new.map(|s| s.return_date))
        .fetch_one(&self.pool)
        .await?;

        Ok(audit)
    }
}
