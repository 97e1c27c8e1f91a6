//! SMS repository for database operations.

use chrono::Utc;
use sqlx::PgPool;

use crate::entities::SmsEntity;

/// Repository for SMS-related database operations.
#[derive(Clone)]
pub struct SmsRepository {
    pool: PgPool,
}

impl SmsRepository {
    /// Creates a new SmsRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// SMS owned by a device with the given inbox flag, newest first.
    pub async fn find_by_device(
        &self,
        device_ref: i64,
        inbox: bool,
    ) -> Result<Vec<SmsEntity>, sqlx::Error> {
        sqlx::query_as::<_, SmsEntity>(
            r#"
            SELECT id, recipient, message, inbox, date, device_ref
            FROM sms
            WHERE device_ref = $1 AND inbox = $2
            ORDER BY date DESC, id DESC
            "#,
        )
        .bind(device_ref)
        .bind(inbox)
        .fetch_all(&self.pool)
        .await
    }

    /// Insert an SMS stamped with the current time.
    pub async fn insert(
        &self,
        recipient: &str,
        message: &str,
        inbox: bool,
        device_ref: Option<i64>,
    ) -> Result<SmsEntity, sqlx::Error> {
        sqlx::query_as::<_, SmsEntity>(
            r#"
            INSERT INTO sms (recipient, message, inbox, date, device_ref)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, recipient, message, inbox, date, device_ref
            "#,
        )
        .bind(recipient)
        .bind(message)
        .bind(inbox)
        .bind(Utc::now())
        .bind(device_ref)
        .fetch_one(&self.pool)
        .await
    }

    /// Delete an SMS by id.
    /// Returns the number of rows deleted (0 or 1).
    pub async fn delete_by_id(&self, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM sms
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
