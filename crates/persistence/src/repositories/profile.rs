//! Profile repository for database operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{CallForwardingEntity, DeviceListEntity};

/// Repository for per-user device list and call forwarding profiles.
#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    /// Creates a new ProfileRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_device_list(&self, user_id: Uuid) -> Result<DeviceListEntity, sqlx::Error> {
        sqlx::query_as::<_, DeviceListEntity>(
            r#"
            INSERT INTO device_lists (user_id, created_at)
            VALUES ($1, $2)
            RETURNING id, user_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    pub async fn insert_call_forwarding(
        &self,
        user_id: Uuid,
    ) -> Result<CallForwardingEntity, sqlx::Error> {
        sqlx::query_as::<_, CallForwardingEntity>(
            r#"
            INSERT INTO call_forwardings (user_id, created_at)
            VALUES ($1, $2)
            RETURNING id, user_id, created_at
            "#,
        )
        .bind(user_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
    }

    pub async fn find_device_lists(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<DeviceListEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceListEntity>(
            r#"
            SELECT id, user_id, created_at
            FROM device_lists
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_call_forwardings(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<CallForwardingEntity>, sqlx::Error> {
        sqlx::query_as::<_, CallForwardingEntity>(
            r#"
            SELECT id, user_id, created_at
            FROM call_forwardings
            WHERE user_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
