//! Device repository for database operations.

use chrono::Utc;
use sqlx::PgPool;

use crate::entities::DeviceEntity;

/// Repository for device-related database operations.
#[derive(Clone)]
pub struct DeviceRepository {
    pool: PgPool,
}

impl DeviceRepository {
    /// Creates a new DeviceRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a device by its (ip, port) pair.
    pub async fn find_by_address(
        &self,
        ip: &str,
        port: i32,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, device_id, ip, port, online, created_at, updated_at
            FROM devices
            WHERE ip = $1 AND port = $2
            "#,
        )
        .bind(ip)
        .bind(port)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a device by row id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, device_id, ip, port, online, created_at, updated_at
            FROM devices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Find a device by the external id reported by the GOIP daemon.
    pub async fn find_by_device_id(
        &self,
        device_id: &str,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, device_id, ip, port, online, created_at, updated_at
            FROM devices
            WHERE device_id = $1
            "#,
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// All devices ordered by id.
    pub async fn find_all(&self) -> Result<Vec<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            SELECT id, device_id, ip, port, online, created_at, updated_at
            FROM devices
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Insert a device by address, or return the existing row unchanged.
    ///
    /// A concurrent insert that commits between our statement snapshot and
    /// the conflict check yields no row from the CTE; the follow-up lookup
    /// picks it up.
    pub async fn get_or_insert_by_address(
        &self,
        ip: &str,
        port: i32,
        online: bool,
    ) -> Result<DeviceEntity, sqlx::Error> {
        let row = sqlx::query_as::<_, DeviceEntity>(
            r#"
            WITH inserted AS (
                INSERT INTO devices (ip, port, online, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $4)
                ON CONFLICT (ip, port) DO NOTHING
                RETURNING id, device_id, ip, port, online, created_at, updated_at
            )
            SELECT id, device_id, ip, port, online, created_at, updated_at FROM inserted
            UNION ALL
            SELECT id, device_id, ip, port, online, created_at, updated_at
            FROM devices
            WHERE ip = $1 AND port = $2
            LIMIT 1
            "#,
        )
        .bind(ip)
        .bind(port)
        .bind(online)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(device) => Ok(device),
            None => self
                .find_by_address(ip, port)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Insert a device keyed by external id, or return the existing row
    /// unchanged. A clash on (ip, port) surfaces as a unique violation.
    pub async fn get_or_insert_by_device_id(
        &self,
        device_id: &str,
        ip: &str,
        port: i32,
        online: bool,
    ) -> Result<DeviceEntity, sqlx::Error> {
        let row = sqlx::query_as::<_, DeviceEntity>(
            r#"
            WITH inserted AS (
                INSERT INTO devices (device_id, ip, port, online, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $5)
                ON CONFLICT (device_id) DO NOTHING
                RETURNING id, device_id, ip, port, online, created_at, updated_at
            )
            SELECT id, device_id, ip, port, online, created_at, updated_at FROM inserted
            UNION ALL
            SELECT id, device_id, ip, port, online, created_at, updated_at
            FROM devices
            WHERE device_id = $1
            LIMIT 1
            "#,
        )
        .bind(device_id)
        .bind(ip)
        .bind(port)
        .bind(online)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(device) => Ok(device),
            None => self
                .find_by_device_id(device_id)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Set the online flag. Returns `None` if no row has this id.
    pub async fn set_online(
        &self,
        id: i64,
        online: bool,
    ) -> Result<Option<DeviceEntity>, sqlx::Error> {
        sqlx::query_as::<_, DeviceEntity>(
            r#"
            UPDATE devices
            SET online = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, device_id, ip, port, online, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(online)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
    }
}
