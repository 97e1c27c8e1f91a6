//! Device entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the devices table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceEntity {
    pub id: i64,
    pub device_id: Option<String>,
    pub ip: String,
    pub port: i32,
    pub online: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DeviceEntity> for domain::models::Device {
    fn from(entity: DeviceEntity) -> Self {
        Self {
            id: entity.id,
            device_id: entity.device_id,
            ip: entity.ip,
            // Range is enforced by the table's CHECK constraint.
            port: entity.port as u16,
            online: entity.online,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
