//! Profile entities (database row mappings).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the device_lists table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceListEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Database row mapping for the call_forwardings table.
#[derive(Debug, Clone, FromRow)]
pub struct CallForwardingEntity {
    pub id: i64,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<DeviceListEntity> for domain::models::DeviceList {
    fn from(entity: DeviceListEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            created_at: entity.created_at,
        }
    }
}

impl From<CallForwardingEntity> for domain::models::CallForwarding {
    fn from(entity: CallForwardingEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            created_at: entity.created_at,
        }
    }
}
