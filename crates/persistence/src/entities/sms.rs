//! SMS entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the sms table.
#[derive(Debug, Clone, FromRow)]
pub struct SmsEntity {
    pub id: i64,
    pub recipient: String,
    pub message: String,
    pub inbox: bool,
    pub date: DateTime<Utc>,
    pub device_ref: Option<i64>,
}

impl From<SmsEntity> for domain::models::Sms {
    fn from(entity: SmsEntity) -> Self {
        Self {
            id: entity.id,
            recipient: entity.recipient,
            message: entity.message,
            inbox: entity.inbox,
            date: entity.date,
            device_ref: entity.device_ref,
        }
    }
}
