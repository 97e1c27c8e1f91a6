//! Per-user profile models.
//!
//! Profiles are attached to a user owned by the surrounding application;
//! the hive only knows the user's id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque reference to an application user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    pub id: Uuid,
}

impl UserRef {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// The user's device list profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceList {
    pub id: i64,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// The user's call forwarding profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallForwarding {
    pub id: i64,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// All profile rows attached to one user.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfiles {
    pub device_lists: Vec<DeviceList>,
    pub call_forwardings: Vec<CallForwarding>,
}

impl UserProfiles {
    /// True if the user has at least one of each profile.
    pub fn is_provisioned(&self) -> bool {
        !self.device_lists.is_empty() && !self.call_forwardings.is_empty()
    }
}
