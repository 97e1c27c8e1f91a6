//! Device domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A GSM gateway endpoint known to the hive.
///
/// Devices created through the GOIP daemon carry an external `device_id`;
/// devices discovered by address alone do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    pub device_id: Option<String>,
    pub ip: String,
    pub port: u16,
    pub online: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Device {
    /// Network address in `ip:port` form.
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }
}

/// Values for a device row that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    pub device_id: Option<String>,
    pub ip: String,
    pub port: u16,
    pub online: bool,
}

impl NewDevice {
    /// A device reported by the GOIP daemon.
    pub fn from_daemon(device_id: &str, ip: &str, port: u16, online: bool) -> Self {
        Self {
            device_id: Some(device_id.to_string()),
            ip: ip.to_string(),
            port,
            online,
        }
    }

    /// A device known only by its network address.
    pub fn at_address(ip: &str, port: u16, online: bool) -> Self {
        Self {
            device_id: None,
            ip: ip.to_string(),
            port,
            online,
        }
    }
}

/// Device summary for registry listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSummary {
    pub id: i64,
    pub device_id: Option<String>,
    pub address: String,
    pub online: bool,
}

impl From<Device> for DeviceSummary {
    fn from(device: Device) -> Self {
        Self {
            address: device.address(),
            id: device.id,
            device_id: device.device_id,
            online: device.online,
        }
    }
}
