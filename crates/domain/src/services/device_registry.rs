//! Device registry service.
//!
//! Devices are looked up by address, row id or the GOIP daemon's external
//! id, and created on first sighting. The registry never deletes devices.

use std::sync::Arc;

use tracing::{debug, info};

use super::reconnect::persist_with_reconnect;
use super::store::HiveStore;
use crate::error::{HiveError, StoreError};
use crate::models::{Device, DeviceSummary, NewDevice};

/// Lookup-or-create access to registered GSM devices.
pub struct DeviceRegistry<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for DeviceRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: HiveStore + ?Sized> DeviceRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Find the device registered at `ip:port`.
    pub async fn find(&self, ip: &str, port: u16) -> Result<Option<Device>, HiveError> {
        debug!(ip = %ip, port = port, "Looking up device by address");
        Ok(self.store.find_device_by_address(ip, port).await?)
    }

    /// Return the device at `ip:port`, creating it with `online = status` if
    /// it does not exist yet. An existing device keeps its stored status.
    pub async fn get_or_create(
        &self,
        ip: &str,
        port: u16,
        status: bool,
    ) -> Result<Device, HiveError> {
        if let Some(device) = self.store.find_device_by_address(ip, port).await? {
            return Ok(device);
        }

        let device = self
            .store
            .get_or_insert_device_by_address(ip, port, status)
            .await?;
        debug!(
            id = device.id,
            address = %device.address(),
            online = device.online,
            "Device resolved by address"
        );
        Ok(device)
    }

    /// Find a device by row id.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Device>, HiveError> {
        Ok(self.store.find_device_by_id(id).await?)
    }

    /// Find a device by the external id reported by the GOIP daemon.
    pub async fn find_by_external_id(&self, device_id: &str) -> Result<Option<Device>, HiveError> {
        debug!(device_id = %device_id, "Looking up device by external id");
        Ok(self.store.find_device_by_external_id(device_id).await?)
    }

    /// Register a device reported by the GOIP daemon.
    ///
    /// An already registered `device_id` is returned as stored; its status
    /// is not touched. The insert is retried once on a fresh connection if
    /// the first attempt hits a stale one.
    pub async fn register_from_daemon(
        &self,
        device_id: &str,
        ip: &str,
        port: u16,
        online: bool,
    ) -> Result<Device, HiveError> {
        if let Some(device) = self.store.find_device_by_external_id(device_id).await? {
            return Ok(device);
        }

        let new_device = NewDevice::from_daemon(device_id, ip, port, online);
        let store = self.store.as_ref();
        let draft = &new_device;

        let device = persist_with_reconnect(store, "register_device", move || {
            store.get_or_insert_device_by_external_id(draft)
        })
        .await
        .map_err(|err| match err {
            StoreError::Conflict(_) => HiveError::Conflict(format!(
                "address {}:{} is registered to another device",
                ip, port
            )),
            other => HiveError::Store(other),
        })?;

        info!(
            id = device.id,
            device_id = %device_id,
            address = %device.address(),
            online = device.online,
            "Device registered from daemon"
        );
        Ok(device)
    }

    /// Set the online flag of a daemon-registered device.
    ///
    /// Unknown devices are ignored: no write happens and `None` is returned.
    pub async fn update_status(
        &self,
        device_id: &str,
        online: bool,
    ) -> Result<Option<Device>, HiveError> {
        let Some(device) = self.store.find_device_by_external_id(device_id).await? else {
            debug!(device_id = %device_id, "Status update for unknown device ignored");
            return Ok(None);
        };

        let updated = self.store.set_device_online(device.id, online).await?;
        if updated.is_some() {
            info!(device_id = %device_id, online = online, "Device status updated");
        }
        Ok(updated)
    }

    /// All registered devices, ordered by row id.
    pub async fn list_devices(&self) -> Result<Vec<Device>, HiveError> {
        Ok(self.store.list_devices().await?)
    }

    /// Registry listing in summary form, ordered by row id.
    pub async fn list_summaries(&self) -> Result<Vec<DeviceSummary>, HiveError> {
        let devices = self.store.list_devices().await?;
        Ok(devices.into_iter().map(DeviceSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryHiveStore;

    fn registry() -> (Arc<InMemoryHiveStore>, DeviceRegistry<InMemoryHiveStore>) {
        let store = Arc::new(InMemoryHiveStore::new());
        (store.clone(), DeviceRegistry::new(store))
    }

    #[tokio::test]
    async fn test_find_missing_device_returns_none() {
        let (_, registry) = registry();
        assert!(registry.find("10.0.0.5", 5038).await.unwrap().is_none());
        assert!(registry.find_by_id(1).await.unwrap().is_none());
        assert!(registry.find_by_external_id("GOIP-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let (store, registry) = registry();

        let first = registry.get_or_create("10.0.0.5", 5038, true).await.unwrap();
        let second = registry.get_or_create("10.0.0.5", 5038, false).await.unwrap();

        assert_eq!(first.id, second.id);
        assert!(second.online);
        assert_eq!(store.device_count().await, 1);
    }

    #[tokio::test]
    async fn test_get_or_create_uses_given_status() {
        let (_, registry) = registry();
        let device = registry.get_or_create("10.0.0.7", 5038, false).await.unwrap();
        assert!(!device.online);
        assert!(device.device_id.is_none());

        let found = registry.find("10.0.0.7", 5038).await.unwrap().unwrap();
        assert_eq!(found.id, device.id);
    }

    #[tokio::test]
    async fn test_register_twice_creates_one_row() {
        let (store, registry) = registry();

        let first = registry
            .register_from_daemon("GOIP-1", "10.0.0.5", 5038, true)
            .await
            .unwrap();
        let second = registry
            .register_from_daemon("GOIP-1", "10.0.0.5", 5038, true)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.device_count().await, 1);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_register_update_register_scenario() {
        let (_, registry) = registry();

        let d1 = registry
            .register_from_daemon("GOIP-1", "10.0.0.5", 5038, true)
            .await
            .unwrap();
        assert!(d1.online);
        assert_eq!(d1.device_id.as_deref(), Some("GOIP-1"));

        let updated = registry.update_status("GOIP-1", false).await.unwrap().unwrap();
        assert_eq!(updated.id, d1.id);
        assert!(!updated.online);

        let again = registry
            .register_from_daemon("GOIP-1", "10.0.0.5", 5038, true)
            .await
            .unwrap();
        assert_eq!(again.id, d1.id);
        assert!(!again.online);
    }

    #[tokio::test]
    async fn test_update_status_unknown_device_is_noop() {
        let (store, registry) = registry();

        let result = registry.update_status("UNKNOWN", true).await.unwrap();

        assert!(result.is_none());
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_register_retries_once_on_stale_connection() {
        let (store, registry) = registry();
        store.fail_next_writes(1);

        let device = registry
            .register_from_daemon("GOIP-1", "10.0.0.5", 5038, true)
            .await
            .unwrap();

        assert_eq!(device.device_id.as_deref(), Some("GOIP-1"));
        assert_eq!(store.reconnect_count(), 1);
        assert_eq!(store.device_count().await, 1);
    }

    #[tokio::test]
    async fn test_register_second_stale_failure_propagates() {
        let (store, registry) = registry();
        store.fail_next_writes(2);

        let err = registry
            .register_from_daemon("GOIP-1", "10.0.0.5", 5038, true)
            .await
            .unwrap_err();

        assert!(err.is_stale_connection());
        assert_eq!(store.reconnect_count(), 1);
        assert_eq!(store.device_count().await, 0);
    }

    #[tokio::test]
    async fn test_register_address_clash_is_conflict() {
        let (store, registry) = registry();
        registry.get_or_create("10.0.0.5", 5038, true).await.unwrap();

        let err = registry
            .register_from_daemon("GOIP-1", "10.0.0.5", 5038, true)
            .await
            .unwrap_err();

        assert!(matches!(err, HiveError::Conflict(_)));
        assert_eq!(store.reconnect_count(), 0);
        assert_eq!(store.device_count().await, 1);
    }

    #[tokio::test]
    async fn test_get_or_create_returns_row_inserted_elsewhere() {
        let (store, registry) = registry();
        let existing = store
            .get_or_insert_device_by_address("10.0.0.5", 5038, false)
            .await
            .unwrap();

        let device = registry.get_or_create("10.0.0.5", 5038, true).await.unwrap();

        assert_eq!(device.id, existing.id);
        assert!(!device.online);
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn test_list_summaries() {
        let (_, registry) = registry();
        registry.get_or_create("10.0.0.5", 5038, true).await.unwrap();
        registry
            .register_from_daemon("GOIP-2", "10.0.0.6", 5060, false)
            .await
            .unwrap();

        let summaries = registry.list_summaries().await.unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].address, "10.0.0.5:5038");
        assert!(summaries[0].device_id.is_none());
        assert_eq!(summaries[1].device_id.as_deref(), Some("GOIP-2"));
        assert!(!summaries[1].online);
    }

    #[tokio::test]
    async fn test_list_devices_in_id_order() {
        let (_, registry) = registry();
        registry.get_or_create("10.0.0.5", 5038, true).await.unwrap();
        registry
            .register_from_daemon("GOIP-2", "10.0.0.6", 5038, false)
            .await
            .unwrap();

        let devices = registry.list_devices().await.unwrap();
        assert_eq!(devices.len(), 2);
        assert!(devices[0].id < devices[1].id);
    }
}
