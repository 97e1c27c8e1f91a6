//! Storage abstraction for the hive.
//!
//! A `HiveStore` exposes the storage primitives the services need: get by
//! unique key, filtered listings, inserts, updates and deletes, plus
//! `reconnect` to replace a connection that went stale.

use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{CallForwarding, Device, DeviceList, NewDevice, Sms, SmsInput};

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait::async_trait]
pub trait HiveStore: Send + Sync {
    /// Find a device by its (ip, port) pair.
    async fn find_device_by_address(&self, ip: &str, port: u16) -> StoreResult<Option<Device>>;

    /// Find a device by row id.
    async fn find_device_by_id(&self, id: i64) -> StoreResult<Option<Device>>;

    /// Find a device by the external id reported by the GOIP daemon.
    async fn find_device_by_external_id(&self, device_id: &str) -> StoreResult<Option<Device>>;

    /// All devices, ordered by row id.
    async fn list_devices(&self) -> StoreResult<Vec<Device>>;

    /// Insert a device keyed by (ip, port), or return the existing row
    /// untouched. Must be atomic with respect to concurrent callers.
    async fn get_or_insert_device_by_address(
        &self,
        ip: &str,
        port: u16,
        online: bool,
    ) -> StoreResult<Device>;

    /// Insert a device keyed by its external id, or return the existing row
    /// untouched. A clash on (ip, port) with another device is a
    /// [`StoreError::Conflict`].
    async fn get_or_insert_device_by_external_id(&self, device: &NewDevice)
        -> StoreResult<Device>;

    /// Set the online flag. Returns `None` if the row does not exist.
    async fn set_device_online(&self, id: i64, online: bool) -> StoreResult<Option<Device>>;

    /// SMS rows owned by a device with the given inbox flag, newest first.
    async fn list_sms(&self, device_ref: i64, inbox: bool) -> StoreResult<Vec<Sms>>;

    async fn insert_sms(&self, sms: &SmsInput) -> StoreResult<Sms>;

    /// Delete an SMS by id. Returns the number of rows removed (0 or 1).
    async fn delete_sms(&self, id: i64) -> StoreResult<u64>;

    async fn insert_device_list(&self, user_id: Uuid) -> StoreResult<DeviceList>;

    async fn insert_call_forwarding(&self, user_id: Uuid) -> StoreResult<CallForwarding>;

    async fn list_device_lists(&self, user_id: Uuid) -> StoreResult<Vec<DeviceList>>;

    async fn list_call_forwardings(&self, user_id: Uuid) -> StoreResult<Vec<CallForwarding>>;

    /// Drop the current connection and open a fresh one.
    async fn reconnect(&self) -> StoreResult<()>;
}
