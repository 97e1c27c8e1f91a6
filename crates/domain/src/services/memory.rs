//! In-memory `HiveStore` for development and testing.
//!
//! Enforces the same uniqueness rules as the PostgreSQL schema and can
//! simulate stale connections on writes.

use std::io;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::store::{HiveStore, StoreResult};
use crate::error::StoreError;
use crate::models::{CallForwarding, Device, DeviceList, NewDevice, Sms, SmsInput};

#[derive(Debug, Default)]
struct State {
    devices: Vec<Device>,
    sms: Vec<Sms>,
    device_lists: Vec<DeviceList>,
    call_forwardings: Vec<CallForwarding>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_device(&mut self, device: &NewDevice) -> StoreResult<Device> {
        if self
            .devices
            .iter()
            .any(|d| d.ip == device.ip && d.port == device.port)
        {
            return Err(StoreError::Conflict(format!(
                "device address {}:{} already registered",
                device.ip, device.port
            )));
        }

        let now = Utc::now();
        let row = Device {
            id: self.next_id(),
            device_id: device.device_id.clone(),
            ip: device.ip.clone(),
            port: device.port,
            online: device.online,
            created_at: now,
            updated_at: now,
        };
        self.devices.push(row.clone());
        Ok(row)
    }
}

/// Mock store keeping all rows in process memory.
#[derive(Debug, Default)]
pub struct InMemoryHiveStore {
    state: Mutex<State>,
    stale_writes: AtomicU32,
    writes: AtomicU64,
    reconnects: AtomicU64,
}

impl InMemoryHiveStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` write attempts fail with a stale connection.
    pub fn fail_next_writes(&self, count: u32) {
        self.stale_writes.store(count, Ordering::SeqCst);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Number of times `reconnect` was called.
    pub fn reconnect_count(&self) -> u64 {
        self.reconnects.load(Ordering::SeqCst)
    }

    pub async fn device_count(&self) -> usize {
        self.state.lock().await.devices.len()
    }

    pub async fn sms_count(&self) -> usize {
        self.state.lock().await.sms.len()
    }

    /// Consume one injected failure, if any are pending.
    fn begin_write(&self) -> StoreResult<()> {
        let injected = self
            .stale_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        if injected {
            tracing::debug!("In-memory store simulating stale connection");
            return Err(StoreError::StaleConnection(sqlx::Error::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "connection closed after fork",
            ))));
        }
        Ok(())
    }

    fn commit_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl HiveStore for InMemoryHiveStore {
    async fn find_device_by_address(&self, ip: &str, port: u16) -> StoreResult<Option<Device>> {
        let state = self.state.lock().await;
        Ok(state
            .devices
            .iter()
            .find(|d| d.ip == ip && d.port == port)
            .cloned())
    }

    async fn find_device_by_id(&self, id: i64) -> StoreResult<Option<Device>> {
        let state = self.state.lock().await;
        Ok(state.devices.iter().find(|d| d.id == id).cloned())
    }

    async fn find_device_by_external_id(&self, device_id: &str) -> StoreResult<Option<Device>> {
        let state = self.state.lock().await;
        Ok(state
            .devices
            .iter()
            .find(|d| d.device_id.as_deref() == Some(device_id))
            .cloned())
    }

    async fn list_devices(&self) -> StoreResult<Vec<Device>> {
        let state = self.state.lock().await;
        Ok(state.devices.clone())
    }

    async fn get_or_insert_device_by_address(
        &self,
        ip: &str,
        port: u16,
        online: bool,
    ) -> StoreResult<Device> {
        self.begin_write()?;
        let mut state = self.state.lock().await;

        if let Some(existing) = state.devices.iter().find(|d| d.ip == ip && d.port == port) {
            return Ok(existing.clone());
        }

        let device = state.insert_device(&NewDevice::at_address(ip, port, online))?;
        self.commit_write();
        Ok(device)
    }

    async fn get_or_insert_device_by_external_id(
        &self,
        device: &NewDevice,
    ) -> StoreResult<Device> {
        self.begin_write()?;
        let mut state = self.state.lock().await;

        if let Some(existing) = state
            .devices
            .iter()
            .find(|d| d.device_id.is_some() && d.device_id == device.device_id)
        {
            return Ok(existing.clone());
        }

        let device = state.insert_device(device)?;
        self.commit_write();
        Ok(device)
    }

    async fn set_device_online(&self, id: i64, online: bool) -> StoreResult<Option<Device>> {
        self.begin_write()?;
        let mut state = self.state.lock().await;

        let Some(device) = state.devices.iter_mut().find(|d| d.id == id) else {
            return Ok(None);
        };
        device.online = online;
        device.updated_at = Utc::now();
        let updated = device.clone();
        self.commit_write();
        Ok(Some(updated))
    }

    async fn list_sms(&self, device_ref: i64, inbox: bool) -> StoreResult<Vec<Sms>> {
        let state = self.state.lock().await;
        let mut rows: Vec<Sms> = state
            .sms
            .iter()
            .filter(|s| s.device_ref == Some(device_ref) && s.inbox == inbox)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn insert_sms(&self, sms: &SmsInput) -> StoreResult<Sms> {
        self.begin_write()?;
        let mut state = self.state.lock().await;

        let row = Sms {
            id: state.next_id(),
            recipient: sms.recipient.clone(),
            message: sms.message.clone(),
            inbox: sms.inbox,
            date: Utc::now(),
            device_ref: sms.device_ref,
        };
        state.sms.push(row.clone());
        self.commit_write();
        Ok(row)
    }

    async fn delete_sms(&self, id: i64) -> StoreResult<u64> {
        self.begin_write()?;
        let mut state = self.state.lock().await;

        let before = state.sms.len();
        state.sms.retain(|s| s.id != id);
        let removed = (before - state.sms.len()) as u64;
        if removed > 0 {
            self.commit_write();
        }
        Ok(removed)
    }

    async fn insert_device_list(&self, user_id: Uuid) -> StoreResult<DeviceList> {
        self.begin_write()?;
        let mut state = self.state.lock().await;

        let row = DeviceList {
            id: state.next_id(),
            user_id,
            created_at: Utc::now(),
        };
        state.device_lists.push(row.clone());
        self.commit_write();
        Ok(row)
    }

    async fn insert_call_forwarding(&self, user_id: Uuid) -> StoreResult<CallForwarding> {
        self.begin_write()?;
        let mut state = self.state.lock().await;

        let row = CallForwarding {
            id: state.next_id(),
            user_id,
            created_at: Utc::now(),
        };
        state.call_forwardings.push(row.clone());
        self.commit_write();
        Ok(row)
    }

    async fn list_device_lists(&self, user_id: Uuid) -> StoreResult<Vec<DeviceList>> {
        let state = self.state.lock().await;
        Ok(state
            .device_lists
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_call_forwardings(&self, user_id: Uuid) -> StoreResult<Vec<CallForwarding>> {
        let state = self.state.lock().await;
        Ok(state
            .call_forwardings
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn reconnect(&self) -> StoreResult<()> {
        self.reconnects.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
