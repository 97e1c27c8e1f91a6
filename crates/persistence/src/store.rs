//! PostgreSQL implementation of the hive storage abstraction.
//!
//! The pool sits behind a lock so `reconnect` can swap it for a fresh one.
//! Every call clones the current pool handle and releases the lock before
//! touching the database.

use domain::models::{CallForwarding, Device, DeviceList, NewDevice, Sms, SmsInput};
use domain::services::{HiveStore, StoreResult};
use sqlx::PgPool;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::db::{create_lazy_pool, create_pool, DatabaseConfig};
use crate::metrics::QueryTimer;
use crate::repositories::{DeviceRepository, ProfileRepository, SmsRepository};

/// `HiveStore` backed by a PostgreSQL connection pool.
pub struct PgHiveStore {
    config: DatabaseConfig,
    pool: RwLock<PgPool>,
}

impl PgHiveStore {
    /// Connect using the given configuration.
    pub async fn connect(config: DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = create_pool(&config).await?;
        Ok(Self::with_pool(config, pool))
    }

    /// Wrap an existing pool. `config` is used to build replacement pools.
    pub fn with_pool(config: DatabaseConfig, pool: PgPool) -> Self {
        Self {
            config,
            pool: RwLock::new(pool),
        }
    }

    /// Handle to the current pool.
    pub async fn pool(&self) -> PgPool {
        self.pool.read().await.clone()
    }

    async fn devices(&self) -> DeviceRepository {
        DeviceRepository::new(self.pool().await)
    }

    async fn sms(&self) -> SmsRepository {
        SmsRepository::new(self.pool().await)
    }

    async fn profiles(&self) -> ProfileRepository {
        ProfileRepository::new(self.pool().await)
    }
}

#[async_trait::async_trait]
impl HiveStore for PgHiveStore {
    async fn find_device_by_address(&self, ip: &str, port: u16) -> StoreResult<Option<Device>> {
        let repo = self.devices().await;
        let row = QueryTimer::time(
            "find_device_by_address",
            repo.find_by_address(ip, i32::from(port)),
        )
        .await?;
        Ok(row.map(Device::from))
    }

    async fn find_device_by_id(&self, id: i64) -> StoreResult<Option<Device>> {
        let repo = self.devices().await;
        let row = QueryTimer::time("find_device_by_id", repo.find_by_id(id)).await?;
        Ok(row.map(Device::from))
    }

    async fn find_device_by_external_id(&self, device_id: &str) -> StoreResult<Option<Device>> {
        let repo = self.devices().await;
        let row = QueryTimer::time(
            "find_device_by_external_id",
            repo.find_by_device_id(device_id),
        )
        .await?;
        Ok(row.map(Device::from))
    }

    async fn list_devices(&self) -> StoreResult<Vec<Device>> {
        let repo = self.devices().await;
        let rows = QueryTimer::time("list_devices", repo.find_all()).await?;
        Ok(rows.into_iter().map(Device::from).collect())
    }

    async fn get_or_insert_device_by_address(
        &self,
        ip: &str,
        port: u16,
        online: bool,
    ) -> StoreResult<Device> {
        let repo = self.devices().await;
        let row = QueryTimer::time(
            "get_or_insert_device_by_address",
            repo.get_or_insert_by_address(ip, i32::from(port), online),
        )
        .await?;
        Ok(row.into())
    }

    async fn get_or_insert_device_by_external_id(
        &self,
        device: &NewDevice,
    ) -> StoreResult<Device> {
        let Some(device_id) = device.device_id.as_deref() else {
            return self
                .get_or_insert_device_by_address(&device.ip, device.port, device.online)
                .await;
        };

        let repo = self.devices().await;
        let row = QueryTimer::time(
            "get_or_insert_device_by_external_id",
            repo.get_or_insert_by_device_id(
                device_id,
                &device.ip,
                i32::from(device.port),
                device.online,
            ),
        )
        .await?;
        Ok(row.into())
    }

    async fn set_device_online(&self, id: i64, online: bool) -> StoreResult<Option<Device>> {
        let repo = self.devices().await;
        let row = QueryTimer::time("set_device_online", repo.set_online(id, online)).await?;
        Ok(row.map(Device::from))
    }

    async fn list_sms(&self, device_ref: i64, inbox: bool) -> StoreResult<Vec<Sms>> {
        let repo = self.sms().await;
        let rows = QueryTimer::time("list_sms", repo.find_by_device(device_ref, inbox)).await?;
        Ok(rows.into_iter().map(Sms::from).collect())
    }

    async fn insert_sms(&self, sms: &SmsInput) -> StoreResult<Sms> {
        let repo = self.sms().await;
        let row = QueryTimer::time(
            "insert_sms",
            repo.insert(&sms.recipient, &sms.message, sms.inbox, sms.device_ref),
        )
        .await?;
        Ok(row.into())
    }

    async fn delete_sms(&self, id: i64) -> StoreResult<u64> {
        let repo = self.sms().await;
        Ok(QueryTimer::time("delete_sms", repo.delete_by_id(id)).await?)
    }

    async fn insert_device_list(&self, user_id: Uuid) -> StoreResult<DeviceList> {
        let repo = self.profiles().await;
        let row = QueryTimer::time("insert_device_list", repo.insert_device_list(user_id)).await?;
        Ok(row.into())
    }

    async fn insert_call_forwarding(&self, user_id: Uuid) -> StoreResult<CallForwarding> {
        let repo = self.profiles().await;
        let row = QueryTimer::time(
            "insert_call_forwarding",
            repo.insert_call_forwarding(user_id),
        )
        .await?;
        Ok(row.into())
    }

    async fn list_device_lists(&self, user_id: Uuid) -> StoreResult<Vec<DeviceList>> {
        let repo = self.profiles().await;
        let rows = QueryTimer::time("list_device_lists", repo.find_device_lists(user_id)).await?;
        Ok(rows.into_iter().map(DeviceList::from).collect())
    }

    async fn list_call_forwardings(&self, user_id: Uuid) -> StoreResult<Vec<CallForwarding>> {
        let repo = self.profiles().await;
        let rows = QueryTimer::time(
            "list_call_forwardings",
            repo.find_call_forwardings(user_id),
        )
        .await?;
        Ok(rows.into_iter().map(CallForwarding::from).collect())
    }

    async fn reconnect(&self) -> StoreResult<()> {
        let fresh = create_lazy_pool(&self.config)?;
        let stale = {
            let mut current = self.pool.write().await;
            std::mem::replace(&mut *current, fresh)
        };
        stale.close().await;

        info!("Database pool reopened");
        Ok(())
    }
}
