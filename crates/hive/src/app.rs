//! Hive wiring: one store shared by the registry, SMS log and profile
//! services.

use std::sync::Arc;

use domain::services::{DeviceRegistry, HiveStore, ProfileProvisioner, SmsLog};
use persistence::PgHiveStore;
use tracing::info;

use crate::config::Config;

/// The hive services bound to a single storage backend.
pub struct Hive<S: ?Sized = PgHiveStore> {
    store: Arc<S>,
    devices: DeviceRegistry<S>,
    sms: SmsLog<S>,
    profiles: ProfileProvisioner<S>,
}

impl<S: ?Sized> Clone for Hive<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            devices: self.devices.clone(),
            sms: self.sms.clone(),
            profiles: self.profiles.clone(),
        }
    }
}

impl<S: HiveStore + ?Sized> Hive<S> {
    /// Build the services over an existing store.
    pub fn from_store(store: Arc<S>) -> Self {
        Self {
            devices: DeviceRegistry::new(Arc::clone(&store)),
            sms: SmsLog::new(Arc::clone(&store)),
            profiles: ProfileProvisioner::new(Arc::clone(&store)),
            store,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn devices(&self) -> &DeviceRegistry<S> {
        &self.devices
    }

    pub fn sms(&self) -> &SmsLog<S> {
        &self.sms
    }

    pub fn profiles(&self) -> &ProfileProvisioner<S> {
        &self.profiles
    }
}

impl Hive<PgHiveStore> {
    /// Connect to PostgreSQL using the loaded configuration.
    pub async fn connect(config: &Config) -> Result<Self, sqlx::Error> {
        let store = PgHiveStore::connect((&config.database).into()).await?;
        info!(
            max_connections = config.database.max_connections,
            "Connected to database"
        );
        Ok(Self::from_store(Arc::new(store)))
    }

    /// Apply pending schema migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        let pool = self.store.pool().await;
        persistence::db::run_migrations(&pool).await
    }
}
