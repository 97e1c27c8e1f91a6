//! Domain services for the SMS Bank hive.
//!
//! Services contain the registry logic and operate on any [`HiveStore`].

pub mod device_registry;
pub mod memory;
pub mod profiles;
pub mod reconnect;
pub mod sms_log;
pub mod store;

pub use device_registry::DeviceRegistry;
pub use memory::InMemoryHiveStore;
pub use profiles::ProfileProvisioner;
pub use reconnect::persist_with_reconnect;
pub use sms_log::SmsLog;
pub use store::{HiveStore, StoreResult};
