//! SMS Bank hive: device registry, SMS log and profile provisioning over
//! PostgreSQL.

pub mod app;
pub mod config;
pub mod logging;

pub use app::Hive;
