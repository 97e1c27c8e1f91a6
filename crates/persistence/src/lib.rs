//! Persistence layer for the SMS Bank hive.
//!
//! This crate contains:
//! - Database connection management
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - `PgHiveStore`, the PostgreSQL implementation of `domain::services::HiveStore`

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod store;

pub use store::PgHiveStore;
