//! Domain layer for the SMS Bank hive.
//!
//! This crate contains:
//! - Domain models (Device, Sms, DeviceList, CallForwarding)
//! - The `HiveStore` storage abstraction and an in-memory implementation
//! - Registry, SMS log and profile provisioning services
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::{HiveError, StoreError};
