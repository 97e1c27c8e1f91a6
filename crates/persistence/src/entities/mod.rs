//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod device;
pub mod profile;
pub mod sms;

pub use device::DeviceEntity;
pub use profile::{CallForwardingEntity, DeviceListEntity};
pub use sms::SmsEntity;
