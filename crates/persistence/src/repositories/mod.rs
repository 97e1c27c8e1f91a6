//! Repository implementations for database operations.

pub mod device;
pub mod profile;
pub mod sms;

pub use device::DeviceRepository;
pub use profile::ProfileRepository;
pub use sms::SmsRepository;
