//! Domain models for the SMS Bank hive.

pub mod device;
pub mod profile;
pub mod sms;

pub use device::{Device, DeviceSummary, NewDevice};
pub use profile::{CallForwarding, DeviceList, UserProfiles, UserRef};
pub use sms::{NewSms, Sms, SmsInput};
