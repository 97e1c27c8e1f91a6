//! SMS log service.
//!
//! SMS rows are append-only. They are listed per device and inbox flag,
//! newest first, and removed only by explicit id.

use std::sync::Arc;

use tracing::{debug, info};

use super::reconnect::persist_with_reconnect;
use super::store::HiveStore;
use crate::error::HiveError;
use crate::models::{Device, NewSms, Sms, SmsInput};

/// Read/append access to sent and received SMS.
pub struct SmsLog<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for SmsLog<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: HiveStore + ?Sized> SmsLog<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// SMS owned by `device` with the given inbox flag, newest first.
    pub async fn list(&self, device: &Device, inbox: bool) -> Result<Vec<Sms>, HiveError> {
        Ok(self.store.list_sms(device.id, inbox).await?)
    }

    /// Delete an SMS by id. Deleting a missing id is not an error.
    pub async fn delete_by_id(&self, id: i64) -> Result<u64, HiveError> {
        let removed = self.store.delete_sms(id).await?;
        debug!(sms_id = id, removed = removed, "SMS delete");
        Ok(removed)
    }

    /// Record a new SMS.
    ///
    /// The external `device_id`, if given, is resolved to a device row; an
    /// unknown or empty id leaves the SMS without a device. The insert is retried
    /// once on a fresh connection if the first attempt hits a stale one.
    pub async fn create(&self, sms: NewSms) -> Result<Sms, HiveError> {
        let device_ref = match sms.device_id.as_deref().filter(|id| !id.is_empty()) {
            Some(device_id) => {
                let device = self.store.find_device_by_external_id(device_id).await?;
                if device.is_none() {
                    debug!(device_id = %device_id, "SMS device not registered, storing unbound");
                }
                device.map(|d| d.id)
            }
            None => None,
        };

        let input = SmsInput {
            recipient: sms.recipient,
            message: sms.message,
            inbox: sms.inbox,
            device_ref,
        };
        let store = self.store.as_ref();
        let draft = &input;

        let created =
            persist_with_reconnect(store, "create_sms", move || store.insert_sms(draft)).await?;

        info!(
            sms_id = created.id,
            inbox = created.inbox,
            device_ref = ?created.device_ref,
            "SMS recorded"
        );
        Ok(created)
    }
}
