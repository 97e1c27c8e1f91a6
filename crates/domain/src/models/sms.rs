//! SMS domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A sent or received SMS.
///
/// Rows are append-only; the only mutation is deletion by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sms {
    pub id: i64,
    pub recipient: String,
    pub message: String,
    /// `true` for received messages, `false` for sent ones.
    pub inbox: bool,
    pub date: DateTime<Utc>,
    /// Row id of the owning device, if any.
    pub device_ref: Option<i64>,
}

/// Request to record a new SMS.
///
/// `device_id` is the external id reported by the GOIP daemon. An id that
/// does not resolve to a known device leaves the SMS unbound.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSms {
    pub recipient: String,
    pub message: String,
    #[serde(default)]
    pub inbox: bool,
    #[serde(default)]
    pub device_id: Option<String>,
}

impl NewSms {
    pub fn outgoing(recipient: &str, message: &str) -> Self {
        Self {
            recipient: recipient.to_string(),
            message: message.to_string(),
            inbox: false,
            device_id: None,
        }
    }

    pub fn incoming(recipient: &str, message: &str) -> Self {
        Self {
            inbox: true,
            ..Self::outgoing(recipient, message)
        }
    }

    pub fn via_device(mut self, device_id: &str) -> Self {
        self.device_id = Some(device_id.to_string());
        self
    }
}

/// Storage-level insert for an SMS with its device already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsInput {
    pub recipient: String,
    pub message: String,
    pub inbox: bool,
    pub device_ref: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sms_defaults_to_outbox() {
        let sms = NewSms::outgoing("+1555", "hi");
        assert!(!sms.inbox);
        assert!(sms.device_id.is_none());
    }

    #[test]
    fn test_new_sms_incoming_via_device() {
        let sms = NewSms::incoming("+1555", "hello").via_device("GOIP-1");
        assert!(sms.inbox);
        assert_eq!(sms.device_id.as_deref(), Some("GOIP-1"));
        assert_eq!(sms.message, "hello");
    }

    #[test]
    fn test_new_sms_deserialize_with_defaults() {
        let sms: NewSms =
            serde_json::from_str(r#"{"recipient":"+1555","message":"hi"}"#).unwrap();
        assert!(!sms.inbox);
        assert!(sms.device_id.is_none());
    }

    #[test]
    fn test_sms_serialization() {
        let sms = Sms {
            id: 1,
            recipient: "+1555".to_string(),
            message: "hi".to_string(),
            inbox: false,
            date: Utc::now(),
            device_ref: Some(3),
        };
        let json = serde_json::to_value(&sms).unwrap();
        assert_eq!(json["deviceRef"], 3);
        assert_eq!(json["inbox"], false);
    }
}
