use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;
use std::fmt;

/// Notification request as published on the notification queue.
///
/// The body is carried as raw JSON and written back out byte for byte, so the request
/// forwarded to the notification service is exactly the one that arrived. No field is
/// required; `recipient()` and `message()` only peek at the usual fields for logging.
#[derive(Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationRequest(Box<RawValue>);

#[derive(Deserialize)]
struct KnownFields {
    #[serde(default)]
    recipient: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl NotificationRequest {
    /// Wrap a JSON document without interpreting it
    pub fn from_json(raw: impl Into<String>) -> Result<Self, serde_json::Error> {
        RawValue::from_string(raw.into()).map(Self)
    }

    pub fn as_json(&self) -> &str {
        self.0.get()
    }

    pub fn recipient(&self) -> Option<String> {
        self.known_fields().and_then(|f| f.recipient)
    }

    pub fn message(&self) -> Option<String> {
        self.known_fields().and_then(|f| f.message)
    }

    fn known_fields(&self) -> Option<KnownFields> {
        serde_json::from_str(self.0.get()).ok()
    }
}

impl PartialEq for NotificationRequest {
    fn eq(&self, other: &Self) -> bool {
        self.as_json() == other.as_json()
    }
}

impl Eq for NotificationRequest {}

impl fmt::Debug for NotificationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NotificationRequest")
            .field(&self.as_json())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_is_reencoded_byte_for_byte() {
        let raw = r#"{"recipient":"a","message":"b","amount":12345678901234567890123,"z":1,"a":2}"#;

        let request: NotificationRequest = serde_json::from_str(raw).unwrap();
        assert_eq!(request.as_json(), raw);
        assert_eq!(serde_json::to_string(&request).unwrap(), raw);
    }

    #[test]
    fn test_request_without_recipient_is_accepted() {
        let raw = r#"{"toCustomerId":1,"toCustomerName":"Ann","message":"hi"}"#;

        let request: NotificationRequest = serde_json::from_slice(raw.as_bytes()).unwrap();
        assert_eq!(request.recipient(), None);
        assert_eq!(request.message().as_deref(), Some("hi"));
    }

    #[test]
    fn test_known_fields_of_non_object_body() {
        let request = NotificationRequest::from_json("[1, 2]").unwrap();
        assert_eq!(request.recipient(), None);
        assert_eq!(request.message(), None);
    }

    #[test]
    fn test_from_json_rejects_malformed_json() {
        assert!(NotificationRequest::from_json("{not json").is_err());
    }
}
