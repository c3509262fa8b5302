use crate::models::donation::DonationTask;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvelopeError {
    #[error("invalid notification envelope: {0}")]
    Envelope(serde_json::Error),
    #[error("envelope has no embedded payload")]
    EmptyPayload,
    #[error("invalid task payload: {0}")]
    Payload(serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MessageAttribute {
    #[serde(rename = "Type")]
    pub kind: String,
    pub value: String,
}

/// Outer wrapper the pub/sub layer adds around every payload delivered to the
/// queue. The `Message` field is itself a JSON document and needs a second
/// deserialization pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationEnvelope {
    #[serde(rename = "Type")]
    pub kind: String,
    pub message_id: String,
    pub topic_arn: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    pub timestamp: String,
    #[serde(default)]
    pub message_attributes: HashMap<String, MessageAttribute>,
}

impl NotificationEnvelope {
    /// First decode pass. A missing, null or empty `Message` field makes the
    /// whole message malformed; such messages are dropped without retry.
    pub fn parse(body: &str) -> Result<Self, EnvelopeError> {
        let envelope: Self = serde_json::from_str(body).map_err(EnvelopeError::Envelope)?;

        match envelope.message.as_deref() {
            None | Some("") => Err(EnvelopeError::EmptyPayload),
            Some(_) => Ok(envelope),
        }
    }

    /// Second decode pass: the embedded payload as a donation task.
    pub fn task(&self) -> Result<DonationTask, EnvelopeError> {
        let payload = self.message.as_deref().unwrap_or_default();
        serde_json::from_str(payload).map_err(EnvelopeError::Payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope_json(message: serde_json::Value) -> String {
        serde_json::json!({
            "Type": "Notification",
            "MessageId": "3f6e1b7a-0001-4a38-9d21-6d1e9f1c2ab3",
            "TopicArn": "arn:aws:sns:us-east-1:123:donations",
            "Message": message,
            "Timestamp": "2026-08-28T12:00:00.000Z",
            "MessageAttributes": {
                "target": { "Type": "String", "Value": "worker" }
            }
        })
        .to_string()
    }

    #[test]
    fn parses_envelope_with_payload() {
        let body = envelope_json(serde_json::Value::String("{\"x\":1}".to_string()));
        let envelope = NotificationEnvelope::parse(&body).unwrap();
        assert_eq!(envelope.kind, "Notification");
        assert_eq!(envelope.message.as_deref(), Some("{\"x\":1}"));
        assert_eq!(
            envelope.message_attributes.get("target").map(|a| a.value.as_str()),
            Some("worker")
        );
    }

    #[test]
    fn null_message_is_empty_payload() {
        let body = envelope_json(serde_json::Value::Null);
        assert!(matches!(
            NotificationEnvelope::parse(&body),
            Err(EnvelopeError::EmptyPayload)
        ));
    }

    #[test]
    fn empty_message_is_empty_payload() {
        let body = envelope_json(serde_json::Value::String(String::new()));
        assert!(matches!(
            NotificationEnvelope::parse(&body),
            Err(EnvelopeError::EmptyPayload)
        ));
    }

    #[test]
    fn missing_message_is_empty_payload() {
        let body = serde_json::json!({
            "Type": "Notification",
            "MessageId": "id",
            "TopicArn": "arn",
            "Timestamp": "2026-08-28T12:00:00.000Z"
        })
        .to_string();
        assert!(matches!(
            NotificationEnvelope::parse(&body),
            Err(EnvelopeError::EmptyPayload)
        ));
    }

    #[test]
    fn garbage_body_is_envelope_error() {
        assert!(matches!(
            NotificationEnvelope::parse("not json at all"),
            Err(EnvelopeError::Envelope(_))
        ));
    }

    #[test]
    fn bad_payload_is_distinct_from_bad_envelope() {
        let body = envelope_json(serde_json::Value::String("{\"broken\"".to_string()));
        let envelope = NotificationEnvelope::parse(&body).unwrap();
        assert!(matches!(envelope.task(), Err(EnvelopeError::Payload(_))));
    }
}
