use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::object_key::display_name;

pub const RECORDS_FIELD: &str = "Records";

/// Envelope as delivered by S3. Records stay untyped here so that only the
/// first one is ever decoded.
#[derive(Debug, Clone, Deserialize)]
struct RawNotificationEvent {
    #[serde(rename = "Records")]
    records: Vec<Value>,
}

/// The only strictly typed path in a record: `s3.object.key`. Every other
/// field is informational and read leniently from the raw record.
#[derive(Debug, Clone, Deserialize)]
struct KeyedRecord {
    s3: KeyedEntity,
}

#[derive(Debug, Clone, Deserialize)]
struct KeyedEntity {
    object: KeyedObject,
}

#[derive(Debug, Clone, Deserialize)]
struct KeyedObject {
    key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRecord {
    pub object_key: String,
    pub bucket_name: Option<String>,
    pub event_name: Option<String>,
}

impl NotificationRecord {
    fn from_value(record: Value) -> Result<Self, InputShapeError> {
        let bucket_name = lenient_str(&record, "/s3/bucket/name");
        let event_name = lenient_str(&record, "/eventName");

        let keyed: KeyedRecord = serde_json::from_value(record).map_err(|error| {
            InputShapeError::new(format!("Malformed notification record: {error}"))
        })?;

        Ok(Self {
            object_key: keyed.s3.object.key,
            bucket_name,
            event_name,
        })
    }
}

fn lenient_str(record: &Value, pointer: &str) -> Option<String> {
    record
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// A validated notification: the first record plus the size of the batch it
/// arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationEvent {
    pub first_record: NotificationRecord,
    pub record_count: usize,
}

impl NotificationEvent {
    pub fn object_key(&self) -> &str {
        &self.first_record.object_key
    }

    pub fn display_name(&self) -> &str {
        display_name(self.object_key())
    }

    pub fn bucket_name(&self) -> Option<&str> {
        self.first_record.bucket_name.as_deref()
    }

    pub fn event_name(&self) -> Option<&str> {
        self.first_record.event_name.as_deref()
    }

    pub fn ignored_records(&self) -> usize {
        self.record_count.saturating_sub(1)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultPayload {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct InvocationContext {
    pub request_id: String,
}

impl InvocationContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputShapeError {
    message: String,
}

impl InputShapeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for InputShapeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for InputShapeError {}

pub fn parse_notification_event(event: Value) -> Result<NotificationEvent, InputShapeError> {
    if !event.is_object() {
        return Err(InputShapeError::new("Notification event must be a JSON object"));
    }

    let raw: RawNotificationEvent = serde_json::from_value(event).map_err(|error| {
        InputShapeError::new(format!("Malformed notification event: {error}"))
    })?;

    let record_count = raw.records.len();
    let Some(first) = raw.records.into_iter().next() else {
        return Err(InputShapeError::new(format!(
            "{RECORDS_FIELD} must contain at least one record"
        )));
    };

    let first_record = NotificationRecord::from_value(first)?;

    if first_record.object_key.is_empty() {
        return Err(InputShapeError::new("s3.object.key cannot be empty"));
    }

    Ok(NotificationEvent {
        first_record,
        record_count,
    })
}
