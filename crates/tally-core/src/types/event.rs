use crate::error::LoadError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON key of the nested subject resource in source records.
pub const ENTITY_KEY: &str = "repo";

/// A stored event: the typed projection of the known fields plus the full
/// source record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub event_id: String,
    pub event_type: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub ingested_at: Option<DateTime<Utc>>,
    pub actor_id: Option<i64>,
    pub actor_login: Option<String>,
    pub entity_id: Option<i64>,
    pub entity_name: Option<String>,
    pub payload: Option<Value>,
    pub raw: Value,
    pub source_file: String,
}

impl Event {
    /// Projects a parsed source record. Missing or mistyped fields become
    /// `None`; only a missing id rejects the record.
    pub fn from_record(raw: Value, source_file: &str, line: usize) -> Result<Self, LoadError> {
        let event_id = match raw.get("id") {
            Some(Value::String(id)) if !id.is_empty() => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(LoadError::MissingId { line }),
        };

        let created_at = timestamp_field(&raw, "created_at", &event_id);
        let ingested_at = timestamp_field(&raw, "_ingested_at", &event_id);
        let payload = match raw.get("payload") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.clone()),
        };

        Ok(Self {
            event_type: str_at(&raw, "/type"),
            actor_id: raw.pointer("/actor/id").and_then(Value::as_i64),
            actor_login: str_at(&raw, "/actor/login"),
            entity_id: raw
                .get(ENTITY_KEY)
                .and_then(|entity| entity.get("id"))
                .and_then(Value::as_i64),
            entity_name: raw
                .get(ENTITY_KEY)
                .and_then(|entity| entity.get("name"))
                .and_then(Value::as_str)
                .map(str::to_string),
            event_id,
            created_at,
            ingested_at,
            payload,
            raw,
            source_file: source_file.to_string(),
        })
    }
}

/// The slice of an event the session segmenter needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEvent {
    pub event_id: String,
    pub actor_login: String,
    pub created_at: DateTime<Utc>,
}

pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

fn str_at(raw: &Value, pointer: &str) -> Option<String> {
    raw.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn timestamp_field(raw: &Value, key: &str, event_id: &str) -> Option<DateTime<Utc>> {
    let value = raw.get(key)?.as_str()?;
    let parsed = parse_timestamp(value);
    if parsed.is_none() {
        tracing::warn!(event_id, field = key, value, "unparseable timestamp, storing null");
    }
    parsed
}
