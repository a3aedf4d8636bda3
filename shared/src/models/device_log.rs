//! Device telemetry log model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Telemetry event type as sent by devices
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "TEXT", rename_all = "snake_case"))]
pub enum EventType {
    Heartbeat,
    StatusChange,
    WashStart,
    WashEnd,
    Error,
}

impl EventType {
    /// Wire name (matches the callback `eventType` field)
    pub fn name(&self) -> &'static str {
        match self {
            EventType::Heartbeat => "heartbeat",
            EventType::StatusChange => "status_change",
            EventType::WashStart => "wash_start",
            EventType::WashEnd => "wash_end",
            EventType::Error => "error",
        }
    }
}

/// Processing status of a logged event
///
/// Transitions once, pending -> processed or pending -> failed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "TEXT", rename_all = "lowercase"))]
pub enum ProcessStatus {
    Pending,
    Processed,
    Failed,
}

/// Device telemetry log entry (append-only)
///
/// One row per received callback, written before the event is dispatched.
/// `iccid` is the external device id string, not a foreign key; events for
/// unknown devices must still leave a trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DeviceLog {
    pub id: i64,
    pub iccid: String,
    pub event_type: EventType,
    /// Raw payload exactly as received
    pub payload: Value,
    /// Schema-validated form of the payload, null when parsing failed
    pub parsed_data: Option<Value>,
    pub order_no: Option<String>,
    pub process_status: ProcessStatus,
    pub error_message: Option<String>,
    /// Device-reported event time (epoch ms)
    pub event_time: i64,
    pub created_at: i64,
}
