//! Device callback envelope and typed event payloads
//!
//! Devices post a camelCase JSON envelope. The payload is event-specific and
//! validated here, at the boundary, so the rest of the pipeline works with
//! typed data instead of raw JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{DeviceStatus, EventType};

/// Raw callback body as posted by a device.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackRequest {
    pub external_device_id: String,
    pub event_type: EventType,
    #[serde(default)]
    pub payload: Value,
    pub timestamp: DateTime<Utc>,
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartbeatPayload {
    #[serde(default)]
    pub signal: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangePayload {
    pub status: DeviceStatus,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WashStartPayload {
    pub order_number: String,
    pub wash_type: String,
    /// Minutes, 1..=60
    pub duration: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WashEndPayload {
    pub order_number: String,
    #[serde(default)]
    pub duration: Option<i32>,
}

/// A validated device event, one variant per wire `eventType`.
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    Heartbeat(HeartbeatPayload),
    StatusChange(StatusChangePayload),
    Error(ErrorPayload),
    WashStart(WashStartPayload),
    WashEnd(WashEndPayload),
}

impl DeviceEvent {
    /// Parse and validate an event payload for the given type.
    pub fn parse(event_type: EventType, payload: &Value) -> Result<Self, AppError> {
        let event = match event_type {
            EventType::Heartbeat => DeviceEvent::Heartbeat(from_payload(payload)?),
            EventType::StatusChange => DeviceEvent::StatusChange(from_payload(payload)?),
            EventType::Error => DeviceEvent::Error(from_payload(payload)?),
            EventType::WashStart => DeviceEvent::WashStart(from_payload(payload)?),
            EventType::WashEnd => DeviceEvent::WashEnd(from_payload(payload)?),
        };

        if let DeviceEvent::WashStart(p) = &event {
            if !(1..=60).contains(&p.duration) {
                return Err(AppError::with_message(
                    ErrorCode::InvalidEventPayload,
                    "Wash duration must be 1-60 minutes",
                ));
            }
        }

        Ok(event)
    }

    /// Order referenced by wash events.
    pub fn order_no(&self) -> Option<&str> {
        match self {
            DeviceEvent::WashStart(p) => Some(&p.order_number),
            DeviceEvent::WashEnd(p) => Some(&p.order_number),
            _ => None,
        }
    }

    /// Validated payload as JSON, for the forensic `parsed_data` column.
    pub fn to_snapshot(&self) -> Value {
        let result = match self {
            DeviceEvent::Heartbeat(p) => serde_json::to_value(p),
            DeviceEvent::StatusChange(p) => serde_json::to_value(p),
            DeviceEvent::Error(p) => serde_json::to_value(p),
            DeviceEvent::WashStart(p) => serde_json::to_value(p),
            DeviceEvent::WashEnd(p) => serde_json::to_value(p),
        };
        result.unwrap_or(Value::Null)
    }
}

fn from_payload<T: DeserializeOwned>(payload: &Value) -> Result<T, AppError> {
    serde_json::from_value(payload.clone()).map_err(|e| {
        AppError::with_message(
            ErrorCode::InvalidEventPayload,
            format!("Invalid event payload: {e}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_wash_start() {
        let payload = json!({"orderNumber": "WC123", "washType": "basic", "duration": 10});
        let event = DeviceEvent::parse(EventType::WashStart, &payload).expect("parse");
        match &event {
            DeviceEvent::WashStart(p) => {
                assert_eq!(p.order_number, "WC123");
                assert_eq!(p.wash_type, "basic");
                assert_eq!(p.duration, 10);
            }
            other => panic!("wrong variant: {other:?}"),
        }
        assert_eq!(event.order_no(), Some("WC123"));
    }

    #[test]
    fn test_wash_start_duration_out_of_range() {
        let payload = json!({"orderNumber": "WC123", "washType": "basic", "duration": 0});
        let err = DeviceEvent::parse(EventType::WashStart, &payload).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidEventPayload);

        let payload = json!({"orderNumber": "WC123", "washType": "basic", "duration": 61});
        assert!(DeviceEvent::parse(EventType::WashStart, &payload).is_err());
    }

    #[test]
    fn test_parse_status_change_with_coordinates() {
        let payload = json!({
            "status": "offline",
            "location": "Mall west entrance",
            "latitude": 31.2304,
            "longitude": 121.4737
        });
        let event = DeviceEvent::parse(EventType::StatusChange, &payload).expect("parse");
        match event {
            DeviceEvent::StatusChange(p) => {
                assert_eq!(p.status, DeviceStatus::Offline);
                assert_eq!(p.location.as_deref(), Some("Mall west entrance"));
                assert_eq!(p.latitude, Some(31.2304));
            }
            other => panic!("wrong variant: {other:?}"),
        }
    }

    #[test]
    fn test_parse_heartbeat_empty_payload() {
        let event = DeviceEvent::parse(EventType::Heartbeat, &json!({})).expect("parse");
        assert!(matches!(event, DeviceEvent::Heartbeat(_)));
        assert_eq!(event.order_no(), None);
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let payload = json!({"status": "not-a-status"});
        assert!(DeviceEvent::parse(EventType::StatusChange, &payload).is_err());

        let payload = json!({"washType": "basic"});
        assert!(DeviceEvent::parse(EventType::WashStart, &payload).is_err());
    }

    #[test]
    fn test_envelope_deserializes_camel_case() {
        let body = json!({
            "externalDeviceId": "898604",
            "eventType": "wash_end",
            "payload": {"orderNumber": "WC9", "duration": 12},
            "timestamp": "2026-03-01T08:30:00Z"
        });
        let req: CallbackRequest = serde_json::from_value(body).expect("deserialize");
        assert_eq!(req.external_device_id, "898604");
        assert_eq!(req.event_type, EventType::WashEnd);
        assert!(req.signature.is_none());
    }

    #[test]
    fn test_snapshot_round_trips_camel_case() {
        let payload = json!({"orderNumber": "WC123", "washType": "basic", "duration": 10});
        let event = DeviceEvent::parse(EventType::WashStart, &payload).expect("parse");
        let snapshot = event.to_snapshot();
        assert_eq!(snapshot["orderNumber"], "WC123");
        assert_eq!(snapshot["duration"], 10);
    }
}
