//! Device Model

use serde::{Deserialize, Serialize};

/// Device status
///
/// `working` means a wash is in progress; `error` and `maintenance` make the
/// device unavailable for new orders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "TEXT", rename_all = "lowercase"))]
pub enum DeviceStatus {
    Online,
    Offline,
    Working,
    Error,
    Maintenance,
}

/// Device entity
///
/// `iccid` is the external SIM identifier used by telemetry callbacks.
/// Devices are never deleted; decommissioned units are flipped to
/// `maintenance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Device {
    pub id: i64,
    pub iccid: String,
    pub name: Option<String>,
    pub merchant_id: i64,
    pub store_id: i64,
    pub status: DeviceStatus,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub last_online_at: Option<i64>,
    pub last_offline_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Update device payload (admin correction surface)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceUpdate {
    pub name: Option<String>,
    pub store_id: Option<i64>,
    pub status: Option<DeviceStatus>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
