//! Device status row model.

use fleetpulse_core::health::DeviceStatusSnapshot;
use fleetpulse_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `device_statuses` table.
///
/// Serializes camelCase to match the wire shape agents already send and
/// dashboards already consume.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceStatus {
    pub id: DbId,
    pub device_id: String,
    pub timestamp: Timestamp,
    pub battery_level: Option<f64>,
    pub rssi: Option<i32>,
    pub online: bool,
    pub created_at: Timestamp,
}

impl DeviceStatus {
    /// View this row as an immutable snapshot for health evaluation.
    pub fn snapshot(&self) -> DeviceStatusSnapshot {
        DeviceStatusSnapshot {
            device_id: self.device_id.clone(),
            battery_level: self.battery_level,
            rssi: self.rssi,
            online: self.online,
            timestamp: self.timestamp,
        }
    }
}
