//! Repository for the `device_statuses` table.

use fleetpulse_core::payload::NewDeviceStatus;
use sqlx::PgPool;

use crate::models::device_status::DeviceStatus;

// ---------------------------------------------------------------------------
// Column lists
// ---------------------------------------------------------------------------

const STATUS_COLUMNS: &str =
    "id, device_id, timestamp, battery_level, rssi, online, created_at";

/// Provides persistence operations for device status reports.
pub struct DeviceStatusRepo;

impl DeviceStatusRepo {
    /// Insert a validated status report. Returns the stored row with its
    /// database-assigned id.
    pub async fn create(
        pool: &PgPool,
        record: &NewDeviceStatus,
    ) -> Result<DeviceStatus, sqlx::Error> {
        let query = format!(
            "INSERT INTO device_statuses \
                (device_id, timestamp, battery_level, rssi, online) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {STATUS_COLUMNS}"
        );
        sqlx::query_as::<_, DeviceStatus>(&query)
            .bind(&record.device_id)
            .bind(record.timestamp)
            .bind(record.battery_level)
            .bind(record.rssi)
            .bind(record.online)
            .fetch_one(pool)
            .await
    }

    /// List every stored status report, newest reading first.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<DeviceStatus>, sqlx::Error> {
        let query =
            format!("SELECT {STATUS_COLUMNS} FROM device_statuses ORDER BY timestamp DESC");
        sqlx::query_as::<_, DeviceStatus>(&query)
            .fetch_all(pool)
            .await
    }

    /// The most recent report for one device, if it has ever reported.
    pub async fn find_latest(
        pool: &PgPool,
        device_id: &str,
    ) -> Result<Option<DeviceStatus>, sqlx::Error> {
        let query = format!(
            "SELECT {STATUS_COLUMNS} FROM device_statuses \
             WHERE device_id = $1 \
             ORDER BY timestamp DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, DeviceStatus>(&query)
            .bind(device_id)
            .fetch_optional(pool)
            .await
    }

    /// The most recent report for every device, ordered by device id.
    pub async fn list_latest_per_device(
        pool: &PgPool,
    ) -> Result<Vec<DeviceStatus>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT ON (device_id) {STATUS_COLUMNS} \
             FROM device_statuses \
             ORDER BY device_id, timestamp DESC"
        );
        sqlx::query_as::<_, DeviceStatus>(&query)
            .fetch_all(pool)
            .await
    }
}
