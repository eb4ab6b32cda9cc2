//! Device health classification and fleet-wide aggregation.
//!
//! Provides issue constants, threshold evaluation, and summary computation
//! over point-in-time device status snapshots. All functions take the
//! evaluation reference time as a parameter so results are reproducible in
//! tests.

use chrono::Duration;
use serde::Serialize;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Issue constants
// ---------------------------------------------------------------------------

/// Device reported itself offline.
pub const ISSUE_OFFLINE: &str = "Device is offline";
/// Battery below the low threshold.
pub const ISSUE_LOW_BATTERY: &str = "Low battery level";
/// Battery below the critical threshold.
pub const ISSUE_CRITICAL_BATTERY: &str = "Critical battery level";
/// Signal below the poor threshold.
pub const ISSUE_POOR_SIGNAL: &str = "Poor signal strength";
/// Signal below the very-poor threshold.
pub const ISSUE_VERY_POOR_SIGNAL: &str = "Very poor signal strength";
/// Reading older than the staleness window.
pub const ISSUE_STALE: &str = "Data is stale";

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Battery percentage below which a device is low on charge.
pub const LOW_BATTERY_THRESHOLD: f64 = 20.0;
/// Battery percentage below which charge is critical. Critical readings
/// also report the low-battery issue; the two are not mutually exclusive.
pub const CRITICAL_BATTERY_THRESHOLD: f64 = 5.0;
/// RSSI (dBm) below which signal is poor.
pub const POOR_SIGNAL_THRESHOLD: i32 = -80;
/// RSSI (dBm) below which signal is very poor.
pub const VERY_POOR_SIGNAL_THRESHOLD: i32 = -90;
/// RSSI cutoff used by the strict checker (the legacy standalone policy).
pub const STRICT_SIGNAL_THRESHOLD: i32 = -70;

/// A reading strictly older than this window is stale.
pub fn stale_after() -> Duration {
    Duration::hours(1)
}

// ---------------------------------------------------------------------------
// Snapshot and result types
// ---------------------------------------------------------------------------

/// One point-in-time device status reading.
///
/// `battery_level` and `rssi` may be absent ("unknown"); `online` and
/// `timestamp` are required at construction, so the evaluator never has to
/// handle their absence at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceStatusSnapshot {
    pub device_id: String,
    pub battery_level: Option<f64>,
    pub rssi: Option<i32>,
    pub online: bool,
    pub timestamp: Timestamp,
}

/// Health verdict for a single snapshot. `healthy` is true iff `issues`
/// is empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResult {
    pub healthy: bool,
    pub issues: Vec<String>,
}

/// Per-device entry in a [`FleetHealthSummary`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceHealth {
    pub device_id: String,
    pub healthy: bool,
    pub issues: Vec<String>,
}

/// Aggregated health across a fleet of snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetHealthSummary {
    pub total_devices: usize,
    pub healthy_devices: usize,
    pub unhealthy_devices: usize,
    pub per_device: Vec<DeviceHealth>,
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Classify a single snapshot against the evaluation time `now`.
///
/// Issues appear in a fixed relative order: offline, low battery, critical
/// battery, poor signal, very poor signal, stale. A missing battery level
/// or RSSI contributes no issue (there is no signal to judge); the strict
/// policy that treats missing values as unhealthy lives in
/// [`is_device_healthy_strict`].
pub fn evaluate(snapshot: &DeviceStatusSnapshot, now: Timestamp) -> HealthResult {
    let mut issues = Vec::new();

    if !snapshot.online {
        issues.push(ISSUE_OFFLINE.to_string());
    }

    if let Some(battery) = snapshot.battery_level {
        if battery < LOW_BATTERY_THRESHOLD {
            issues.push(ISSUE_LOW_BATTERY.to_string());
        }
        if battery < CRITICAL_BATTERY_THRESHOLD {
            issues.push(ISSUE_CRITICAL_BATTERY.to_string());
        }
    }

    if let Some(rssi) = snapshot.rssi {
        if rssi < POOR_SIGNAL_THRESHOLD {
            issues.push(ISSUE_POOR_SIGNAL.to_string());
        }
        if rssi < VERY_POOR_SIGNAL_THRESHOLD {
            issues.push(ISSUE_VERY_POOR_SIGNAL.to_string());
        }
    }

    if now.signed_duration_since(snapshot.timestamp) > stale_after() {
        issues.push(ISSUE_STALE.to_string());
    }

    HealthResult {
        healthy: issues.is_empty(),
        issues,
    }
}

/// Strict boolean health check (the legacy standalone policy).
///
/// Unlike [`evaluate`], a missing battery level or RSSI makes the device
/// unhealthy, and the signal cutoff is -70 dBm. Timestamp age is not
/// considered.
pub fn is_device_healthy_strict(snapshot: &DeviceStatusSnapshot) -> bool {
    snapshot.online
        && snapshot
            .battery_level
            .is_some_and(|b| b >= LOW_BATTERY_THRESHOLD)
        && snapshot
            .rssi
            .is_some_and(|r| r >= STRICT_SIGNAL_THRESHOLD)
}

/// Evaluate every snapshot in input order and aggregate the counts.
///
/// An empty fleet yields an all-zero summary, not an error.
pub fn summarize(snapshots: &[DeviceStatusSnapshot], now: Timestamp) -> FleetHealthSummary {
    let per_device: Vec<DeviceHealth> = snapshots
        .iter()
        .map(|snapshot| {
            let result = evaluate(snapshot, now);
            DeviceHealth {
                device_id: snapshot.device_id.clone(),
                healthy: result.healthy,
                issues: result.issues,
            }
        })
        .collect();

    let healthy_devices = per_device.iter().filter(|d| d.healthy).count();

    FleetHealthSummary {
        total_devices: per_device.len(),
        healthy_devices,
        unhealthy_devices: per_device.len() - healthy_devices,
        per_device,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(
        battery_level: Option<f64>,
        rssi: Option<i32>,
        online: bool,
        age: Duration,
        now: Timestamp,
    ) -> DeviceStatusSnapshot {
        DeviceStatusSnapshot {
            device_id: "sensor-123".to_string(),
            battery_level,
            rssi,
            online,
            timestamp: now - age,
        }
    }

    // -- evaluate -------------------------------------------------------------

    #[test]
    fn healthy_snapshot_has_no_issues() {
        let now = Utc::now();
        let s = snapshot(Some(75.0), Some(-60), true, Duration::minutes(5), now);
        let result = evaluate(&s, now);
        assert!(result.healthy);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn offline_always_reported() {
        let now = Utc::now();
        let s = snapshot(Some(90.0), Some(-40), false, Duration::minutes(1), now);
        let result = evaluate(&s, now);
        assert!(!result.healthy);
        assert_eq!(result.issues, vec![ISSUE_OFFLINE.to_string()]);
    }

    #[test]
    fn low_battery_reported_below_threshold() {
        let now = Utc::now();
        let s = snapshot(Some(19.9), Some(-60), true, Duration::minutes(1), now);
        let result = evaluate(&s, now);
        assert_eq!(result.issues, vec![ISSUE_LOW_BATTERY.to_string()]);
    }

    #[test]
    fn battery_at_threshold_is_fine() {
        let now = Utc::now();
        let s = snapshot(Some(20.0), Some(-60), true, Duration::minutes(1), now);
        assert!(evaluate(&s, now).healthy);
    }

    #[test]
    fn critical_battery_also_reports_low() {
        let now = Utc::now();
        let s = snapshot(Some(3.0), Some(-60), true, Duration::minutes(1), now);
        let result = evaluate(&s, now);
        assert_eq!(
            result.issues,
            vec![
                ISSUE_LOW_BATTERY.to_string(),
                ISSUE_CRITICAL_BATTERY.to_string()
            ]
        );
    }

    #[test]
    fn very_poor_signal_also_reports_poor() {
        let now = Utc::now();
        let s = snapshot(Some(80.0), Some(-95), true, Duration::minutes(1), now);
        let result = evaluate(&s, now);
        assert_eq!(
            result.issues,
            vec![
                ISSUE_POOR_SIGNAL.to_string(),
                ISSUE_VERY_POOR_SIGNAL.to_string()
            ]
        );
    }

    #[test]
    fn stale_reading_reported() {
        let now = Utc::now();
        let s = snapshot(Some(80.0), Some(-50), true, Duration::hours(2), now);
        let result = evaluate(&s, now);
        assert_eq!(result.issues, vec![ISSUE_STALE.to_string()]);
    }

    #[test]
    fn exactly_one_hour_old_is_not_stale() {
        let now = Utc::now();
        let s = snapshot(Some(80.0), Some(-50), true, Duration::hours(1), now);
        assert!(evaluate(&s, now).healthy);
    }

    #[test]
    fn missing_battery_and_rssi_contribute_no_issue() {
        let now = Utc::now();
        let s = snapshot(None, None, true, Duration::minutes(1), now);
        let result = evaluate(&s, now);
        assert!(result.healthy);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn worst_case_reports_all_issues_in_order() {
        let now = Utc::now();
        let s = snapshot(Some(3.0), Some(-95), false, Duration::hours(2), now);
        let result = evaluate(&s, now);
        assert!(!result.healthy);
        assert_eq!(
            result.issues,
            vec![
                ISSUE_OFFLINE.to_string(),
                ISSUE_LOW_BATTERY.to_string(),
                ISSUE_CRITICAL_BATTERY.to_string(),
                ISSUE_POOR_SIGNAL.to_string(),
                ISSUE_VERY_POOR_SIGNAL.to_string(),
                ISSUE_STALE.to_string(),
            ]
        );
    }

    #[test]
    fn lowering_battery_never_removes_issues() {
        let now = Utc::now();
        let high = snapshot(Some(10.0), Some(-95), false, Duration::hours(2), now);
        let low = snapshot(Some(4.0), Some(-95), false, Duration::hours(2), now);

        let high_issues = evaluate(&high, now).issues;
        let low_issues = evaluate(&low, now).issues;

        for issue in &high_issues {
            assert!(low_issues.contains(issue), "lost issue: {issue}");
        }
        assert!(low_issues.contains(&ISSUE_LOW_BATTERY.to_string()));
        assert!(low_issues.contains(&ISSUE_CRITICAL_BATTERY.to_string()));
    }

    // -- is_device_healthy_strict ---------------------------------------------

    #[test]
    fn strict_healthy_device() {
        let now = Utc::now();
        let s = snapshot(Some(50.0), Some(-60), true, Duration::minutes(1), now);
        assert!(is_device_healthy_strict(&s));
    }

    #[test]
    fn strict_rejects_low_battery() {
        let now = Utc::now();
        let s = snapshot(Some(10.0), Some(-60), true, Duration::minutes(1), now);
        assert!(!is_device_healthy_strict(&s));
    }

    #[test]
    fn strict_rejects_weak_signal() {
        let now = Utc::now();
        let s = snapshot(Some(50.0), Some(-80), true, Duration::minutes(1), now);
        assert!(!is_device_healthy_strict(&s));
    }

    #[test]
    fn strict_rejects_offline() {
        let now = Utc::now();
        let s = snapshot(Some(50.0), Some(-60), false, Duration::minutes(1), now);
        assert!(!is_device_healthy_strict(&s));
    }

    #[test]
    fn strict_rejects_missing_values() {
        let now = Utc::now();
        let no_battery = snapshot(None, Some(-60), true, Duration::minutes(1), now);
        let no_rssi = snapshot(Some(50.0), None, true, Duration::minutes(1), now);
        assert!(!is_device_healthy_strict(&no_battery));
        assert!(!is_device_healthy_strict(&no_rssi));
    }

    // -- summarize ------------------------------------------------------------

    #[test]
    fn summary_empty_fleet() {
        let summary = summarize(&[], Utc::now());
        assert_eq!(summary.total_devices, 0);
        assert_eq!(summary.healthy_devices, 0);
        assert_eq!(summary.unhealthy_devices, 0);
        assert!(summary.per_device.is_empty());
    }

    #[test]
    fn summary_counts_reconcile_and_preserve_order() {
        let now = Utc::now();
        let mut fleet = vec![
            snapshot(Some(75.0), Some(-60), true, Duration::minutes(1), now),
            snapshot(Some(3.0), Some(-95), false, Duration::hours(2), now),
            snapshot(None, None, true, Duration::minutes(30), now),
        ];
        fleet[0].device_id = "a".to_string();
        fleet[1].device_id = "b".to_string();
        fleet[2].device_id = "c".to_string();

        let summary = summarize(&fleet, now);
        assert_eq!(summary.total_devices, 3);
        assert_eq!(summary.healthy_devices, 2);
        assert_eq!(summary.unhealthy_devices, 1);
        assert_eq!(
            summary.healthy_devices + summary.unhealthy_devices,
            summary.total_devices
        );

        let ids: Vec<&str> = summary
            .per_device
            .iter()
            .map(|d| d.device_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(!summary.per_device[1].healthy);
        assert!(!summary.per_device[1].issues.is_empty());
    }

    // -- serialization --------------------------------------------------------

    #[test]
    fn summary_serializes_camel_case() {
        let now = Utc::now();
        let fleet = vec![snapshot(Some(75.0), Some(-60), true, Duration::minutes(1), now)];
        let summary = summarize(&fleet, now);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalDevices"], 1);
        assert_eq!(json["healthyDevices"], 1);
        assert_eq!(json["unhealthyDevices"], 0);
        assert_eq!(json["perDevice"][0]["deviceId"], "sensor-123");
        assert_eq!(json["perDevice"][0]["healthy"], true);
    }
}
