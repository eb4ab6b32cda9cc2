//! Handlers for device status endpoints.
//!
//! The write path validates the raw JSON body before anything is typed or
//! stored; the read paths run stored rows through the health evaluator.
//! "Now" for staleness checks is read once per request here, never inside
//! the evaluator.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use fleetpulse_core::error::CoreError;
use fleetpulse_core::health::{self, DeviceStatusSnapshot, FleetHealthSummary, HealthResult};
use fleetpulse_core::payload;
use fleetpulse_db::models::device_status::DeviceStatus;
use fleetpulse_db::repositories::DeviceStatusRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::api_key::ApiKeyAuth;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Verdict from the strict health checker.
#[derive(Debug, Serialize)]
pub struct StrictHealthResponse {
    pub healthy: bool,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /status
///
/// Validate a raw status report and persist it. Returns 201 with the stored
/// row, or 400 with the full list of violations.
pub async fn create_status(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Json(body): Json<Value>,
) -> AppResult<(StatusCode, Json<DeviceStatus>)> {
    let result = payload::validate(&body);
    if !result.valid {
        return Err(AppError::PayloadInvalid(result.errors));
    }

    let record = payload::normalize(&body)?;
    let stored = DeviceStatusRepo::create(&state.pool, &record).await?;

    tracing::debug!(device_id = %stored.device_id, id = stored.id, "stored device status");
    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /status
///
/// All stored status reports, newest reading first.
pub async fn list_statuses(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
) -> AppResult<Json<Vec<DeviceStatus>>> {
    let statuses = DeviceStatusRepo::list_all(&state.pool).await?;
    Ok(Json(statuses))
}

/// GET /status/summary
///
/// Health summary over the latest report of every device.
pub async fn fleet_summary(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
) -> AppResult<Json<FleetHealthSummary>> {
    let latest = DeviceStatusRepo::list_latest_per_device(&state.pool).await?;
    let snapshots: Vec<DeviceStatusSnapshot> = latest.iter().map(DeviceStatus::snapshot).collect();
    Ok(Json(health::summarize(&snapshots, Utc::now())))
}

/// GET /status/{device_id}
///
/// The most recent report for one device.
pub async fn get_device_status(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(device_id): Path<String>,
) -> AppResult<Json<DeviceStatus>> {
    let status = find_latest_or_404(&state, &device_id).await?;
    Ok(Json(status))
}

/// GET /status/{device_id}/health
///
/// Full health classification of the device's latest report.
pub async fn get_device_health(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(device_id): Path<String>,
) -> AppResult<Json<HealthResult>> {
    let status = find_latest_or_404(&state, &device_id).await?;
    Ok(Json(health::evaluate(&status.snapshot(), Utc::now())))
}

/// GET /status/{device_id}/healthy
///
/// Boolean verdict from the strict checker: missing battery or RSSI counts
/// as unhealthy.
pub async fn get_device_healthy(
    State(state): State<AppState>,
    _auth: ApiKeyAuth,
    Path(device_id): Path<String>,
) -> AppResult<Json<StrictHealthResponse>> {
    let status = find_latest_or_404(&state, &device_id).await?;
    Ok(Json(StrictHealthResponse {
        healthy: health::is_device_healthy_strict(&status.snapshot()),
    }))
}

async fn find_latest_or_404(state: &AppState, device_id: &str) -> AppResult<DeviceStatus> {
    DeviceStatusRepo::find_latest(&state.pool, device_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "device_status",
                id: device_id.to_string(),
            })
        })
}
