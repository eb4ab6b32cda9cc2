pub mod health;
pub mod status;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /status                        list (GET), create (POST)
/// /status/summary                fleet health summary
/// /status/{device_id}            latest report for a device
/// /status/{device_id}/health     health classification of the latest report
/// /status/{device_id}/healthy    strict boolean verdict
///
/// /device-status/...             alias for the same routes (legacy mount)
/// ```
///
/// Every route requires the `x-api-key` header.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/status", status::router())
        .nest("/device-status", status::router())
}
