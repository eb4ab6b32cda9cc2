//! Route definitions for device status reports.
//!
//! Mounted at `/status` (and the legacy `/device-status`) by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::status;
use crate::state::AppState;

/// Device status routes.
///
/// ```text
/// GET    /                       -> list_statuses
/// POST   /                       -> create_status
/// GET    /summary                -> fleet_summary
/// GET    /{device_id}            -> get_device_status
/// GET    /{device_id}/health     -> get_device_health
/// GET    /{device_id}/healthy    -> get_device_healthy
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(status::list_statuses).post(status::create_status),
        )
        .route("/summary", get(status::fleet_summary))
        .route("/{device_id}", get(status::get_device_status))
        .route("/{device_id}/health", get(status::get_device_health))
        .route("/{device_id}/healthy", get(status::get_device_healthy))
}
