//! Pre-shared API key extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use fleetpulse_core::error::CoreError;

use crate::error::AppError;
use crate::state::AppState;

/// Gate extracted from the `x-api-key` header.
///
/// Use this as an extractor parameter in any handler that requires the
/// pre-shared key:
///
/// ```ignore
/// async fn my_handler(_auth: ApiKeyAuth) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiKeyAuth;

impl FromRequestParts<AppState> for ApiKeyAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let api_key = parts
            .headers
            .get("x-api-key")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Missing x-api-key header".into()))
            })?;

        if api_key != state.config.api_key {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid API key".into(),
            )));
        }

        Ok(ApiKeyAuth)
    }
}
