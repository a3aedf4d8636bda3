//! Device telemetry callback endpoint

use axum::Json;
use axum::extract::State;
use shared::error::ApiResponse;

use crate::devices::events::CallbackRequest;
use crate::error::ServiceResult;
use crate::state::AppState;

/// POST /api/callback/device
///
/// Unauthenticated; when a callback secret is configured the request must
/// carry a valid HMAC signature instead.
pub async fn device_callback(
    State(state): State<AppState>,
    Json(req): Json<CallbackRequest>,
) -> ServiceResult<ApiResponse<()>> {
    state.ingestor.ingest(&req).await?;
    Ok(ApiResponse::message("Event processed"))
}
