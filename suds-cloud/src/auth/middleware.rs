//! JWT authentication middleware for the management API

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared::error::{AppError, ErrorCode};

use crate::auth::jwt::{CurrentUser, JwtService};
use crate::state::AppState;

/// Extracts and verifies the bearer token, then injects [`CurrentUser`]
/// into request extensions for downstream middleware and handlers.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotAuthenticated, "Missing Authorization header")
                .into_response()
        })?;

    let token = JwtService::extract_from_header(auth_header).ok_or_else(|| {
        AppError::with_message(ErrorCode::NotAuthenticated, "Invalid Authorization format")
            .into_response()
    })?;

    let claims = state.jwt.validate_token(token).map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        AppError::from(e).into_response()
    })?;

    let user = CurrentUser::try_from(claims).map_err(|e| AppError::from(e).into_response())?;

    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}
