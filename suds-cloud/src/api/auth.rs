//! Authentication endpoints
//!
//! Login is a public route, so its audit record is written here instead of
//! by the audit middleware. Both outcomes are recorded.

use std::time::Instant;

use axum::extract::State;
use axum::http::{HeaderMap, header};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{AccountStatus, AuditAction, AuditResult, User, UserResponse};

use crate::auth::jwt::CurrentUser;
use crate::db;
use crate::db::audit_logs::NewAuditLog;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::util;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> ServiceResult<ApiResponse<LoginResponse>> {
    let started = Instant::now();
    let username = req.username.trim().to_lowercase();
    if username.is_empty() || req.password.is_empty() {
        return Err(AppError::validation("Username and password are required").into());
    }

    let Some(user) = db::users::find_by_username(&state.pool, &username).await? else {
        record_login(
            &state,
            &headers,
            None,
            &username,
            AuditResult::Failed,
            "Unknown username",
            started,
        )
        .await;
        return Err(AppError::invalid_credentials().into());
    };

    if !util::verify_password(&req.password, &user.password_hash) {
        record_login(
            &state,
            &headers,
            Some(&user),
            &username,
            AuditResult::Failed,
            "Wrong password",
            started,
        )
        .await;
        return Err(AppError::invalid_credentials().into());
    }

    if user.status == AccountStatus::Disabled {
        record_login(
            &state,
            &headers,
            Some(&user),
            &username,
            AuditResult::Failed,
            "Account disabled",
            started,
        )
        .await;
        return Err(AppError::new(ErrorCode::AccountDisabled).into());
    }

    let token = state
        .jwt
        .generate_token(
            user.id,
            &user.username,
            user.role,
            user.merchant_id,
            user.store_id,
        )
        .map_err(AppError::from)?;

    record_login(
        &state,
        &headers,
        Some(&user),
        &username,
        AuditResult::Success,
        "Login",
        started,
    )
    .await;
    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    Ok(ApiResponse::success(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// POST /api/auth/logout
///
/// Tokens are stateless, so there is nothing to revoke server side; the
/// audit middleware records the event.
pub async fn logout() -> ApiResponse<()> {
    ApiResponse::message("Logged out")
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ServiceResult<ApiResponse<UserResponse>> {
    let row = db::users::find_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ApiResponse::success(row.into()))
}

async fn record_login(
    state: &AppState,
    headers: &HeaderMap,
    user: Option<&User>,
    username: &str,
    result: AuditResult,
    description: &str,
    started: Instant,
) {
    // Never snapshot the password field
    let request_data = json!({ "username": username });
    let resource_id = user.map(|u| u.id.to_string());
    let ip = util::client_ip(headers);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let entry = NewAuditLog {
        action: AuditAction::Login,
        resource_type: "auth",
        resource_id: resource_id.as_deref(),
        description,
        actor_id: user.map(|u| u.id),
        actor_role: user.map(|u| u.role.name()),
        request_data: Some(&request_data),
        response_data: None,
        result,
        duration_ms: started.elapsed().as_millis() as i64,
        ip_address: ip.as_deref(),
        user_agent: user_agent.as_deref(),
    };
    state.recorder.record(&entry).await;
}
