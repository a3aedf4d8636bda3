//! User endpoints
//!
//! Profile updates are self-service (admins may edit anyone); password
//! changes are strictly self-service for every role.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Role, User, UserResponse};
use shared::util::now_millis;

use crate::auth::jwt::CurrentUser;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::util;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// GET /api/users/{id}
pub async fn detail(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<UserResponse>> {
    let target = db::users::find_by_id(&state.pool, id)
        .await?
        .filter(|t| user_visible(&user, t))
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(ApiResponse::success(target.into()))
}

/// PUT /api/users/{id}/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProfileRequest>,
) -> ServiceResult<ApiResponse<UserResponse>> {
    if user.role != Role::Admin && id != user.id {
        return Err(AppError::permission_denied("May only update own profile").into());
    }

    let updated = db::users::update_profile(&state.pool, id, req.phone.as_deref(), now_millis())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    tracing::info!(user_id = id, "Profile updated");
    Ok(ApiResponse::success(updated.into()))
}

/// PUT /api/users/{id}/password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<ChangePasswordRequest>,
) -> ServiceResult<ApiResponse<()>> {
    if id != user.id {
        return Err(AppError::with_message(
            ErrorCode::SelfServiceOnly,
            "May only change own password",
        )
        .into());
    }
    if req.new_password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort).into());
    }

    let row = db::users::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    if !util::verify_password(&req.old_password, &row.password_hash) {
        return Err(AppError::invalid_credentials().into());
    }

    let hash = util::hash_password(&req.new_password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
    if !db::users::update_password(&state.pool, id, &hash, now_millis()).await? {
        return Err(AppError::new(ErrorCode::UserNotFound).into());
    }
    tracing::info!(user_id = id, "Password changed");
    Ok(ApiResponse::message("Password changed"))
}

/// Self always; otherwise per-role tenant reach. Claim-less scoped roles
/// match nothing.
fn user_visible(current: &CurrentUser, target: &User) -> bool {
    if current.id == target.id {
        return true;
    }
    match current.role {
        Role::Admin => true,
        Role::Merchant => {
            current.merchant_id.is_some() && current.merchant_id == target.merchant_id
        }
        Role::StoreManager | Role::Staff => {
            current.store_id.is_some() && current.store_id == target.store_id
        }
        Role::User => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::AccountStatus;

    fn current_user(id: i64, role: Role, merchant_id: Option<i64>, store_id: Option<i64>) -> CurrentUser {
        CurrentUser {
            id,
            username: "tester".to_string(),
            role,
            merchant_id,
            store_id,
        }
    }

    fn target(id: i64, merchant_id: Option<i64>, store_id: Option<i64>) -> User {
        User {
            id,
            username: "target".to_string(),
            password_hash: String::new(),
            role: Role::Staff,
            merchant_id,
            store_id,
            balance: 0,
            phone: None,
            status: AccountStatus::Active,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_self_always_visible() {
        let me = current_user(5, Role::User, None, None);
        assert!(user_visible(&me, &target(5, None, None)));
        assert!(!user_visible(&me, &target(6, None, None)));
    }

    #[test]
    fn test_tenant_reach() {
        let merchant = current_user(1, Role::Merchant, Some(7), None);
        assert!(user_visible(&merchant, &target(2, Some(7), Some(3))));
        assert!(!user_visible(&merchant, &target(2, Some(8), Some(3))));

        let manager = current_user(1, Role::StoreManager, Some(7), Some(3));
        assert!(user_visible(&manager, &target(2, Some(7), Some(3))));
        assert!(!user_visible(&manager, &target(2, Some(7), Some(4))));

        assert!(user_visible(&current_user(1, Role::Admin, None, None), &target(2, None, None)));
    }

    #[test]
    fn test_missing_claim_matches_nothing() {
        // A merchant with no claim must not see claim-less accounts
        let merchant = current_user(1, Role::Merchant, None, None);
        assert!(!user_visible(&merchant, &target(2, None, None)));

        let staff = current_user(1, Role::Staff, Some(7), None);
        assert!(!user_visible(&staff, &target(2, Some(7), None)));
    }
}
