//! Device endpoints
//!
//! Customers may browse and read any device (they find machines in the
//! field); operator roles are limited to their own tenant and mutations go
//! through that same scope.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Device, DeviceLog, DeviceStatus, DeviceUpdate, Role};
use shared::util::now_millis;

use crate::auth::jwt::CurrentUser;
use crate::db;
use crate::devices::cache::ErrorDetail;
use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DeviceListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub merchant_id: Option<i64>,
    pub store_id: Option<i64>,
    pub status: Option<DeviceStatus>,
}

/// Device row plus runtime state from the in-memory caches.
#[derive(Debug, Serialize)]
pub struct DeviceView {
    #[serde(flatten)]
    pub device: Device,
    /// True when a heartbeat arrived within the presence window
    pub online_hint: bool,
    pub error: Option<ErrorDetail>,
    pub current_order_no: Option<String>,
}

/// GET /api/devices
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(q): Query<DeviceListQuery>,
) -> ServiceResult<ApiResponse<Vec<Device>>> {
    let (limit, offset) = super::Pagination {
        page: q.page,
        per_page: q.per_page,
    }
    .limit_offset();
    let (merchant_id, store_id) = list_scope(&user, &q)?;
    let devices = db::devices::list(&state.pool, merchant_id, store_id, q.status, limit, offset).await?;
    Ok(ApiResponse::success(devices))
}

/// GET /api/devices/{id}
pub async fn detail(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<DeviceView>> {
    let device = db::devices::find_by_id(&state.pool, id)
        .await?
        .filter(|d| device_visible(&user, d))
        .ok_or_else(|| AppError::new(ErrorCode::DeviceNotFound))?;

    let online_hint = state.device_cache.presence.get(device.id).await.is_some();
    let error = state.device_cache.errors.get(device.id).await;
    let current_order_no = state.device_cache.current_orders.get(device.id).await;
    Ok(ApiResponse::success(DeviceView {
        device,
        online_hint,
        error,
        current_order_no,
    }))
}

/// PUT /api/devices/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(req): Json<DeviceUpdate>,
) -> ServiceResult<ApiResponse<Device>> {
    let device = db::devices::find_by_id(&state.pool, id)
        .await?
        .filter(|d| operator_scope(&user, d))
        .ok_or_else(|| AppError::new(ErrorCode::DeviceNotFound))?;

    if let Some(store_id) = req.store_id {
        let store = db::stores::find_by_id(&state.pool, store_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound))?;
        // A device may only move between stores of its own merchant
        if store.merchant_id != device.merchant_id {
            return Err(AppError::with_message(
                ErrorCode::DataScopeDenied,
                "Store belongs to another merchant",
            )
            .into());
        }
    }

    let updated = db::devices::update(&state.pool, id, &req, now_millis())
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::DeviceNotFound))?;
    tracing::info!(device_id = id, "Device updated");
    Ok(ApiResponse::success(updated))
}

/// GET /api/devices/{id}/logs
pub async fn logs(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(q): Query<super::Pagination>,
    Path(id): Path<i64>,
) -> ServiceResult<ApiResponse<Vec<DeviceLog>>> {
    let device = db::devices::find_by_id(&state.pool, id)
        .await?
        .filter(|d| operator_scope(&user, d))
        .ok_or_else(|| AppError::new(ErrorCode::DeviceNotFound))?;

    let (limit, offset) = q.limit_offset();
    let logs = db::device_logs::list_by_iccid(&state.pool, &device.iccid, limit, offset).await?;
    Ok(ApiResponse::success(logs))
}

/// Merchant/store filters for the caller's role. A scoped role whose token
/// carries no tenant claim is denied rather than given an unscoped query.
fn list_scope(
    user: &CurrentUser,
    q: &DeviceListQuery,
) -> Result<(Option<i64>, Option<i64>), AppError> {
    match user.role {
        Role::Admin => Ok((q.merchant_id, q.store_id)),
        Role::Merchant => {
            let merchant_id = user
                .merchant_id
                .ok_or_else(|| AppError::new(ErrorCode::DataScopeDenied))?;
            Ok((Some(merchant_id), q.store_id))
        }
        Role::StoreManager | Role::Staff => {
            let store_id = user
                .store_id
                .ok_or_else(|| AppError::new(ErrorCode::DataScopeDenied))?;
            Ok((None, Some(store_id)))
        }
        Role::User => Ok((None, q.store_id)),
    }
}

fn operator_scope(user: &CurrentUser, device: &Device) -> bool {
    match user.role {
        Role::Admin => true,
        Role::Merchant => user.merchant_id == Some(device.merchant_id),
        Role::StoreManager | Role::Staff => user.store_id == Some(device.store_id),
        Role::User => false,
    }
}

fn device_visible(user: &CurrentUser, device: &Device) -> bool {
    user.role == Role::User || operator_scope(user, device)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current_user(role: Role, merchant_id: Option<i64>, store_id: Option<i64>) -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "tester".to_string(),
            role,
            merchant_id,
            store_id,
        }
    }

    fn device(merchant_id: i64, store_id: i64) -> Device {
        Device {
            id: 10,
            iccid: "8986001".to_string(),
            name: None,
            merchant_id,
            store_id,
            status: DeviceStatus::Online,
            location: None,
            latitude: None,
            longitude: None,
            last_online_at: None,
            last_offline_at: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_operator_scope() {
        let d = device(7, 3);
        assert!(operator_scope(&current_user(Role::Admin, None, None), &d));
        assert!(operator_scope(&current_user(Role::Merchant, Some(7), None), &d));
        assert!(!operator_scope(&current_user(Role::Merchant, Some(8), None), &d));
        assert!(operator_scope(&current_user(Role::StoreManager, Some(7), Some(3)), &d));
        assert!(!operator_scope(&current_user(Role::Staff, Some(7), Some(4)), &d));
        assert!(!operator_scope(&current_user(Role::User, None, None), &d));
    }

    #[test]
    fn test_customers_can_read_any_device() {
        let d = device(7, 3);
        assert!(device_visible(&current_user(Role::User, None, None), &d));
        assert!(!device_visible(&current_user(Role::Merchant, Some(8), None), &d));
    }

    #[test]
    fn test_list_scope_per_role() {
        let q = DeviceListQuery {
            page: None,
            per_page: None,
            merchant_id: Some(99),
            store_id: Some(5),
            status: None,
        };
        assert_eq!(
            list_scope(&current_user(Role::Admin, None, None), &q).unwrap(),
            (Some(99), Some(5))
        );
        assert_eq!(
            list_scope(&current_user(Role::Merchant, Some(7), None), &q).unwrap(),
            (Some(7), Some(5))
        );
        assert_eq!(
            list_scope(&current_user(Role::Staff, Some(7), Some(3)), &q).unwrap(),
            (None, Some(3))
        );
        assert_eq!(
            list_scope(&current_user(Role::User, None, None), &q).unwrap(),
            (None, Some(5))
        );
        assert!(list_scope(&current_user(Role::Merchant, None, None), &q).is_err());
    }
}
