//! Order endpoints
//!
//! List and detail visibility follows the caller's role: customers see their
//! own orders, store roles their store, merchants their merchant, admins
//! everything. Out-of-scope orders read as not found.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Order, OrderStatus, OrderUpdate, Role};

use crate::auth::jwt::CurrentUser;
use crate::db::orders::OrderFilter;
use crate::error::ServiceResult;
use crate::orders::service::CreateOrder;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub device_id: i64,
    pub wash_type: String,
    pub duration: i32,
    pub amount: i64,
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PayRequest {
    pub payment_method: String,
    pub payment_ref: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    /// Measured wash time in minutes; replaces the planned duration.
    pub actual_duration: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<OrderStatus>,
    pub store_id: Option<i64>,
}

/// POST /api/orders
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateOrderRequest>,
) -> ServiceResult<ApiResponse<Order>> {
    if req.wash_type.trim().is_empty() {
        return Err(AppError::validation("Wash type is required").into());
    }
    if !(1..=60).contains(&req.duration) {
        return Err(AppError::validation("Duration must be 1-60 minutes").into());
    }
    if req.amount <= 0 {
        return Err(AppError::validation("Amount must be positive").into());
    }

    let order = state
        .orders
        .create(
            user.id,
            &CreateOrder {
                device_id: req.device_id,
                wash_type: req.wash_type.trim().to_string(),
                duration: req.duration,
                amount: req.amount,
                remark: req.remark,
            },
        )
        .await?;
    tracing::info!(order_no = %order.order_no, user_id = user.id, "Order created");
    Ok(ApiResponse::success(order))
}

/// GET /api/orders
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(q): Query<OrderListQuery>,
) -> ServiceResult<ApiResponse<Vec<Order>>> {
    let (limit, offset) = super::Pagination {
        page: q.page,
        per_page: q.per_page,
    }
    .limit_offset();
    let filter = tenant_filter(&user, &q)?;
    let orders = state.orders.list(filter, limit, offset).await?;
    Ok(ApiResponse::success(orders))
}

/// GET /api/orders/{order_no}
pub async fn detail(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(order_no): Path<String>,
) -> ServiceResult<ApiResponse<Order>> {
    let order = state
        .orders
        .find(&order_no)
        .await?
        .filter(|o| order_visible(&user, o))
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(ApiResponse::success(order))
}

/// POST /api/orders/{order_no}/pay
pub async fn pay(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(order_no): Path<String>,
    Json(req): Json<PayRequest>,
) -> ServiceResult<ApiResponse<Order>> {
    let order = state
        .orders
        .pay(user.id, &order_no, &req.payment_method, req.payment_ref.as_deref())
        .await?;
    tracing::info!(order_no = %order.order_no, method = %req.payment_method, "Order paid");
    Ok(ApiResponse::success(order))
}

/// POST /api/orders/{order_no}/cancel
pub async fn cancel(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(order_no): Path<String>,
) -> ServiceResult<ApiResponse<Order>> {
    let order = state.orders.cancel(user.id, &order_no).await?;
    tracing::info!(order_no = %order.order_no, user_id = user.id, "Order cancelled");
    Ok(ApiResponse::success(order))
}

/// POST /api/admin/orders/{order_no}/start
pub async fn start_wash(
    State(state): State<AppState>,
    Path(order_no): Path<String>,
) -> ServiceResult<ApiResponse<Order>> {
    let order = state.orders.start_wash(&order_no).await?;
    Ok(ApiResponse::success(order))
}

/// POST /api/admin/orders/{order_no}/complete
pub async fn complete_wash(
    State(state): State<AppState>,
    Path(order_no): Path<String>,
    Json(req): Json<CompleteRequest>,
) -> ServiceResult<ApiResponse<Order>> {
    let order = state
        .orders
        .complete_wash(&order_no, req.actual_duration)
        .await?;
    Ok(ApiResponse::success(order))
}

/// PUT /api/admin/orders/{order_no}
pub async fn admin_update(
    State(state): State<AppState>,
    Path(order_no): Path<String>,
    Json(req): Json<OrderUpdate>,
) -> ServiceResult<ApiResponse<Order>> {
    let order = state.orders.admin_update(&order_no, &req).await?;
    tracing::info!(order_no = %order.order_no, "Order updated by admin");
    Ok(ApiResponse::success(order))
}

/// Build the list filter for the caller's role. A scoped role whose token
/// carries no tenant claim is denied rather than given an unscoped query.
fn tenant_filter(user: &CurrentUser, q: &OrderListQuery) -> Result<OrderFilter, AppError> {
    let filter = match user.role {
        Role::Admin => OrderFilter {
            status: q.status,
            store_id: q.store_id,
            ..Default::default()
        },
        Role::Merchant => {
            let merchant_id = user
                .merchant_id
                .ok_or_else(|| AppError::new(ErrorCode::DataScopeDenied))?;
            OrderFilter {
                merchant_id: Some(merchant_id),
                store_id: q.store_id,
                status: q.status,
                ..Default::default()
            }
        }
        Role::StoreManager | Role::Staff => {
            let store_id = user
                .store_id
                .ok_or_else(|| AppError::new(ErrorCode::DataScopeDenied))?;
            OrderFilter {
                store_id: Some(store_id),
                status: q.status,
                ..Default::default()
            }
        }
        Role::User => OrderFilter {
            user_id: Some(user.id),
            status: q.status,
            ..Default::default()
        },
    };
    Ok(filter)
}

fn order_visible(user: &CurrentUser, order: &Order) -> bool {
    match user.role {
        Role::Admin => true,
        Role::Merchant => user.merchant_id == Some(order.merchant_id),
        Role::StoreManager | Role::Staff => user.store_id == Some(order.store_id),
        Role::User => user.id == order.user_id,
    }
}
