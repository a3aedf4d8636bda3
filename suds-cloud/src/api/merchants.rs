//! Merchant endpoints
//!
//! Listing is admin-only; detail is reachable by a merchant for its own id,
//! which the scope guard enforces from the path parameter.

use axum::extract::{Path, Query, State};
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::Merchant;

use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

/// GET /api/merchants
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<super::Pagination>,
) -> ServiceResult<ApiResponse<Vec<Merchant>>> {
    let (limit, offset) = q.limit_offset();
    let merchants = db::merchants::list(&state.pool, limit, offset).await?;
    Ok(ApiResponse::success(merchants))
}

/// GET /api/merchants/{merchant_id}
pub async fn detail(
    State(state): State<AppState>,
    Path(merchant_id): Path<i64>,
) -> ServiceResult<ApiResponse<Merchant>> {
    let merchant = db::merchants::find_by_id(&state.pool, merchant_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::MerchantNotFound))?;
    Ok(ApiResponse::success(merchant))
}
