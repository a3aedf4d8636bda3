//! Store endpoints

use axum::extract::{Path, Query, State};
use axum::Extension;
use serde::Deserialize;
use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::{Role, Store};

use crate::auth::jwt::CurrentUser;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StoreListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub merchant_id: Option<i64>,
}

/// GET /api/stores
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(q): Query<StoreListQuery>,
) -> ServiceResult<ApiResponse<Vec<Store>>> {
    let (limit, offset) = super::Pagination {
        page: q.page,
        per_page: q.per_page,
    }
    .limit_offset();

    let stores = match user.role {
        Role::Admin => db::stores::list(&state.pool, q.merchant_id, limit, offset).await?,
        Role::Merchant => {
            let merchant_id = user
                .merchant_id
                .ok_or_else(|| AppError::new(ErrorCode::DataScopeDenied))?;
            db::stores::list(&state.pool, Some(merchant_id), limit, offset).await?
        }
        Role::StoreManager | Role::Staff => {
            let store_id = user
                .store_id
                .ok_or_else(|| AppError::new(ErrorCode::DataScopeDenied))?;
            db::stores::find_by_id(&state.pool, store_id)
                .await?
                .into_iter()
                .collect()
        }
        Role::User => {
            return Err(AppError::permission_denied("Customers may not list stores").into());
        }
    };
    Ok(ApiResponse::success(stores))
}

/// GET /api/stores/{store_id}
pub async fn detail(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(store_id): Path<i64>,
) -> ServiceResult<ApiResponse<Store>> {
    let store = db::stores::find_by_id(&state.pool, store_id)
        .await?
        .filter(|s| store_visible(&user, s))
        .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound))?;
    Ok(ApiResponse::success(store))
}

fn store_visible(user: &CurrentUser, store: &Store) -> bool {
    match user.role {
        Role::Admin => true,
        Role::Merchant => user.merchant_id == Some(store.merchant_id),
        Role::StoreManager | Role::Staff => user.store_id == Some(store.id),
        Role::User => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::AccountStatus;

    fn current_user(role: Role, merchant_id: Option<i64>, store_id: Option<i64>) -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "tester".to_string(),
            role,
            merchant_id,
            store_id,
        }
    }

    #[test]
    fn test_store_visibility() {
        let store = Store {
            id: 3,
            merchant_id: 7,
            name: "Main".to_string(),
            address: None,
            status: AccountStatus::Active,
            created_at: 0,
        };
        assert!(store_visible(&current_user(Role::Admin, None, None), &store));
        assert!(store_visible(&current_user(Role::Merchant, Some(7), None), &store));
        assert!(!store_visible(&current_user(Role::Merchant, Some(8), None), &store));
        assert!(store_visible(&current_user(Role::StoreManager, Some(7), Some(3)), &store));
        assert!(!store_visible(&current_user(Role::Staff, Some(7), Some(4)), &store));
        assert!(!store_visible(&current_user(Role::User, None, None), &store));
    }
}
