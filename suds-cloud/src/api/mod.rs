//! API routes for suds-cloud

pub mod audit;
pub mod auth;
pub mod callback;
pub mod devices;
pub mod health;
pub mod merchants;
pub mod orders;
pub mod stores;
pub mod users;

use axum::routing::{get, post, put};
use axum::{Router, middleware};
use serde::Deserialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::audit::middleware::audit_mutations;
use crate::auth::middleware::require_auth;
use crate::auth::scope::require_scope;
use crate::state::AppState;

/// Common list pagination query.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    /// Clamped LIMIT/OFFSET pair.
    pub fn limit_offset(&self) -> (i64, i64) {
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let page = self.page.unwrap_or(1).max(1);
        (per_page, (page - 1) * per_page)
    }
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Public endpoints (no auth)
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/api/auth/login", post(auth::login))
        .route("/api/callback/device", post(callback::device_callback));

    // Management API. Layers run top-down: authenticate, capture the audit
    // snapshot, then enforce role and data scope, so denials are audited.
    let protected = Router::new()
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me))
        .route("/api/orders", post(orders::create).get(orders::list))
        .route("/api/orders/{order_no}", get(orders::detail))
        .route("/api/orders/{order_no}/pay", post(orders::pay))
        .route("/api/orders/{order_no}/cancel", post(orders::cancel))
        .route("/api/admin/orders/{order_no}/start", post(orders::start_wash))
        .route(
            "/api/admin/orders/{order_no}/complete",
            post(orders::complete_wash),
        )
        .route("/api/admin/orders/{order_no}", put(orders::admin_update))
        .route("/api/devices", get(devices::list))
        .route("/api/devices/{id}", get(devices::detail).put(devices::update))
        .route("/api/devices/{id}/logs", get(devices::logs))
        .route("/api/merchants", get(merchants::list))
        .route("/api/merchants/{merchant_id}", get(merchants::detail))
        .route("/api/stores", get(stores::list))
        .route("/api/stores/{store_id}", get(stores::detail))
        .route("/api/users/{id}", get(users::detail))
        .route("/api/users/{id}/profile", put(users::update_profile))
        .route("/api/users/{id}/password", put(users::change_password))
        .route("/api/audit-logs", get(audit::query))
        .layer(middleware::from_fn(require_scope))
        .layer(middleware::from_fn_with_state(state.clone(), audit_mutations))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let p = Pagination {
            page: None,
            per_page: None,
        };
        assert_eq!(p.limit_offset(), (20, 0));
    }

    #[test]
    fn test_pagination_clamps() {
        let p = Pagination {
            page: Some(0),
            per_page: Some(500),
        };
        assert_eq!(p.limit_offset(), (100, 0));

        let p = Pagination {
            page: Some(3),
            per_page: Some(10),
        };
        assert_eq!(p.limit_offset(), (10, 20));
    }
}
