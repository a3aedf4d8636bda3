//! Audit middleware
//!
//! Wraps the mutating routes listed in [`AUDITED_ROUTES`]. Each call writes
//! exactly one entry: request and response snapshots are buffered, sanitized
//! and persisted after the handler ran. `FAILED` is recorded for any error
//! response, including denials from the scope guard running inside this
//! layer.

use std::time::Instant;

use axum::body::Body;
use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::USER_AGENT;
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::models::{AuditAction, AuditResult};

use crate::audit::sanitize::{sanitize, truncate_oversized};
use crate::auth::jwt::CurrentUser;
use crate::auth::scope::path_param;
use crate::db::audit_logs::NewAuditLog;
use crate::state::AppState;
use crate::util::client_ip;

const BODY_LIMIT: usize = 2 * 1024 * 1024;

/// One auditable route.
#[derive(Debug)]
pub struct AuditedRoute {
    pub method: &'static str,
    pub path: &'static str,
    pub action: AuditAction,
    pub resource_type: &'static str,
    /// Path parameter recorded as the resource id, if the route has one.
    pub id_param: Option<&'static str>,
    pub description: &'static str,
}

pub const AUDITED_ROUTES: &[AuditedRoute] = &[
    AuditedRoute {
        method: "POST",
        path: "/api/orders",
        action: AuditAction::Create,
        resource_type: "order",
        id_param: None,
        description: "Create order",
    },
    AuditedRoute {
        method: "POST",
        path: "/api/orders/{order_no}/pay",
        action: AuditAction::Update,
        resource_type: "order",
        id_param: Some("order_no"),
        description: "Pay order",
    },
    AuditedRoute {
        method: "POST",
        path: "/api/orders/{order_no}/cancel",
        action: AuditAction::Update,
        resource_type: "order",
        id_param: Some("order_no"),
        description: "Cancel order",
    },
    AuditedRoute {
        method: "POST",
        path: "/api/admin/orders/{order_no}/start",
        action: AuditAction::Update,
        resource_type: "order",
        id_param: Some("order_no"),
        description: "Start wash",
    },
    AuditedRoute {
        method: "POST",
        path: "/api/admin/orders/{order_no}/complete",
        action: AuditAction::Update,
        resource_type: "order",
        id_param: Some("order_no"),
        description: "Complete wash",
    },
    AuditedRoute {
        method: "PUT",
        path: "/api/admin/orders/{order_no}",
        action: AuditAction::Update,
        resource_type: "order",
        id_param: Some("order_no"),
        description: "Admin order update",
    },
    AuditedRoute {
        method: "PUT",
        path: "/api/devices/{id}",
        action: AuditAction::Update,
        resource_type: "device",
        id_param: Some("id"),
        description: "Update device",
    },
    AuditedRoute {
        method: "PUT",
        path: "/api/users/{id}/profile",
        action: AuditAction::Update,
        resource_type: "user",
        id_param: Some("id"),
        description: "Update profile",
    },
    AuditedRoute {
        method: "PUT",
        path: "/api/users/{id}/password",
        action: AuditAction::Update,
        resource_type: "user",
        id_param: Some("id"),
        description: "Change password",
    },
    AuditedRoute {
        method: "POST",
        path: "/api/auth/logout",
        action: AuditAction::Logout,
        resource_type: "auth",
        id_param: None,
        description: "Logout",
    },
];

pub fn find_audited(method: &str, path: &str) -> Option<&'static AuditedRoute> {
    AUDITED_ROUTES
        .iter()
        .find(|r| r.method == method && r.path == path)
}

/// Any error status counts as a failed call, scope denials included.
fn result_for(status: http::StatusCode) -> AuditResult {
    if status.as_u16() < 400 {
        AuditResult::Success
    } else {
        AuditResult::Failed
    }
}

pub async fn audit_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let matched = request
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string());

    let Some(route) = matched
        .as_deref()
        .and_then(|m| find_audited(method.as_str(), m))
    else {
        return next.run(request).await;
    };
    let matched = matched.unwrap_or_default();

    let user = request.extensions().get::<CurrentUser>().cloned();
    let ip_address = client_ip(request.headers());
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let path = request.uri().path().to_string();
    let resource_id = route
        .id_param
        .and_then(|name| path_param(&matched, &path, name));

    let (parts, body) = request.into_parts();
    let bytes = match axum::body::to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return AppError::with_message(ErrorCode::InvalidRequest, "Request body too large")
                .into_response();
        }
    };
    let request_data = serde_json::from_slice::<Value>(&bytes).ok().map(|v| sanitize(&v));
    let request = Request::from_parts(parts, Body::from(bytes));

    let started = Instant::now();
    let response = next.run(request).await;
    let duration_ms = started.elapsed().as_millis() as i64;

    let status = response.status();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let response_data = serde_json::from_slice::<Value>(&bytes)
        .ok()
        .map(|v| truncate_oversized(sanitize(&v)));
    let response = Response::from_parts(parts, Body::from(bytes));

    let result = result_for(status);

    let entry = NewAuditLog {
        action: route.action,
        resource_type: route.resource_type,
        resource_id: resource_id.as_deref(),
        description: route.description,
        actor_id: user.as_ref().map(|u| u.id),
        actor_role: user.as_ref().map(|u| u.role.name()),
        request_data: request_data.as_ref(),
        response_data: response_data.as_ref(),
        result,
        duration_ms,
        ip_address: ip_address.as_deref(),
        user_agent: user_agent.as_deref(),
    };
    state.recorder.record(&entry).await;

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_audited() {
        let route = find_audited("POST", "/api/orders").expect("route");
        assert_eq!(route.action, AuditAction::Create);
        assert_eq!(route.resource_type, "order");

        assert!(find_audited("GET", "/api/orders").is_none());
    }

    #[test]
    fn test_result_for_status() {
        use http::StatusCode;
        assert_eq!(result_for(StatusCode::OK), AuditResult::Success);
        assert_eq!(result_for(StatusCode::CREATED), AuditResult::Success);
        assert_eq!(result_for(StatusCode::FORBIDDEN), AuditResult::Failed);
        assert_eq!(
            result_for(StatusCode::INTERNAL_SERVER_ERROR),
            AuditResult::Failed
        );
    }

    #[test]
    fn test_audited_routes_are_mutating() {
        for route in AUDITED_ROUTES {
            assert!(
                matches!(route.method, "POST" | "PUT" | "PATCH" | "DELETE"),
                "{} {} is not a mutating route",
                route.method,
                route.path
            );
        }
    }

    #[test]
    fn test_id_param_routes_carry_placeholder() {
        for route in AUDITED_ROUTES {
            if let Some(param) = route.id_param {
                assert!(
                    route.path.contains(&format!("{{{param}}}")),
                    "{} does not contain {{{param}}}",
                    route.path
                );
            }
        }
    }
}
