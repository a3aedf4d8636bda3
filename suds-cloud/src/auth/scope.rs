//! Role and data-scope authorization
//!
//! Every management route carries a static policy listing the roles that may
//! call it. After the role check, tenant-scoped callers must match the
//! request's merchant/store id, resolved from the path, then the body, then
//! the caller's own claim. Staff additionally may only mutate a small
//! self-service set of routes.

use axum::body::Body;
use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::Method;
use shared::error::{AppError, ErrorCode};
use shared::models::Role;

use crate::auth::jwt::CurrentUser;

/// Static access policy for one route.
#[derive(Debug)]
pub struct RoutePolicy {
    pub method: &'static str,
    /// Route template as registered with the router, e.g. `/api/orders/{order_no}`
    pub path: &'static str,
    /// Roles allowed besides admin. Empty means admin only.
    pub roles: &'static [Role],
}

const ADMIN_ONLY: &[Role] = &[];
const MANAGERS: &[Role] = &[Role::Merchant, Role::StoreManager, Role::Staff];
const EVERYONE: &[Role] = &[Role::Merchant, Role::StoreManager, Role::Staff, Role::User];

/// Consulted by [`require_scope`]. A route missing from this table is
/// denied for every non-admin caller.
pub const ROUTE_POLICIES: &[RoutePolicy] = &[
    RoutePolicy { method: "POST", path: "/api/auth/logout", roles: EVERYONE },
    RoutePolicy { method: "GET", path: "/api/auth/me", roles: EVERYONE },
    RoutePolicy { method: "POST", path: "/api/orders", roles: &[Role::User] },
    RoutePolicy { method: "GET", path: "/api/orders", roles: EVERYONE },
    RoutePolicy { method: "GET", path: "/api/orders/{order_no}", roles: EVERYONE },
    RoutePolicy { method: "POST", path: "/api/orders/{order_no}/pay", roles: &[Role::User] },
    RoutePolicy { method: "POST", path: "/api/orders/{order_no}/cancel", roles: &[Role::User] },
    RoutePolicy { method: "POST", path: "/api/admin/orders/{order_no}/start", roles: ADMIN_ONLY },
    RoutePolicy { method: "POST", path: "/api/admin/orders/{order_no}/complete", roles: ADMIN_ONLY },
    RoutePolicy { method: "PUT", path: "/api/admin/orders/{order_no}", roles: ADMIN_ONLY },
    RoutePolicy { method: "GET", path: "/api/devices", roles: EVERYONE },
    RoutePolicy { method: "GET", path: "/api/devices/{id}", roles: EVERYONE },
    RoutePolicy { method: "PUT", path: "/api/devices/{id}", roles: MANAGERS },
    RoutePolicy { method: "GET", path: "/api/devices/{id}/logs", roles: MANAGERS },
    RoutePolicy { method: "GET", path: "/api/merchants", roles: ADMIN_ONLY },
    RoutePolicy { method: "GET", path: "/api/merchants/{merchant_id}", roles: &[Role::Merchant] },
    RoutePolicy { method: "GET", path: "/api/stores", roles: MANAGERS },
    RoutePolicy { method: "GET", path: "/api/stores/{store_id}", roles: MANAGERS },
    RoutePolicy { method: "GET", path: "/api/users/{id}", roles: EVERYONE },
    RoutePolicy { method: "PUT", path: "/api/users/{id}/profile", roles: EVERYONE },
    RoutePolicy { method: "PUT", path: "/api/users/{id}/password", roles: EVERYONE },
    RoutePolicy { method: "GET", path: "/api/audit-logs", roles: ADMIN_ONLY },
];

/// Mutating routes staff may call on their own account.
const STAFF_SELF_SERVICE: &[(&str, &str)] = &[
    ("PUT", "/api/users/{id}/profile"),
    ("PUT", "/api/users/{id}/password"),
];

const BODY_PEEK_LIMIT: usize = 1024 * 1024;

pub fn find_policy(method: &str, path: &str) -> Option<&'static RoutePolicy> {
    ROUTE_POLICIES
        .iter()
        .find(|p| p.method == method && p.path == path)
}

fn is_mutating(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Extract a named parameter by walking the matched template against the
/// concrete request path.
pub(crate) fn path_param(template: &str, path: &str, name: &str) -> Option<String> {
    template.split('/').zip(path.split('/')).find_map(|(t, r)| {
        t.strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .filter(|p| *p == name)
            .map(|_| r.to_string())
    })
}

fn staff_mutation_allowed(method: &str, matched: &str, path: &str, user_id: i64) -> bool {
    let listed = STAFF_SELF_SERVICE
        .iter()
        .any(|(m, p)| *m == method && *p == matched);
    listed
        && path_param(matched, path, "id").and_then(|v| v.parse::<i64>().ok()) == Some(user_id)
}

/// The scope id column a role is constrained by, if any.
fn scope_key(role: Role) -> Option<&'static str> {
    match role {
        Role::Merchant => Some("merchant_id"),
        Role::StoreManager | Role::Staff => Some("store_id"),
        _ => None,
    }
}

fn claim_for(user: &CurrentUser, key: &str) -> Option<i64> {
    match key {
        "merchant_id" => user.merchant_id,
        "store_id" => user.store_id,
        _ => None,
    }
}

/// Path beats body beats claim. A request that names no scope id falls back
/// to the claim and matches trivially.
fn scope_matches(claim: Option<i64>, from_path: Option<i64>, from_body: Option<i64>) -> bool {
    from_path.or(from_body).or(claim) == claim
}

/// Buffer the JSON body far enough to read one scope id, then rebuild the
/// request for the handler.
async fn peek_body_id(request: Request, key: &str) -> Result<(Request, Option<i64>), Response> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, BODY_PEEK_LIMIT)
        .await
        .map_err(|_| {
            AppError::with_message(ErrorCode::InvalidRequest, "Request body too large")
                .into_response()
        })?;
    let id = serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .and_then(|v| v.get(key).and_then(|x| x.as_i64()));
    Ok((Request::from_parts(parts, Body::from(bytes)), id))
}

/// Role and data-scope check. Runs after [`require_auth`], before handlers.
///
/// [`require_auth`]: crate::auth::middleware::require_auth
pub async fn require_scope(request: Request, next: Next) -> Result<Response, Response> {
    let user = request
        .extensions()
        .get::<CurrentUser>()
        .cloned()
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotAuthenticated, "Missing authentication context")
                .into_response()
        })?;

    if user.is_admin() {
        return Ok(next.run(request).await);
    }

    let method = request.method().clone();
    let matched = request
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| AppError::new(ErrorCode::PermissionDenied).into_response())?;

    let policy = find_policy(method.as_str(), &matched).ok_or_else(|| {
        AppError::with_message(ErrorCode::PermissionDenied, "No access policy for this route")
            .into_response()
    })?;

    if !policy.roles.contains(&user.role) {
        return Err(AppError::with_message(
            ErrorCode::RoleRequired,
            format!("Role {} may not call this route", user.role.name()),
        )
        .into_response());
    }

    let path = request.uri().path().to_string();

    if user.role == Role::Staff && is_mutating(&method) {
        if !staff_mutation_allowed(method.as_str(), &matched, &path, user.id) {
            return Err(AppError::new(ErrorCode::SelfServiceOnly).into_response());
        }
        return Ok(next.run(request).await);
    }

    let Some(key) = scope_key(user.role) else {
        return Ok(next.run(request).await);
    };

    let claim = claim_for(&user, key);
    let from_path = path_param(&matched, &path, key).and_then(|v| v.parse::<i64>().ok());

    let (request, from_body) = if from_path.is_none() && is_mutating(&method) {
        peek_body_id(request, key).await?
    } else {
        (request, None)
    };

    if !scope_matches(claim, from_path, from_body) {
        return Err(AppError::with_message(
            ErrorCode::DataScopeDenied,
            format!("Request {key} is outside the caller's scope"),
        )
        .into_response());
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_policy() {
        let policy = find_policy("POST", "/api/orders").expect("policy");
        assert_eq!(policy.roles, &[Role::User]);
        assert!(find_policy("DELETE", "/api/orders").is_none());
    }

    #[test]
    fn test_admin_only_routes_list_no_roles() {
        let policy = find_policy("GET", "/api/audit-logs").expect("policy");
        assert!(policy.roles.is_empty());
        let policy = find_policy("PUT", "/api/admin/orders/{order_no}").expect("policy");
        assert!(policy.roles.is_empty());
    }

    #[test]
    fn test_path_param() {
        assert_eq!(
            path_param("/api/orders/{order_no}/pay", "/api/orders/WC99/pay", "order_no").as_deref(),
            Some("WC99")
        );
        assert_eq!(
            path_param("/api/users/{id}/profile", "/api/users/12/profile", "id").as_deref(),
            Some("12")
        );
        assert_eq!(path_param("/api/orders", "/api/orders", "id"), None);
    }

    #[test]
    fn test_staff_cannot_update_device() {
        assert!(!staff_mutation_allowed(
            "PUT",
            "/api/devices/{id}",
            "/api/devices/9",
            9
        ));
    }

    #[test]
    fn test_staff_own_profile_allowed() {
        assert!(staff_mutation_allowed(
            "PUT",
            "/api/users/{id}/profile",
            "/api/users/7/profile",
            7
        ));
        assert!(staff_mutation_allowed(
            "PUT",
            "/api/users/{id}/password",
            "/api/users/7/password",
            7
        ));
    }

    #[test]
    fn test_staff_other_profile_denied() {
        assert!(!staff_mutation_allowed(
            "PUT",
            "/api/users/{id}/profile",
            "/api/users/8/profile",
            7
        ));
    }

    #[test]
    fn test_scope_matches_priority() {
        // Path id wins even when the body names another scope.
        assert!(scope_matches(Some(5), Some(5), Some(7)));
        assert!(!scope_matches(Some(5), Some(7), Some(5)));
        // Body consulted only when the path has no id.
        assert!(!scope_matches(Some(5), None, Some(7)));
        assert!(scope_matches(Some(5), None, Some(5)));
        // Claim fallback matches trivially.
        assert!(scope_matches(Some(5), None, None));
        assert!(scope_matches(None, None, None));
        // A caller without a claim may not name one.
        assert!(!scope_matches(None, Some(1), None));
    }

    #[test]
    fn test_scope_key_by_role() {
        assert_eq!(scope_key(Role::Merchant), Some("merchant_id"));
        assert_eq!(scope_key(Role::StoreManager), Some("store_id"));
        assert_eq!(scope_key(Role::Staff), Some("store_id"));
        assert_eq!(scope_key(Role::User), None);
        assert_eq!(scope_key(Role::Admin), None);
    }
}
