//! Audit trail query endpoint (admin only)

use axum::extract::{Query, State};
use serde::Deserialize;
use shared::error::ApiResponse;
use shared::models::{AuditAction, AuditLog, AuditResult};

use crate::db;
use crate::db::audit_logs::AuditFilter;
use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub action: Option<AuditAction>,
    pub result: Option<AuditResult>,
    pub actor_id: Option<i64>,
    pub resource_type: Option<String>,
}

/// GET /api/audit-logs
pub async fn query(
    State(state): State<AppState>,
    Query(q): Query<AuditQuery>,
) -> ServiceResult<ApiResponse<Vec<AuditLog>>> {
    let (limit, offset) = super::Pagination {
        page: q.page,
        per_page: q.per_page,
    }
    .limit_offset();
    let filter = AuditFilter {
        action: q.action,
        result: q.result,
        actor_id: q.actor_id,
        resource_type: q.resource_type.as_deref(),
    };
    let logs = db::audit_logs::query(&state.pool, filter, limit, offset).await?;
    Ok(ApiResponse::success(logs))
}
