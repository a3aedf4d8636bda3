//! Audit log operations

use serde_json::Value;
use shared::models::{AuditAction, AuditLog, AuditResult};
use sqlx::PgPool;

/// One entry to persist. Built by the recorder after sanitization.
#[derive(Debug)]
pub struct NewAuditLog<'a> {
    pub action: AuditAction,
    pub resource_type: &'a str,
    pub resource_id: Option<&'a str>,
    pub description: &'a str,
    pub actor_id: Option<i64>,
    pub actor_role: Option<&'a str>,
    pub request_data: Option<&'a Value>,
    pub response_data: Option<&'a Value>,
    pub result: AuditResult,
    pub duration_ms: i64,
    pub ip_address: Option<&'a str>,
    pub user_agent: Option<&'a str>,
}

pub async fn insert(pool: &PgPool, entry: &NewAuditLog<'_>, now: i64) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO audit_logs (action, resource_type, resource_id, description, actor_id, actor_role, request_data, response_data, result, duration_ms, ip_address, user_agent, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
    )
    .bind(entry.action)
    .bind(entry.resource_type)
    .bind(entry.resource_id)
    .bind(entry.description)
    .bind(entry.actor_id)
    .bind(entry.actor_role)
    .bind(entry.request_data)
    .bind(entry.response_data)
    .bind(entry.result)
    .bind(entry.duration_ms)
    .bind(entry.ip_address)
    .bind(entry.user_agent)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Filters for audit queries. `None` fields do not constrain.
#[derive(Debug, Default, Clone, Copy)]
pub struct AuditFilter<'a> {
    pub action: Option<AuditAction>,
    pub result: Option<AuditResult>,
    pub actor_id: Option<i64>,
    pub resource_type: Option<&'a str>,
}

pub async fn query(
    pool: &PgPool,
    filter: AuditFilter<'_>,
    limit: i64,
    offset: i64,
) -> Result<Vec<AuditLog>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM audit_logs
         WHERE ($1::text IS NULL OR action = $1)
           AND ($2::text IS NULL OR result = $2)
           AND ($3::bigint IS NULL OR actor_id = $3)
           AND ($4::text IS NULL OR resource_type = $4)
         ORDER BY created_at DESC LIMIT $5 OFFSET $6",
    )
    .bind(filter.action)
    .bind(filter.result)
    .bind(filter.actor_id)
    .bind(filter.resource_type)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
