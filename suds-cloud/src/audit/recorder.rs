//! Audit trail persistence

use shared::util::now_millis;
use sqlx::PgPool;

use crate::db;
use crate::db::audit_logs::NewAuditLog;

/// Writes audit entries. A failed write is logged and swallowed, never
/// surfaced to the caller.
#[derive(Clone)]
pub struct AuditRecorder {
    pool: PgPool,
}

impl AuditRecorder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record(&self, entry: &NewAuditLog<'_>) {
        if let Err(e) = db::audit_logs::insert(&self.pool, entry, now_millis()).await {
            tracing::error!(
                error = %e,
                action = ?entry.action,
                resource_type = entry.resource_type,
                "Failed to write audit log"
            );
        }
    }
}
