//! Audit trail model

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Audited action kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AuditAction {
    Create,
    Update,
    Delete,
    Login,
    Logout,
    Export,
    System,
}

/// Outcome of an audited call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "TEXT", rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AuditResult {
    Success,
    Failed,
}

/// Audit log entry (append-only, never updated)
///
/// Request and response snapshots are sanitized before they reach this type;
/// oversized responses are replaced with a truncation marker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct AuditLog {
    pub id: i64,
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: Option<String>,
    pub description: String,
    pub actor_id: Option<i64>,
    pub actor_role: Option<String>,
    pub request_data: Option<Value>,
    pub response_data: Option<Value>,
    pub result: AuditResult,
    pub duration_ms: i64,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_action_serde_names() {
        assert_eq!(
            serde_json::to_string(&AuditAction::Create).unwrap(),
            "\"CREATE\""
        );
        assert_eq!(
            serde_json::to_string(&AuditAction::Login).unwrap(),
            "\"LOGIN\""
        );
        let a: AuditAction = serde_json::from_str("\"LOGOUT\"").unwrap();
        assert_eq!(a, AuditAction::Logout);
    }

    #[test]
    fn test_audit_result_serde_names() {
        assert_eq!(
            serde_json::to_string(&AuditResult::Success).unwrap(),
            "\"SUCCESS\""
        );
        assert_eq!(
            serde_json::to_string(&AuditResult::Failed).unwrap(),
            "\"FAILED\""
        );
    }
}
