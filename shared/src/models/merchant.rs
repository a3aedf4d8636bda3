//! Merchant Model

use serde::{Deserialize, Serialize};

/// Account status shared by merchants, stores and users
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "TEXT", rename_all = "lowercase"))]
pub enum AccountStatus {
    Active,
    Disabled,
}

/// Merchant entity (top-level tenant)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Merchant {
    pub id: i64,
    pub name: String,
    pub contact: Option<String>,
    pub status: AccountStatus,
    pub created_at: i64,
}
