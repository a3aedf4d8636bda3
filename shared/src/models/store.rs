//! Store Model

use super::merchant::AccountStatus;
use serde::{Deserialize, Serialize};

/// Store entity (belongs to one merchant)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Store {
    pub id: i64,
    pub merchant_id: i64,
    pub name: String,
    pub address: Option<String>,
    pub status: AccountStatus,
    pub created_at: i64,
}
