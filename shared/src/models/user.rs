//! User Model

use super::merchant::AccountStatus;
use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "TEXT", rename_all = "snake_case"))]
pub enum Role {
    Admin,
    Merchant,
    StoreManager,
    Staff,
    User,
}

impl Role {
    /// String name as stored in the database and JWT claims
    pub fn name(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Merchant => "merchant",
            Role::StoreManager => "store_manager",
            Role::Staff => "staff",
            Role::User => "user",
        }
    }
}

/// User entity (DB row, carries the password hash)
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: Role,
    pub merchant_id: Option<i64>,
    pub store_id: Option<i64>,
    /// Spendable balance in minor currency units, never negative
    pub balance: i64,
    pub phone: Option<String>,
    pub status: AccountStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// User response (without password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub merchant_id: Option<i64>,
    pub store_id: Option<i64>,
    pub balance: i64,
    pub phone: Option<String>,
    pub status: AccountStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role,
            merchant_id: u.merchant_id,
            store_id: u.store_id,
            balance: u.balance,
            phone: u.phone,
            status: u.status,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde_names() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&Role::StoreManager).unwrap(),
            "\"store_manager\""
        );
        let role: Role = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(role, Role::Staff);
    }

    #[test]
    fn test_role_name() {
        assert_eq!(Role::Admin.name(), "admin");
        assert_eq!(Role::StoreManager.name(), "store_manager");
        assert_eq!(Role::User.name(), "user");
    }
}
