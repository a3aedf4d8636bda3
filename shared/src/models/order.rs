//! Order Model

use serde::{Deserialize, Serialize};

/// Order status
///
/// The valid transition graph is enforced by the order lifecycle service;
/// terminal orders are immutable outside the privileged correction path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(type_name = "TEXT", rename_all = "lowercase"))]
pub enum OrderStatus {
    Draft,
    Pending,
    Paid,
    Using,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Completed | OrderStatus::Cancelled | OrderStatus::Refunded
        )
    }
}

/// Wash order entity
///
/// `amount` is in minor currency units; every amount movement is paired with
/// a status change in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub order_no: String,
    pub user_id: i64,
    pub device_id: i64,
    pub store_id: i64,
    pub merchant_id: i64,
    pub amount: i64,
    pub status: OrderStatus,
    pub wash_type: String,
    /// Expected wash duration in minutes
    pub duration: i32,
    pub remark: Option<String>,
    pub payment_method: Option<String>,
    pub payment_ref: Option<String>,
    pub paid_at: Option<i64>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Privileged order update payload
///
/// May move `status` outside the normal graph for data correction.
/// `amount` is absent: refunds always return the original amount, so it
/// must never drift after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub status: Option<OrderStatus>,
    pub wash_type: Option<String>,
    pub duration: Option<i32>,
    pub remark: Option<String>,
    pub start_time: Option<i64>,
    pub end_time: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serde_names() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Using).unwrap(),
            "\"using\""
        );
        let s: OrderStatus = serde_json::from_str("\"refunded\"").unwrap();
        assert_eq!(s, OrderStatus::Refunded);
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(OrderStatus::Refunded.is_terminal());
        assert!(!OrderStatus::Draft.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Paid.is_terminal());
        assert!(!OrderStatus::Using.is_terminal());
    }
}
