//! Order state machine
//!
//! The edge list below is the whole lifecycle. Regular operations may only
//! move along these edges; the privileged admin update is the one caller
//! allowed to step outside them for corrections.

use shared::error::{AppError, ErrorCode};
use shared::models::OrderStatus;

const TRANSITIONS: &[(OrderStatus, OrderStatus)] = &[
    (OrderStatus::Draft, OrderStatus::Pending),
    (OrderStatus::Pending, OrderStatus::Paid),
    (OrderStatus::Paid, OrderStatus::Using),
    (OrderStatus::Using, OrderStatus::Completed),
    (OrderStatus::Pending, OrderStatus::Cancelled),
    (OrderStatus::Paid, OrderStatus::Cancelled),
    (OrderStatus::Paid, OrderStatus::Refunded),
];

pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    TRANSITIONS.iter().any(|(f, t)| *f == from && *t == to)
}

/// Typed rejection for an invalid edge.
pub fn check_transition(from: OrderStatus, to: OrderStatus) -> Result<(), AppError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(AppError::with_message(
            ErrorCode::InvalidTransition,
            format!("Cannot transition order from {from:?} to {to:?}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[OrderStatus] = &[
        OrderStatus::Draft,
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Using,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
    ];

    #[test]
    fn test_happy_path_edges() {
        assert!(can_transition(OrderStatus::Draft, OrderStatus::Pending));
        assert!(can_transition(OrderStatus::Pending, OrderStatus::Paid));
        assert!(can_transition(OrderStatus::Paid, OrderStatus::Using));
        assert!(can_transition(OrderStatus::Using, OrderStatus::Completed));
    }

    #[test]
    fn test_cancel_and_refund_edges() {
        assert!(can_transition(OrderStatus::Pending, OrderStatus::Cancelled));
        assert!(can_transition(OrderStatus::Paid, OrderStatus::Cancelled));
        assert!(can_transition(OrderStatus::Paid, OrderStatus::Refunded));
        assert!(!can_transition(OrderStatus::Using, OrderStatus::Cancelled));
        assert!(!can_transition(OrderStatus::Pending, OrderStatus::Refunded));
    }

    #[test]
    fn test_invalid_edges_rejected() {
        assert!(!can_transition(OrderStatus::Pending, OrderStatus::Using));
        assert!(!can_transition(OrderStatus::Draft, OrderStatus::Paid));
        assert!(!can_transition(OrderStatus::Paid, OrderStatus::Pending));

        let err = check_transition(OrderStatus::Pending, OrderStatus::Completed).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTransition);
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        for from in ALL.iter().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(
                    !can_transition(*from, *to),
                    "unexpected edge {from:?} -> {to:?}"
                );
            }
        }
    }

    #[test]
    fn test_no_self_edges() {
        for status in ALL {
            assert!(!can_transition(*status, *status));
        }
    }
}
