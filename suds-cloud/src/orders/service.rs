//! Order lifecycle service
//!
//! Every operation that moves money does so inside one transaction with the
//! order-state write, holding a row lock on the user (create) or the order
//! (everything else) so concurrent calls serialize instead of losing updates.

use shared::error::{AppError, ErrorCode};
use shared::models::{DeviceStatus, Order, OrderStatus, OrderUpdate};
use shared::util::{now_millis, order_no};
use sqlx::{PgConnection, PgPool};

use crate::db;
use crate::error::ServiceError;
use crate::orders::lifecycle::check_transition;

pub const PAYMENT_METHODS: &[&str] = &["balance", "wechat", "alipay", "card"];

#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub device_id: i64,
    pub wash_type: String,
    /// Minutes, 1..=60
    pub duration: i32,
    /// Minor currency units
    pub amount: i64,
    pub remark: Option<String>,
}

/// The single balance-credit routine. Every path that returns money to a
/// user (cancel from paid, privileged refund) goes through here.
async fn refund(conn: &mut PgConnection, order: &Order, now: i64) -> Result<(), sqlx::Error> {
    db::users::apply_balance_delta(conn, order.user_id, order.amount, now).await
}

#[derive(Clone)]
pub struct OrderService {
    pool: PgPool,
}

impl OrderService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an order on an online device, debiting the user's balance and
    /// inserting the row in one transaction.
    pub async fn create(&self, user_id: i64, req: &CreateOrder) -> Result<Order, ServiceError> {
        let device = db::devices::find_by_id(&self.pool, req.device_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::DeviceNotFound))?;
        if device.status != DeviceStatus::Online {
            return Err(AppError::with_message(
                ErrorCode::DeviceUnavailable,
                format!("Device {} is {:?}", device.iccid, device.status),
            )
            .into());
        }

        let now = now_millis();
        let order_no = order_no();

        let mut tx = self.pool.begin().await?;

        let balance = db::users::balance_for_update(&mut tx, user_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
        if balance < req.amount {
            return Err(AppError::new(ErrorCode::InsufficientBalance)
                .with_detail("balance", balance)
                .with_detail("amount", req.amount)
                .into());
        }

        db::users::apply_balance_delta(&mut tx, user_id, -req.amount, now).await?;

        let order = db::orders::insert(
            &mut tx,
            &order_no,
            user_id,
            device.id,
            device.store_id,
            device.merchant_id,
            req.amount,
            &req.wash_type,
            req.duration,
            req.remark.as_deref(),
            now,
        )
        .await
        .map_err(|e| {
            if db::is_unique_violation(&e) {
                ServiceError::App(AppError::new(ErrorCode::DuplicateOrderNo))
            } else {
                ServiceError::from(e)
            }
        })?;

        tx.commit().await?;
        Ok(order)
    }

    /// Record settlement of a pending order.
    pub async fn pay(
        &self,
        user_id: i64,
        order_no: &str,
        payment_method: &str,
        payment_ref: Option<&str>,
    ) -> Result<Order, ServiceError> {
        if !PAYMENT_METHODS.contains(&payment_method) {
            return Err(AppError::with_message(
                ErrorCode::PaymentInvalidMethod,
                format!("Unsupported payment method: {payment_method}"),
            )
            .into());
        }

        let now = now_millis();
        let mut tx = self.pool.begin().await?;

        let order = db::orders::lock_by_order_no(&mut tx, order_no)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        if order.user_id != user_id {
            return Err(AppError::new(ErrorCode::NotOrderOwner).into());
        }
        check_transition(order.status, OrderStatus::Paid)?;

        let order = db::orders::set_paid(&mut tx, order.id, payment_method, payment_ref, now).await?;

        tx.commit().await?;
        Ok(order)
    }

    /// Move a paid order to `using`. Driven by `wash_start` telemetry or a
    /// privileged call.
    pub async fn start_wash(&self, order_no: &str) -> Result<Order, ServiceError> {
        let now = now_millis();
        let mut tx = self.pool.begin().await?;

        let order = db::orders::lock_by_order_no(&mut tx, order_no)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        check_transition(order.status, OrderStatus::Using)?;

        let order = db::orders::set_using(&mut tx, order.id, now).await?;

        tx.commit().await?;
        Ok(order)
    }

    /// Finish a running order, optionally overriding the recorded duration
    /// with the actual one.
    pub async fn complete_wash(
        &self,
        order_no: &str,
        duration: Option<i32>,
    ) -> Result<Order, ServiceError> {
        if let Some(d) = duration {
            if d < 1 {
                return Err(AppError::validation("Duration must be positive").into());
            }
        }

        let now = now_millis();
        let mut tx = self.pool.begin().await?;

        let order = db::orders::lock_by_order_no(&mut tx, order_no)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        check_transition(order.status, OrderStatus::Completed)?;

        let order = db::orders::set_completed(&mut tx, order.id, duration, now).await?;

        tx.commit().await?;
        Ok(order)
    }

    /// Owner-initiated cancellation. A paid order refunds its exact amount
    /// in the same transaction as the status change.
    pub async fn cancel(&self, user_id: i64, order_no: &str) -> Result<Order, ServiceError> {
        let now = now_millis();
        let mut tx = self.pool.begin().await?;

        let order = db::orders::lock_by_order_no(&mut tx, order_no)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        if order.user_id != user_id {
            return Err(AppError::new(ErrorCode::NotOrderOwner).into());
        }
        check_transition(order.status, OrderStatus::Cancelled)?;

        let was_paid = order.status == OrderStatus::Paid;
        let updated = db::orders::set_status(&mut tx, order.id, OrderStatus::Cancelled, now).await?;
        if was_paid {
            refund(&mut tx, &order, now).await?;
        }

        tx.commit().await?;
        Ok(updated)
    }

    /// Privileged correction path. May set fields the strict graph would
    /// reject, but driving a paid order to cancelled or refunded still goes
    /// through the shared refund routine.
    pub async fn admin_update(
        &self,
        order_no: &str,
        update: &OrderUpdate,
    ) -> Result<Order, ServiceError> {
        let now = now_millis();
        let mut tx = self.pool.begin().await?;

        let order = db::orders::lock_by_order_no(&mut tx, order_no)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

        if order.status == OrderStatus::Paid
            && matches!(
                update.status,
                Some(OrderStatus::Cancelled) | Some(OrderStatus::Refunded)
            )
        {
            refund(&mut tx, &order, now).await?;
        }

        let order = db::orders::update_fields(&mut tx, order.id, update, now).await?;

        tx.commit().await?;
        Ok(order)
    }

    pub async fn find(&self, order_no: &str) -> Result<Option<Order>, ServiceError> {
        Ok(db::orders::find_by_order_no(&self.pool, order_no).await?)
    }

    pub async fn list(
        &self,
        filter: db::orders::OrderFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Order>, ServiceError> {
        Ok(db::orders::list(&self.pool, filter, limit, offset).await?)
    }
}
