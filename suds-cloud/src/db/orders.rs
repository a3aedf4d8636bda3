use shared::models::{Order, OrderStatus, OrderUpdate};
use sqlx::{PgConnection, PgPool};

/// Scope filters for order listings. `None` fields do not constrain.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderFilter {
    pub user_id: Option<i64>,
    pub merchant_id: Option<i64>,
    pub store_id: Option<i64>,
    pub status: Option<OrderStatus>,
}

/// Insert a new order as `pending` inside the caller's transaction, so the
/// insert commits or rolls back together with the balance debit.
#[allow(clippy::too_many_arguments)]
pub async fn insert(
    conn: &mut PgConnection,
    order_no: &str,
    user_id: i64,
    device_id: i64,
    store_id: i64,
    merchant_id: i64,
    amount: i64,
    wash_type: &str,
    duration: i32,
    remark: Option<&str>,
    now: i64,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO orders (order_no, user_id, device_id, store_id, merchant_id, amount, status, wash_type, duration, remark, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, 'pending', $7, $8, $9, $10, $10)
         RETURNING *",
    )
    .bind(order_no)
    .bind(user_id)
    .bind(device_id)
    .bind(store_id)
    .bind(merchant_id)
    .bind(amount)
    .bind(wash_type)
    .bind(duration)
    .bind(remark)
    .bind(now)
    .fetch_one(conn)
    .await
}

pub async fn find_by_order_no(
    pool: &PgPool,
    order_no: &str,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE order_no = $1")
        .bind(order_no)
        .fetch_optional(pool)
        .await
}

/// Lock the order row for the rest of the transaction. Every state
/// transition goes through this lock so concurrent updates serialize.
pub async fn lock_by_order_no(
    conn: &mut PgConnection,
    order_no: &str,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE order_no = $1 FOR UPDATE")
        .bind(order_no)
        .fetch_optional(conn)
        .await
}

pub async fn set_paid(
    conn: &mut PgConnection,
    id: i64,
    payment_method: &str,
    payment_ref: Option<&str>,
    now: i64,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        "UPDATE orders SET status = 'paid', payment_method = $2, payment_ref = $3, paid_at = $4, updated_at = $4
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(payment_method)
    .bind(payment_ref)
    .bind(now)
    .fetch_one(conn)
    .await
}

pub async fn set_using(conn: &mut PgConnection, id: i64, now: i64) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        "UPDATE orders SET status = 'using', start_time = $2, updated_at = $2
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(now)
    .fetch_one(conn)
    .await
}

pub async fn set_completed(
    conn: &mut PgConnection,
    id: i64,
    duration: Option<i32>,
    now: i64,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        "UPDATE orders SET status = 'completed', duration = COALESCE($2, duration), end_time = $3, updated_at = $3
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(duration)
    .bind(now)
    .fetch_one(conn)
    .await
}

pub async fn set_status(
    conn: &mut PgConnection,
    id: i64,
    status: OrderStatus,
    now: i64,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as("UPDATE orders SET status = $2, updated_at = $3 WHERE id = $1 RETURNING *")
        .bind(id)
        .bind(status)
        .bind(now)
        .fetch_one(conn)
        .await
}

/// Apply an operator correction. Absent fields keep their current value.
pub async fn update_fields(
    conn: &mut PgConnection,
    id: i64,
    update: &OrderUpdate,
    now: i64,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        "UPDATE orders SET
             status = COALESCE($2, status),
             wash_type = COALESCE($3, wash_type),
             duration = COALESCE($4, duration),
             remark = COALESCE($5, remark),
             start_time = COALESCE($6, start_time),
             end_time = COALESCE($7, end_time),
             updated_at = $8
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(update.status)
    .bind(update.wash_type.as_deref())
    .bind(update.duration)
    .bind(update.remark.as_deref())
    .bind(update.start_time)
    .bind(update.end_time)
    .bind(now)
    .fetch_one(conn)
    .await
}

pub async fn list(
    pool: &PgPool,
    filter: OrderFilter,
    limit: i64,
    offset: i64,
) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM orders
         WHERE ($1::bigint IS NULL OR user_id = $1)
           AND ($2::bigint IS NULL OR merchant_id = $2)
           AND ($3::bigint IS NULL OR store_id = $3)
           AND ($4::text IS NULL OR status = $4)
         ORDER BY created_at DESC LIMIT $5 OFFSET $6",
    )
    .bind(filter.user_id)
    .bind(filter.merchant_id)
    .bind(filter.store_id)
    .bind(filter.status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
