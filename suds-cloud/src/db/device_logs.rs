use serde_json::Value;
use shared::models::{DeviceLog, EventType};
use sqlx::PgPool;

/// Insert the write-ahead row for a received event. Processing outcome is
/// recorded afterwards via [`mark_processed`] or [`mark_failed`].
pub async fn insert_pending(
    pool: &PgPool,
    iccid: &str,
    event_type: EventType,
    payload: &Value,
    event_time: i64,
    now: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO device_logs (iccid, event_type, payload, process_status, event_time, created_at)
         VALUES ($1, $2, $3, 'pending', $4, $5)
         RETURNING id",
    )
    .bind(iccid)
    .bind(event_type)
    .bind(payload)
    .bind(event_time)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn mark_processed(
    pool: &PgPool,
    id: i64,
    parsed_data: &Value,
    order_no: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE device_logs SET process_status = 'processed', parsed_data = $2, order_no = $3
         WHERE id = $1 AND process_status = 'pending'",
    )
    .bind(id)
    .bind(parsed_data)
    .bind(order_no)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn mark_failed(
    pool: &PgPool,
    id: i64,
    parsed_data: Option<&Value>,
    error_message: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE device_logs SET process_status = 'failed', parsed_data = $2, error_message = $3
         WHERE id = $1 AND process_status = 'pending'",
    )
    .bind(id)
    .bind(parsed_data)
    .bind(error_message)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_by_iccid(
    pool: &PgPool,
    iccid: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<DeviceLog>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM device_logs WHERE iccid = $1
         ORDER BY created_at DESC LIMIT $2 OFFSET $3",
    )
    .bind(iccid)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
