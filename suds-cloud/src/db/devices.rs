use shared::models::{Device, DeviceStatus, DeviceUpdate};
use sqlx::PgPool;

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    iccid: &str,
    name: &str,
    merchant_id: i64,
    store_id: i64,
    location: Option<&str>,
    now: i64,
) -> Result<Device, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO devices (iccid, name, merchant_id, store_id, status, location, created_at, updated_at)
         VALUES ($1, $2, $3, $4, 'offline', $5, $6, $6)
         RETURNING *",
    )
    .bind(iccid)
    .bind(name)
    .bind(merchant_id)
    .bind(store_id)
    .bind(location)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Device>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM devices WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_iccid(pool: &PgPool, iccid: &str) -> Result<Option<Device>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM devices WHERE iccid = $1")
        .bind(iccid)
        .fetch_optional(pool)
        .await
}

/// List devices within an optional merchant/store/status scope.
pub async fn list(
    pool: &PgPool,
    merchant_id: Option<i64>,
    store_id: Option<i64>,
    status: Option<DeviceStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Device>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM devices
         WHERE ($1::bigint IS NULL OR merchant_id = $1)
           AND ($2::bigint IS NULL OR store_id = $2)
           AND ($3::text IS NULL OR status = $3)
         ORDER BY id LIMIT $4 OFFSET $5",
    )
    .bind(merchant_id)
    .bind(store_id)
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Apply an operator edit. Absent fields keep their current value.
pub async fn update(
    pool: &PgPool,
    id: i64,
    update: &DeviceUpdate,
    now: i64,
) -> Result<Option<Device>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE devices SET
             name = COALESCE($2, name),
             store_id = COALESCE($3, store_id),
             status = COALESCE($4, status),
             location = COALESCE($5, location),
             latitude = COALESCE($6, latitude),
             longitude = COALESCE($7, longitude),
             updated_at = $8
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(update.name.as_deref())
    .bind(update.store_id)
    .bind(update.status)
    .bind(update.location.as_deref())
    .bind(update.latitude)
    .bind(update.longitude)
    .bind(now)
    .fetch_optional(pool)
    .await
}

/// Record a reported status transition. The caller decides which presence
/// timestamp moves; the untouched one is passed as None.
pub async fn record_status(
    pool: &PgPool,
    id: i64,
    status: DeviceStatus,
    last_online_at: Option<i64>,
    last_offline_at: Option<i64>,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE devices SET
             status = $2,
             last_online_at = COALESCE($3, last_online_at),
             last_offline_at = COALESCE($4, last_offline_at),
             updated_at = $5
         WHERE id = $1",
    )
    .bind(id)
    .bind(status)
    .bind(last_online_at)
    .bind(last_offline_at)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Update self-reported position fields. Absent fields keep their current value.
pub async fn record_location(
    pool: &PgPool,
    id: i64,
    location: Option<&str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE devices SET
             location = COALESCE($2, location),
             latitude = COALESCE($3, latitude),
             longitude = COALESCE($4, longitude),
             updated_at = $5
         WHERE id = $1",
    )
    .bind(id)
    .bind(location)
    .bind(latitude)
    .bind(longitude)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}
