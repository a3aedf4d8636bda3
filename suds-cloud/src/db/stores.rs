use shared::models::Store;
use sqlx::PgPool;

pub async fn create(
    pool: &PgPool,
    merchant_id: i64,
    name: &str,
    address: Option<&str>,
    now: i64,
) -> Result<Store, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO stores (merchant_id, name, address, status, created_at)
         VALUES ($1, $2, $3, 'active', $4)
         RETURNING *",
    )
    .bind(merchant_id)
    .bind(name)
    .bind(address)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Store>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM stores WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List stores, optionally restricted to one merchant.
pub async fn list(
    pool: &PgPool,
    merchant_id: Option<i64>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Store>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM stores
         WHERE ($1::bigint IS NULL OR merchant_id = $1)
         ORDER BY id LIMIT $2 OFFSET $3",
    )
    .bind(merchant_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}
