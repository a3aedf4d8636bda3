use shared::models::Merchant;
use sqlx::PgPool;

pub async fn create(
    pool: &PgPool,
    name: &str,
    contact: Option<&str>,
    now: i64,
) -> Result<Merchant, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO merchants (name, contact, status, created_at)
         VALUES ($1, $2, 'active', $3)
         RETURNING *",
    )
    .bind(name)
    .bind(contact)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Merchant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM merchants WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Merchant>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM merchants ORDER BY id LIMIT $1 OFFSET $2")
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}
