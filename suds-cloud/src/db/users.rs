use shared::models::{Role, User};
use sqlx::{PgConnection, PgPool};

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    username: &str,
    password_hash: &str,
    role: Role,
    merchant_id: Option<i64>,
    store_id: Option<i64>,
    balance: i64,
    now: i64,
) -> Result<User, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO users (username, password_hash, role, merchant_id, store_id, balance, status, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, 'active', $7, $7)
         RETURNING *",
    )
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .bind(merchant_id)
    .bind(store_id)
    .bind(balance)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await
}

pub async fn update_profile(
    pool: &PgPool,
    id: i64,
    phone: Option<&str>,
    now: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE users SET phone = COALESCE($2, phone), updated_at = $3
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(phone)
    .bind(now)
    .fetch_optional(pool)
    .await
}

pub async fn update_password(
    pool: &PgPool,
    id: i64,
    password_hash: &str,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET password_hash = $1, updated_at = $2 WHERE id = $3")
        .bind(password_hash)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Lock the user row and return the current balance. Callers hold the lock
/// until their transaction commits, so concurrent debits serialize here.
pub async fn balance_for_update(
    conn: &mut PgConnection,
    id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    sqlx::query_scalar("SELECT balance FROM users WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Apply a signed balance change inside the caller's transaction.
pub async fn apply_balance_delta(
    conn: &mut PgConnection,
    id: i64,
    delta: i64,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET balance = balance + $2, updated_at = $3 WHERE id = $1")
        .bind(id)
        .bind(delta)
        .bind(now)
        .execute(conn)
        .await?;
    Ok(())
}
