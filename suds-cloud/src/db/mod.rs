//! Database access layer

pub mod audit_logs;
pub mod device_logs;
pub mod devices;
pub mod merchants;
pub mod orders;
pub mod stores;
pub mod users;

/// True when the error is a Postgres unique-constraint violation (23505).
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some("23505"),
        _ => false,
    }
}
