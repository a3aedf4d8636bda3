//! Data models
//!
//! Shared between suds-cloud and the dashboard frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL). Timestamps are epoch
//! milliseconds stored as `BIGINT`.

pub mod audit;
pub mod device;
pub mod device_log;
pub mod merchant;
pub mod order;
pub mod store;
pub mod user;

// Re-exports
pub use audit::*;
pub use device::*;
pub use device_log::*;
pub use merchant::*;
pub use order::*;
pub use store::*;
pub use user::*;
