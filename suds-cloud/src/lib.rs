//! Suds Cloud
//!
//! Multi-tenant management backend for networked washing machines.
//! Merchants own stores, stores hold devices, customers rent by the wash.
//! Devices report telemetry over an HTTP callback; the management API is
//! JWT-authenticated with role and tenant scoping, and every mutation
//! leaves an audit trail entry.

pub mod api;
pub mod audit;
pub mod auth;
pub mod config;
pub mod db;
pub mod devices;
pub mod error;
pub mod orders;
pub mod state;
pub mod util;

pub use auth::jwt::{CurrentUser, JwtService};
pub use config::Config;
pub use error::{ServiceError, ServiceResult};
pub use state::AppState;
