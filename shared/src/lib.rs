//! Shared types for the suds platform
//!
//! Common types used across the cloud service and tooling: data models,
//! the unified error system, and id/time utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
