//! Audit trail: snapshot sanitization, persistence, and the middleware that
//! wraps auditable routes.

pub mod middleware;
pub mod recorder;
pub mod sanitize;
