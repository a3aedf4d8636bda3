//! Authentication and authorization

pub mod jwt;
pub mod middleware;
pub mod scope;
