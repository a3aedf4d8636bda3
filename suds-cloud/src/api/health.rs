//! Health check endpoint

use axum::Json;
use serde_json::{Value, json};

/// Health check
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "suds-cloud",
        "version": env!("CARGO_PKG_VERSION"),
        "git_hash": option_env!("GIT_HASH").unwrap_or("dev"),
    }))
}
