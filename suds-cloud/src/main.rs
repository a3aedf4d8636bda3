//! suds-cloud — Equipment rental management backend
//!
//! Long-running service that:
//! - Serves the tenant management API (JWT authenticated, role scoped)
//! - Receives device telemetry callbacks (HMAC signed)
//! - Drives the order lifecycle and keeps the audit trail

use suds_cloud::{AppState, Config, api};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "suds_cloud=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    tracing::info!("Starting suds-cloud (env: {})", config.environment);

    // Initialize application state (connects and migrates the database)
    let state = AppState::new(&config).await?;

    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("suds-cloud HTTP listening on {http_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
