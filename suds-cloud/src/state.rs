//! Application state for suds-cloud

use sqlx::PgPool;

use crate::audit::recorder::AuditRecorder;
use crate::auth::jwt::{JwtConfig, JwtService};
use crate::config::Config;
use crate::devices::cache::DeviceCache;
use crate::devices::ingest::Ingestor;
use crate::devices::projector::Projector;
use crate::orders::service::OrderService;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool
    pub pool: PgPool,
    /// Token issue and validation
    pub jwt: JwtService,
    /// Runtime device caches (presence, last error, running order)
    pub device_cache: DeviceCache,
    /// Order lifecycle operations
    pub orders: OrderService,
    /// Telemetry callback pipeline
    pub ingestor: Ingestor,
    /// Audit trail writer
    pub recorder: AuditRecorder,
    /// Environment: development | staging | production
    pub environment: String,
}

impl AppState {
    /// Create a new AppState
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPool::connect(&config.database_url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        let jwt = JwtService::with_config(JwtConfig {
            secret: config.jwt_secret.clone(),
            expiration_minutes: config.jwt_expiration_minutes,
            issuer: config.jwt_issuer.clone(),
            audience: config.jwt_audience.clone(),
        });

        let device_cache = DeviceCache::new();
        let orders = OrderService::new(pool.clone());
        let projector = Projector::new(pool.clone(), device_cache.clone());
        let ingestor = Ingestor::new(
            pool.clone(),
            projector,
            orders.clone(),
            config.callback_secret.clone(),
        );
        let recorder = AuditRecorder::new(pool.clone());

        Ok(Self {
            pool,
            jwt,
            device_cache,
            orders,
            ingestor,
            recorder,
            environment: config.environment.clone(),
        })
    }
}
