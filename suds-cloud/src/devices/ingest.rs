//! Device callback ingestion
//!
//! Write-ahead pipeline: every well-formed envelope gets a `device_logs` row
//! with `process_status = pending` before anything is dispatched, so no event
//! is silently lost. The row is flipped to `processed` or `failed` exactly
//! once. Repeated or out-of-order callbacks are not deduplicated.

use chrono::Utc;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use shared::error::{AppError, ErrorCode};
use shared::models::Device;
use shared::util::now_millis;
use sqlx::PgPool;

use crate::db;
use crate::devices::events::{CallbackRequest, DeviceEvent};
use crate::devices::projector::Projector;
use crate::error::ServiceError;
use crate::orders::service::OrderService;

type HmacSha256 = Hmac<Sha256>;

/// Reject callbacks whose timestamp drifts more than this from server time.
const SIGNATURE_WINDOW_SECS: i64 = 300;

#[derive(Clone)]
pub struct Ingestor {
    pool: PgPool,
    projector: Projector,
    orders: OrderService,
    callback_secret: Option<String>,
}

impl Ingestor {
    pub fn new(
        pool: PgPool,
        projector: Projector,
        orders: OrderService,
        callback_secret: Option<String>,
    ) -> Self {
        Self {
            pool,
            projector,
            orders,
            callback_secret,
        }
    }

    /// Process one device callback.
    ///
    /// A rejected signature never reaches the write-ahead log; everything
    /// after that point leaves a `device_logs` row with its outcome.
    pub async fn ingest(&self, req: &CallbackRequest) -> Result<(), AppError> {
        if let Some(secret) = &self.callback_secret {
            verify_signature(req, secret)?;
        }

        let now = now_millis();
        let event_time = req.timestamp.timestamp_millis();

        let log_id = db::device_logs::insert_pending(
            &self.pool,
            &req.external_device_id,
            req.event_type,
            &req.payload,
            event_time,
            now,
        )
        .await
        .map_err(|e| AppError::from(ServiceError::from(e)))?;

        let event = match DeviceEvent::parse(req.event_type, &req.payload) {
            Ok(event) => event,
            Err(e) => {
                self.mark_failed(log_id, None, &e.message).await;
                return Err(e);
            }
        };
        let parsed = event.to_snapshot();

        let device = match db::devices::find_by_iccid(&self.pool, &req.external_device_id).await {
            Ok(Some(device)) => device,
            Ok(None) => {
                let e = AppError::with_message(
                    ErrorCode::DeviceNotFound,
                    format!("Unknown device {}", req.external_device_id),
                );
                self.mark_failed(log_id, Some(&parsed), &e.message).await;
                return Err(e);
            }
            Err(e) => {
                let app = AppError::from(ServiceError::from(e));
                self.mark_failed(log_id, Some(&parsed), &app.message).await;
                return Err(app);
            }
        };

        if let Err(e) = self.dispatch(&device, &event, now).await {
            let app = AppError::from(e);
            self.mark_failed(log_id, Some(&parsed), &app.message).await;
            return Err(app);
        }

        if let Err(e) =
            db::device_logs::mark_processed(&self.pool, log_id, &parsed, event.order_no()).await
        {
            tracing::error!(error = %e, log_id, "Failed to mark device log processed");
        }

        Ok(())
    }

    /// Wash events drive the order lifecycle before the projector runs, so a
    /// rejected order transition leaves the device row untouched.
    async fn dispatch(
        &self,
        device: &Device,
        event: &DeviceEvent,
        now: i64,
    ) -> Result<(), ServiceError> {
        match event {
            DeviceEvent::WashStart(p) => {
                self.orders.start_wash(&p.order_number).await?;
            }
            DeviceEvent::WashEnd(p) => {
                self.orders.complete_wash(&p.order_number, p.duration).await?;
            }
            _ => {}
        }

        self.projector.apply(device, event, now).await
    }

    async fn mark_failed(&self, log_id: i64, parsed: Option<&Value>, message: &str) {
        if let Err(e) = db::device_logs::mark_failed(&self.pool, log_id, parsed, message).await {
            tracing::error!(error = %e, log_id, "Failed to mark device log failed");
        }
    }
}

/// Hex HMAC-SHA256 over `externalDeviceId.eventType.unixSeconds`.
pub fn compute_signature(
    device_id: &str,
    event_type: &str,
    unix_seconds: i64,
    secret: &str,
) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(format!("{device_id}.{event_type}.{unix_seconds}").as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

fn verify_signature(req: &CallbackRequest, secret: &str) -> Result<(), AppError> {
    let provided = req.signature.as_deref().ok_or_else(|| {
        AppError::with_message(ErrorCode::InvalidSignature, "Missing signature")
    })?;

    let ts = req.timestamp.timestamp();
    if (Utc::now().timestamp() - ts).abs() > SIGNATURE_WINDOW_SECS {
        return Err(AppError::new(ErrorCode::StaleTimestamp));
    }

    let provided = hex::decode(provided).map_err(|_| {
        AppError::with_message(ErrorCode::InvalidSignature, "Malformed signature")
    })?;

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return Err(AppError::new(ErrorCode::InternalError));
    };
    mac.update(
        format!(
            "{}.{}.{}",
            req.external_device_id,
            req.event_type.name(),
            ts
        )
        .as_bytes(),
    );
    mac.verify_slice(&provided)
        .map_err(|_| AppError::new(ErrorCode::InvalidSignature))?;

    Ok(())
}
