//! Device state projection
//!
//! Applies a validated telemetry event to the device row and the runtime
//! caches. Concurrent events for one device interleave last-write-wins.

use std::time::Duration;

use shared::models::{Device, DeviceStatus};
use sqlx::PgPool;

use crate::db;
use crate::devices::cache::{DeviceCache, ERROR_TTL, ErrorDetail, PRESENCE_TTL};
use crate::devices::events::DeviceEvent;
use crate::error::ServiceError;

#[derive(Clone)]
pub struct Projector {
    pool: PgPool,
    cache: DeviceCache,
}

/// Which presence timestamp a transition into `status` touches.
fn presence_stamps(status: DeviceStatus, now: i64) -> (Option<i64>, Option<i64>) {
    match status {
        DeviceStatus::Online | DeviceStatus::Working => (Some(now), None),
        DeviceStatus::Offline => (None, Some(now)),
        DeviceStatus::Error | DeviceStatus::Maintenance => (None, None),
    }
}

impl Projector {
    pub fn new(pool: PgPool, cache: DeviceCache) -> Self {
        Self { pool, cache }
    }

    pub async fn apply(
        &self,
        device: &Device,
        event: &DeviceEvent,
        now: i64,
    ) -> Result<(), ServiceError> {
        match event {
            DeviceEvent::Heartbeat(_) => {
                db::devices::record_status(
                    &self.pool,
                    device.id,
                    DeviceStatus::Online,
                    Some(now),
                    None,
                    now,
                )
                .await?;
                self.cache.presence.insert(device.id, (), PRESENCE_TTL).await;
            }
            DeviceEvent::StatusChange(p) => {
                let (online_at, offline_at) = presence_stamps(p.status, now);
                db::devices::record_status(&self.pool, device.id, p.status, online_at, offline_at, now)
                    .await?;
                if p.location.is_some() || p.latitude.is_some() || p.longitude.is_some() {
                    db::devices::record_location(
                        &self.pool,
                        device.id,
                        p.location.as_deref(),
                        p.latitude,
                        p.longitude,
                        now,
                    )
                    .await?;
                }
            }
            DeviceEvent::Error(p) => {
                db::devices::record_status(&self.pool, device.id, DeviceStatus::Error, None, None, now)
                    .await?;
                let detail = ErrorDetail {
                    code: p.code.clone(),
                    message: p.message.clone(),
                    at: now,
                };
                self.cache.errors.insert(device.id, detail, ERROR_TTL).await;
            }
            DeviceEvent::WashStart(p) => {
                db::devices::record_status(
                    &self.pool,
                    device.id,
                    DeviceStatus::Working,
                    Some(now),
                    None,
                    now,
                )
                .await?;
                let ttl = Duration::from_secs(p.duration as u64 * 60);
                self.cache
                    .current_orders
                    .insert(device.id, p.order_number.clone(), ttl)
                    .await;
            }
            DeviceEvent::WashEnd(_) => {
                db::devices::record_status(
                    &self.pool,
                    device.id,
                    DeviceStatus::Online,
                    Some(now),
                    None,
                    now,
                )
                .await?;
                self.cache.current_orders.remove(device.id).await;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_stamps() {
        assert_eq!(presence_stamps(DeviceStatus::Online, 100), (Some(100), None));
        assert_eq!(presence_stamps(DeviceStatus::Working, 100), (Some(100), None));
        assert_eq!(presence_stamps(DeviceStatus::Offline, 100), (None, Some(100)));
        assert_eq!(presence_stamps(DeviceStatus::Error, 100), (None, None));
        assert_eq!(presence_stamps(DeviceStatus::Maintenance, 100), (None, None));
    }
}
