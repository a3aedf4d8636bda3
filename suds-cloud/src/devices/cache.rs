//! Lazy-expiring TTL caches for device runtime state
//!
//! Entries expire on read; there is no sweep task. A device that stops
//! heartbeating simply stops having a presence entry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::RwLock;

pub const PRESENCE_TTL: Duration = Duration::from_secs(30);
pub const ERROR_TTL: Duration = Duration::from_secs(3600);

struct TtlEntry<V> {
    value: V,
    expires_at: Instant,
}

/// Map with per-entry TTL, keyed by device id.
pub struct TtlMap<V> {
    inner: Arc<RwLock<HashMap<i64, TtlEntry<V>>>>,
}

impl<V> Clone for TtlMap<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> TtlMap<V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn insert(&self, key: i64, value: V, ttl: Duration) {
        let entry = TtlEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.inner.write().await.insert(key, entry);
    }

    /// Returns the live value, removing it if the TTL has lapsed.
    pub async fn get(&self, key: i64) -> Option<V> {
        let mut map = self.inner.write().await;
        match map.get(&key) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.value.clone()),
            Some(_) => {
                map.remove(&key);
                None
            }
            None => None,
        }
    }

    pub async fn remove(&self, key: i64) {
        self.inner.write().await.remove(&key);
    }
}

impl<V: Clone> Default for TtlMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cached error detail for operational visibility.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: Option<String>,
    pub at: i64,
}

/// Runtime caches keyed by device id.
#[derive(Clone)]
pub struct DeviceCache {
    /// Refreshed by heartbeats; absence means the device is stale.
    pub presence: TtlMap<()>,
    /// Last reported error, kept for one hour.
    pub errors: TtlMap<ErrorDetail>,
    /// Order currently running on the device, kept for the wash duration.
    pub current_orders: TtlMap<String>,
}

impl DeviceCache {
    pub fn new() -> Self {
        Self {
            presence: TtlMap::new(),
            errors: TtlMap::new(),
            current_orders: TtlMap::new(),
        }
    }
}

impl Default for DeviceCache {
    fn default() -> Self {
        Self::new()
    }
}
