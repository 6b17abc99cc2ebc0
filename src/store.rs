//! In-memory point store: a time-bounded, size-bounded collection of
//! geolocated events. Points are created at ingestion, pruned by age, then
//! truncated by count. Never mutated after creation, only removed.

use crate::config::StoreConfig;
use serde::Deserialize;
use std::time::Instant;

/// A single observation as it arrives over the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub ip: String,
    #[serde(default)]
    pub suspicious: bool,
}

/// A stored observation, stamped with its ingestion time.
#[derive(Debug, Clone)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
    pub ip: String,
    pub suspicious: bool,
    pub received_at: Instant,
}

#[derive(Default)]
pub struct PointStore {
    points: Vec<GeoPoint>,
}

impl PointStore {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Merge a batch into the store. All points in one batch share the same
    /// `received_at` stamp. Points older than the lifetime window are dropped,
    /// then the store keeps only the most recently added `max_points`
    /// (eviction from the front, oldest first).
    pub fn merge(&mut self, batch: Vec<RawPoint>, cfg: &StoreConfig, now: Instant) {
        self.points.extend(batch.into_iter().map(|p| GeoPoint {
            lat: p.latitude,
            lng: p.longitude,
            ip: p.ip,
            suspicious: p.suspicious,
            received_at: now,
        }));

        self.points
            .retain(|p| now.duration_since(p.received_at) <= cfg.lifetime);

        if self.points.len() > cfg.max_points {
            let excess = self.points.len() - cfg.max_points;
            self.points.drain(..excess);
        }
    }
}
