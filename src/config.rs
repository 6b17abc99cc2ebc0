//! Runtime configuration. Built once at startup from settings file + CLI and
//! passed explicitly to the merge/aggregate calls; the panel adjusts the
//! store bounds at runtime within the same clamped ranges.

use std::time::Duration;

pub const DEFAULT_MAX_POINTS: usize = 1000;
pub const DEFAULT_LIFETIME_MS: u64 = 30_000;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2000;

pub const LIFETIME_RANGE_SECS: (u64, u64) = (5, 120);
pub const MAX_POINTS_RANGE: (usize, usize) = (100, 5000);

/// Bounds for the point store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreConfig {
    pub max_points: usize,
    pub lifetime: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_points: DEFAULT_MAX_POINTS,
            lifetime: Duration::from_millis(DEFAULT_LIFETIME_MS),
        }
    }
}

impl StoreConfig {
    /// Lenient construction: a missing or unparseable value falls back to
    /// the built-in default instead of failing.
    pub fn from_raw(max_points: Option<&str>, lifetime_secs: Option<&str>) -> Self {
        let max_points = max_points
            .and_then(|s| s.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_POINTS);
        let lifetime = lifetime_secs
            .and_then(|s| s.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_millis(DEFAULT_LIFETIME_MS));
        Self {
            max_points,
            lifetime,
        }
    }

    pub fn adjust_lifetime(&mut self, delta_secs: i64) {
        let secs = self.lifetime.as_secs() as i64 + delta_secs;
        let secs = secs.clamp(LIFETIME_RANGE_SECS.0 as i64, LIFETIME_RANGE_SECS.1 as i64);
        self.lifetime = Duration::from_secs(secs as u64);
    }

    pub fn adjust_max_points(&mut self, delta: i64) {
        let n = self.max_points as i64 + delta;
        let n = n.clamp(MAX_POINTS_RANGE.0 as i64, MAX_POINTS_RANGE.1 as i64);
        self.max_points = n as usize;
    }
}

/// Everything the render loop needs besides the data feed.
#[derive(Debug, Clone)]
pub struct GlobeConfig {
    pub store: StoreConfig,
    /// Poll cadence for the HTTP feed.
    pub interval: Duration,
    /// Seconds per animation frame.
    pub time_step: f32,
    pub auto_rotate: bool,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            time_step: 0.03,
            auto_rotate: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = StoreConfig::default();
        assert_eq!(cfg.max_points, 1000);
        assert_eq!(cfg.lifetime, Duration::from_millis(30_000));
    }

    #[test]
    fn unparseable_input_falls_back_to_defaults() {
        let cfg = StoreConfig::from_raw(Some("lots"), Some("soon"));
        assert_eq!(cfg, StoreConfig::default());

        let cfg = StoreConfig::from_raw(None, None);
        assert_eq!(cfg, StoreConfig::default());
    }

    #[test]
    fn valid_input_is_used() {
        let cfg = StoreConfig::from_raw(Some("250"), Some("60"));
        assert_eq!(cfg.max_points, 250);
        assert_eq!(cfg.lifetime, Duration::from_secs(60));
    }

    #[test]
    fn adjustments_are_clamped() {
        let mut cfg = StoreConfig::default();
        cfg.adjust_lifetime(10_000);
        assert_eq!(cfg.lifetime.as_secs(), LIFETIME_RANGE_SECS.1);
        cfg.adjust_lifetime(-10_000);
        assert_eq!(cfg.lifetime.as_secs(), LIFETIME_RANGE_SECS.0);

        cfg.adjust_max_points(1_000_000);
        assert_eq!(cfg.max_points, MAX_POINTS_RANGE.1);
        cfg.adjust_max_points(-1_000_000);
        assert_eq!(cfg.max_points, MAX_POINTS_RANGE.0);
    }
}
