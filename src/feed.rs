//! Data feeds for the globe. The main loop polls the active feed every
//! frame; a feed yields a batch of observations when one is due and nothing
//! otherwise.

use crate::client;
use crate::earth;
use crate::store::RawPoint;
use rand::prelude::*;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};

pub enum FeedEvent {
    Batch(Vec<RawPoint>),
    Failed(String),
}

pub enum Feed {
    /// Live HTTP polling; batches arrive from the poller thread.
    Http(Receiver<FeedEvent>),
    /// Synthetic events from the built-in city table.
    Demo(DemoFeed),
    /// Timed replay of a recorded CSV capture.
    Replay(ReplayFeed),
}

impl Feed {
    pub fn http(base_url: &str, interval: Duration) -> Self {
        Feed::Http(client::spawn_poller(base_url, interval))
    }

    /// Non-blocking: returns at most one event per call.
    pub fn poll(&mut self) -> Option<FeedEvent> {
        match self {
            Feed::Http(rx) => match rx.try_recv() {
                Ok(event) => Some(event),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Disconnected) => None,
            },
            Feed::Demo(demo) => demo.poll(),
            Feed::Replay(replay) => replay.poll(),
        }
    }
}

// ============================================================================
// Demo feed
// ============================================================================

pub struct DemoFeed {
    rng: StdRng,
    interval: Duration,
    last_emit: Option<Instant>,
    /// Upper bound on points per batch.
    rate: usize,
}

impl DemoFeed {
    pub fn new(seed: Option<u64>, interval: Duration, rate: usize) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            interval,
            last_emit: None,
            rate: rate.max(1),
        }
    }

    fn poll(&mut self) -> Option<FeedEvent> {
        let now = Instant::now();
        if let Some(last) = self.last_emit {
            if now.duration_since(last) < self.interval {
                return None;
            }
        }
        self.last_emit = Some(now);

        let n = self.rng.gen_range(1..=self.rate);
        let batch = (0..n).map(|_| self.synth_point()).collect();
        Some(FeedEvent::Batch(batch))
    }

    fn synth_point(&mut self) -> RawPoint {
        let (lat, lng) = earth::CITIES[self.rng.gen_range(0..earth::CITIES.len())];
        RawPoint {
            latitude: lat as f64 + self.rng.gen_range(-0.3..0.3),
            longitude: lng as f64 + self.rng.gen_range(-0.3..0.3),
            ip: format!(
                "{}.{}.{}.{}",
                self.rng.gen_range(1..=223u8),
                self.rng.gen_range(0..=255u8),
                self.rng.gen_range(0..=255u8),
                self.rng.gen_range(1..=254u8),
            ),
            suspicious: self.rng.gen_bool(0.15),
        }
    }
}

// ============================================================================
// Replay feed
// ============================================================================

/// Replays a CSV capture of `ip,latitude,longitude,timestamp,suspicious`
/// rows on the recorded schedule, time-compressed by `speedup`.
pub struct ReplayFeed {
    rows: Vec<(u64, RawPoint)>,
    next: usize,
    sim_start: u64,
    started: Instant,
    speedup: f64,
}

impl ReplayFeed {
    pub fn from_file(path: &Path, speedup: f64) -> io::Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut rows = parse_capture(&content);
        if rows.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: no usable rows", path.display()),
            ));
        }
        rows.sort_by_key(|(ts, _)| *ts);
        let sim_start = rows[0].0;
        Ok(Self {
            rows,
            next: 0,
            sim_start,
            started: Instant::now(),
            speedup: if speedup > 0.0 { speedup } else { 1.0 },
        })
    }

    fn poll(&mut self) -> Option<FeedEvent> {
        if self.next >= self.rows.len() {
            return None;
        }

        let elapsed = self.started.elapsed().as_secs_f64() * self.speedup;
        let mut batch = Vec::new();
        while self.next < self.rows.len() {
            let (ts, ref point) = self.rows[self.next];
            if (ts - self.sim_start) as f64 <= elapsed {
                batch.push(point.clone());
                self.next += 1;
            } else {
                break;
            }
        }

        if batch.is_empty() {
            None
        } else {
            Some(FeedEvent::Batch(batch))
        }
    }
}

/// Parse capture rows; header lines and malformed rows are skipped.
fn parse_capture(content: &str) -> Vec<(u64, RawPoint)> {
    content
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < 5 {
                return None;
            }
            let timestamp = fields[3].parse::<u64>().ok()?;
            let latitude = fields[1].parse::<f64>().ok()?;
            let longitude = fields[2].parse::<f64>().ok()?;
            // The capture stores the flag as a score; anything positive
            // counts as suspicious.
            let suspicious = fields[4].parse::<f64>().map(|v| v > 0.0).unwrap_or(false);
            Some((
                timestamp,
                RawPoint {
                    latitude,
                    longitude,
                    ip: fields[0].to_string(),
                    suspicious,
                },
            ))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_parser_skips_header_and_bad_rows() {
        let content = "\
ip_address,latitude,longitude,timestamp,suspicious
1.2.3.4,40.71,-74.0,1700000000,0
not,enough,fields
5.6.7.8,51.5,-0.1,1700000005,1.0
9.9.9.9,abc,12.0,1700000010,0
";
        let rows = parse_capture(content);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].1.ip, "1.2.3.4");
        assert!(!rows[0].1.suspicious);
        assert!(rows[1].1.suspicious);
    }

    #[test]
    fn replay_orders_rows_by_timestamp() {
        let dir = std::env::temp_dir().join("termglobe_replay_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("capture.csv");
        std::fs::write(
            &path,
            "b,1.0,1.0,200,0\na,2.0,2.0,100,0\nc,3.0,3.0,300,0\n",
        )
        .unwrap();

        // Large speedup releases everything on the first poll.
        let mut feed = ReplayFeed::from_file(&path, 1e9).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        match feed.poll() {
            Some(FeedEvent::Batch(batch)) => {
                let ips: Vec<&str> = batch.iter().map(|p| p.ip.as_str()).collect();
                assert_eq!(ips, vec!["a", "b", "c"]);
            }
            _ => panic!("expected a batch"),
        }
        assert!(feed.poll().is_none());
    }

    #[test]
    fn empty_capture_is_an_error() {
        let dir = std::env::temp_dir().join("termglobe_replay_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("empty.csv");
        std::fs::write(&path, "ip_address,latitude,longitude,timestamp,suspicious\n").unwrap();
        assert!(ReplayFeed::from_file(&path, 10.0).is_err());
    }

    #[test]
    fn demo_feed_emits_plausible_points() {
        let mut feed = DemoFeed::new(Some(7), Duration::from_millis(0), 5);
        match feed.poll() {
            Some(FeedEvent::Batch(batch)) => {
                assert!(!batch.is_empty() && batch.len() <= 5);
                for p in &batch {
                    assert!((-90.0..=90.0).contains(&p.latitude));
                    assert!((-180.5..=180.5).contains(&p.longitude));
                    assert!(!p.ip.is_empty());
                }
            }
            _ => panic!("expected a batch"),
        }
    }

    #[test]
    fn demo_feed_respects_interval() {
        let mut feed = DemoFeed::new(Some(1), Duration::from_secs(3600), 5);
        assert!(matches!(feed.poll(), Some(FeedEvent::Batch(_))));
        assert!(feed.poll().is_none());
    }
}
