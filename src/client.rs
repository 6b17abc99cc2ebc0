//! HTTP polling client. Fetches `{base}/data` on a fixed interval, once
//! immediately at startup. Blocking requests run on their own thread;
//! completed batches cross back to the main loop over a channel, so the
//! store is still only ever touched from the main scheduling context.
//!
//! Failure policy: any network or parse error skips the cycle and logs.
//! No retry backoff, no dedup of in-flight requests against the next tick.

use crate::feed::FeedEvent;
use crate::store::RawPoint;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

pub fn spawn_poller(base_url: &str, interval: Duration) -> Receiver<FeedEvent> {
    let url = format!("{}/data", base_url.trim_end_matches('/'));
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || poll_loop(url, interval, tx));
    rx
}

fn poll_loop(url: String, interval: Duration, tx: Sender<FeedEvent>) {
    loop {
        let event = match fetch(&url) {
            // Empty array means "no update", not an error.
            Ok(points) if points.is_empty() => None,
            Ok(points) => Some(FeedEvent::Batch(points)),
            Err(err) => {
                log::warn!("poll of {} failed: {}", url, err);
                Some(FeedEvent::Failed(err))
            }
        };

        if let Some(event) = event {
            if tx.send(event).is_err() {
                // Main loop is gone.
                return;
            }
        }

        thread::sleep(interval);
    }
}

pub fn fetch(url: &str) -> Result<Vec<RawPoint>, String> {
    let response = ureq::get(url).call().map_err(|e| e.to_string())?;
    response
        .into_json::<Vec<RawPoint>>()
        .map_err(|e| format!("bad response body: {}", e))
}
