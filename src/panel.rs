//! Control panel on the right edge: counts, the ranked location list, feed
//! status and key hints. The list doubles as the focus trigger: its entries
//! are numbered and the matching digit key starts a camera focus transition.

use crate::aggregate::{LocationGroup, Summary};
use crate::config::StoreConfig;
use crate::terminal::Terminal;
use crossterm::style::Color;
use std::time::Instant;

pub const PANEL_WIDTH: u16 = 34;

pub const NO_LOCATIONS: &str = "No active locations";

/// What the feed last did, shown as a one-line status.
#[derive(Default)]
pub struct FeedStatus {
    pub last_update: Option<Instant>,
    pub last_error: Option<String>,
}

/// One ranked list entry. Slot 10 is selected with the `0` key.
pub fn location_line(index: usize, group: &LocationGroup) -> String {
    let key = if index == 9 { 0 } else { index + 1 };
    let mut line = format!(
        "{}) {:>6.2},{:>7.2}  {} pts",
        key, group.lat, group.lng, group.count
    );
    if group.suspicious > 0 {
        line.push_str(&format!(" ({} susp)", group.suspicious));
    }
    line
}

pub fn status_line(status: &FeedStatus, now: Instant) -> String {
    match (&status.last_error, status.last_update) {
        (Some(err), _) => format!("fetch failed: {}", err)
            .chars()
            .take(PANEL_WIDTH as usize - 2)
            .collect(),
        (None, Some(at)) => {
            let secs = now.saturating_duration_since(at).as_secs();
            format!("updated {}s ago", secs)
        }
        (None, None) => "waiting for data...".to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn render(
    term: &mut Terminal,
    x0: i32,
    summary: &Summary,
    cfg: &StoreConfig,
    auto_rotate: bool,
    status: &FeedStatus,
    now: Instant,
) {
    let x = x0 + 1;
    let mut y = 1;

    term.set_str(x, y, "TERMGLOBE", Some(Color::White), true);
    y += 1;
    term.set_str(x, y, "─────────", Some(Color::DarkGrey), false);
    y += 2;

    term.set_str(x, y, &format!("Total      {:>6}", summary.total), Some(Color::White), false);
    y += 1;
    term.set_str(x, y, &format!("Normal     {:>6}", summary.normal), Some(Color::Green), false);
    y += 1;
    term.set_str(
        x,
        y,
        &format!("Suspicious {:>6}", summary.suspicious),
        Some(Color::Red),
        false,
    );
    y += 2;

    term.set_str(x, y, "Active locations", Some(Color::White), true);
    y += 1;

    if summary.top.is_empty() {
        term.set_str(x, y, NO_LOCATIONS, Some(Color::DarkGrey), false);
        y += 1;
    } else {
        for (i, group) in summary.top.iter().enumerate() {
            let color = if group.suspicious > 0 {
                Color::Red
            } else {
                Color::Grey
            };
            term.set_str(x, y, &location_line(i, group), Some(color), false);
            y += 1;
        }
    }
    y += 1;

    term.set_str(
        x,
        y,
        &format!(
            "lifetime {:>3}s   max {:>4}",
            cfg.lifetime.as_secs(),
            cfg.max_points
        ),
        Some(Color::DarkGrey),
        false,
    );
    y += 1;
    term.set_str(
        x,
        y,
        &format!("rotate {}", if auto_rotate { "on " } else { "off" }),
        Some(Color::DarkGrey),
        false,
    );
    y += 2;

    term.set_str(x, y, "1-9,0  focus location", Some(Color::DarkGrey), false);
    y += 1;
    term.set_str(x, y, "[ ]    lifetime  - +  max", Some(Color::DarkGrey), false);
    y += 1;
    term.set_str(x, y, "r      rotate    q    quit", Some(Color::DarkGrey), false);
    y += 2;

    term.set_str(x, y, &status_line(status, now), Some(Color::DarkGrey), false);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn location_line_numbering_wraps_to_zero() {
        let group = LocationGroup {
            lat: 40.71,
            lng: -74.0,
            count: 57,
            suspicious: 0,
        };
        assert!(location_line(0, &group).starts_with("1)"));
        assert!(location_line(9, &group).starts_with("0)"));
    }

    #[test]
    fn location_line_flags_suspicious_groups() {
        let group = LocationGroup {
            lat: 51.5,
            lng: -0.1,
            count: 3,
            suspicious: 2,
        };
        let line = location_line(0, &group);
        assert!(line.contains("3 pts"));
        assert!(line.contains("(2 susp)"));

        let clean = LocationGroup {
            suspicious: 0,
            ..group
        };
        assert!(!location_line(0, &clean).contains("susp"));
    }

    #[test]
    fn status_line_prefers_errors() {
        let now = Instant::now() + Duration::from_secs(60);
        let mut status = FeedStatus {
            last_update: Some(now - Duration::from_secs(3)),
            last_error: None,
        };
        assert_eq!(status_line(&status, now), "updated 3s ago");

        status.last_error = Some("connection refused".to_string());
        assert!(status_line(&status, now).starts_with("fetch failed"));

        let idle = FeedStatus::default();
        assert_eq!(status_line(&idle, now), "waiting for data...");
    }
}
