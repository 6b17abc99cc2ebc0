//! The render loop. Owns all mutable state (store, summary, camera, feed
//! status) and runs everything from one thread: feed events are drained
//! once per frame, merged, summarized and drawn.

use crate::aggregate::{summarize, Summary};
use crate::camera::Camera;
use crate::config::GlobeConfig;
use crate::feed::{Feed, FeedEvent};
use crate::globe::GlobeView;
use crate::panel::{self, FeedStatus, PANEL_WIDTH};
use crate::store::PointStore;
use crate::terminal::Terminal;
use crossterm::event::KeyCode;
use std::io;
use std::time::Instant;

fn globe_cols(width: u16) -> u16 {
    width.saturating_sub(PANEL_WIDTH.min(width / 2))
}

pub fn run(mut term: Terminal, mut feed: Feed, config: GlobeConfig) -> io::Result<()> {
    let (init_w, init_h) = term.size();
    let mut globe = GlobeView::new(globe_cols(init_w), init_h);
    let mut prev_size = (init_w, init_h);

    let mut store = PointStore::new();
    let mut summary = Summary::default();
    let mut camera = Camera::new();
    let mut status = FeedStatus::default();

    let mut store_cfg = config.store;
    let mut auto_rotate = config.auto_rotate;
    let mut last_frame = Instant::now();

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());
        if (width, height) != prev_size {
            term.resize(width, height);
            term.clear_screen()?;
            globe.resize(globe_cols(width), height);
            prev_size = (width, height);
        }

        if let Some((code, _mods)) = term.check_key()? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('r') => auto_rotate = !auto_rotate,
                KeyCode::Char('[') => store_cfg.adjust_lifetime(-5),
                KeyCode::Char(']') => store_cfg.adjust_lifetime(5),
                KeyCode::Char('-') | KeyCode::Char('_') => store_cfg.adjust_max_points(-100),
                KeyCode::Char('+') | KeyCode::Char('=') => store_cfg.adjust_max_points(100),
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    // List slots are 1..9 then 0 for the tenth entry.
                    let digit = c.to_digit(10).unwrap() as usize;
                    let index = if digit == 0 { 9 } else { digit - 1 };
                    if let Some(group) = summary.top.get(index) {
                        camera.focus_on(group.lat, group.lng, Instant::now());
                    }
                }
                _ => {}
            }
        }

        match feed.poll() {
            Some(FeedEvent::Batch(batch)) => {
                let now = Instant::now();
                store.merge(batch, &store_cfg, now);
                summary = summarize(store.points());
                status.last_update = Some(now);
                status.last_error = None;
            }
            Some(FeedEvent::Failed(err)) => status.last_error = Some(err),
            None => {}
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;
        if auto_rotate && !camera.in_transition() {
            camera.auto_rotate(dt);
        }
        camera.update(now);

        term.clear();
        globe.render(&mut term, &camera, store.points());
        panel::render(
            &mut term,
            globe_cols(width) as i32,
            &summary,
            &store_cfg,
            auto_rotate,
            &status,
            now,
        );
        term.present()?;
        term.sleep(config.time_step);
    }

    Ok(())
}
