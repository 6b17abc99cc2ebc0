//! Braille wireframe globe with the live point layer. Geometry follows the
//! orbit camera: the surface point under the camera is centered on screen
//! and the apparent size tracks the camera distance.

use crate::camera::{Camera, INITIAL_DISTANCE};
use crate::earth;
use crate::store::GeoPoint;
use crate::terminal::Terminal;
use crossterm::style::Color;

// Dot intensity codes, low to high priority.
const DOT_GRID: u8 = 1;
const DOT_COAST: u8 = 2;
const DOT_NORMAL: u8 = 3;
const DOT_SUSPICIOUS: u8 = 4;

const NORMAL_COLOR: Color = Color::Green;
const SUSPICIOUS_COLOR: Color = Color::Red;

pub struct GlobeView {
    braille_w: usize,
    braille_h: usize,
    dots: Vec<Vec<u8>>,
}

impl GlobeView {
    pub fn new(cols: u16, rows: u16) -> Self {
        let braille_w = cols as usize * 2;
        let braille_h = rows as usize * 4;
        Self {
            braille_w,
            braille_h,
            dots: vec![vec![0; braille_w]; braille_h],
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.braille_w = cols as usize * 2;
        self.braille_h = rows as usize * 4;
        self.dots = vec![vec![0; self.braille_w]; self.braille_h];
    }

    /// Draw the globe and the current point set into the left `cols` columns
    /// of the terminal buffer.
    pub fn render(&mut self, term: &mut Terminal, camera: &Camera, points: &[GeoPoint]) {
        for row in &mut self.dots {
            for dot in row {
                *dot = 0;
            }
        }

        let w = (self.braille_w / 2) as f64;
        let h = (self.braille_h / 4) as f64;
        let half_w = w / 2.0;
        let half_h = h / 2.0;

        let zoom = (INITIAL_DISTANCE / camera.distance().max(1.0)).clamp(0.5, 2.0);
        let radius = (h * 1.8).min(w * 0.8) * 0.4 * zoom;

        let (rotation, tilt) = camera.view_angles();
        let (cos_tilt, sin_tilt) = (tilt.cos(), tilt.sin());

        // Lat/lon in radians to braille coordinates; None on the far side.
        let project = |lat: f64, lon: f64| -> Option<(i32, i32)> {
            let cos_lat = lat.cos();
            let x = cos_lat * (lon + rotation).sin();
            let y = cos_lat * (lon + rotation).cos();
            let z = lat.sin();

            let depth = y * cos_tilt - z * sin_tilt;
            let z2 = y * sin_tilt + z * cos_tilt;

            if depth < -0.1 {
                return None;
            }

            let screen_x = half_w + x * radius;
            let screen_y = half_h - z2 * radius * 0.5;
            Some(((screen_x * 2.0) as i32, (screen_y * 4.0) as i32))
        };

        self.draw_graticule(&project);
        self.draw_coastlines(&project);
        self.draw_points(&project, points);
        self.blit(term);
    }

    fn plot(&mut self, bx: i32, by: i32, intensity: u8) {
        if bx >= 0
            && (bx as usize) < self.braille_w
            && by >= 0
            && (by as usize) < self.braille_h
        {
            let dot = &mut self.dots[by as usize][bx as usize];
            *dot = (*dot).max(intensity);
        }
    }

    fn draw_graticule<P: Fn(f64, f64) -> Option<(i32, i32)>>(&mut self, project: &P) {
        for lat_deg in (-60..=60).step_by(30) {
            let lat = (lat_deg as f64).to_radians();
            for lon_deg in 0..360 {
                let lon = (lon_deg as f64).to_radians() - std::f64::consts::PI;
                if let Some((bx, by)) = project(lat, lon) {
                    self.plot(bx, by, DOT_GRID);
                }
            }
        }

        for lon_deg in (0..360).step_by(30) {
            let lon = (lon_deg as f64).to_radians() - std::f64::consts::PI;
            for lat_deg in -90..=90 {
                let lat = (lat_deg as f64).to_radians();
                if let Some((bx, by)) = project(lat, lon) {
                    self.plot(bx, by, DOT_GRID);
                }
            }
        }
    }

    fn draw_coastlines<P: Fn(f64, f64) -> Option<(i32, i32)>>(&mut self, project: &P) {
        const SEGMENT_STEPS: usize = 20;

        for outline in earth::CONTINENTS {
            for pair in outline.windows(2) {
                let (lat1, lon1) = (pair[0].0 as f64, pair[0].1 as f64);
                let (lat2, lon2) = (pair[1].0 as f64, pair[1].1 as f64);

                for t in 0..SEGMENT_STEPS {
                    let frac = t as f64 / SEGMENT_STEPS as f64;
                    let lat = (lat1 + (lat2 - lat1) * frac).to_radians();
                    let lon = (lon1 + (lon2 - lon1) * frac).to_radians();
                    if let Some((bx, by)) = project(lat, lon) {
                        self.plot(bx, by, DOT_COAST);
                    }
                }
            }
        }
    }

    fn draw_points<P: Fn(f64, f64) -> Option<(i32, i32)>>(
        &mut self,
        project: &P,
        points: &[GeoPoint],
    ) {
        for point in points {
            let intensity = if point.suspicious {
                DOT_SUSPICIOUS
            } else {
                DOT_NORMAL
            };
            if let Some((bx, by)) = project(point.lat.to_radians(), point.lng.to_radians()) {
                // Small plus-shaped marker so a single event stays visible.
                self.plot(bx, by, intensity);
                self.plot(bx - 1, by, intensity);
                self.plot(bx + 1, by, intensity);
                self.plot(bx, by - 1, intensity);
                self.plot(bx, by + 1, intensity);
            }
        }
    }

    fn blit(&self, term: &mut Terminal) {
        let cols = self.braille_w / 2;
        let rows = self.braille_h / 4;

        let positions = |by: usize, bx: usize| {
            [
                (by, bx),
                (by + 1, bx),
                (by + 2, bx),
                (by, bx + 1),
                (by + 1, bx + 1),
                (by + 2, bx + 1),
                (by + 3, bx),
                (by + 3, bx + 1),
            ]
        };
        let dot_bits = [0x01, 0x02, 0x04, 0x08, 0x10, 0x20, 0x40, 0x80];

        for cy in 0..rows {
            let by = cy * 4;
            for cx in 0..cols {
                let bx = cx * 2;

                let mut bits: u8 = 0;
                let mut max_intensity: u8 = 0;
                for (i, (py, px)) in positions(by, bx).into_iter().enumerate() {
                    let val = self.dots[py][px];
                    if val > 0 {
                        bits |= dot_bits[i];
                        max_intensity = max_intensity.max(val);
                    }
                }

                if bits > 0 {
                    let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                    let (color, bold) = match max_intensity {
                        DOT_SUSPICIOUS => (SUSPICIOUS_COLOR, true),
                        DOT_NORMAL => (NORMAL_COLOR, true),
                        DOT_COAST => (Color::Grey, false),
                        _ => (Color::DarkGrey, false),
                    };
                    term.set(cx as i32, cy as i32, ch, Some(color), bold);
                }
            }
        }
    }
}
