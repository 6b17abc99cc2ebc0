//! Orbit camera for the globe view. The camera always looks at the globe
//! center, so its state is just a position on (or moving toward) an orbit
//! sphere. Focus transitions linearly interpolate that position over a fixed
//! duration; a new focus request restarts from wherever the camera currently
//! is, with no queuing and no mid-flight cancellation.

use std::time::{Duration, Instant};

/// Distance of the camera at startup.
pub const INITIAL_DISTANCE: f64 = 250.0;
/// Orbit radius a focus transition settles on.
pub const FOCUS_DISTANCE: f64 = 300.0;
/// Length of a focus transition.
pub const FOCUS_DURATION: Duration = Duration::from_millis(1000);
/// Auto-rotation rate around the polar axis, radians per second.
const AUTO_ROTATE_RATE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn scale(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn lerp(a: Vec3, b: Vec3, t: f64) -> Self {
        Self::new(
            a.x + (b.x - a.x) * t,
            a.y + (b.y - a.y) * t,
            a.z + (b.z - a.z) * t,
        )
    }
}

/// Unit-sphere position for a latitude/longitude, polar axis along
/// latitude 90°.
pub fn lat_lng_to_unit(lat: f64, lng: f64) -> Vec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lng + 180.0).to_radians();
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.cos(),
        phi.sin() * theta.sin(),
    )
}

#[derive(Debug, Clone, Copy)]
struct Transition {
    from: Vec3,
    to: Vec3,
    started: Instant,
}

pub struct Camera {
    position: Vec3,
    transition: Option<Transition>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, INITIAL_DISTANCE),
            transition: None,
        }
    }

    #[allow(dead_code)] // reserved for overlays that need the raw position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn distance(&self) -> f64 {
        self.position.length()
    }

    pub fn in_transition(&self) -> bool {
        self.transition.is_some()
    }

    /// Start a focus transition toward the given location.
    pub fn focus_on(&mut self, lat: f64, lng: f64, now: Instant) {
        let to = lat_lng_to_unit(lat, lng).scale(FOCUS_DISTANCE);
        self.transition = Some(Transition {
            from: self.position,
            to,
            started: now,
        });
    }

    /// Advance the active transition, sampled once per frame.
    pub fn update(&mut self, now: Instant) {
        if let Some(t) = self.transition {
            let progress = now.saturating_duration_since(t.started).as_secs_f64()
                / FOCUS_DURATION.as_secs_f64();
            let progress = progress.min(1.0);
            self.position = Vec3::lerp(t.from, t.to, progress);
            if progress >= 1.0 {
                self.transition = None;
            }
        }
    }

    /// Spin the camera around the polar axis. Suspended by the caller while
    /// a focus transition is in flight.
    pub fn auto_rotate(&mut self, dt: f64) {
        let a = AUTO_ROTATE_RATE * dt;
        let (x, z) = (self.position.x, self.position.z);
        self.position.x = x * a.cos() - z * a.sin();
        self.position.z = x * a.sin() + z * a.cos();
    }

    /// View angles for the screen projection, derived from the camera
    /// position: (rotation, tilt) such that the surface point under the
    /// camera lands in the middle of the screen.
    pub fn view_angles(&self) -> (f64, f64) {
        let len = self.distance().max(1e-9);
        let lat = (self.position.y / len).asin();
        let lng = self.position.z.atan2(self.position.x) - std::f64::consts::PI;
        (-lng, -lat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn poles_and_equator_map_correctly() {
        let north = lat_lng_to_unit(90.0, 0.0);
        assert!(close(north.x, 0.0) && close(north.y, 1.0) && close(north.z, 0.0));

        let origin = lat_lng_to_unit(0.0, 0.0);
        assert!(close(origin.y, 0.0));
        assert!(close(origin.length(), 1.0));
        // theta = 180°: the prime meridian sits on the -x axis.
        assert!(close(origin.x, -1.0));
    }

    #[test]
    fn focus_interpolates_and_settles() {
        let mut camera = Camera::new();
        let start = Instant::now();
        camera.focus_on(40.0, -74.0, start);
        assert!(camera.in_transition());

        camera.update(start + Duration::from_millis(500));
        let midway = camera.position();
        let target = lat_lng_to_unit(40.0, -74.0).scale(FOCUS_DISTANCE);
        let expected = Vec3::lerp(Vec3::new(0.0, 0.0, INITIAL_DISTANCE), target, 0.5);
        assert!(close(midway.x, expected.x));
        assert!(close(midway.y, expected.y));
        assert!(close(midway.z, expected.z));

        camera.update(start + Duration::from_millis(1000));
        assert!(!camera.in_transition());
        assert!(close(camera.distance(), FOCUS_DISTANCE));
    }

    #[test]
    fn second_focus_restarts_from_current_position() {
        let mut camera = Camera::new();
        let start = Instant::now();
        camera.focus_on(0.0, 0.0, start);
        camera.update(start + Duration::from_millis(400));
        let mid = camera.position();

        camera.focus_on(51.5, -0.1, start + Duration::from_millis(400));
        camera.update(start + Duration::from_millis(400));
        let restarted = camera.position();
        assert!(close(mid.x, restarted.x) && close(mid.y, restarted.y));
    }

    #[test]
    fn view_angles_center_the_focused_location() {
        let mut camera = Camera::new();
        let start = Instant::now();
        camera.focus_on(40.0, -74.0, start);
        camera.update(start + Duration::from_secs(2));

        let (rotation, tilt) = camera.view_angles();
        // Projection puts lon + rotation = 0 at screen center.
        let lng = (-74.0f64).to_radians();
        let lat = 40.0f64.to_radians();
        let wrapped = (lng + rotation).rem_euclid(std::f64::consts::TAU);
        assert!(wrapped < 1e-6 || std::f64::consts::TAU - wrapped < 1e-6);
        assert!(close(tilt, -lat));
    }

    #[test]
    fn auto_rotate_preserves_distance_and_latitude() {
        let mut camera = Camera::new();
        let start = Instant::now();
        camera.focus_on(35.7, 139.7, start);
        camera.update(start + Duration::from_secs(2));

        let before = camera.distance();
        let y_before = camera.position().y;
        camera.auto_rotate(1.0);
        assert!(close(camera.distance(), before));
        assert!(close(camera.position().y, y_before));
    }
}
