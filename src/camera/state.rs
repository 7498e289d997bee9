use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl LatLng {
    /// Coordinate from latitude and longitude in degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Pack as `(latitude, longitude)` for per-axis arithmetic.
    #[inline]
    pub fn to_dvec2(self) -> DVec2 {
        DVec2::new(self.latitude, self.longitude)
    }

    /// Unpack from `(latitude, longitude)`.
    #[inline]
    pub fn from_dvec2(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// The animatable camera quantities of a map view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CameraState {
    /// Map center.
    pub center: LatLng,
    /// Zoom level.
    pub zoom: f64,
    /// Tilt in degrees, cyclic modulo 360.
    pub tilt: f64,
}

impl CameraState {
    /// Camera state from its three components.
    pub const fn new(center: LatLng, zoom: f64, tilt: f64) -> Self {
        Self { center, zoom, tilt }
    }
}

/// Wrap an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Minimal signed rotation in degrees that turns `current` onto `target`.
///
/// The result lies in `(-180, 180]`, so stepping by a fraction of it never
/// sweeps the long way around the circle.
#[inline]
pub fn shortest_angular_difference(target: f64, current: f64) -> f64 {
    let diff = normalize_degrees(target - current);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}
