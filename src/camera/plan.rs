//! Per-run step arithmetic.

use std::time::Duration;

use glam::DVec2;

use super::state::{
    normalize_degrees, shortest_angular_difference, CameraState, LatLng,
};

/// Number of ticks needed to cover `duration`, rounded to nearest and
/// never less than one.
pub fn step_count(duration: Duration, tick_interval: Duration) -> u32 {
    let tick = tick_interval.as_nanos();
    if tick == 0 {
        return 1;
    }
    // Round half up in whole nanoseconds
    let steps = (duration.as_nanos() + tick / 2) / tick;
    u32::try_from(steps).unwrap_or(u32::MAX).max(1)
}

/// Target and per-tick deltas computed once when a run starts.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationPlan {
    /// Exact state pushed on the terminal tick.
    pub target: CameraState,
    /// Total ticks in the run, at least one.
    pub step_count: u32,
    /// Per-tick `(latitude, longitude)` delta.
    pub step_center: DVec2,
    /// Per-tick zoom delta.
    pub step_zoom: f64,
    /// Per-tick tilt delta along the shorter arc.
    pub step_tilt: f64,
    /// Ticks applied so far.
    pub current_step: u32,
}

impl AnimationPlan {
    /// Plan moving `from` to `target` in `step_count` ticks.
    pub fn new(from: CameraState, target: CameraState, step_count: u32) -> Self {
        let step_count = step_count.max(1);
        let steps = f64::from(step_count);
        Self {
            target,
            step_count,
            step_center: (target.center.to_dvec2() - from.center.to_dvec2())
                / steps,
            step_zoom: (target.zoom - from.zoom) / steps,
            step_tilt: shortest_angular_difference(target.tilt, from.tilt)
                / steps,
            current_step: 0,
        }
    }

    /// `current` advanced by one tick's worth of every delta.
    pub fn advance(&self, current: CameraState) -> CameraState {
        CameraState {
            center: LatLng::from_dvec2(
                current.center.to_dvec2() + self.step_center,
            ),
            zoom: current.zoom + self.step_zoom,
            tilt: normalize_degrees(current.tilt + self.step_tilt),
        }
    }
}
