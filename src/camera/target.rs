use std::time::Duration;

use super::state::{CameraState, LatLng};

/// An animation request where any axis may be left unspecified.
///
/// Unspecified axes keep the view's live value at the moment the run
/// starts; an unspecified duration uses the animator's default.
///
/// ```
/// use std::time::Duration;
/// use viewanim::camera::{CameraTarget, LatLng};
///
/// let target = CameraTarget::new()
///     .center(LatLng::new(50.1, 4.1))
///     .zoom(12.0)
///     .duration(Duration::from_millis(500));
/// assert_eq!(target.tilt, None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraTarget {
    /// Requested center.
    pub center: Option<LatLng>,
    /// Requested zoom.
    pub zoom: Option<f64>,
    /// Requested tilt in degrees.
    pub tilt: Option<f64>,
    /// Requested duration.
    pub duration: Option<Duration>,
}

impl CameraTarget {
    /// Empty request: every axis stays where it is.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that moves every axis to `state`.
    #[must_use]
    pub fn state(state: CameraState) -> Self {
        Self {
            center: Some(state.center),
            zoom: Some(state.zoom),
            tilt: Some(state.tilt),
            duration: None,
        }
    }

    /// Set the target center.
    #[must_use]
    pub fn center(mut self, center: LatLng) -> Self {
        self.center = Some(center);
        self
    }

    /// Set the target zoom.
    #[must_use]
    pub fn zoom(mut self, zoom: f64) -> Self {
        self.zoom = Some(zoom);
        self
    }

    /// Set the target tilt in degrees.
    #[must_use]
    pub fn tilt(mut self, tilt: f64) -> Self {
        self.tilt = Some(tilt);
        self
    }

    /// Set the run duration.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Fill unspecified axes from `current` and the duration from
    /// `default_duration`.
    pub fn resolve(
        &self,
        current: CameraState,
        default_duration: Duration,
    ) -> (CameraState, Duration) {
        (
            CameraState {
                center: self.center.unwrap_or(current.center),
                zoom: self.zoom.unwrap_or(current.zoom),
                tilt: self.tilt.unwrap_or(current.tilt),
            },
            self.duration.unwrap_or(default_duration),
        )
    }
}
