//! The view being animated, plus an in-memory implementation.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::state::{CameraState, LatLng};
use crate::error::AnimatorError;

/// Process-unique identity of a [`ViewAnimator`](super::ViewAnimator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimatorId(u64);

impl AnimatorId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnimatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "animator#{}", self.0)
    }
}

/// A map view whose camera can be driven by an animator.
///
/// Methods take `&self` because ticks arrive on the scheduler's thread
/// while the owning thread keeps reading the view.
pub trait ViewTarget: Send + Sync {
    /// Current center, zoom and tilt.
    fn camera_state(&self) -> CameraState;

    /// Apply a new camera configuration. Takes effect for subsequent reads.
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::View`] if the view rejects the update.
    fn set_camera_state(
        &self,
        center: LatLng,
        tilt: f64,
        zoom: f64,
    ) -> Result<(), AnimatorError>;

    /// Record which animator (if any) currently owns camera updates.
    /// `None` hands control back to the view's default update path.
    fn register_animator(&self, animator: Option<AnimatorId>);
}

#[derive(Debug, Default)]
struct MemoryViewInner {
    camera: CameraState,
    active: Option<AnimatorId>,
    writes: usize,
    history: Vec<CameraState>,
    fail_writes: Option<String>,
}

/// A [`ViewTarget`] that only stores its camera state.
///
/// Counts every accepted write and keeps a history of them, which makes it
/// convenient for headless runs and tests.
#[derive(Debug, Default)]
pub struct MemoryView {
    inner: Mutex<MemoryViewInner>,
}

impl MemoryView {
    /// View starting at the given camera state.
    pub fn new(camera: CameraState) -> Self {
        Self {
            inner: Mutex::new(MemoryViewInner {
                camera,
                ..MemoryViewInner::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryViewInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Move the camera without counting it as an animator write, e.g. a
    /// user drag between ticks.
    pub fn nudge(&self, camera: CameraState) {
        self.lock().camera = camera;
    }

    /// Make every subsequent write fail with `reason` (`None` to recover).
    pub fn fail_writes(&self, reason: Option<&str>) {
        self.lock().fail_writes = reason.map(str::to_owned);
    }

    /// Animator currently registered as owner.
    pub fn active_animator(&self) -> Option<AnimatorId> {
        self.lock().active
    }

    /// Number of accepted `set_camera_state` calls.
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    /// Every accepted camera write, oldest first.
    pub fn history(&self) -> Vec<CameraState> {
        self.lock().history.clone()
    }
}

impl ViewTarget for MemoryView {
    fn camera_state(&self) -> CameraState {
        self.lock().camera
    }

    fn set_camera_state(
        &self,
        center: LatLng,
        tilt: f64,
        zoom: f64,
    ) -> Result<(), AnimatorError> {
        let mut inner = self.lock();
        if let Some(reason) = &inner.fail_writes {
            return Err(AnimatorError::View(reason.clone()));
        }
        let camera = CameraState::new(center, zoom, tilt);
        inner.camera = camera;
        inner.writes += 1;
        inner.history.push(camera);
        Ok(())
    }

    fn register_animator(&self, animator: Option<AnimatorId>) {
        self.lock().active = animator;
    }
}
