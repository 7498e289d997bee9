//! Map camera state and its stepwise animation.
//!
//! Provides the camera value types, the [`ViewTarget`] seam to the view
//! being animated, and the [`ViewAnimator`] that drives it.

/// Stepwise animator and its per-run cancellation token.
pub mod animator;
/// Per-run step counts and deltas.
pub mod plan;
/// Camera value types and angle helpers.
pub mod state;
/// Optional-axis animation requests.
pub mod target;
/// The animated view trait and an in-memory view.
pub mod view;

pub use animator::{RunToken, ViewAnimator, ViewAnimatorBuilder};
pub use plan::{step_count, AnimationPlan};
pub use state::{
    normalize_degrees, shortest_angular_difference, CameraState, LatLng,
};
pub use target::CameraTarget;
pub use view::{AnimatorId, MemoryView, ViewTarget};
