//! Periodic tick primitives driving an animator.
//!
//! A [`Scheduler`] fires a callback at a fixed interval until disarmed or
//! until the callback asks to stop. Each animator owns exactly one
//! scheduler; arming replaces whatever callback was armed before.

mod manual;
mod thread;

use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use manual::ManualScheduler;
pub use thread::ThreadScheduler;

use crate::error::AnimatorError;

/// What the scheduler should do after a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickControl {
    /// Keep firing at the armed interval.
    Continue,
    /// Disarm; no further ticks for this callback.
    Stop,
}

/// Callback invoked once per tick. An `Err` disarms like
/// [`TickControl::Stop`] and is surfaced by the scheduler.
pub type TickCallback =
    Box<dyn FnMut() -> Result<TickControl, AnimatorError> + Send + 'static>;

/// Slot where a scheduler parks errors from ticks it runs off the
/// caller's thread.
pub type ErrorSink = Arc<Mutex<Option<AnimatorError>>>;

/// A periodic timer with an explicit arm/disarm lifecycle.
pub trait Scheduler: Send {
    /// Start firing `callback` after `initial_delay`, then every
    /// `interval`. Any previously armed callback is disarmed first.
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::ThreadSpawn`] if the timer context could
    /// not be created.
    fn arm(
        &mut self,
        callback: TickCallback,
        initial_delay: Duration,
        interval: Duration,
    ) -> Result<(), AnimatorError>;

    /// Stop firing and release the callback. Idempotent.
    fn disarm(&mut self);

    /// Whether a callback is currently armed.
    fn is_armed(&self) -> bool;

    /// Where to store errors from ticks whose result has no direct
    /// caller. Schedulers that hand tick results back themselves ignore it.
    fn set_error_sink(&mut self, _sink: ErrorSink) {}
}
