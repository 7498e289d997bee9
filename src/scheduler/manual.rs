//! Hand-cranked scheduler for deterministic stepping.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{Scheduler, TickCallback, TickControl};
use crate::error::AnimatorError;

#[derive(Default)]
struct ManualInner {
    callback: Option<TickCallback>,
    initial_delay: Duration,
    interval: Duration,
    arm_count: usize,
    /// Bumped on every arm and disarm.
    generation: usize,
    fired: usize,
}

/// Scheduler whose ticks only happen when [`fire`](Self::fire) is called.
///
/// Clones share state, so a test can hand one clone to an animator and
/// keep another to drive ticks. The callback is taken out of the shared
/// state while it runs, so a tick may re-enter the animator (e.g. a view
/// calling `stop`) without deadlocking.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    inner: Arc<Mutex<ManualInner>>,
}

impl ManualScheduler {
    /// A disarmed scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ManualInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one tick of the armed callback.
    ///
    /// Returns `None` when nothing is armed. A `Stop` or `Err` result
    /// disarms the scheduler, matching the threaded scheduler.
    pub fn fire(&self) -> Option<Result<TickControl, AnimatorError>> {
        let (mut callback, generation) = {
            let mut inner = self.lock();
            let callback = inner.callback.take()?;
            inner.fired += 1;
            (callback, inner.generation)
        };

        let result = callback();

        let mut inner = self.lock();
        // Only put the callback back if nobody re-armed or disarmed meanwhile
        if matches!(result, Ok(TickControl::Continue))
            && inner.generation == generation
            && inner.callback.is_none()
        {
            inner.callback = Some(callback);
        }
        Some(result)
    }

    /// Fire up to `n` ticks, stopping early once disarmed or on error.
    /// Returns how many ticks actually ran.
    pub fn fire_n(&self, n: usize) -> usize {
        let mut ran = 0;
        while ran < n {
            match self.fire() {
                Some(Ok(TickControl::Continue)) => ran += 1,
                Some(_) => return ran + 1,
                None => break,
            }
        }
        ran
    }

    /// Delay requested by the most recent `arm`.
    pub fn initial_delay(&self) -> Duration {
        self.lock().initial_delay
    }

    /// Interval requested by the most recent `arm`.
    pub fn interval(&self) -> Duration {
        self.lock().interval
    }

    /// Number of `arm` calls so far.
    pub fn arm_count(&self) -> usize {
        self.lock().arm_count
    }

    /// Number of ticks fired so far.
    pub fn fired(&self) -> usize {
        self.lock().fired
    }
}

impl Scheduler for ManualScheduler {
    fn arm(
        &mut self,
        callback: TickCallback,
        initial_delay: Duration,
        interval: Duration,
    ) -> Result<(), AnimatorError> {
        let mut inner = self.lock();
        inner.callback = Some(callback);
        inner.initial_delay = initial_delay;
        inner.interval = interval;
        inner.arm_count += 1;
        inner.generation += 1;
        Ok(())
    }

    fn disarm(&mut self) {
        // An in-flight callback must not be restored after it returns
        let mut inner = self.lock();
        if inner.callback.take().is_some() {
            log::trace!("Manual scheduler disarmed");
        }
        inner.generation += 1;
    }

    fn is_armed(&self) -> bool {
        self.lock().callback.is_some()
    }
}
