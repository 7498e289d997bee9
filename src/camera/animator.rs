//! Stepwise camera animator.
//!
//! A run moves the view from its live camera state to a target in a fixed
//! number of ticks. Every tick re-reads the view and adds one step per
//! axis, so external nudges between ticks are folded into the run; the
//! final tick pushes the exact target instead of the accumulated value.

use std::cmp::Ordering as StepOrdering;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use super::plan::{step_count, AnimationPlan};
use super::state::{CameraState, LatLng};
use super::target::CameraTarget;
use super::view::{AnimatorId, ViewTarget};
use crate::error::AnimatorError;
use crate::options::AnimationOptions;
use crate::scheduler::{
    ErrorSink, Scheduler, ThreadScheduler, TickCallback, TickControl,
};

/// Per-run cancellation flag shared with the tick callback.
///
/// Once cancelled, the run it belongs to never touches the view again,
/// even if a tick for it is already queued.
#[derive(Debug, Default)]
pub struct RunToken {
    cancelled: AtomicBool,
}

impl RunToken {
    /// A live token.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Mark cancelled. Returns `true` only for the call that actually
    /// cancelled it, which then owns the run's cleanup.
    pub fn cancel(&self) -> bool {
        !self.cancelled.swap(true, Ordering::AcqRel)
    }

    /// Whether the run has been cancelled or finished.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Drives a [`ViewTarget`]'s camera to a target over a duration using
/// discrete ticks from an owned [`Scheduler`].
///
/// Only one run is live at a time: starting a new run cancels the old one
/// first, and dropping the animator stops whatever is running.
pub struct ViewAnimator<V: ViewTarget + 'static, S: Scheduler = ThreadScheduler>
{
    id: AnimatorId,
    view: Arc<V>,
    scheduler: S,
    options: AnimationOptions,
    token: Option<Arc<RunToken>>,
    errors: ErrorSink,
}

impl<V: ViewTarget + 'static> ViewAnimator<V, ThreadScheduler> {
    /// Builder using a background-thread scheduler unless another one is
    /// supplied.
    #[must_use]
    pub fn builder() -> ViewAnimatorBuilder<V, ThreadScheduler> {
        ViewAnimatorBuilder {
            view: None,
            scheduler: ThreadScheduler::new(),
            options: AnimationOptions::default(),
        }
    }
}

impl<V: ViewTarget + 'static, S: Scheduler> ViewAnimator<V, S> {
    /// Animator for `view` ticking on `scheduler`.
    pub fn new(view: Arc<V>, mut scheduler: S, options: AnimationOptions) -> Self {
        let errors: ErrorSink = Arc::new(Mutex::new(None));
        scheduler.set_error_sink(Arc::clone(&errors));
        Self {
            id: AnimatorId::next(),
            view,
            scheduler,
            options,
            token: None,
            errors,
        }
    }

    /// Identity reported to the view while a run is active.
    pub fn id(&self) -> AnimatorId {
        self.id
    }

    /// The animated view.
    pub fn view(&self) -> &Arc<V> {
        &self.view
    }

    /// Timing options in use.
    pub fn options(&self) -> &AnimationOptions {
        &self.options
    }

    /// Whether a run is live (started, not yet finished or stopped).
    ///
    /// Stays `true` until the scheduler has wound down too, so once this
    /// turns `false` any tick error is already in
    /// [`take_error`](Self::take_error).
    pub fn is_animating(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_cancelled())
            || self.scheduler.is_armed()
    }

    /// Take the last error raised by a tick that ran off the caller's
    /// thread.
    pub fn take_error(&self) -> Option<AnimatorError> {
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Animate to `center`, `zoom` and `tilt` over `duration`.
    ///
    /// Cancels any live run, clears a stale tick error, then plans from the
    /// view's current state. The first tick is armed with zero delay: a
    /// [`ThreadScheduler`] may write before this returns, while a
    /// [`ManualScheduler`](crate::scheduler::ManualScheduler) writes
    /// nothing until its first `fire`.
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::ThreadSpawn`] if the scheduler could not be
    /// armed. The animator is left idle and unregistered.
    pub fn start(
        &mut self,
        center: LatLng,
        zoom: f64,
        tilt: f64,
        duration: Duration,
    ) -> Result<(), AnimatorError> {
        self.stop();
        // Errors from a previous run must not be reported against this one
        *self.errors.lock().unwrap_or_else(PoisonError::into_inner) = None;

        let interval = self.options.tick_interval();
        let current = self.view.camera_state();
        let target = CameraState::new(center, zoom, tilt);
        let plan =
            AnimationPlan::new(current, target, step_count(duration, interval));
        log::debug!(
            "{}: {current:?} -> {target:?} in {} steps of {interval:?}",
            self.id,
            plan.step_count,
        );

        let token = RunToken::new();
        self.view.register_animator(Some(self.id));
        let callback = tick_callback(
            self.id,
            Arc::clone(&self.view),
            Arc::clone(&token),
            plan,
        );
        if let Err(e) = self.scheduler.arm(callback, Duration::ZERO, interval)
        {
            let _ = token.cancel();
            self.view.register_animator(None);
            return Err(e);
        }
        self.token = Some(token);
        Ok(())
    }

    /// [`start`](Self::start) with the configured default duration.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start).
    pub fn start_with_default_duration(
        &mut self,
        center: LatLng,
        zoom: f64,
        tilt: f64,
    ) -> Result<(), AnimatorError> {
        let duration = self.options.default_duration();
        self.start(center, zoom, tilt, duration)
    }

    /// Animate the axes set in `target`; the rest keep their live value.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start).
    pub fn animate(&mut self, target: CameraTarget) -> Result<(), AnimatorError> {
        // Settle the old run before sampling the axes left unspecified
        self.stop();
        let (state, duration) = target
            .resolve(self.view.camera_state(), self.options.default_duration());
        self.start(state.center, state.zoom, state.tilt, duration)
    }

    /// Animate zoom only, over the default duration.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start).
    pub fn zoom_to(&mut self, zoom: f64) -> Result<(), AnimatorError> {
        self.animate(CameraTarget::new().zoom(zoom))
    }

    /// Animate zoom only.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start).
    pub fn zoom_to_over(
        &mut self,
        zoom: f64,
        duration: Duration,
    ) -> Result<(), AnimatorError> {
        self.animate(CameraTarget::new().zoom(zoom).duration(duration))
    }

    /// Animate tilt only, over the default duration.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start).
    pub fn tilt_to(&mut self, tilt: f64) -> Result<(), AnimatorError> {
        self.animate(CameraTarget::new().tilt(tilt))
    }

    /// Animate tilt only.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start).
    pub fn tilt_to_over(
        &mut self,
        tilt: f64,
        duration: Duration,
    ) -> Result<(), AnimatorError> {
        self.animate(CameraTarget::new().tilt(tilt).duration(duration))
    }

    /// Animate the center only, over the default duration.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start).
    pub fn pan_to(&mut self, center: LatLng) -> Result<(), AnimatorError> {
        self.animate(CameraTarget::new().center(center))
    }

    /// Animate the center only.
    ///
    /// # Errors
    ///
    /// See [`start`](Self::start).
    pub fn pan_to_over(
        &mut self,
        center: LatLng,
        duration: Duration,
    ) -> Result<(), AnimatorError> {
        self.animate(CameraTarget::new().center(center).duration(duration))
    }

    /// Cancel the live run, if any. Idempotent.
    ///
    /// After this returns no tick of the cancelled run writes to the view.
    pub fn stop(&mut self) {
        let Some(token) = self.token.take() else {
            return;
        };
        let cancelled_here = token.cancel();
        self.scheduler.disarm();
        // A run that already finished unregistered itself
        if cancelled_here {
            self.view.register_animator(None);
            log::debug!("{}: stopped", self.id);
        }
    }
}

impl<V: ViewTarget + 'static, S: Scheduler> Drop for ViewAnimator<V, S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Builder for [`ViewAnimator`]; building without a view is an error.
pub struct ViewAnimatorBuilder<V, S> {
    view: Option<Arc<V>>,
    scheduler: S,
    options: AnimationOptions,
}

impl<V: ViewTarget + 'static, S: Scheduler> ViewAnimatorBuilder<V, S> {
    /// View to animate.
    #[must_use]
    pub fn view(mut self, view: Arc<V>) -> Self {
        self.view = Some(view);
        self
    }

    /// Scheduler driving the ticks.
    #[must_use]
    pub fn scheduler<S2: Scheduler>(
        self,
        scheduler: S2,
    ) -> ViewAnimatorBuilder<V, S2> {
        ViewAnimatorBuilder {
            view: self.view,
            scheduler,
            options: self.options,
        }
    }

    /// Timing options.
    #[must_use]
    pub fn options(mut self, options: AnimationOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the animator.
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError::MissingView`] if no view was supplied.
    pub fn build(self) -> Result<ViewAnimator<V, S>, AnimatorError> {
        let view = self.view.ok_or(AnimatorError::MissingView)?;
        Ok(ViewAnimator::new(view, self.scheduler, self.options))
    }
}

fn tick_callback<V: ViewTarget + 'static>(
    id: AnimatorId,
    view: Arc<V>,
    token: Arc<RunToken>,
    mut plan: AnimationPlan,
) -> TickCallback {
    Box::new(move || run_tick(id, &*view, &token, &mut plan))
}

/// One tick of a run.
fn run_tick<V: ViewTarget + ?Sized>(
    id: AnimatorId,
    view: &V,
    token: &RunToken,
    plan: &mut AnimationPlan,
) -> Result<TickControl, AnimatorError> {
    // Stale tick from a stopped or superseded run
    if token.is_cancelled() {
        return Ok(TickControl::Stop);
    }

    plan.current_step += 1;
    match plan.current_step.cmp(&plan.step_count) {
        StepOrdering::Less => {
            let next = plan.advance(view.camera_state());
            log::trace!(
                "{id}: step {}/{} -> {next:?}",
                plan.current_step,
                plan.step_count
            );
            if let Err(e) =
                view.set_camera_state(next.center, next.tilt, next.zoom)
            {
                finish_run(id, view, token);
                return Err(e);
            }
            Ok(TickControl::Continue)
        }
        StepOrdering::Equal => {
            let target = plan.target;
            let pushed =
                view.set_camera_state(target.center, target.tilt, target.zoom);
            finish_run(id, view, token);
            log::debug!("{id}: reached {target:?}");
            pushed.map(|()| TickControl::Stop)
        }
        StepOrdering::Greater => {
            log::warn!(
                "{id}: tick {} past final step {}, cleaning up",
                plan.current_step,
                plan.step_count
            );
            finish_run(id, view, token);
            Ok(TickControl::Stop)
        }
    }
}

fn finish_run<V: ViewTarget + ?Sized>(
    id: AnimatorId,
    view: &V,
    token: &RunToken,
) {
    if token.cancel() {
        view.register_animator(None);
        log::trace!("{id}: released view");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::camera::state::shortest_angular_difference;
    use crate::camera::view::MemoryView;
    use crate::scheduler::ManualScheduler;

    const START: CameraState = CameraState::new(LatLng::new(50.0, 4.0), 10.0, 0.0);

    fn manual_animator(
        camera: CameraState,
    ) -> (ViewAnimator<MemoryView, ManualScheduler>, ManualScheduler) {
        let scheduler = ManualScheduler::new();
        let animator = ViewAnimator::builder()
            .view(Arc::new(MemoryView::new(camera)))
            .scheduler(scheduler.clone())
            .build()
            .unwrap();
        (animator, scheduler)
    }

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn end_to_end_lands_exactly_on_target() {
        let (mut animator, ticks) = manual_animator(START);
        let target = CameraState::new(LatLng::new(50.1, 4.1), 12.0, 90.0);
        animator
            .start(
                target.center,
                target.zoom,
                target.tilt,
                Duration::from_millis(500),
            )
            .unwrap();

        assert_eq!(ticks.initial_delay(), Duration::ZERO);
        assert_eq!(ticks.interval(), Duration::from_millis(50));

        assert!(matches!(ticks.fire(), Some(Ok(TickControl::Continue))));
        let first = animator.view().camera_state();
        assert_close(first.center.latitude, 50.01);
        assert_close(first.center.longitude, 4.01);
        assert_close(first.zoom, 10.2);
        assert_close(first.tilt, 9.0);

        assert_eq!(ticks.fire_n(100), 9);
        let view = animator.view();
        assert_eq!(view.camera_state(), target);
        assert_eq!(view.write_count(), 10);
        assert_eq!(view.active_animator(), None);
        assert!(!animator.is_animating());
        assert!(!ticks.is_armed());
    }

    #[test]
    fn start_registers_without_writing() {
        let (mut animator, ticks) = manual_animator(START);
        animator.zoom_to(14.0).unwrap();
        assert!(animator.is_animating());
        assert!(ticks.is_armed());
        assert_eq!(animator.view().write_count(), 0);
        assert_eq!(animator.view().active_animator(), Some(animator.id()));
    }

    #[test]
    fn zero_duration_is_a_single_jump() {
        let (mut animator, ticks) = manual_animator(START);
        let target = CameraState::new(LatLng::new(-33.9, 18.4), 3.0, 45.0);
        animator
            .start(target.center, target.zoom, target.tilt, Duration::ZERO)
            .unwrap();
        assert!(matches!(ticks.fire(), Some(Ok(TickControl::Stop))));
        assert_eq!(animator.view().camera_state(), target);
        assert_eq!(animator.view().write_count(), 1);
        assert!(ticks.fire().is_none());
    }

    #[test]
    fn stop_is_idempotent() {
        let (mut animator, ticks) = manual_animator(START);
        animator.stop();
        animator.stop();

        animator.tilt_to(30.0).unwrap();
        animator.stop();
        animator.stop();
        assert!(!animator.is_animating());
        assert!(!ticks.is_armed());
        assert_eq!(animator.view().active_animator(), None);
        assert_eq!(animator.view().write_count(), 0);
    }

    #[test]
    fn no_writes_after_stop() {
        let (mut animator, ticks) = manual_animator(START);
        animator.zoom_to(20.0).unwrap();
        assert_eq!(ticks.fire_n(3), 3);
        animator.stop();
        let writes = animator.view().write_count();
        assert!(ticks.fire().is_none());
        assert_eq!(animator.view().write_count(), writes);
    }

    #[test]
    fn stale_tick_after_cancel_is_inert() {
        let view = MemoryView::new(START);
        let id = AnimatorId::next();
        view.register_animator(Some(id));
        let token = RunToken::new();
        let mut plan = AnimationPlan::new(
            START,
            CameraState::new(LatLng::new(0.0, 0.0), 1.0, 180.0),
            4,
        );
        assert!(token.cancel());

        let control = run_tick(id, &view, &token, &mut plan).unwrap();
        assert_eq!(control, TickControl::Stop);
        assert_eq!(view.write_count(), 0);
        assert_eq!(plan.current_step, 0);
        // Registration belongs to whoever cancelled
        assert_eq!(view.active_animator(), Some(id));
    }

    #[test]
    fn over_fired_tick_cleans_up_without_writing() {
        let view = MemoryView::new(START);
        let id = AnimatorId::next();
        view.register_animator(Some(id));
        let token = RunToken::new();
        let mut plan = AnimationPlan::new(START, START, 2);
        plan.current_step = plan.step_count;

        let control = run_tick(id, &view, &token, &mut plan).unwrap();
        assert_eq!(control, TickControl::Stop);
        assert_eq!(view.write_count(), 0);
        assert!(token.is_cancelled());
        assert_eq!(view.active_animator(), None);
    }

    #[test]
    fn restart_plans_from_live_state() {
        let (mut animator, ticks) = manual_animator(START);
        animator
            .zoom_to_over(20.0, Duration::from_millis(500))
            .unwrap();
        assert_eq!(ticks.fire_n(5), 5);
        assert_close(animator.view().camera_state().zoom, 15.0);

        animator.zoom_to_over(5.0, Duration::from_millis(500)).unwrap();
        assert_eq!(ticks.arm_count(), 2);
        assert_eq!(animator.view().active_animator(), Some(animator.id()));

        assert!(matches!(ticks.fire(), Some(Ok(TickControl::Continue))));
        // (5 - 15) / 10 per step, not (5 - 10) / 10 or (5 - 20) / 10
        assert_close(animator.view().camera_state().zoom, 14.0);

        assert_eq!(ticks.fire_n(100), 9);
        assert_eq!(animator.view().camera_state().zoom, 5.0);
    }

    #[test]
    fn external_nudges_are_folded_in() {
        let (mut animator, ticks) = manual_animator(START);
        animator
            .zoom_to_over(20.0, Duration::from_millis(500))
            .unwrap();
        assert_eq!(ticks.fire_n(2), 2);
        assert_close(animator.view().camera_state().zoom, 12.0);

        animator
            .view()
            .nudge(CameraState { zoom: 0.0, ..animator.view().camera_state() });
        assert!(matches!(ticks.fire(), Some(Ok(TickControl::Continue))));
        assert_close(animator.view().camera_state().zoom, 1.0);

        assert_eq!(ticks.fire_n(100), 7);
        assert_eq!(animator.view().camera_state().zoom, 20.0);
    }

    #[test]
    fn tilt_takes_the_short_way_round() {
        let (mut animator, ticks) =
            manual_animator(CameraState { tilt: 350.0, ..START });
        animator.tilt_to_over(10.0, Duration::from_millis(500)).unwrap();
        assert!(matches!(ticks.fire(), Some(Ok(TickControl::Continue))));
        assert_close(animator.view().camera_state().tilt, 352.0);
        let _ = ticks.fire_n(100);

        for state in animator.view().history() {
            let off = shortest_angular_difference(state.tilt, 0.0);
            assert!(off.abs() <= 10.0 + 1e-9, "swept through {}", state.tilt);
        }
        assert_eq!(animator.view().camera_state().tilt, 10.0);
    }

    #[test]
    fn single_axis_requests_keep_other_axes() {
        let (mut animator, ticks) = manual_animator(START);
        animator
            .pan_to_over(LatLng::new(51.0, 5.0), Duration::from_millis(100))
            .unwrap();
        assert_eq!(ticks.fire_n(100), 2);
        let state = animator.view().camera_state();
        assert_eq!(state.center, LatLng::new(51.0, 5.0));
        assert_eq!(state.zoom, START.zoom);
        assert_eq!(state.tilt, START.tilt);
    }

    #[test]
    fn default_duration_is_one_second() {
        let (mut animator, ticks) = manual_animator(START);
        animator
            .start_with_default_duration(START.center, 11.0, 0.0)
            .unwrap();
        assert_eq!(ticks.fire_n(1000), 20);
    }

    #[test]
    fn view_failure_ends_the_run() {
        let (mut animator, ticks) = manual_animator(START);
        animator.zoom_to(3.0).unwrap();
        animator.view().fail_writes(Some("surface lost"));

        let result = ticks.fire();
        assert!(matches!(result, Some(Err(AnimatorError::View(_)))));
        assert!(!ticks.is_armed());
        assert!(!animator.is_animating());
        assert_eq!(animator.view().active_animator(), None);
        assert_eq!(animator.view().camera_state(), START);
    }

    #[test]
    fn building_without_a_view_fails() {
        let result = ViewAnimator::<MemoryView, _>::builder()
            .scheduler(ManualScheduler::new())
            .build();
        assert!(matches!(result, Err(AnimatorError::MissingView)));
    }

    #[test]
    fn dropping_the_animator_stops_the_run() {
        let (mut animator, ticks) = manual_animator(START);
        let view = Arc::clone(animator.view());
        animator.zoom_to(8.0).unwrap();
        drop(animator);
        assert!(!ticks.is_armed());
        assert_eq!(view.active_animator(), None);
    }

    fn wait_until_done<V: ViewTarget + 'static>(animator: &ViewAnimator<V>) {
        let give_up = Instant::now() + Duration::from_secs(5);
        while animator.is_animating() && Instant::now() < give_up {
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn fast_options() -> AnimationOptions {
        AnimationOptions {
            tick_interval_ms: 2,
            ..AnimationOptions::default()
        }
    }

    #[test]
    fn thread_scheduler_runs_to_completion() {
        let mut animator = ViewAnimator::builder()
            .view(Arc::new(MemoryView::new(START)))
            .options(fast_options())
            .build()
            .unwrap();
        let target = CameraState::new(LatLng::new(50.1, 4.1), 12.0, 90.0);
        animator
            .start(
                target.center,
                target.zoom,
                target.tilt,
                Duration::from_millis(20),
            )
            .unwrap();
        wait_until_done(&animator);

        assert!(!animator.is_animating());
        assert_eq!(animator.view().camera_state(), target);
        assert_eq!(animator.view().write_count(), 10);
        assert_eq!(animator.view().active_animator(), None);
        assert!(animator.take_error().is_none());
    }

    #[test]
    fn thread_scheduler_stop_is_final() {
        let mut animator = ViewAnimator::builder()
            .view(Arc::new(MemoryView::new(START)))
            .options(fast_options())
            .build()
            .unwrap();
        animator
            .zoom_to_over(18.0, Duration::from_secs(10))
            .unwrap();
        std::thread::sleep(Duration::from_millis(10));
        animator.stop();
        let writes = animator.view().write_count();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(animator.view().write_count(), writes);
        assert_eq!(animator.view().active_animator(), None);
    }

    #[test]
    fn thread_scheduler_surfaces_view_errors() {
        let view = Arc::new(MemoryView::new(START));
        view.fail_writes(Some("detached"));
        let mut animator = ViewAnimator::builder()
            .view(Arc::clone(&view))
            .options(fast_options())
            .build()
            .unwrap();
        // Every run must have parked its error by the time it reports done
        for _ in 0..20 {
            animator.zoom_to(4.0).unwrap();
            wait_until_done(&animator);
            assert!(!animator.is_animating());
            assert!(matches!(
                animator.take_error(),
                Some(AnimatorError::View(ref m)) if m == "detached"
            ));
            assert!(animator.take_error().is_none());
            assert_eq!(view.active_animator(), None);
        }
    }

    #[test]
    fn restart_clears_a_stale_error() {
        let view = Arc::new(MemoryView::new(START));
        view.fail_writes(Some("detached"));
        let mut animator = ViewAnimator::builder()
            .view(Arc::clone(&view))
            .options(fast_options())
            .build()
            .unwrap();
        animator.zoom_to(4.0).unwrap();
        wait_until_done(&animator);

        // Left unread on purpose; the next run must not report it
        view.fail_writes(None);
        animator
            .zoom_to_over(6.0, Duration::from_millis(10))
            .unwrap();
        wait_until_done(&animator);
        assert!(animator.take_error().is_none());
        assert_eq!(view.camera_state().zoom, 6.0);
    }

    #[test]
    fn whole_state_request_moves_every_axis() {
        let (mut animator, ticks) = manual_animator(START);
        let target = CameraState::new(LatLng::new(48.8, 2.3), 15.0, 60.0);
        animator
            .animate(
                CameraTarget::state(target).duration(Duration::from_millis(150)),
            )
            .unwrap();
        assert_eq!(ticks.fire_n(100), 3);
        assert_eq!(animator.view().camera_state(), target);
    }
}
