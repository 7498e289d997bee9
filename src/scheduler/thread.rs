//! Background-thread scheduler.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, PoisonError};
use std::thread::JoinHandle;
use std::time::Duration;

use web_time::Instant;

use super::{ErrorSink, Scheduler, TickCallback, TickControl};
use crate::error::AnimatorError;

/// Fires ticks on a dedicated background thread.
///
/// Ticks run at a fixed rate measured from the arm time, so a slow tick
/// does not push every later tick back. Disarming wakes the thread
/// immediately and waits for an in-flight tick to finish.
pub struct ThreadScheduler {
    shutdown_tx: Option<mpsc::Sender<()>>,
    thread: Option<JoinHandle<()>>,
    /// Cleared by the thread when its callback stops on its own.
    running: Arc<AtomicBool>,
    errors: Option<ErrorSink>,
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ThreadScheduler {
    /// A disarmed scheduler.
    pub fn new() -> Self {
        Self {
            shutdown_tx: None,
            thread: None,
            running: Arc::new(AtomicBool::new(false)),
            errors: None,
        }
    }

    #[allow(clippy::needless_pass_by_value)]
    fn thread_loop(
        mut callback: TickCallback,
        shutdown_rx: mpsc::Receiver<()>,
        initial_delay: Duration,
        interval: Duration,
        running: Arc<AtomicBool>,
        errors: Option<ErrorSink>,
    ) {
        let mut deadline = Instant::now() + initial_delay;
        loop {
            let wait = deadline.saturating_duration_since(Instant::now());
            match shutdown_rx.recv_timeout(wait) {
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                // Explicit disarm or the owning scheduler went away
                Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }

            match callback() {
                Ok(TickControl::Continue) => deadline += interval,
                Ok(TickControl::Stop) => break,
                Err(e) => {
                    log::error!("Animation tick failed: {e}");
                    if let Some(sink) = &errors {
                        *sink.lock().unwrap_or_else(PoisonError::into_inner) =
                            Some(e);
                    }
                    break;
                }
            }
        }
        running.store(false, Ordering::Release);
    }
}

impl Scheduler for ThreadScheduler {
    fn arm(
        &mut self,
        callback: TickCallback,
        initial_delay: Duration,
        interval: Duration,
    ) -> Result<(), AnimatorError> {
        self.disarm();

        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        // Fresh flag per arm so a finishing old thread cannot clear it
        self.running = Arc::new(AtomicBool::new(true));
        let running = Arc::clone(&self.running);
        let errors = self.errors.clone();

        let spawned = std::thread::Builder::new()
            .name("view-animator-tick".into())
            .spawn(move || {
                Self::thread_loop(
                    callback,
                    shutdown_rx,
                    initial_delay,
                    interval,
                    running,
                    errors,
                );
            });
        match spawned {
            Ok(handle) => {
                log::debug!("Tick thread armed every {interval:?}");
                self.shutdown_tx = Some(shutdown_tx);
                self.thread = Some(handle);
                Ok(())
            }
            Err(e) => {
                self.running.store(false, Ordering::Release);
                Err(AnimatorError::ThreadSpawn(e))
            }
        }
    }

    fn disarm(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.thread.take() {
            // A tick disarming its own scheduler must not join itself
            if handle.thread().id() != std::thread::current().id() {
                let _ = handle.join();
            }
            log::debug!("Tick thread disarmed");
        }
        self.running.store(false, Ordering::Release);
    }

    fn is_armed(&self) -> bool {
        self.thread.is_some() && self.running.load(Ordering::Acquire)
    }

    fn set_error_sink(&mut self, sink: ErrorSink) {
        self.errors = Some(sink);
    }
}

impl Drop for ThreadScheduler {
    fn drop(&mut self) {
        self.disarm();
    }
}
