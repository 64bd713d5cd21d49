use std::ops::ControlFlow;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// A cancellable repeating task on its own named thread.
///
/// The session controller keeps at most one of these per loop in a
/// single-slot `Option`, so a second concurrent instance of the same loop is
/// structurally impossible. A tick can end its own loop by returning
/// `ControlFlow::Break`; `cancel` wakes a loop that is waiting out its
/// interval and is idempotent, safe to call on a loop that already broke.
pub struct PeriodicTask {
    stop: Arc<(Mutex<bool>, Condvar)>,
    handle: Option<thread::JoinHandle<()>>,
}

impl PeriodicTask {
    /// Spawn the task. The first tick runs immediately, then every
    /// `interval`.
    pub fn spawn<F>(name: &str, interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> ControlFlow<()> + Send + 'static,
    {
        let stop = Arc::new((Mutex::new(false), Condvar::new()));
        let pair = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name(name.into())
            .spawn(move || {
                let (stopped, wake) = &*pair;
                loop {
                    if *stopped.lock() {
                        break;
                    }
                    if tick().is_break() {
                        break;
                    }
                    // Interval wait on the condvar, so cancellation does not
                    // sleep out the remainder of the interval.
                    let mut guard = stopped.lock();
                    if !*guard {
                        let _ = wake.wait_for(&mut guard, interval);
                    }
                }
            })
            .expect("failed to spawn periodic task thread");

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stop the loop, waking it if it is between ticks, and wait for the
    /// thread to finish.
    ///
    /// Idempotent; never call while holding a lock the tick closure takes.
    pub fn cancel(&mut self) {
        let (stopped, wake) = &*self.stop;
        *stopped.lock() = true;
        wake.notify_all();
        if let Some(handle) = self.handle.take() {
            // Joining from inside the tick closure would deadlock.
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
