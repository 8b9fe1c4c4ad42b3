//! Off-UI-thread execution.
//!
//! Work submitted from a non-UI thread runs in-line on the caller. Work
//! submitted from the UI thread gets a fresh `capy-bg` thread. The delayed
//! variant repeats the same check on the timer thread when it fires.

use crate::executor::{Executor, Work};
use crate::timer;
use log::error;
use std::thread;
use std::time::Duration;

const WORKER_THREAD_NAME: &str = "capy-bg";

/// Runs work on any thread except the UI thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct BackgroundThreadExecutor;

impl BackgroundThreadExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for BackgroundThreadExecutor {
    fn execute(&self, work: Work) {
        dispatch(work);
    }

    fn execute_after(&self, work: Work, delay: Duration) {
        timer::schedule(delay, work, dispatch);
    }
}

/// Run `work` off the UI thread. In-line if already off it.
pub fn run_in_background<F>(work: F)
where
    F: FnOnce() + Send + 'static,
{
    BackgroundThreadExecutor.execute(Box::new(work));
}

/// Run `work` off the UI thread once `delay` has elapsed.
pub fn run_in_background_after<F>(work: F, delay: Duration)
where
    F: FnOnce() + Send + 'static,
{
    BackgroundThreadExecutor.execute_after(Box::new(work), delay);
}

fn dispatch(work: Work) {
    if !capy_looper::is_main_thread() {
        work();
        return;
    }

    let spawned = thread::Builder::new()
        .name(WORKER_THREAD_NAME.to_string())
        .spawn(work);
    if let Err(e) = spawned {
        error!("Failed to spawn background worker thread: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_runs_inline_off_ui_thread() {
        let caller = thread::current().id();
        let (tx, rx) = bounded(1);

        run_in_background(move || tx.send(thread::current().id()).unwrap());

        // Already delivered before the call returned.
        assert_eq!(rx.try_recv().unwrap(), caller);
    }

    #[test]
    fn test_spawns_worker_from_ui_thread() {
        let ui = capy_looper::main_looper();
        let (release_tx, release_rx) = bounded::<()>(1);
        let (result_tx, result_rx) = bounded(1);
        let (returned_tx, returned_rx) = bounded(1);

        capy_looper::main_handler()
            .post(move || {
                run_in_background(move || {
                    // Hold the worker until the UI side has returned.
                    let _ = release_rx.recv();
                    result_tx
                        .send((thread::current().id(), capy_looper::is_main_thread()))
                        .unwrap();
                });
                returned_tx.send(()).unwrap();
            })
            .unwrap();

        // The UI-side call returns while the work is still blocked.
        returned_rx.recv_timeout(WAIT).unwrap();
        release_tx.send(()).unwrap();

        let (worker, on_ui) = result_rx.recv_timeout(WAIT).unwrap();
        assert_ne!(worker, ui.thread_id());
        assert!(!on_ui);
    }

    #[test]
    fn test_delayed_waits_and_runs_off_ui_thread() {
        let ui = capy_looper::main_looper();
        let delay = Duration::from_millis(60);
        let (tx, rx) = bounded(1);
        let start = Instant::now();

        capy_looper::main_handler()
            .post(move || {
                run_in_background_after(
                    move || {
                        tx.send((start.elapsed(), thread::current().id())).unwrap();
                    },
                    delay,
                );
            })
            .unwrap();

        let (elapsed, runner) = rx.recv_timeout(WAIT).unwrap();
        assert!(elapsed >= delay);
        assert_ne!(runner, ui.thread_id());
    }

    #[test]
    fn test_each_submission_runs_exactly_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = bounded(20);

        for i in 0..10 {
            let count = Arc::clone(&count);
            let tx = tx.clone();
            let work = move || {
                count.fetch_add(1, Ordering::SeqCst);
                tx.send(()).unwrap();
            };
            if i % 2 == 0 {
                run_in_background(work);
            } else {
                run_in_background_after(work, Duration::from_millis(5));
            }
        }

        for _ in 0..10 {
            rx.recv_timeout(WAIT).unwrap();
        }
        assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
        assert_eq!(count.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn test_usable_as_trait_object() {
        let executor: &dyn Executor = &BackgroundThreadExecutor::new();
        let (tx, rx) = bounded(1);

        executor.execute(Box::new(move || tx.send(()).unwrap()));

        assert!(rx.try_recv().is_ok());
    }
}
