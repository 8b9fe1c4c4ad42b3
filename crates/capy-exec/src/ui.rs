//! On-UI-thread execution.
//!
//! `execute` runs in-line when already on the UI thread and posts otherwise.
//! `execute_after` always posts, even from the UI thread.

use crate::executor::{Executor, Work};
use capy_looper::Handler;
use log::warn;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// Runs work on the UI thread.
///
/// The first construction resolves the process-wide main looper; every
/// instance shares it.
#[derive(Clone, Debug)]
pub struct UiThreadExecutor {
    handler: Handler,
}

impl UiThreadExecutor {
    pub fn new() -> Self {
        Self {
            handler: capy_looper::main_handler(),
        }
    }

    /// True if the caller is on the UI thread this executor targets.
    #[inline]
    pub fn is_ui_thread(&self) -> bool {
        self.handler.looper().is_current_thread()
    }

    fn post(&self, work: Work, delay: Option<Duration>) {
        let result = match delay {
            Some(delay) => self.handler.post_delayed(work, delay),
            None => self.handler.post(work),
        };
        if let Err(e) = result {
            warn!("Dropping UI work: {}", e);
        }
    }
}

impl Default for UiThreadExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for UiThreadExecutor {
    fn execute(&self, work: Work) {
        if self.is_ui_thread() {
            work();
        } else {
            self.post(work, None);
        }
    }

    fn execute_after(&self, work: Work, delay: Duration) {
        self.post(work, Some(delay));
    }
}

static SHARED: OnceLock<Arc<UiThreadExecutor>> = OnceLock::new();

fn shared() -> Arc<UiThreadExecutor> {
    SHARED
        .get_or_init(|| Arc::new(UiThreadExecutor::new()))
        .clone()
}

/// Run `work` on the UI thread. In-line if already on it.
pub fn run_on_ui<F>(work: F)
where
    F: FnOnce() + Send + 'static,
{
    shared().execute(Box::new(work));
}

/// Post `work` to the UI thread to run once `delay` has elapsed.
/// Never runs in-line.
pub fn run_on_ui_after<F>(work: F, delay: Duration)
where
    F: FnOnce() + Send + 'static,
{
    shared().execute_after(Box::new(work), delay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{Sender, bounded, unbounded};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Instant;

    const WAIT: Duration = Duration::from_secs(5);

    /// Park the UI thread until the returned sender is used.
    fn block_ui() -> Sender<()> {
        let (release_tx, release_rx) = bounded::<()>(1);
        let (entered_tx, entered_rx) = bounded::<()>(1);
        capy_looper::main_handler()
            .post(move || {
                entered_tx.send(()).unwrap();
                let _ = release_rx.recv();
            })
            .unwrap();
        entered_rx.recv_timeout(WAIT).unwrap();
        release_tx
    }

    #[test]
    fn test_posts_from_other_thread_and_returns_first() {
        let ui = capy_looper::main_looper();
        let release = block_ui();
        let ran = Arc::new(AtomicBool::new(false));
        let (tx, rx) = bounded(1);

        let flag = Arc::clone(&ran);
        run_on_ui(move || {
            flag.store(true, Ordering::SeqCst);
            tx.send(thread::current().id()).unwrap();
        });

        assert!(!ran.load(Ordering::SeqCst));
        release.send(()).unwrap();
        assert_eq!(rx.recv_timeout(WAIT).unwrap(), ui.thread_id());
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_runs_inline_on_ui_thread() {
        let (tx, rx) = bounded(1);

        capy_looper::main_handler()
            .post(move || {
                let ran = Arc::new(AtomicBool::new(false));
                let flag = Arc::clone(&ran);
                run_on_ui(move || flag.store(true, Ordering::SeqCst));
                tx.send(ran.load(Ordering::SeqCst)).unwrap();
            })
            .unwrap();

        assert!(rx.recv_timeout(WAIT).unwrap());
    }

    #[test]
    fn test_preserves_submission_order() {
        let (tx, rx) = unbounded();

        for tag in ["a", "b", "c", "d"] {
            let tx = tx.clone();
            run_on_ui(move || tx.send(tag).unwrap());
        }

        let seen: Vec<&str> = (0..4).map(|_| rx.recv_timeout(WAIT).unwrap()).collect();
        assert_eq!(seen, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_delayed_never_runs_inline() {
        let (inline_tx, inline_rx) = bounded(1);
        let (done_tx, done_rx) = bounded(1);

        capy_looper::main_handler()
            .post(move || {
                let ran = Arc::new(AtomicBool::new(false));
                let flag = Arc::clone(&ran);
                run_on_ui_after(
                    move || {
                        flag.store(true, Ordering::SeqCst);
                        done_tx.send(capy_looper::is_main_thread()).unwrap();
                    },
                    Duration::ZERO,
                );
                inline_tx.send(ran.load(Ordering::SeqCst)).unwrap();
            })
            .unwrap();

        assert!(!inline_rx.recv_timeout(WAIT).unwrap());
        assert!(done_rx.recv_timeout(WAIT).unwrap());
    }

    #[test]
    fn test_delayed_waits_for_deadline() {
        let delay = Duration::from_millis(50);
        let (tx, rx) = bounded(1);
        let start = Instant::now();

        UiThreadExecutor::new().execute_after(
            Box::new(move || tx.send(start.elapsed()).unwrap()),
            delay,
        );

        assert!(rx.recv_timeout(WAIT).unwrap() >= delay);
    }

    #[test]
    fn test_max_delay_is_queued_without_running() {
        let (tx, rx) = bounded(1);

        run_on_ui_after(move || tx.send(()).unwrap(), Duration::MAX);

        assert!(rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn test_instances_share_ui_thread() {
        let a = UiThreadExecutor::new();
        let b = UiThreadExecutor::default();

        assert!(Arc::ptr_eq(a.handler.looper(), b.handler.looper()));
        assert!(!a.is_ui_thread());
    }
}
