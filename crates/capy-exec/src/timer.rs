//! Process-wide timer for delayed background work.
//!
//! Built on first use: a small tokio runtime whose only job is sleeping.
//! When a timer fires, the work is handed to the runtime's blocking pool so
//! a long job never holds up other timers.

use log::{debug, error};
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

use crate::executor::Work;

const TIMER_THREAD_NAME: &str = "capy-timer";

// None if the runtime could not be built; timers then fall back to sleeping threads.
static TIMER_RUNTIME: OnceLock<Option<Runtime>> = OnceLock::new();

fn get_runtime() -> Option<&'static Runtime> {
    TIMER_RUNTIME
        .get_or_init(|| {
            match Builder::new_multi_thread()
                .worker_threads(1)
                .thread_name(TIMER_THREAD_NAME)
                .enable_time()
                .build()
            {
                Ok(rt) => {
                    debug!("Timer runtime started");
                    Some(rt)
                }
                Err(e) => {
                    error!("Failed to create timer runtime: {}", e);
                    None
                }
            }
        })
        .as_ref()
}

/// Call `fire(work)` on a non-UI timer thread once `delay` has elapsed.
pub(crate) fn schedule(delay: Duration, work: Work, fire: fn(Work)) {
    match get_runtime() {
        Some(rt) => {
            rt.spawn(async move {
                tokio::time::sleep(delay).await;
                // Dropping the JoinHandle detaches the job.
                let _ = tokio::task::spawn_blocking(move || fire(work));
            });
        }
        None => {
            let spawned = thread::Builder::new()
                .name(TIMER_THREAD_NAME.to_string())
                .spawn(move || {
                    thread::sleep(delay);
                    fire(work);
                });
            if let Err(e) = spawned {
                error!("Failed to spawn fallback timer thread: {}", e);
            }
        }
    }
}
