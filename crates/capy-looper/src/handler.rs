//! Posting handle for a looper.

use crate::error::LooperError;
use crate::looper::Looper;
use std::sync::Arc;
use std::time::{Duration, Instant};

// Stand-in deadline for delays too large to add to `Instant::now()`.
const FAR_FUTURE: Duration = Duration::from_secs(u32::MAX as u64);

/// Cheap, clonable handle that posts work onto one looper's queue.
/// Can be used from any thread.
#[derive(Clone, Debug)]
pub struct Handler {
    looper: Arc<Looper>,
}

impl Handler {
    pub fn new(looper: Arc<Looper>) -> Self {
        Self { looper }
    }

    pub fn looper(&self) -> &Arc<Looper> {
        &self.looper
    }

    /// Queue `task` to run as soon as the looper reaches it.
    ///
    /// `Ok` means the looper accepted the task. A `quit` racing with this
    /// call can still drop it; such drops are logged at `warn` by the looper.
    pub fn post<F>(&self, task: F) -> Result<(), LooperError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.looper.enqueue(Box::new(task), Instant::now())
    }

    /// Queue `task` to run no earlier than `delay` from now.
    pub fn post_delayed<F>(&self, task: F, delay: Duration) -> Result<(), LooperError>
    where
        F: FnOnce() + Send + 'static,
    {
        let now = Instant::now();
        let when = now
            .checked_add(delay)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        self.post_at(task, when)
    }

    /// Queue `task` to run no earlier than `when`.
    pub fn post_at<F>(&self, task: F, when: Instant) -> Result<(), LooperError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.looper.enqueue(Box::new(task), when)
    }
}
