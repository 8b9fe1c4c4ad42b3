use std::time::Duration;

/// A zero-argument unit of work, run exactly once.
pub type Work = Box<dyn FnOnce() + Send + 'static>;

/// Dispatches work with a thread-affinity guarantee.
///
/// Both operations are fire-and-forget: no handle is returned and a panic
/// inside `work` is left to whichever thread runs it.
pub trait Executor: Send + Sync {
    /// Run `work` now, or as soon as the target thread allows.
    fn execute(&self, work: Work);

    /// Run `work` no earlier than `delay` from now.
    fn execute_after(&self, work: Work, delay: Duration);
}
