//! Queued unit of work.

use std::cmp::Ordering;
use std::fmt;
use std::time::Instant;

/// A zero-argument callable run exactly once on a looper thread.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A task plus the time it becomes due.
///
/// Ordering is by trigger time, then by post order (`seq`), so two messages
/// due at the same instant run in the order they were posted.
pub struct Message {
    pub when: Instant,
    pub seq: u64,
    pub task: Task,
}

impl Message {
    pub fn new(when: Instant, seq: u64, task: Task) -> Self {
        Self { when, seq, task }
    }

    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        self.when <= now
    }

    /// Consume the message and run its task on the current thread.
    pub fn dispatch(self) {
        (self.task)();
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("when", &self.when)
            .field("seq", &self.seq)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.when == other.when && self.seq == other.seq
    }
}

impl Eq for Message {}

impl PartialOrd for Message {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Message {
    fn cmp(&self, other: &Self) -> Ordering {
        self.when
            .cmp(&other.when)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}
