//! Time-ordered message queue owned by a looper thread.

use crate::message::Message;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

/// Min-heap of pending messages keyed by `(when, seq)`.
#[derive(Debug, Default)]
pub struct MessageQueue {
    heap: BinaryHeap<Reverse<Message>>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, message: Message) {
        self.heap.push(Reverse(message));
    }

    /// Trigger time of the earliest pending message.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.heap.peek().map(|Reverse(m)| m.when)
    }

    /// Pop the earliest message if it is due at `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<Message> {
        if self.heap.peek().is_some_and(|Reverse(m)| m.is_due(now)) {
            self.heap.pop().map(|Reverse(m)| m)
        } else {
            None
        }
    }

    /// Drop every pending message. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.heap.len();
        self.heap.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
