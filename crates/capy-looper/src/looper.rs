//! Event loop bound to a single thread.
//!
//! Any thread may post into a looper through its inbox channel. Only the
//! owning thread drains the inbox into the time-ordered [`MessageQueue`]
//! and runs the tasks, so tasks never run concurrently with each other.

use crate::error::LooperError;
use crate::handler::Handler;
use crate::message::{Message, Task};
use crate::message_queue::MessageQueue;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, ThreadId};
use std::time::Instant;

const DEFAULT_NAME: &str = "looper";

enum Envelope {
    Post(Message),
    Quit { safely: bool },
}

pub struct Looper {
    name: String,
    thread_id: ThreadId,
    inbox_tx: Sender<Envelope>,
    inbox_rx: Receiver<Envelope>,
    next_seq: AtomicU64,
    quitting: AtomicBool,
    running: AtomicBool,
}

impl Looper {
    /// Create a looper bound to the calling thread.
    /// Nothing runs until [`Looper::run`] is called from this same thread.
    pub fn prepare() -> Arc<Looper> {
        let current = thread::current();
        let name = current.name().unwrap_or(DEFAULT_NAME).to_string();
        let (inbox_tx, inbox_rx) = crossbeam_channel::unbounded();

        Arc::new(Looper {
            name,
            thread_id: current.id(),
            inbox_tx,
            inbox_rx,
            next_seq: AtomicU64::new(0),
            quitting: AtomicBool::new(false),
            running: AtomicBool::new(false),
        })
    }

    /// Spawn a named thread that owns a new looper and runs it until quit.
    /// Returns once the looper exists, so posts made right away are not lost.
    pub fn spawn(name: &str) -> Result<Arc<Looper>, LooperError> {
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);

        thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let looper = Looper::prepare();
                if ready_tx.send(Arc::clone(&looper)).is_err() {
                    return;
                }
                if let Err(e) = looper.run() {
                    error!("Looper '{}' failed to run: {}", looper.name, e);
                }
            })?;

        ready_rx.recv().map_err(|_| {
            LooperError::Spawn(std::io::Error::other(
                "looper thread exited before it was ready",
            ))
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn thread_id(&self) -> ThreadId {
        self.thread_id
    }

    /// True when called from the thread this looper is bound to.
    #[inline]
    pub fn is_current_thread(&self) -> bool {
        thread::current().id() == self.thread_id
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting.load(Ordering::Acquire)
    }

    /// Get a posting handle for this looper.
    pub fn handler(self: &Arc<Self>) -> Handler {
        Handler::new(Arc::clone(self))
    }

    /// Run the loop on the owning thread until [`quit`](Self::quit) or
    /// [`quit_safely`](Self::quit_safely) is processed.
    ///
    /// A panic inside a task is not caught; it unwinds this thread. The
    /// looper is then marked as quitting so later posts are rejected.
    pub fn run(&self) -> Result<(), LooperError> {
        if !self.is_current_thread() {
            return Err(LooperError::WrongThread(self.name.clone()));
        }
        if self.is_quitting() {
            return Err(LooperError::Quitting(self.name.clone()));
        }
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(LooperError::AlreadyRunning(self.name.clone()));
        }

        let _guard = RunGuard { looper: self };
        info!("Looper '{}' running", self.name);

        let mut queue = MessageQueue::new();
        let safely = self.pump(&mut queue);
        self.finish(&mut queue, safely);

        info!("Looper '{}' stopped", self.name);
        Ok(())
    }

    /// Stop the loop and discard every pending message.
    pub fn quit(&self) {
        self.request_quit(false);
    }

    /// Stop the loop after running the messages already due; later ones are discarded.
    pub fn quit_safely(&self) {
        self.request_quit(true);
    }

    pub(crate) fn enqueue(&self, task: Task, when: Instant) -> Result<(), LooperError> {
        if self.is_quitting() {
            return Err(LooperError::Quitting(self.name.clone()));
        }
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.inbox_tx
            .send(Envelope::Post(Message::new(when, seq, task)))
            .map_err(|_| LooperError::Quitting(self.name.clone()))
    }

    fn request_quit(&self, safely: bool) {
        if self.quitting.swap(true, Ordering::AcqRel) {
            return;
        }
        debug!("Looper '{}' quit requested (safely={})", self.name, safely);
        // We hold the receiver, so this cannot fail.
        let _ = self.inbox_tx.send(Envelope::Quit { safely });
    }

    /// Main loop. Returns the quit mode once a quit request is received.
    fn pump(&self, queue: &mut MessageQueue) -> bool {
        loop {
            if let Some(safely) = self.drain_inbox(queue) {
                return safely;
            }

            if let Some(message) = queue.pop_due(Instant::now()) {
                message.dispatch();
                continue;
            }

            let received = match queue.next_deadline() {
                Some(deadline) => match self.inbox_rx.recv_deadline(deadline) {
                    Ok(envelope) => envelope,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => return false,
                },
                None => match self.inbox_rx.recv() {
                    Ok(envelope) => envelope,
                    Err(_) => return false,
                },
            };

            if let Some(safely) = Self::accept(queue, received) {
                return safely;
            }
        }
    }

    /// Move everything waiting in the inbox into the queue without blocking.
    fn drain_inbox(&self, queue: &mut MessageQueue) -> Option<bool> {
        while let Ok(envelope) = self.inbox_rx.try_recv() {
            if let Some(safely) = Self::accept(queue, envelope) {
                return Some(safely);
            }
        }
        None
    }

    fn accept(queue: &mut MessageQueue, envelope: Envelope) -> Option<bool> {
        match envelope {
            Envelope::Post(message) => {
                queue.enqueue(message);
                None
            }
            Envelope::Quit { safely } => Some(safely),
        }
    }

    fn finish(&self, queue: &mut MessageQueue, safely: bool) {
        if safely {
            let now = Instant::now();
            while let Some(message) = queue.pop_due(now) {
                message.dispatch();
            }
        }

        let dropped = queue.clear();
        if dropped > 0 {
            debug!(
                "Looper '{}' discarded {} pending message(s) on quit",
                self.name, dropped
            );
        }

        // Accepted by `enqueue` but sent after the quit request.
        let late = self.inbox_rx.try_iter().count();
        if late > 0 {
            warn!(
                "Looper '{}' dropped {} message(s) posted while quitting",
                self.name, late
            );
        }
    }
}

/// Clears `running` when the loop exits. On unwind it also marks the looper
/// as quitting, since nothing will drain its inbox any more.
struct RunGuard<'a> {
    looper: &'a Looper,
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.looper.running.store(false, Ordering::Release);
        if thread::panicking() {
            self.looper.quitting.store(true, Ordering::Release);
            error!("Looper '{}' died: a task panicked", self.looper.name);
        }
    }
}

impl std::fmt::Debug for Looper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Looper")
            .field("name", &self.name)
            .field("thread_id", &self.thread_id)
            .field("running", &self.is_running())
            .field("quitting", &self.is_quitting())
            .finish()
    }
}
