//! capy-looper: Single-thread event loop for UI work
//!
//! Features:
//! - One looper per thread, FIFO for work posted at the same time
//! - Delayed and absolute-time posts
//! - Process-wide main (UI) looper, created on first use
//!
//! The main looper is either bound explicitly with [`prepare_main_looper`]
//! on the thread that will run it, or spawned on a dedicated `capy-ui`
//! thread the first time [`main_looper`] is called.

pub mod error;
pub mod handler;
pub mod looper;
pub mod message;
pub mod message_queue;

pub use error::LooperError;
pub use handler::Handler;
pub use looper::Looper;
pub use message::{Message, Task};
pub use message_queue::MessageQueue;

use log::info;
use std::sync::{Arc, OnceLock};

/// Thread name used when the main looper is spawned on demand.
pub const UI_THREAD_NAME: &str = "capy-ui";

static MAIN_LOOPER: OnceLock<Arc<Looper>> = OnceLock::new();

/// Bind the calling thread as the UI thread.
/// The caller must then call [`Looper::run`] on the returned looper from this thread.
pub fn prepare_main_looper() -> Result<Arc<Looper>, LooperError> {
    let candidate = Looper::prepare();
    let mut installed = false;

    let main = MAIN_LOOPER.get_or_init(|| {
        installed = true;
        Arc::clone(&candidate)
    });

    if installed {
        info!("Main looper bound to thread '{}'", main.name());
        Ok(Arc::clone(main))
    } else {
        Err(LooperError::AlreadyPrepared)
    }
}

/// Get the main looper, spawning a dedicated UI thread if none was prepared.
///
/// Panics if the UI thread cannot be spawned.
pub fn main_looper() -> Arc<Looper> {
    MAIN_LOOPER
        .get_or_init(|| {
            info!("No UI thread prepared, spawning '{}'", UI_THREAD_NAME);
            Looper::spawn(UI_THREAD_NAME).expect("Failed to spawn UI looper thread")
        })
        .clone()
}

/// Get a handler bound to the main looper.
pub fn main_handler() -> Handler {
    main_looper().handler()
}

/// True if a main looper exists and the calling thread owns it.
/// Never creates the main looper.
#[inline]
pub fn is_main_thread() -> bool {
    MAIN_LOOPER
        .get()
        .is_some_and(|looper| looper.is_current_thread())
}
