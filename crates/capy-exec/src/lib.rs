//! capy-exec: Thread-affinity dispatchers
//!
//! - [`BackgroundThreadExecutor`] - guarantees work runs off the UI thread
//! - [`UiThreadExecutor`] - guarantees work runs on the UI thread
//!
//! The UI thread is the main looper from `capy-looper`. Both dispatchers are
//! fire-and-forget: nothing is returned, nothing can be cancelled, and a
//! panic inside submitted work is not caught.

pub mod background;
pub mod executor;
mod timer;
pub mod ui;

pub use background::{BackgroundThreadExecutor, run_in_background, run_in_background_after};
pub use executor::{Executor, Work};
pub use ui::{UiThreadExecutor, run_on_ui, run_on_ui_after};
