//! Demo services for CapyDispatch.
//!
//! Each service only talks to the dispatchers, never to threads directly.
//!
//! - `clock` - UI-thread ticker built on delayed UI posts
//! - `scanner` - background workload that reports back to the UI thread

pub mod clock;
pub mod scanner;

use crate::config::AppConfig;
use log::info;
use std::time::Duration;

/// Start all demo services.
/// Call this once from main after the UI thread has been bound.
pub fn start_all(config: &AppConfig) {
    info!("Starting services...");

    clock::start(
        config.clock_ticks,
        Duration::from_millis(config.clock_interval_ms),
    );
    scanner::start(
        config.scan_items,
        Duration::from_millis(config.scan_delay_ms),
    );
}
