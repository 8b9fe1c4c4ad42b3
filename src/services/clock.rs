//! Clock service.
//!
//! Ticks on the UI thread. Each tick logs the wall-clock time and re-arms
//! itself with a delayed UI post until the configured tick count is reached.

use capy_exec::run_on_ui_after;
use log::info;
use std::time::Duration;

/// Current local time formatted for display.
pub fn format_now() -> String {
    chrono::Local::now().format("%H:%M:%S%.3f").to_string()
}

/// Start ticking. Safe to call from any thread; ticks always run on the UI thread.
pub fn start(ticks: u32, interval: Duration) {
    if ticks == 0 {
        return;
    }
    run_on_ui_after(move || tick(1, ticks, interval), interval);
}

fn tick(current: u32, total: u32, interval: Duration) {
    info!("Clock tick {}/{}: {}", current, total, format_now());

    if current < total {
        run_on_ui_after(move || tick(current + 1, total, interval), interval);
    }
}
