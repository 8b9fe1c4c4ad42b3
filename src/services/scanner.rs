//! Scanner service.
//!
//! Runs a synthetic workload off the UI thread, once right away and once
//! after a delay, and reports each result back on the UI thread.

use capy_exec::{run_in_background, run_in_background_after, run_on_ui};
use log::{debug, info};
use std::thread;
use std::time::{Duration, Instant};

/// Result of one scan, handed back to the UI thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanReport {
    pub label: &'static str,
    pub items: u64,
    pub checksum: u64,
    pub thread_name: String,
}

/// Sum of squares modulo a prime; deterministic so reports can be compared.
pub fn checksum(items: u64) -> u64 {
    const MODULUS: u64 = 1_000_000_007;
    (1..=items).fold(0, |acc, i| (acc + (i % MODULUS) * (i % MODULUS)) % MODULUS)
}

/// Run one scan on the current thread.
pub fn scan(label: &'static str, items: u64) -> ScanReport {
    let started = Instant::now();
    let checksum = checksum(items);
    let thread_name = thread::current()
        .name()
        .unwrap_or("unnamed")
        .to_string();

    debug!(
        "Scan '{}' finished in {:?} on '{}'",
        label,
        started.elapsed(),
        thread_name
    );

    ScanReport {
        label,
        items,
        checksum,
        thread_name,
    }
}

/// Start an immediate and a deferred scan. Each report is logged on the UI thread.
pub fn start(items: u64, delay: Duration) {
    run_in_background(move || report(scan("immediate", items)));
    run_in_background_after(move || report(scan("deferred", items)), delay);
}

fn report(result: ScanReport) {
    run_on_ui(move || {
        info!(
            "Scan '{}' over {} items: checksum={} (computed on '{}')",
            result.label, result.items, result.checksum, result.thread_name
        );
    });
}
