//! CapyDispatch - Thread-affinity dispatch demo
//!
//! The main thread becomes the UI thread and runs the event loop. Services
//! move work between it and background threads through `capy-exec`.

mod config;
mod services;

use capy_exec::run_on_ui_after;
use config::AppConfig;
use log::{info, warn};
use std::error::Error;
use std::time::Duration;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Starting CapyDispatch...");

    let config_path = config::get_config_path();
    let config = AppConfig::load(&config_path);
    if !config_path.exists() {
        if let Err(e) = config.save(&config_path) {
            warn!("Failed to write default config: {}", e);
        }
    }
    info!("Config: {:?}", config);

    // Bind before anything touches the dispatchers, otherwise a UI thread
    // would be spawned on demand instead of using this one.
    let ui_looper = capy_looper::prepare_main_looper()?;

    services::start_all(&config);

    let shutdown_looper = ui_looper.clone();
    run_on_ui_after(
        move || {
            info!("Shutdown timer elapsed, stopping UI loop");
            shutdown_looper.quit_safely();
        },
        Duration::from_millis(config.shutdown_after_ms),
    );

    info!("CapyDispatch running on '{}'", ui_looper.name());
    ui_looper.run()?;

    info!("CapyDispatch stopped.");
    Ok(())
}
