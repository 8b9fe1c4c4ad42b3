//! Error types for capy-looper

/// Looper errors
#[derive(Debug, thiserror::Error)]
pub enum LooperError {
    #[error("A main looper has already been prepared")]
    AlreadyPrepared,

    #[error("Looper '{0}' can only run on its own thread")]
    WrongThread(String),

    #[error("Looper '{0}' is already running")]
    AlreadyRunning(String),

    #[error("Looper '{0}' is quitting")]
    Quitting(String),

    #[error("Failed to spawn looper thread: {0}")]
    Spawn(#[from] std::io::Error),
}
