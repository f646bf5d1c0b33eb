//! Countdown Keeper - A countdown timer daemon
//!
//! Timers are organised by category, tick once per second while running,
//! can be paused and resumed individually or all at once, and are kept in a
//! key-value store so they survive restarts. Completed timers form the
//! history view.

pub mod api;
pub mod config;
pub mod error;
pub mod model;
pub mod runtime;
pub mod state;
pub mod storage;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{StorageError, TimerError};
pub use model::{CategoryFilter, NewTimer, Timer, TimerStatus};
pub use runtime::{RuntimeConfig, TimerEvent, TimerService};
pub use state::AppState;
pub use utils::signals::shutdown_signal;
