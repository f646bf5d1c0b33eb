//! Signal handling for graceful shutdown

use signal_hook::consts::{SIGINT, SIGQUIT, SIGTERM};
use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::{error, info};

/// Wait for a shutdown signal (SIGTERM, SIGINT, SIGQUIT) and return it.
///
/// If the handler cannot be installed the error is logged and this future
/// never resolves, leaving the server running until it is killed.
pub async fn shutdown_signal() -> i32 {
    let mut signals = match Signals::new([SIGTERM, SIGINT, SIGQUIT]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to install signal handler: {}", e);
            return std::future::pending().await;
        }
    };

    match signals.next().await {
        Some(signal) => {
            info!("Received signal: {}", signal);
            signal
        }
        None => std::future::pending().await,
    }
}
