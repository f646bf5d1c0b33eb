//! Countdown Keeper - A countdown timer daemon
//!
//! This is the main entry point for the countdown-keeper server.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use countdown_keeper::{
    api::create_router,
    config::Config,
    runtime::TimerService,
    state::AppState,
    storage::{FileGateway, MemoryGateway, StorageGateway},
    tasks::notification_task,
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("countdown_keeper={},tower_http=info", config.log_level()))
        .init();

    info!("Starting countdown-keeper v{}", env!("CARGO_PKG_VERSION"));

    let gateway: Arc<dyn StorageGateway> = if config.ephemeral {
        info!("Using in-memory storage, timers will not survive a restart");
        Arc::new(MemoryGateway::new())
    } else {
        let path = match &config.data_file {
            Some(path) => path.clone(),
            None => FileGateway::default_path()?,
        };
        let gateway = FileGateway::new(path);
        info!("Storing timers in {:?}", gateway.path());
        Arc::new(gateway)
    };

    let categories = config.categories();
    anyhow::ensure!(!categories.is_empty(), "at least one category is required");
    info!("Configuration: host={}, port={}, categories={:?}, tick={}ms",
          config.host, config.port, categories, config.tick_millis);

    // Load persisted timers and start the runtime
    let (timers, runtime_handle) = TimerService::spawn(gateway, config.runtime()).await;

    let notifier = tokio::spawn(notification_task(timers.subscribe()));

    let state = Arc::new(AppState::new(
        timers.clone(),
        categories,
        config.port,
        config.host.clone(),
    ));
    let app = create_router(state);

    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  GET    /timers[?category=]     - List timers");
    info!("  POST   /timers                 - Create a timer");
    info!("  GET    /timers/:id             - Get a timer");
    info!("  DELETE /timers/:id             - Delete a timer");
    info!("  POST   /timers/:id/toggle      - Start or pause a timer");
    info!("  POST   /timers/:id/restart     - Reset a timer to its full duration");
    info!("  PUT    /timers/:id/half-alert  - Enable or disable the halfway alert");
    info!("  POST   /timers/start-all       - Start every paused timer");
    info!("  POST   /timers/pause-all       - Pause every running timer");
    info!("  GET    /history[?category=]    - Completed timers");
    info!("  GET    /status                 - Counts and active ticks");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    if let Err(e) = timers.shutdown().await {
        tracing::warn!("Timer service already stopped: {}", e);
    }
    if let Err(e) = runtime_handle.await {
        tracing::error!("Timer runtime task failed: {}", e);
    }
    drop(timers);
    notifier.abort();

    info!("Server shutdown complete");
    Ok(())
}
