//! Surfaces completion and half-way notifications to the user

use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::runtime::TimerEvent;

/// Background task that reports every timer notification until the
/// runtime goes away. Returns the number of notifications delivered.
pub async fn notification_task(mut events: broadcast::Receiver<TimerEvent>) -> usize {
    info!("Starting notification task");
    let mut delivered = 0;

    loop {
        match events.recv().await {
            Ok(event) => {
                match &event {
                    TimerEvent::Completed { .. } => {
                        info!("Timer {} completed: {}", event.timer_id(), event.message())
                    }
                    TimerEvent::HalfwayAlert { .. } => {
                        info!("Halfway alert for {}: {}", event.timer_id(), event.message())
                    }
                }
                delivered += 1;
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Notification task lagged, {} notifications dropped", skipped);
            }
            Err(RecvError::Closed) => break,
        }
    }

    info!("Notification task stopped");
    delivered
}
