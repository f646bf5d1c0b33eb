//! Shared state for the HTTP handlers

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::{error::TimerError, runtime::TimerService};

/// State shared by every handler: the timer service handle plus the
/// read-only configuration the API layer consumes
#[derive(Debug)]
pub struct AppState {
    pub timers: TimerService,
    /// Categories a new timer may be filed under
    pub categories: Vec<String>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    pub fn new(timers: TimerService, categories: Vec<String>, port: u16, host: String) -> Self {
        Self {
            timers,
            categories,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Reject categories outside the configured list
    pub fn check_category(&self, category: &str) -> Result<(), TimerError> {
        let category = category.trim();
        if self.categories.iter().any(|c| c == category) {
            Ok(())
        } else {
            Err(TimerError::Validation(format!(
                "Unknown category '{}', expected one of: {}",
                category,
                self.categories.join(", ")
            )))
        }
    }

    /// Remember the last mutating action for the status endpoint
    pub fn record_action(&self, action: &str) {
        match self.last_action.lock() {
            Ok(mut last_action) => *last_action = Some(action.to_string()),
            Err(e) => warn!("Failed to lock last action: {}", e),
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }
}
