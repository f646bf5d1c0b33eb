//! API response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::TimerError,
    model::{Timer, TimerStatus},
};

/// A timer together with its derived display fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    #[serde(flatten)]
    pub timer: Timer,
    pub progress: f64,
    pub time_left: String,
}

impl From<Timer> for TimerView {
    fn from(timer: Timer) -> Self {
        Self {
            progress: timer.progress(),
            time_left: timer.time_left(),
            timer,
        }
    }
}

pub fn views(timers: Vec<Timer>) -> Vec<TimerView> {
    timers.into_iter().map(TimerView::from).collect()
}

/// Response for operations on a single timer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl TimerResponse {
    pub fn new(message: impl Into<String>, timer: Timer) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            timer: timer.into(),
        }
    }
}

/// Response carrying a list of timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerListResponse {
    pub category: String,
    pub count: usize,
    pub timers: Vec<TimerView>,
}

impl TimerListResponse {
    pub fn new(category: impl Into<String>, timers: Vec<Timer>) -> Self {
        let timers = views(timers);
        Self {
            category: category.into(),
            count: timers.len(),
            timers,
        }
    }
}

/// Per-status counts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub running: usize,
    pub paused: usize,
    pub completed: usize,
}

impl StatusCounts {
    pub fn tally(timers: &[Timer]) -> Self {
        timers.iter().fold(Self::default(), |mut counts, timer| {
            match timer.status {
                TimerStatus::Running => counts.running += 1,
                TimerStatus::Paused => counts.paused += 1,
                TimerStatus::Completed => counts.completed += 1,
            }
            counts
        })
    }
}

/// Service status with tick information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub total: usize,
    pub counts: StatusCounts,
    pub active_ticks: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error body returned for failed operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Timer errors rendered as HTTP responses
#[derive(Debug)]
pub struct ApiError(pub TimerError);

impl From<TimerError> for ApiError {
    fn from(error: TimerError) -> Self {
        Self(error)
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            TimerError::Validation(_) => StatusCode::BAD_REQUEST,
            TimerError::NotFound(_) => StatusCode::NOT_FOUND,
            TimerError::AlreadyCompleted(_) => StatusCode::CONFLICT,
            TimerError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.0.to_string(),
            timestamp: Utc::now(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
