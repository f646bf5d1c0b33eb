//! Timer record and creation input

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TimerError;

/// Lifecycle status of a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Paused,
    Running,
    Completed,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Paused => "paused",
            TimerStatus::Running => "running",
            TimerStatus::Completed => "completed",
        }
    }
}

impl std::fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A countdown timer as stored under the `"timers"` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    pub id: String,
    pub name: String,
    pub category: String,
    /// Total seconds, fixed at creation
    pub duration: u64,
    pub remaining_time: u64,
    pub status: TimerStatus,
    #[serde(default)]
    pub half_alert: bool,
}

impl Timer {
    /// Seconds remaining at which the half-way alert fires
    pub fn half_threshold(&self) -> u64 {
        self.duration / 2
    }

    /// Fraction of the duration already elapsed, in `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.duration == 0 {
            return 0.0;
        }
        (self.duration - self.remaining_time.min(self.duration)) as f64 / self.duration as f64
    }

    /// Remaining time formatted as `"{m}m {s}s"`
    pub fn time_left(&self) -> String {
        format!("{}m {}s", self.remaining_time / 60, self.remaining_time % 60)
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn is_completed(&self) -> bool {
        self.status == TimerStatus::Completed
    }

    /// Repair a record read back from storage so that the status and
    /// remaining-time invariants hold. Returns `None` for records that
    /// cannot be repaired.
    pub fn normalized(mut self) -> Option<Self> {
        if self.duration == 0 {
            return None;
        }
        self.remaining_time = self.remaining_time.min(self.duration);
        match self.status {
            TimerStatus::Completed => self.remaining_time = 0,
            TimerStatus::Running | TimerStatus::Paused if self.remaining_time == 0 => {
                self.status = TimerStatus::Completed;
            }
            _ => {}
        }
        Some(self)
    }
}

/// Input of the add-timer workflow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTimer {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub minutes: u64,
    #[serde(default)]
    pub seconds: u64,
}

impl NewTimer {
    pub fn new(name: impl Into<String>, category: impl Into<String>, seconds: u64) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            minutes: 0,
            seconds,
        }
    }

    /// Total duration in seconds
    pub fn duration(&self) -> u64 {
        self.minutes.saturating_mul(60).saturating_add(self.seconds)
    }

    /// Validate the input and build a running timer with a fresh id
    pub fn into_timer(self) -> Result<Timer, TimerError> {
        let name = self.name.trim();
        let category = self.category.trim();
        if name.is_empty() || category.is_empty() {
            return Err(TimerError::Validation(
                "Please enter a valid name and category".to_string(),
            ));
        }

        let duration = self.duration();
        if duration == 0 {
            return Err(TimerError::Validation(
                "Please enter a valid time duration".to_string(),
            ));
        }

        Ok(Timer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            category: category.to_string(),
            duration,
            remaining_time: duration,
            status: TimerStatus::Running,
            half_alert: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timer(duration: u64, remaining_time: u64, status: TimerStatus) -> Timer {
        Timer {
            id: "t".to_string(),
            name: "Tea".to_string(),
            category: "Break".to_string(),
            duration,
            remaining_time,
            status,
            half_alert: false,
        }
    }

    #[test]
    fn new_timer_starts_running_at_full_duration() {
        let t = NewTimer {
            name: " Tea ".to_string(),
            category: "Break".to_string(),
            minutes: 1,
            seconds: 30,
        }
        .into_timer()
        .unwrap();

        assert_eq!(t.name, "Tea");
        assert_eq!(t.duration, 90);
        assert_eq!(t.remaining_time, 90);
        assert_eq!(t.status, TimerStatus::Running);
        assert!(!t.half_alert);
        assert!(Uuid::parse_str(&t.id).is_ok());
    }

    #[test]
    fn new_timer_rejects_blank_fields_and_zero_duration() {
        assert!(matches!(
            NewTimer::new("  ", "Work", 10).into_timer(),
            Err(TimerError::Validation(_))
        ));
        assert!(matches!(
            NewTimer::new("Focus", "", 10).into_timer(),
            Err(TimerError::Validation(_))
        ));
        assert!(matches!(
            NewTimer::new("Focus", "Work", 0).into_timer(),
            Err(TimerError::Validation(_))
        ));
    }

    #[test]
    fn serializes_with_storage_field_names() {
        let json = serde_json::to_value(timer(10, 4, TimerStatus::Paused)).unwrap();
        assert_eq!(json["remainingTime"], 4);
        assert_eq!(json["halfAlert"], false);
        assert_eq!(json["status"], "paused");
    }

    #[test]
    fn normalization_restores_invariants() {
        let t = timer(10, 25, TimerStatus::Paused).normalized().unwrap();
        assert_eq!(t.remaining_time, 10);

        let t = timer(10, 3, TimerStatus::Completed).normalized().unwrap();
        assert_eq!(t.remaining_time, 0);

        let t = timer(10, 0, TimerStatus::Running).normalized().unwrap();
        assert_eq!(t.status, TimerStatus::Completed);

        assert!(timer(0, 0, TimerStatus::Paused).normalized().is_none());
    }

    #[test]
    fn progress_and_time_left() {
        let t = timer(120, 30, TimerStatus::Running);
        assert_eq!(t.progress(), 0.75);
        assert_eq!(t.time_left(), "0m 30s");
        assert_eq!(t.half_threshold(), 60);
    }
}
