//! User-facing notifications raised by the runtime

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimerEvent {
    /// Countdown reached zero
    Completed {
        id: String,
        name: String,
        at: DateTime<Utc>,
    },
    /// Countdown reached half of the duration with the half-way alert enabled
    HalfwayAlert {
        id: String,
        name: String,
        remaining_time: u64,
        at: DateTime<Utc>,
    },
}

impl TimerEvent {
    pub fn completed(id: &str, name: &str) -> Self {
        TimerEvent::Completed {
            id: id.to_string(),
            name: name.to_string(),
            at: Utc::now(),
        }
    }

    pub fn halfway(id: &str, name: &str, remaining_time: u64) -> Self {
        TimerEvent::HalfwayAlert {
            id: id.to_string(),
            name: name.to_string(),
            remaining_time,
            at: Utc::now(),
        }
    }

    pub fn timer_id(&self) -> &str {
        match self {
            TimerEvent::Completed { id, .. } | TimerEvent::HalfwayAlert { id, .. } => id,
        }
    }

    /// Text shown to the user
    pub fn message(&self) -> String {
        match self {
            TimerEvent::Completed { name, .. } => format!("{} completed!", name),
            TimerEvent::HalfwayAlert { name, .. } => format!("You're halfway through {}!", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_carry_the_timer_id_and_user_text() {
        let done = TimerEvent::completed("a", "Tea");
        assert_eq!(done.timer_id(), "a");
        assert_eq!(done.message(), "Tea completed!");

        let half = TimerEvent::halfway("b", "Reading", 30);
        assert_eq!(half.timer_id(), "b");
        assert_eq!(half.message(), "You're halfway through Reading!");
    }

    #[test]
    fn events_serialize_with_a_kind_tag() {
        let json = serde_json::to_value(TimerEvent::halfway("b", "Reading", 30)).unwrap();
        assert_eq!(json["kind"], "halfway_alert");
        assert_eq!(json["remaining_time"], 30);
    }
}
