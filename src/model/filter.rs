//! Category projection over the timer sequence

use super::timer::Timer;

/// Label that selects every category
pub const ALL_CATEGORIES: &str = "All";

/// Read-side filter by category label
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Category(String),
}

impl CategoryFilter {
    /// Build a filter from an optional query label; `"All"` and a missing
    /// label both select everything.
    pub fn from_label(label: Option<&str>) -> Self {
        match label.map(str::trim) {
            None | Some("") | Some(ALL_CATEGORIES) => CategoryFilter::All,
            Some(category) => CategoryFilter::Category(category.to_string()),
        }
    }

    pub fn matches(&self, timer: &Timer) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(category) => timer.category == *category,
        }
    }

    /// Timers matching the filter, in store order
    pub fn apply<'a>(&self, timers: &'a [Timer]) -> Vec<&'a Timer> {
        timers.iter().filter(|t| self.matches(t)).collect()
    }

    /// Completed timers matching the filter, in store order
    pub fn history<'a>(&self, timers: &'a [Timer]) -> Vec<&'a Timer> {
        timers
            .iter()
            .filter(|t| t.is_completed() && self.matches(t))
            .collect()
    }
}
