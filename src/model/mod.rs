//! Timer domain model
//!
//! The timer record as it is persisted, plus the read-side category projection.

pub mod filter;
pub mod timer;

pub use filter::CategoryFilter;
pub use timer::{NewTimer, Timer, TimerStatus};
