//! Timer runtime
//!
//! One actor task owns the timer sequence and drives a one-second tick per
//! running timer. The bulk controller lives on the same actor.

pub mod actor;
pub mod bulk;
pub mod events;
pub mod service;
pub mod ticks;

pub use events::TimerEvent;
pub use service::{RuntimeConfig, RuntimeSnapshot, TimerService};
