//! Background tasks module
//!
//! This module contains background tasks that run alongside the HTTP server.

pub mod notifier;

// Re-export main functions
pub use notifier::notification_task;
