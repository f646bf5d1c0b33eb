//! State management module
//!
//! The timer entity store owned by the runtime, and the shared state handed
//! to the HTTP handlers.

pub mod app_state;
pub mod entity_store;

// Re-export main types
pub use app_state::AppState;
pub use entity_store::TimerEntityStore;
