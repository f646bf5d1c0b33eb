//! Persistence gateway
//!
//! A key-value capability storing arbitrary JSON values under string keys.
//! There are no transactions and no atomicity across keys.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::StorageError;

pub use file::FileGateway;
pub use memory::MemoryGateway;

/// Key under which the whole timer collection is stored
pub const TIMERS_KEY: &str = "timers";

/// Asynchronous get/set of a named record
#[async_trait]
pub trait StorageGateway: Send + Sync {
    /// Read the value stored under `key`, `None` if absent
    async fn get(&self, key: &str) -> Result<Option<Value>, StorageError>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: Value) -> Result<(), StorageError>;
}
