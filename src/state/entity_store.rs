//! Canonical in-memory timer sequence mirrored to the persistence gateway

use std::{collections::HashSet, sync::Arc};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    error::StorageError,
    model::{Timer, TimerStatus},
    storage::{StorageGateway, TIMERS_KEY},
};

/// Ordered timer records for the current session.
///
/// Every mutation builds the next full sequence and goes through
/// [`TimerEntityStore::replace_all`], the only path that writes to storage.
/// The in-memory swap happens before the write, so a failed write leaves a
/// stale mirror but never loses the in-memory effect.
pub struct TimerEntityStore {
    timers: Vec<Timer>,
    gateway: Arc<dyn StorageGateway>,
}

impl TimerEntityStore {
    pub fn new(gateway: Arc<dyn StorageGateway>) -> Self {
        Self {
            timers: Vec::new(),
            gateway,
        }
    }

    /// Read the persisted collection. Absent, unreadable or malformed data
    /// yields an empty sequence.
    pub async fn load(&mut self) -> &[Timer] {
        self.timers = match self.gateway.get(TIMERS_KEY).await {
            Ok(Some(value)) => Self::decode(value),
            Ok(None) => {
                debug!("No persisted timers found");
                Vec::new()
            }
            Err(e) => {
                warn!("Failed to read persisted timers: {}", e);
                Vec::new()
            }
        };
        info!("Loaded {} timers", self.timers.len());
        &self.timers
    }

    /// Decode the stored array, keeping the first record for each id
    fn decode(value: Value) -> Vec<Timer> {
        let timers = match serde_json::from_value::<Vec<Timer>>(value) {
            Ok(timers) => timers,
            Err(e) => {
                warn!("Persisted timers are malformed, starting empty: {}", e);
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        timers
            .into_iter()
            .filter_map(|timer| {
                if seen.contains(&timer.id) {
                    warn!("Dropping persisted timer {} with a repeated id", timer.id);
                    return None;
                }
                let id = timer.id.clone();
                let normalized = timer.normalized();
                match &normalized {
                    Some(_) => {
                        seen.insert(id);
                    }
                    None => warn!("Dropping persisted timer {} with zero duration", id),
                }
                normalized
            })
            .collect()
    }

    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    pub fn get(&self, id: &str) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Swap the in-memory sequence and write it through to storage
    pub async fn replace_all(&mut self, timers: Vec<Timer>) -> Result<(), StorageError> {
        self.timers = timers;
        self.persist().await
    }

    /// Write the current sequence to storage without changing it
    pub async fn persist(&self) -> Result<(), StorageError> {
        let value = serde_json::to_value(&self.timers)?;
        self.gateway.set(TIMERS_KEY, value).await
    }

    /// Patch the entry matching `id` and write the result through.
    /// Returns `Ok(false)` without writing when no entry matches.
    pub async fn patch<F>(&mut self, id: &str, patcher: F) -> Result<bool, StorageError>
    where
        F: FnOnce(&mut Timer),
    {
        let mut next = self.timers.clone();
        match next.iter_mut().find(|t| t.id == id) {
            Some(timer) => patcher(timer),
            None => return Ok(false),
        }
        self.replace_all(next).await?;
        Ok(true)
    }

    pub async fn upsert_status_and_time(
        &mut self,
        id: &str,
        remaining_time: u64,
        status: TimerStatus,
    ) -> Result<bool, StorageError> {
        self.patch(id, |timer| {
            timer.remaining_time = remaining_time;
            timer.status = status;
        })
        .await
    }

    /// Append a new record
    pub async fn insert(&mut self, timer: Timer) -> Result<(), StorageError> {
        let mut next = self.timers.clone();
        next.push(timer);
        self.replace_all(next).await
    }

    /// Drop the record matching `id`. Returns `Ok(false)` when absent.
    pub async fn remove(&mut self, id: &str) -> Result<bool, StorageError> {
        if !self.contains(id) {
            return Ok(false);
        }
        let next = self.timers.iter().filter(|t| t.id != id).cloned().collect();
        self.replace_all(next).await?;
        Ok(true)
    }
}
