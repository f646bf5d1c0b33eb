//! Handle used by the API (and tests) to talk to the timer actor

use std::{sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{
    sync::{broadcast, mpsc, oneshot},
    task::JoinHandle,
};
use tracing::info;

use super::{actor::TimerActor, events::TimerEvent};
use crate::{
    error::TimerError,
    model::{CategoryFilter, NewTimer, Timer},
    storage::StorageGateway,
};

type Reply<T> = oneshot::Sender<T>;

/// Messages processed one at a time by the actor
#[derive(Debug)]
pub enum Command {
    Create { new: NewTimer, reply: Reply<Result<Timer, TimerError>> },
    Get { id: String, reply: Reply<Result<Timer, TimerError>> },
    List { filter: CategoryFilter, reply: Reply<Vec<Timer>> },
    History { filter: CategoryFilter, reply: Reply<Vec<Timer>> },
    Start { id: String, reply: Reply<Result<Timer, TimerError>> },
    Pause { id: String, reply: Reply<Result<Timer, TimerError>> },
    Toggle { id: String, reply: Reply<Result<Timer, TimerError>> },
    Restart { id: String, reply: Reply<Result<Timer, TimerError>> },
    Delete { id: String, reply: Reply<Result<Timer, TimerError>> },
    SetHalfAlert { id: String, enabled: bool, reply: Reply<Result<Timer, TimerError>> },
    StartAll { reply: Reply<Vec<Timer>> },
    PauseAll { reply: Reply<Vec<Timer>> },
    Snapshot { reply: Reply<RuntimeSnapshot> },
    Shutdown { reply: Reply<()> },
}

/// Point-in-time view of the store and the live ticks
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeSnapshot {
    pub timers: Vec<Timer>,
    pub active_ticks: Vec<String>,
}

impl RuntimeSnapshot {
    pub fn timer(&self, id: &str) -> Option<&Timer> {
        self.timers.iter().find(|t| t.id == id)
    }

    pub fn is_ticking(&self, id: &str) -> bool {
        self.active_ticks.iter().any(|t| t == id)
    }
}

/// Runtime tuning
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub tick_period: Duration,
    pub command_buffer: usize,
    pub event_buffer: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_secs(1),
            command_buffer: 64,
            event_buffer: 64,
        }
    }
}

/// Cloneable handle to the timer actor
#[derive(Debug, Clone)]
pub struct TimerService {
    commands: mpsc::Sender<Command>,
    events: broadcast::Sender<TimerEvent>,
}

impl TimerService {
    /// Load the persisted timers, resume the running ones and spawn the actor
    pub async fn spawn(
        gateway: Arc<dyn StorageGateway>,
        config: RuntimeConfig,
    ) -> (Self, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer);
        let (event_tx, _) = broadcast::channel(config.event_buffer);

        let mut actor = TimerActor::new(gateway, &config, command_rx, event_tx.clone());
        actor.load().await;

        info!("Timer service started (tick period {:?})", config.tick_period);
        let handle = tokio::spawn(actor.run());

        (
            Self {
                commands: command_tx,
                events: event_tx,
            },
            handle,
        )
    }

    /// Receive completion and half-way notifications
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> Command) -> Result<T, TimerError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(make(tx))
            .await
            .map_err(|_| TimerError::ServiceUnavailable)?;
        rx.await.map_err(|_| TimerError::ServiceUnavailable)
    }

    pub async fn create(&self, new: NewTimer) -> Result<Timer, TimerError> {
        self.request(|reply| Command::Create { new, reply }).await?
    }

    pub async fn get(&self, id: &str) -> Result<Timer, TimerError> {
        let id = id.to_string();
        self.request(|reply| Command::Get { id, reply }).await?
    }

    pub async fn list(&self, filter: CategoryFilter) -> Result<Vec<Timer>, TimerError> {
        self.request(|reply| Command::List { filter, reply }).await
    }

    pub async fn history(&self, filter: CategoryFilter) -> Result<Vec<Timer>, TimerError> {
        self.request(|reply| Command::History { filter, reply }).await
    }

    pub async fn start(&self, id: &str) -> Result<Timer, TimerError> {
        let id = id.to_string();
        self.request(|reply| Command::Start { id, reply }).await?
    }

    pub async fn pause(&self, id: &str) -> Result<Timer, TimerError> {
        let id = id.to_string();
        self.request(|reply| Command::Pause { id, reply }).await?
    }

    pub async fn toggle(&self, id: &str) -> Result<Timer, TimerError> {
        let id = id.to_string();
        self.request(|reply| Command::Toggle { id, reply }).await?
    }

    pub async fn restart(&self, id: &str) -> Result<Timer, TimerError> {
        let id = id.to_string();
        self.request(|reply| Command::Restart { id, reply }).await?
    }

    pub async fn delete(&self, id: &str) -> Result<Timer, TimerError> {
        let id = id.to_string();
        self.request(|reply| Command::Delete { id, reply }).await?
    }

    pub async fn set_half_alert(&self, id: &str, enabled: bool) -> Result<Timer, TimerError> {
        let id = id.to_string();
        self.request(|reply| Command::SetHalfAlert { id, enabled, reply })
            .await?
    }

    pub async fn start_all(&self) -> Result<Vec<Timer>, TimerError> {
        self.request(|reply| Command::StartAll { reply }).await
    }

    pub async fn pause_all(&self) -> Result<Vec<Timer>, TimerError> {
        self.request(|reply| Command::PauseAll { reply }).await
    }

    pub async fn snapshot(&self) -> Result<RuntimeSnapshot, TimerError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Tear down every tick, flush the collection and stop the actor
    pub async fn shutdown(&self) -> Result<(), TimerError> {
        self.request(|reply| Command::Shutdown { reply }).await
    }
}
