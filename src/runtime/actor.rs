//! Single owner of the timer sequence and the tick registry
//!
//! User commands and tick messages are processed one at a time, so every
//! read-modify-write of the sequence is serialized and no tick can race a
//! user operation.

use std::{collections::HashSet, ops::ControlFlow, sync::Arc};

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, error, info, trace, warn};

use super::{
    events::TimerEvent,
    service::{Command, RuntimeConfig, RuntimeSnapshot},
    ticks::{Tick, TickRegistry},
};
use crate::{
    error::{StorageError, TimerError},
    model::{NewTimer, Timer, TimerStatus},
    state::TimerEntityStore,
    storage::StorageGateway,
};

pub struct TimerActor {
    pub(super) store: TimerEntityStore,
    pub(super) ticks: TickRegistry,
    tick_rx: mpsc::Receiver<Tick>,
    commands: mpsc::Receiver<Command>,
    events: broadcast::Sender<TimerEvent>,
    /// Timers whose half-way alert already fired in the current run
    half_alerts_fired: HashSet<String>,
}

impl TimerActor {
    pub fn new(
        gateway: Arc<dyn StorageGateway>,
        config: &RuntimeConfig,
        commands: mpsc::Receiver<Command>,
        events: broadcast::Sender<TimerEvent>,
    ) -> Self {
        let (tick_tx, tick_rx) = mpsc::channel(config.command_buffer);
        Self {
            store: TimerEntityStore::new(gateway),
            ticks: TickRegistry::new(config.tick_period, tick_tx),
            tick_rx,
            commands,
            events,
            half_alerts_fired: HashSet::new(),
        }
    }

    /// Load persisted timers and register ticks for the running ones
    pub async fn load(&mut self) {
        let running: Vec<String> = self
            .store
            .load()
            .await
            .iter()
            .filter(|t| t.is_running())
            .map(|t| t.id.clone())
            .collect();

        for id in &running {
            self.ticks.start(id);
        }
        if !running.is_empty() {
            info!("Resumed {} running timers", running.len());
        }
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                biased;
                command = self.commands.recv() => match command {
                    Some(command) => {
                        if self.handle(command).await.is_break() {
                            return;
                        }
                    }
                    None => break,
                },
                Some(tick) = self.tick_rx.recv() => self.on_tick(tick).await,
            }
        }

        self.shutdown().await;
    }

    async fn handle(&mut self, command: Command) -> ControlFlow<()> {
        match command {
            Command::Create { new, reply } => {
                let _ = reply.send(self.create(new).await);
            }
            Command::Get { id, reply } => {
                let _ = reply.send(self.find(&id).cloned());
            }
            Command::List { filter, reply } => {
                let _ = reply.send(filter.apply(self.store.timers()).into_iter().cloned().collect());
            }
            Command::History { filter, reply } => {
                let _ = reply.send(filter.history(self.store.timers()).into_iter().cloned().collect());
            }
            Command::Start { id, reply } => {
                let _ = reply.send(self.start(&id).await);
            }
            Command::Pause { id, reply } => {
                let _ = reply.send(self.pause(&id).await);
            }
            Command::Toggle { id, reply } => {
                let _ = reply.send(self.toggle(&id).await);
            }
            Command::Restart { id, reply } => {
                let _ = reply.send(self.restart(&id).await);
            }
            Command::Delete { id, reply } => {
                let _ = reply.send(self.delete(&id).await);
            }
            Command::SetHalfAlert { id, enabled, reply } => {
                let _ = reply.send(self.set_half_alert(&id, enabled).await);
            }
            Command::StartAll { reply } => {
                let _ = reply.send(self.start_all().await);
            }
            Command::PauseAll { reply } => {
                let _ = reply.send(self.pause_all().await);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(RuntimeSnapshot {
                    timers: self.store.timers().to_vec(),
                    active_ticks: self.ticks.active_ids(),
                });
            }
            Command::Shutdown { reply } => {
                self.shutdown().await;
                let _ = reply.send(());
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    fn find(&self, id: &str) -> Result<&Timer, TimerError> {
        self.store
            .get(id)
            .ok_or_else(|| TimerError::NotFound(id.to_string()))
    }

    fn current(&self, id: &str) -> Result<Timer, TimerError> {
        self.find(id).cloned()
    }

    /// Log a failed write; the in-memory effect stands
    pub(super) fn log_write<T>(result: Result<T, StorageError>, context: &str) {
        if let Err(e) = result {
            error!("Failed to persist timers after {}: {}", context, e);
        }
    }

    async fn create(&mut self, new: NewTimer) -> Result<Timer, TimerError> {
        let timer = new.into_timer()?;
        info!("Creating timer {} ({}, {}s)", timer.name, timer.category, timer.duration);

        Self::log_write(self.store.insert(timer.clone()).await, "create");
        self.ticks.start(&timer.id);
        Ok(timer)
    }

    async fn start(&mut self, id: &str) -> Result<Timer, TimerError> {
        let timer = self.current(id)?;
        if timer.is_completed() || timer.remaining_time == 0 {
            return Err(TimerError::AlreadyCompleted(id.to_string()));
        }

        if !timer.is_running() {
            Self::log_write(
                self.store
                    .upsert_status_and_time(id, timer.remaining_time, TimerStatus::Running)
                    .await,
                "start",
            );
            info!("Started timer {}", timer.name);
        }
        self.ticks.start(id);
        self.current(id)
    }

    async fn pause(&mut self, id: &str) -> Result<Timer, TimerError> {
        let timer = self.current(id)?;
        self.ticks.teardown(id);

        if timer.is_running() {
            Self::log_write(
                self.store
                    .upsert_status_and_time(id, timer.remaining_time, TimerStatus::Paused)
                    .await,
                "pause",
            );
            info!("Paused timer {} at {}s", timer.name, timer.remaining_time);
        }
        self.current(id)
    }

    async fn toggle(&mut self, id: &str) -> Result<Timer, TimerError> {
        if self.find(id)?.is_running() {
            self.pause(id).await
        } else {
            self.start(id).await
        }
    }

    async fn restart(&mut self, id: &str) -> Result<Timer, TimerError> {
        let duration = self.find(id)?.duration;
        self.ticks.teardown(id);
        self.half_alerts_fired.remove(id);

        Self::log_write(
            self.store
                .upsert_status_and_time(id, duration, TimerStatus::Paused)
                .await,
            "restart",
        );
        debug!("Restarted timer {}", id);
        self.current(id)
    }

    async fn delete(&mut self, id: &str) -> Result<Timer, TimerError> {
        let timer = self.current(id)?;
        self.ticks.teardown(id);
        self.half_alerts_fired.remove(id);

        Self::log_write(self.store.remove(id).await, "delete");
        info!("Deleted timer {}", timer.name);
        Ok(timer)
    }

    async fn set_half_alert(&mut self, id: &str, enabled: bool) -> Result<Timer, TimerError> {
        self.find(id)?;
        Self::log_write(
            self.store.patch(id, |t| t.half_alert = enabled).await,
            "half-alert change",
        );
        self.current(id)
    }

    async fn on_tick(&mut self, tick: Tick) {
        if !self.ticks.is_current(&tick) {
            trace!("Ignoring stale tick for {}", tick.id);
            return;
        }

        let Some(timer) = self.store.get(&tick.id).cloned() else {
            warn!("Tick for unknown timer {}, tearing it down", tick.id);
            self.ticks.teardown(&tick.id);
            return;
        };

        if !timer.is_running() {
            warn!("Tick for {} timer {}, tearing it down", timer.status, timer.id);
            self.ticks.teardown(&timer.id);
            return;
        }

        if timer.remaining_time == 0 {
            self.complete(&timer).await;
            return;
        }

        let remaining = timer.remaining_time - 1;
        Self::log_write(
            self.store
                .upsert_status_and_time(&timer.id, remaining, TimerStatus::Running)
                .await,
            "tick",
        );

        if timer.half_alert
            && remaining == timer.half_threshold()
            && self.half_alerts_fired.insert(timer.id.clone())
        {
            info!("Timer {} is halfway through", timer.name);
            self.publish(TimerEvent::halfway(&timer.id, &timer.name, remaining));
        }

        if remaining == 0 {
            self.complete(&timer).await;
        }
    }

    async fn complete(&mut self, timer: &Timer) {
        self.ticks.teardown(&timer.id);
        Self::log_write(
            self.store
                .upsert_status_and_time(&timer.id, 0, TimerStatus::Completed)
                .await,
            "completion",
        );
        info!("Timer {} completed", timer.name);
        self.publish(TimerEvent::completed(&timer.id, &timer.name));
    }

    pub(super) fn publish(&self, event: TimerEvent) {
        if let Err(e) = self.events.send(event) {
            debug!("No notification listeners: {}", e);
        }
    }

    async fn shutdown(&mut self) {
        let stopped = self.ticks.teardown_all();
        if let Err(e) = self.store.persist().await {
            error!("Failed to flush timers on shutdown: {}", e);
        }
        info!("Timer service stopped ({} ticks torn down)", stopped);
    }
}
