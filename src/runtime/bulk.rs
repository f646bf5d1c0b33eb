//! Start-all / pause-all over the whole sequence

use tracing::info;

use super::actor::TimerActor;
use crate::model::{Timer, TimerStatus};

impl TimerActor {
    /// Stop every tick, then mark every running timer paused and persist
    /// the sequence once. Remaining times stay where they were.
    pub(super) async fn pause_all(&mut self) -> Vec<Timer> {
        let stopped = self.ticks.teardown_all();

        let next: Vec<Timer> = self
            .store
            .timers()
            .iter()
            .cloned()
            .map(|mut timer| {
                if timer.status == TimerStatus::Running {
                    timer.status = TimerStatus::Paused;
                }
                timer
            })
            .collect();

        Self::log_write(self.store.replace_all(next).await, "pause all");
        info!("Paused all timers ({} ticks stopped)", stopped);
        self.store.timers().to_vec()
    }

    /// Mark every paused timer with time left as running, persist the
    /// sequence once, then register a tick for each running timer.
    /// Completed timers are left alone.
    pub(super) async fn start_all(&mut self) -> Vec<Timer> {
        let mut resumed = 0;
        let next: Vec<Timer> = self
            .store
            .timers()
            .iter()
            .cloned()
            .map(|mut timer| {
                if timer.status == TimerStatus::Paused && timer.remaining_time > 0 {
                    timer.status = TimerStatus::Running;
                    resumed += 1;
                }
                timer
            })
            .collect();

        Self::log_write(self.store.replace_all(next).await, "start all");

        let running: Vec<String> = self
            .store
            .timers()
            .iter()
            .filter(|t| t.is_running())
            .map(|t| t.id.clone())
            .collect();
        for id in &running {
            self.ticks.start(id);
        }

        info!("Started all timers ({} resumed)", resumed);
        self.store.timers().to_vec()
    }
}
