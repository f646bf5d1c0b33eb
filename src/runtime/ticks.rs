//! Per-timer repeating ticks with cancellation handles

use std::{collections::HashMap, time::Duration};

use tokio::{
    sync::mpsc,
    time::{interval_at, Instant},
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// One firing of a timer's tick, tagged with the registration it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub id: String,
    pub generation: u64,
}

#[derive(Debug)]
struct TickHandle {
    token: CancellationToken,
    generation: u64,
}

/// Maps timer ids to their running tick task.
///
/// At most one tick exists per id. Every termination path goes through
/// [`TickRegistry::teardown`] which cancels the task and forgets the id in
/// one step. A tick message that was already queued when its registration
/// was torn down is recognised as stale by [`TickRegistry::is_current`].
#[derive(Debug)]
pub struct TickRegistry {
    ticks: HashMap<String, TickHandle>,
    period: Duration,
    next_generation: u64,
    root: CancellationToken,
    tx: mpsc::Sender<Tick>,
}

impl TickRegistry {
    pub fn new(period: Duration, tx: mpsc::Sender<Tick>) -> Self {
        Self {
            ticks: HashMap::new(),
            period,
            next_generation: 0,
            root: CancellationToken::new(),
            tx,
        }
    }

    /// Register a tick for `id`. Returns `false` when one already exists.
    pub fn start(&mut self, id: &str) -> bool {
        if self.ticks.contains_key(id) {
            trace!("Tick for {} already registered", id);
            return false;
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        let token = self.root.child_token();
        let tick = Tick {
            id: id.to_string(),
            generation,
        };

        let first = Instant::now() + self.period;
        tokio::spawn(run_tick(tick, first, self.period, token.clone(), self.tx.clone()));
        self.ticks.insert(id.to_string(), TickHandle { token, generation });
        debug!("Tick registered for {} (generation {})", id, generation);
        true
    }

    /// Cancel and forget the tick for `id`. Returns `false` when none existed.
    pub fn teardown(&mut self, id: &str) -> bool {
        match self.ticks.remove(id) {
            Some(handle) => {
                handle.token.cancel();
                debug!("Tick torn down for {}", id);
                true
            }
            None => false,
        }
    }

    /// Cancel every tick, returning how many were active
    pub fn teardown_all(&mut self) -> usize {
        let count = self.ticks.len();
        for (_, handle) in self.ticks.drain() {
            handle.token.cancel();
        }
        if count > 0 {
            debug!("Tore down {} ticks", count);
        }
        count
    }

    /// Whether `tick` belongs to the live registration for its id
    pub fn is_current(&self, tick: &Tick) -> bool {
        self.ticks
            .get(&tick.id)
            .is_some_and(|handle| handle.generation == tick.generation)
    }

    pub fn is_ticking(&self, id: &str) -> bool {
        self.ticks.contains_key(id)
    }

    pub fn active_count(&self) -> usize {
        self.ticks.len()
    }

    pub fn active_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.ticks.keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Drop for TickRegistry {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

async fn run_tick(
    tick: Tick,
    first: Instant,
    period: Duration,
    token: CancellationToken,
    tx: mpsc::Sender<Tick>,
) {
    let mut interval = interval_at(first, period);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = interval.tick() => {
                if tx.send(tick.clone()).await.is_err() {
                    break;
                }
            }
        }
    }

    trace!("Tick task for {} exited", tick.id);
}
