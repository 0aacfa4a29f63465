//! Step Sequencer
//!
//! Fixed-tempo drum clock. Each tick advances a step counter and fires at
//! most one drum, chosen by the step's position in a four-step bar. Sound is
//! produced by subscribers; this module only emits beat events.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Steps in one bar
pub const STEPS_PER_BAR: u64 = 4;

const EVENT_CAPACITY: usize = 64;

// == Drum ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Drum {
    Kick,
    Snare,
    Hat,
}

/// Drum fired on `step`: kick on the downbeat, snare on 2, hat on 3.
pub fn drum_for_step(step: u64) -> Option<Drum> {
    match step % STEPS_PER_BAR {
        0 => Some(Drum::Kick),
        2 => Some(Drum::Snare),
        3 => Some(Drum::Hat),
        _ => None,
    }
}

// == Beat ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Beat {
    pub step: u64,
    pub drum: Drum,
}

// == Sequencer ==
/// Toggleable step counter that broadcasts a [`Beat`] for every sounding step.
#[derive(Debug)]
pub struct Sequencer {
    running: AtomicBool,
    step: AtomicU64,
    events: broadcast::Sender<Beat>,
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl Sequencer {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            running: AtomicBool::new(false),
            step: AtomicU64::new(0),
            events,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Next step to be played.
    pub fn step(&self) -> u64 {
        self.step.load(Ordering::SeqCst)
    }

    /// Flips the running flag and returns the new state.
    ///
    /// Starting always begins on the downbeat.
    pub fn toggle(&self) -> bool {
        let was_running = self.running.fetch_xor(true, Ordering::SeqCst);
        if !was_running {
            self.step.store(0, Ordering::SeqCst);
        }
        info!("Sequencer {}", if was_running { "stopped" } else { "started" });
        !was_running
    }

    /// Most recent beat played since the last start, if any.
    pub fn last_beat(&self) -> Option<Beat> {
        let next = self.step();
        (next.saturating_sub(STEPS_PER_BAR)..next)
            .rev()
            .find_map(|step| drum_for_step(step).map(|drum| Beat { step, drum }))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Beat> {
        self.events.subscribe()
    }

    /// Advances one step if running and returns the beat it produced.
    pub fn tick(&self) -> Option<Beat> {
        if !self.is_running() {
            return None;
        }
        let step = self.step.fetch_add(1, Ordering::SeqCst);
        let beat = drum_for_step(step).map(|drum| Beat { step, drum })?;
        // No subscribers is fine
        let _ = self.events.send(beat);
        Some(beat)
    }
}

/// Spawns the clock that ticks `sequencer` every `step`.
///
/// A stopped sequencer is still polled but does not advance. The handle is
/// aborted on shutdown.
pub fn spawn_sequencer_task(sequencer: Arc<Sequencer>, step: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting sequencer clock with {}ms steps", step.as_millis());
        let mut interval = tokio::time::interval(step);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if let Some(beat) = sequencer.tick() {
                debug!("Step {}: {:?}", beat.step, beat.drum);
            }
        }
    })
}
