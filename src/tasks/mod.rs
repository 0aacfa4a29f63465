//! Background Tasks Module
//!
//! Contains tasks spawned alongside the HTTP server.
//!
//! # Tasks
//! - Install: runs install then activate for the compiled-in deployment
//! - Sequencer: ticks the step sequencer while it is toggled on

mod install;
mod sequencer;

pub use install::spawn_install_task;
pub use sequencer::{drum_for_step, spawn_sequencer_task, Beat, Drum, Sequencer, STEPS_PER_BAR};
