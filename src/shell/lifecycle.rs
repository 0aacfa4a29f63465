//! Generation Lifecycle
//!
//! Guarded state machine for a cache generation:
//! `Installing -> Installed -> Activating -> Active`, with `Redundant` for a
//! generation whose install failed or was superseded before activation.

use serde::Serialize;

use crate::error::{Result, ShellError};

// == Phase ==
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Installing,
    Installed,
    Activating,
    Active,
    Redundant,
}

impl Phase {
    /// True while an install or activation is running.
    pub fn in_flight(self) -> bool {
        matches!(self, Phase::Installing | Phase::Activating)
    }
}

// == Lifecycle ==
/// Tracks the generation requests currently see and the one being deployed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Lifecycle {
    /// Generation visible to intercepted requests
    active: Option<String>,
    /// Generation being installed or activated, with its phase
    incoming: Option<Incoming>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Incoming {
    pub generation: String,
    pub phase: Phase,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn incoming(&self) -> Option<&Incoming> {
        self.incoming.as_ref()
    }

    /// Phase of `generation`, whether incoming or active.
    pub fn phase_of(&self, generation: &str) -> Option<Phase> {
        match &self.incoming {
            Some(incoming) if incoming.generation == generation => Some(incoming.phase),
            _ if self.active() == Some(generation) => Some(Phase::Active),
            _ => None,
        }
    }

    // == Transitions ==
    /// Starts installing `generation`.
    ///
    /// Refused while another install or activation is in flight, and for the
    /// active generation itself: a redeploy needs a new tag. An installed but
    /// not yet activated generation is superseded.
    pub fn begin_install(&mut self, generation: &str) -> Result<()> {
        if self.active() == Some(generation) {
            return Err(ShellError::InvalidTransition {
                generation: generation.to_string(),
                from: Some(Phase::Active),
                to: Phase::Installing,
            });
        }
        if let Some(incoming) = &self.incoming {
            if incoming.phase.in_flight() {
                return Err(ShellError::InvalidTransition {
                    generation: generation.to_string(),
                    from: Some(incoming.phase),
                    to: Phase::Installing,
                });
            }
        }
        self.incoming = Some(Incoming {
            generation: generation.to_string(),
            phase: Phase::Installing,
        });
        Ok(())
    }

    pub fn finish_install(&mut self, generation: &str) -> Result<()> {
        self.advance(generation, Phase::Installing, Phase::Installed)
    }

    /// Marks a failed install redundant. The active generation is untouched.
    pub fn fail_install(&mut self, generation: &str) -> Result<()> {
        self.advance(generation, Phase::Installing, Phase::Redundant)
    }

    pub fn begin_activate(&mut self, generation: &str) -> Result<()> {
        self.advance(generation, Phase::Installed, Phase::Activating)
    }

    /// Promotes the activating generation to the one requests see.
    pub fn finish_activate(&mut self, generation: &str) -> Result<()> {
        self.advance(generation, Phase::Activating, Phase::Active)?;
        self.incoming = None;
        self.active = Some(generation.to_string());
        Ok(())
    }

    fn advance(&mut self, generation: &str, from: Phase, to: Phase) -> Result<()> {
        match self.incoming.as_mut() {
            Some(incoming) if incoming.generation == generation && incoming.phase == from => {
                incoming.phase = to;
                return Ok(());
            }
            _ => {}
        }
        Err(ShellError::InvalidTransition {
            generation: generation.to_string(),
            from: self.phase_of(generation),
            to,
        })
    }
}
