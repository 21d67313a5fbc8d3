use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::effects::SprayEffects;
use crate::training_params::ExtinguisherParams;

/// Remaining agent at or below this counts as empty.
pub const AGENT_EPSILON: f32 = 1e-4;

/// `Locked` until the pin is pulled; `Idle` and `Spraying` are both unlocked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtinguisherState {
    #[default]
    Locked,
    Idle,
    Spraying,
}

/// Why a trigger squeeze produced no spray.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerRejection {
    PinInPlace,
    Empty,
    /// The procedure has not reached the squeeze step yet.
    OutOfSequence,
}

impl fmt::Display for TriggerRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::PinInPlace => "safety pin still in place",
            Self::Empty => "extinguisher is empty",
            Self::OutOfSequence => "nozzle not aimed yet",
        };
        f.write_str(text)
    }
}

/// Safety pin, trigger and agent supply of the trainee's extinguisher.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtinguisherUnit {
    pub state: ExtinguisherState,
    pub remaining_agent: f32,
    pub capacity: f32,
    /// Agent used per second of spraying.
    pub consumption_rate: f32,
}

impl Default for ExtinguisherUnit {
    fn default() -> Self {
        Self::from_params(&ExtinguisherParams::default())
    }
}

impl ExtinguisherUnit {
    pub fn new(capacity: f32) -> Self {
        let capacity = capacity.max(0.0);
        Self {
            state: ExtinguisherState::Locked,
            remaining_agent: capacity,
            capacity,
            consumption_rate: 1.0,
        }
    }

    pub fn from_params(params: &ExtinguisherParams) -> Self {
        Self {
            consumption_rate: params.consumption_rate.max(0.0),
            ..Self::new(params.capacity)
        }
    }

    pub fn is_pin_removed(&self) -> bool {
        self.state != ExtinguisherState::Locked
    }

    pub fn is_trigger_pressed(&self) -> bool {
        self.state == ExtinguisherState::Spraying
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_agent <= AGENT_EPSILON
    }

    /// Whether squeezing the trigger now would spray.
    pub fn can_spray(&self) -> bool {
        self.is_pin_removed() && !self.is_empty()
    }

    /// Returns `true` if this call removed the pin.
    pub fn pull_pin(&mut self) -> bool {
        if self.state != ExtinguisherState::Locked {
            return false;
        }
        self.state = ExtinguisherState::Idle;
        true
    }

    /// Start spraying. Squeezing while already spraying is accepted as-is.
    pub fn press_trigger(&mut self) -> Result<(), TriggerRejection> {
        match self.state {
            ExtinguisherState::Locked => Err(TriggerRejection::PinInPlace),
            ExtinguisherState::Spraying => Ok(()),
            ExtinguisherState::Idle if self.is_empty() => Err(TriggerRejection::Empty),
            ExtinguisherState::Idle => {
                self.state = ExtinguisherState::Spraying;
                Ok(())
            }
        }
    }

    /// Returns `true` if spraying stopped.
    pub fn release_trigger(&mut self) -> bool {
        if self.state != ExtinguisherState::Spraying {
            return false;
        }
        self.state = ExtinguisherState::Idle;
        true
    }

    /// Consume agent for `dt` seconds of spraying. Returns `true` on the tick
    /// the unit runs dry, which also releases the trigger.
    pub fn tick(&mut self, dt: f64) -> bool {
        if self.state != ExtinguisherState::Spraying || dt <= 0.0 {
            return false;
        }
        self.remaining_agent = (self.remaining_agent - self.consumption_rate * dt as f32).max(0.0);
        if self.is_empty() {
            self.remaining_agent = 0.0;
            self.state = ExtinguisherState::Idle;
            return true;
        }
        false
    }

    pub fn refill(&mut self) {
        self.remaining_agent = self.capacity;
    }

    /// Refill and put the pin back.
    pub fn reset(&mut self) {
        self.refill();
        self.state = ExtinguisherState::Locked;
    }

    pub fn remaining_percentage(&self) -> f32 {
        if self.capacity <= 0.0 {
            return 0.0;
        }
        self.remaining_agent / self.capacity * 100.0
    }

    pub fn used_percentage(&self) -> f32 {
        if self.capacity <= 0.0 {
            return 0.0;
        }
        100.0 - self.remaining_percentage()
    }
}

/// Write-only handle telling the host whether to enable its agent collider.
/// Mirrors the trigger every tick.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentVolume {
    pub active: bool,
}

/// Sent on the tick the extinguisher runs dry.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ExtinguisherEmptied {
    pub at: f64,
}

/// Everything an extinguisher entity carries.
#[derive(Bundle, Default)]
pub struct ExtinguisherBundle {
    pub unit: ExtinguisherUnit,
    pub volume: AgentVolume,
    pub spray: SprayEffects,
}

impl ExtinguisherBundle {
    pub fn new(unit: ExtinguisherUnit) -> Self {
        Self {
            unit,
            ..Default::default()
        }
    }
}
