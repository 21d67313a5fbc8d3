use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::drill_clock::reached;
use crate::effects::FireEffects;
use crate::training_params::FireParams;

/// Intensities within this distance of the extinguish threshold count as out.
pub const INTENSITY_EPSILON: f32 = 1e-4;

/// Stable identifier for a fire. Contacts, events and the evaluator all
/// address fires by id; the [`super::FireRegistry`] maps ids to entities.
#[derive(
    Component, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct FireId(pub u32);

impl fmt::Display for FireId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FireState {
    #[default]
    Burning,
    Extinguished,
}

/// State change reported by [`FireUnit::tick`] and the force operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireTransition {
    Extinguished,
    Reignited,
}

/// A single fire: intensity, agent contact and the reignite deadline.
///
/// Contact is boolean presence. Any number of overlapping agent volumes decay
/// the fire at `decay_rate`, the same as one.
#[derive(Component, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireUnit {
    /// 1.0 is a full fire, 0.0 is out.
    pub intensity: f32,
    pub state: FireState,
    pub contact_count: u32,
    pub extinguish_threshold: f32,
    /// Intensity lost per second of contact.
    pub decay_rate: f32,
    pub reignitable: bool,
    pub reignite_delay: f64,
    /// Drill time at which an extinguished fire comes back, if scheduled.
    pub reignite_at: Option<f64>,
}

impl Default for FireUnit {
    fn default() -> Self {
        Self::from_params(&FireParams::default())
    }
}

impl FireUnit {
    pub fn new(decay_rate: f32) -> Self {
        Self {
            intensity: 1.0,
            state: FireState::Burning,
            contact_count: 0,
            extinguish_threshold: 0.0,
            decay_rate: decay_rate.max(0.0),
            reignitable: false,
            reignite_delay: 0.0,
            reignite_at: None,
        }
    }

    pub fn from_params(params: &FireParams) -> Self {
        let unit = Self::new(params.decay_rate).with_threshold(params.extinguish_threshold);
        if params.reignitable {
            unit.with_reignite(params.reignite_delay)
        } else {
            unit
        }
    }

    pub fn with_reignite(mut self, delay: f64) -> Self {
        self.reignitable = true;
        self.reignite_delay = delay.max(0.0);
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.extinguish_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn in_contact(&self) -> bool {
        self.contact_count > 0
    }

    pub fn is_burning(&self) -> bool {
        self.state == FireState::Burning
    }

    pub fn is_extinguished(&self) -> bool {
        self.state == FireState::Extinguished
    }

    pub fn contact_begin(&mut self) {
        self.contact_count = self.contact_count.saturating_add(1);
    }

    /// Ending a contact that was never begun is ignored.
    pub fn contact_end(&mut self) {
        self.contact_count = self.contact_count.saturating_sub(1);
    }

    /// Drops every contact registration. Intensity is left untouched.
    pub fn release_contacts(&mut self) {
        self.contact_count = 0;
    }

    /// Advance the fire by `dt` seconds; `now` is drill time after the step.
    ///
    /// While burning and in contact, intensity decays. Reaching the threshold
    /// snaps intensity to 0 and reports `Extinguished` once. While out, a
    /// reignitable fire reports `Reignited` when `now` reaches its deadline.
    pub fn tick(&mut self, dt: f64, now: f64) -> Option<FireTransition> {
        match self.state {
            FireState::Burning => {
                if !self.in_contact() || dt <= 0.0 {
                    return None;
                }
                self.intensity = (self.intensity - self.decay_rate * dt as f32).clamp(0.0, 1.0);
                if self.intensity <= self.extinguish_threshold + INTENSITY_EPSILON {
                    self.extinguish(now);
                    Some(FireTransition::Extinguished)
                } else {
                    None
                }
            }
            FireState::Extinguished => match self.reignite_at {
                Some(deadline) if reached(now, deadline) => {
                    self.reignite();
                    Some(FireTransition::Reignited)
                }
                _ => None,
            },
        }
    }

    /// Put the fire out immediately. Returns `false` if it was already out.
    pub fn force_extinguish(&mut self, now: f64) -> bool {
        if self.is_extinguished() {
            return false;
        }
        self.extinguish(now);
        true
    }

    /// Relight an extinguished fire immediately. Returns `false` if burning.
    pub fn force_reignite(&mut self) -> bool {
        if self.is_burning() {
            return false;
        }
        self.reignite();
        true
    }

    /// Back to a fresh full fire for a new run.
    pub fn rekindle(&mut self) {
        self.reignite();
        self.contact_count = 0;
    }

    fn extinguish(&mut self, now: f64) {
        self.intensity = 0.0;
        self.state = FireState::Extinguished;
        self.reignite_at = self.reignitable.then(|| now + self.reignite_delay);
    }

    fn reignite(&mut self) {
        self.intensity = 1.0;
        self.state = FireState::Burning;
        self.reignite_at = None;
    }
}

/// Sent once per extinguish transition.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct FireExtinguished {
    pub fire: FireId,
    pub at: f64,
}

/// Sent once per reignite transition.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct FireReignited {
    pub fire: FireId,
    pub at: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FireAction {
    Extinguish,
    Reignite,
}

/// Host/debug request to force a fire's state.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct FireCommand {
    pub fire: FireId,
    pub action: FireAction,
}

/// Everything a fire entity carries.
#[derive(Bundle)]
pub struct FireBundle {
    pub id: FireId,
    pub unit: FireUnit,
    pub effects: FireEffects,
}

impl FireBundle {
    pub fn new(id: FireId, unit: FireUnit) -> Self {
        Self {
            id,
            unit,
            effects: FireEffects::default(),
        }
    }
}
