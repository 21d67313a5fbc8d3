//! Write-only effect handles for the host renderer and audio mixer.
//!
//! The core never reads these back. Hosts copy them onto their particle
//! systems, lights and audio sources each frame.

use bevy::prelude::*;

use crate::drill_clock::{reached, DrillClock};
use crate::extinguisher::ExtinguisherUnit;
use crate::fire_unit::FireUnit;
use crate::training_params::{FireParams, TrainingParams};

/// Per-fire flame, light, audio and steam outputs.
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct FireEffects {
    pub flames_playing: bool,
    /// Flame particles per second.
    pub emission_rate: f32,
    pub light_intensity: f32,
    pub audio_volume: f32,
    pub steam_playing: bool,
    /// Drill time when lingering steam stops.
    pub steam_until: Option<f64>,
}

impl FireEffects {
    /// Effect outputs for `fire` at drill time `now`, carrying steam linger
    /// over from `self`.
    pub fn next(&self, fire: &FireUnit, params: &FireParams, now: f64) -> Self {
        let intensity = fire.intensity.clamp(0.0, 1.0);
        let burning = fire.is_burning();

        let steam_until = if burning && fire.in_contact() {
            Some(now + params.steam_linger)
        } else {
            self.steam_until.filter(|until| !reached(now, *until))
        };

        Self {
            flames_playing: burning,
            emission_rate: if burning {
                params.max_emission_rate * intensity
            } else {
                0.0
            },
            light_intensity: if burning {
                params.base_light_intensity * intensity
            } else {
                0.0
            },
            audio_volume: if burning { intensity } else { 0.0 },
            steam_playing: steam_until.is_some(),
            steam_until,
        }
    }
}

/// Spray particles and hiss on the extinguisher.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SprayEffects {
    pub particles_playing: bool,
    pub audio_playing: bool,
}

impl SprayEffects {
    pub fn for_unit(unit: &ExtinguisherUnit) -> Self {
        let spraying = unit.is_trigger_pressed();
        Self {
            particles_playing: spraying,
            audio_playing: spraying,
        }
    }
}

pub fn update_fire_effects(
    clock: Res<DrillClock>,
    params: Res<TrainingParams>,
    mut fires: Query<(&FireUnit, &mut FireEffects)>,
) {
    let now = clock.now();
    for (fire, mut effects) in &mut fires {
        let next = effects.next(fire, &params.fire, now);
        effects.set_if_neq(next);
    }
}

pub fn update_spray_effects(mut units: Query<(&ExtinguisherUnit, &mut SprayEffects)>) {
    for (unit, mut spray) in &mut units {
        spray.set_if_neq(SprayEffects::for_unit(unit));
    }
}

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            FixedUpdate,
            (update_fire_effects, update_spray_effects).in_set(crate::SimulationSet::PostSim),
        );
    }
}
