//! Data-driven drill parameters.
//!
//! Collects every tunable of the drill into a single [`TrainingParams`]
//! resource. Hosts override values from JSON; missing fields keep their
//! defaults, so a partial file such as `{"evaluator": {"time_limit": 45}}`
//! is valid.
//!
//! Systems read `Res<TrainingParams>` instead of module-level constants.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Fire parameters
// ---------------------------------------------------------------------------

/// Tunables for newly spawned fires and their effect outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FireParams {
    /// Intensity lost per second while agent is in contact (1.0 / seconds to extinguish).
    pub decay_rate: f32,
    /// Intensity at or below which the fire counts as out.
    pub extinguish_threshold: f32,
    /// Whether fires come back after being put out.
    pub reignitable: bool,
    /// Seconds between extinguish and reignition.
    pub reignite_delay: f64,
    /// Flame particle emission at full intensity.
    pub max_emission_rate: f32,
    /// Light intensity at full fire.
    pub base_light_intensity: f32,
    /// Seconds steam keeps playing after agent stops hitting the fire.
    pub steam_linger: f64,
}

impl Default for FireParams {
    fn default() -> Self {
        Self {
            decay_rate: 0.5,
            extinguish_threshold: 0.0,
            reignitable: false,
            reignite_delay: 3.0,
            max_emission_rate: 50.0,
            base_light_intensity: 1.0,
            steam_linger: 2.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Extinguisher parameters
// ---------------------------------------------------------------------------

/// Tunables for the extinguisher's agent supply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtinguisherParams {
    /// Agent held when full, in seconds of spray at `consumption_rate` 1.0.
    pub capacity: f32,
    /// Agent used per second of spraying.
    pub consumption_rate: f32,
}

impl Default for ExtinguisherParams {
    fn default() -> Self {
        Self {
            capacity: 10.0,
            consumption_rate: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Gesture parameters
// ---------------------------------------------------------------------------

/// Thresholds a host gesture must reach before it counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureParams {
    /// Pin travel (local units) at which the pin is out.
    pub pin_pull_distance: f32,
    /// Full pin travel; pulls are clamped to this.
    pub pin_max_distance: f32,
    /// Full nozzle rotation in degrees.
    pub nozzle_max_angle: f32,
    /// Full trigger rotation in degrees.
    pub trigger_max_angle: f32,
    /// Fraction of full rotation that counts as aimed / squeezed.
    pub aim_fraction: f32,
    /// When false the trigger sprays as soon as the pin is out, whatever the
    /// procedure step.
    pub enforce_procedure: bool,
}

impl Default for GestureParams {
    fn default() -> Self {
        Self {
            pin_pull_distance: 1.5,
            pin_max_distance: 2.0,
            nozzle_max_angle: 90.0,
            trigger_max_angle: 90.0,
            aim_fraction: 0.8,
            enforce_procedure: true,
        }
    }
}

impl GestureParams {
    /// Nozzle rotation in degrees that counts as aimed.
    pub fn nozzle_threshold(&self) -> f32 {
        self.nozzle_max_angle * self.aim_fraction
    }

    /// Trigger rotation in degrees that counts as squeezed.
    pub fn trigger_threshold(&self) -> f32 {
        self.trigger_max_angle * self.aim_fraction
    }
}

// ---------------------------------------------------------------------------
// Evaluator parameters
// ---------------------------------------------------------------------------

/// Tunables for test scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorParams {
    /// Seconds the trainee has to put every fire out.
    pub time_limit: f64,
    /// Seconds between the start request and the countdown starting.
    pub start_delay: f64,
}

impl Default for EvaluatorParams {
    fn default() -> Self {
        Self {
            time_limit: 30.0,
            start_delay: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level TrainingParams resource
// ---------------------------------------------------------------------------

/// Central resource holding all data-driven drill parameters.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingParams {
    /// Length of one fixed tick in seconds.
    pub tick_seconds: f64,
    pub fire: FireParams,
    pub extinguisher: ExtinguisherParams,
    pub gestures: GestureParams,
    pub evaluator: EvaluatorParams,
}

impl Default for TrainingParams {
    fn default() -> Self {
        Self {
            tick_seconds: 0.02,
            fire: FireParams::default(),
            extinguisher: ExtinguisherParams::default(),
            gestures: GestureParams::default(),
            evaluator: EvaluatorParams::default(),
        }
    }
}

impl TrainingParams {
    /// Parse parameter overrides from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse overrides, logging a warning and returning defaults on failure.
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(params) => params,
            Err(e) => {
                warn!(
                    "TrainingParams: failed to parse {} bytes, falling back to defaults: {}",
                    json.len(),
                    e
                );
                Self::default()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct TrainingParamsPlugin;

impl Plugin for TrainingParamsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TrainingParams>();
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
