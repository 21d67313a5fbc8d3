use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::training_params::TrainingParams;

/// Tolerance used when comparing accumulated drill time against a deadline.
pub const TIME_EPSILON: f64 = 1e-9;

/// Whether `now` has reached `deadline`, allowing for accumulated float error.
#[inline]
pub fn reached(now: f64, deadline: f64) -> bool {
    now + TIME_EPSILON >= deadline
}

/// Frame clock for the drill. Advances by one fixed step per `FixedUpdate`.
///
/// Systems read [`DrillClock::dt`] rather than `Res<Time>` so that ticking the
/// schedule directly (headless runner, tests) stays deterministic.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct DrillClock {
    pub ticks: u64,
    pub elapsed: f64,
    pub step: f64,
    pub paused: bool,
}

impl Default for DrillClock {
    fn default() -> Self {
        Self::new(TrainingParams::default().tick_seconds)
    }
}

impl DrillClock {
    pub fn new(step: f64) -> Self {
        Self {
            ticks: 0,
            elapsed: 0.0,
            step: step.max(0.0),
            paused: false,
        }
    }

    pub fn tick(&mut self) {
        if self.paused {
            return;
        }
        self.ticks += 1;
        self.elapsed += self.step;
    }

    /// Seconds covered by the current tick (0 while paused).
    pub fn dt(&self) -> f64 {
        if self.paused {
            0.0
        } else {
            self.step
        }
    }

    /// Drill time at the end of the current tick.
    pub fn now(&self) -> f64 {
        self.elapsed
    }

    pub fn formatted(&self) -> String {
        format!("t={:.2}s (tick {})", self.elapsed, self.ticks)
    }
}

pub fn tick_drill_clock(mut clock: ResMut<DrillClock>) {
    clock.tick();
}

/// Keeps the clock step and the `FixedUpdate` timestep in line with
/// `TrainingParams::tick_seconds`.
pub fn sync_fixed_timestep(
    params: Res<TrainingParams>,
    mut clock: ResMut<DrillClock>,
    mut time: ResMut<Time<Fixed>>,
) {
    let step = params.tick_seconds;
    let Some(timestep) = fixed_timestep(step) else {
        warn!(
            "tick_seconds {} is not a usable timestep, keeping {}",
            step, clock.step
        );
        return;
    };
    clock.step = step;
    time.set_timestep(timestep);
}

/// `step` seconds as a fixed timestep, or `None` when it is not positive or
/// too large for a `Duration`.
pub fn fixed_timestep(step: f64) -> Option<Duration> {
    if step > 0.0 {
        Duration::try_from_secs_f64(step).ok()
    } else {
        None
    }
}

pub struct DrillClockPlugin;

impl Plugin for DrillClockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DrillClock>()
            .add_systems(
                Update,
                sync_fixed_timestep.run_if(resource_changed::<TrainingParams>),
            )
            .add_systems(
                FixedUpdate,
                tick_drill_clock.in_set(crate::SimulationSet::PreSim),
            );
    }
}
