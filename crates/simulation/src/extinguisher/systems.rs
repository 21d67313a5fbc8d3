use bevy::prelude::*;

use crate::drill_clock::DrillClock;

use super::types::{AgentVolume, ExtinguisherEmptied, ExtinguisherUnit};

/// Consumes agent while spraying and mirrors the trigger onto the agent volume.
///
/// Runs before the fire phase so contact routing sees this tick's flow.
pub fn tick_extinguisher(
    clock: Res<DrillClock>,
    mut units: Query<(&mut ExtinguisherUnit, Option<&mut AgentVolume>)>,
    mut emptied: EventWriter<ExtinguisherEmptied>,
) {
    let dt = clock.dt();
    for (mut unit, volume) in &mut units {
        if unit.tick(dt) {
            info!("Extinguisher empty at {:.2}s", clock.now());
            emptied.send(ExtinguisherEmptied { at: clock.now() });
        }
        if let Some(mut volume) = volume {
            volume.set_if_neq(AgentVolume {
                active: unit.is_trigger_pressed(),
            });
        }
    }
}

pub struct ExtinguisherPlugin;

impl Plugin for ExtinguisherPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ExtinguisherEmptied>().add_systems(
            FixedUpdate,
            tick_extinguisher.in_set(crate::SimulationSet::Extinguisher),
        );
    }
}
