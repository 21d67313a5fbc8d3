use bevy::prelude::*;

pub mod drill_clock;
pub mod drill_protocol;
pub mod effects;
pub mod evaluator;
pub mod extinguisher;
pub mod fire_unit;
pub mod gestures;
pub mod journal;
pub mod procedure;
pub mod simulation_sets;
pub mod status;
pub mod training_params;
pub mod warnings;

mod plugin_registration;

#[cfg(any(test, feature = "harness"))]
pub mod test_harness;

pub use simulation_sets::SimulationSet;

/// Root plugin of the drill core.
///
/// Configures the `FixedUpdate` phase chain and registers every feature
/// plugin. Hosts add it next to their own rendering/XR plugins and drive it
/// with gesture and contact events.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::PreSim,
                SimulationSet::Input,
                SimulationSet::Extinguisher,
                SimulationSet::Fire,
                SimulationSet::Evaluation,
                SimulationSet::PostSim,
            )
                .chain(),
        );

        plugin_registration::register_feature_plugins(app);
    }
}

/// Runs one fixed tick and then swaps every drill event buffer.
///
/// For hosts that step `FixedUpdate` by hand instead of through
/// `App::update`. Bevy only clears event queues from `First`, so without the
/// swap every event sent during a session stays queued. Each event survives
/// one swap, so systems that run every tick still see all of them.
pub fn run_fixed_tick(world: &mut World) {
    world.run_schedule(FixedUpdate);
    update_drill_events(world);
}

/// Swaps the double buffers of every event the drill core registers.
pub fn update_drill_events(world: &mut World) {
    update_events::<gestures::Gesture>(world);
    update_events::<fire_unit::AgentContact>(world);
    update_events::<fire_unit::FireCommand>(world);
    update_events::<fire_unit::FireExtinguished>(world);
    update_events::<fire_unit::FireReignited>(world);
    update_events::<extinguisher::ExtinguisherEmptied>(world);
    update_events::<procedure::ProcedureAdvanced>(world);
    update_events::<evaluator::StartDrill>(world);
    update_events::<evaluator::RestartDrill>(world);
    update_events::<evaluator::FailDrill>(world);
    update_events::<evaluator::DrillRestarted>(world);
    update_events::<evaluator::TestStarted>(world);
    update_events::<evaluator::TestCompleted>(world);
    update_events::<warnings::DrillWarning>(world);
}

fn update_events<E: Event>(world: &mut World) {
    if let Some(mut events) = world.get_resource_mut::<Events<E>>() {
        events.update();
    }
}
