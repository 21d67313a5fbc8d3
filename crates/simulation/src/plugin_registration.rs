use bevy::prelude::*;

use crate::*;

/// Register all drill feature plugins.
///
/// One plugin per line. Ordering between them is expressed with
/// `SimulationSet` and `.after()`, not registration order.
pub(crate) fn register_feature_plugins(app: &mut App) {
    // Configuration and time
    app.add_plugins(training_params::TrainingParamsPlugin);
    app.add_plugins(drill_clock::DrillClockPlugin);
    app.add_plugins(warnings::DrillWarningsPlugin);

    // Core units
    app.add_plugins(extinguisher::ExtinguisherPlugin);
    app.add_plugins(fire_unit::FireUnitPlugin);
    app.add_plugins(procedure::ProcedurePlugin);
    app.add_plugins(gestures::GesturesPlugin);

    // Scoring
    app.add_plugins(evaluator::EvaluatorPlugin);

    // Outputs and reporting
    app.add_plugins(effects::EffectsPlugin);
    app.add_plugins(journal::DrillJournalPlugin);
    app.add_plugins(status::DrillStatusPlugin);
}
