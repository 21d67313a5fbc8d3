//! Deterministic drill ordering via `SystemSet` phases.
//!
//! Every drill system runs in the `FixedUpdate` schedule and belongs to exactly
//! one of these sets.  The sets are configured as a chain so that, within one
//! frame, state flows in a single direction and no consumer ever reads a value
//! that is one tick stale.
//!
//! # FixedUpdate phases (`SimulationSet`)
//!
//! ```text
//! PreSim  →  Input  →  Extinguisher  →  Fire  →  Evaluation  →  PostSim
//! ```
//!
//! * **PreSim** – Drill clock, fire registration, restart and start requests,
//!   procedure bootstrap.
//! * **Input** – Host gestures (pin pull, nozzle aim, trigger squeeze/release)
//!   applied to the extinguisher and the procedure tracker.
//! * **Extinguisher** – Agent consumption and the agent volume mirror.  Must
//!   finish before any fire reads whether agent is flowing.
//! * **Fire** – Contact routing and intensity decay / reignition.  Must finish
//!   before the evaluator counts extinguished fires.
//! * **Evaluation** – Pass/fail scoring.
//! * **PostSim** – Effect outputs, journal, status snapshot, report logging.
//!   These only *read* drill state.

use bevy::prelude::*;

/// Ordered phases for systems running in the `FixedUpdate` schedule.
///
/// Configured as a chain by [`crate::SimulationPlugin`].  Feature plugins use
/// `.in_set(SimulationSet::X)` and may add finer `.after()` / `.before()`
/// constraints inside a phase.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Clock, registration, restart/start requests.
    PreSim,
    /// Gesture processing.
    Input,
    /// Extinguisher agent consumption.
    Extinguisher,
    /// Fire contact resolution and decay.
    Fire,
    /// Test evaluation.
    Evaluation,
    /// Read-only aggregation and reporting.
    PostSim,
}

impl SimulationSet {
    /// All phases in execution order.
    pub const ORDER: [SimulationSet; 6] = [
        SimulationSet::PreSim,
        SimulationSet::Input,
        SimulationSet::Extinguisher,
        SimulationSet::Fire,
        SimulationSet::Evaluation,
        SimulationSet::PostSim,
    ];
}
