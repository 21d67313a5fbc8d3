use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::drill_clock::DrillClock;
use crate::extinguisher::ExtinguisherUnit;

// =============================================================================
// Procedure steps
// =============================================================================

/// Pull-Aim-Squeeze sequence. Each variant names the action the trainee is
/// currently expected to perform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcedureStep {
    /// No extinguisher in hand yet.
    #[default]
    None,
    PullPin,
    AimNozzle,
    PressHandle,
    /// Sequence complete; spraying is legal.
    Spray,
}

impl ProcedureStep {
    pub const ALL: &'static [ProcedureStep] = &[
        ProcedureStep::None,
        ProcedureStep::PullPin,
        ProcedureStep::AimNozzle,
        ProcedureStep::PressHandle,
        ProcedureStep::Spray,
    ];

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    /// The only step this one may advance to.
    pub fn next(self) -> Option<ProcedureStep> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Instruction shown to the trainee for this step.
    pub fn prompt(self) -> Option<&'static str> {
        match self {
            ProcedureStep::None => None,
            ProcedureStep::PullPin => Some("Step 1: Pull the Pin"),
            ProcedureStep::AimNozzle => Some("Step 2: Lift the nozzle to aim"),
            ProcedureStep::PressHandle => Some("Step 3: Press the trigger"),
            ProcedureStep::Spray => {
                Some("Step 4: Now, pickup the extinguisher and spray left and right")
            }
        }
    }
}

// =============================================================================
// Tracker resource
// =============================================================================

/// Forward-only progress through [`ProcedureStep`]. A new run gets a new
/// tracker; there is no rollback.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcedureTracker {
    step: ProcedureStep,
}

impl ProcedureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> ProcedureStep {
        self.step
    }

    /// Move from `expected_from` to `to`. Succeeds only when the tracker is at
    /// `expected_from` and `to` is its immediate successor.
    pub fn advance(&mut self, expected_from: ProcedureStep, to: ProcedureStep) -> bool {
        if self.step != expected_from || expected_from.next() != Some(to) {
            return false;
        }
        self.step = to;
        true
    }

    /// Start the sequence once an extinguisher is available.
    pub fn begin(&mut self) -> bool {
        self.advance(ProcedureStep::None, ProcedureStep::PullPin)
    }

    pub fn allows_spray(&self) -> bool {
        self.step == ProcedureStep::Spray
    }

    pub fn is_complete(&self) -> bool {
        self.allows_spray()
    }

    pub fn prompt(&self) -> Option<&'static str> {
        self.step.prompt()
    }
}

/// Sent each time the tracker moves forward.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ProcedureAdvanced {
    pub from: ProcedureStep,
    pub to: ProcedureStep,
    pub at: f64,
}

// =============================================================================
// Systems
// =============================================================================

/// Moves a fresh tracker to `PullPin` as soon as an extinguisher exists.
pub fn begin_procedure(
    clock: Res<DrillClock>,
    units: Query<(), With<ExtinguisherUnit>>,
    mut tracker: ResMut<ProcedureTracker>,
    mut advanced: EventWriter<ProcedureAdvanced>,
) {
    if tracker.step() != ProcedureStep::None || units.is_empty() {
        return;
    }
    if tracker.begin() {
        debug!("Procedure started: {:?}", tracker.prompt());
        advanced.send(ProcedureAdvanced {
            from: ProcedureStep::None,
            to: ProcedureStep::PullPin,
            at: clock.now(),
        });
    }
}

pub struct ProcedurePlugin;

impl Plugin for ProcedurePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ProcedureTracker>()
            .add_event::<ProcedureAdvanced>()
            .add_systems(
                FixedUpdate,
                begin_procedure
                    .after(crate::evaluator::restart_drill)
                    .in_set(crate::SimulationSet::PreSim),
            );
    }
}
