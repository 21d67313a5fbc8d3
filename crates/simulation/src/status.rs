use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::drill_clock::DrillClock;
use crate::evaluator::{EvaluatorPhase, TestEvaluator, TestOutcome};
use crate::extinguisher::ExtinguisherUnit;
use crate::fire_unit::FireUnit;
use crate::procedure::{ProcedureStep, ProcedureTracker};

/// Snapshot of the drill for HUD text and the headless `status` command.
/// Rebuilt at the end of every tick; nothing reads it back into the core.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrillStatus {
    pub clock: f64,
    pub tick: u64,
    /// `None` when no test has been started.
    pub phase: Option<EvaluatorPhase>,
    pub elapsed: f64,
    pub time_limit: Option<f64>,
    pub fires_total: usize,
    pub fires_burning: usize,
    /// `None` when there is no extinguisher.
    pub agent_remaining_percent: Option<f32>,
    pub pin_removed: bool,
    pub spraying: bool,
    pub step: ProcedureStep,
    pub prompt: Option<String>,
    pub outcome: Option<TestOutcome>,
}

impl DrillStatus {
    /// One-line HUD text.
    pub fn status_line(&self) -> String {
        let time = match self.time_limit {
            Some(limit) => format!("Time: {:.1}/{:.0}s", self.elapsed, limit),
            None => "Time: --".to_string(),
        };
        let agent = match self.agent_remaining_percent {
            Some(pct) => format!("Agent: {:.0}%", pct),
            None => "Agent: n/a".to_string(),
        };
        let pin = if self.pin_removed { "removed" } else { "in place" };
        let mut line = format!(
            "{time} | Fires remaining: {}/{} | {agent} | Pin: {pin}",
            self.fires_burning, self.fires_total
        );
        if let Some(outcome) = self.outcome {
            line.push_str(&format!(" | {outcome}"));
        }
        line
    }
}

pub fn update_drill_status(
    clock: Res<DrillClock>,
    tracker: Res<ProcedureTracker>,
    evaluator: Option<Res<TestEvaluator>>,
    units: Query<&ExtinguisherUnit>,
    fires: Query<&FireUnit>,
    mut status: ResMut<DrillStatus>,
) {
    let unit = units.get_single().ok();
    let next = DrillStatus {
        clock: clock.now(),
        tick: clock.ticks,
        phase: evaluator.as_ref().map(|e| e.phase()),
        elapsed: evaluator.as_ref().map_or(0.0, |e| e.elapsed()),
        time_limit: evaluator.as_ref().map(|e| e.time_limit()),
        fires_total: fires.iter().count(),
        fires_burning: fires.iter().filter(|f| f.is_burning()).count(),
        agent_remaining_percent: unit.map(ExtinguisherUnit::remaining_percentage),
        pin_removed: unit.is_some_and(ExtinguisherUnit::is_pin_removed),
        spraying: unit.is_some_and(ExtinguisherUnit::is_trigger_pressed),
        step: tracker.step(),
        prompt: tracker.prompt().map(str::to_string),
        outcome: evaluator
            .as_ref()
            .and_then(|e| e.report())
            .map(|r| r.outcome),
    };
    status.set_if_neq(next);
}

pub struct DrillStatusPlugin;

impl Plugin for DrillStatusPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DrillStatus>().add_systems(
            FixedUpdate,
            update_drill_status.in_set(crate::SimulationSet::PostSim),
        );
    }
}
