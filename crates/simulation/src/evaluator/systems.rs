use bevy::prelude::*;

use crate::drill_clock::DrillClock;
use crate::extinguisher::ExtinguisherUnit;
use crate::fire_unit::{FireRegistry, FireUnit};
use crate::procedure::ProcedureTracker;
use crate::training_params::TrainingParams;
use crate::warnings::{DrillWarning, WarningKind};

use super::types::{
    DrillRestarted, ExtinguisherSample, FailDrill, RestartDrill, StartDrill, TestCompleted,
    TestEvaluator, TestStarted,
};

/// Resets the extinguisher, rekindles every fire and starts over.
///
/// 1. Re-locks and refills every extinguisher.
/// 2. Rekindles every fire, releasing all agent contacts.
/// 3. Replaces the procedure tracker with a fresh one.
/// 4. If a test existed, starts a new one over the current fires with the
///    same time limit.
#[allow(clippy::too_many_arguments)]
pub fn restart_drill(
    mut commands: Commands,
    clock: Res<DrillClock>,
    params: Res<TrainingParams>,
    registry: Res<FireRegistry>,
    evaluator: Option<Res<TestEvaluator>>,
    mut requests: EventReader<RestartDrill>,
    mut units: Query<&mut ExtinguisherUnit>,
    mut fires: Query<&mut FireUnit>,
    mut tracker: ResMut<ProcedureTracker>,
    mut restarted: EventWriter<DrillRestarted>,
    mut started: EventWriter<TestStarted>,
) {
    if requests.read().count() == 0 {
        return;
    }
    let now = clock.now();

    for mut unit in &mut units {
        unit.reset();
    }
    for mut fire in &mut fires {
        fire.rekindle();
    }
    *tracker = ProcedureTracker::new();

    if let Some(previous) = evaluator {
        let next = TestEvaluator::new(registry.ids(), previous.time_limit())
            .with_start_delay(params.evaluator.start_delay);
        started.send(TestStarted {
            at: now,
            fires: next.fires().len(),
            time_limit: next.time_limit(),
        });
        commands.insert_resource(next);
    }

    info!("Drill restarted at {:.2}s", now);
    restarted.send(DrillRestarted { at: now });
}

/// Starts a test over every registered fire.
///
/// A request while a test is still running is refused with a warning. With
/// no fires registered the test still starts but can only time out.
pub fn start_drill(
    mut commands: Commands,
    clock: Res<DrillClock>,
    params: Res<TrainingParams>,
    registry: Res<FireRegistry>,
    evaluator: Option<Res<TestEvaluator>>,
    mut requests: EventReader<StartDrill>,
    mut started: EventWriter<TestStarted>,
    mut warnings: EventWriter<DrillWarning>,
) {
    let Some(request) = requests.read().last().copied() else {
        return;
    };
    let now = clock.now();

    if evaluator.is_some_and(|e| !e.is_finished()) {
        warn!("Start request ignored: a test is already running");
        warnings.send(DrillWarning {
            at: now,
            kind: WarningKind::TestAlreadyRunning,
        });
        return;
    }
    if registry.is_empty() {
        warn!("Starting a test with no fires registered");
        warnings.send(DrillWarning {
            at: now,
            kind: WarningKind::NoFires,
        });
    }

    let time_limit = request.time_limit.unwrap_or(params.evaluator.time_limit);
    let next = TestEvaluator::new(registry.ids(), time_limit)
        .with_start_delay(params.evaluator.start_delay);
    info!(
        "Test started at {:.2}s: {} fire(s), {:.1}s limit",
        now,
        next.fires().len(),
        time_limit
    );
    started.send(TestStarted {
        at: now,
        fires: next.fires().len(),
        time_limit,
    });
    commands.insert_resource(next);
}

/// Scores the running test once per tick.
///
/// Fires missing from the registry (despawned mid-run) count as out. Without
/// an evaluator the system does nothing.
pub fn tick_evaluator(
    clock: Res<DrillClock>,
    evaluator: Option<ResMut<TestEvaluator>>,
    registry: Res<FireRegistry>,
    units: Query<&ExtinguisherUnit>,
    fires: Query<&FireUnit>,
    mut fail_requests: EventReader<FailDrill>,
    mut completed: EventWriter<TestCompleted>,
) {
    #[cfg(feature = "trace")]
    let _span = bevy::log::info_span!("tick_evaluator").entered();
    let Some(mut evaluator) = evaluator else {
        fail_requests.clear();
        return;
    };
    if evaluator.is_finished() {
        fail_requests.clear();
        return;
    }

    let report = match fail_requests.read().next() {
        Some(request) => evaluator.fail(request.reason),
        None => {
            let sample = units.get_single().ok().map(ExtinguisherSample::from);
            let is_extinguished = |id| {
                registry
                    .get(id)
                    .and_then(|entity| fires.get(entity).ok())
                    .map_or(true, FireUnit::is_extinguished)
            };
            evaluator.tick(clock.dt(), sample, is_extinguished)
        }
    };
    fail_requests.clear();

    if let Some(report) = report {
        if report.outcome.passed() {
            info!("Test passed: {}", report);
        } else {
            warn!("Test failed: {}", report);
        }
        completed.send(TestCompleted { report });
    }
}

pub struct EvaluatorPlugin;

impl Plugin for EvaluatorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<StartDrill>()
            .add_event::<RestartDrill>()
            .add_event::<FailDrill>()
            .add_event::<DrillRestarted>()
            .add_event::<TestStarted>()
            .add_event::<TestCompleted>()
            .add_systems(
                FixedUpdate,
                (restart_drill, start_drill)
                    .chain()
                    .after(crate::fire_unit::unregister_fires)
                    .in_set(crate::SimulationSet::PreSim),
            )
            .add_systems(
                FixedUpdate,
                tick_evaluator.in_set(crate::SimulationSet::Evaluation),
            );
    }
}
