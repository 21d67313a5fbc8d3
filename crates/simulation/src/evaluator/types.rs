use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::drill_clock::reached;
use crate::extinguisher::ExtinguisherUnit;
use crate::fire_unit::FireId;
use crate::training_params::EvaluatorParams;

// =============================================================================
// Report types
// =============================================================================

/// Latched scoring criteria. Once a flag is set it stays set for the run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criteria {
    pub pin_removed_properly: bool,
    pub trigger_used_correctly: bool,
    pub all_fires_extinguished: bool,
}

impl Criteria {
    pub fn all_met(&self) -> bool {
        self.pin_removed_properly && self.trigger_used_correctly && self.all_fires_extinguished
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailReason {
    TimeLimitExceeded,
    CriteriaNotMet,
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeLimitExceeded => f.write_str("time limit exceeded"),
            Self::CriteriaNotMet => f.write_str("criteria not met"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestOutcome {
    Passed,
    Failed(FailReason),
}

impl TestOutcome {
    pub fn passed(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => f.write_str("Passed"),
            Self::Failed(reason) => write!(f, "Failed ({reason})"),
        }
    }
}

/// Read-only result of a finished test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestReport {
    pub outcome: TestOutcome,
    pub elapsed: f64,
    pub agent_used_percent: f32,
    pub criteria: Criteria,
    pub fires_extinguished: usize,
    pub fires_total: usize,
}

impl TestReport {
    /// Multi-line text for the result panel.
    pub fn panel_text(&self) -> String {
        let check = |met: bool| if met { "Yes" } else { "No" };
        let headline = match self.outcome {
            TestOutcome::Passed => "Test Passed!".to_string(),
            TestOutcome::Failed(reason) => format!("Test Failed: {reason}"),
        };
        format!(
            "{headline}\nTime: {:.1}s\nAgent used: {:.0}%\nFires extinguished: {}/{}\n\
             Pin removed: {}\nTrigger used: {}",
            self.elapsed,
            self.agent_used_percent,
            self.fires_extinguished,
            self.fires_total,
            check(self.criteria.pin_removed_properly),
            check(self.criteria.trigger_used_correctly),
        )
    }
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} after {:.2}s, {}/{} fires out, {:.0}% agent used",
            self.outcome,
            self.elapsed,
            self.fires_extinguished,
            self.fires_total,
            self.agent_used_percent
        )
    }
}

// =============================================================================
// Evaluator
// =============================================================================

/// What the evaluator needs from the extinguisher each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ExtinguisherSample {
    pub pin_removed: bool,
    pub trigger_pressed: bool,
    pub agent_used_percent: f32,
}

impl From<&ExtinguisherUnit> for ExtinguisherSample {
    fn from(unit: &ExtinguisherUnit) -> Self {
        Self {
            pin_removed: unit.is_pin_removed(),
            trigger_pressed: unit.is_trigger_pressed(),
            agent_used_percent: unit.used_percentage(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluatorPhase {
    /// Waiting out the start delay; nothing is scored.
    Starting,
    Running,
    Finished,
}

/// Scores one run of the drill against a time budget.
///
/// The fire set is fixed at construction. `tick` is the only way time moves;
/// after the run finishes, further ticks return `None` and change nothing.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct TestEvaluator {
    fires: Vec<FireId>,
    time_limit: f64,
    start_delay: f64,
    waited: f64,
    elapsed: f64,
    criteria: Criteria,
    agent_used_percent: f32,
    fires_extinguished: usize,
    report: Option<TestReport>,
}

impl TestEvaluator {
    pub fn new(fires: impl IntoIterator<Item = FireId>, time_limit: f64) -> Self {
        let mut fires: Vec<FireId> = fires.into_iter().collect();
        fires.sort();
        fires.dedup();
        Self {
            fires,
            time_limit: time_limit.max(0.0),
            start_delay: 0.0,
            waited: 0.0,
            elapsed: 0.0,
            criteria: Criteria::default(),
            agent_used_percent: 0.0,
            fires_extinguished: 0,
            report: None,
        }
    }

    pub fn from_params(fires: impl IntoIterator<Item = FireId>, params: &EvaluatorParams) -> Self {
        Self::new(fires, params.time_limit).with_start_delay(params.start_delay)
    }

    pub fn with_start_delay(mut self, delay: f64) -> Self {
        self.start_delay = delay.max(0.0);
        self
    }

    pub fn fires(&self) -> &[FireId] {
        &self.fires
    }

    pub fn time_limit(&self) -> f64 {
        self.time_limit
    }

    pub fn start_delay(&self) -> f64 {
        self.start_delay
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn remaining(&self) -> f64 {
        (self.time_limit - self.elapsed).max(0.0)
    }

    pub fn criteria(&self) -> Criteria {
        self.criteria
    }

    pub fn fires_extinguished(&self) -> usize {
        self.fires_extinguished
    }

    pub fn report(&self) -> Option<&TestReport> {
        self.report.as_ref()
    }

    pub fn phase(&self) -> EvaluatorPhase {
        if self.report.is_some() {
            EvaluatorPhase::Finished
        } else if reached(self.waited, self.start_delay) {
            EvaluatorPhase::Running
        } else {
            EvaluatorPhase::Starting
        }
    }

    pub fn is_finished(&self) -> bool {
        self.report.is_some()
    }

    /// Advance the run by `dt` seconds.
    ///
    /// `extinguisher` is `None` when no extinguisher exists; criteria then
    /// keep their latched values. `is_extinguished` answers for each fire in
    /// the set. Returns the report on the tick the run finishes.
    pub fn tick(
        &mut self,
        dt: f64,
        extinguisher: Option<ExtinguisherSample>,
        is_extinguished: impl Fn(FireId) -> bool,
    ) -> Option<TestReport> {
        if self.is_finished() || dt <= 0.0 {
            return None;
        }
        if !reached(self.waited, self.start_delay) {
            self.waited += dt;
            return None;
        }

        // 1. Advance time.
        self.elapsed += dt;

        // 2. Recount fires. An empty set never counts as all out.
        self.fires_extinguished = self.fires.iter().filter(|id| is_extinguished(**id)).count();
        self.criteria.all_fires_extinguished =
            !self.fires.is_empty() && self.fires_extinguished == self.fires.len();

        // 3. Latch procedure criteria from the extinguisher.
        if let Some(sample) = extinguisher {
            self.criteria.pin_removed_properly |= sample.pin_removed;
            self.criteria.trigger_used_correctly |= sample.pin_removed && sample.trigger_pressed;
            self.agent_used_percent = sample.agent_used_percent;
        }

        // 4. Out of time.
        if reached(self.elapsed, self.time_limit) && !self.criteria.all_fires_extinguished {
            return Some(self.finish(TestOutcome::Failed(FailReason::TimeLimitExceeded)));
        }

        // 5. Every fire out: score the run.
        if self.criteria.all_fires_extinguished {
            let outcome = if self.criteria.all_met() {
                TestOutcome::Passed
            } else {
                TestOutcome::Failed(FailReason::CriteriaNotMet)
            };
            return Some(self.finish(outcome));
        }

        None
    }

    /// End the run early. Returns `None` if it had already finished.
    pub fn fail(&mut self, reason: FailReason) -> Option<TestReport> {
        if self.is_finished() {
            return None;
        }
        Some(self.finish(TestOutcome::Failed(reason)))
    }

    fn finish(&mut self, outcome: TestOutcome) -> TestReport {
        let report = TestReport {
            outcome,
            elapsed: self.elapsed,
            agent_used_percent: self.agent_used_percent,
            criteria: self.criteria,
            fires_extinguished: self.fires_extinguished,
            fires_total: self.fires.len(),
        };
        self.report = Some(report.clone());
        report
    }
}

// =============================================================================
// Events
// =============================================================================

/// Start a test over every registered fire. `time_limit` overrides
/// `EvaluatorParams::time_limit`.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq)]
pub struct StartDrill {
    pub time_limit: Option<f64>,
}

/// Discard the current run and set everything up again.
#[derive(Event, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestartDrill;

/// Abort the running test with the given reason.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailDrill {
    pub reason: FailReason,
}

/// Sent once when a test finishes.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TestCompleted {
    pub report: TestReport,
}

/// Sent when a test starts, after any restart.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TestStarted {
    pub at: f64,
    pub fires: usize,
    pub time_limit: f64,
}

/// Sent after a restart has reset units, fires and the procedure.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DrillRestarted {
    pub at: f64,
}
