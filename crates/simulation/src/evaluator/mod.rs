mod systems;
mod types;

pub use systems::{restart_drill, start_drill, tick_evaluator, EvaluatorPlugin};
pub use types::{
    Criteria, DrillRestarted, EvaluatorPhase, ExtinguisherSample, FailDrill, FailReason,
    RestartDrill, StartDrill, TestCompleted, TestEvaluator, TestOutcome, TestReport, TestStarted,
};
