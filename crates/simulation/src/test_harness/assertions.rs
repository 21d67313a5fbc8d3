//! Assertion helpers for `TestDrill` integration tests.

use crate::evaluator::{FailReason, TestOutcome};
use crate::fire_unit::{FireId, FireState};
use crate::procedure::ProcedureStep;

use super::TestDrill;

impl TestDrill {
    // -----------------------------------------------------------------------
    // Assertions
    // -----------------------------------------------------------------------

    pub fn assert_fire_burning(&self, id: FireId) {
        let fire = self.fire(id);
        assert_eq!(
            fire.state,
            FireState::Burning,
            "Expected fire {id} burning at t={:.2}, intensity {}",
            self.now(),
            fire.intensity
        );
    }

    pub fn assert_fire_extinguished(&self, id: FireId) {
        let fire = self.fire(id);
        assert_eq!(
            fire.state,
            FireState::Extinguished,
            "Expected fire {id} out at t={:.2}, intensity {}",
            self.now(),
            fire.intensity
        );
        assert_eq!(fire.intensity, 0.0);
    }

    /// Assert intensity is within `tolerance` of `expected`.
    pub fn assert_intensity_near(&self, id: FireId, expected: f32, tolerance: f32) {
        let actual = self.intensity(id);
        assert!(
            (actual - expected).abs() <= tolerance,
            "Expected fire {id} intensity ~{expected} (±{tolerance}), got {actual}"
        );
    }

    pub fn assert_step(&self, expected: ProcedureStep) {
        let step = self.step();
        assert_eq!(step, expected, "Expected procedure at {expected:?}, got {step:?}");
    }

    pub fn assert_running(&self) {
        let evaluator = self.evaluator().expect("Expected a test to be installed");
        assert!(
            !evaluator.is_finished(),
            "Expected test still running, got {:?}",
            evaluator.report()
        );
    }

    pub fn assert_passed(&self) {
        let report = self.report().expect("Expected a finished test");
        assert_eq!(
            report.outcome,
            TestOutcome::Passed,
            "Expected pass, got {report}"
        );
    }

    pub fn assert_failed(&self, reason: FailReason) {
        let report = self.report().expect("Expected a finished test");
        assert_eq!(
            report.outcome,
            TestOutcome::Failed(reason),
            "Expected failure ({reason}), got {report}"
        );
    }
}
