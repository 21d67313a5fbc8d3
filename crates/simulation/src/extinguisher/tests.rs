#[cfg(test)]
mod tests {
    use super::super::types::*;
    use crate::training_params::ExtinguisherParams;

    const DT: f64 = 0.02;

    fn unlocked(capacity: f32) -> ExtinguisherUnit {
        let mut unit = ExtinguisherUnit::new(capacity);
        unit.pull_pin();
        unit
    }

    // -------------------------------------------------------------------------
    // Pin
    // -------------------------------------------------------------------------

    #[test]
    fn starts_locked_and_full() {
        let unit = ExtinguisherUnit::default();
        assert_eq!(unit.state, ExtinguisherState::Locked);
        assert_eq!(unit.remaining_agent, 10.0);
        assert!(!unit.is_pin_removed());
        assert!(!unit.can_spray());
    }

    #[test]
    fn pull_pin_only_once() {
        let mut unit = ExtinguisherUnit::new(10.0);
        assert!(unit.pull_pin());
        assert!(!unit.pull_pin());
        assert_eq!(unit.state, ExtinguisherState::Idle);

        unit.press_trigger().unwrap();
        assert!(!unit.pull_pin());
        assert_eq!(unit.state, ExtinguisherState::Spraying);
    }

    // -------------------------------------------------------------------------
    // Trigger
    // -------------------------------------------------------------------------

    #[test]
    fn trigger_rejected_while_locked() {
        let mut unit = ExtinguisherUnit::new(10.0);
        assert_eq!(unit.press_trigger(), Err(TriggerRejection::PinInPlace));
        assert!(!unit.is_trigger_pressed());
    }

    #[test]
    fn trigger_press_and_release() {
        let mut unit = unlocked(10.0);
        assert_eq!(unit.press_trigger(), Ok(()));
        assert!(unit.is_trigger_pressed());
        assert_eq!(unit.press_trigger(), Ok(()));
        assert!(unit.release_trigger());
        assert!(!unit.release_trigger());
        assert_eq!(unit.state, ExtinguisherState::Idle);
    }

    #[test]
    fn consumes_only_while_spraying() {
        let mut unit = unlocked(10.0);
        for _ in 0..50 {
            assert!(!unit.tick(DT));
        }
        assert_eq!(unit.remaining_agent, 10.0);

        unit.press_trigger().unwrap();
        for _ in 0..50 {
            unit.tick(DT);
        }
        assert!((unit.remaining_agent - 9.0).abs() < 1e-3);

        unit.release_trigger();
        unit.tick(DT);
        assert!((unit.remaining_agent - 9.0).abs() < 1e-3);
    }

    #[test]
    fn runs_dry_and_auto_releases() {
        let mut unit = unlocked(1.0);
        unit.press_trigger().unwrap();
        let mut emptied_on = None;
        for i in 1..=100 {
            if unit.tick(DT) {
                emptied_on = Some(i);
            }
        }
        assert_eq!(emptied_on, Some(50));
        assert_eq!(unit.remaining_agent, 0.0);
        assert_eq!(unit.state, ExtinguisherState::Idle);
        assert_eq!(unit.press_trigger(), Err(TriggerRejection::Empty));
        assert!(!unit.can_spray());
    }

    #[test]
    fn consumption_rate_scales_usage() {
        let params = ExtinguisherParams {
            capacity: 10.0,
            consumption_rate: 2.0,
        };
        let mut unit = ExtinguisherUnit::from_params(&params);
        unit.pull_pin();
        unit.press_trigger().unwrap();
        for _ in 0..50 {
            unit.tick(DT);
        }
        assert!((unit.remaining_agent - 8.0).abs() < 1e-3);
        assert!((unit.used_percentage() - 20.0).abs() < 1e-2);
    }

    // -------------------------------------------------------------------------
    // Refill / reset
    // -------------------------------------------------------------------------

    #[test]
    fn refill_always_restores_capacity() {
        for sprayed_ticks in [0, 1, 137, 499, 500, 900] {
            let mut unit = unlocked(10.0);
            unit.press_trigger().unwrap();
            for _ in 0..sprayed_ticks {
                unit.tick(DT);
            }
            unit.refill();
            assert_eq!(unit.remaining_agent, unit.capacity);
        }
    }

    #[test]
    fn refill_after_empty_allows_spraying_again() {
        let mut unit = unlocked(0.1);
        unit.press_trigger().unwrap();
        for _ in 0..10 {
            unit.tick(DT);
        }
        assert!(unit.is_empty());
        unit.refill();
        assert_eq!(unit.press_trigger(), Ok(()));
    }

    #[test]
    fn reset_relocks_pin() {
        let mut unit = unlocked(10.0);
        unit.press_trigger().unwrap();
        unit.tick(1.0);
        unit.reset();
        assert_eq!(unit.state, ExtinguisherState::Locked);
        assert_eq!(unit.remaining_agent, 10.0);
        assert_eq!(unit.press_trigger(), Err(TriggerRejection::PinInPlace));
    }

    #[test]
    fn percentages() {
        let mut unit = unlocked(10.0);
        assert_eq!(unit.remaining_percentage(), 100.0);
        unit.press_trigger().unwrap();
        unit.tick(2.5);
        assert!((unit.remaining_percentage() - 75.0).abs() < 1e-4);
        assert!((unit.used_percentage() - 25.0).abs() < 1e-4);

        let zero = ExtinguisherUnit::new(0.0);
        assert_eq!(zero.remaining_percentage(), 0.0);
        assert_eq!(zero.used_percentage(), 0.0);
    }
}
