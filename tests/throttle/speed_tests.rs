// tests/throttle/speed_tests.rs

#[cfg(test)]
mod tests {

    use crate::fixtures::test_clock::TestClock;
    use net_throttle::{ThrottleConfig, ThrottleEngine};

    #[test]
    fn fresh_engine_reports_zero_speed() {
        let clock = TestClock::new(0.0);
        let engine = ThrottleEngine::with_config(ThrottleConfig::default(), clock).unwrap();
        assert_eq!(engine.current_speed(), 0.0);
    }

    #[test]
    fn open_slot_is_excluded() {
        let clock = TestClock::new(0.0);
        let mut engine =
            ThrottleEngine::with_config(ThrottleConfig::new(16, 10), clock.clone()).unwrap();
        engine.record_exact(9000).unwrap();
        assert_eq!(engine.current_speed(), 0.0);

        clock.set_time(1.0);
        engine.record_exact(5000).unwrap();
        assert!((engine.current_speed() - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn single_slot_window_reports_zero_speed() {
        let clock = TestClock::new(0.0);
        let mut engine =
            ThrottleEngine::with_config(ThrottleConfig::new(16, 1), clock.clone()).unwrap();
        engine.record_exact(9000).unwrap();
        clock.set_time(1.0);
        engine.tick().unwrap();
        assert_eq!(engine.current_speed(), 0.0);
    }

    #[test]
    fn snapshot_reflects_engine_state() {
        let clock = TestClock::new(0.0);
        let config = ThrottleConfig::new(32, 4).name("peer-7");
        let mut engine = ThrottleEngine::with_config(config, clock.clone()).unwrap();
        engine.record_exact(300).unwrap();
        clock.set_time(1.5);
        engine.record_exact(600).unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.name, "peer-7");
        assert_eq!(snapshot.target_speed, 32);
        assert_eq!(snapshot.window_size, 4);
        assert_eq!(snapshot.history, vec![600, 300, 0, 0]);
        assert!((snapshot.current_speed - 100.0).abs() < 1e-9);
        assert!(snapshot.any_packet_yet);
    }
}
