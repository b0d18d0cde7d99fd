// tests/throttle/config_tests.rs

#[cfg(test)]
mod tests {
    use crate::fixtures::test_clock::TestClock;
    use net_throttle::{ThrottleConfig, ThrottleEngine, ThrottleError};

    // Config validation tests
    #[test]
    fn config_rejects_zero_target_speed() {
        let config = ThrottleConfig::new(0, 10);
        let result = config.validate();
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ThrottleError::InvalidTargetSpeed
        ));
    }

    #[test]
    fn config_rejects_zero_window() {
        let config = ThrottleConfig::new(16, 0);
        let result = config.validate();
        assert!(matches!(
            result.unwrap_err(),
            ThrottleError::InvalidWindowSize
        ));
    }

    #[test]
    fn config_rejects_inverted_segment_bounds() {
        let config = ThrottleConfig::default().min_segment(4096).max_segment(1024);
        assert!(matches!(
            config.validate().unwrap_err(),
            ThrottleError::InvalidSegmentBounds
        ));

        let config = ThrottleConfig::default().min_segment(0).max_segment(0);
        assert!(matches!(
            config.validate().unwrap_err(),
            ThrottleError::InvalidSegmentBounds
        ));
    }

    #[test]
    fn unset_target_speed_defaults_to_16_kbps() {
        let clock = TestClock::new(0.0);
        let engine = ThrottleEngine::with_config(ThrottleConfig::new(-1, 10), clock).unwrap();
        assert_eq!(engine.target_speed(), 16);
    }

    #[test]
    fn config_accepts_single_slot_window() {
        let config = ThrottleConfig::new(16, 1);
        assert!(config.validate().is_ok());
    }

    // Test config builder pattern
    #[test]
    fn config_builder_pattern_works() {
        let config = ThrottleConfig::new(0, 0)
            .name("peer")
            .target_speed(128)
            .window_size(20)
            .overhead_bytes(64)
            .min_segment(512)
            .max_segment(64 * 1024);
        assert!(config.validate().is_ok());

        let clock = TestClock::new(0.0);
        let engine = ThrottleEngine::with_config(config, clock).unwrap();
        assert_eq!(engine.name(), "peer");
        assert_eq!(engine.target_speed(), 128);
        assert_eq!(engine.window_size(), 20);
        assert_eq!(engine.history().len(), 20);
    }

    // Constructor tests with config
    #[test]
    fn constructor_with_invalid_config_fails() {
        let clock = TestClock::new(0.0);
        let result = ThrottleEngine::with_config(ThrottleConfig::new(0, 10), clock);
        assert!(matches!(
            result.unwrap_err(),
            ThrottleError::InvalidTargetSpeed
        ));
    }
}
