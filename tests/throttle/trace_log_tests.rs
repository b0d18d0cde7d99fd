// tests/throttle/trace_log_tests.rs

#[cfg(test)]
mod tests {

    use crate::fixtures::test_clock::TestClock;
    use net_throttle::{ThrottleConfig, ThrottleEngine, TrafficLog};
    use std::fs;
    use std::sync::Arc;

    #[test]
    fn recorded_events_are_appended() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(TrafficLog::new(dir.path().join("net.log")));
        let clock = TestClock::new(12.9);
        let config = ThrottleConfig::default().trace_log(Arc::clone(&log));
        let mut engine = ThrottleEngine::with_config(config, clock.clone()).unwrap();

        engine.record_exact(4096).unwrap();
        clock.set_time(13.2);
        engine.record_segment(2048).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "12 4\n13 2\n");
    }

    #[test]
    fn unopenable_log_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be opened for appending
        let log = Arc::new(TrafficLog::new(dir.path()));
        assert!(!log.append(1.0, 1024));

        let clock = TestClock::new(0.0);
        let config = ThrottleConfig::default().trace_log(log);
        let mut engine = ThrottleEngine::with_config(config, clock).unwrap();

        engine.record_exact(700).unwrap();
        assert_eq!(engine.history().current(), 700);
    }
}
