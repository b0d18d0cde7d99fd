// tests/throttle/main.rs

// test modules
mod config_tests;
mod speed_tests;
mod trace_log_tests;
