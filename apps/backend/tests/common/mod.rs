#![allow(dead_code)]

// tests/common/mod.rs
use std::time::Duration;

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Short pauses keep flows that sit out a round or exchange pause fast.
pub const ROUND_PAUSE_MS: u64 = 40;
pub const EXCHANGE_PAUSE_MS: u64 = 40;

pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

pub fn test_state() -> drieslag::AppState {
    drieslag::AppState::for_tests(ROUND_PAUSE_MS, EXCHANGE_PAUSE_MS)
}
