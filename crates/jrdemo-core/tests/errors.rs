#![allow(clippy::unwrap_used)]

use jrdemo_core::error::{ClientCode, DemoError};

#[test]
fn division_by_zero_reads_like_the_failure() {
    let e = DemoError::DivisionByZero;
    assert_eq!(e.to_string(), "division by zero");
    assert_eq!(e.client_code(), ClientCode::Simulated);
}

#[test]
fn timer_misuse_has_its_own_code() {
    assert_eq!(DemoError::TimerNotStarted.client_code().as_str(), "HOOK_MISUSE");
}
