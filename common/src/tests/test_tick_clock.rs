use crate::test_helper::manual_tick_clock::{ManualTickClock, set_tick_step};
use crate::tick_clock::{MonotonicClock, TickClock};
use std::time::Duration;

#[test]
fn monotonic_clock_reports_zero_before_reset() {
    let mut clock = MonotonicClock::new();
    assert_eq!(clock.lap(), Duration::ZERO);
}

#[test]
fn monotonic_clock_measures_between_laps() {
    let mut clock = MonotonicClock::new();
    clock.reset();
    std::thread::sleep(Duration::from_millis(20));
    let first = clock.lap();
    assert!(first >= Duration::from_millis(20));

    let second = clock.lap();
    assert!(second < first);
}

#[test]
fn manual_clock_reports_configured_step() {
    let mut clock = ManualTickClock::new(Duration::from_millis(500));
    assert_eq!(clock.lap(), Duration::from_millis(500));

    set_tick_step(&clock.sender(), Duration::from_secs(2));
    assert_eq!(clock.lap(), Duration::from_secs(2));
    assert_eq!(clock.lap(), Duration::from_secs(2));
    assert_eq!(clock.laps(), 3);
}
