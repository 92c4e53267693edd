use super::*;

#[test]
fn fixed_clock_advances_by_exact_delta() {
    let clock = FixedClock::new(1_000);
    assert_eq!(clock.now(), 1_000);
    clock.advance(500);
    assert_eq!(clock.now(), 1_500);
}

#[test]
fn fixed_clock_set_overrides_value() {
    let clock = FixedClock::new(0);
    clock.set(42);
    assert_eq!(clock.now(), 42);
}

#[test]
fn system_clock_now_is_positive_and_monotonic_non_decreasing() {
    let clock = SystemClock;
    let a = clock.now();
    let b = clock.now();
    assert!(a > 0);
    assert!(b >= a);
}
