//! Tests for the repetition counter state machine

use std::sync::Arc;
use std::time::Duration;

use squat_coach::clock::ManualClock;
use squat_coach::config::CounterConfig;
use squat_coach::rep_counter::{RepCounter, SquatState};

fn new_counter() -> (Arc<ManualClock>, RepCounter) {
    let clock = Arc::new(ManualClock::new());
    let counter = RepCounter::new(CounterConfig::default(), clock.clone());
    (clock, counter)
}

/// Feed a sequence of angles, advancing the clock between updates,
/// returning how many updates reported a completed rep.
fn drive(counter: &mut RepCounter, clock: &ManualClock, step: Duration, angles: &[f32]) -> u32 {
    let mut completed = 0;
    for &angle in angles {
        clock.advance(step);
        if counter.update(angle) {
            completed += 1;
        }
    }
    completed
}

#[test]
fn test_full_cycle_counts_exactly_one_rep() {
    let (clock, mut counter) = new_counter();

    // 180 down to 60 and back up, monotonic in each direction
    let mut angles: Vec<f32> = (6..=18).rev().map(|a| a as f32 * 10.0).collect();
    angles.extend((6..=18).map(|a| a as f32 * 10.0));

    let completed = drive(&mut counter, &clock, Duration::from_millis(100), &angles);
    assert_eq!(completed, 1);

    let snapshot = counter.snapshot();
    assert_eq!(snapshot.rep_count, 1);
    assert_eq!(snapshot.state, SquatState::Standing);
    assert!(snapshot.is_tracking);
}

#[test]
fn test_state_sequence_through_cycle() {
    let (clock, mut counter) = new_counter();
    let step = Duration::from_millis(100);

    let expectations = [
        (178.0, SquatState::Standing),
        (150.0, SquatState::Descending),
        (100.0, SquatState::Descending),
        (85.0, SquatState::Bottom),
        (100.0, SquatState::Ascending),
        (150.0, SquatState::Ascending),
        (178.0, SquatState::Standing),
    ];
    for (angle, expected) in expectations {
        clock.advance(step);
        counter.update(angle);
        assert_eq!(counter.snapshot().state, expected, "after angle {angle}");
    }
    assert_eq!(counter.rep_count(), 1);
}

#[test]
fn test_shallow_bounce_counts_nothing() {
    let (clock, mut counter) = new_counter();

    // Never reaches the bottom threshold, so no rep on return
    let completed = drive(
        &mut counter,
        &clock,
        Duration::from_millis(100),
        &[150.0, 110.0, 100.0, 130.0, 165.0],
    );
    assert_eq!(completed, 0);
    assert_eq!(counter.snapshot().state, SquatState::Standing);
    assert_eq!(counter.rep_count(), 0);
}

#[test]
fn test_cooldown_blocks_double_count() {
    let (clock, mut counter) = new_counter();
    let step = Duration::from_millis(50);

    // First full cycle: rep 1 completes on the 165 update
    drive(&mut counter, &clock, step, &[150.0, 85.0, 100.0, 165.0]);
    assert_eq!(counter.rep_count(), 1);

    // Second cycle rushed inside the 0.5 s cooldown window
    drive(&mut counter, &clock, step, &[85.0, 85.0, 100.0, 165.0, 170.0]);
    assert_eq!(counter.rep_count(), 1, "second cycle inside cooldown must not count");
    // The completion transition is blocked, not redirected
    assert_eq!(counter.snapshot().state, SquatState::Ascending);

    // Once the cooldown lapses, the held ascent completes normally
    clock.advance(Duration::from_millis(500));
    assert!(counter.update(170.0));
    assert_eq!(counter.rep_count(), 2);
    assert_eq!(counter.snapshot().state, SquatState::Standing);
}

#[test]
fn test_rep_after_cooldown_counts_normally() {
    let (clock, mut counter) = new_counter();
    let step = Duration::from_millis(200);

    drive(&mut counter, &clock, step, &[150.0, 85.0, 100.0, 165.0]);
    assert_eq!(counter.rep_count(), 1);

    // Well-spaced second cycle: each update is 200 ms apart, so the
    // completing transition lands past the cooldown
    drive(&mut counter, &clock, step, &[150.0, 85.0, 100.0, 165.0]);
    assert_eq!(counter.rep_count(), 2);
}

#[test]
fn test_tracking_timeout_resets_to_standing() {
    let (clock, mut counter) = new_counter();
    let step = Duration::from_millis(100);

    drive(&mut counter, &clock, step, &[150.0, 85.0]);
    assert_eq!(counter.snapshot().state, SquatState::Bottom);

    clock.advance(Duration::from_secs(2));
    let snapshot = counter.snapshot();
    assert_eq!(snapshot.state, SquatState::Standing);
    assert!(!snapshot.is_tracking);
    // The forced reset is not a completion transition
    assert_eq!(snapshot.rep_count, 0);

    // A new update resumes tracking from standing
    counter.update(150.0);
    let snapshot = counter.snapshot();
    assert!(snapshot.is_tracking);
    assert_eq!(snapshot.state, SquatState::Descending);
}

#[test]
fn test_timeout_from_ascending_does_not_count() {
    let (clock, mut counter) = new_counter();
    let step = Duration::from_millis(100);

    drive(&mut counter, &clock, step, &[150.0, 85.0, 120.0]);
    assert_eq!(counter.snapshot().state, SquatState::Ascending);

    clock.advance(Duration::from_secs(3));
    let snapshot = counter.snapshot();
    assert_eq!(snapshot.state, SquatState::Standing);
    assert_eq!(snapshot.rep_count, 0);
}

#[test]
fn test_reset_is_idempotent() {
    let (clock, mut counter) = new_counter();

    drive(
        &mut counter,
        &clock,
        Duration::from_millis(100),
        &[150.0, 85.0, 100.0, 165.0],
    );
    assert_eq!(counter.rep_count(), 1);

    counter.reset();
    let first = counter.snapshot();
    counter.reset();
    let second = counter.snapshot();

    assert_eq!(first, second);
    assert_eq!(first.rep_count, 0);
    assert_eq!(first.state, SquatState::Standing);
    assert_eq!(first.knee_angle, 180.0);
    assert!(!first.is_tracking);
    assert_eq!(first.cooldown_remaining, Duration::ZERO);
}

#[test]
fn test_snapshot_reports_cooldown_remaining() {
    let (clock, mut counter) = new_counter();

    drive(
        &mut counter,
        &clock,
        Duration::from_millis(100),
        &[150.0, 85.0, 100.0, 165.0],
    );
    let snapshot = counter.snapshot();
    assert_eq!(snapshot.cooldown_remaining, Duration::from_millis(500));

    clock.advance(Duration::from_millis(200));
    assert_eq!(counter.snapshot().cooldown_remaining, Duration::from_millis(300));

    clock.advance(Duration::from_millis(400));
    assert_eq!(counter.snapshot().cooldown_remaining, Duration::ZERO);
}
