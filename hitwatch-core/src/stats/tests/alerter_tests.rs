use crate::stats::alerter::{AlertState, AlertTransition, TransitionKind, WindowAlerter};
use pretty_assertions::assert_eq;

fn alerter() -> WindowAlerter {
    // 3 events within 4 seconds raise the alert.
    WindowAlerter::new(3, 4)
}

fn high(at: i64) -> AlertTransition {
    AlertTransition::new(TransitionKind::EnterHigh, at)
}

fn low(at: i64) -> AlertTransition {
    AlertTransition::new(TransitionKind::EnterLow, at)
}

#[test]
fn not_enough_events_never_alerts() {
    let alerter = alerter();

    alerter.evaluate(8);
    assert!(alerter.drain_alerts().is_empty());

    alerter.add_event(6);
    alerter.evaluate(8);
    assert!(alerter.drain_alerts().is_empty());

    alerter.add_event(7);
    alerter.evaluate(1_000);
    assert!(alerter.drain_alerts().is_empty());
    assert_eq!(alerter.state(), AlertState::Low);
}

#[test]
fn oldest_event_outside_window_does_not_alert() {
    // Arrange
    let alerter = alerter();
    alerter.add_event(3); // 8 - 3 > 4
    alerter.add_event(4);
    alerter.add_event(6);

    // Act
    let transition = alerter.evaluate(8);

    // Assert
    assert_eq!(transition, None);
    assert!(alerter.drain_alerts().is_empty());
}

#[test]
fn alert_raised_recovered_and_raised_again() {
    let alerter = alerter();

    alerter.add_event(4);
    alerter.add_event(5);
    alerter.add_event(7);
    alerter.evaluate(8);
    assert_eq!(alerter.drain_alerts(), vec![high(8)]);
    assert!(alerter.drain_alerts().is_empty());

    // Another qualifying event keeps the state.
    alerter.add_event(8);
    alerter.evaluate(8);
    assert!(alerter.drain_alerts().is_empty());
    assert_eq!(alerter.state(), AlertState::High);

    // Window slides past the oldest stored event.
    alerter.evaluate(10);
    assert_eq!(alerter.drain_alerts(), vec![low(10)]);

    alerter.add_event(9);
    alerter.evaluate(10);
    assert_eq!(alerter.drain_alerts(), vec![high(10)]);
}

#[test]
fn transitions_accumulate_until_drained() {
    // Arrange
    let alerter = alerter();
    alerter.add_event(4);
    alerter.add_event(5);
    alerter.add_event(7);

    // Act
    alerter.evaluate(8); // Low -> High

    alerter.add_event(8);
    alerter.evaluate(10); // High -> Low

    alerter.add_event(9);
    alerter.evaluate(11); // Low -> High

    // Assert
    assert_eq!(alerter.drain_alerts(), vec![high(8), low(10), high(11)]);
    assert!(alerter.drain_alerts().is_empty());
}

#[test]
fn event_exactly_at_window_start_counts() {
    let alerter = alerter();
    alerter.add_event(6);
    alerter.add_event(6);
    alerter.add_event(10);

    assert_eq!(alerter.evaluate(10), Some(high(10)));
    assert_eq!(alerter.evaluate(11), Some(low(11)));
}

#[test]
fn earlier_timestamp_is_clamped_to_latest() {
    // Arrange
    let alerter = alerter();

    // Act
    alerter.add_event(10);
    alerter.add_event(3);

    // Assert
    assert_eq!(alerter.stored_timestamps(), vec![10, 10]);
}

#[test]
fn clamping_uses_newest_slot_after_wraparound() {
    // Arrange
    let alerter = alerter();
    for ts in [1, 2, 3, 4] {
        alerter.add_event(ts);
    }

    // Act
    alerter.add_event(0);

    // Assert
    assert_eq!(alerter.stored_timestamps(), vec![3, 4, 4]);
}

#[test]
fn buffer_keeps_only_the_most_recent_events() {
    let alerter = alerter();
    for ts in 1..=7 {
        alerter.add_event(ts);
    }

    assert_eq!(alerter.stored_timestamps(), vec![5, 6, 7]);
    assert_eq!(alerter.evaluate(9), Some(high(9)));
}

#[test]
fn clamped_events_keep_window_decisions_sorted() {
    // Skewed timestamps collapse onto the newest one and count as recent.
    let alerter = alerter();
    alerter.add_event(20);
    alerter.add_event(2);
    alerter.add_event(1);

    assert_eq!(alerter.evaluate(21), Some(high(21)));
}

#[test]
fn zero_threshold_behaves_as_one() {
    let alerter = WindowAlerter::new(0, 4);
    assert_eq!(alerter.min_count(), 1);

    alerter.add_event(5);
    assert_eq!(alerter.evaluate(6), Some(high(6)));
    assert_eq!(alerter.evaluate(10), Some(low(10)));
}

#[test]
fn huge_threshold_does_not_preallocate() {
    // Arrange
    let alerter = WindowAlerter::new(usize::MAX, 120);

    // Act
    alerter.add_event(1);
    alerter.add_event(2);

    // Assert
    assert_eq!(alerter.stored_timestamps(), vec![1, 2]);
    assert_eq!(alerter.evaluate(3), None);
    assert_eq!(alerter.state(), AlertState::Low);
}
