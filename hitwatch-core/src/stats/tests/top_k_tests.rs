use crate::stats::top_k::{TopKError, TopKTracker};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashMap;

fn tracker_with(counts: &[(&'static str, u64)]) -> TopKTracker<&'static str> {
    let mut tracker = TopKTracker::new();
    for (key, count) in counts {
        tracker.increment(*key, *count);
    }
    tracker
}

fn assert_heap<K: std::hash::Hash + Eq + Clone + std::fmt::Debug>(tracker: &TopKTracker<K>) {
    let entries = tracker.entries();
    for i in 1..entries.len() {
        let parent = (i - 1) / 2;
        assert!(
            entries[i].1 <= entries[parent].1,
            "heap violated at index {i}: {} > {}",
            entries[i].1,
            entries[parent].1
        );
    }
    assert_eq!(tracker.tracked_keys(), entries.len());
    for (i, (key, _)) in entries.iter().enumerate() {
        assert_eq!(tracker.slot_of(key), Some(i), "stale position for {key:?}");
    }
}

//-----------------------------------------------------------------------------
// increment / len
//-----------------------------------------------------------------------------

#[test]
fn increment_inserts_new_keys_with_amount() {
    // Arrange
    let mut tracker = TopKTracker::new();

    // Act
    tracker.increment("/api", 1);
    tracker.increment("/health", 4);

    // Assert
    assert_eq!(tracker.len(), 2);
    assert_eq!(tracker.pop_max(), Ok(("/health", 4)));
    assert_eq!(tracker.pop_max(), Ok(("/api", 1)));
}

#[test]
fn repeated_increment_moves_key_to_root() {
    // Arrange
    let mut tracker = tracker_with(&[("a", 5), ("b", 3), ("c", 1)]);

    // Act
    tracker.increment("c", 10);

    // Assert
    assert_eq!(tracker.len(), 3);
    assert_eq!(tracker.entries()[0], ("c", 11));
    assert_heap(&tracker);
}

#[test]
fn empty_tracker_reports_empty() {
    let mut tracker: TopKTracker<String> = TopKTracker::new();

    assert!(tracker.is_empty());
    assert_eq!(tracker.pop_max(), Err(TopKError::Empty));
    assert!(tracker.top_k(3).is_empty());
}

//-----------------------------------------------------------------------------
// top_k
//-----------------------------------------------------------------------------

#[test]
fn top_k_returns_highest_counts() {
    // Arrange
    let mut tracker = tracker_with(&[("A", 5), ("B", 3), ("C", 9), ("D", 1)]);

    // Act
    let top = tracker.top_k(2);

    // Assert
    assert_eq!(top, HashMap::from([("C", 9), ("A", 5)]));
}

#[test]
fn top_k_leaves_tracker_unchanged() {
    // Arrange
    let mut tracker = tracker_with(&[("A", 5), ("B", 3), ("C", 9), ("D", 1)]);

    // Act
    let first = tracker.top_k(3);
    let second = tracker.top_k(3);

    // Assert
    assert_eq!(first, second);
    assert_eq!(tracker.len(), 4);
    assert_heap(&tracker);

    let mut drained = Vec::new();
    while let Ok(entry) = tracker.pop_max() {
        drained.push(entry);
    }
    assert_eq!(drained, vec![("C", 9), ("A", 5), ("B", 3), ("D", 1)]);
}

#[test]
fn top_k_larger_than_size_returns_everything() {
    // Arrange
    let mut tracker = tracker_with(&[("x", 2), ("y", 7)]);

    // Act
    let top = tracker.top_k(10);

    // Assert
    assert_eq!(top, HashMap::from([("x", 2), ("y", 7)]));
    assert_eq!(tracker.len(), 2);
}

#[test]
fn increments_after_top_k_still_accumulate() {
    // Arrange
    let mut tracker = tracker_with(&[("a", 3), ("b", 2)]);
    tracker.top_k(2);

    // Act
    tracker.increment("b", 5);

    // Assert
    assert_eq!(tracker.top_k(1), HashMap::from([("b", 7)]));
}

//-----------------------------------------------------------------------------
// properties
//-----------------------------------------------------------------------------

proptest! {
    #[test]
    fn heap_property_holds_after_any_increments(ops in proptest::collection::vec((0u8..16, 1u64..5), 0..200)) {
        let mut tracker = TopKTracker::new();
        for (key, amount) in ops {
            tracker.increment(key, amount);
        }

        let entries = tracker.entries();
        for i in 1..entries.len() {
            prop_assert!(entries[i].1 <= entries[(i - 1) / 2].1);
        }
        prop_assert_eq!(tracker.tracked_keys(), entries.len());
        for (i, (key, _)) in entries.iter().enumerate() {
            prop_assert_eq!(tracker.slot_of(key), Some(i));
        }
    }

    #[test]
    fn top_k_matches_sorted_totals(ops in proptest::collection::vec((0u8..12, 1u64..4), 1..150), k in 1usize..6) {
        let mut tracker = TopKTracker::new();
        let mut totals: HashMap<u8, u64> = HashMap::new();
        for (key, amount) in ops {
            tracker.increment(key, amount);
            *totals.entry(key).or_insert(0) += amount;
        }

        let len_before = tracker.len();
        let top = tracker.top_k(k);

        let mut expected: Vec<u64> = totals.values().copied().collect();
        expected.sort_unstable_by(|a, b| b.cmp(a));
        expected.truncate(k);
        let mut got: Vec<u64> = top.values().copied().collect();
        got.sort_unstable_by(|a, b| b.cmp(a));

        prop_assert_eq!(got, expected);
        prop_assert_eq!(tracker.len(), len_before);
        for (i, (key, _)) in tracker.entries().iter().enumerate() {
            prop_assert_eq!(tracker.slot_of(key), Some(i));
        }
        for (key, count) in &top {
            prop_assert_eq!(totals.get(key), Some(count));
        }
    }
}
