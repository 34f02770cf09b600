//! Boundary and end-to-end scenario tests.
//!
//! Index and length extremes, saturation and clamping behavior, the
//! hash-shape stress pattern, and full scenarios that combine storage,
//! prototype and sort behavior.

use skua_value::{Value, MAX_INDEX};

use crate::array::{ArrayObject, MAX_LENGTH};
use crate::proto::ProtoRef;
use crate::sort::{SortFlags, SortOutcome, SORT_LENGTH_LIMIT};
use crate::storage::StorageShape;

fn array() -> ArrayObject {
    ArrayObject::new(ProtoRef::new())
}

fn num_at(a: &ArrayObject, i: u32) -> f64 {
    a.get_element(i).coerce_to_number()
}

// ============================================================================
// INDEX AND LENGTH BOUNDARIES
// ============================================================================

#[test]
fn test_index_zero() {
    let mut a = array();
    a.set_element(0, Value::from(1.0));
    assert_eq!(a.length(), 1);
    assert!(a.has_element(0));
    assert!(a.delete_element(0));
    assert_eq!(a.length(), 1);
}

#[test]
fn test_maximum_index() {
    let mut a = array();
    a.set_element(MAX_INDEX, Value::from(7.0));
    assert_eq!(a.length(), MAX_LENGTH);
    assert_eq!(a.storage_shape(), StorageShape::Hash);
    assert!(a.has_element(MAX_INDEX));
    assert_eq!(num_at(&a, MAX_INDEX), 7.0);
}

#[test]
fn test_sentinel_never_stored_but_proto_visible() {
    let a = ArrayObject::with_length(ProtoRef::new(), MAX_LENGTH);
    assert!(!a.has_element(u32::MAX));
    assert!(!a.has_own_element(u32::MAX));

    let proto = ProtoRef::new();
    proto.write().set("4294967295", Value::from("ghost"));
    let b = ArrayObject::new(proto);
    assert!(!b.has_own_element(u32::MAX));
    assert!(b.has_element(u32::MAX));
    assert_eq!(b.get_element(u32::MAX).coerce_to_string(), "ghost");
}

#[test]
fn test_push_saturates_at_maximum_length() {
    let mut a = array();
    a.set_element(MAX_INDEX, Value::from(1.0));
    assert_eq!(a.length(), MAX_LENGTH);
    // Full: the push is a silent no-op.
    assert_eq!(a.push(Value::from(2.0)), MAX_LENGTH);
    assert_eq!(a.length(), MAX_LENGTH);
    assert_eq!(num_at(&a, MAX_INDEX), 1.0);
    // pop still works and frees the last slot again.
    assert_eq!(a.pop().coerce_to_number(), 1.0);
    assert_eq!(a.length(), MAX_INDEX);
    assert_eq!(a.push(Value::from(3.0)), MAX_LENGTH);
    assert_eq!(num_at(&a, MAX_INDEX), 3.0);
}

#[test]
fn test_push_many_clamps_at_maximum_length() {
    let mut a = ArrayObject::with_length(ProtoRef::new(), MAX_LENGTH - 2);
    let new_len = a.push_many(&[
        Value::from(1.0),
        Value::from(2.0),
        Value::from(3.0),
        Value::from(4.0),
    ]);
    assert_eq!(new_len, MAX_LENGTH);
    assert_eq!(num_at(&a, MAX_LENGTH - 2), 1.0);
    assert_eq!(num_at(&a, MAX_INDEX), 2.0);
}

#[test]
fn test_pop_and_shift_on_empty() {
    let mut a = array();
    assert!(a.pop().is_undefined());
    assert_eq!(a.length(), 0);
    assert!(a.shift().is_undefined());
    assert_eq!(a.length(), 0);
}

#[test]
fn test_length_one() {
    let mut a = array();
    a.push(Value::from(5.0));
    assert_eq!(a.shift().coerce_to_number(), 5.0);
    assert_eq!(a.length(), 0);
    assert_eq!(a.storage_shape(), StorageShape::Empty);
}

// ============================================================================
// ROUND-TRIP LAWS
// ============================================================================

#[test]
fn test_push_pop_restores_state() {
    let mut a = array();
    a.set_element(0, Value::from(1.0));
    a.set_element(5, Value::from(2.0));
    let before_len = a.length();
    let before_count = a.present_count();

    a.push(Value::from(9.0));
    let back = a.pop();
    assert_eq!(back.coerce_to_number(), 9.0);
    assert_eq!(a.length(), before_len);
    assert_eq!(a.present_count(), before_count);
    assert_eq!(num_at(&a, 5), 2.0);
}

#[test]
fn test_unshift_shift_restores_state() {
    let mut a = array();
    a.set_element(2, Value::from(2.0));
    a.unshift(&[Value::from(9.0)]);
    let back = a.shift();
    assert_eq!(back.coerce_to_number(), 9.0);
    assert_eq!(a.length(), 3);
    assert!(!a.has_element(0));
    assert!(!a.has_element(1));
    assert_eq!(num_at(&a, 2), 2.0);
}

#[test]
fn test_set_delete_leaves_a_hole() {
    let mut a = array();
    a.set_element(0, Value::from(1.0));
    // Beyond the old length: delete removes the cell, length keeps the
    // high-water mark set() established.
    a.set_element(10, Value::from(2.0));
    assert!(a.delete_element(10));
    assert!(!a.has_element(10));
    assert_eq!(a.length(), 11);
    // Overwriting an existing slot and deleting leaves a hole, not the old
    // value.
    a.set_element(0, Value::from(3.0));
    assert!(a.delete_element(0));
    assert!(!a.has_element(0));
}

// ============================================================================
// WORKLOAD SHAPES
// ============================================================================

#[test]
fn test_dense_prefix_workload() {
    let mut a = array();
    for i in 0..2000 {
        a.push(Value::from(i as f64));
    }
    assert_eq!(a.storage_shape(), StorageShape::Dense);
    assert_eq!(a.length(), 2000);
    assert_eq!(a.present_count(), 2000);
    for i in [0, 1, 999, 1998, 1999] {
        assert_eq!(num_at(&a, i), i as f64);
    }
    for _ in 0..2000 {
        a.pop();
    }
    assert_eq!(a.length(), 0);
    assert_eq!(a.storage_shape(), StorageShape::Empty);
}

#[test]
fn test_sparse_stride_workload() {
    // Writes at k * 2^26 - 2 for k = 1..=64; the last lands exactly on the
    // maximum valid index.
    let mut a = array();
    for k in 1..=64u64 {
        let i = (k * (1 << 26) - 2) as u32;
        a.set_element(i, Value::from(k as f64));
    }
    assert_eq!(a.storage_shape(), StorageShape::Hash);
    assert_eq!(a.length(), MAX_LENGTH);
    assert_eq!(a.present_count(), 64);
    for k in 1..=64u64 {
        let i = (k * (1 << 26) - 2) as u32;
        assert!(a.has_element(i));
        assert_eq!(num_at(&a, i), k as f64);
        assert!(!a.has_element(i - 1));
    }
    let mut seen = 0;
    a.for_each(|_, _| seen += 1);
    assert_eq!(seen, 64);
}

#[test]
fn test_interleaved_transitions_stay_transparent() {
    let mut a = array();
    for i in 0..100 {
        a.set_element(i, Value::from(i as f64));
    }
    for i in (0..100).step_by(2) {
        a.delete_element(i);
    }
    a.set_element(90_000, Value::from(-1.0));
    a.set_length(80);
    for i in 0..40 {
        a.set_element(i, Value::from(i as f64 * 10.0));
    }
    assert_eq!(a.length(), 80);
    for i in 0..40 {
        assert_eq!(num_at(&a, i), i as f64 * 10.0);
    }
    for i in 40..80 {
        let odd = i % 2 == 1;
        assert_eq!(a.has_element(i), odd);
        if odd {
            assert_eq!(num_at(&a, i), i as f64);
        }
    }
    assert!(!a.has_element(90_000));
}

// ============================================================================
// END-TO-END SCENARIOS
// ============================================================================

#[test]
fn test_scenario_sparse_extension_then_truncate() {
    let mut a = array();
    a.set_element(10, Value::from("a"));
    a.set_element(1_000_000, Value::from("b"));
    assert_eq!(a.length(), 1_000_001);
    assert!(a.has_element(10));
    assert!(a.has_element(1_000_000));
    assert!(!a.has_element(500));
    assert!(a.get_element(500).is_undefined());

    a.set_length(500);
    assert_eq!(a.length(), 500);
    assert!(a.has_element(10));
    assert!(!a.has_element(1_000_000));
}

#[test]
fn test_scenario_push_pop_past_empty() {
    let mut a = array();
    assert!(a.pop().is_undefined());
    assert_eq!(a.length(), 0);
    assert_eq!(a.push(Value::from("x")), 1);
    assert_eq!(a.length(), 1);
    assert_eq!(a.pop().coerce_to_string(), "x");
    assert_eq!(a.length(), 0);
    assert!(a.pop().is_undefined());
    assert_eq!(a.length(), 0);
}

#[test]
fn test_scenario_unshift_overflow_clamp() {
    // Length 2^32 - 10 with the last 15 slots populated.
    let start_len = MAX_LENGTH - 9;
    let mut a = ArrayObject::with_length(ProtoRef::new(), start_len);
    for j in 0..15u32 {
        let i = start_len - 15 + j;
        a.set_element(i, Value::from(j as f64));
    }

    let values: Vec<Value> = (0..20).map(|j| Value::from(j as f64 * 100.0)).collect();
    let new_len = a.unshift(&values);
    assert_eq!(new_len, MAX_LENGTH);
    assert_eq!(a.length(), MAX_LENGTH);

    // The first 20 indices hold the unshifted values.
    for j in 0..20u32 {
        assert_eq!(num_at(&a, j), j as f64 * 100.0);
    }
    // Of the 15 stored tail values, the 11 that would slide past the last
    // valid index were dropped; the other 4 moved up by 20.
    assert_eq!(a.present_count(), 24);
    for j in 0..4u32 {
        let new_index = start_len - 15 + j + 20;
        assert_eq!(num_at(&a, new_index), j as f64);
    }
    assert_eq!(a.get_element(MAX_INDEX).coerce_to_number(), 3.0);
}

#[test]
fn test_scenario_sort_with_prototype_contribution() {
    let proto = ProtoRef::new();
    proto.write().set("2", Value::from("p"));
    let mut a = ArrayObject::with_length(proto.clone(), 5);

    assert!(matches!(a.sort(SortFlags::empty()), SortOutcome::Sorted));
    assert_eq!(a.length(), 5);
    assert_eq!(a.get_element(0).coerce_to_string(), "p");
    assert!(a.has_own_element(0));
    for i in 1..5 {
        assert!(!a.has_own_element(i));
    }

    // The sorted array owns the value; dropping the prototype entry
    // changes nothing.
    proto.write().delete("2");
    assert_eq!(a.get_element(0).coerce_to_string(), "p");
    assert!(!a.has_element(2));
}

#[test]
fn test_scenario_unique_sort_fails_on_duplicates() {
    let mut a = ArrayObject::from_values(
        ProtoRef::new(),
        [3.0, 1.0, 2.0, 2.0, 4.0].iter().copied().map(Value::from).collect(),
    );
    let outcome = a.sort(SortFlags::UNIQUESORT | SortFlags::NUMERIC);
    assert!(matches!(outcome, SortOutcome::Duplicate));
    for (i, expected) in [3.0, 1.0, 2.0, 2.0, 4.0].iter().enumerate() {
        assert_eq!(num_at(&a, i as u32), *expected);
    }
}

#[test]
fn test_oversize_sort_is_untouched() {
    let mut a = ArrayObject::with_length(ProtoRef::new(), SORT_LENGTH_LIMIT + 1);
    a.set_element(1, Value::from(2.0));
    a.set_element(3, Value::from(1.0));
    assert!(matches!(a.sort(SortFlags::NUMERIC), SortOutcome::Untouched));
    assert_eq!(num_at(&a, 1), 2.0);
    assert_eq!(num_at(&a, 3), 1.0);
    assert_eq!(a.length(), SORT_LENGTH_LIMIT + 1);
}

#[test]
fn test_sort_at_the_length_limit_runs() {
    let mut a = ArrayObject::with_length(ProtoRef::new(), SORT_LENGTH_LIMIT);
    a.set_element(10, Value::from(2.0));
    a.set_element(20, Value::from(1.0));
    assert!(matches!(a.sort(SortFlags::NUMERIC), SortOutcome::Sorted));
    assert_eq!(num_at(&a, 0), 1.0);
    assert_eq!(num_at(&a, 1), 2.0);
    assert_eq!(a.length(), SORT_LENGTH_LIMIT);
}
