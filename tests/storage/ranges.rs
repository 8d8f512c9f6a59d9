//! Integration tests for typed ranges
//!
//! Tests value and tuple iteration over every layout.

use polyarray_storage::{AosArray, DYNAMIC, ImplicitArray, SoaArray};

// =============================================================================
// Value Ranges
// =============================================================================

#[test]
fn value_ranges_over_every_layout() {
    let aos = AosArray::from_vec(2, vec![1.0f64, 2.0, 3.0, 4.0]).unwrap();
    let soa = SoaArray::from_columns(vec![vec![1.0f64, 3.0], vec![2.0, 4.0]]).unwrap();
    let implicit = ImplicitArray::affine(1.0f64, 1.0, 4).unwrap();

    let expected = vec![1.0, 2.0, 3.0, 4.0];
    assert_eq!(aos.values().to_vec(), expected);
    assert_eq!(soa.values().to_vec(), expected);
    assert_eq!(implicit.values().to_vec(), expected);
}

#[test]
fn value_range_is_exact_size_and_reversible() {
    let array = AosArray::from_vec(1, (0..10).collect::<Vec<u8>>()).unwrap();
    let mut iter = array.values().iter();
    assert_eq!(iter.len(), 10);
    assert_eq!(iter.next_back(), Some(9));
    assert_eq!(iter.next(), Some(0));
    assert_eq!(iter.len(), 8);
    assert_eq!(iter.rev().step_by(3).collect::<Vec<_>>(), vec![8, 5, 2]);
}

#[test]
fn bounded_ranges() {
    let array = SoaArray::from_columns(vec![vec![1, 2, 3, 4], vec![5, 6, 7, 8]]).unwrap();
    assert_eq!(array.values_in(1..3).unwrap().to_vec(), vec![2, 6, 3, 7]);
    let (start, end) = (3, 2);
    assert!(array.values_in(start..end).is_err());
    assert!(array.values_in(0..5).is_err());
    assert!(array.values_in(2..2).unwrap().is_empty());
}

#[test]
fn ranges_cover_only_populated_values() {
    let mut array = AosArray::<i32>::new();
    array.resize(10).unwrap();
    array.resize(3).unwrap();
    assert_eq!(array.values().len(), 3);
    assert_eq!(array.tuples_dyn().len(), 3);
}

// =============================================================================
// Tuple Ranges
// =============================================================================

#[test]
fn fixed_width_tuple_iteration() {
    let array = SoaArray::from_columns(vec![vec![1, 2], vec![3, 4], vec![5, 6]]).unwrap();
    let tuples: Vec<[i32; 3]> = array
        .tuples::<3>()
        .unwrap()
        .into_iter()
        .map(|t| t.to_array())
        .collect();
    assert_eq!(tuples, vec![[1, 3, 5], [2, 4, 6]]);
}

#[test]
fn fixed_width_must_match() {
    let array = AosArray::from_vec(3, vec![0u8; 6]).unwrap();
    let err = array.tuples::<4>().unwrap_err();
    assert!(err.to_string().contains("expected 3, got 4"));
    assert!(array.tuples::<DYNAMIC>().is_ok());
}

#[test]
fn tuple_sub_range() {
    let array = AosArray::from_vec(2, (0..10).collect::<Vec<i64>>()).unwrap();
    let middle = array.tuples_in::<2>(1..4).unwrap();
    assert_eq!(middle.len(), 3);
    let first = middle.get(0).unwrap();
    assert_eq!(first.index(), 1);
    assert_eq!(first.get(1), 3);
    assert!(middle.get(3).is_none());
}

#[test]
fn tuple_components_iterate() {
    let array = ImplicitArray::affine(1u32, 0, 6).unwrap();
    let mut reshaped = AosArray::<u32>::with_components(3).unwrap();
    reshaped.deep_copy(&array).unwrap();
    assert_eq!(reshaped.number_of_components(), 1);

    let sums: Vec<u32> = AosArray::from_vec(3, (0..6).collect::<Vec<u32>>())
        .unwrap()
        .tuples_dyn()
        .iter()
        .map(|t| t.iter().sum())
        .collect();
    assert_eq!(sums, vec![3, 12]);
}

// =============================================================================
// Mutable Ranges
// =============================================================================

#[test]
fn mutable_ranges_write_through() {
    let mut array = SoaArray::from_columns(vec![vec![1.0f32, 2.0], vec![3.0, 4.0]]).unwrap();
    array.values_mut().unwrap().for_each_mut(|_, v| *v *= 2.0);
    array
        .tuples_mut::<2>()
        .unwrap()
        .for_each_mut(|mut t| t.set(0, t.get(0) + t.get(1)));
    assert_eq!(array.column(0), &[8.0, 12.0]);
    assert_eq!(array.column(1), &[6.0, 8.0]);
}

#[test]
fn mutable_range_fill() {
    let mut array = AosArray::from_vec(1, vec![0u8; 4]).unwrap();
    let mut values = array.values_mut().unwrap();
    values.fill(7);
    assert_eq!(values.as_range().to_vec(), vec![7; 4]);
}
