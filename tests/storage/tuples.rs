//! Integration tests for tuple operations
//!
//! Tests tuple insertion, removal, copying, and interpolation.

use polyarray_storage::{AosArray, DataArray, ImplicitArray, SoaArray};

// =============================================================================
// Insertion
// =============================================================================

#[test]
fn insert_tuple_past_end_grows() {
    let mut array = AosArray::<i32>::with_components(2).unwrap();
    array.insert_tuple(3, &[7, 8]).unwrap();
    assert_eq!(array.number_of_tuples(), 4);
    assert_eq!(array.tuple(3), vec![7, 8]);
    assert_eq!(array.tuple(0), vec![0, 0]);
}

#[test]
fn insert_component_and_value() {
    let mut array = SoaArray::<u8>::with_components(3).unwrap();
    array.insert_component(1, 2, 5).unwrap();
    assert_eq!(array.number_of_tuples(), 2);
    assert_eq!(array.component(1, 2), 5);

    array.insert_value(9, 4).unwrap();
    assert_eq!(array.number_of_tuples(), 4);
    assert_eq!(array.value(9), 4);
}

#[test]
fn set_tuple_requires_populated_tuple() {
    let mut array = AosArray::from_vec(2, vec![1, 2]).unwrap();
    assert!(array.set_tuple(1, &[3, 4]).is_err());
    array.set_tuple(0, &[3, 4]).unwrap();
    assert_eq!(array.as_slice(), &[3, 4]);
}

#[test]
fn tuple_into_buffer() {
    let array = SoaArray::from_columns(vec![vec![1.5f32], vec![2.5]]).unwrap();
    let mut buffer = [0.0f32; 2];
    array.tuple_into(0, &mut buffer).unwrap();
    assert_eq!(buffer, [1.5, 2.5]);
}

#[test]
fn tuple_into_rejects_short_buffer() {
    let array = AosArray::from_vec(3, vec![1u16, 2, 3]).unwrap();
    let mut short = [9u16; 2];
    let err = array.tuple_into(0, &mut short).unwrap_err();
    assert_eq!(err.to_string(), "component mismatch: expected 3, got 2");
    assert_eq!(short, [9, 9]);

    let mut long = [9u16; 4];
    array.tuple_into(0, &mut long).unwrap();
    assert_eq!(long, [1, 2, 3, 9]);
}

// =============================================================================
// Tuples From Another Array
// =============================================================================

/// Three two-component tuples; the last is beyond `f64` precision.
fn wide_source() -> SoaArray<i64> {
    SoaArray::from_columns(vec![vec![0, 10, (1 << 53) + 1], vec![1, 11, i64::MAX - 1]]).unwrap()
}

#[test]
fn set_tuple_from_other_layout() {
    let source = wide_source();
    let mut target = AosArray::from_vec(2, vec![0i64; 4]).unwrap();
    target.set_tuple_from(1, 2, &source).unwrap();
    assert_eq!(target.tuple(1), vec![(1 << 53) + 1, i64::MAX - 1]);
    assert_eq!(target.tuple(0), vec![0, 0]);

    // Only populated tuples may be overwritten.
    assert!(target.set_tuple_from(2, 0, &source).is_err());
    assert_eq!(target.number_of_tuples(), 2);
}

#[test]
fn insert_tuple_from_grows_and_casts() {
    let source = wide_source();
    let mut target = AosArray::<f32>::with_components(2).unwrap();
    target.insert_tuple_from(2, 1, &source).unwrap();
    assert_eq!(target.number_of_tuples(), 3);
    assert_eq!(target.tuple(2), vec![10.0, 11.0]);

    assert_eq!(target.insert_next_tuple_from(0, &source).unwrap(), 3);
    assert_eq!(target.tuple(3), vec![0.0, 1.0]);
}

#[test]
fn tuple_from_checks_source() {
    let source = wide_source();
    let mut target = AosArray::<i64>::with_components(2).unwrap();
    let err = target.insert_tuple_from(0, 3, &source).unwrap_err();
    assert_eq!(err.to_string(), "index out of bounds: 3 (length 3)");

    let mut narrow = AosArray::<i64>::with_components(1).unwrap();
    assert!(narrow.insert_next_tuple_from(0, &source).is_err());
    assert!(target.is_empty());
    assert!(narrow.is_empty());
}

#[test]
fn tuple_from_into_read_only_fails() {
    let source = ImplicitArray::affine(1i32, 0, 3).unwrap();
    let mut target = ImplicitArray::affine(2i32, 0, 3).unwrap();
    assert!(target.set_tuple_from(0, 1, &source).unwrap_err().is_read_only());
    assert!(target.insert_tuples_from(&[0], &[1], &source).unwrap_err().is_read_only());
    assert_eq!(target.value(0), 0);
}

#[test]
fn insert_tuples_from_maps_pairs() {
    let source = ImplicitArray::affine(3u8, 1, 5).unwrap();
    let mut target = AosArray::<u8>::new();
    target.insert_tuples_from(&[4, 0, 2], &[0, 4, 2], &source).unwrap();
    assert_eq!(target.number_of_tuples(), 5);
    assert_eq!(target.tuple(4), vec![1]);
    assert_eq!(target.tuple(0), vec![13]);
    assert_eq!(target.tuple(2), vec![7]);

    // Later pairs win on a repeated target.
    target.insert_tuples_from(&[1, 1], &[1, 3], &source).unwrap();
    assert_eq!(target.tuple(1), vec![10]);
}

#[test]
fn insert_tuples_from_validates_before_writing() {
    let source = AosArray::from_vec(1, vec![5i32, 6]).unwrap();
    let mut target = AosArray::from_vec(1, vec![0i32]).unwrap();

    assert!(target.insert_tuples_from(&[0, 1], &[1], &source).is_err());
    assert!(target.insert_tuples_from(&[0, 7], &[1, 2], &source).is_err());
    assert_eq!(target.as_slice(), &[0]);
}

#[test]
fn erased_tuple_transfer() {
    let source: Box<dyn DataArray> = Box::new(wide_source());
    let mut target: Box<dyn DataArray> = Box::new(SoaArray::<u64>::with_components(2).unwrap());
    assert_eq!(target.insert_next_tuple_from(2, source.as_ref()).unwrap(), 0);
    target.insert_tuples_from(&[1], &[1], source.as_ref()).unwrap();
    target.set_tuple_from(0, 0, source.as_ref()).unwrap();

    let typed = target.downcast_ref::<SoaArray<u64>>().unwrap();
    assert_eq!(typed.tuple(0), vec![0, 1]);
    assert_eq!(typed.tuple(1), vec![10, 11]);
}

// =============================================================================
// Removal
// =============================================================================

#[test]
fn remove_keeps_capacity() {
    let mut array = AosArray::from_vec(1, vec![1, 2, 3, 4]).unwrap();
    array.remove_first_tuple().unwrap();
    array.remove_last_tuple().unwrap();
    assert_eq!(array.as_slice(), &[2, 3]);
    assert_eq!(array.capacity(), 4);
}

#[test]
fn remove_out_of_range() {
    let mut array = AosArray::from_vec(1, vec![1]).unwrap();
    let err = array.remove_tuple(1).unwrap_err();
    assert_eq!(err.to_string(), "index out of bounds: 1 (length 1)");
}

// =============================================================================
// Copying
// =============================================================================

#[test]
fn copy_tuples_converts_types() {
    let source = ImplicitArray::affine(1.5f64, 0.0, 6).unwrap();
    let mut target = AosArray::<i16>::new();
    source.copy_tuples(&[5, 1, 1], &mut target).unwrap();
    assert_eq!(target.as_slice(), &[7, 1, 1]);
}

#[test]
fn copy_tuples_rejects_width_mismatch() {
    let source = AosArray::from_vec(2, vec![1, 2]).unwrap();
    let mut target = AosArray::<i32>::new();
    assert!(source.copy_tuples(&[0], &mut target).is_err());
}

#[test]
fn copy_tuples_into_read_only_fails() {
    let source = AosArray::from_vec(1, vec![1i32]).unwrap();
    let mut target = ImplicitArray::affine(1i32, 0, 1).unwrap();
    assert!(source.copy_tuples(&[0], &mut target).unwrap_err().is_read_only());
}

/// Nine components by forty tuples; value `(t * 9 + c) % 17`.
fn block_source() -> AosArray<i32> {
    let values = (0..9 * 40).map(|i| i % 17).collect();
    AosArray::from_vec(9, values).unwrap()
}

#[test]
fn copy_block_extracts_sub_block() {
    let source = block_source();
    let mut block = SoaArray::<f64>::with_components(6).unwrap();
    block.set_number_of_tuples(26).unwrap();

    source.copy_block(7..=32, 2..=7, &mut block).unwrap();
    assert_eq!(block.number_of_components(), 6);
    assert_eq!(block.number_of_tuples(), 26);
    for t in 0..26 {
        for c in 0..6 {
            assert_eq!(block.component(t, c), f64::from(source.component(t + 7, c + 2)));
        }
    }
}

#[test]
fn copy_block_reshapes_output() {
    let source = block_source();
    let mut block = AosArray::from_vec(1, vec![9i64; 50]).unwrap();
    source.copy_block(39..=39, 0..=8, &mut block).unwrap();
    assert_eq!(block.number_of_components(), 9);
    assert_eq!(block.tuple(0), source.tuple(39).into_iter().map(i64::from).collect::<Vec<_>>());
}

#[test]
fn copy_block_rejects_bad_ranges() {
    let source = block_source();
    let mut block = AosArray::from_vec(1, vec![4i32]).unwrap();
    let err = source.copy_block(0..=40, 0..=1, &mut block).unwrap_err();
    assert_eq!(err.to_string(), "index out of bounds: 40 (length 40)");
    assert!(source.copy_block(0..=1, 0..=9, &mut block).is_err());
    assert!(source.copy_block(0..=1, 3..=2, &mut block).is_err());
    assert_eq!(block.as_slice(), &[4]);
}

#[test]
fn copy_component_requires_matching_tuples() {
    let source = AosArray::from_vec(1, vec![1, 2, 3]).unwrap();
    let mut target = AosArray::from_vec(2, vec![0; 4]).unwrap();
    assert!(target.copy_component(0, &source, 0).is_err());
}

// =============================================================================
// Interpolation
// =============================================================================

#[test]
fn interpolate_between_layouts() {
    let a = SoaArray::from_columns(vec![vec![0.0f64, 10.0], vec![0.0, 20.0]]).unwrap();
    let b = AosArray::from_vec(2, vec![4.0f32, 8.0]).unwrap();
    let mut out = AosArray::<f64>::with_components(2).unwrap();

    out.interpolate_tuple_between(0, 1, &a, 0, &b, 0.5).unwrap();
    assert_eq!(out.tuple(0), vec![7.0, 14.0]);

    out.interpolate_tuple(1, &[0, 1], &a, &[0.5, 0.5]).unwrap();
    assert_eq!(out.tuple(1), vec![5.0, 10.0]);
}

#[test]
fn interpolate_rejects_bad_ids() {
    let a = AosArray::from_vec(1, vec![1.0f64]).unwrap();
    let mut out = AosArray::<f64>::new();
    assert!(out.interpolate_tuple(0, &[1], &a, &[1.0]).is_err());
    assert!(out.is_empty());
}

// =============================================================================
// Ranges of Values
// =============================================================================

#[test]
fn component_range_per_component() {
    let array = SoaArray::from_columns(vec![vec![3i8, -2, 7], vec![0, 0, 1]]).unwrap();
    assert_eq!(array.component_range(0), Some((-2, 7)));
    assert_eq!(array.component_range(1), Some((0, 1)));
    assert_eq!(AosArray::<i8>::new().component_range(0), None);
}

#[test]
fn erased_component_range() {
    let array: Box<dyn DataArray> = Box::new(ImplicitArray::affine(-1i32, 5, 10).unwrap());
    assert_eq!(array.component_range_f64(0), Some((-4.0, 5.0)));
}
