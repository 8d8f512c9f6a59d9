//! Integration tests for storage layouts
//!
//! Tests that tuple-major, columnar, and rule-generated arrays agree on
//! the flattened tuple-major value order.

use polyarray_foundation::BackendKind;
use polyarray_storage::{
    AosArray, ColumnarBuffer, DataArray, GenericArray, ImplicitArray, OwnedBuffer, Rule, SoaArray,
    StorageBackend,
};

fn filled<B: StorageBackend<Value = f32> + Default>() -> GenericArray<B> {
    let mut array = GenericArray::<B>::with_components(3).unwrap();
    for t in 0..4 {
        let base = t as f32 * 10.0;
        array.insert_next_tuple(&[base, base + 1.0, base + 2.0]).unwrap();
    }
    array
}

#[test]
fn layouts_agree_on_values() {
    let aos = filled::<OwnedBuffer<f32>>();
    let soa = filled::<ColumnarBuffer<f32>>();
    assert_eq!(aos.values().to_vec(), soa.values().to_vec());
    assert_eq!(aos.tuple(2), soa.tuple(2));
    assert_eq!(soa.column(1), &[1.0, 11.0, 21.0, 31.0]);
}

#[test]
fn backend_kinds() {
    assert_eq!(filled::<OwnedBuffer<f32>>().backend_kind(), BackendKind::Owned);
    assert_eq!(filled::<ColumnarBuffer<f32>>().backend_kind(), BackendKind::Columnar);
    assert_eq!(
        ImplicitArray::affine(1u8, 0, 1).unwrap().backend_kind(),
        BackendKind::Implicit
    );
}

#[test]
fn columnar_component_count_rebuilds_columns() {
    let mut array = SoaArray::<u16>::new();
    array.set_number_of_components(5).unwrap();
    array.resize(2).unwrap();
    assert_eq!(array.number_of_components(), 5);
    assert_eq!(array.column(4), &[0, 0]);
}

#[test]
fn deep_copy_across_layouts() {
    let source = filled::<ColumnarBuffer<f32>>();
    let mut target = AosArray::<f64>::new();
    target.deep_copy(&source).unwrap();
    assert_eq!(target.number_of_components(), 3);
    assert_eq!(target.tuple(3), vec![30.0, 31.0, 32.0]);
}

#[test]
fn deep_copy_keeps_wide_integers() {
    let big = [(1i64 << 53) + 1, i64::MAX - 1];
    let source = SoaArray::from_columns(vec![big.to_vec()]).unwrap();
    let mut target = AosArray::<i64>::new();
    target.deep_copy(&source).unwrap();
    assert_eq!(target.as_slice(), &big);

    let unsigned = AosArray::from_vec(1, vec![u64::MAX - 7, 3]).unwrap();
    let mut columns = SoaArray::<u64>::new();
    columns.deep_copy(&unsigned).unwrap();
    assert_eq!(columns.column(0), &[u64::MAX - 7, 3]);
}

#[test]
fn deep_copy_from_rule_keeps_wide_integers() {
    let rule = ImplicitArray::affine(1i64, 1 << 53, 3).unwrap();
    let mut target = AosArray::<i64>::new();
    target.deep_copy(&rule).unwrap();
    assert_eq!(target.as_slice(), &[1 << 53, (1 << 53) + 1, (1 << 53) + 2]);

    // Narrowing saturates rather than wrapping.
    let mut narrow = SoaArray::<i32>::new();
    narrow.deep_copy(&rule).unwrap();
    assert_eq!(narrow.column(0), &[i32::MAX; 3]);
}

#[test]
fn function_rule_over_tuples() {
    let rule = Rule::function(|i| (i % 3) as u8);
    let array = ImplicitArray::from_rule(rule, 3, 4).unwrap();
    assert_eq!(array.tuple(2), vec![0, 1, 2]);
    assert_eq!(DataArray::number_of_values(&array), 12);
}

#[test]
fn remove_tuples_keeps_layouts_consistent() {
    let mut aos = filled::<OwnedBuffer<f32>>();
    let mut soa = filled::<ColumnarBuffer<f32>>();
    for array in [&mut aos as &mut dyn DataArray, &mut soa] {
        array.remove_tuple(1).unwrap();
        assert_eq!(array.number_of_tuples(), 3);
        assert_eq!(array.tuple_f64(1), vec![20.0, 21.0, 22.0]);
    }
}
