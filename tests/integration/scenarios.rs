//! Worked scenarios: a rule-generated array scaled through dispatch,
//! amortized growth, and lookups that survive mutation.

use polyarray::prelude::*;

/// Writes `factor * source` into `target`.
struct ScaleInto(f64);

impl Worker2 for ScaleInto {
    type Output = Result<()>;

    fn execute<A: StorageBackend, B: StorageBackend>(
        &mut self,
        source: &mut GenericArray<A>,
        target: &mut GenericArray<B>,
    ) -> Result<()> {
        target.resize(source.number_of_tuples())?;
        let mut out = target.values_mut()?;
        for (i, v) in source.values().iter().enumerate() {
            out.set(i, B::Value::from_f64_rounded(v.as_f64() * self.0));
        }
        Ok(())
    }
}

// =============================================================================
// Rule-generated Arrays
// =============================================================================

#[test]
fn affine_array_scaled_into_owned_storage() {
    let mut source = ImplicitArray::affine(7i64, 9, 100).unwrap();
    for i in 0..100 {
        assert_eq!(source.value(i), 7 * i as i64 + 9);
    }
    assert!(source.set_value(0, 1).unwrap_err().is_read_only());
    assert!(source.insert_next_value(1).unwrap_err().is_read_only());

    let mut target = AosArray::<i64>::new();
    Dispatcher::new()
        .dispatch2(&mut source, &mut target, &mut ScaleInto(3.0))
        .expect("both arrays are in the default catalog")
        .unwrap();

    assert_eq!(target.number_of_tuples(), 100);
    for (i, v) in target.values().iter().enumerate() {
        assert_eq!(v, 3 * (7 * i as i64 + 9));
    }
}

#[test]
fn affine_array_scales_through_the_erased_path_too() {
    let source: Box<dyn DataArray> = Box::new(ImplicitArray::affine(7i32, 9, 10).unwrap());
    let mut target = SoaArray::<f64>::new();
    target.resize(source.number_of_tuples()).unwrap();
    for i in 0..source.number_of_values() {
        target.set_value_f64(i, 3.0 * source.value_f64(i)).unwrap();
    }
    assert_eq!(target.column(0)[9], 3.0 * 72.0);
}

// =============================================================================
// Growth
// =============================================================================

#[test]
fn amortized_growth_from_empty() {
    let mut array = AosArray::<f32>::new();
    assert_eq!(array.capacity(), 0);

    array.resize(100).unwrap();
    assert_eq!(array.capacity(), 100);

    array.resize(150).unwrap();
    assert_eq!(array.capacity(), 250);
    assert_eq!(array.max_id(), 149);
}

#[test]
fn exact_growth_and_squeeze() {
    let mut array = SoaArray::<u32>::with_components(2)
        .unwrap()
        .with_config(StorageConfig::default().with_growth(GrowthPolicy::Exact));
    array.resize(100).unwrap();
    array.resize(150).unwrap();
    assert_eq!(array.capacity(), 300);

    array.resize(10).unwrap();
    assert_eq!(array.capacity(), 300);
    array.squeeze().unwrap();
    assert_eq!(array.capacity(), 20);
}

// =============================================================================
// Lookup
// =============================================================================

#[test]
fn lookup_scenario() {
    let array = AosArray::from_vec(1, vec![5, 3, 3, 9, 1]).unwrap();
    assert_eq!(array.lookup_value(3), Some(1));
    assert_eq!(array.lookup_all(3), vec![1, 2]);
    assert_eq!(array.lookup_value(42), None);
}

#[test]
fn lookup_follows_mutation_and_dispatch() {
    let mut source = AosArray::from_vec(1, vec![1i32, 2, 3]).unwrap();
    let mut target = AosArray::from_vec(1, vec![0i32; 3]).unwrap();
    assert_eq!(target.lookup_all(0), vec![0, 1, 2]);

    Dispatcher::new()
        .dispatch2(&mut source, &mut target, &mut ScaleInto(2.0))
        .unwrap()
        .unwrap();
    assert_eq!(target.lookup_state(), LookupState::Unbuilt);
    assert_eq!(target.lookup_value(0), None);
    assert_eq!(target.lookup_value(6), Some(2));

    target.remove_first_tuple().unwrap();
    assert_eq!(target.lookup_value(6), Some(1));
}
