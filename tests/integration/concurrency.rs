//! Read-only sharing across threads once the lookup index is built.

use std::thread;

use polyarray::prelude::*;

#[test]
fn prebuilt_index_serves_parallel_readers() {
    let values: Vec<u32> = (0..10_000).map(|i| i % 997).collect();
    let array = AosArray::from_vec(1, values).unwrap();
    array.build_lookup();
    assert_eq!(array.lookup_state(), LookupState::Built);

    thread::scope(|s| {
        for worker in 0..4u32 {
            let array = &array;
            s.spawn(move || {
                for v in (worker..997).step_by(4) {
                    assert_eq!(array.lookup_value(v), Some(v as usize));
                    assert_eq!(array.lookup_all(v).len(), if v < 30 { 11 } else { 10 });
                }
            });
        }
    });

    assert_eq!(array.lookup_state(), LookupState::Built);
}

#[test]
fn parallel_range_reads() {
    let array =
        SoaArray::from_columns(vec![(0..1000i64).collect(), (1000..2000i64).collect()]).unwrap();

    let sums: Vec<i64> = thread::scope(|s| {
        let handles: Vec<_> = (0..2)
            .map(|c| {
                let array = &array;
                s.spawn(move || array.column(c).iter().sum::<i64>())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sums, vec![499_500, 1_499_500]);
}

#[test]
fn dispatch_on_separate_arrays_in_parallel() {
    struct Max;

    impl Worker1 for Max {
        type Output = f64;

        fn execute<A: StorageBackend>(&mut self, array: &mut GenericArray<A>) -> f64 {
            array.values().iter().map(Scalar::as_f64).fold(f64::MIN, f64::max)
        }
    }

    let dispatcher = Dispatcher::new();
    let mut arrays: Vec<Box<dyn DataArray>> = vec![
        Box::new(AosArray::from_vec(1, vec![1u8, 9, 4]).unwrap()),
        Box::new(ImplicitArray::affine(2.0f64, 0.0, 50).unwrap()),
        Box::new(SoaArray::from_columns(vec![vec![-1.0f32, 3.5]]).unwrap()),
    ];

    let maxima: Vec<Option<f64>> = thread::scope(|s| {
        let handles: Vec<_> = arrays
            .iter_mut()
            .map(|array| s.spawn(move || dispatcher.dispatch(array.as_mut(), &mut Max)))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(maxima, vec![Some(9.0), Some(98.0), Some(3.5)]);
}
