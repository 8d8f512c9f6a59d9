//! The `*_or_fallback` forms run the erased path exactly when dispatch misses.

use polyarray_dispatch::Dispatcher;
use polyarray_storage::{AosArray, SoaArray};

use crate::support::{Add, Scale, Sum, tape};

#[test]
fn one_array_fallback() {
    let dispatcher = Dispatcher::new();
    let mut worker = Sum::default();

    let mut known = AosArray::from_vec(1, vec![1u16, 2, 3]).unwrap();
    assert!((dispatcher.dispatch_or_fallback(&mut known, &mut worker) - 6.0).abs() < f64::EPSILON);
    assert_eq!((worker.fast, worker.slow), (1, 0));

    let mut custom = tape(&[0.5, 0.25]);
    assert!((dispatcher.dispatch_or_fallback(&mut custom, &mut worker) - 0.75).abs() < f64::EPSILON);
    assert_eq!((worker.fast, worker.slow), (1, 1));
}

#[test]
fn two_array_fallback_gives_the_same_result() {
    let dispatcher = Dispatcher::new();

    let mut fast = Scale::by(2.0);
    let mut source = AosArray::from_vec(1, vec![1.0f64, 2.0]).unwrap();
    let mut target = AosArray::<f64>::new();
    dispatcher.dispatch2_or_fallback(&mut source, &mut target, &mut fast).unwrap();
    assert_eq!((fast.fast, fast.slow), (1, 0));

    let mut slow = Scale::by(2.0);
    let mut custom = tape(&[1.0, 2.0]);
    let mut erased_target = AosArray::<f64>::new();
    dispatcher
        .dispatch2_or_fallback(&mut custom, &mut erased_target, &mut slow)
        .unwrap();
    assert_eq!((slow.fast, slow.slow), (0, 1));

    assert_eq!(target.as_slice(), erased_target.as_slice());
    assert_eq!(target.as_slice(), &[2.0, 4.0]);
}

#[test]
fn three_array_fallback() {
    let dispatcher = Dispatcher::new();
    let mut a = tape(&[1.0, 2.0]);
    let mut b = AosArray::from_vec(1, vec![10.0f64, 20.0]).unwrap();
    let mut out = SoaArray::<f64>::new();
    let mut worker = Add::default();

    dispatcher
        .dispatch3_or_fallback(&mut a, &mut b, &mut out, &mut worker)
        .unwrap();
    assert_eq!(worker.slow, 1);
    assert_eq!(out.column(0), &[11.0, 22.0]);
}

#[test]
fn fallback_errors_surface() {
    let dispatcher = Dispatcher::new();
    let mut source = tape(&[1.0]);
    let mut writable = AosArray::from_vec(1, vec![0.0f64]).unwrap();
    let mut rule = polyarray_storage::ImplicitArray::affine(1.0f64, 0.0, 1).unwrap();

    assert!(
        dispatcher
            .dispatch2_or_fallback(&mut source, &mut rule, &mut Scale::by(1.0))
            .unwrap_err()
            .is_read_only()
    );
    dispatcher
        .dispatch2_or_fallback(&mut source, &mut writable, &mut Scale::by(3.0))
        .unwrap();
    assert_eq!(writable.as_slice(), &[3.0]);
}
