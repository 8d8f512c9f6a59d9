//! Worker traits and the adapters that chain single-array matching into
//! multi-array matching.
//!
//! A worker's `execute` is generic over the concrete backend of each
//! argument, so every catalog entry the dispatcher matches gets its own
//! monomorphized copy with direct (non-virtual) value access.

use std::any::Any;
use std::marker::PhantomData;

use polyarray_foundation::Scalar;
use polyarray_storage::{DataArray, GenericArray, StorageBackend};

use crate::list::ArrayList;

/// An operation over one array of any concrete type.
pub trait Worker1 {
    /// Result of one execution.
    type Output;

    /// Runs the operation on a concretely typed array.
    fn execute<A: StorageBackend>(&mut self, array: &mut GenericArray<A>) -> Self::Output;
}

/// An operation over two arrays of any concrete types.
pub trait Worker2 {
    /// Result of one execution.
    type Output;

    /// Runs the operation on concretely typed arrays.
    fn execute<A: StorageBackend, B: StorageBackend>(
        &mut self,
        first: &mut GenericArray<A>,
        second: &mut GenericArray<B>,
    ) -> Self::Output;
}

/// An operation over three arrays of any concrete types.
pub trait Worker3 {
    /// Result of one execution.
    type Output;

    /// Runs the operation on concretely typed arrays.
    fn execute<A: StorageBackend, B: StorageBackend, C: StorageBackend>(
        &mut self,
        first: &mut GenericArray<A>,
        second: &mut GenericArray<B>,
        third: &mut GenericArray<C>,
    ) -> Self::Output;
}

/// The type-erased path a [`Worker1`] takes when dispatch misses.
pub trait Fallback1: Worker1 {
    /// Runs the operation through the [`DataArray`] interface.
    fn fallback(&mut self, array: &mut dyn DataArray) -> Self::Output;
}

/// The type-erased path a [`Worker2`] takes when dispatch misses.
pub trait Fallback2: Worker2 {
    /// Runs the operation through the [`DataArray`] interface.
    fn fallback(&mut self, first: &mut dyn DataArray, second: &mut dyn DataArray) -> Self::Output;
}

/// The type-erased path a [`Worker3`] takes when dispatch misses.
pub trait Fallback3: Worker3 {
    /// Runs the operation through the [`DataArray`] interface.
    fn fallback(
        &mut self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        third: &mut dyn DataArray,
    ) -> Self::Output;
}

/// Narrows `mask` to the scalar type of `A` when `same` is set.
fn narrow<A: StorageBackend>(mask: u16, same: bool) -> u16 {
    if same {
        mask & <A::Value as Scalar>::SCALAR_TYPE.bit()
    } else {
        mask
    }
}

// ============================================================================
// Two arrays
// ============================================================================

/// Matched the first array; matches the second against `L`.
pub(crate) struct SeekSecond<'a, L, W> {
    pub(crate) second: &'a mut dyn Any,
    pub(crate) mask: u16,
    pub(crate) same: bool,
    pub(crate) worker: &'a mut W,
    pub(crate) list: PhantomData<L>,
}

impl<L: ArrayList, W: Worker2> Worker1 for SeekSecond<'_, L, W> {
    type Output = Option<W::Output>;

    fn execute<A: StorageBackend>(&mut self, first: &mut GenericArray<A>) -> Self::Output {
        let mut bound = BindFirst {
            first,
            worker: &mut *self.worker,
        };
        L::dispatch(&mut *self.second, narrow::<A>(self.mask, self.same), &mut bound)
    }
}

/// Both arrays matched; runs the worker.
struct BindFirst<'a, A: StorageBackend, W> {
    first: &'a mut GenericArray<A>,
    worker: &'a mut W,
}

impl<A: StorageBackend, W: Worker2> Worker1 for BindFirst<'_, A, W> {
    type Output = W::Output;

    fn execute<B: StorageBackend>(&mut self, second: &mut GenericArray<B>) -> Self::Output {
        self.worker.execute(&mut *self.first, second)
    }
}

// ============================================================================
// Three arrays
// ============================================================================

/// Matched the first array; matches the second against `L2`, then the
/// third against `L3`.
pub(crate) struct SeekRest<'a, L2, L3, W> {
    pub(crate) second: &'a mut dyn Any,
    pub(crate) third: &'a mut dyn Any,
    pub(crate) masks: (u16, u16),
    pub(crate) same: bool,
    pub(crate) worker: &'a mut W,
    pub(crate) lists: PhantomData<(L2, L3)>,
}

impl<L2: ArrayList, L3: ArrayList, W: Worker3> Worker1 for SeekRest<'_, L2, L3, W> {
    type Output = Option<W::Output>;

    fn execute<A: StorageBackend>(&mut self, first: &mut GenericArray<A>) -> Self::Output {
        let mut seek = SeekThird::<L3, A, W> {
            first,
            third: &mut *self.third,
            mask: narrow::<A>(self.masks.1, self.same),
            worker: &mut *self.worker,
            list: PhantomData,
        };
        L2::dispatch(
            &mut *self.second,
            narrow::<A>(self.masks.0, self.same),
            &mut seek,
        )
        .flatten()
    }
}

/// Matched the first two arrays; matches the third against `L`.
struct SeekThird<'a, L, A: StorageBackend, W> {
    first: &'a mut GenericArray<A>,
    third: &'a mut dyn Any,
    mask: u16,
    worker: &'a mut W,
    list: PhantomData<L>,
}

impl<L: ArrayList, A: StorageBackend, W: Worker3> Worker1 for SeekThird<'_, L, A, W> {
    type Output = Option<W::Output>;

    fn execute<B: StorageBackend>(&mut self, second: &mut GenericArray<B>) -> Self::Output {
        let mut bound = BindFirstTwo {
            first: &mut *self.first,
            second,
            worker: &mut *self.worker,
        };
        L::dispatch(&mut *self.third, self.mask, &mut bound)
    }
}

/// All three arrays matched; runs the worker.
struct BindFirstTwo<'a, A: StorageBackend, B: StorageBackend, W> {
    first: &'a mut GenericArray<A>,
    second: &'a mut GenericArray<B>,
    worker: &'a mut W,
}

impl<A: StorageBackend, B: StorageBackend, W: Worker3> Worker1 for BindFirstTwo<'_, A, B, W> {
    type Output = W::Output;

    fn execute<C: StorageBackend>(&mut self, third: &mut GenericArray<C>) -> Self::Output {
        self.worker
            .execute(&mut *self.first, &mut *self.second, third)
    }
}
