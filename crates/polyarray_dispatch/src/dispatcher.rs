//! Runtime selection of compile-time specialized code paths.
//!
//! Every entry point returns `Some(output)` when the arrays matched a
//! specialization and the worker ran, or `None` when nothing matched and
//! the worker was not called. A miss is the expected outcome for arrays
//! outside the catalog; callers follow it with a type-erased fallback, or
//! use the `*_or_fallback` forms that do so for them.
//!
//! Families:
//!
//! - plain: the catalog's arrays under the catalog's restriction;
//! - `by_value_type`: additionally restricted to caller-supplied value lists;
//! - `by_array`: caller-supplied array lists, no catalog restriction;
//! - `same_value_type`: every argument must share one scalar type.

use std::marker::PhantomData;

use polyarray_storage::DataArray;
use tracing::trace;

use crate::catalog::{Catalog, DefaultCatalog};
use crate::list::{AllTypes, ArrayList, ValueList};
use crate::worker::{Fallback1, Fallback2, Fallback3, SeekRest, SeekSecond, Worker1, Worker2, Worker3};

/// Dispatches arrays to workers using the specializations of catalog `C`.
///
/// Holds no state. Construct with [`Dispatcher::new`] for the default
/// catalog or `Dispatcher::<C>::default()` for any other.
#[derive(Clone, Copy, Debug)]
pub struct Dispatcher<C: Catalog = DefaultCatalog> {
    catalog: PhantomData<C>,
}

impl Dispatcher {
    /// Creates a dispatcher over [`DefaultCatalog`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            catalog: PhantomData,
        }
    }
}

impl<C: Catalog> Default for Dispatcher<C> {
    fn default() -> Self {
        Self {
            catalog: PhantomData,
        }
    }
}

/// Mask for lists that apply no value restriction.
const UNRESTRICTED: u16 = AllTypes::MASK;

fn miss1(array: &dyn DataArray) {
    trace!(
        backend = %array.backend_kind(),
        scalar = %array.scalar_type(),
        "dispatch miss"
    );
}

fn miss(arrays: &[&dyn DataArray]) {
    for (position, array) in arrays.iter().enumerate() {
        trace!(
            position,
            backend = %array.backend_kind(),
            scalar = %array.scalar_type(),
            "dispatch miss"
        );
    }
}

fn run1<L: ArrayList, W: Worker1>(
    array: &mut dyn DataArray,
    mask: u16,
    worker: &mut W,
) -> Option<W::Output> {
    let out = L::dispatch(array.as_any_mut(), mask, worker);
    if out.is_none() {
        miss1(array);
    }
    out
}

fn run2<L1: ArrayList, L2: ArrayList, W: Worker2>(
    first: &mut dyn DataArray,
    second: &mut dyn DataArray,
    masks: (u16, u16),
    same: bool,
    worker: &mut W,
) -> Option<W::Output> {
    let out = {
        let mut seek = SeekSecond::<L2, W> {
            second: second.as_any_mut(),
            mask: masks.1,
            same,
            worker,
            list: PhantomData,
        };
        L1::dispatch(first.as_any_mut(), masks.0, &mut seek).flatten()
    };
    if out.is_none() {
        miss(&[&*first, &*second]);
    }
    out
}

fn run3<L1: ArrayList, L2: ArrayList, L3: ArrayList, W: Worker3>(
    first: &mut dyn DataArray,
    second: &mut dyn DataArray,
    third: &mut dyn DataArray,
    masks: (u16, u16, u16),
    same: bool,
    worker: &mut W,
) -> Option<W::Output> {
    let out = {
        let mut seek = SeekRest::<L2, L3, W> {
            second: second.as_any_mut(),
            third: third.as_any_mut(),
            masks: (masks.1, masks.2),
            same,
            worker,
            lists: PhantomData,
        };
        L1::dispatch(first.as_any_mut(), masks.0, &mut seek).flatten()
    };
    if out.is_none() {
        miss(&[&*first, &*second, &*third]);
    }
    out
}

impl<C: Catalog> Dispatcher<C> {
    // --- One array ---

    /// Runs `worker` on `array` if it matches the catalog.
    pub fn dispatch<W: Worker1>(&self, array: &mut dyn DataArray, worker: &mut W) -> Option<W::Output> {
        run1::<C::Arrays, W>(array, C::Restriction::MASK, worker)
    }

    /// Like [`dispatch`](Self::dispatch), further restricted to value types in `V`.
    pub fn dispatch_by_value_type<V: ValueList, W: Worker1>(
        &self,
        array: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        run1::<C::Arrays, W>(array, C::Restriction::MASK & V::MASK, worker)
    }

    /// Runs `worker` on `array` if it matches an entry of `L`.
    pub fn dispatch_by_array<L: ArrayList, W: Worker1>(
        &self,
        array: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        run1::<L, W>(array, UNRESTRICTED, worker)
    }

    /// Dispatches, or runs the worker's type-erased path on a miss.
    pub fn dispatch_or_fallback<W: Fallback1>(&self, array: &mut dyn DataArray, worker: &mut W) -> W::Output {
        match self.dispatch(array, worker) {
            Some(out) => out,
            None => worker.fallback(array),
        }
    }

    // --- Two arrays ---

    /// Runs `worker` if both arrays match the catalog.
    pub fn dispatch2<W: Worker2>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        let mask = C::Restriction::MASK;
        run2::<C::Arrays, C::Arrays, W>(first, second, (mask, mask), false, worker)
    }

    /// Like [`dispatch2`](Self::dispatch2), with each argument restricted to
    /// its own value list.
    pub fn dispatch2_by_value_type<V1: ValueList, V2: ValueList, W: Worker2>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        let mask = C::Restriction::MASK;
        run2::<C::Arrays, C::Arrays, W>(first, second, (mask & V1::MASK, mask & V2::MASK), false, worker)
    }

    /// Runs `worker` if the arrays match entries of `L1` and `L2`.
    pub fn dispatch2_by_array<L1: ArrayList, L2: ArrayList, W: Worker2>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        run2::<L1, L2, W>(first, second, (UNRESTRICTED, UNRESTRICTED), false, worker)
    }

    /// Like [`dispatch2`](Self::dispatch2), requiring one shared scalar type.
    pub fn dispatch2_same_value_type<W: Worker2>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        let mask = C::Restriction::MASK;
        run2::<C::Arrays, C::Arrays, W>(first, second, (mask, mask), true, worker)
    }

    /// Like [`dispatch2_same_value_type`](Self::dispatch2_same_value_type),
    /// restricted to value types in `V`.
    pub fn dispatch2_by_same_value_type<V: ValueList, W: Worker2>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        let mask = C::Restriction::MASK & V::MASK;
        run2::<C::Arrays, C::Arrays, W>(first, second, (mask, mask), true, worker)
    }

    /// Like [`dispatch2_by_array`](Self::dispatch2_by_array), requiring one
    /// shared scalar type.
    pub fn dispatch2_by_array_same_value_type<L1: ArrayList, L2: ArrayList, W: Worker2>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        run2::<L1, L2, W>(first, second, (UNRESTRICTED, UNRESTRICTED), true, worker)
    }

    /// Dispatches two arrays, or runs the worker's type-erased path on a miss.
    pub fn dispatch2_or_fallback<W: Fallback2>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        worker: &mut W,
    ) -> W::Output {
        match self.dispatch2(first, second, worker) {
            Some(out) => out,
            None => worker.fallback(first, second),
        }
    }

    // --- Three arrays ---

    /// Runs `worker` if all three arrays match the catalog.
    ///
    /// Instantiates the worker for every triple of catalog entries; prefer
    /// [`dispatch3_by_array`](Self::dispatch3_by_array) with short lists.
    pub fn dispatch3<W: Worker3>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        third: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        let mask = C::Restriction::MASK;
        run3::<C::Arrays, C::Arrays, C::Arrays, W>(
            first,
            second,
            third,
            (mask, mask, mask),
            false,
            worker,
        )
    }

    /// Like [`dispatch3`](Self::dispatch3), with each argument restricted to
    /// its own value list.
    pub fn dispatch3_by_value_type<V1: ValueList, V2: ValueList, V3: ValueList, W: Worker3>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        third: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        let mask = C::Restriction::MASK;
        run3::<C::Arrays, C::Arrays, C::Arrays, W>(
            first,
            second,
            third,
            (mask & V1::MASK, mask & V2::MASK, mask & V3::MASK),
            false,
            worker,
        )
    }

    /// Runs `worker` if the arrays match entries of `L1`, `L2`, and `L3`.
    pub fn dispatch3_by_array<L1: ArrayList, L2: ArrayList, L3: ArrayList, W: Worker3>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        third: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        run3::<L1, L2, L3, W>(
            first,
            second,
            third,
            (UNRESTRICTED, UNRESTRICTED, UNRESTRICTED),
            false,
            worker,
        )
    }

    /// Like [`dispatch3`](Self::dispatch3), requiring one shared scalar type.
    pub fn dispatch3_same_value_type<W: Worker3>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        third: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        let mask = C::Restriction::MASK;
        run3::<C::Arrays, C::Arrays, C::Arrays, W>(
            first,
            second,
            third,
            (mask, mask, mask),
            true,
            worker,
        )
    }

    /// Like [`dispatch3_same_value_type`](Self::dispatch3_same_value_type),
    /// restricted to value types in `V`.
    pub fn dispatch3_by_same_value_type<V: ValueList, W: Worker3>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        third: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        let mask = C::Restriction::MASK & V::MASK;
        run3::<C::Arrays, C::Arrays, C::Arrays, W>(
            first,
            second,
            third,
            (mask, mask, mask),
            true,
            worker,
        )
    }

    /// Like [`dispatch3_by_array`](Self::dispatch3_by_array), requiring one
    /// shared scalar type.
    pub fn dispatch3_by_array_same_value_type<L1: ArrayList, L2: ArrayList, L3: ArrayList, W: Worker3>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        third: &mut dyn DataArray,
        worker: &mut W,
    ) -> Option<W::Output> {
        run3::<L1, L2, L3, W>(
            first,
            second,
            third,
            (UNRESTRICTED, UNRESTRICTED, UNRESTRICTED),
            true,
            worker,
        )
    }

    /// Dispatches three arrays, or runs the worker's type-erased path on a miss.
    pub fn dispatch3_or_fallback<W: Fallback3>(
        &self,
        first: &mut dyn DataArray,
        second: &mut dyn DataArray,
        third: &mut dyn DataArray,
        worker: &mut W,
    ) -> W::Output {
        match self.dispatch3(first, second, third, worker) {
            Some(out) => out,
            None => worker.fallback(first, second, third),
        }
    }
}
