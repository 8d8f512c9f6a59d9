//! Compile-time type lists.
//!
//! Lists are cons cells ([`Cons`]/[`Nil`]) usually written with
//! [`type_list!`](crate::type_list). The same cells serve two roles:
//!
//! - An [`ArrayList`] holds storage backend types; each entry names one
//!   concrete [`GenericArray`] specialization the dispatcher may generate.
//! - A [`ValueList`] holds scalar types and folds to a bit mask.
//!
//! Matching walks an array list front to back and stops at the first entry
//! whose concrete type equals the runtime array. A value mask is threaded
//! through the walk; entries whose scalar type is outside it are skipped
//! without a type check, which is how [`ByValueType`] filters a list.

use std::any::Any;
use std::marker::PhantomData;

use polyarray_foundation::{BackendKind, Scalar, ScalarType};
use polyarray_storage::{GenericArray, StorageBackend};

use crate::worker::Worker1;

/// The empty list.
#[derive(Clone, Copy, Debug, Default)]
pub struct Nil;

/// A list with head `H` and tail `T`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cons<H, T>(PhantomData<(H, T)>);

/// Builds a type list from a comma separated list of types.
///
/// ```
/// use polyarray_dispatch::{ValueList, type_list};
///
/// type Small = type_list![i8, u8];
/// assert_eq!(Small::MASK.count_ones(), 2);
/// ```
#[macro_export]
macro_rules! type_list {
    () => { $crate::Nil };
    ($head:ty $(, $tail:ty)* $(,)?) => {
        $crate::Cons<$head, $crate::type_list!($($tail),*)>
    };
}

// ============================================================================
// Array lists
// ============================================================================

/// One concrete array specialization, described at runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ArrayEntry {
    /// Storage layout.
    pub backend: BackendKind,
    /// Scalar type.
    pub scalar: ScalarType,
}

impl ArrayEntry {
    fn of<B: StorageBackend>() -> Self {
        Self {
            backend: B::KIND,
            scalar: <B::Value as Scalar>::SCALAR_TYPE,
        }
    }
}

/// A compile-time list of storage backends, each standing for
/// `GenericArray<Backend>`.
pub trait ArrayList {
    /// Runs `worker` on `array` if its concrete type is the first entry
    /// whose scalar type is in `mask`. Returns `None` without calling the
    /// worker when nothing matches.
    fn dispatch<W: Worker1>(array: &mut dyn Any, mask: u16, worker: &mut W) -> Option<W::Output>;

    /// Entries in declaration order.
    fn entries() -> Vec<ArrayEntry> {
        let mut out = Vec::new();
        Self::collect(&mut out);
        out
    }

    /// Appends this list's entries to `out`.
    fn collect(out: &mut Vec<ArrayEntry>);
}

impl ArrayList for Nil {
    #[inline]
    fn dispatch<W: Worker1>(_: &mut dyn Any, _: u16, _: &mut W) -> Option<W::Output> {
        None
    }

    fn collect(_: &mut Vec<ArrayEntry>) {}
}

impl<H: StorageBackend, T: ArrayList> ArrayList for Cons<H, T> {
    #[inline]
    fn dispatch<W: Worker1>(array: &mut dyn Any, mask: u16, worker: &mut W) -> Option<W::Output> {
        if mask & <H::Value as Scalar>::SCALAR_TYPE.bit() != 0 {
            if let Some(typed) = array.downcast_mut::<GenericArray<H>>() {
                return Some(worker.execute(typed));
            }
        }
        T::dispatch(array, mask, worker)
    }

    fn collect(out: &mut Vec<ArrayEntry>) {
        out.push(ArrayEntry::of::<H>());
        T::collect(out);
    }
}

/// The entries of `L` whose scalar type is in `V`.
pub struct ByValueType<L, V>(PhantomData<(L, V)>);

/// Alias matching the naming used by catalog declarations.
pub type FilterByValueType<L, V> = ByValueType<L, V>;

impl<L: ArrayList, V: ValueList> ArrayList for ByValueType<L, V> {
    #[inline]
    fn dispatch<W: Worker1>(array: &mut dyn Any, mask: u16, worker: &mut W) -> Option<W::Output> {
        L::dispatch(array, mask & V::MASK, worker)
    }

    fn collect(out: &mut Vec<ArrayEntry>) {
        let mut all = Vec::new();
        L::collect(&mut all);
        out.extend(all.into_iter().filter(|e| V::contains(e.scalar)));
    }
}

// ============================================================================
// Value lists
// ============================================================================

/// A compile-time set of scalar types.
pub trait ValueList {
    /// Union of [`ScalarType::bit`] over the members.
    const MASK: u16;

    /// Returns true if `scalar` is a member.
    #[must_use]
    fn contains(scalar: ScalarType) -> bool {
        Self::MASK & scalar.bit() != 0
    }

    /// Members in [`ScalarType::ALL`] order.
    #[must_use]
    fn members() -> Vec<ScalarType> {
        ScalarType::ALL
            .into_iter()
            .filter(|&s| Self::contains(s))
            .collect()
    }
}

impl ValueList for Nil {
    const MASK: u16 = 0;
}

impl<H: Scalar, T: ValueList> ValueList for Cons<H, T> {
    const MASK: u16 = H::SCALAR_TYPE.bit() | T::MASK;
}

/// Every member of `A` or `B`.
pub struct Union<A, B>(PhantomData<(A, B)>);

impl<A: ValueList, B: ValueList> ValueList for Union<A, B> {
    const MASK: u16 = A::MASK | B::MASK;
}

/// Floating point scalar types.
pub type Reals = type_list![f32, f64];

/// Integer scalar types.
pub type Integrals = type_list![i8, i16, i32, i64, u8, u16, u32, u64];

/// Every scalar type.
pub type AllTypes = Union<Integrals, Reals>;
