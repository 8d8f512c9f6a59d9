//! Dispatch catalogs: which concrete arrays get specialized code.
//!
//! A catalog is a type, not a value, so it costs nothing at runtime and
//! cannot change underneath a running program. Each [`Dispatcher`](crate::Dispatcher)
//! is parameterized by one.

use polyarray_storage::{ColumnarBuffer, OwnedBuffer, RuleGenerated};

use crate::list::{AllTypes, ArrayEntry, ArrayList, ByValueType, Reals, ValueList};

/// A compile-time set of array specializations plus a value type
/// restriction applied to every default dispatch.
pub trait Catalog {
    /// The arrays default dispatch considers, in match order.
    type Arrays: ArrayList;

    /// Scalar types default dispatch may match.
    type Restriction: ValueList;

    /// The specializations default dispatch can actually reach.
    #[must_use]
    fn entries() -> Vec<ArrayEntry> {
        ByValueType::<Self::Arrays, Self::Restriction>::entries()
    }
}

/// The arrays the default catalog specializes:
///
/// - tuple-major storage for every scalar type;
/// - columnar storage for the floating point types;
/// - rule-generated arrays for `f32`, `f64`, `i32`, and `i64`.
pub type DefaultArrays = crate::type_list![
    OwnedBuffer<f32>,
    OwnedBuffer<f64>,
    OwnedBuffer<i8>,
    OwnedBuffer<i16>,
    OwnedBuffer<i32>,
    OwnedBuffer<i64>,
    OwnedBuffer<u8>,
    OwnedBuffer<u16>,
    OwnedBuffer<u32>,
    OwnedBuffer<u64>,
    ColumnarBuffer<f32>,
    ColumnarBuffer<f64>,
    RuleGenerated<f32>,
    RuleGenerated<f64>,
    RuleGenerated<i32>,
    RuleGenerated<i64>,
];

/// [`DefaultArrays`] with no restriction.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCatalog;

impl Catalog for DefaultCatalog {
    type Arrays = DefaultArrays;
    type Restriction = AllTypes;
}

/// [`DefaultArrays`] restricted to floating point values.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealsCatalog;

impl Catalog for RealsCatalog {
    type Arrays = DefaultArrays;
    type Restriction = Reals;
}
