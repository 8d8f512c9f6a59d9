//! Storage backends, generic arrays, value ranges, and lookup indices for polyarray.
//!
//! This crate provides:
//! - [`StorageBackend`] - The interface a physical layout implements
//! - [`OwnedBuffer`], [`ColumnarBuffer`], [`RuleGenerated`] - The built-in layouts
//! - [`GenericArray`] - Size, capacity, and growth over any backend
//! - [`DataArray`] - Type-erased array handle
//! - [`ValueRange`] and [`TupleRange`] - Typed views for iteration
//! - [`LookupIndex`] - Lazily built value-to-index index

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod array;
pub mod backend;
pub mod columnar;
pub mod config;
pub mod data_array;
pub mod implicit;
pub mod lookup;
pub mod owned;
pub mod range;

pub use array::{AosArray, GenericArray, ImplicitArray, SoaArray};
pub use backend::StorageBackend;
pub use columnar::ColumnarBuffer;
pub use config::{GrowthPolicy, LookupPolicy, StorageConfig};
pub use data_array::DataArray;
pub use implicit::{Rule, RuleGenerated};
pub use lookup::{LookupIndex, LookupState};
pub use owned::OwnedBuffer;
pub use range::{
    DYNAMIC, TupleIter, TupleRange, TupleRangeMut, TupleRef, TupleRefMut, ValueIter, ValueRange,
    ValueRangeMut,
};
