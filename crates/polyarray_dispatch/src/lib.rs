//! Compile-time type lists and runtime dispatch for polyarray.
//!
//! This crate provides:
//! - [`type_list!`], [`ArrayList`], [`ValueList`] - Compile-time sets of arrays and scalar types
//! - [`Catalog`] and [`DefaultCatalog`] - Which arrays get specialized code
//! - [`Worker1`], [`Worker2`], [`Worker3`] - Operations generic over concrete arrays
//! - [`Dispatcher`] - Matches runtime arrays to a specialization and runs the worker

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod list;

pub mod catalog;
pub mod dispatcher;
pub mod worker;

pub use catalog::{Catalog, DefaultArrays, DefaultCatalog, RealsCatalog};
pub use dispatcher::Dispatcher;
pub use list::{
    AllTypes, ArrayEntry, ArrayList, ByValueType, Cons, FilterByValueType, Integrals, Nil, Reals,
    Union, ValueList,
};
pub use worker::{Fallback1, Fallback2, Fallback3, Worker1, Worker2, Worker3};
