//! Polyarray - typed numeric arrays over interchangeable storage layouts
//!
//! This crate re-exports all layers of the Polyarray system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: polyarray_dispatch   - Type lists, catalogs, specialized dispatch
//! Layer 1: polyarray_storage    - GenericArray, storage backends, ranges, lookup
//! Layer 0: polyarray_foundation - Scalar types, backend tags, errors
//! ```

pub use polyarray_dispatch as dispatch;
pub use polyarray_foundation as foundation;
pub use polyarray_storage as storage;

/// The types most programs need.
pub mod prelude {
    pub use polyarray_dispatch::{
        AllTypes, Catalog, DefaultCatalog, Dispatcher, Fallback1, Fallback2, Fallback3, Integrals,
        Reals, ValueList, Worker1, Worker2, Worker3, type_list,
    };
    pub use polyarray_foundation::{BackendKind, Error, Result, Scalar, ScalarType, ScalarValue};
    pub use polyarray_storage::{
        AosArray, DataArray, GenericArray, GrowthPolicy, ImplicitArray, LookupPolicy, LookupState,
        SoaArray, StorageBackend, StorageConfig,
    };
}
