//! The capability interface every storage layout implements.
//!
//! A backend owns the physical representation of an array's values and
//! nothing else. Logical size, growth policy, and the lookup index live in
//! [`GenericArray`](crate::GenericArray), which drives the backend through
//! two sizing primitives:
//!
//! - [`allocate_tuples`](StorageBackend::allocate_tuples) discards content
//!   and provides storage for exactly `n` tuples.
//! - [`reallocate_tuples`](StorageBackend::reallocate_tuples) keeps the
//!   common prefix and provides storage for exactly `n` tuples.
//!
//! Both must leave the backend untouched when they fail.

use std::fmt::Debug;

use polyarray_foundation::{BackendKind, Result, Scalar};

/// Physical storage for the values of one array.
pub trait StorageBackend: Debug + Send + Sync + 'static {
    /// Scalar type of every stored value.
    type Value: Scalar;

    /// Runtime tag for this layout.
    const KIND: BackendKind;

    /// Backends that synthesize values reject every write.
    const READ_ONLY: bool = false;

    /// Backends whose capacity always equals their logical size. Growth
    /// policies do not apply to them.
    const EXACT_CAPACITY: bool = false;

    /// Number of components per tuple.
    fn components(&self) -> usize;

    /// Changes the tuple width and drops all content.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot represent the new width.
    fn set_components(&mut self, components: usize) -> Result<()>;

    /// Number of tuples the backend can currently address.
    fn allocated_tuples(&self) -> usize;

    /// Discards content and provides storage for exactly `tuples` tuples.
    ///
    /// # Errors
    ///
    /// Returns an allocation failure if memory cannot be provided. The
    /// backend is unchanged on failure.
    fn allocate_tuples(&mut self, tuples: usize) -> Result<()>;

    /// Keeps the first `min(old, tuples)` tuples and provides storage for
    /// exactly `tuples` tuples.
    ///
    /// # Errors
    ///
    /// Returns an allocation failure if memory cannot be provided. The
    /// backend is unchanged on failure.
    fn reallocate_tuples(&mut self, tuples: usize) -> Result<()>;

    /// Reads one component of one tuple.
    fn value(&self, tuple: usize, component: usize) -> Self::Value;

    /// Mutable access to one component of one tuple, or `None` when the
    /// backend is read-only.
    fn value_mut(&mut self, tuple: usize, component: usize) -> Option<&mut Self::Value>;

    /// Reads the value at a flattened (tuple-major) index.
    #[inline]
    fn value_at(&self, index: usize) -> Self::Value {
        let components = self.components();
        self.value(index / components, index % components)
    }

    /// Mutable access at a flattened (tuple-major) index.
    #[inline]
    fn value_at_mut(&mut self, index: usize) -> Option<&mut Self::Value> {
        let components = self.components();
        self.value_mut(index / components, index % components)
    }

    /// Contiguous tuple-major view of the storage, if the layout has one.
    fn as_slice(&self) -> Option<&[Self::Value]> {
        None
    }

    /// Mutable contiguous tuple-major view of the storage, if the layout has one.
    fn as_mut_slice(&mut self) -> Option<&mut [Self::Value]> {
        None
    }

    /// Bytes of memory held for values.
    fn memory_size(&self) -> usize;
}

/// Computes `tuples * components`, reporting overflow as an allocation failure.
pub(crate) fn checked_len(tuples: usize, components: usize) -> Result<usize> {
    tuples
        .checked_mul(components)
        .ok_or_else(|| polyarray_foundation::Error::allocation_failed(usize::MAX))
}
