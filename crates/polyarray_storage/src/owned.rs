//! Contiguous tuple-major storage (array of structs).

use std::mem;

use polyarray_foundation::{BackendKind, Error, ErrorKind, Result, Scalar};

use crate::backend::{StorageBackend, checked_len};

/// One contiguous buffer of `tuples * components` values.
///
/// All components of a tuple are adjacent, so a tuple is a single slice.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedBuffer<T: Scalar> {
    data: Vec<T>,
    components: usize,
}

impl<T: Scalar> Default for OwnedBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> OwnedBuffer<T> {
    /// Creates an empty single-component buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            components: 1,
        }
    }

    /// Wraps existing tuple-major values.
    ///
    /// # Errors
    ///
    /// Returns an error if `components` is zero or `data` is not a whole
    /// number of tuples.
    pub fn from_vec(components: usize, data: Vec<T>) -> Result<Self> {
        if components == 0 {
            return Err(Error::new(ErrorKind::InvalidComponentCount(0)));
        }
        if data.len() % components != 0 {
            return Err(Error::component_mismatch(
                components,
                data.len() % components,
            ));
        }
        Ok(Self { data, components })
    }

    /// Consumes the buffer, returning its values.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    fn try_vec(len: usize) -> Result<Vec<T>> {
        let mut data = Vec::new();
        data.try_reserve_exact(len)
            .map_err(|_| Error::allocation_failed(len))?;
        data.resize(len, T::zero());
        Ok(data)
    }
}

impl<T: Scalar> StorageBackend for OwnedBuffer<T> {
    type Value = T;
    const KIND: BackendKind = BackendKind::Owned;

    fn components(&self) -> usize {
        self.components
    }

    fn set_components(&mut self, components: usize) -> Result<()> {
        if components == 0 {
            return Err(Error::new(ErrorKind::InvalidComponentCount(0)));
        }
        self.components = components;
        self.data = Vec::new();
        Ok(())
    }

    fn allocated_tuples(&self) -> usize {
        self.data.len() / self.components
    }

    fn allocate_tuples(&mut self, tuples: usize) -> Result<()> {
        let len = checked_len(tuples, self.components)?;
        // Build the replacement first so a failure leaves the old buffer intact.
        self.data = Self::try_vec(len)?;
        Ok(())
    }

    fn reallocate_tuples(&mut self, tuples: usize) -> Result<()> {
        let len = checked_len(tuples, self.components)?;
        if len > self.data.len() {
            self.data
                .try_reserve_exact(len - self.data.len())
                .map_err(|_| Error::allocation_failed(len))?;
            self.data.resize(len, T::zero());
        } else {
            self.data.truncate(len);
            self.data.shrink_to_fit();
        }
        Ok(())
    }

    #[inline]
    fn value(&self, tuple: usize, component: usize) -> T {
        self.data[tuple * self.components + component]
    }

    #[inline]
    fn value_mut(&mut self, tuple: usize, component: usize) -> Option<&mut T> {
        Some(&mut self.data[tuple * self.components + component])
    }

    #[inline]
    fn value_at(&self, index: usize) -> T {
        self.data[index]
    }

    #[inline]
    fn value_at_mut(&mut self, index: usize) -> Option<&mut T> {
        Some(&mut self.data[index])
    }

    fn as_slice(&self) -> Option<&[T]> {
        Some(&self.data)
    }

    fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        Some(&mut self.data)
    }

    fn memory_size(&self) -> usize {
        self.data.capacity() * mem::size_of::<T>()
    }
}
