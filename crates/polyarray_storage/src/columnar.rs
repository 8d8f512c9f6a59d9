//! Component-major storage (struct of arrays).

use std::mem;

use polyarray_foundation::{BackendKind, Error, ErrorKind, Result, Scalar};

use crate::backend::StorageBackend;

/// One independent buffer per component, each `tuples` values long.
///
/// Reading a tuple touches `components` separate buffers. Reading one
/// component across all tuples is a single contiguous slice.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnarBuffer<T: Scalar> {
    columns: Vec<Vec<T>>,
    tuples: usize,
}

impl<T: Scalar> Default for ColumnarBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> ColumnarBuffer<T> {
    /// Creates an empty single-component buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: vec![Vec::new()],
            tuples: 0,
        }
    }

    /// Wraps existing per-component columns.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no columns or the columns differ in length.
    pub fn from_columns(columns: Vec<Vec<T>>) -> Result<Self> {
        let Some(first) = columns.first() else {
            return Err(Error::new(ErrorKind::InvalidComponentCount(0)));
        };
        let tuples = first.len();
        if let Some(bad) = columns.iter().find(|c| c.len() != tuples) {
            return Err(Error::invalid_index(bad.len(), tuples));
        }
        Ok(Self { columns, tuples })
    }

    /// Returns the buffer holding one component for every tuple.
    #[must_use]
    pub fn column(&self, component: usize) -> &[T] {
        &self.columns[component]
    }

    /// Returns the mutable buffer holding one component for every tuple.
    pub fn column_mut(&mut self, component: usize) -> &mut [T] {
        &mut self.columns[component]
    }

    /// Consumes the buffer, returning its columns.
    #[must_use]
    pub fn into_columns(self) -> Vec<Vec<T>> {
        self.columns
    }
}

impl<T: Scalar> StorageBackend for ColumnarBuffer<T> {
    type Value = T;
    const KIND: BackendKind = BackendKind::Columnar;

    fn components(&self) -> usize {
        self.columns.len()
    }

    fn set_components(&mut self, components: usize) -> Result<()> {
        if components == 0 {
            return Err(Error::new(ErrorKind::InvalidComponentCount(0)));
        }
        // The column table itself is reallocated; the columns start empty.
        self.columns = (0..components).map(|_| Vec::new()).collect();
        self.tuples = 0;
        Ok(())
    }

    fn allocated_tuples(&self) -> usize {
        self.tuples
    }

    fn allocate_tuples(&mut self, tuples: usize) -> Result<()> {
        let mut columns = Vec::with_capacity(self.columns.len());
        for _ in 0..self.columns.len() {
            let mut column = Vec::new();
            column
                .try_reserve_exact(tuples)
                .map_err(|_| Error::allocation_failed(tuples.saturating_mul(self.columns.len())))?;
            column.resize(tuples, T::zero());
            columns.push(column);
        }
        self.columns = columns;
        self.tuples = tuples;
        Ok(())
    }

    fn reallocate_tuples(&mut self, tuples: usize) -> Result<()> {
        if tuples > self.tuples {
            // Reserve every column before growing any, so a failure part way
            // through leaves all columns at their old length.
            let requested = tuples.saturating_mul(self.columns.len());
            for column in &mut self.columns {
                column
                    .try_reserve_exact(tuples - column.len())
                    .map_err(|_| Error::allocation_failed(requested))?;
            }
            for column in &mut self.columns {
                column.resize(tuples, T::zero());
            }
        } else {
            for column in &mut self.columns {
                column.truncate(tuples);
                column.shrink_to_fit();
            }
        }
        self.tuples = tuples;
        Ok(())
    }

    #[inline]
    fn value(&self, tuple: usize, component: usize) -> T {
        self.columns[component][tuple]
    }

    #[inline]
    fn value_mut(&mut self, tuple: usize, component: usize) -> Option<&mut T> {
        Some(&mut self.columns[component][tuple])
    }

    fn memory_size(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.capacity() * mem::size_of::<T>())
            .sum()
    }
}
