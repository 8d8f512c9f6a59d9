//! The generic array: one size/capacity contract over any storage backend.
//!
//! A [`GenericArray`] owns exactly one backend and at most one lookup index.
//! It tracks two sizes, both in scalar values:
//!
//! - `capacity`: slots the backend currently provides, always a whole
//!   number of tuples;
//! - `len`: slots that hold logical content (`max_id + 1`), never more
//!   than `capacity`.
//!
//! Growing past capacity reallocates the backend; shrinking only moves
//! `len` down, so growing back within capacity recovers the old values.
//! Every mutation discards the lookup index before returning.

// Value counts are bounded by isize::MAX (checked in `checked_values`).
#![allow(clippy::cast_possible_wrap)]

use std::mem;
use std::ops::{Range, RangeInclusive};
use std::sync::OnceLock;

use polyarray_foundation::{BackendKind, Error, ErrorContext, ErrorKind, Result, Scalar, ScalarType};
use tracing::{debug, trace, warn};

use crate::backend::StorageBackend;
use crate::columnar::ColumnarBuffer;
use crate::config::{GrowthPolicy, LookupPolicy, StorageConfig};
use crate::data_array::DataArray;
use crate::implicit::{Rule, RuleGenerated};
use crate::lookup::{LookupIndex, LookupState, scan_all, scan_first, scan_range};
use crate::owned::OwnedBuffer;
use crate::range::{DYNAMIC, TupleRange, TupleRangeMut, ValueRange, ValueRangeMut};

/// Array over contiguous tuple-major storage.
pub type AosArray<T> = GenericArray<OwnedBuffer<T>>;

/// Array over per-component columns.
pub type SoaArray<T> = GenericArray<ColumnarBuffer<T>>;

/// Read-only array whose values come from a [`Rule`].
pub type ImplicitArray<T> = GenericArray<RuleGenerated<T>>;

/// A resizable array of fixed-width tuples over a storage backend `B`.
#[derive(Clone, Debug)]
pub struct GenericArray<B: StorageBackend> {
    pub(crate) backend: B,
    /// Allocated scalar slots.
    capacity: usize,
    /// Populated scalar slots.
    len: usize,
    config: StorageConfig,
    lookup: OnceLock<LookupIndex<B::Value>>,
}

impl<B: StorageBackend + Default> Default for GenericArray<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: StorageBackend + Default> GenericArray<B> {
    /// Creates an empty single-component array.
    #[must_use]
    pub fn new() -> Self {
        Self::from_backend(B::default())
    }

    /// Creates an empty array with `components` values per tuple.
    ///
    /// # Errors
    ///
    /// Returns an error if `components` is zero.
    pub fn with_components(components: usize) -> Result<Self> {
        let mut backend = B::default();
        backend.set_components(components)?;
        Ok(Self::from_backend(backend))
    }

    /// Replaces this array's shape and content with a copy of `source`.
    ///
    /// Values are cast at full width, so integers of any size convert
    /// exactly whenever the target type can hold them. A source of exactly
    /// this array's type is copied bit for bit.
    ///
    /// # Errors
    ///
    /// Returns an allocation failure if storage cannot be provided. The
    /// array is unchanged on failure.
    pub fn deep_copy(&mut self, source: &dyn DataArray) -> Result<()> {
        let mut copy = Self::with_components(source.number_of_components())?
            .with_config(self.config);
        copy.set_number_of_tuples(source.number_of_tuples())?;

        if let Some(same) = source.as_any().downcast_ref::<Self>() {
            for i in 0..same.len {
                copy.store(i, same.value(i))?;
            }
        } else {
            for i in 0..copy.len {
                copy.store(i, source.value_scalar(i).cast())?;
            }
        }

        *self = copy;
        Ok(())
    }
}

impl<T: Scalar> AosArray<T> {
    /// Creates an array from tuple-major values.
    ///
    /// # Errors
    ///
    /// Returns an error if `components` is zero or `values` is not a whole
    /// number of tuples.
    pub fn from_vec(components: usize, values: Vec<T>) -> Result<Self> {
        Ok(Self::from_backend(OwnedBuffer::from_vec(components, values)?))
    }

    /// Populated values as one slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.backend
            .as_slice()
            .map_or(&[][..], |data| &data[..self.len])
    }
}

impl<T: Scalar> SoaArray<T> {
    /// Creates an array from per-component columns of equal length.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no columns or their lengths differ.
    pub fn from_columns(columns: Vec<Vec<T>>) -> Result<Self> {
        Ok(Self::from_backend(ColumnarBuffer::from_columns(columns)?))
    }

    /// Populated values of one component.
    #[must_use]
    pub fn column(&self, component: usize) -> &[T] {
        &self.backend.column(component)[..self.number_of_tuples()]
    }
}

impl<T: Scalar> ImplicitArray<T> {
    /// Creates a read-only array evaluating `rule` over `tuples` tuples.
    ///
    /// # Errors
    ///
    /// Returns an error if `components` is zero or the shape overflows.
    pub fn from_rule(rule: Rule<T>, components: usize, tuples: usize) -> Result<Self> {
        let backend = RuleGenerated::new(rule, components, tuples)?;
        checked_values(tuples, components)?;
        Ok(Self::from_backend(backend))
    }

    /// Creates a single-component array with `value(i) = slope * i + intercept`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shape overflows.
    pub fn affine(slope: T, intercept: T, tuples: usize) -> Result<Self> {
        Self::from_rule(Rule::affine(slope, intercept), 1, tuples)
    }
}

impl<B: StorageBackend> GenericArray<B> {
    /// Wraps a backend; everything it currently holds is logical content.
    #[must_use]
    pub fn from_backend(backend: B) -> Self {
        let capacity = backend.allocated_tuples() * backend.components();
        Self {
            backend,
            capacity,
            len: capacity,
            config: StorageConfig::default(),
            lookup: OnceLock::new(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: StorageConfig) -> Self {
        self.config = config;
        self.lookup = OnceLock::new();
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> StorageConfig {
        self.config
    }

    /// Returns the backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Consumes the array, returning its backend.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }

    // --- Shape ---

    /// Scalar type of the values.
    #[must_use]
    pub fn scalar_type(&self) -> ScalarType {
        <B::Value as Scalar>::SCALAR_TYPE
    }

    /// Storage layout.
    #[must_use]
    pub fn backend_kind(&self) -> BackendKind {
        B::KIND
    }

    /// Returns true if every write is rejected.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        B::READ_ONLY
    }

    /// Values per tuple.
    #[must_use]
    pub fn number_of_components(&self) -> usize {
        self.backend.components()
    }

    /// Populated tuples.
    #[must_use]
    pub fn number_of_tuples(&self) -> usize {
        self.len / self.backend.components()
    }

    /// Populated values.
    #[must_use]
    pub fn number_of_values(&self) -> usize {
        self.len
    }

    /// Allocated value slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Highest populated value index, or `-1` when empty.
    #[must_use]
    pub fn max_id(&self) -> isize {
        self.len as isize - 1
    }

    /// Returns true if no values are populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes held by the backend.
    #[must_use]
    pub fn memory_size(&self) -> usize {
        self.backend.memory_size()
    }

    /// Bytes per value.
    #[must_use]
    pub fn element_size(&self) -> usize {
        mem::size_of::<B::Value>()
    }

    // --- Sizing ---

    /// Changes the tuple width. All content and storage are released.
    ///
    /// # Errors
    ///
    /// Returns an error if `components` is zero.
    pub fn set_number_of_components(&mut self, components: usize) -> Result<()> {
        if components == 0 {
            return Err(Error::new(ErrorKind::InvalidComponentCount(0)));
        }
        if components == self.backend.components() {
            return Ok(());
        }
        self.backend.set_components(components)?;
        self.capacity = 0;
        self.len = 0;
        self.data_changed();
        Ok(())
    }

    /// Provides storage for at least `values` slots and clears all content.
    ///
    /// The request is rounded up to whole tuples. Storage is replaced only
    /// when the rounded size exceeds capacity, and then sized exactly.
    /// Rule-generated arrays have no storage and become empty.
    ///
    /// # Errors
    ///
    /// Returns an allocation failure if storage cannot be provided. The
    /// array is unchanged on failure.
    pub fn allocate(&mut self, values: usize) -> Result<()> {
        let components = self.backend.components();
        let tuples = values.div_ceil(components);
        let rounded = checked_values(tuples, components)?;

        if B::EXACT_CAPACITY {
            self.backend.allocate_tuples(0)?;
            self.capacity = 0;
        } else if rounded > self.capacity {
            trace!(from = self.capacity, to = rounded, "allocating array storage");
            self.backend
                .allocate_tuples(tuples)
                .inspect_err(|e| warn!(requested = rounded, error = %e, "allocation failed"))
                .map_err(|e| e.with_context(self.error_context("allocate")))?;
            self.capacity = rounded;
        }
        self.len = 0;
        self.data_changed();
        Ok(())
    }

    /// Sets the number of populated tuples.
    ///
    /// Growing past capacity reallocates according to the configured
    /// [`GrowthPolicy`]; with the default amortized policy the new capacity
    /// is `capacity_tuples + tuples`. Shrinking never reallocates. New
    /// tuples exposed within existing capacity keep whatever values the
    /// storage holds.
    ///
    /// # Errors
    ///
    /// Returns an allocation failure if storage cannot be provided. The
    /// array is unchanged on failure.
    pub fn resize(&mut self, tuples: usize) -> Result<()> {
        let components = self.backend.components();
        let values = checked_values(tuples, components)?;
        if values == self.len {
            return Ok(());
        }

        if B::EXACT_CAPACITY {
            self.reallocate(tuples)?;
        } else if values > self.capacity {
            let capacity_tuples = self.capacity / components;
            let target = match self.config.growth {
                GrowthPolicy::Amortized => capacity_tuples.saturating_add(tuples),
                GrowthPolicy::Exact => tuples,
            };
            self.reallocate(target)?;
        }

        self.len = values;
        self.data_changed();
        Ok(())
    }

    /// Sets the number of populated tuples, keeping any extra capacity.
    ///
    /// # Errors
    ///
    /// Returns an allocation failure if storage cannot be provided.
    pub fn set_number_of_tuples(&mut self, tuples: usize) -> Result<()> {
        self.resize(tuples)
    }

    /// Sets the number of populated values, rounded up to whole tuples.
    ///
    /// # Errors
    ///
    /// Returns an allocation failure if storage cannot be provided.
    pub fn set_number_of_values(&mut self, values: usize) -> Result<()> {
        self.resize(values.div_ceil(self.backend.components()))
    }

    /// Shrinks capacity to exactly the populated size.
    ///
    /// # Errors
    ///
    /// Returns an allocation failure if the backend cannot move its storage.
    pub fn squeeze(&mut self) -> Result<()> {
        if self.capacity == self.len {
            return Ok(());
        }
        self.reallocate(self.number_of_tuples())
    }

    /// Releases all storage and content.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend refuses to release storage.
    pub fn initialize(&mut self) -> Result<()> {
        self.backend.allocate_tuples(0)?;
        self.capacity = 0;
        self.len = 0;
        self.data_changed();
        Ok(())
    }

    /// Makes tuple `tuple` addressable, growing the array if needed.
    ///
    /// # Errors
    ///
    /// Returns an allocation failure if the array must grow and cannot.
    pub fn ensure_access_to_tuple(&mut self, tuple: usize) -> Result<()> {
        let needed = tuple
            .checked_add(1)
            .ok_or_else(|| Error::invalid_index(tuple, self.number_of_tuples()))?;
        if self.len >= checked_values(needed, self.backend.components())? {
            return Ok(());
        }
        self.resize(needed)
    }

    // --- Values ---

    /// Reads the value at a flattened index.
    ///
    /// `index` must be below [`number_of_values`](Self::number_of_values).
    /// Indices past capacity panic; indices between the populated size and
    /// capacity return stale storage.
    #[inline]
    #[must_use]
    pub fn value(&self, index: usize) -> B::Value {
        debug_assert!(index < self.len, "value index {index} out of range");
        self.backend.value_at(index)
    }

    /// Writes the value at a flattened index.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation for rule-generated arrays.
    #[inline]
    pub fn set_value(&mut self, index: usize, value: B::Value) -> Result<()> {
        debug_assert!(index < self.len, "value index {index} out of range");
        self.store(index, value)?;
        self.data_changed();
        Ok(())
    }

    /// Writes the value at a flattened index, growing the array as needed.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation or an allocation failure.
    pub fn insert_value(&mut self, index: usize, value: B::Value) -> Result<()> {
        self.check_writable()?;
        self.ensure_access_to_tuple(index / self.backend.components())?;
        self.store(index, value)?;
        self.data_changed();
        Ok(())
    }

    /// Appends one value, returning its index. A partially filled final
    /// tuple is zero padded.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation or an allocation failure.
    pub fn insert_next_value(&mut self, value: B::Value) -> Result<usize> {
        let index = self.len;
        self.insert_value(index, value)?;
        Ok(index)
    }

    /// Reads one component of one tuple.
    #[inline]
    #[must_use]
    pub fn component(&self, tuple: usize, component: usize) -> B::Value {
        debug_assert!(tuple < self.number_of_tuples(), "tuple {tuple} out of range");
        self.backend.value(tuple, component)
    }

    /// Writes one component of one tuple.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation for rule-generated arrays.
    pub fn set_component(&mut self, tuple: usize, component: usize, value: B::Value) -> Result<()> {
        let index = tuple * self.backend.components() + component;
        self.set_value(index, value)
    }

    /// Writes one component of one tuple, growing the array as needed.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation or an allocation failure.
    pub fn insert_component(
        &mut self,
        tuple: usize,
        component: usize,
        value: B::Value,
    ) -> Result<()> {
        self.check_writable()?;
        self.ensure_access_to_tuple(tuple)?;
        self.set_component(tuple, component, value)
    }

    /// Sets every populated value.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation for rule-generated arrays.
    pub fn fill(&mut self, value: B::Value) -> Result<()> {
        self.values_mut()?.fill(value);
        Ok(())
    }

    /// Sets one component of every populated tuple.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, or an invalid index if `component`
    /// is out of range.
    pub fn fill_component(&mut self, component: usize, value: B::Value) -> Result<()> {
        self.check_writable()?;
        let components = self.backend.components();
        if component >= components {
            return Err(Error::invalid_index(component, components));
        }
        for tuple in 0..self.number_of_tuples() {
            self.store(tuple * components + component, value)?;
        }
        self.data_changed();
        Ok(())
    }

    // --- Tuples ---

    /// Copies a tuple into a new vector.
    #[must_use]
    pub fn tuple(&self, tuple: usize) -> Vec<B::Value> {
        (0..self.backend.components())
            .map(|c| self.component(tuple, c))
            .collect()
    }

    /// Copies a tuple into the front of `out`.
    ///
    /// # Errors
    ///
    /// Returns a component mismatch if `out` is shorter than one tuple.
    /// `out` is untouched on error.
    pub fn tuple_into(&self, tuple: usize, out: &mut [B::Value]) -> Result<()> {
        let components = self.backend.components();
        if out.len() < components {
            return Err(Error::component_mismatch(components, out.len()));
        }
        for (c, slot) in out[..components].iter_mut().enumerate() {
            *slot = self.component(tuple, c);
        }
        Ok(())
    }

    /// Overwrites a populated tuple.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch if `values` is
    /// not one tuple wide, or an invalid index if `tuple` is not populated.
    pub fn set_tuple(&mut self, tuple: usize, values: &[B::Value]) -> Result<()> {
        self.check_writable()?;
        self.check_width(values.len())?;
        let tuples = self.number_of_tuples();
        if tuple >= tuples {
            return Err(Error::invalid_index(tuple, tuples));
        }
        self.write_tuple(tuple, values)
    }

    /// Writes a tuple, growing the array as needed.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch, or an
    /// allocation failure. The array is unchanged on error.
    pub fn insert_tuple(&mut self, tuple: usize, values: &[B::Value]) -> Result<()> {
        self.check_writable()?;
        self.check_width(values.len())?;
        self.ensure_access_to_tuple(tuple)?;
        self.write_tuple(tuple, values)
    }

    /// Appends a tuple, returning its index.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch, or an
    /// allocation failure.
    pub fn insert_next_tuple(&mut self, values: &[B::Value]) -> Result<usize> {
        let tuple = self.number_of_tuples();
        self.insert_tuple(tuple, values)?;
        Ok(tuple)
    }

    /// Overwrites populated tuple `tuple` with tuple `source_tuple` of
    /// `source`, casting each component at full width.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch if the widths
    /// differ, or an invalid index if either tuple is not populated.
    pub fn set_tuple_from(
        &mut self,
        tuple: usize,
        source_tuple: usize,
        source: &dyn DataArray,
    ) -> Result<()> {
        self.check_writable()?;
        let values = self.read_source_tuple(source, source_tuple)?;
        self.set_tuple(tuple, &values)
    }

    /// Writes tuple `source_tuple` of `source` at `tuple`, growing the
    /// array as needed.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch, an invalid
    /// index for an unpopulated source tuple, or an allocation failure.
    pub fn insert_tuple_from(
        &mut self,
        tuple: usize,
        source_tuple: usize,
        source: &dyn DataArray,
    ) -> Result<()> {
        self.check_writable()?;
        let values = self.read_source_tuple(source, source_tuple)?;
        self.insert_tuple(tuple, &values)
    }

    /// Appends tuple `source_tuple` of `source`, returning its index.
    ///
    /// # Errors
    ///
    /// See [`insert_tuple_from`](Self::insert_tuple_from).
    pub fn insert_next_tuple_from(
        &mut self,
        source_tuple: usize,
        source: &dyn DataArray,
    ) -> Result<usize> {
        let tuple = self.number_of_tuples();
        self.insert_tuple_from(tuple, source_tuple, source)?;
        Ok(tuple)
    }

    /// For each pair, writes tuple `source_tuples[i]` of `source` at
    /// `tuples[i]`, growing the array once to fit the largest target.
    ///
    /// Later pairs win when a target repeats.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch if the widths or
    /// the two id lists differ in length, an invalid index for an
    /// unpopulated source tuple, or an allocation failure. Every id is
    /// checked before anything is written.
    pub fn insert_tuples_from(
        &mut self,
        tuples: &[usize],
        source_tuples: &[usize],
        source: &dyn DataArray,
    ) -> Result<()> {
        self.check_writable()?;
        if tuples.len() != source_tuples.len() {
            return Err(Error::component_mismatch(tuples.len(), source_tuples.len()));
        }
        let gathered = source_tuples
            .iter()
            .map(|&id| self.read_source_tuple(source, id))
            .collect::<Result<Vec<_>>>()?;

        if let Some(&last) = tuples.iter().max() {
            self.ensure_access_to_tuple(last)?;
        }
        for (&tuple, values) in tuples.iter().zip(&gathered) {
            self.write_tuple(tuple, values)?;
        }
        Ok(())
    }

    /// Removes a tuple, shifting later tuples down. Capacity is unchanged.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation or an invalid index.
    pub fn remove_tuple(&mut self, tuple: usize) -> Result<()> {
        self.check_writable()?;
        let tuples = self.number_of_tuples();
        if tuple >= tuples {
            return Err(Error::invalid_index(tuple, tuples));
        }

        let components = self.backend.components();
        let start = tuple * components;
        let end = self.len;
        if let Some(data) = self.backend.as_mut_slice() {
            data.copy_within(start + components..end, start);
        } else {
            for i in start..end - components {
                let moved = self.backend.value_at(i + components);
                self.store(i, moved)?;
            }
        }

        self.len -= components;
        self.data_changed();
        Ok(())
    }

    /// Removes the first tuple.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation or an invalid index if empty.
    pub fn remove_first_tuple(&mut self) -> Result<()> {
        self.remove_tuple(0)
    }

    /// Removes the last tuple.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation or an invalid index if empty.
    pub fn remove_last_tuple(&mut self) -> Result<()> {
        self.check_writable()?;
        if self.len == 0 {
            return Err(Error::invalid_index(0, 0));
        }
        self.len -= self.backend.components();
        self.data_changed();
        Ok(())
    }

    /// Copies the tuples listed in `ids` into `output`, in order.
    ///
    /// `output` is resized to `ids.len()` tuples and values are cast to its
    /// scalar type.
    ///
    /// # Errors
    ///
    /// Returns a component mismatch if the widths differ, an invalid index
    /// for an unpopulated id, or any error from writing `output`.
    pub fn copy_tuples<O: StorageBackend>(
        &self,
        ids: &[usize],
        output: &mut GenericArray<O>,
    ) -> Result<()> {
        output.check_writable()?;
        let components = self.backend.components();
        output.check_width(components)?;
        let tuples = self.number_of_tuples();
        if let Some(&bad) = ids.iter().find(|&&id| id >= tuples) {
            return Err(Error::invalid_index(bad, tuples));
        }

        output.set_number_of_tuples(ids.len())?;
        for (dst, &src) in ids.iter().enumerate() {
            for c in 0..components {
                output.store(dst * components + c, self.component(src, c).cast())?;
            }
        }
        output.data_changed();
        Ok(())
    }

    /// Copies tuples `p1..=p2` into `output`.
    ///
    /// # Errors
    ///
    /// See [`copy_tuples`](Self::copy_tuples).
    pub fn copy_tuples_in<O: StorageBackend>(
        &self,
        tuples: RangeInclusive<usize>,
        output: &mut GenericArray<O>,
    ) -> Result<()> {
        let ids: Vec<usize> = tuples.collect();
        self.copy_tuples(&ids, output)
    }

    /// Copies the sub-block of tuples `tuples` and components `components`
    /// into `output`.
    ///
    /// `output` is reshaped to `components.len()` components and
    /// `tuples.len()` tuples, so output tuple `t` component `c` holds this
    /// array's tuple `tuples.start() + t` component `components.start() + c`.
    ///
    /// # Errors
    ///
    /// Returns an invalid index if either range is empty or reaches past
    /// the populated tuples or the components, and any error from writing
    /// `output`. `output` is unchanged when a range is rejected.
    pub fn copy_block<O: StorageBackend>(
        &self,
        tuples: RangeInclusive<usize>,
        components: RangeInclusive<usize>,
        output: &mut GenericArray<O>,
    ) -> Result<()> {
        output.check_writable()?;
        let (t0, t1) = (*tuples.start(), *tuples.end());
        let (c0, c1) = (*components.start(), *components.end());
        let count = self.number_of_tuples();
        let width = self.backend.components();
        if t1 >= count {
            return Err(Error::invalid_index(t1, count));
        }
        if t0 > t1 {
            return Err(Error::invalid_index(t0, t1));
        }
        if c1 >= width {
            return Err(Error::invalid_index(c1, width));
        }
        if c0 > c1 {
            return Err(Error::invalid_index(c0, c1));
        }

        let block_width = c1 - c0 + 1;
        output.set_number_of_components(block_width)?;
        output.set_number_of_tuples(t1 - t0 + 1)?;
        for (dst, src) in (t0..=t1).enumerate() {
            for (c, sc) in (c0..=c1).enumerate() {
                output.store(dst * block_width + c, self.component(src, sc).cast())?;
            }
        }
        output.data_changed();
        Ok(())
    }

    /// Copies component `source_component` of `source` into component
    /// `component` of this array, tuple by tuple.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, or an invalid index if the tuple
    /// counts differ or a component is out of range.
    pub fn copy_component<S: StorageBackend>(
        &mut self,
        component: usize,
        source: &GenericArray<S>,
        source_component: usize,
    ) -> Result<()> {
        self.check_writable()?;
        let components = self.backend.components();
        let tuples = self.number_of_tuples();
        if source.number_of_tuples() != tuples {
            return Err(Error::invalid_index(source.number_of_tuples(), tuples));
        }
        if component >= components {
            return Err(Error::invalid_index(component, components));
        }
        if source_component >= source.number_of_components() {
            return Err(Error::invalid_index(
                source_component,
                source.number_of_components(),
            ));
        }

        for t in 0..tuples {
            let value = source.component(t, source_component).cast();
            self.store(t * components + component, value)?;
        }
        self.data_changed();
        Ok(())
    }

    /// Writes at `tuple` the weighted sum of the `ids` tuples of `source`.
    ///
    /// Integer types round to nearest.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch if the widths
    /// (or `ids` and `weights`) differ, an invalid index for an unpopulated
    /// id, or an allocation failure.
    pub fn interpolate_tuple(
        &mut self,
        tuple: usize,
        ids: &[usize],
        source: &dyn DataArray,
        weights: &[f64],
    ) -> Result<()> {
        self.check_writable()?;
        self.check_width(source.number_of_components())?;
        if ids.len() != weights.len() {
            return Err(Error::component_mismatch(ids.len(), weights.len()));
        }
        let source_tuples = source.number_of_tuples();
        if let Some(&bad) = ids.iter().find(|&&id| id >= source_tuples) {
            return Err(Error::invalid_index(bad, source_tuples));
        }

        let values: Vec<B::Value> = (0..self.backend.components())
            .map(|c| {
                let sum: f64 = ids
                    .iter()
                    .zip(weights)
                    .map(|(&id, &w)| w * source.component_f64(id, c))
                    .sum();
                B::Value::from_f64_rounded(sum)
            })
            .collect();
        self.insert_tuple(tuple, &values)
    }

    /// Writes at `tuple` the linear blend `(1 - t) * a + t * b` of tuple
    /// `id1` of `source1` and tuple `id2` of `source2`.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch, an invalid
    /// index, or an allocation failure.
    pub fn interpolate_tuple_between(
        &mut self,
        tuple: usize,
        id1: usize,
        source1: &dyn DataArray,
        id2: usize,
        source2: &dyn DataArray,
        t: f64,
    ) -> Result<()> {
        self.check_writable()?;
        self.check_width(source1.number_of_components())?;
        self.check_width(source2.number_of_components())?;
        if id1 >= source1.number_of_tuples() {
            return Err(Error::invalid_index(id1, source1.number_of_tuples()));
        }
        if id2 >= source2.number_of_tuples() {
            return Err(Error::invalid_index(id2, source2.number_of_tuples()));
        }

        let values: Vec<B::Value> = (0..self.backend.components())
            .map(|c| {
                let a = source1.component_f64(id1, c);
                let b = source2.component_f64(id2, c);
                B::Value::from_f64_rounded((1.0 - t) * a + t * b)
            })
            .collect();
        self.insert_tuple(tuple, &values)
    }

    // --- Ranges ---

    /// Minimum and maximum of one component, ignoring NaN.
    ///
    /// Returns `None` if the array is empty, every value is NaN, or
    /// `component` is out of range.
    #[must_use]
    pub fn component_range(&self, component: usize) -> Option<(B::Value, B::Value)> {
        if component >= self.backend.components() {
            return None;
        }
        (0..self.number_of_tuples())
            .map(|t| self.component(t, component))
            .filter(|v| v.partial_cmp(v).is_some())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((
                    if v < lo { v } else { lo },
                    if v > hi { v } else { hi },
                )),
            })
    }

    /// Minimum and maximum Euclidean tuple magnitude, ignoring NaN.
    #[must_use]
    pub fn magnitude_range(&self) -> Option<(f64, f64)> {
        let components = self.backend.components();
        (0..self.number_of_tuples())
            .map(|t| {
                (0..components)
                    .map(|c| self.component(t, c).as_f64().powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .filter(|m| !m.is_nan())
            .fold(None, |acc, m| match acc {
                None => Some((m, m)),
                Some((lo, hi)) => Some((lo.min(m), hi.max(m))),
            })
    }

    // --- Lookup ---

    /// Lowest flattened index holding exactly `value`.
    ///
    /// The first call after a mutation builds the lookup index (unless the
    /// configuration asks for linear scans). Call [`build_lookup`](Self::build_lookup)
    /// before sharing the array across threads to make later lookups pure reads.
    #[must_use]
    pub fn lookup_value(&self, value: B::Value) -> Option<usize> {
        let found = match self.config.lookup {
            LookupPolicy::Indexed => self.lookup_index().find_first(value),
            LookupPolicy::LinearScan => scan_first(self.values().iter(), value),
        };
        if found.is_none() {
            trace!(%value, "lookup miss");
        }
        found
    }

    /// Every flattened index holding exactly `value`, ascending.
    #[must_use]
    pub fn lookup_all(&self, value: B::Value) -> Vec<usize> {
        match self.config.lookup {
            LookupPolicy::Indexed => self.lookup_index().find_all(value),
            LookupPolicy::LinearScan => scan_all(self.values().iter(), value),
        }
    }

    /// Every flattened index whose value lies in `low..=high`, ordered by
    /// value then index.
    #[must_use]
    pub fn lookup_range(&self, low: B::Value, high: B::Value) -> Vec<usize> {
        match self.config.lookup {
            LookupPolicy::Indexed => self.lookup_index().find_range(low, high),
            LookupPolicy::LinearScan => scan_range(self.values().iter(), low, high),
        }
    }

    /// Builds the lookup index now if it is not already built.
    pub fn build_lookup(&self) {
        if self.config.lookup == LookupPolicy::Indexed {
            self.lookup_index();
        }
    }

    /// Current lifecycle state of the lookup index.
    #[must_use]
    pub fn lookup_state(&self) -> LookupState {
        if self.lookup.get().is_some() {
            LookupState::Built
        } else if self.len == 0 {
            LookupState::Empty
        } else {
            LookupState::Unbuilt
        }
    }

    /// Discards the lookup index.
    pub fn clear_lookup(&mut self) {
        self.data_changed();
    }

    /// Records that values changed, discarding the lookup index.
    pub fn data_changed(&mut self) {
        if self.lookup.take().is_some() {
            debug!(values = self.len, "discarded lookup index");
        }
    }

    fn lookup_index(&self) -> &LookupIndex<B::Value> {
        self.lookup.get_or_init(|| {
            debug!(values = self.len, "building lookup index");
            LookupIndex::build(self.values())
        })
    }

    // --- Iteration ---

    /// All populated values in flattened order.
    #[must_use]
    pub fn values(&self) -> ValueRange<'_, B> {
        ValueRange::new(&self.backend, 0, self.len)
    }

    /// Values of tuples `tuples.start..tuples.end`.
    ///
    /// # Errors
    ///
    /// Returns an invalid index if the range exceeds the populated tuples.
    pub fn values_in(&self, tuples: Range<usize>) -> Result<ValueRange<'_, B>> {
        let (begin, end) = self.check_tuple_range(&tuples)?;
        let components = self.backend.components();
        Ok(ValueRange::new(
            &self.backend,
            begin * components,
            end * components,
        ))
    }

    /// All populated tuples, `N` components wide ([`DYNAMIC`] for any width).
    ///
    /// # Errors
    ///
    /// Returns a component mismatch if `N` is fixed and differs from the
    /// array's width.
    pub fn tuples<const N: usize>(&self) -> Result<TupleRange<'_, B, N>> {
        self.tuples_in::<N>(0..self.number_of_tuples())
    }

    /// Tuples `tuples.start..tuples.end`, `N` components wide.
    ///
    /// # Errors
    ///
    /// Returns a component mismatch or an invalid index.
    pub fn tuples_in<const N: usize>(&self, tuples: Range<usize>) -> Result<TupleRange<'_, B, N>> {
        self.check_fixed_width::<N>()?;
        let (begin, end) = self.check_tuple_range(&tuples)?;
        Ok(TupleRange::new(
            &self.backend,
            begin,
            end,
            self.backend.components(),
        ))
    }

    /// All populated tuples with a width known only at runtime.
    #[must_use]
    pub fn tuples_dyn(&self) -> TupleRange<'_, B, DYNAMIC> {
        TupleRange::new(
            &self.backend,
            0,
            self.number_of_tuples(),
            self.backend.components(),
        )
    }

    /// Writable view of all populated values.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation for rule-generated arrays.
    pub fn values_mut(&mut self) -> Result<ValueRangeMut<'_, B>> {
        self.check_writable()?;
        self.data_changed();
        let len = self.len;
        Ok(ValueRangeMut::new(&mut self.backend, 0, len))
    }

    /// Writable view of all populated tuples, `N` components wide.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation or a component mismatch.
    pub fn tuples_mut<const N: usize>(&mut self) -> Result<TupleRangeMut<'_, B, N>> {
        self.check_writable()?;
        self.check_fixed_width::<N>()?;
        self.data_changed();
        let tuples = self.number_of_tuples();
        let components = self.backend.components();
        Ok(TupleRangeMut::new(&mut self.backend, 0, tuples, components))
    }

    // --- Private helpers ---

    pub(crate) fn check_writable(&self) -> Result<()> {
        if B::READ_ONLY {
            trace!(backend = %B::KIND, "rejected write to read-only array");
            return Err(Error::read_only(B::KIND));
        }
        Ok(())
    }

    fn check_width(&self, width: usize) -> Result<()> {
        let components = self.backend.components();
        if width == components {
            Ok(())
        } else {
            Err(Error::component_mismatch(components, width))
        }
    }

    fn check_fixed_width<const N: usize>(&self) -> Result<()> {
        if N == DYNAMIC {
            return Ok(());
        }
        self.check_width(N)
    }

    fn check_tuple_range(&self, tuples: &Range<usize>) -> Result<(usize, usize)> {
        let count = self.number_of_tuples();
        if tuples.end > count {
            return Err(Error::invalid_index(tuples.end, count));
        }
        if tuples.start > tuples.end {
            return Err(Error::invalid_index(tuples.start, tuples.end));
        }
        Ok((tuples.start, tuples.end))
    }

    /// Writes one value without invalidating the lookup index.
    #[inline]
    pub(crate) fn store(&mut self, index: usize, value: B::Value) -> Result<()> {
        let slot = self
            .backend
            .value_at_mut(index)
            .ok_or_else(|| Error::read_only(B::KIND))?;
        *slot = value;
        Ok(())
    }

    fn write_tuple(&mut self, tuple: usize, values: &[B::Value]) -> Result<()> {
        for (c, &value) in values.iter().enumerate() {
            let slot = self
                .backend
                .value_mut(tuple, c)
                .ok_or_else(|| Error::read_only(B::KIND))?;
            *slot = value;
        }
        self.data_changed();
        Ok(())
    }

    /// Reads one tuple of `source` in this array's type.
    fn read_source_tuple(&self, source: &dyn DataArray, tuple: usize) -> Result<Vec<B::Value>> {
        self.check_width(source.number_of_components())?;
        let tuples = source.number_of_tuples();
        if tuple >= tuples {
            return Err(Error::invalid_index(tuple, tuples));
        }
        Ok((0..self.backend.components())
            .map(|c| source.component_scalar(tuple, c).cast())
            .collect())
    }

    fn error_context(&self, operation: &str) -> ErrorContext {
        ErrorContext::new()
            .with_operation(operation)
            .with_array(format!("{}<{}>", B::KIND, self.scalar_type()))
    }

    /// Moves the backend to exactly `tuples` tuples of storage.
    fn reallocate(&mut self, tuples: usize) -> Result<()> {
        let components = self.backend.components();
        let values = checked_values(tuples, components)?;
        trace!(from = self.capacity, to = values, "reallocating array storage");
        self.backend
            .reallocate_tuples(tuples)
            .inspect_err(|e| warn!(requested = values, error = %e, "reallocation failed"))
            .map_err(|e| e.with_context(self.error_context("reallocate")))?;
        self.capacity = values;
        self.len = self.len.min(values);
        Ok(())
    }
}

/// `tuples * components`, failing as an allocation error when the product
/// cannot be addressed.
fn checked_values(tuples: usize, components: usize) -> Result<usize> {
    tuples
        .checked_mul(components)
        .filter(|&n| isize::try_from(n).is_ok())
        .ok_or_else(|| Error::allocation_failed(usize::MAX))
}
