//! Type-erased access to arrays of any scalar type and layout.
//!
//! [`DataArray`] is the polymorphic handle: it is object safe, exchanges
//! values as `f64` (or losslessly as [`ScalarValue`]), and can be downcast
//! back to a concrete [`GenericArray`] for typed work. Hot loops should downcast (or use the
//! dispatcher) rather than call the `_f64` methods per value.

use std::any::Any;
use std::fmt::Debug;

use num_traits::NumCast;
use polyarray_foundation::{BackendKind, Result, Scalar, ScalarType, ScalarValue};

use crate::array::GenericArray;
use crate::backend::StorageBackend;
use crate::lookup::LookupState;

/// An array of numeric tuples whose scalar type and layout are known only
/// at runtime.
pub trait DataArray: Debug + Send + Sync {
    /// Upcast for downcasting to the concrete array type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete array type.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Scalar type of the values.
    fn scalar_type(&self) -> ScalarType;

    /// Storage layout.
    fn backend_kind(&self) -> BackendKind;

    /// Returns true if every write is rejected.
    fn is_read_only(&self) -> bool;

    /// Values per tuple.
    fn number_of_components(&self) -> usize;

    /// Populated tuples.
    fn number_of_tuples(&self) -> usize;

    /// Populated values.
    fn number_of_values(&self) -> usize;

    /// Allocated value slots.
    fn capacity(&self) -> usize;

    /// Highest populated value index, or `-1` when empty.
    fn max_id(&self) -> isize;

    /// Bytes held by the storage.
    fn memory_size(&self) -> usize;

    /// Bytes per value.
    fn element_size(&self) -> usize {
        self.scalar_type().size()
    }

    /// See [`GenericArray::set_number_of_components`].
    ///
    /// # Errors
    ///
    /// Returns an error if `components` is zero.
    fn set_number_of_components(&mut self, components: usize) -> Result<()>;

    /// See [`GenericArray::allocate`].
    ///
    /// # Errors
    ///
    /// Returns an allocation failure.
    fn allocate(&mut self, values: usize) -> Result<()>;

    /// See [`GenericArray::resize`].
    ///
    /// # Errors
    ///
    /// Returns an allocation failure.
    fn resize(&mut self, tuples: usize) -> Result<()>;

    /// See [`GenericArray::squeeze`].
    ///
    /// # Errors
    ///
    /// Returns an allocation failure.
    fn squeeze(&mut self) -> Result<()>;

    /// See [`GenericArray::initialize`].
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be released.
    fn initialize(&mut self) -> Result<()>;

    /// Reads a value as `f64`.
    fn value_f64(&self, index: usize) -> f64;

    /// Reads one component of one tuple as `f64`.
    fn component_f64(&self, tuple: usize, component: usize) -> f64;

    /// Reads a value at its full width.
    fn value_scalar(&self, index: usize) -> ScalarValue;

    /// Reads one component of one tuple at its full width.
    fn component_scalar(&self, tuple: usize, component: usize) -> ScalarValue {
        self.value_scalar(tuple * self.number_of_components() + component)
    }

    /// Copies a tuple as `f64`.
    fn tuple_f64(&self, tuple: usize) -> Vec<f64> {
        (0..self.number_of_components())
            .map(|c| self.component_f64(tuple, c))
            .collect()
    }

    /// Writes a value, converting with saturation.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation.
    fn set_value_f64(&mut self, index: usize, value: f64) -> Result<()>;

    /// Writes one component of one tuple, converting with saturation.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation.
    fn set_component_f64(&mut self, tuple: usize, component: usize, value: f64) -> Result<()>;

    /// Writes a tuple, growing the array as needed.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch, or an
    /// allocation failure.
    fn insert_tuple_f64(&mut self, tuple: usize, values: &[f64]) -> Result<()>;

    /// Appends a tuple, returning its index.
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch, or an
    /// allocation failure.
    fn insert_next_tuple_f64(&mut self, values: &[f64]) -> Result<usize> {
        let tuple = self.number_of_tuples();
        self.insert_tuple_f64(tuple, values)?;
        Ok(tuple)
    }

    /// See [`GenericArray::set_tuple_from`].
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch, or an invalid
    /// index.
    fn set_tuple_from(
        &mut self,
        tuple: usize,
        source_tuple: usize,
        source: &dyn DataArray,
    ) -> Result<()>;

    /// See [`GenericArray::insert_tuple_from`].
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch, an invalid
    /// index, or an allocation failure.
    fn insert_tuple_from(
        &mut self,
        tuple: usize,
        source_tuple: usize,
        source: &dyn DataArray,
    ) -> Result<()>;

    /// Appends tuple `source_tuple` of `source`, returning its index.
    ///
    /// # Errors
    ///
    /// See [`insert_tuple_from`](Self::insert_tuple_from).
    fn insert_next_tuple_from(
        &mut self,
        source_tuple: usize,
        source: &dyn DataArray,
    ) -> Result<usize> {
        let tuple = self.number_of_tuples();
        self.insert_tuple_from(tuple, source_tuple, source)?;
        Ok(tuple)
    }

    /// See [`GenericArray::insert_tuples_from`].
    ///
    /// # Errors
    ///
    /// Returns a read-only violation, a component mismatch, an invalid
    /// index, or an allocation failure.
    fn insert_tuples_from(
        &mut self,
        tuples: &[usize],
        source_tuples: &[usize],
        source: &dyn DataArray,
    ) -> Result<()>;

    /// See [`GenericArray::remove_tuple`].
    ///
    /// # Errors
    ///
    /// Returns a read-only violation or an invalid index.
    fn remove_tuple(&mut self, tuple: usize) -> Result<()>;

    /// Lowest index holding `value`. Returns `None` when `value` is not
    /// exactly representable in the array's scalar type.
    fn lookup_f64(&self, value: f64) -> Option<usize>;

    /// Every index holding `value`, ascending.
    fn lookup_all_f64(&self, value: f64) -> Vec<usize>;

    /// See [`GenericArray::build_lookup`].
    fn build_lookup(&self);

    /// See [`GenericArray::lookup_state`].
    fn lookup_state(&self) -> LookupState;

    /// See [`GenericArray::data_changed`].
    fn data_changed(&mut self);

    /// Minimum and maximum of one component as `f64`, ignoring NaN.
    fn component_range_f64(&self, component: usize) -> Option<(f64, f64)>;
}

impl dyn DataArray {
    /// Returns the concrete array if it is an `A`.
    #[must_use]
    pub fn downcast_ref<A: DataArray + 'static>(&self) -> Option<&A> {
        self.as_any().downcast_ref()
    }

    /// Returns the concrete array mutably if it is an `A`.
    pub fn downcast_mut<A: DataArray + 'static>(&mut self) -> Option<&mut A> {
        self.as_any_mut().downcast_mut()
    }

    /// Returns true if the array is an `A`.
    #[must_use]
    pub fn is<A: DataArray + 'static>(&self) -> bool {
        self.as_any().is::<A>()
    }
}

/// Converts `value` to `T` only if it round-trips exactly.
fn exact<T: Scalar>(value: f64) -> Option<T> {
    let typed = <T as NumCast>::from(value)?;
    let back = typed.as_f64();
    (back == value || (back.is_nan() && value.is_nan())).then_some(typed)
}

impl<B: StorageBackend> DataArray for GenericArray<B> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn scalar_type(&self) -> ScalarType {
        <B::Value as Scalar>::SCALAR_TYPE
    }

    fn backend_kind(&self) -> BackendKind {
        B::KIND
    }

    fn is_read_only(&self) -> bool {
        B::READ_ONLY
    }

    fn number_of_components(&self) -> usize {
        GenericArray::number_of_components(self)
    }

    fn number_of_tuples(&self) -> usize {
        GenericArray::number_of_tuples(self)
    }

    fn number_of_values(&self) -> usize {
        GenericArray::number_of_values(self)
    }

    fn capacity(&self) -> usize {
        GenericArray::capacity(self)
    }

    fn max_id(&self) -> isize {
        GenericArray::max_id(self)
    }

    fn memory_size(&self) -> usize {
        GenericArray::memory_size(self)
    }

    fn set_number_of_components(&mut self, components: usize) -> Result<()> {
        GenericArray::set_number_of_components(self, components)
    }

    fn allocate(&mut self, values: usize) -> Result<()> {
        GenericArray::allocate(self, values)
    }

    fn resize(&mut self, tuples: usize) -> Result<()> {
        GenericArray::resize(self, tuples)
    }

    fn squeeze(&mut self) -> Result<()> {
        GenericArray::squeeze(self)
    }

    fn initialize(&mut self) -> Result<()> {
        GenericArray::initialize(self)
    }

    fn value_f64(&self, index: usize) -> f64 {
        self.value(index).as_f64()
    }

    fn component_f64(&self, tuple: usize, component: usize) -> f64 {
        self.component(tuple, component).as_f64()
    }

    fn value_scalar(&self, index: usize) -> ScalarValue {
        self.value(index).to_value()
    }

    fn component_scalar(&self, tuple: usize, component: usize) -> ScalarValue {
        self.component(tuple, component).to_value()
    }

    fn set_value_f64(&mut self, index: usize, value: f64) -> Result<()> {
        self.set_value(index, B::Value::from_f64(value))
    }

    fn set_component_f64(&mut self, tuple: usize, component: usize, value: f64) -> Result<()> {
        self.set_component(tuple, component, B::Value::from_f64(value))
    }

    fn insert_tuple_f64(&mut self, tuple: usize, values: &[f64]) -> Result<()> {
        self.check_writable()?;
        let typed: Vec<B::Value> = values.iter().map(|&v| B::Value::from_f64(v)).collect();
        self.insert_tuple(tuple, &typed)
    }

    fn set_tuple_from(
        &mut self,
        tuple: usize,
        source_tuple: usize,
        source: &dyn DataArray,
    ) -> Result<()> {
        GenericArray::set_tuple_from(self, tuple, source_tuple, source)
    }

    fn insert_tuple_from(
        &mut self,
        tuple: usize,
        source_tuple: usize,
        source: &dyn DataArray,
    ) -> Result<()> {
        GenericArray::insert_tuple_from(self, tuple, source_tuple, source)
    }

    fn insert_tuples_from(
        &mut self,
        tuples: &[usize],
        source_tuples: &[usize],
        source: &dyn DataArray,
    ) -> Result<()> {
        GenericArray::insert_tuples_from(self, tuples, source_tuples, source)
    }

    fn remove_tuple(&mut self, tuple: usize) -> Result<()> {
        GenericArray::remove_tuple(self, tuple)
    }

    fn lookup_f64(&self, value: f64) -> Option<usize> {
        self.lookup_value(exact(value)?)
    }

    fn lookup_all_f64(&self, value: f64) -> Vec<usize> {
        exact(value).map_or_else(Vec::new, |typed| self.lookup_all(typed))
    }

    fn build_lookup(&self) {
        GenericArray::build_lookup(self);
    }

    fn lookup_state(&self) -> LookupState {
        GenericArray::lookup_state(self)
    }

    fn data_changed(&mut self) {
        GenericArray::data_changed(self);
    }

    fn component_range_f64(&self, component: usize) -> Option<(f64, f64)> {
        self.component_range(component)
            .map(|(lo, hi)| (lo.as_f64(), hi.as_f64()))
    }
}
