//! Typed views over an array's values and tuples.
//!
//! Ranges borrow the backend directly, so iterating never goes through the
//! type-erased [`DataArray`](crate::DataArray) interface. Read views are
//! `Copy` and may be shared across threads. Mutable views are created only
//! for writable backends, and creating one discards the array's lookup index.
//!
//! Tuple views take a const width `N`. [`DYNAMIC`] (zero) means the width
//! is only known at runtime.

use std::iter::FusedIterator;

use crate::backend::StorageBackend;

/// Tuple width marker for views whose width is read from the array.
pub const DYNAMIC: usize = 0;

// ============================================================================
// Value ranges
// ============================================================================

/// Flattened values `begin..end` of an array.
#[derive(Debug)]
pub struct ValueRange<'a, B: StorageBackend> {
    backend: &'a B,
    begin: usize,
    end: usize,
}

impl<B: StorageBackend> Clone for ValueRange<'_, B> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: StorageBackend> Copy for ValueRange<'_, B> {}

impl<'a, B: StorageBackend> ValueRange<'a, B> {
    pub(crate) fn new(backend: &'a B, begin: usize, end: usize) -> Self {
        Self {
            backend,
            begin,
            end,
        }
    }

    /// Number of values in the range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Returns true if the range holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Value at `index` within the range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<B::Value> {
        (index < self.len()).then(|| self.backend.value_at(self.begin + index))
    }

    /// The range as one slice, if the backend is contiguous.
    #[must_use]
    pub fn as_slice(&self) -> Option<&'a [B::Value]> {
        self.backend
            .as_slice()
            .map(|data| &data[self.begin..self.end])
    }

    /// Iterates the values.
    #[must_use]
    pub fn iter(&self) -> ValueIter<'a, B> {
        ValueIter {
            backend: self.backend,
            front: self.begin,
            back: self.end,
        }
    }

    /// Copies the values into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<B::Value> {
        match self.as_slice() {
            Some(slice) => slice.to_vec(),
            None => self.iter().collect(),
        }
    }
}

impl<'a, B: StorageBackend> IntoIterator for ValueRange<'a, B> {
    type Item = B::Value;
    type IntoIter = ValueIter<'a, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`ValueRange`].
#[derive(Debug)]
pub struct ValueIter<'a, B: StorageBackend> {
    backend: &'a B,
    front: usize,
    back: usize,
}

impl<B: StorageBackend> Clone for ValueIter<'_, B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend,
            front: self.front,
            back: self.back,
        }
    }
}

impl<B: StorageBackend> Iterator for ValueIter<'_, B> {
    type Item = B::Value;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let value = self.backend.value_at(self.front);
        self.front += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<B: StorageBackend> DoubleEndedIterator for ValueIter<'_, B> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.backend.value_at(self.back))
    }
}

impl<B: StorageBackend> ExactSizeIterator for ValueIter<'_, B> {}

impl<B: StorageBackend> FusedIterator for ValueIter<'_, B> {}

// ============================================================================
// Tuple ranges
// ============================================================================

/// Tuples `begin..end` of an array, `N` components wide.
#[derive(Debug)]
pub struct TupleRange<'a, B: StorageBackend, const N: usize> {
    backend: &'a B,
    begin: usize,
    end: usize,
    components: usize,
}

impl<B: StorageBackend, const N: usize> Clone for TupleRange<'_, B, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: StorageBackend, const N: usize> Copy for TupleRange<'_, B, N> {}

impl<'a, B: StorageBackend, const N: usize> TupleRange<'a, B, N> {
    pub(crate) fn new(backend: &'a B, begin: usize, end: usize, components: usize) -> Self {
        debug_assert!(N == DYNAMIC || N == components);
        Self {
            backend,
            begin,
            end,
            components,
        }
    }

    /// Number of tuples in the range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Returns true if the range holds no tuples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Components per tuple.
    #[must_use]
    pub fn width(&self) -> usize {
        self.components
    }

    /// Tuple at `index` within the range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<TupleRef<'a, B, N>> {
        (index < self.len()).then(|| TupleRef {
            backend: self.backend,
            tuple: self.begin + index,
            components: self.components,
        })
    }

    /// Iterates the tuples.
    #[must_use]
    pub fn iter(&self) -> TupleIter<'a, B, N> {
        TupleIter {
            range: *self,
            front: self.begin,
            back: self.end,
        }
    }
}

impl<'a, B: StorageBackend, const N: usize> IntoIterator for TupleRange<'a, B, N> {
    type Item = TupleRef<'a, B, N>;
    type IntoIter = TupleIter<'a, B, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over a [`TupleRange`].
#[derive(Debug)]
pub struct TupleIter<'a, B: StorageBackend, const N: usize> {
    range: TupleRange<'a, B, N>,
    front: usize,
    back: usize,
}

impl<'a, B: StorageBackend, const N: usize> TupleIter<'a, B, N> {
    fn tuple(&self, tuple: usize) -> TupleRef<'a, B, N> {
        TupleRef {
            backend: self.range.backend,
            tuple,
            components: self.range.components,
        }
    }
}

impl<'a, B: StorageBackend, const N: usize> Iterator for TupleIter<'a, B, N> {
    type Item = TupleRef<'a, B, N>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let tuple = self.tuple(self.front);
        self.front += 1;
        Some(tuple)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<B: StorageBackend, const N: usize> DoubleEndedIterator for TupleIter<'_, B, N> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.tuple(self.back))
    }
}

impl<B: StorageBackend, const N: usize> ExactSizeIterator for TupleIter<'_, B, N> {}

impl<B: StorageBackend, const N: usize> FusedIterator for TupleIter<'_, B, N> {}

/// One tuple of a [`TupleRange`].
#[derive(Debug)]
pub struct TupleRef<'a, B: StorageBackend, const N: usize> {
    backend: &'a B,
    tuple: usize,
    components: usize,
}

impl<B: StorageBackend, const N: usize> Clone for TupleRef<'_, B, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<B: StorageBackend, const N: usize> Copy for TupleRef<'_, B, N> {}

impl<B: StorageBackend, const N: usize> TupleRef<'_, B, N> {
    /// Index of this tuple in the array.
    #[must_use]
    pub fn index(&self) -> usize {
        self.tuple
    }

    /// Components in the tuple.
    #[must_use]
    pub fn len(&self) -> usize {
        fixed_width::<N>(self.components)
    }

    /// Always false; tuples have at least one component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Reads one component.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not below the tuple width.
    #[must_use]
    pub fn get(&self, component: usize) -> B::Value {
        let width = self.len();
        assert!(
            component < width,
            "component {component} out of range for width {width}"
        );
        self.backend.value(self.tuple, component)
    }

    /// Iterates the components.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = B::Value> + '_ {
        (0..self.len()).map(move |c| self.backend.value(self.tuple, c))
    }

    /// Copies the tuple into a fixed-size array.
    #[must_use]
    pub fn to_array(&self) -> [B::Value; N] {
        std::array::from_fn(|c| self.backend.value(self.tuple, c))
    }

    /// Copies the tuple into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<B::Value> {
        self.iter().collect()
    }
}

// ============================================================================
// Mutable ranges
// ============================================================================

/// Writable flattened values `begin..end` of an array.
#[derive(Debug)]
pub struct ValueRangeMut<'a, B: StorageBackend> {
    backend: &'a mut B,
    begin: usize,
    end: usize,
}

impl<'a, B: StorageBackend> ValueRangeMut<'a, B> {
    pub(crate) fn new(backend: &'a mut B, begin: usize, end: usize) -> Self {
        debug_assert!(!B::READ_ONLY);
        Self {
            backend,
            begin,
            end,
        }
    }

    /// Number of values in the range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Returns true if the range holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Reads the value at `index` within the range.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> B::Value {
        self.check(index);
        self.backend.value_at(self.begin + index)
    }

    /// Writes the value at `index` within the range.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set(&mut self, index: usize, value: B::Value) {
        self.check(index);
        // Mutable ranges only exist over writable backends.
        if let Some(slot) = self.backend.value_at_mut(self.begin + index) {
            *slot = value;
        }
    }

    /// Replaces the value at `index` with `f(value)`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn update(&mut self, index: usize, f: impl FnOnce(B::Value) -> B::Value) {
        let value = self.get(index);
        self.set(index, f(value));
    }

    /// Sets every value in the range.
    pub fn fill(&mut self, value: B::Value) {
        if let Some(data) = self.backend.as_mut_slice() {
            data[self.begin..self.end].fill(value);
            return;
        }
        for i in self.begin..self.end {
            if let Some(slot) = self.backend.value_at_mut(i) {
                *slot = value;
            }
        }
    }

    /// Calls `f` with the index within the range and a mutable reference to
    /// each value.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(usize, &mut B::Value)) {
        if let Some(data) = self.backend.as_mut_slice() {
            for (i, slot) in data[self.begin..self.end].iter_mut().enumerate() {
                f(i, slot);
            }
            return;
        }
        for i in self.begin..self.end {
            if let Some(slot) = self.backend.value_at_mut(i) {
                f(i - self.begin, slot);
            }
        }
    }

    /// Read-only view of the same values.
    #[must_use]
    pub fn as_range(&self) -> ValueRange<'_, B> {
        ValueRange::new(&*self.backend, self.begin, self.end)
    }

    fn check(&self, index: usize) {
        assert!(
            index < self.len(),
            "index {index} out of range for length {}",
            self.len()
        );
    }
}

/// Writable tuples `begin..end` of an array, `N` components wide.
#[derive(Debug)]
pub struct TupleRangeMut<'a, B: StorageBackend, const N: usize> {
    backend: &'a mut B,
    begin: usize,
    end: usize,
    components: usize,
}

impl<'a, B: StorageBackend, const N: usize> TupleRangeMut<'a, B, N> {
    pub(crate) fn new(backend: &'a mut B, begin: usize, end: usize, components: usize) -> Self {
        debug_assert!(!B::READ_ONLY);
        debug_assert!(N == DYNAMIC || N == components);
        Self {
            backend,
            begin,
            end,
            components,
        }
    }

    /// Number of tuples in the range.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Returns true if the range holds no tuples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Components per tuple.
    #[must_use]
    pub fn width(&self) -> usize {
        self.components
    }

    /// Read access to the tuple at `index` within the range.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> TupleRef<'_, B, N> {
        self.check(index);
        TupleRef {
            backend: &*self.backend,
            tuple: self.begin + index,
            components: self.components,
        }
    }

    /// Write access to the tuple at `index` within the range.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn get_mut(&mut self, index: usize) -> TupleRefMut<'_, B, N> {
        self.check(index);
        TupleRefMut {
            backend: &mut *self.backend,
            tuple: self.begin + index,
            components: self.components,
        }
    }

    /// Calls `f` with write access to each tuple in turn.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(TupleRefMut<'_, B, N>)) {
        for tuple in self.begin..self.end {
            f(TupleRefMut {
                backend: &mut *self.backend,
                tuple,
                components: self.components,
            });
        }
    }

    fn check(&self, index: usize) {
        assert!(
            index < self.len(),
            "tuple {index} out of range for length {}",
            self.len()
        );
    }
}

/// Write access to one tuple of a [`TupleRangeMut`].
#[derive(Debug)]
pub struct TupleRefMut<'a, B: StorageBackend, const N: usize> {
    backend: &'a mut B,
    tuple: usize,
    components: usize,
}

impl<B: StorageBackend, const N: usize> TupleRefMut<'_, B, N> {
    /// Index of this tuple in the array.
    #[must_use]
    pub fn index(&self) -> usize {
        self.tuple
    }

    /// Components in the tuple.
    #[must_use]
    pub fn len(&self) -> usize {
        fixed_width::<N>(self.components)
    }

    /// Always false; tuples have at least one component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Reads one component.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not below the tuple width.
    #[must_use]
    pub fn get(&self, component: usize) -> B::Value {
        self.check(component);
        self.backend.value(self.tuple, component)
    }

    /// Writes one component.
    ///
    /// # Panics
    ///
    /// Panics if `component` is not below the tuple width.
    pub fn set(&mut self, component: usize, value: B::Value) {
        self.check(component);
        if let Some(slot) = self.backend.value_mut(self.tuple, component) {
            *slot = value;
        }
    }

    /// Overwrites the tuple from `values`, which must be one tuple wide.
    ///
    /// # Panics
    ///
    /// Panics if `values` has the wrong width.
    pub fn copy_from(&mut self, values: &[B::Value]) {
        assert_eq!(values.len(), self.len(), "tuple width mismatch");
        for (c, &value) in values.iter().enumerate() {
            self.set(c, value);
        }
    }

    /// Copies the tuple into a fixed-size array.
    #[must_use]
    pub fn to_array(&self) -> [B::Value; N] {
        std::array::from_fn(|c| self.backend.value(self.tuple, c))
    }

    fn check(&self, component: usize) {
        let width = self.len();
        assert!(
            component < width,
            "component {component} out of range for width {width}"
        );
    }
}

/// Tuple width as seen by a range: `N` itself unless the range is dynamic.
#[inline]
const fn fixed_width<const N: usize>(components: usize) -> usize {
    if N == DYNAMIC {
        components
    } else {
        N
    }
}
