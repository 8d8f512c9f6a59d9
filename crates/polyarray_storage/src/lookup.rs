//! Sorted value index for value-to-position queries.
//!
//! The index is built from a full scan of an array's values and is never
//! updated in place: the owning array discards it on every mutation and the
//! next lookup rebuilds it.
//!
//! Equality is bit-exact ([`Scalar::total_cmp`]). For floating point arrays
//! this means `-0.0` does not match `+0.0`, a NaN matches only a NaN with the
//! same payload, and no tolerance is applied.

use std::cmp::Ordering;

use polyarray_foundation::Scalar;

/// Lifecycle of an array's lookup index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookupState {
    /// The array holds no values.
    Empty,
    /// The array holds values but no index has been built since the last mutation.
    Unbuilt,
    /// The index reflects the current values.
    Built,
}

/// `(value, flattened index)` pairs sorted by value, ties by index.
#[derive(Clone, Debug, Default)]
pub struct LookupIndex<T: Scalar> {
    entries: Vec<(T, usize)>,
}

impl<T: Scalar> LookupIndex<T> {
    /// Builds an index over `values`, numbering them from zero.
    pub fn build(values: impl IntoIterator<Item = T>) -> Self {
        let mut entries: Vec<(T, usize)> = values.into_iter().zip(0..).collect();
        // Stable sort keeps equal values in index order.
        entries.sort_by(|a, b| a.0.total_cmp(&b.0));
        Self { entries }
    }

    /// Number of indexed values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lowest index holding `value`.
    #[must_use]
    pub fn find_first(&self, value: T) -> Option<usize> {
        let start = self.lower_bound(value);
        self.entries
            .get(start)
            .filter(|(v, _)| v.total_cmp(&value) == Ordering::Equal)
            .map(|(_, index)| *index)
    }

    /// Every index holding `value`, ascending.
    #[must_use]
    pub fn find_all(&self, value: T) -> Vec<usize> {
        let start = self.lower_bound(value);
        let end = self.upper_bound(value);
        self.entries[start..end].iter().map(|(_, i)| *i).collect()
    }

    /// Every index whose value lies in `low..=high`, ordered by value then index.
    #[must_use]
    pub fn find_range(&self, low: T, high: T) -> Vec<usize> {
        if low.total_cmp(&high) == Ordering::Greater {
            return Vec::new();
        }
        let start = self.lower_bound(low);
        let end = self.upper_bound(high);
        self.entries[start..end].iter().map(|(_, i)| *i).collect()
    }

    fn lower_bound(&self, value: T) -> usize {
        self.entries
            .partition_point(|(v, _)| v.total_cmp(&value) == Ordering::Less)
    }

    fn upper_bound(&self, value: T) -> usize {
        self.entries
            .partition_point(|(v, _)| v.total_cmp(&value) != Ordering::Greater)
    }
}

/// Lowest index in `values` equal to `value`, by linear scan.
pub(crate) fn scan_first<T: Scalar>(values: impl Iterator<Item = T>, value: T) -> Option<usize> {
    values
        .enumerate()
        .find(|(_, v)| v.total_cmp(&value) == Ordering::Equal)
        .map(|(i, _)| i)
}

/// Every index in `values` equal to `value`, by linear scan.
pub(crate) fn scan_all<T: Scalar>(values: impl Iterator<Item = T>, value: T) -> Vec<usize> {
    values
        .enumerate()
        .filter(|(_, v)| v.total_cmp(&value) == Ordering::Equal)
        .map(|(i, _)| i)
        .collect()
}

/// Every index in `values` within `low..=high`, ordered by value then index.
pub(crate) fn scan_range<T: Scalar>(values: impl Iterator<Item = T>, low: T, high: T) -> Vec<usize> {
    let mut hits: Vec<(T, usize)> = values
        .enumerate()
        .filter(|(_, v)| {
            v.total_cmp(&low) != Ordering::Less && v.total_cmp(&high) != Ordering::Greater
        })
        .map(|(i, v)| (v, i))
        .collect();
    hits.sort_by(|a, b| a.0.total_cmp(&b.0));
    hits.into_iter().map(|(_, i)| i).collect()
}
