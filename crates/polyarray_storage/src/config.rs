//! Configuration for array storage behavior.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How an array grows when a resize exceeds its capacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GrowthPolicy {
    /// New capacity is the old capacity plus the requested size, in tuples.
    /// Repeated appends cost amortized O(1).
    #[default]
    Amortized,
    /// New capacity is exactly the requested size.
    Exact,
}

/// How value lookups are answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LookupPolicy {
    /// Build a sorted index on first lookup and reuse it until the next mutation.
    #[default]
    Indexed,
    /// Scan the values on every lookup; never build an index.
    LinearScan,
}

/// Configuration for a [`GenericArray`](crate::GenericArray).
///
/// Passed explicitly at construction; there is no process-wide default
/// that can change underneath an array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StorageConfig {
    /// Growth policy for resizes past capacity.
    pub growth: GrowthPolicy,
    /// Lookup strategy.
    pub lookup: LookupPolicy,
}

impl StorageConfig {
    /// Creates the default configuration (amortized growth, indexed lookups).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for arrays whose final size is known up front.
    #[must_use]
    pub fn exact() -> Self {
        Self {
            growth: GrowthPolicy::Exact,
            ..Self::default()
        }
    }

    /// Configuration for arrays that are mutated between most lookups.
    #[must_use]
    pub fn scan_only() -> Self {
        Self {
            lookup: LookupPolicy::LinearScan,
            ..Self::default()
        }
    }

    /// Builder method to set the growth policy.
    #[must_use]
    pub fn with_growth(mut self, growth: GrowthPolicy) -> Self {
        self.growth = growth;
        self
    }

    /// Builder method to set the lookup policy.
    #[must_use]
    pub fn with_lookup(mut self, lookup: LookupPolicy) -> Self {
        self.lookup = lookup;
        self
    }
}
