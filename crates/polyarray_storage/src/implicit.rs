//! Read-only arrays whose values are computed from a rule.

use std::fmt;
use std::mem;
use std::sync::Arc;

use polyarray_foundation::{BackendKind, Error, ErrorKind, Result, Scalar};

use crate::backend::{StorageBackend, checked_len};

/// A rule mapping a flattened value index to a value.
#[derive(Clone)]
pub enum Rule<T: Scalar> {
    /// `value(i) = slope * i + intercept`.
    Affine {
        /// Multiplier applied to the index.
        slope: T,
        /// Value at index zero.
        intercept: T,
    },
    /// Every index yields the same value.
    Constant(T),
    /// An arbitrary function of the index.
    Function(Arc<dyn Fn(usize) -> T + Send + Sync>),
}

impl<T: Scalar> Rule<T> {
    /// Creates an affine rule.
    #[must_use]
    pub fn affine(slope: T, intercept: T) -> Self {
        Self::Affine { slope, intercept }
    }

    /// Creates a rule from a closure.
    pub fn function(f: impl Fn(usize) -> T + Send + Sync + 'static) -> Self {
        Self::Function(Arc::new(f))
    }

    /// Evaluates the rule at `index`.
    #[inline]
    pub fn evaluate(&self, index: usize) -> T {
        match self {
            Self::Affine { slope, intercept } => T::affine(*slope, index, *intercept),
            Self::Constant(value) => *value,
            Self::Function(f) => f(index),
        }
    }
}

impl<T: Scalar> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Affine { slope, intercept } => {
                write!(f, "Affine({slope} * i + {intercept})")
            }
            Self::Constant(value) => write!(f, "Constant({value})"),
            Self::Function(_) => write!(f, "Function(<closure>)"),
        }
    }
}

/// Storage that holds a [`Rule`] and size metadata, but no values.
///
/// Sizing only records the new logical size. Every write is rejected.
#[derive(Clone, Debug)]
pub struct RuleGenerated<T: Scalar> {
    rule: Rule<T>,
    tuples: usize,
    components: usize,
}

impl<T: Scalar> RuleGenerated<T> {
    /// Creates a backend with the given rule and shape.
    ///
    /// # Errors
    ///
    /// Returns an error if `components` is zero or the shape overflows.
    pub fn new(rule: Rule<T>, components: usize, tuples: usize) -> Result<Self> {
        if components == 0 {
            return Err(Error::new(ErrorKind::InvalidComponentCount(0)));
        }
        checked_len(tuples, components)?;
        Ok(Self {
            rule,
            tuples,
            components,
        })
    }

    /// Returns the rule.
    #[must_use]
    pub fn rule(&self) -> &Rule<T> {
        &self.rule
    }
}

impl<T: Scalar> StorageBackend for RuleGenerated<T> {
    type Value = T;
    const KIND: BackendKind = BackendKind::Implicit;
    const READ_ONLY: bool = true;
    const EXACT_CAPACITY: bool = true;

    fn components(&self) -> usize {
        self.components
    }

    fn set_components(&mut self, components: usize) -> Result<()> {
        if components == 0 {
            return Err(Error::new(ErrorKind::InvalidComponentCount(0)));
        }
        self.components = components;
        self.tuples = 0;
        Ok(())
    }

    fn allocated_tuples(&self) -> usize {
        self.tuples
    }

    fn allocate_tuples(&mut self, tuples: usize) -> Result<()> {
        self.reallocate_tuples(tuples)
    }

    fn reallocate_tuples(&mut self, tuples: usize) -> Result<()> {
        checked_len(tuples, self.components)?;
        self.tuples = tuples;
        Ok(())
    }

    #[inline]
    fn value(&self, tuple: usize, component: usize) -> T {
        self.rule.evaluate(tuple * self.components + component)
    }

    fn value_mut(&mut self, _tuple: usize, _component: usize) -> Option<&mut T> {
        None
    }

    #[inline]
    fn value_at(&self, index: usize) -> T {
        self.rule.evaluate(index)
    }

    fn value_at_mut(&mut self, _index: usize) -> Option<&mut T> {
        None
    }

    fn memory_size(&self) -> usize {
        mem::size_of::<Rule<T>>()
    }
}
