//! Error types for polyarray.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Only conditions a caller must react to are errors. Dispatch and lookup
//! misses are `None`; neither appears here.

use std::fmt;

use thiserror::Error;

use crate::types::BackendKind;

/// The main error type for array operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates an allocation failure for `requested` scalar slots.
    #[must_use]
    pub fn allocation_failed(requested: usize) -> Self {
        Self::new(ErrorKind::AllocationFailed { requested })
    }

    /// Creates a read-only violation for the given backend.
    #[must_use]
    pub fn read_only(backend: BackendKind) -> Self {
        Self::new(ErrorKind::ReadOnly { backend })
    }

    /// Creates an invalid index error.
    #[must_use]
    pub fn invalid_index(index: usize, length: usize) -> Self {
        Self::new(ErrorKind::InvalidIndex { index, length })
    }

    /// Creates a component count mismatch error.
    #[must_use]
    pub fn component_mismatch(expected: usize, actual: usize) -> Self {
        Self::new(ErrorKind::ComponentMismatch { expected, actual })
    }

    /// Returns true if this is an allocation failure.
    #[must_use]
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::AllocationFailed { .. })
    }

    /// Returns true if this is a read-only violation.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        matches!(self.kind, ErrorKind::ReadOnly { .. })
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The backend could not provide the requested memory.
    #[error("allocation failed: could not provide {requested} values")]
    AllocationFailed {
        /// Number of scalar slots that were requested.
        requested: usize,
    },

    /// A write was attempted against a read-only backend.
    #[error("{backend} storage is read-only")]
    ReadOnly {
        /// The backend that rejected the write.
        backend: BackendKind,
    },

    /// Index out of the addressable range.
    #[error("index out of bounds: {index} (length {length})")]
    InvalidIndex {
        /// The index that was accessed.
        index: usize,
        /// The number of addressable items.
        length: usize,
    },

    /// Tuple width did not match the array's component count.
    #[error("component mismatch: expected {expected}, got {actual}")]
    ComponentMismatch {
        /// The array's component count.
        expected: usize,
        /// The width that was supplied.
        actual: usize,
    },

    /// Arrays must have at least one component per tuple.
    #[error("invalid component count: {0}")]
    InvalidComponentCount(usize),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Name of the operation that failed (e.g. `resize`).
    pub operation: Option<String>,
    /// Description of the array involved.
    pub array: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the operation name.
    #[must_use]
    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    /// Sets the array description.
    #[must_use]
    pub fn with_array(mut self, array: impl Into<String>) -> Self {
        self.array = Some(array.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(op) = &self.operation {
            write!(f, "in {op}")?;
        }
        if let Some(array) = &self.array {
            if self.operation.is_some() {
                write!(f, " ")?;
            }
            write!(f, "on {array}")?;
        }
        Ok(())
    }
}

/// Result type alias using the polyarray error.
pub type Result<T> = std::result::Result<T, Error>;
