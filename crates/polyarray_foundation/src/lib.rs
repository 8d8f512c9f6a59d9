//! Scalar value types, type tags, and errors for polyarray.
//!
//! This crate provides:
//! - [`Scalar`] - The sealed set of numeric value types arrays can hold
//! - [`ScalarValue`] - A tagged scalar for lossless type-erased copies
//! - [`ScalarType`] and [`BackendKind`] - Runtime type identification tags
//! - [`Error`] - Error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod scalar;
pub mod types;

pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use scalar::{Scalar, ScalarValue};
pub use types::{BackendKind, ScalarType};
