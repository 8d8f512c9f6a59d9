//! The closed set of scalar value types arrays may hold.
//!
//! [`Scalar`] is sealed: only the ten primitive numeric types implement it,
//! so every value type has a matching [`ScalarType`] tag and the dispatcher
//! can enumerate them exhaustively.

use std::cmp::Ordering;
use std::fmt::{Debug, Display};

use num_traits::{Bounded, Num, NumCast};

use crate::types::ScalarType;

mod private {
    pub trait Sealed {}
    impl Sealed for i8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for i64 {}
    impl Sealed for u8 {}
    impl Sealed for u16 {}
    impl Sealed for u32 {}
    impl Sealed for u64 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
}

/// A primitive numeric type that can be stored in an array.
pub trait Scalar:
    private::Sealed
    + Num
    + NumCast
    + Bounded
    + Copy
    + Default
    + PartialOrd
    + Debug
    + Display
    + Send
    + Sync
    + 'static
{
    /// Runtime tag for this type.
    const SCALAR_TYPE: ScalarType;

    /// Converts to `f64` (the type-erased access currency).
    fn as_f64(self) -> f64;

    /// Converts from `f64` with saturating `as` semantics (NaN becomes 0 for integers).
    fn from_f64(value: f64) -> Self;

    /// Converts from `f64`, rounding to nearest for integer types.
    fn from_f64_rounded(value: f64) -> Self;

    /// Evaluates `slope * index + intercept`. Integer types wrap on overflow.
    fn affine(slope: Self, index: usize, intercept: Self) -> Self;

    /// Bit-exact total order.
    ///
    /// Floats use IEEE total ordering: `-0.0 < +0.0` and NaNs with the same
    /// payload compare equal.
    fn total_cmp(&self, other: &Self) -> Ordering;

    /// Converts to another scalar type, exactly when representable and
    /// saturating otherwise.
    #[must_use]
    fn cast<U: Scalar>(self) -> U {
        <U as NumCast>::from(self).unwrap_or_else(|| U::from_f64(self.as_f64()))
    }

    /// Wraps the value with its type tag, losing nothing.
    fn to_value(self) -> ScalarValue;
}

/// A scalar of any supported type, held at full width.
///
/// Type-erased copies between arrays go through this rather than `f64` so
/// that 64-bit integers above 2^53 survive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScalarValue {
    /// `i8` value.
    Int8(i8),
    /// `i16` value.
    Int16(i16),
    /// `i32` value.
    Int32(i32),
    /// `i64` value.
    Int64(i64),
    /// `u8` value.
    UInt8(u8),
    /// `u16` value.
    UInt16(u16),
    /// `u32` value.
    UInt32(u32),
    /// `u64` value.
    UInt64(u64),
    /// `f32` value.
    Float32(f32),
    /// `f64` value.
    Float64(f64),
}

impl ScalarValue {
    /// Type tag of the held value.
    #[must_use]
    pub fn scalar_type(self) -> ScalarType {
        match self {
            Self::Int8(_) => ScalarType::Int8,
            Self::Int16(_) => ScalarType::Int16,
            Self::Int32(_) => ScalarType::Int32,
            Self::Int64(_) => ScalarType::Int64,
            Self::UInt8(_) => ScalarType::UInt8,
            Self::UInt16(_) => ScalarType::UInt16,
            Self::UInt32(_) => ScalarType::UInt32,
            Self::UInt64(_) => ScalarType::UInt64,
            Self::Float32(_) => ScalarType::Float32,
            Self::Float64(_) => ScalarType::Float64,
        }
    }

    /// Converts to `T` with [`Scalar::cast`] semantics.
    #[must_use]
    pub fn cast<T: Scalar>(self) -> T {
        match self {
            Self::Int8(v) => v.cast(),
            Self::Int16(v) => v.cast(),
            Self::Int32(v) => v.cast(),
            Self::Int64(v) => v.cast(),
            Self::UInt8(v) => v.cast(),
            Self::UInt16(v) => v.cast(),
            Self::UInt32(v) => v.cast(),
            Self::UInt64(v) => v.cast(),
            Self::Float32(v) => v.cast(),
            Self::Float64(v) => v.cast(),
        }
    }

    /// The value as `f64`.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.cast()
    }
}

macro_rules! impl_scalar_int {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const SCALAR_TYPE: ScalarType = ScalarType::$tag;

                #[inline]
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn as_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                fn from_f64(value: f64) -> Self {
                    value as Self
                }

                #[inline]
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                fn from_f64_rounded(value: f64) -> Self {
                    value.round() as Self
                }

                #[inline]
                #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
                fn affine(slope: Self, index: usize, intercept: Self) -> Self {
                    slope.wrapping_mul(index as Self).wrapping_add(intercept)
                }

                #[inline]
                fn total_cmp(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }

                #[inline]
                fn to_value(self) -> ScalarValue {
                    ScalarValue::$tag(self)
                }
            }
        )*
    };
}

macro_rules! impl_scalar_float {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl Scalar for $ty {
                const SCALAR_TYPE: ScalarType = ScalarType::$tag;

                #[inline]
                #[allow(clippy::cast_lossless)]
                fn as_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                #[allow(clippy::cast_possible_truncation)]
                fn from_f64(value: f64) -> Self {
                    value as Self
                }

                #[inline]
                #[allow(clippy::cast_possible_truncation)]
                fn from_f64_rounded(value: f64) -> Self {
                    value as Self
                }

                #[inline]
                #[allow(clippy::cast_precision_loss)]
                fn affine(slope: Self, index: usize, intercept: Self) -> Self {
                    slope * index as Self + intercept
                }

                #[inline]
                fn total_cmp(&self, other: &Self) -> Ordering {
                    <$ty>::total_cmp(self, other)
                }

                #[inline]
                fn to_value(self) -> ScalarValue {
                    ScalarValue::$tag(self)
                }
            }
        )*
    };
}

impl_scalar_int! {
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
}

impl_scalar_float! {
    f32 => Float32,
    f64 => Float64,
}
